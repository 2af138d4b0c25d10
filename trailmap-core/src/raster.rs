//
// Copyright (c) Pirmin Kalberer. All rights reserved.
// Licensed under the MIT License. See LICENSE file in the project root for full license information.
//

use crate::config::{Config, RasterCfg};
use crate::error::LoadError;
use crate::geo::Bounds;
use std::sync::Arc;

/// Decoded georeferenced raster.
/// Pixel data stays in the original encoding and is handed to the map engine as is.
#[derive(Clone, Debug, PartialEq)]
pub struct GeoRaster {
    pub width: usize,
    pub height: usize,
    pub bands: usize,
    pub bounds: Bounds,
    pub no_data: Option<f64>,
    pub payload: Arc<Vec<u8>>,
}

/// Display options of a raster overlay
#[derive(Clone, Debug, PartialEq)]
pub struct RasterOptions {
    pub name: String,
    pub location: String,
    pub opacity: f64,
    /// Render resolution in pixels per tile side
    pub resolution: u32,
    pub fit_bounds: bool,
    pub opacity_control: bool,
}

impl<'a> Config<'a, RasterCfg> for RasterOptions {
    fn from_config(cfg: &RasterCfg) -> Result<Self, String> {
        if !(0.0..=1.0).contains(&cfg.opacity) {
            return Err(format!(
                "Raster '{}': opacity {} outside of 0.0 - 1.0",
                cfg.name, cfg.opacity
            ));
        }
        if cfg.resolution == 0 {
            return Err(format!("Raster '{}': resolution must be positive", cfg.name));
        }
        Ok(RasterOptions {
            name: cfg.name.clone(),
            location: cfg.path.clone(),
            opacity: cfg.opacity,
            resolution: cfg.resolution,
            fit_bounds: cfg.fit_bounds,
            opacity_control: cfg.opacity_control,
        })
    }
    fn gen_config() -> String {
        let toml = r#"
[raster]
name = "Lidar TIFF"
path = "./imagery/lidar.tiff"
opacity = 0.5
resolution = 256
#fit_bounds = true
#opacity_control = true
"#;
        toml.to_string()
    }
}

/// Raster parsing capability
pub trait RasterDecoder {
    fn decode(&self, data: &[u8], location: &str) -> Result<GeoRaster, LoadError>;
}

/// Decoder used when no raster library is compiled in
#[derive(Clone, Debug, Default)]
pub struct UnsupportedDecoder;

impl RasterDecoder for UnsupportedDecoder {
    fn decode(&self, _data: &[u8], location: &str) -> Result<GeoRaster, LoadError> {
        Err(LoadError::Unsupported(format!(
            "Raster decoding of {} not supported in this build",
            location
        )))
    }
}

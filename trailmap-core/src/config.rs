//
// Copyright (c) Pirmin Kalberer. All rights reserved.
// Licensed under the MIT License. See LICENSE file in the project root for full license information.
//

use regex::Regex;
use serde::Deserialize;
use std;
use std::collections::HashMap;
use std::env;
use std::error::Error;
use std::fs::File;
use std::io::prelude::*;
use tera::{Context, Tera};
use toml::Value;

pub trait Config<'a, C: Deserialize<'a>>
where
    Self: std::marker::Sized,
{
    /// Read configuration
    fn from_config(config: &C) -> Result<Self, String>;
    /// Generate configuration template
    fn gen_config() -> String;
}

#[derive(Deserialize, Clone, Debug)]
pub struct ApplicationCfg {
    pub map: MapCfg,
    #[serde(rename = "baselayer")]
    pub baselayers: Vec<BaseLayerCfg>,
    pub raster: Option<RasterCfg>,
    pub markers: Option<MarkersCfg>,
    #[serde(default)]
    pub geolocation: GeolocationCfg,
}

#[derive(Deserialize, Clone, Debug)]
pub struct MapCfg {
    /// Initial view center as (lat, lon)
    pub center: (f64, f64),
    pub zoom: u8,
    /// Base layer shown at startup (Default: first configured base layer)
    pub default_baselayer: Option<String>,
    /// "dynamic": separate expanded base layer and overlay controls.
    /// "static": one combined collapsed control.
    #[serde(default = "default_overlay_control")]
    pub overlay_control: String,
}

pub fn default_overlay_control() -> String {
    "dynamic".to_string()
}

#[derive(Deserialize, Clone, Debug)]
pub struct BaseLayerCfg {
    pub name: String,
    /// URL template with {z}/{x}/{y} placeholders
    pub url: String,
    #[serde(default = "default_maxzoom")]
    pub maxzoom: u8,
    /// Highest zoom level the tile source provides (Default: maxzoom)
    pub maxnativezoom: Option<u8>,
    #[serde(default)]
    pub nowrap: bool,
    #[serde(default)]
    pub attribution: String,
}

pub fn default_maxzoom() -> u8 {
    18
}

#[derive(Deserialize, Clone, Debug)]
pub struct RasterCfg {
    #[serde(default = "default_raster_name")]
    pub name: String,
    pub path: String,
    #[serde(default = "default_opacity")]
    pub opacity: f64,
    #[serde(default = "default_resolution")]
    pub resolution: u32,
    /// Refit the view to the raster extent once loaded
    #[serde(default = "default_true")]
    pub fit_bounds: bool,
    /// Add an opacity slider once loaded
    #[serde(default = "default_true")]
    pub opacity_control: bool,
}

pub fn default_raster_name() -> String {
    "Lidar TIFF".to_string()
}

pub fn default_opacity() -> f64 {
    0.5
}

pub fn default_resolution() -> u32 {
    256
}

fn default_true() -> bool {
    true
}

#[derive(Deserialize, Clone, Debug)]
pub struct MarkersCfg {
    #[serde(default = "default_markers_name")]
    pub name: String,
    pub path: String,
}

pub fn default_markers_name() -> String {
    "Markers".to_string()
}

#[derive(Deserialize, Clone, Debug)]
pub struct GeolocationCfg {
    /// Element id of the toggle button
    #[serde(default = "default_button")]
    pub button: String,
    #[serde(default = "default_locate_maxzoom")]
    pub maxzoom: u8,
    #[serde(default = "default_true")]
    pub set_view: bool,
    /// Continuous position updates instead of a single fix
    #[serde(default)]
    pub watch: bool,
}

impl Default for GeolocationCfg {
    fn default() -> Self {
        GeolocationCfg {
            button: default_button(),
            maxzoom: default_locate_maxzoom(),
            set_view: true,
            watch: false,
        }
    }
}

pub fn default_button() -> String {
    "locate-btn".to_string()
}

pub fn default_locate_maxzoom() -> u8 {
    16
}

pub const DEFAULT_CONFIG: &'static str = r#"
[map]
center = [36.52347, -118.26239]
zoom = 13
default_baselayer = "OpenStreetMap"
overlay_control = "dynamic"

[[baselayer]]
name = "OpenStreetMap"
url = "https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png"
maxzoom = 18
attribution = "&copy; OpenStreetMap contributors"

[[baselayer]]
name = "Scanned Topos"
url = "./tiles/topo_tiles/{z}/{x}/{y}.png"
maxzoom = 19
maxnativezoom = 15
nowrap = true
attribution = "Scanned Topos"

[[baselayer]]
name = "Cal Topo"
url = "./tiles/ct_tiles/{z}/{x}/{y}.png"
maxzoom = 19
maxnativezoom = 15
nowrap = true
attribution = "Cal Topo"

[raster]
name = "Lidar TIFF"
path = "./imagery/lidar.tiff"
opacity = 0.5
resolution = 256

[markers]
name = "Markers"
path = "./markers/markers.geojson"

[geolocation]
button = "locate-btn"
maxzoom = 16
"#;

/// Load and parse the config file into an config struct.
pub fn read_config<'a, T: Deserialize<'a>>(path: &str) -> Result<T, String> {
    let mut file = match File::open(path) {
        Ok(file) => file,
        Err(_) => {
            return Err("Could not find config file!".to_string());
        }
    };
    let mut config_toml = String::new();
    if let Err(err) = file.read_to_string(&mut config_toml) {
        return Err(format!("Error while reading config: [{}]", err));
    };

    parse_config(config_toml, path)
}

/// Parse the configuration into an config struct.
pub fn parse_config<'a, T: Deserialize<'a>>(config_toml: String, path: &str) -> Result<T, String> {
    // Check for old ${var} expressions
    let re = Regex::new(r"\$\{([[:alnum:]]+)\}").map_err(|e| e.to_string())?;
    if re.is_match(&config_toml) {
        return Err(
            "Replace old environment variable syntax ${VARNAME} with `{{env.VARNAME}}`".to_string(),
        );
    }

    // Parse template
    let mut tera = Tera::default();
    tera.add_raw_template(path, &config_toml)
        .map_err(|e| format!("Template error: {}", e))?;
    let mut context = Context::new();
    let mut env = HashMap::new();
    for (key, value) in env::vars() {
        env.insert(key, value);
    }
    context.insert("env", &env);
    let toml = tera.render(path, &context).map_err(|e| match e.source() {
        Some(cause) => format!("Template error: {}", cause),
        None => format!("Template error: {}", e),
    })?;

    toml.parse::<Value>()
        .and_then(|cfg| cfg.try_into::<T>())
        .map_err(|err| format!("{} - {}", path, err))
}

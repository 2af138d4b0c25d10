//
// Copyright (c) Pirmin Kalberer. All rights reserved.
// Licensed under the MIT License. See LICENSE file in the project root for full license information.
//

//! Asynchronous overlay sources: fetch, then decode into a layer payload.

use futures::future::BoxFuture;
use futures::FutureExt;
use std::path::{Path, PathBuf};
use trailmap_core::feature::{FeatureCollection, MarkerOptions};
#[cfg(not(feature = "with-gdal"))]
use trailmap_core::raster::UnsupportedDecoder;
use trailmap_core::raster::{GeoRaster, RasterDecoder, RasterOptions};
use trailmap_core::LoadError;

/// Byte source for overlay data
pub trait Fetcher {
    fn fetch<'a>(&'a self, location: &'a str) -> BoxFuture<'a, Result<Vec<u8>, LoadError>>;
}

/// Reads overlay files relative to a base directory
#[derive(Clone, Debug)]
pub struct FileFetcher {
    pub basedir: PathBuf,
}

impl FileFetcher {
    pub fn new<P: AsRef<Path>>(basedir: P) -> FileFetcher {
        FileFetcher {
            basedir: basedir.as_ref().to_path_buf(),
        }
    }
    pub fn resolve(&self, location: &str) -> PathBuf {
        let path = Path::new(location);
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.basedir.join(path)
        }
    }
}

impl Fetcher for FileFetcher {
    fn fetch<'a>(&'a self, location: &'a str) -> BoxFuture<'a, Result<Vec<u8>, LoadError>> {
        let path = self.resolve(location);
        async move {
            debug!("FileFetcher.fetch {}", path.display());
            tokio::fs::read(&path).await.map_err(|e| LoadError::Fetch {
                location: location.to_string(),
                cause: e.to_string(),
            })
        }
        .boxed()
    }
}

/// Raster decoder of this build
#[cfg(feature = "with-gdal")]
pub fn default_decoder() -> Box<dyn RasterDecoder> {
    Box::new(trailmap_gdal::GdalRasterDecoder::new())
}

/// Raster decoder of this build
#[cfg(not(feature = "with-gdal"))]
pub fn default_decoder() -> Box<dyn RasterDecoder> {
    Box::new(UnsupportedDecoder)
}

/// Fetch and decode a georeferenced raster
pub async fn load_raster<F, D>(
    fetcher: &F,
    decoder: &D,
    options: &RasterOptions,
) -> Result<GeoRaster, LoadError>
where
    F: Fetcher + ?Sized,
    D: RasterDecoder + ?Sized,
{
    let data = fetcher.fetch(&options.location).await?;
    debug!(
        "Raster '{}': {} bytes fetched from {}",
        options.name,
        data.len(),
        options.location
    );
    let raster = decoder.decode(&data, &options.location)?;
    if !raster.bounds.is_valid() {
        return Err(LoadError::Decode {
            location: options.location.clone(),
            cause: format!("invalid raster extent {}", raster.bounds),
        });
    }
    Ok(raster)
}

/// Fetch and parse a GeoJSON feature collection
pub async fn load_markers<F>(
    fetcher: &F,
    options: &MarkerOptions,
) -> Result<FeatureCollection, LoadError>
where
    F: Fetcher + ?Sized,
{
    let data = fetcher.fetch(&options.location).await?;
    FeatureCollection::from_slice(&data, &options.location)
}

/// Completed overlay pipeline
#[derive(Debug)]
pub enum OverlayLoad {
    Raster(Result<GeoRaster, LoadError>),
    Markers(Result<FeatureCollection, LoadError>),
}

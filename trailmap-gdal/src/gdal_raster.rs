//
// Copyright (c) Pirmin Kalberer. All rights reserved.
// Licensed under the MIT License. See LICENSE file in the project root for full license information.
//

use gdal::vsi;
use gdal::Dataset;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use trailmap_core::geo::WORLD_BOUNDS;
use trailmap_core::raster::{GeoRaster, RasterDecoder};
use trailmap_core::{Bounds, LatLon, LoadError};

static MEM_FILE_SEQ: AtomicUsize = AtomicUsize::new(0);

/// GDAL release name, e.g. "3.2.1"
pub fn gdal_version() -> String {
    gdal::version::version_info("RELEASE_NAME")
}

/// Extent covered by `width` x `height` pixels of a north-up geo transform
pub fn raster_bounds(gt: &[f64; 6], width: usize, height: usize) -> Bounds {
    let origin = LatLon::new(gt[3], gt[0]);
    let corner = LatLon::new(
        gt[3] + gt[4] * width as f64 + gt[5] * height as f64,
        gt[0] + gt[1] * width as f64 + gt[2] * height as f64,
    );
    Bounds::from_corners(origin, corner)
}

/// Decodes GeoTIFF (and every other GDAL raster format) from memory.
///
/// Only geographic (lon/lat) rasters are accepted.
#[derive(Clone, Debug, Default)]
pub struct GdalRasterDecoder;

impl GdalRasterDecoder {
    pub fn new() -> GdalRasterDecoder {
        GdalRasterDecoder
    }
}

fn decode_error<E: ToString>(location: &str) -> impl Fn(E) -> LoadError + '_ {
    move |e| LoadError::Decode {
        location: location.to_string(),
        cause: e.to_string(),
    }
}

impl RasterDecoder for GdalRasterDecoder {
    fn decode(&self, data: &[u8], location: &str) -> Result<GeoRaster, LoadError> {
        let seq = MEM_FILE_SEQ.fetch_add(1, Ordering::SeqCst);
        let mem_file = format!("/vsimem/trailmap_{}.tif", seq);
        vsi::create_mem_file(&mem_file, data.to_vec()).map_err(decode_error(location))?;
        let result = read_dataset(&mem_file, location);
        if let Err(e) = vsi::unlink_mem_file(&mem_file) {
            warn!("Error removing {}: {}", mem_file, e);
        }
        let mut raster = result?;
        raster.payload = Arc::new(data.to_vec());
        Ok(raster)
    }
}

fn read_dataset(mem_file: &str, location: &str) -> Result<GeoRaster, LoadError> {
    let dataset = Dataset::open(Path::new(mem_file)).map_err(decode_error(location))?;
    let (width, height) = dataset.raster_size();
    let bands = dataset.raster_count().max(0) as usize;
    if bands == 0 {
        return Err(LoadError::Decode {
            location: location.to_string(),
            cause: "no raster bands".to_string(),
        });
    }
    let gt = dataset.geo_transform().map_err(decode_error(location))?;
    let bounds = raster_bounds(&gt, width, height);
    let geographic = WORLD_BOUNDS.contains(&LatLon::new(bounds.miny, bounds.minx))
        && WORLD_BOUNDS.contains(&LatLon::new(bounds.maxy, bounds.maxx));
    if !geographic {
        return Err(LoadError::Decode {
            location: location.to_string(),
            cause: format!("extent {} is not in geographic coordinates", bounds),
        });
    }
    let no_data = dataset
        .rasterband(1)
        .map_err(decode_error(location))?
        .no_data_value();
    debug!(
        "{}: {}x{} pixels, {} bands, {} ({})",
        location,
        width,
        height,
        bands,
        bounds,
        dataset.driver().short_name()
    );
    Ok(GeoRaster {
        width,
        height,
        bands,
        bounds,
        no_data,
        payload: Arc::new(Vec::new()),
    })
}

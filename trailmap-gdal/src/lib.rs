//
// Copyright (c) Pirmin Kalberer. All rights reserved.
// Licensed under the MIT License. See LICENSE file in the project root for full license information.
//

#[macro_use]
extern crate log;

mod gdal_raster;

pub use crate::gdal_raster::{gdal_version, raster_bounds, GdalRasterDecoder};

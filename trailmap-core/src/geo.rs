//
// Copyright (c) Pirmin Kalberer. All rights reserved.
// Licensed under the MIT License. See LICENSE file in the project root for full license information.
//

//! Geographic coordinates and bounds (WGS84)

use std::f64::consts;
use std::fmt;

/// Half the side length of the Web Mercator square in meters
pub const MERC_HALF_EXTENT: f64 = 20037508.3427892480;

/// Latitude limit of the Web Mercator projection
pub const MERC_MAX_LAT: f64 = 85.0511287798;

/// Geographic position in decimal degrees
#[derive(PartialEq, Clone, Copy, Debug)]
pub struct LatLon {
    pub lat: f64,
    pub lon: f64,
}

impl LatLon {
    pub fn new(lat: f64, lon: f64) -> LatLon {
        LatLon { lat, lon }
    }
}

impl From<(f64, f64)> for LatLon {
    fn from(latlon: (f64, f64)) -> LatLon {
        LatLon::new(latlon.0, latlon.1)
    }
}

impl fmt::Display for LatLon {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "({:.5}, {:.5})", self.lat, self.lon)
    }
}

/// Geographic extent with x = longitude and y = latitude
#[derive(PartialEq, Clone, Debug)]
pub struct Bounds {
    pub minx: f64,
    pub miny: f64,
    pub maxx: f64,
    pub maxy: f64,
}

pub static WORLD_BOUNDS: Bounds = Bounds {
    minx: -180.0,
    miny: -90.0,
    maxx: 180.0,
    maxy: 90.0,
};

impl Bounds {
    /// Bounds spanned by two arbitrary corners
    pub fn from_corners(a: LatLon, b: LatLon) -> Bounds {
        Bounds {
            minx: a.lon.min(b.lon),
            miny: a.lat.min(b.lat),
            maxx: a.lon.max(b.lon),
            maxy: a.lat.max(b.lat),
        }
    }
    pub fn center(&self) -> LatLon {
        LatLon {
            lat: self.maxy - (self.maxy - self.miny) / 2.0,
            lon: self.maxx - (self.maxx - self.minx) / 2.0,
        }
    }
    pub fn contains(&self, pos: &LatLon) -> bool {
        pos.lon >= self.minx && pos.lon <= self.maxx && pos.lat >= self.miny && pos.lat <= self.maxy
    }
    /// Finite and non-inverted
    pub fn is_valid(&self) -> bool {
        [self.minx, self.miny, self.maxx, self.maxy]
            .iter()
            .all(|v| v.is_finite())
            && self.minx <= self.maxx
            && self.miny <= self.maxy
    }
}

impl fmt::Display for Bounds {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "[{:.5}, {:.5}, {:.5}, {:.5}]",
            self.minx, self.miny, self.maxx, self.maxy
        )
    }
}

/// Returns the Spherical Mercator (x, y) in meters
pub fn lonlat_to_merc(lon: f64, lat: f64) -> (f64, f64) {
    let lat = lat.max(-MERC_MAX_LAT).min(MERC_MAX_LAT);
    let x = 6378137.0 * lon.to_radians();
    let y = 6378137.0 * ((consts::PI * 0.25) + (0.5 * lat.to_radians())).tan().ln();
    (x, y)
}

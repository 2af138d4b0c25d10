//
// Copyright (c) Pirmin Kalberer. All rights reserved.
// Licensed under the MIT License. See LICENSE file in the project root for full license information.
//

use crate::feature::FeatureCollection;
use crate::geo::LatLon;
use crate::raster::GeoRaster;
use crate::tile_source::TileSource;
use std::fmt;

/// Engine-side identity of a created layer
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LayerHandle(pub u64);

impl fmt::Display for LayerHandle {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Layer description handed to the map engine
#[derive(Clone, Debug, PartialEq)]
pub enum MapLayer {
    Tile(TileSource),
    Raster(RasterLayer),
    Vector(VectorLayer),
    Location(LocationMarker),
}

#[derive(Clone, Debug, PartialEq)]
pub struct RasterLayer {
    pub raster: GeoRaster,
    pub opacity: f64,
    pub resolution: u32,
}

/// GeoJSON layer with one optional popup per feature
#[derive(Clone, Debug, PartialEq)]
pub struct VectorLayer {
    pub features: FeatureCollection,
    pub popups: Vec<Option<String>>,
}

impl VectorLayer {
    pub fn new(features: FeatureCollection) -> VectorLayer {
        let popups = features.features.iter().map(|f| f.popup_html()).collect();
        VectorLayer { features, popups }
    }
    pub fn popup_count(&self) -> usize {
        self.popups.iter().filter(|p| p.is_some()).count()
    }
}

/// Position reported by the host platform
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LocationFix {
    pub position: LatLon,
    /// Accuracy radius in meters
    pub accuracy: f64,
}

/// Position marker with popup plus accuracy circle
#[derive(Clone, Debug, PartialEq)]
pub struct LocationMarker {
    pub position: LatLon,
    /// Circle radius in meters
    pub radius: f64,
    pub popup: String,
    pub open_popup: bool,
}

impl LocationMarker {
    pub fn from_fix(fix: &LocationFix) -> LocationMarker {
        let radius = fix.accuracy / 2.0;
        LocationMarker {
            position: fix.position,
            radius,
            popup: format!(
                "You are within {} meters from this point",
                radius.round()
            ),
            open_popup: true,
        }
    }
}

impl MapLayer {
    pub fn kind(&self) -> &'static str {
        match self {
            MapLayer::Tile(_) => "tile",
            MapLayer::Raster(_) => "raster",
            MapLayer::Vector(_) => "vector",
            MapLayer::Location(_) => "location",
        }
    }
}

//
// Copyright (c) Pirmin Kalberer. All rights reserved.
// Licensed under the MIT License. See LICENSE file in the project root for full license information.
//

use std::collections::BTreeSet;
use trailmap_core::{Bounds, LatLon};

/// Observable state of the map instance
#[derive(Clone, Debug, PartialEq)]
pub struct MapView {
    pub center: LatLon,
    /// Last explicitly requested zoom. Not meaningful while `view_bounds` is set,
    /// the engine picks the zoom fitting those bounds into its viewport.
    pub zoom: u8,
    /// Extent of the last bounds fit, cleared by any later recentering
    pub view_bounds: Option<Bounds>,
    pub active_base: Option<String>,
    pub active_overlays: BTreeSet<String>,
}

impl MapView {
    pub fn new(center: LatLon, zoom: u8) -> MapView {
        MapView {
            center,
            zoom,
            view_bounds: None,
            active_base: None,
            active_overlays: BTreeSet::new(),
        }
    }
    pub fn fit(&mut self, bounds: &Bounds) {
        self.center = bounds.center();
        self.view_bounds = Some(bounds.clone());
    }
    pub fn recenter(&mut self, center: LatLon, zoom: u8) {
        self.center = center;
        self.zoom = zoom;
        self.view_bounds = None;
    }
}

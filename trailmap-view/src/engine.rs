//
// Copyright (c) Pirmin Kalberer. All rights reserved.
// Licensed under the MIT License. See LICENSE file in the project root for full license information.
//

//! Capabilities of the external mapping engine

use std::fmt;
use trailmap_core::layer::{LayerHandle, MapLayer};
use trailmap_core::{Bounds, LatLon};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ControlHandle(pub u64);

impl fmt::Display for ControlHandle {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "control#{}", self.0)
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ControlPosition {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

/// Layer selection control: radio buttons for base layers, checkboxes for overlays
#[derive(Clone, Debug, PartialEq)]
pub struct LayerControl {
    pub position: ControlPosition,
    pub collapsed: bool,
    /// Heading inserted above the entries
    pub title: Option<String>,
    pub base_layers: Vec<(String, LayerHandle)>,
    pub overlays: Vec<(String, LayerHandle)>,
}

/// Range input bound to a raster layer's opacity
#[derive(Clone, Debug, PartialEq)]
pub struct OpacitySlider {
    pub id: String,
    pub label: String,
    pub position: ControlPosition,
    pub min: f64,
    pub max: f64,
    pub step: f64,
    pub value: f64,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Control {
    Layers(LayerControl),
    Opacity(OpacitySlider),
}

/// Geolocation request parameters
#[derive(Clone, Debug, PartialEq)]
pub struct LocateOptions {
    /// Recenter the view on the reported position
    pub set_view: bool,
    pub max_zoom: u8,
    /// Continuous updates instead of a single fix
    pub watch: bool,
}

impl Default for LocateOptions {
    fn default() -> Self {
        LocateOptions {
            set_view: true,
            max_zoom: 16,
            watch: false,
        }
    }
}

/// Map rendering backend driven by the coordinator.
///
/// Location results are not returned from `locate`; the host delivers them
/// later through `MapViewCoordinator::on_location_found` and
/// `MapViewCoordinator::on_location_error`.
pub trait MapEngine {
    fn create_map(&mut self, center: LatLon, zoom: u8);
    /// Instantiate a layer without showing it
    fn create_layer(&mut self, layer: MapLayer) -> LayerHandle;
    fn add_to_map(&mut self, layer: LayerHandle);
    fn remove_from_map(&mut self, layer: LayerHandle);
    fn set_opacity(&mut self, layer: LayerHandle, opacity: f64);
    fn fit_bounds(&mut self, bounds: &Bounds);
    fn locate(&mut self, options: &LocateOptions);
    fn stop_locate(&mut self);
    fn add_control(&mut self, control: Control) -> ControlHandle;
    fn control_add_overlay(&mut self, control: ControlHandle, name: &str, layer: LayerHandle);
    fn control_remove_overlay(&mut self, control: ControlHandle, layer: LayerHandle);
    /// User visible alert
    fn notify_user(&mut self, message: &str);
}

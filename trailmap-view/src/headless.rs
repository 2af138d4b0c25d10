//
// Copyright (c) Pirmin Kalberer. All rights reserved.
// Licensed under the MIT License. See LICENSE file in the project root for full license information.
//

//! Map engine without rendering. Keeps the resulting map state and logs every mutation.

use crate::engine::{Control, ControlHandle, LocateOptions, MapEngine};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use trailmap_core::layer::{LayerHandle, MapLayer};
use trailmap_core::{Bounds, LatLon};

#[derive(Default)]
pub struct HeadlessEngine {
    pub center: Option<LatLon>,
    pub zoom: u8,
    pub view_bounds: Option<Bounds>,
    pub layers: BTreeMap<LayerHandle, MapLayer>,
    pub on_map: BTreeSet<LayerHandle>,
    pub opacity: BTreeMap<LayerHandle, f64>,
    pub controls: BTreeMap<ControlHandle, Control>,
    /// Location requests issued
    pub locate_requests: Vec<LocateOptions>,
    pub locating: bool,
    pub notifications: Vec<String>,
    next_id: u64,
}

impl HeadlessEngine {
    pub fn new() -> Self {
        HeadlessEngine::default()
    }
    fn next_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }
    /// Layers currently shown, of the given kind
    pub fn visible(&self, kind: &str) -> Vec<LayerHandle> {
        self.on_map
            .iter()
            .filter(|handle| self.layers.get(handle).map(|l| l.kind()) == Some(kind))
            .cloned()
            .collect()
    }
    pub fn layer(&self, handle: LayerHandle) -> Option<&MapLayer> {
        self.layers.get(&handle)
    }
    /// Effective opacity of a layer (1.0 unless changed)
    pub fn layer_opacity(&self, handle: LayerHandle) -> f64 {
        if let Some(opacity) = self.opacity.get(&handle) {
            return *opacity;
        }
        match self.layers.get(&handle) {
            Some(MapLayer::Raster(raster)) => raster.opacity,
            _ => 1.0,
        }
    }
    /// Overlay entries of a layer control
    pub fn control_overlays(&self, control: ControlHandle) -> Vec<String> {
        match self.controls.get(&control) {
            Some(Control::Layers(lc)) => lc.overlays.iter().map(|(n, _)| n.clone()).collect(),
            _ => Vec::new(),
        }
    }
    fn log_base_tile(&self, handle: LayerHandle) {
        if let (Some(MapLayer::Tile(source)), Some(center)) = (self.layers.get(&handle), self.center)
        {
            match source.tile_url_at(&center, self.zoom) {
                Some(url) => info!("{} center tile {}", source.name, url),
                None => debug!("{} has no tile at {}", source.name, center),
            }
        }
    }
}

impl MapEngine for HeadlessEngine {
    fn create_map(&mut self, center: LatLon, zoom: u8) {
        info!("create map at {} zoom {}", center, zoom);
        self.center = Some(center);
        self.zoom = zoom;
    }
    fn create_layer(&mut self, layer: MapLayer) -> LayerHandle {
        let handle = LayerHandle(self.next_id());
        debug!("create {} layer {}", layer.kind(), handle);
        self.layers.insert(handle, layer);
        handle
    }
    fn add_to_map(&mut self, layer: LayerHandle) {
        debug!("add layer {}", layer);
        self.on_map.insert(layer);
        self.log_base_tile(layer);
    }
    fn remove_from_map(&mut self, layer: LayerHandle) {
        debug!("remove layer {}", layer);
        self.on_map.remove(&layer);
    }
    fn set_opacity(&mut self, layer: LayerHandle, opacity: f64) {
        debug!("layer {} opacity {}", layer, opacity);
        self.opacity.insert(layer, opacity);
    }
    /// Zoom is left as is; a rendering engine derives it from the bounds and its viewport
    fn fit_bounds(&mut self, bounds: &Bounds) {
        info!("fit bounds {}", bounds);
        self.center = Some(bounds.center());
        self.view_bounds = Some(bounds.clone());
    }
    fn locate(&mut self, options: &LocateOptions) {
        info!(
            "locate (set_view: {}, max_zoom: {}, watch: {})",
            options.set_view, options.max_zoom, options.watch
        );
        self.locate_requests.push(options.clone());
        self.locating = true;
    }
    fn stop_locate(&mut self) {
        debug!("stop locate");
        self.locating = false;
    }
    fn add_control(&mut self, control: Control) -> ControlHandle {
        let handle = ControlHandle(self.next_id());
        debug!("add {} {:?}", handle, control);
        self.controls.insert(handle, control);
        handle
    }
    fn control_add_overlay(&mut self, control: ControlHandle, name: &str, layer: LayerHandle) {
        match self.controls.get_mut(&control) {
            Some(Control::Layers(lc)) => {
                info!("{}: overlay '{}' added", control, name);
                lc.overlays.push((name.to_string(), layer));
            }
            _ => warn!("{} is not a layer control", control),
        }
    }
    fn control_remove_overlay(&mut self, control: ControlHandle, layer: LayerHandle) {
        match self.controls.get_mut(&control) {
            Some(Control::Layers(lc)) => {
                info!("{}: overlay {} removed", control, layer);
                lc.overlays.retain(|(_, entry)| *entry != layer);
            }
            _ => warn!("{} is not a layer control", control),
        }
    }
    fn notify_user(&mut self, message: &str) {
        warn!("ALERT: {}", message);
        self.notifications.push(message.to_string());
    }
}

impl fmt::Display for HeadlessEngine {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.center {
            Some(center) => writeln!(f, "center: {} zoom: {}", center, self.zoom)?,
            None => writeln!(f, "no map")?,
        }
        if let Some(ref bounds) = self.view_bounds {
            writeln!(f, "bounds: {}", bounds)?;
        }
        for handle in &self.on_map {
            match self.layers.get(handle) {
                Some(MapLayer::Tile(source)) => writeln!(f, "{} tiles '{}'", handle, source.name)?,
                Some(MapLayer::Raster(raster)) => writeln!(
                    f,
                    "{} raster {}x{} opacity {}",
                    handle,
                    raster.raster.width,
                    raster.raster.height,
                    self.layer_opacity(*handle)
                )?,
                Some(MapLayer::Vector(vector)) => writeln!(
                    f,
                    "{} vector {} features",
                    handle,
                    vector.features.len()
                )?,
                Some(MapLayer::Location(marker)) => writeln!(
                    f,
                    "{} location {} radius {}m",
                    handle, marker.position, marker.radius
                )?,
                None => writeln!(f, "{} unknown", handle)?,
            }
        }
        Ok(())
    }
}

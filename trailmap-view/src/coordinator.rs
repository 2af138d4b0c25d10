//
// Copyright (c) Pirmin Kalberer. All rights reserved.
// Licensed under the MIT License. See LICENSE file in the project root for full license information.
//

use crate::engine::{
    Control, ControlHandle, ControlPosition, LayerControl, LocateOptions, MapEngine,
    OpacitySlider,
};
use crate::registry::LayerRegistry;
use crate::source::{load_markers, load_raster, Fetcher, OverlayLoad};
use crate::tracking::TrackingState;
use crate::view::MapView;
use futures::stream::{FuturesUnordered, StreamExt};
use futures::FutureExt;
use trailmap_core::config::ApplicationCfg;
use trailmap_core::feature::{FeatureCollection, MarkerOptions};
use trailmap_core::layer::{
    LayerHandle, LocationFix, LocationMarker, MapLayer, RasterLayer, VectorLayer,
};
use trailmap_core::raster::{GeoRaster, RasterDecoder, RasterOptions};
use trailmap_core::tile_source::TileSource;
use trailmap_core::{Config, LatLon, LoadError, LocationError};

pub const LOCATION_ERROR_MESSAGE: &str = "Location access denied or unavailable.";
pub const OPACITY_SLIDER_ID: &str = "opacity-slider";
/// Slider granularity. Values set programmatically are not snapped.
const OPACITY_STEP: f64 = 0.1;

/// Layer control layout
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum OverlayControlMode {
    /// One combined collapsed control, overlays appended as they load
    Static,
    /// "Basemaps" and "Layers" controls, always expanded
    Dynamic,
}

/// Startup parameters of a map view
#[derive(Clone, Debug)]
pub struct MapSettings {
    pub center: LatLon,
    pub zoom: u8,
    pub base_layers: Vec<TileSource>,
    pub default_base: Option<String>,
    pub control_mode: OverlayControlMode,
    pub locate: LocateOptions,
}

impl<'a> Config<'a, ApplicationCfg> for MapSettings {
    fn from_config(config: &ApplicationCfg) -> Result<Self, String> {
        let control_mode = match config.map.overlay_control.as_str() {
            "static" => OverlayControlMode::Static,
            "dynamic" => OverlayControlMode::Dynamic,
            mode => return Err(format!("Unexpected overlay_control value '{}'", mode)),
        };
        let base_layers = config
            .baselayers
            .iter()
            .map(TileSource::from_config)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(MapSettings {
            center: LatLon::from(config.map.center),
            zoom: config.map.zoom,
            base_layers,
            default_base: config.map.default_baselayer.clone(),
            control_mode,
            locate: LocateOptions {
                set_view: config.geolocation.set_view,
                max_zoom: config.geolocation.maxzoom,
                watch: config.geolocation.watch,
            },
        })
    }
    fn gen_config() -> String {
        let toml = r#"
[map]
center = [36.52347, -118.26239]
zoom = 13
#default_baselayer = "OpenStreetMap"
#overlay_control = "dynamic"

[geolocation]
button = "locate-btn"
maxzoom = 16
#set_view = true
#watch = false
"#;
        toml.to_string()
    }
}

/// Raster overlay with its live opacity
#[derive(Clone, Debug, PartialEq)]
pub struct RasterOverlay {
    pub name: String,
    pub layer: LayerHandle,
    pub opacity: f64,
    pub slider: Option<ControlHandle>,
}

/// Owns one map instance and keeps layers, controls and tracking consistent.
pub struct MapViewCoordinator<E: MapEngine> {
    engine: E,
    view: MapView,
    registry: LayerRegistry,
    tracking: TrackingState,
    control_mode: OverlayControlMode,
    locate_options: LocateOptions,
    base_control: ControlHandle,
    overlay_control: ControlHandle,
    raster: Option<RasterOverlay>,
}

impl<E: MapEngine> MapViewCoordinator<E> {
    /// Create the map, all base layers and the layer controls
    pub fn new(mut engine: E, settings: MapSettings) -> Result<Self, String> {
        let default_base = match settings.default_base {
            Some(ref name) => name.clone(),
            None => settings
                .base_layers
                .first()
                .map(|source| source.name.clone())
                .ok_or_else(|| "No base layer configured".to_string())?,
        };
        if !settings.base_layers.iter().any(|s| s.name == default_base) {
            return Err(format!("Unknown default base layer '{}'", default_base));
        }

        engine.create_map(settings.center, settings.zoom);
        let mut view = MapView::new(settings.center, settings.zoom);
        let mut registry = LayerRegistry::new();
        for source in settings.base_layers {
            let name = source.name.clone();
            let layer = engine.create_layer(MapLayer::Tile(source));
            if !registry.add_base(&name, layer) {
                return Err(format!("Duplicate base layer '{}'", name));
            }
        }
        if let Some(layer) = registry.base(&default_base) {
            engine.add_to_map(layer);
            view.active_base = Some(default_base.clone());
        }

        let (base_control, overlay_control) = match settings.control_mode {
            OverlayControlMode::Static => {
                let control = engine.add_control(Control::Layers(LayerControl {
                    position: ControlPosition::TopLeft,
                    collapsed: true,
                    title: None,
                    base_layers: registry.base_layers().to_vec(),
                    overlays: Vec::new(),
                }));
                (control, control)
            }
            OverlayControlMode::Dynamic => {
                let base_control = engine.add_control(Control::Layers(LayerControl {
                    position: ControlPosition::TopLeft,
                    collapsed: false,
                    title: Some("Basemaps".to_string()),
                    base_layers: registry.base_layers().to_vec(),
                    overlays: Vec::new(),
                }));
                let overlay_control = engine.add_control(Control::Layers(LayerControl {
                    position: ControlPosition::TopRight,
                    collapsed: false,
                    title: Some("Layers".to_string()),
                    base_layers: Vec::new(),
                    overlays: Vec::new(),
                }));
                (base_control, overlay_control)
            }
        };
        info!(
            "Map created at {} zoom {} with base layer '{}'",
            view.center, view.zoom, default_base
        );

        Ok(MapViewCoordinator {
            engine,
            view,
            registry,
            tracking: TrackingState::Idle,
            control_mode: settings.control_mode,
            locate_options: settings.locate,
            base_control,
            overlay_control,
            raster: None,
        })
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }
    pub fn engine_mut(&mut self) -> &mut E {
        &mut self.engine
    }
    pub fn view(&self) -> &MapView {
        &self.view
    }
    pub fn registry(&self) -> &LayerRegistry {
        &self.registry
    }
    pub fn tracking(&self) -> TrackingState {
        self.tracking
    }
    pub fn control_mode(&self) -> OverlayControlMode {
        self.control_mode
    }
    pub fn raster(&self) -> Option<&RasterOverlay> {
        self.raster.as_ref()
    }
    pub fn base_control(&self) -> ControlHandle {
        self.base_control
    }
    pub fn overlay_control(&self) -> ControlHandle {
        self.overlay_control
    }

    /// Register an overlay in the registry and the visible overlay control.
    /// A name already registered is left untouched.
    pub fn add_overlay(&mut self, name: &str, layer: LayerHandle, visible: bool) -> bool {
        if !self.registry.add_overlay(name, layer) {
            warn!("Overlay '{}' already registered", name);
            return false;
        }
        self.engine
            .control_add_overlay(self.overlay_control, name, layer);
        if visible {
            self.view.active_overlays.insert(name.to_string());
        }
        debug!("Overlay '{}' registered as {}", name, layer);
        true
    }

    /// Remove an overlay from the map, the registry and the overlay control
    pub fn remove_overlay(&mut self, name: &str) -> bool {
        let layer = match self.registry.remove_overlay(name) {
            Some(layer) => layer,
            None => {
                warn!("Unknown overlay '{}'", name);
                return false;
            }
        };
        if self.view.active_overlays.remove(name) {
            self.engine.remove_from_map(layer);
        }
        self.engine
            .control_remove_overlay(self.overlay_control, layer);
        if self.raster.as_ref().map(|r| r.layer) == Some(layer) {
            self.raster = None;
        }
        info!("Overlay '{}' removed", name);
        true
    }

    /// Switch the active base layer
    pub fn select_base_layer(&mut self, name: &str) -> bool {
        let layer = match self.registry.base(name) {
            Some(layer) => layer,
            None => {
                warn!("Unknown base layer '{}'", name);
                return false;
            }
        };
        if self.view.active_base.as_deref() == Some(name) {
            return true;
        }
        let current = match self.view.active_base {
            Some(ref active) => self.registry.base(active),
            None => None,
        };
        if let Some(current) = current {
            self.engine.remove_from_map(current);
        }
        self.engine.add_to_map(layer);
        self.view.active_base = Some(name.to_string());
        info!("Base layer '{}' selected", name);
        true
    }

    /// Show or hide a registered overlay
    pub fn set_overlay_visible(&mut self, name: &str, visible: bool) -> bool {
        let layer = match self.registry.overlay(name) {
            Some(layer) => layer,
            None => {
                warn!("Unknown overlay '{}'", name);
                return false;
            }
        };
        let shown = self.view.active_overlays.contains(name);
        if visible && !shown {
            self.engine.add_to_map(layer);
            self.view.active_overlays.insert(name.to_string());
        } else if !visible && shown {
            self.engine.remove_from_map(layer);
            self.view.active_overlays.remove(name);
        }
        true
    }

    /// Geolocation button handler
    pub fn toggle_tracking(&mut self) {
        match self.tracking {
            TrackingState::Idle => {
                debug!("Requesting location {:?}", self.locate_options);
                self.engine.locate(&self.locate_options);
                self.tracking = TrackingState::Locating;
            }
            TrackingState::Locating => {
                self.engine.stop_locate();
                self.tracking = TrackingState::Idle;
                debug!("Location request cancelled");
            }
            TrackingState::Tracking(layer) => {
                self.engine.remove_from_map(layer);
                self.engine.stop_locate();
                self.tracking = TrackingState::Idle;
                info!("Location tracking stopped");
            }
        }
    }

    /// Replace the location layer with one for the new fix.
    /// Fixes arriving while tracking is off are ignored.
    pub fn on_location_found(&mut self, fix: LocationFix) -> bool {
        if !self.tracking.is_active() {
            debug!("Ignoring location {} received while idle", fix.position);
            return false;
        }
        if !fix.accuracy.is_finite() || fix.accuracy < 0.0 {
            warn!(
                "Ignoring location {} with accuracy {}",
                fix.position, fix.accuracy
            );
            return false;
        }
        if let Some(previous) = self.tracking.location_layer() {
            self.engine.remove_from_map(previous);
        }
        let marker = LocationMarker::from_fix(&fix);
        info!("Location {}: {}", fix.position, marker.popup);
        let layer = self.engine.create_layer(MapLayer::Location(marker));
        self.engine.add_to_map(layer);
        self.tracking = TrackingState::Tracking(layer);
        if self.locate_options.set_view {
            self.view
                .recenter(fix.position, self.locate_options.max_zoom);
        }
        true
    }

    /// Alert the user. A pending request without any fix falls back to idle.
    pub fn on_location_error(&mut self, error: &LocationError) {
        warn!("Location error: {}", error);
        self.engine.notify_user(LOCATION_ERROR_MESSAGE);
        if self.tracking == TrackingState::Locating {
            self.tracking = TrackingState::Idle;
        }
    }

    /// Opacity slider handler. Clamps to 0.0 - 1.0 and only touches the raster layer.
    pub fn set_raster_opacity(&mut self, value: f64) -> bool {
        if value.is_nan() {
            return false;
        }
        let raster = match self.raster.as_mut() {
            Some(raster) => raster,
            None => {
                warn!("No raster overlay loaded");
                return false;
            }
        };
        let opacity = value.max(0.0).min(1.0);
        raster.opacity = opacity;
        self.engine.set_opacity(raster.layer, opacity);
        debug!("Raster '{}' opacity {}", raster.name, opacity);
        true
    }

    /// Insert a loaded raster overlay, or report the failure.
    ///
    /// Refits the view to the raster extent when `fit_bounds` is set,
    /// overriding the initial center and zoom.
    pub fn incorporate_raster(
        &mut self,
        options: &RasterOptions,
        result: Result<GeoRaster, LoadError>,
    ) -> bool {
        let raster = match result {
            Ok(raster) => raster,
            Err(e) => {
                error!(
                    "Error loading raster '{}' from {}: {}",
                    options.name,
                    options.location,
                    e.cause()
                );
                return false;
            }
        };
        if self.registry.overlay(&options.name).is_some() {
            warn!("Overlay '{}' already registered", options.name);
            return false;
        }
        let bounds = raster.bounds.clone();
        let layer = self.engine.create_layer(MapLayer::Raster(RasterLayer {
            raster,
            opacity: options.opacity,
            resolution: options.resolution,
        }));
        self.engine.add_to_map(layer);
        if options.fit_bounds {
            self.engine.fit_bounds(&bounds);
            self.view.fit(&bounds);
            info!("View fitted to raster '{}' extent {}", options.name, bounds);
        }
        self.add_overlay(&options.name, layer, true);
        let slider = if options.opacity_control {
            Some(self.engine.add_control(Control::Opacity(OpacitySlider {
                id: OPACITY_SLIDER_ID.to_string(),
                label: "TIFF Opacity".to_string(),
                position: ControlPosition::TopRight,
                min: 0.0,
                max: 1.0,
                step: OPACITY_STEP,
                value: options.opacity,
            })))
        } else {
            None
        };
        self.raster = Some(RasterOverlay {
            name: options.name.clone(),
            layer,
            opacity: options.opacity,
            slider,
        });
        true
    }

    /// Insert a loaded marker overlay, or report the failure
    pub fn incorporate_markers(
        &mut self,
        options: &MarkerOptions,
        result: Result<FeatureCollection, LoadError>,
    ) -> bool {
        let features = match result {
            Ok(features) => features,
            Err(e) => {
                error!(
                    "Error loading markers '{}' from {}: {}",
                    options.name,
                    options.location,
                    e.cause()
                );
                return false;
            }
        };
        if self.registry.overlay(&options.name).is_some() {
            warn!("Overlay '{}' already registered", options.name);
            return false;
        }
        let vector = VectorLayer::new(features);
        info!(
            "Markers '{}': {} features, {} popups",
            options.name,
            vector.features.len(),
            vector.popup_count()
        );
        let layer = self.engine.create_layer(MapLayer::Vector(vector));
        self.engine.add_to_map(layer);
        self.add_overlay(&options.name, layer, true)
    }

    pub fn incorporate(
        &mut self,
        load: OverlayLoad,
        raster: Option<&RasterOptions>,
        markers: Option<&MarkerOptions>,
    ) -> bool {
        match (load, raster, markers) {
            (OverlayLoad::Raster(result), Some(options), _) => {
                self.incorporate_raster(options, result)
            }
            (OverlayLoad::Markers(result), _, Some(options)) => {
                self.incorporate_markers(options, result)
            }
            (load, _, _) => {
                warn!("Overlay load without source options: {:?}", load);
                false
            }
        }
    }

    /// Load all overlay sources concurrently and insert each one as soon as it
    /// completes. Completion order is not defined.
    pub async fn load_overlays<F, D>(
        &mut self,
        fetcher: &F,
        decoder: &D,
        raster: Option<&RasterOptions>,
        markers: Option<&MarkerOptions>,
    ) where
        F: Fetcher + ?Sized,
        D: RasterDecoder + ?Sized,
    {
        let mut pending = overlay_loads(fetcher, decoder, raster, markers);
        while let Some(load) = pending.next().await {
            self.incorporate(load, raster, markers);
        }
    }
}

/// Pending overlay pipelines, one per configured source
pub fn overlay_loads<'a, F, D>(
    fetcher: &'a F,
    decoder: &'a D,
    raster: Option<&'a RasterOptions>,
    markers: Option<&'a MarkerOptions>,
) -> FuturesUnordered<futures::future::LocalBoxFuture<'a, OverlayLoad>>
where
    F: Fetcher + ?Sized,
    D: RasterDecoder + ?Sized,
{
    let pending = FuturesUnordered::new();
    if let Some(options) = raster {
        pending.push(
            async move { OverlayLoad::Raster(load_raster(fetcher, decoder, options).await) }
                .boxed_local(),
        );
    }
    if let Some(options) = markers {
        pending.push(
            async move { OverlayLoad::Markers(load_markers(fetcher, options).await) }
                .boxed_local(),
        );
    }
    pending
}

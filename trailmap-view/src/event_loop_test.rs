//
// Copyright (c) Pirmin Kalberer. All rights reserved.
// Licensed under the MIT License. See LICENSE file in the project root for full license information.
//

use crate::coordinator::{MapViewCoordinator, OverlayControlMode};
use crate::coordinator_test::{
    lidar_bounds, marker_options, raster_options, settings, MemoryFetcher, StubDecoder,
    MARKERS_JSON,
};
use crate::event_loop::{run, ParseEventError, UiEvent};
use crate::headless::HeadlessEngine;
use crate::source::Fetcher;
use crate::tracking::TrackingState;
use futures::future::BoxFuture;
use futures::FutureExt;
use std::sync::Arc;
use tokio::sync::{mpsc, Notify};
use trailmap_core::layer::LocationFix;
use trailmap_core::{LatLon, LoadError, LocationError};

/// Holds back one location until the gate is opened
struct GatedFetcher {
    inner: MemoryFetcher,
    gated: String,
    gate: Arc<Notify>,
}

impl Fetcher for GatedFetcher {
    fn fetch<'a>(&'a self, location: &'a str) -> BoxFuture<'a, Result<Vec<u8>, LoadError>> {
        async move {
            if location == self.gated {
                self.gate.notified().await;
            }
            self.inner.fetch(location).await
        }
        .boxed()
    }
}

fn fetcher() -> MemoryFetcher {
    MemoryFetcher::default()
        .with("./imagery/lidar.tiff", b"II*\0lidar")
        .with("./markers/markers.geojson", MARKERS_JSON.as_bytes())
}

fn decoder() -> StubDecoder {
    StubDecoder {
        bounds: lidar_bounds(),
    }
}

fn coordinator() -> MapViewCoordinator<HeadlessEngine> {
    MapViewCoordinator::new(HeadlessEngine::new(), settings(OverlayControlMode::Dynamic)).unwrap()
}

#[test]
fn test_parse_events() {
    assert_eq!("locate".parse::<UiEvent>(), Ok(UiEvent::ToggleTracking));
    assert_eq!(
        " base Scanned Topos ".parse::<UiEvent>(),
        Ok(UiEvent::SelectBaseLayer("Scanned Topos".to_string()))
    );
    assert_eq!(
        "overlay Lidar TIFF off".parse::<UiEvent>(),
        Ok(UiEvent::SetOverlayVisible("Lidar TIFF".to_string(), false))
    );
    assert_eq!(
        "overlay Markers on".parse::<UiEvent>(),
        Ok(UiEvent::SetOverlayVisible("Markers".to_string(), true))
    );
    assert_eq!("opacity 0.3".parse::<UiEvent>(), Ok(UiEvent::SetOpacity(0.3)));
    assert_eq!(
        "fix 36.53 -118.25 20".parse::<UiEvent>(),
        Ok(UiEvent::LocationFound(LocationFix {
            position: LatLon::new(36.53, -118.25),
            accuracy: 20.0,
        }))
    );
    assert_eq!(
        "fixerror".parse::<UiEvent>(),
        Ok(UiEvent::LocationError(LocationError::new(
            LocationError::POSITION_UNAVAILABLE,
            "Position unavailable"
        )))
    );
    assert_eq!("state".parse::<UiEvent>(), Ok(UiEvent::PrintState));
    assert_eq!("quit".parse::<UiEvent>(), Ok(UiEvent::Quit));
}

#[test]
fn test_parse_errors() {
    let err = |line: &str| line.parse::<UiEvent>().unwrap_err().to_string();
    assert_eq!(err("overlay Markers"), "Usage: overlay <name> on|off");
    assert_eq!(err("opacity high"), "Error parsing 'opacity' as float value");
    assert_eq!(err("fix 36.53"), "Missing lon");
    assert_eq!(err("zoom 3"), "Unknown command 'zoom 3'");
    assert_eq!(err("base"), "Unknown command 'base'");
    assert_eq!(
        "".parse::<UiEvent>(),
        Err(ParseEventError("Unknown command ''".to_string()))
    );
}

#[test]
fn test_handle_event() {
    let mut map = coordinator();
    assert!(map.handle_event(UiEvent::ToggleTracking));
    assert!(map.handle_event("fix 36.53 -118.25 20".parse().unwrap()));
    assert!(map.tracking().location_layer().is_some());
    assert!(map.handle_event(UiEvent::SelectBaseLayer("Scanned Topos".to_string())));
    assert_eq!(map.view().active_base, Some("Scanned Topos".to_string()));
    assert!(map.handle_event(UiEvent::SetOpacity(0.3)));
    assert!(map.handle_event(UiEvent::PrintState));
    assert!(!map.handle_event(UiEvent::Quit));
}

#[tokio::test]
async fn test_run_loads_on_close() {
    let mut map = coordinator();
    let (tx, rx) = mpsc::unbounded_channel();
    drop(tx);
    run(
        &mut map,
        &fetcher(),
        &decoder(),
        Some(&raster_options()),
        Some(&marker_options()),
        rx,
    )
    .await;
    let mut names = map.registry().overlay_names();
    names.sort();
    assert_eq!(names, vec!["Lidar TIFF", "Markers"]);
}

#[tokio::test]
async fn test_run_interleaved() {
    let mut map = coordinator();
    let gate = Arc::new(Notify::new());
    let fetcher = GatedFetcher {
        inner: fetcher(),
        gated: "./imagery/lidar.tiff".to_string(),
        gate: gate.clone(),
    };
    let decoder = decoder();
    let raster = raster_options();
    let markers = marker_options();
    let (tx, rx) = mpsc::unbounded_channel();

    let driver = async move {
        // the user interacts while the raster is still loading
        tx.send(UiEvent::ToggleTracking).unwrap();
        tx.send("fix 36.53 -118.25 20".parse().unwrap()).unwrap();
        tx.send(UiEvent::SetOpacity(0.8)).unwrap();
        for _ in 0..5 {
            tokio::task::yield_now().await;
        }
        gate.notify_one();
        for _ in 0..5 {
            tokio::task::yield_now().await;
        }
        tx.send(UiEvent::SetOpacity(0.3)).unwrap();
    };
    tokio::join!(
        run(&mut map, &fetcher, &decoder, Some(&raster), Some(&markers), rx),
        driver
    );

    assert!(matches!(map.tracking(), TrackingState::Tracking(_)));
    let overlay = map.raster().expect("raster overlay");
    assert_eq!(overlay.opacity, 0.3);
    assert_eq!(map.engine().layer_opacity(overlay.layer), 0.3);
    assert_eq!(map.view().view_bounds, Some(lidar_bounds()));
    assert!(map.registry().overlay("Markers").is_some());
}

#[tokio::test]
async fn test_run_quit() {
    let mut map = coordinator();
    let fetcher = GatedFetcher {
        inner: fetcher(),
        gated: "./imagery/lidar.tiff".to_string(),
        gate: Arc::new(Notify::new()),
    };
    let (tx, rx) = mpsc::unbounded_channel();
    tx.send(UiEvent::Quit).unwrap();
    // the gate never opens, quitting must not wait for the raster
    run(
        &mut map,
        &fetcher,
        &decoder(),
        Some(&raster_options()),
        Some(&marker_options()),
        rx,
    )
    .await;
    assert!(map.raster().is_none());
    assert_eq!(map.engine().visible("tile").len(), 1);
}

//
// Copyright (c) Pirmin Kalberer. All rights reserved.
// Licensed under the MIT License. See LICENSE file in the project root for full license information.
//

//! Single-threaded event loop interleaving UI events with overlay loads

use crate::coordinator::{overlay_loads, MapViewCoordinator};
use crate::engine::MapEngine;
use crate::source::Fetcher;
use futures::StreamExt;
use std::fmt;
use std::str::FromStr;
use tokio::sync::mpsc::UnboundedReceiver;
use trailmap_core::feature::MarkerOptions;
use trailmap_core::layer::LocationFix;
use trailmap_core::raster::{RasterDecoder, RasterOptions};
use trailmap_core::{LatLon, LocationError};

/// User interaction or platform callback
#[derive(Clone, Debug, PartialEq)]
pub enum UiEvent {
    /// Geolocation button click
    ToggleTracking,
    SelectBaseLayer(String),
    SetOverlayVisible(String, bool),
    SetOpacity(f64),
    LocationFound(LocationFix),
    LocationError(LocationError),
    PrintState,
    Quit,
}

#[derive(Debug, PartialEq)]
pub struct ParseEventError(pub String);

impl fmt::Display for ParseEventError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

fn parse_f64(value: Option<&str>, what: &str) -> Result<f64, ParseEventError> {
    value
        .ok_or_else(|| ParseEventError(format!("Missing {}", what)))?
        .parse::<f64>()
        .map_err(|_| ParseEventError(format!("Error parsing '{}' as float value", what)))
}

impl FromStr for UiEvent {
    type Err = ParseEventError;

    /// Parse a command line like `locate`, `base Cal Topo` or `fix 36.5 -118.2 20`
    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        let (cmd, args) = match line.find(char::is_whitespace) {
            Some(pos) => (&line[..pos], line[pos..].trim()),
            None => (line, ""),
        };
        match cmd {
            "locate" => Ok(UiEvent::ToggleTracking),
            "base" if !args.is_empty() => Ok(UiEvent::SelectBaseLayer(args.to_string())),
            "overlay" => {
                let (name, state) = match args.rfind(char::is_whitespace) {
                    Some(pos) => (args[..pos].trim(), &args[pos + 1..]),
                    None => (args, ""),
                };
                match state {
                    "on" => Ok(UiEvent::SetOverlayVisible(name.to_string(), true)),
                    "off" => Ok(UiEvent::SetOverlayVisible(name.to_string(), false)),
                    _ => Err(ParseEventError(
                        "Usage: overlay <name> on|off".to_string(),
                    )),
                }
            }
            "opacity" => Ok(UiEvent::SetOpacity(parse_f64(Some(args), "opacity")?)),
            "fix" => {
                let mut values = args.split_whitespace();
                let lat = parse_f64(values.next(), "lat")?;
                let lon = parse_f64(values.next(), "lon")?;
                let accuracy = parse_f64(values.next(), "accuracy")?;
                Ok(UiEvent::LocationFound(LocationFix {
                    position: LatLon::new(lat, lon),
                    accuracy,
                }))
            }
            "fixerror" => Ok(UiEvent::LocationError(LocationError::new(
                LocationError::POSITION_UNAVAILABLE,
                if args.is_empty() {
                    "Position unavailable"
                } else {
                    args
                },
            ))),
            "state" => Ok(UiEvent::PrintState),
            "quit" | "exit" => Ok(UiEvent::Quit),
            _ => Err(ParseEventError(format!("Unknown command '{}'", line))),
        }
    }
}

impl<E: MapEngine> MapViewCoordinator<E> {
    /// Apply one UI event. Returns false when the loop should stop.
    pub fn handle_event(&mut self, event: UiEvent) -> bool {
        match event {
            UiEvent::ToggleTracking => self.toggle_tracking(),
            UiEvent::SelectBaseLayer(name) => {
                self.select_base_layer(&name);
            }
            UiEvent::SetOverlayVisible(name, visible) => {
                self.set_overlay_visible(&name, visible);
            }
            UiEvent::SetOpacity(value) => {
                self.set_raster_opacity(value);
            }
            UiEvent::LocationFound(fix) => {
                self.on_location_found(fix);
            }
            UiEvent::LocationError(error) => self.on_location_error(&error),
            UiEvent::PrintState => info!(
                "tracking: {:?}, base: {:?}, overlays: {:?}",
                self.tracking(),
                self.view().active_base,
                self.view().active_overlays
            ),
            UiEvent::Quit => return false,
        }
        true
    }
}

/// Run until the event channel closes or `Quit` arrives.
/// Overlay loads keep completing while events are processed.
pub async fn run<E, F, D>(
    coordinator: &mut MapViewCoordinator<E>,
    fetcher: &F,
    decoder: &D,
    raster: Option<&RasterOptions>,
    markers: Option<&MarkerOptions>,
    mut events: UnboundedReceiver<UiEvent>,
) where
    E: MapEngine,
    F: Fetcher + ?Sized,
    D: RasterDecoder + ?Sized,
{
    let mut pending = overlay_loads(fetcher, decoder, raster, markers);
    loop {
        tokio::select! {
            Some(load) = pending.next(), if !pending.is_empty() => {
                coordinator.incorporate(load, raster, markers);
            }
            event = events.recv() => match event {
                Some(event) => {
                    if !coordinator.handle_event(event) {
                        break;
                    }
                }
                None => {
                    // Input closed: finish outstanding loads
                    while let Some(load) = pending.next().await {
                        coordinator.incorporate(load, raster, markers);
                    }
                    break;
                }
            },
        }
    }
    debug!("Event loop finished");
}

//
// Copyright (c) Pirmin Kalberer. All rights reserved.
// Licensed under the MIT License. See LICENSE file in the project root for full license information.
//

use trailmap_core::layer::LayerHandle;

/// Geolocation toggle state.
///
/// `Locating` is already "on" from the toggle's point of view, although no
/// location layer exists before the first fix arrives.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum TrackingState {
    Idle,
    Locating,
    Tracking(LayerHandle),
}

impl Default for TrackingState {
    fn default() -> Self {
        TrackingState::Idle
    }
}

impl TrackingState {
    pub fn is_active(&self) -> bool {
        *self != TrackingState::Idle
    }
    /// The owned marker and accuracy circle group
    pub fn location_layer(&self) -> Option<LayerHandle> {
        match self {
            TrackingState::Tracking(layer) => Some(*layer),
            _ => None,
        }
    }
}

//
// Copyright (c) Pirmin Kalberer. All rights reserved.
// Licensed under the MIT License. See LICENSE file in the project root for full license information.
//

#[macro_use]
extern crate log;

pub mod coordinator;
pub mod engine;
pub mod event_loop;
pub mod headless;
pub mod registry;
pub mod source;
pub mod tracking;
pub mod view;

pub use coordinator::{MapSettings, MapViewCoordinator, OverlayControlMode};
pub use engine::MapEngine;

#[cfg(test)]
mod event_loop_test;
#[cfg(test)]
mod source_test;

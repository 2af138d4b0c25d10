//
// Copyright (c) Pirmin Kalberer. All rights reserved.
// Licensed under the MIT License. See LICENSE file in the project root for full license information.
//

use trailmap_core::layer::LayerHandle;

/// Named base layers and overlays, kept in registration order
#[derive(Clone, Debug, Default)]
pub struct LayerRegistry {
    base_layers: Vec<(String, LayerHandle)>,
    overlays: Vec<(String, LayerHandle)>,
}

fn lookup(entries: &[(String, LayerHandle)], name: &str) -> Option<LayerHandle> {
    entries
        .iter()
        .find(|(entry, _)| entry == name)
        .map(|(_, handle)| *handle)
}

impl LayerRegistry {
    pub fn new() -> Self {
        LayerRegistry::default()
    }
    /// Returns false if the name is taken
    pub fn add_base(&mut self, name: &str, layer: LayerHandle) -> bool {
        if self.base(name).is_some() {
            return false;
        }
        self.base_layers.push((name.to_string(), layer));
        true
    }
    /// Returns false if the name is taken
    pub fn add_overlay(&mut self, name: &str, layer: LayerHandle) -> bool {
        if self.overlay(name).is_some() {
            return false;
        }
        self.overlays.push((name.to_string(), layer));
        true
    }
    /// Drop an overlay entry, keeping the order of the others
    pub fn remove_overlay(&mut self, name: &str) -> Option<LayerHandle> {
        let pos = self.overlays.iter().position(|(entry, _)| entry == name)?;
        Some(self.overlays.remove(pos).1)
    }
    pub fn base(&self, name: &str) -> Option<LayerHandle> {
        lookup(&self.base_layers, name)
    }
    pub fn overlay(&self, name: &str) -> Option<LayerHandle> {
        lookup(&self.overlays, name)
    }
    pub fn base_layers(&self) -> &[(String, LayerHandle)] {
        &self.base_layers
    }
    pub fn overlays(&self) -> &[(String, LayerHandle)] {
        &self.overlays
    }
    pub fn overlay_names(&self) -> Vec<&str> {
        self.overlays.iter().map(|(name, _)| name.as_str()).collect()
    }
}

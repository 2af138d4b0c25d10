//
// Copyright (c) Pirmin Kalberer. All rights reserved.
// Licensed under the MIT License. See LICENSE file in the project root for full license information.
//

use crate::config::{BaseLayerCfg, Config};
use crate::geo::{lonlat_to_merc, LatLon, MERC_HALF_EXTENT};

const SUBDOMAINS: [&str; 3] = ["a", "b", "c"];

/// Deepest zoom level with addressable tiles
pub const MAX_ZOOM: u8 = 30;

/// XYZ tile source descriptor of a base layer
#[derive(Clone, Debug, PartialEq)]
pub struct TileSource {
    pub name: String,
    /// URL template with {z}/{x}/{y} and optional {s} placeholders
    pub url: String,
    pub maxzoom: u8,
    /// Highest zoom with native tiles. Tiles above are scaled up from this level.
    pub maxnativezoom: u8,
    /// Do not repeat the world horizontally
    pub nowrap: bool,
    pub attribution: String,
}

/// Tile address in XYZ scheme
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TileCoord {
    pub z: u8,
    pub x: u32,
    pub y: u32,
}

impl TileSource {
    pub fn new(name: &str, url: &str) -> TileSource {
        TileSource {
            name: name.to_string(),
            url: url.to_string(),
            maxzoom: 18,
            maxnativezoom: 18,
            nowrap: false,
            attribution: String::new(),
        }
    }
    /// Tile containing `pos` at `zoom` (at most `MAX_ZOOM`), unscaled
    pub fn tile_at(&self, pos: &LatLon, zoom: u8) -> (i64, i64) {
        let zoom = zoom.min(MAX_ZOOM);
        let (x, y) = lonlat_to_merc(pos.lon, pos.lat);
        let n = (1u64 << zoom) as f64;
        let size = 2.0 * MERC_HALF_EXTENT / n;
        let xtile = ((x + MERC_HALF_EXTENT) / size).floor() as i64;
        let ytile = ((MERC_HALF_EXTENT - y) / size).floor() as i64;
        (xtile, ytile.max(0).min(n as i64 - 1))
    }
    /// Native tile to request for a tile at `zoom`.
    /// Returns None for zoom levels above maxzoom, rows outside the grid
    /// and columns outside the grid when wrapping is disabled.
    pub fn native_tile(&self, zoom: u8, x: i64, y: i64) -> Option<TileCoord> {
        if zoom > self.maxzoom || zoom > MAX_ZOOM {
            return None;
        }
        let n = 1i64 << zoom;
        if y < 0 || y >= n {
            return None;
        }
        let x = if x < 0 || x >= n {
            if self.nowrap {
                return None;
            }
            x.rem_euclid(n)
        } else {
            x
        };
        let z = zoom.min(self.maxnativezoom);
        let shift = zoom - z;
        Some(TileCoord {
            z,
            x: (x >> shift) as u32,
            y: (y >> shift) as u32,
        })
    }
    /// Expanded URL template for a tile at `zoom`
    pub fn tile_url(&self, zoom: u8, x: i64, y: i64) -> Option<String> {
        self.native_tile(zoom, x, y).map(|tile| {
            let subdomain = SUBDOMAINS[((tile.x + tile.y) as usize) % SUBDOMAINS.len()];
            self.url
                .replace("{s}", subdomain)
                .replace("{z}", &tile.z.to_string())
                .replace("{x}", &tile.x.to_string())
                .replace("{y}", &tile.y.to_string())
        })
    }
    /// URL of the tile covering `pos`
    pub fn tile_url_at(&self, pos: &LatLon, zoom: u8) -> Option<String> {
        let zoom = zoom.min(self.maxzoom);
        let (x, y) = self.tile_at(pos, zoom);
        self.tile_url(zoom, x, y)
    }
}

impl<'a> Config<'a, BaseLayerCfg> for TileSource {
    fn from_config(cfg: &BaseLayerCfg) -> Result<Self, String> {
        if cfg.name.is_empty() {
            return Err("Base layer name missing".to_string());
        }
        for placeholder in &["{z}", "{x}", "{y}"] {
            if !cfg.url.contains(placeholder) {
                return Err(format!(
                    "Base layer '{}': url template without {} placeholder",
                    cfg.name, placeholder
                ));
            }
        }
        if cfg.maxzoom > MAX_ZOOM {
            return Err(format!(
                "Base layer '{}': maxzoom {} above {}",
                cfg.name, cfg.maxzoom, MAX_ZOOM
            ));
        }
        let maxnativezoom = cfg.maxnativezoom.unwrap_or(cfg.maxzoom);
        if maxnativezoom > cfg.maxzoom {
            warn!(
                "Base layer '{}': maxnativezoom {} above maxzoom {}",
                cfg.name, maxnativezoom, cfg.maxzoom
            );
        }
        Ok(TileSource {
            name: cfg.name.clone(),
            url: cfg.url.clone(),
            maxzoom: cfg.maxzoom,
            maxnativezoom: maxnativezoom.min(cfg.maxzoom),
            nowrap: cfg.nowrap,
            attribution: cfg.attribution.clone(),
        })
    }
    fn gen_config() -> String {
        let toml = r#"
[[baselayer]]
name = "OpenStreetMap"
url = "https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png"
maxzoom = 18
#maxnativezoom = 18
#nowrap = false
attribution = "&copy; OpenStreetMap contributors"
"#;
        toml.to_string()
    }
}

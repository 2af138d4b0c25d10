//
// Copyright (c) Pirmin Kalberer. All rights reserved.
// Licensed under the MIT License. See LICENSE file in the project root for full license information.
//

//! GeoJSON features for marker overlays.
//! Geometries are passed through to the map engine unchanged.

use crate::config::{Config, MarkersCfg};
use crate::error::LoadError;
use serde_json::{Map, Value};

/// Marker overlay source
#[derive(Clone, Debug, PartialEq)]
pub struct MarkerOptions {
    pub name: String,
    pub location: String,
}

impl<'a> Config<'a, MarkersCfg> for MarkerOptions {
    fn from_config(cfg: &MarkersCfg) -> Result<Self, String> {
        Ok(MarkerOptions {
            name: cfg.name.clone(),
            location: cfg.path.clone(),
        })
    }
    fn gen_config() -> String {
        let toml = r#"
[markers]
name = "Markers"
path = "./markers/markers.geojson"
"#;
        toml.to_string()
    }
}

#[derive(Deserialize, Serialize, Clone, Debug, PartialEq)]
pub struct Feature {
    #[serde(default)]
    pub id: Option<Value>,
    pub geometry: Option<Value>,
    #[serde(default)]
    pub properties: Option<Map<String, Value>>,
}

#[derive(Serialize, Clone, Debug, PartialEq, Default)]
pub struct FeatureCollection {
    pub features: Vec<Feature>,
}

/// Text of a property as it would be shown in a popup.
/// Empty strings, zero, false and null count as absent.
fn property_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) if n.as_f64() != Some(0.0) => Some(n.to_string()),
        Value::Bool(true) => Some("true".to_string()),
        Value::Array(_) | Value::Object(_) => Some(value.to_string()),
        _ => None,
    }
}

impl Feature {
    fn property(&self, name: &str) -> Option<&Value> {
        self.properties.as_ref().and_then(|props| props.get(name))
    }
    pub fn name(&self) -> Option<String> {
        self.property("name").and_then(property_text)
    }
    pub fn description(&self) -> Option<String> {
        self.property("description").and_then(property_text)
    }
    /// Popup content, bound only to features with a description
    pub fn popup_html(&self) -> Option<String> {
        self.description().map(|description| {
            format!(
                "<strong>{}</strong><br>{}",
                self.name().unwrap_or_default(),
                description
            )
        })
    }
}

impl FeatureCollection {
    /// Parse a GeoJSON document. A single Feature is wrapped into a collection.
    pub fn from_slice(data: &[u8], location: &str) -> Result<FeatureCollection, LoadError> {
        let parse_error = |cause: String| LoadError::Parse {
            location: location.to_string(),
            cause,
        };
        let doc: Value = serde_json::from_slice(data).map_err(|e| parse_error(e.to_string()))?;
        match doc.get("type").and_then(|t| t.as_str()) {
            Some("FeatureCollection") => {
                let features = doc
                    .get("features")
                    .cloned()
                    .ok_or_else(|| parse_error("missing field `features`".to_string()))?;
                let features: Vec<Feature> =
                    serde_json::from_value(features).map_err(|e| parse_error(e.to_string()))?;
                Ok(FeatureCollection { features })
            }
            Some("Feature") => {
                let feature: Feature =
                    serde_json::from_value(doc).map_err(|e| parse_error(e.to_string()))?;
                Ok(FeatureCollection {
                    features: vec![feature],
                })
            }
            Some(other) => Err(parse_error(format!("unsupported GeoJSON type `{}`", other))),
            None => Err(parse_error("missing field `type`".to_string())),
        }
    }
    pub fn len(&self) -> usize {
        self.features.len()
    }
    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }
}

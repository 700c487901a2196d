//! GeoJSON output types.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};
use std::collections::BTreeMap;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GeometryError {
    #[error("Polygon field is empty")]
    Empty,
    #[error("Polygon JSON parse error: {0}")]
    InvalidJson(#[from] serde_json::Error),
    #[error("Polygon must be a GeoJSON geometry object with type/coordinates")]
    NotAGeometry,
}

/// A geometry object parsed from text.
///
/// Only the presence of `type` and `coordinates` is checked; every key of the
/// source object is kept as-is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Geometry(Map<String, JsonValue>);

impl Geometry {
    pub fn parse(text: &str) -> Result<Self, GeometryError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(GeometryError::Empty);
        }
        let value: JsonValue = serde_json::from_str(text)?;
        Self::from_value(value)
    }

    pub fn from_value(value: JsonValue) -> Result<Self, GeometryError> {
        match value {
            JsonValue::Object(map) if map.contains_key("type") && map.contains_key("coordinates") => {
                Ok(Self(map))
            }
            _ => Err(GeometryError::NotAGeometry),
        }
    }

    /// The declared geometry type, when it is a string.
    pub fn kind(&self) -> Option<&str> {
        self.0.get("type").and_then(JsonValue::as_str)
    }

    pub fn as_map(&self) -> &Map<String, JsonValue> {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub struct Feature {
    pub geometry: Geometry,
    pub properties: BTreeMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "type")]
pub struct FeatureCollection {
    pub features: Vec<Feature>,
}

impl FeatureCollection {
    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }
}

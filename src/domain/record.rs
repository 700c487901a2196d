//! Records returned by the upstream database query.

use crate::domain::property::PropertyValue;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};

/// One database entry. Property payloads stay raw until a consumer asks for a
/// specific property, so one malformed value only affects its own record.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Record {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub properties: Map<String, JsonValue>,
}

impl Record {
    pub fn has_property(&self, name: &str) -> bool {
        self.properties.contains_key(name)
    }

    /// Decodes the named property. `None` if the record has no such property.
    pub fn property(&self, name: &str) -> Option<Result<PropertyValue, serde_json::Error>> {
        self.properties
            .get(name)
            .map(|raw| PropertyValue::deserialize(raw))
    }

    /// Identifier for diagnostics; `?` when the upstream omitted it.
    pub fn display_id(&self) -> &str {
        if self.id.is_empty() {
            "?"
        } else {
            &self.id
        }
    }
}

/// Body of a query request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryRequest {
    pub page_size: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_cursor: Option<String>,
}

/// One page of query results.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct QueryPage {
    #[serde(default)]
    pub results: Vec<Record>,
    #[serde(default)]
    pub has_more: bool,
    #[serde(default)]
    pub next_cursor: Option<String>,
}

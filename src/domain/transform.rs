//! Record → Feature normalization.
//!
//! Each record is mapped to `Result<Feature, SkipReason>`; the results are then
//! partitioned so one bad row never takes the rest of the feed down with it.

use crate::domain::geojson::{Feature, FeatureCollection, Geometry, GeometryError};
use crate::domain::property::PropertyValue;
use crate::domain::record::Record;
use crate::domain::text::{flexible_text, plain_text};
use std::collections::BTreeMap;
use thiserror::Error;

pub const NETWORK_KEY: &str = "Network";
pub const LEADERS_KEY: &str = "Leaders";
pub const PAGE_ID_KEY: &str = "notion_page_id";

/// Which source properties feed which output fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeatureSchema {
    pub network_property: String,
    pub polygon_property: String,
    pub leaders_property: String,
    /// Also publish the source record id under `notion_page_id`.
    pub include_page_id: bool,
}

impl Default for FeatureSchema {
    fn default() -> Self {
        Self {
            network_property: "Network Name".to_string(),
            polygon_property: "Polygon".to_string(),
            leaders_property: "Network Leaders Names".to_string(),
            include_page_id: false,
        }
    }
}

#[derive(Debug, Error)]
pub enum SkipReason {
    #[error("Missing '{0}' property")]
    MissingProperty(String),
    #[error("Property '{name}' could not be decoded: {source}")]
    MalformedProperty {
        name: String,
        #[source]
        source: serde_json::Error,
    },
    #[error(transparent)]
    Geometry(#[from] GeometryError),
}

/// A record that produced no feature, with the reason why.
#[derive(Debug)]
pub struct SkippedRecord {
    pub record_id: String,
    pub reason: SkipReason,
}

/// Outcome of normalizing a batch.
#[derive(Debug, Default)]
pub struct BuildReport {
    pub collection: FeatureCollection,
    pub skipped: Vec<SkippedRecord>,
}

/// Builds the feature for a single record.
pub fn normalize_record(record: &Record, schema: &FeatureSchema) -> Result<Feature, SkipReason> {
    let polygon = decode_property(record, &schema.polygon_property)?
        .ok_or_else(|| SkipReason::MissingProperty(schema.polygon_property.clone()))?;
    let geometry = Geometry::parse(&plain_text(&polygon))?;

    let network = optional_text(record, &schema.network_property)?;
    let leaders = optional_text(record, &schema.leaders_property)?;

    let mut properties = BTreeMap::new();
    properties.insert(NETWORK_KEY.to_string(), network);
    properties.insert(LEADERS_KEY.to_string(), leaders);
    if schema.include_page_id {
        properties.insert(PAGE_ID_KEY.to_string(), record.id.clone());
    }

    Ok(Feature {
        geometry,
        properties,
    })
}

/// Normalizes every record, keeping input order, and logs each skip.
pub fn build_report(records: &[Record], schema: &FeatureSchema) -> BuildReport {
    let outcomes: Vec<(&Record, Result<Feature, SkipReason>)> = records
        .iter()
        .map(|record| (record, normalize_record(record, schema)))
        .collect();

    let mut report = BuildReport::default();
    for (record, outcome) in outcomes {
        match outcome {
            Ok(feature) => report.collection.features.push(feature),
            Err(reason) => {
                tracing::warn!(record_id = record.display_id(), %reason, "skipping record");
                report.skipped.push(SkippedRecord {
                    record_id: record.id.clone(),
                    reason,
                });
            }
        }
    }
    report
}

pub fn build_collection(records: &[Record], schema: &FeatureSchema) -> FeatureCollection {
    build_report(records, schema).collection
}

fn decode_property(record: &Record, name: &str) -> Result<Option<PropertyValue>, SkipReason> {
    record
        .property(name)
        .transpose()
        .map_err(|source| SkipReason::MalformedProperty {
            name: name.to_string(),
            source,
        })
}

fn optional_text(record: &Record, name: &str) -> Result<String, SkipReason> {
    Ok(decode_property(record, name)?
        .map(|value| flexible_text(&value))
        .unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    const SQUARE: &str = r#"{"type":"Polygon","coordinates":[[[0,0],[1,0],[1,1],[0,0]]]}"#;

    fn record(id: &str, properties: Value) -> Record {
        serde_json::from_value(json!({"id": id, "properties": properties})).unwrap()
    }

    fn polygon(text: &str) -> Value {
        json!({"type": "rich_text", "rich_text": [{"plain_text": text}]})
    }

    #[test]
    fn builds_feature_from_select_and_multi_select() {
        let rec = record(
            "page-1",
            json!({
                "Polygon": polygon(SQUARE),
                "Network Name": {"type": "select", "select": {"name": "North"}},
                "Network Leaders Names": {"type": "multi_select", "multi_select": [{"name": "Alice"}, {"name": "Bob"}]}
            }),
        );

        let collection = build_collection(&[rec], &FeatureSchema::default());

        assert_eq!(collection.len(), 1);
        let feature = &collection.features[0];
        assert_eq!(
            serde_json::to_value(&feature.geometry).unwrap(),
            serde_json::from_str::<Value>(SQUARE).unwrap()
        );
        assert_eq!(
            feature.properties,
            BTreeMap::from([
                ("Network".to_string(), "North".to_string()),
                ("Leaders".to_string(), "Alice, Bob".to_string()),
            ])
        );
    }

    #[test]
    fn polygon_may_live_in_a_title() {
        let rec = record(
            "page-title",
            json!({"Polygon": {"type": "title", "title": [{"plain_text": SQUARE}]}}),
        );
        let feature = normalize_record(&rec, &FeatureSchema::default()).unwrap();
        assert_eq!(feature.geometry.kind(), Some("Polygon"));
        assert_eq!(feature.properties["Network"], "");
        assert_eq!(feature.properties["Leaders"], "");
    }

    #[test]
    fn skips_invalid_records_and_keeps_order() {
        let records = vec![
            record("a", json!({"Polygon": polygon(SQUARE)})),
            record("missing", json!({"Network Name": {"type": "select", "select": null}})),
            record("empty", json!({"Polygon": polygon("   ")})),
            record("garbage", json!({"Polygon": polygon("{not json")})),
            record("shape", json!({"Polygon": polygon(r#"{"type":"Polygon"}"#)})),
            record("select", json!({"Polygon": {"type": "select", "select": {"name": "x"}}})),
            record("b", json!({
                "Polygon": polygon(SQUARE),
                "Network Name": {"type": "select", "select": {"name": "B"}}
            })),
        ];

        let report = build_report(&records, &FeatureSchema::default());

        let networks: Vec<&str> = report
            .collection
            .features
            .iter()
            .map(|f| f.properties["Network"].as_str())
            .collect();
        assert_eq!(networks, vec!["", "B"]);

        let skipped: Vec<&str> = report.skipped.iter().map(|s| s.record_id.as_str()).collect();
        assert_eq!(skipped, vec!["missing", "empty", "garbage", "shape", "select"]);
        assert!(matches!(report.skipped[0].reason, SkipReason::MissingProperty(_)));
        assert!(matches!(
            report.skipped[1].reason,
            SkipReason::Geometry(GeometryError::Empty)
        ));
        assert!(matches!(
            report.skipped[2].reason,
            SkipReason::Geometry(GeometryError::InvalidJson(_))
        ));
        assert!(matches!(
            report.skipped[3].reason,
            SkipReason::Geometry(GeometryError::NotAGeometry)
        ));
    }

    #[test]
    fn malformed_descriptive_property_skips_only_that_record() {
        let records = vec![
            record("bad", json!({
                "Polygon": polygon(SQUARE),
                "Network Leaders Names": {"type": "multi_select", "multi_select": "Alice"}
            })),
            record("good", json!({"Polygon": polygon(SQUARE)})),
        ];

        let report = build_report(&records, &FeatureSchema::default());

        assert_eq!(report.collection.len(), 1);
        assert_eq!(report.skipped.len(), 1);
        assert!(matches!(
            &report.skipped[0].reason,
            SkipReason::MalformedProperty { name, .. } if name == "Network Leaders Names"
        ));
    }

    #[test]
    fn custom_schema_and_page_id() {
        let schema = FeatureSchema {
            network_property: "Net".to_string(),
            polygon_property: "Shape".to_string(),
            leaders_property: "Leads".to_string(),
            include_page_id: true,
        };
        let rec = record("page-9", json!({
            "Shape": polygon(SQUARE),
            "Net": {"type": "rich_text", "rich_text": [{"plain_text": "South"}]},
            "Leads": {"type": "people", "people": [{"name": "Cy"}]}
        }));

        let feature = normalize_record(&rec, &schema).unwrap();

        assert_eq!(feature.properties["Network"], "South");
        assert_eq!(feature.properties["Leaders"], "Cy");
        assert_eq!(feature.properties["notion_page_id"], "page-9");
    }

    #[test]
    fn build_collection_is_idempotent() {
        let records = vec![
            record("a", json!({"Polygon": polygon(SQUARE)})),
            record("b", json!({"Polygon": polygon("")})),
        ];
        let schema = FeatureSchema::default();
        assert_eq!(
            build_collection(&records, &schema),
            build_collection(&records, &schema)
        );
    }

    #[test]
    fn empty_input_yields_empty_collection() {
        assert!(build_collection(&[], &FeatureSchema::default()).is_empty());
    }
}

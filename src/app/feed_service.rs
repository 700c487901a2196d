//! The feed service.
//!
//! Runs one full fetch → normalize cycle per call. Nothing is cached between
//! calls, so every published collection reflects the database as it is now.

use crate::domain::geojson::FeatureCollection;
use crate::domain::transform::{build_report, FeatureSchema};
use crate::infra::config::Config;
use crate::infra::notion::{FetchError, NotionClient, RecordSource};
use std::sync::Arc;

pub struct FeedService {
    source: Arc<dyn RecordSource>,
    schema: FeatureSchema,
}

impl FeedService {
    pub fn new(source: Arc<dyn RecordSource>, schema: FeatureSchema) -> Self {
        Self { source, schema }
    }

    /// Wires a `NotionClient` built from the configuration.
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let client = NotionClient::new(config)?;
        Ok(Self::new(Arc::new(client), config.schema.clone()))
    }

    pub fn schema(&self) -> &FeatureSchema {
        &self.schema
    }

    /// Fetches every record and returns the features that could be built.
    /// Upstream failures abort the whole call; bad records are only skipped.
    pub async fn collection(&self) -> Result<FeatureCollection, FetchError> {
        let records = self.source.fetch_all().await?;
        let report = build_report(&records, &self.schema);
        tracing::info!(
            fetched = records.len(),
            published = report.collection.len(),
            skipped = report.skipped.len(),
            "built feature collection"
        );
        Ok(report.collection)
    }
}

pub mod app;
pub mod domain;
pub mod infra;
pub mod transport;

// Convenience re-exports (keeps call-sites clean)
pub use app::feed_service::FeedService;
pub use domain::{build_collection, Feature, FeatureCollection, FeatureSchema, Geometry, Record};
pub use infra::config::Config;
pub use infra::notion::{FetchError, NotionClient, Pacing, RecordSource};

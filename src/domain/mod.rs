pub mod geojson;
pub mod property;
pub mod record;
pub mod text;
pub mod transform;

pub use geojson::{Feature, FeatureCollection, Geometry, GeometryError};
pub use property::PropertyValue;
pub use record::Record;
pub use transform::{build_collection, build_report, BuildReport, FeatureSchema, SkipReason};

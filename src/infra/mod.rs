pub mod config;
pub mod notion;
pub mod telemetry;

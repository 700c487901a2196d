//! Centralized configuration (environment variables + defaults).
//!
//! Loaded once at process start and shared read-only afterwards.

use crate::domain::transform::FeatureSchema;
use thiserror::Error;

pub const DEFAULT_API_BASE: &str = "https://api.notion.com/v1";
pub const DEFAULT_NOTION_VERSION: &str = "2022-06-28";
pub const DEFAULT_PORT: u16 = 8080;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),
    #[error("{name} has an invalid value '{value}': expected {expected}")]
    Invalid {
        name: &'static str,
        value: String,
        expected: &'static str,
    },
}

#[derive(Clone)]
pub struct Config {
    /// Integration token (required).
    pub notion_token: String,
    /// Database to query (required).
    pub database_id: String,
    pub api_base: String,
    pub notion_version: String,
    pub schema: FeatureSchema,
    pub port: u16,
    /// Cap on consecutive 429 retries for one page. `None` retries forever.
    pub max_rate_limit_retries: Option<u32>,
    pub log_json: bool,
}

// Keeps the token out of logs.
impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("notion_token", &"<redacted>")
            .field("database_id", &self.database_id)
            .field("api_base", &self.api_base)
            .field("notion_version", &self.notion_version)
            .field("schema", &self.schema)
            .field("port", &self.port)
            .field("max_rate_limit_retries", &self.max_rate_limit_retries)
            .field("log_json", &self.log_json)
            .finish()
    }
}

impl Config {
    /// Reads the process environment. Call `dotenv::dotenv()` first to pick up a `.env` file.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds the configuration from any name → value source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());
        let required = |name: &'static str| get(name).ok_or(ConfigError::Missing(name));

        let defaults = FeatureSchema::default();
        let schema = FeatureSchema {
            network_property: get("NOTION_PROP_NETWORK_NAME").unwrap_or(defaults.network_property),
            polygon_property: get("NOTION_PROP_POLYGON").unwrap_or(defaults.polygon_property),
            leaders_property: get("NOTION_PROP_LEADERS").unwrap_or(defaults.leaders_property),
            include_page_id: parse_bool("NOTION_INCLUDE_PAGE_ID", get("NOTION_INCLUDE_PAGE_ID"))?
                .unwrap_or(defaults.include_page_id),
        };

        Ok(Self {
            notion_token: required("NOTION_TOKEN")?,
            database_id: required("NOTION_DATABASE_ID")?,
            api_base: get("NOTION_API_BASE")
                .map(|base| base.trim_end_matches('/').to_string())
                .unwrap_or_else(|| DEFAULT_API_BASE.to_string()),
            notion_version: get("NOTION_VERSION")
                .unwrap_or_else(|| DEFAULT_NOTION_VERSION.to_string()),
            schema,
            port: parse_num("PORT", get("PORT"))?.unwrap_or(DEFAULT_PORT),
            max_rate_limit_retries: parse_num(
                "NOTION_MAX_RATE_LIMIT_RETRIES",
                get("NOTION_MAX_RATE_LIMIT_RETRIES"),
            )?,
            log_json: parse_bool("LOG_JSON", get("LOG_JSON"))?.unwrap_or(false),
        })
    }

    /// Full URL of the database query endpoint.
    pub fn query_url(&self) -> String {
        format!("{}/databases/{}/query", self.api_base, self.database_id)
    }
}

fn parse_num<T: std::str::FromStr>(
    name: &'static str,
    raw: Option<String>,
) -> Result<Option<T>, ConfigError> {
    raw.map(|value| {
        value.trim().parse::<T>().map_err(|_| ConfigError::Invalid {
            name,
            value,
            expected: "a non-negative integer",
        })
    })
    .transpose()
}

fn parse_bool(name: &'static str, raw: Option<String>) -> Result<Option<bool>, ConfigError> {
    raw.map(|value| match value.trim() {
        "1" | "true" | "TRUE" | "yes" | "YES" => Ok(true),
        "0" | "false" | "FALSE" | "no" | "NO" => Ok(false),
        _ => Err(ConfigError::Invalid {
            name,
            value,
            expected: "true or false",
        }),
    })
    .transpose()
}

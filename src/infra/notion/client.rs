// Responsible for all communication with the upstream database query API.

use crate::domain::record::{QueryPage, QueryRequest, Record};
use crate::infra::config::Config;
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_PAGE_SIZE: u32 = 100;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("upstream returned {status}: {body}")]
    Upstream { status: StatusCode, body: String },
    #[error("upstream still rate limiting after {attempts} retries")]
    RateLimited { attempts: u32 },
    #[error("could not decode upstream response: {0}")]
    Decode(#[source] reqwest::Error),
    #[error("upstream reported more results but sent no next_cursor")]
    MissingCursor,
}

impl FetchError {
    pub fn is_timeout(&self) -> bool {
        matches!(self, FetchError::Transport { source, .. } if source.is_timeout())
    }
}

/// Fixed delays and limits applied while paging through a query.
#[derive(Debug, Clone)]
pub struct Pacing {
    pub page_size: u32,
    /// Wait before re-sending a request that got HTTP 429.
    pub rate_limit_backoff: Duration,
    /// Wait between consecutive pages.
    pub page_delay: Duration,
    /// Per-request transport timeout.
    pub timeout: Duration,
    /// `None` retries a rate-limited request forever.
    pub max_rate_limit_retries: Option<u32>,
}

impl Default for Pacing {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            rate_limit_backoff: Duration::from_secs(1),
            page_delay: Duration::from_millis(350),
            timeout: Duration::from_secs(30),
            max_rate_limit_retries: None,
        }
    }
}

#[async_trait]
pub trait Sleeper: Send + Sync {
    async fn sleep(&self, duration: Duration);
}

pub struct TokioSleeper;

#[async_trait]
impl Sleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// Anything that can produce the full list of database records.
#[async_trait]
pub trait RecordSource: Send + Sync {
    async fn fetch_all(&self) -> Result<Vec<Record>, FetchError>;
}

pub struct NotionClient {
    http: Client,
    query_url: String,
    token: String,
    notion_version: String,
    pacing: Pacing,
    sleeper: Arc<dyn Sleeper>,
}

impl NotionClient {
    pub fn new(config: &Config) -> Result<Self, reqwest::Error> {
        let pacing = Pacing {
            max_rate_limit_retries: config.max_rate_limit_retries,
            ..Pacing::default()
        };
        Self::with_pacing(config, pacing)
    }

    pub fn with_pacing(config: &Config, pacing: Pacing) -> Result<Self, reqwest::Error> {
        let http = Client::builder().timeout(pacing.timeout).build()?;
        Ok(Self {
            http,
            query_url: config.query_url(),
            token: config.notion_token.clone(),
            notion_version: config.notion_version.clone(),
            pacing,
            sleeper: Arc::new(TokioSleeper),
        })
    }

    /// Replaces the sleeper used for backoff and page delays.
    pub fn with_sleeper(mut self, sleeper: Arc<dyn Sleeper>) -> Self {
        self.sleeper = sleeper;
        self
    }

    pub fn pacing(&self) -> &Pacing {
        &self.pacing
    }

    /// Fetches one page, re-sending the same request while the upstream answers 429.
    pub async fn query_page(
        &self,
        page_size: u32,
        start_cursor: Option<&str>,
    ) -> Result<QueryPage, FetchError> {
        let body = QueryRequest {
            page_size,
            start_cursor: start_cursor.map(str::to_string),
        };
        let mut retries: u32 = 0;

        loop {
            let response = self
                .http
                .post(&self.query_url)
                .bearer_auth(&self.token)
                .header("Notion-Version", &self.notion_version)
                .json(&body)
                .send()
                .await
                .map_err(|source| FetchError::Transport {
                    url: self.query_url.clone(),
                    source,
                })?;

            let status = response.status();
            if status == StatusCode::TOO_MANY_REQUESTS {
                if let Some(max) = self.pacing.max_rate_limit_retries {
                    if retries >= max {
                        return Err(FetchError::RateLimited { attempts: retries });
                    }
                }
                retries += 1;
                tracing::warn!(retries, "upstream rate limited the query, backing off");
                self.sleeper.sleep(self.pacing.rate_limit_backoff).await;
                continue;
            }

            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                return Err(FetchError::Upstream { status, body });
            }

            return response.json::<QueryPage>().await.map_err(FetchError::Decode);
        }
    }

    /// Fetches a single record, for connectivity checks.
    pub async fn probe(&self) -> Result<QueryPage, FetchError> {
        self.query_page(1, None).await
    }
}

#[async_trait]
impl RecordSource for NotionClient {
    /// Walks every page of the query, pausing between pages.
    async fn fetch_all(&self) -> Result<Vec<Record>, FetchError> {
        let mut records = Vec::new();
        let mut cursor: Option<String> = None;
        let mut pages: usize = 0;

        loop {
            let page = self
                .query_page(self.pacing.page_size, cursor.as_deref())
                .await?;
            pages += 1;
            records.extend(page.results);

            if !page.has_more {
                break;
            }
            cursor = Some(page.next_cursor.ok_or(FetchError::MissingCursor)?);
            self.sleeper.sleep(self.pacing.page_delay).await;
        }

        tracing::debug!(pages, records = records.len(), "fetched all query pages");
        Ok(records)
    }
}

//! Agenda data source
//!
//! The dataset is retrieved in full from the agenda endpoint exactly once per
//! session. Any transport or decode failure collapses into a single
//! `DataUnavailable` condition for the caller to surface; no partial data is
//! ever returned.

use async_trait::async_trait;

use crate::models::AgendaItem;

/// Environment variable overriding the agenda endpoint base URL
pub const API_URL_ENV: &str = "AGENDAVIEW_API_URL";

fn default_base_url() -> String {
    "http://localhost:3003".to_string()
}

/// Error type for dataset retrieval
#[derive(Debug, Clone, thiserror::Error)]
pub enum FetchError {
    /// The dataset could not be retrieved or decoded
    #[error("agenda data unavailable: {0}")]
    DataUnavailable(String),
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        Self::DataUnavailable(err.to_string())
    }
}

/// Source of the full agenda dataset
///
/// Implementations must be idempotent and safe to retry; the session layer
/// decides how often to call (once per session).
#[async_trait]
pub trait AgendaSource: Send + Sync {
    /// Retrieve the full ordered item sequence exactly as the source
    /// provides it: no reordering, no deduplication.
    async fn fetch_agenda_items(&self) -> Result<Vec<AgendaItem>, FetchError>;
}

/// HTTP implementation reading `GET {base}/api/agenda`
pub struct HttpAgendaSource {
    client: reqwest::Client,
    base_url: String,
}

impl HttpAgendaSource {
    /// Create a source against an explicit base URL
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Create a source from `AGENDAVIEW_API_URL`, falling back to the local
    /// development address when unset.
    pub fn from_env() -> Self {
        let base = std::env::var(API_URL_ENV).unwrap_or_else(|_| default_base_url());
        Self::new(base)
    }

    /// The configured base URL
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self) -> String {
        format!("{}/api/agenda", self.base_url)
    }
}

#[async_trait]
impl AgendaSource for HttpAgendaSource {
    async fn fetch_agenda_items(&self) -> Result<Vec<AgendaItem>, FetchError> {
        let response = self
            .client
            .get(self.endpoint())
            .send()
            .await?
            .error_for_status()?;

        let items = response.json::<Vec<AgendaItem>>().await?;
        Ok(items)
    }
}

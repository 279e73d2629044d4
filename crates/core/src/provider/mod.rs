//! Keyword data providers.
//!
//! Each provider queries one upstream keyword service and normalizes its
//! native response into [`KeywordRecord`]s. Providers are built once at
//! startup from configuration; one whose credentials are missing still exists
//! but reports `is_configured() == false` and is skipped by the waterfall.

mod dataforseo;
mod google_ads;
mod microsoft_ads;
mod normalize;
mod oauth;
mod serpapi;

pub use dataforseo::{DataForSeoClient, DataForSeoConfig};
pub use google_ads::{GoogleAdsClient, GoogleAdsConfig};
pub use microsoft_ads::{MicrosoftAdsClient, MicrosoftAdsConfig};
pub use serpapi::{SerpApiClient, SerpApiConfig};

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::Serialize;
use thiserror::Error;
use tracing::warn;

use crate::keyword::{KeywordQuery, KeywordRecord, ProviderTag};

/// Errors that can occur when talking to a keyword provider.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// HTTP request failed (connection, TLS, body read).
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    /// The provider did not answer within the configured timeout.
    #[error("Request timed out")]
    Timeout,

    /// Rate limit exceeded.
    #[error("Rate limit exceeded, please wait before retrying")]
    RateLimitExceeded,

    /// Credentials were rejected or an access token could not be obtained.
    #[error("Authentication failed: {0}")]
    AuthFailed(String),

    /// API returned an error status.
    #[error("API error: {status} - {message}")]
    ApiError { status: u16, message: String },

    /// Failed to parse response.
    #[error("Failed to parse response: {0}")]
    ParseError(String),

    /// Provider not configured (missing credentials).
    #[error("Provider not configured: {0}")]
    NotConfigured(String),
}

impl ProviderError {
    /// Classify a transport error, separating timeouts from other failures.
    pub(crate) fn from_transport(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            Self::Timeout
        } else {
            Self::HttpError(e)
        }
    }
}

/// A source of keyword metrics.
#[async_trait]
pub trait KeywordProvider: Send + Sync {
    /// Which provider this is.
    fn tag(&self) -> ProviderTag;

    /// Whether the required credentials were present at construction.
    fn is_configured(&self) -> bool;

    /// Fetch keyword records for the query.
    async fn fetch(&self, query: &KeywordQuery) -> Result<Vec<KeywordRecord>, ProviderError>;

    /// Fetch, treating any failure as "no data from this provider".
    async fn fetch_or_empty(&self, query: &KeywordQuery) -> Vec<KeywordRecord> {
        match self.fetch(query).await {
            Ok(records) => records,
            Err(e) => {
                warn!(
                    provider = %self.tag(),
                    error = %e,
                    "Provider fetch failed, treating as empty"
                );
                Vec::new()
            }
        }
    }
}

/// Configuration state of one provider, for status endpoints.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ProviderStatus {
    pub provider: ProviderTag,
    pub name: &'static str,
    pub configured: bool,
    /// Position in the waterfall, starting at 1.
    pub priority: usize,
}

/// Build the pooled HTTP client a provider keeps for its lifetime.
pub(crate) fn http_client(timeout_secs: u32) -> Result<Client, ProviderError> {
    let client = Client::builder()
        .timeout(Duration::from_secs(timeout_secs as u64))
        .user_agent(concat!("semplan/", env!("CARGO_PKG_VERSION")))
        .build()?;
    Ok(client)
}

/// Map non-success statuses onto provider errors.
pub(crate) async fn check_status(response: Response) -> Result<Response, ProviderError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    if status == 401 || status == 403 {
        return Err(ProviderError::AuthFailed(format!(
            "upstream rejected credentials (HTTP {})",
            status.as_u16()
        )));
    }
    if status == 429 {
        return Err(ProviderError::RateLimitExceeded);
    }

    let body = response.text().await.unwrap_or_default();
    Err(ProviderError::ApiError {
        status: status.as_u16(),
        message: body.chars().take(200).collect(),
    })
}

/// Parse a JSON body, reporting which call it came from on failure.
pub(crate) async fn parse_json<T: serde::de::DeserializeOwned>(
    response: Response,
    what: &str,
) -> Result<T, ProviderError> {
    response
        .json()
        .await
        .map_err(|e| ProviderError::ParseError(format!("Failed to parse {} response: {}", what, e)))
}

//! Google Ads Keyword Planner client (REST `generateKeywordIdeas`).

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::normalize::{lenient_opt_string, lenient_string, lenient_u64};
use super::oauth::{refresh_access_token, RefreshGrant};
use super::{check_status, http_client, parse_json, KeywordProvider, ProviderError};
use crate::keyword::{Competition, KeywordQuery, KeywordRecord, ProviderTag};

const DEFAULT_BASE_URL: &str = "https://googleads.googleapis.com";
const DEFAULT_API_VERSION: &str = "v17";
const DEFAULT_TOKEN_URL: &str = "https://oauth2.googleapis.com/token";
/// languageConstants/1000 is English.
const DEFAULT_LANGUAGE_ID: &str = "1000";

/// Google Ads API configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GoogleAdsConfig {
    #[serde(default, deserialize_with = "lenient_string")]
    pub client_id: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub client_secret: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub refresh_token: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub developer_token: String,
    /// Customer the ideas are requested for (dashes allowed).
    #[serde(default, deserialize_with = "lenient_string")]
    pub customer_id: String,
    /// Manager account id, sent as `login-customer-id` when set.
    #[serde(
        default,
        deserialize_with = "lenient_opt_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub login_customer_id: Option<String>,
    /// Language constant used when the query language has no known mapping.
    #[serde(default = "default_language_id")]
    pub language_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_url: Option<String>,
    #[serde(default = "default_api_version")]
    pub api_version: String,
    #[serde(default = "default_timeout")]
    pub timeout_secs: u32,
}

fn default_language_id() -> String {
    DEFAULT_LANGUAGE_ID.to_string()
}

fn default_api_version() -> String {
    DEFAULT_API_VERSION.to_string()
}

fn default_timeout() -> u32 {
    30
}

impl Default for GoogleAdsConfig {
    fn default() -> Self {
        Self {
            client_id: String::new(),
            client_secret: String::new(),
            refresh_token: String::new(),
            developer_token: String::new(),
            customer_id: String::new(),
            login_customer_id: None,
            language_id: default_language_id(),
            base_url: None,
            token_url: None,
            api_version: default_api_version(),
            timeout_secs: default_timeout(),
        }
    }
}

impl GoogleAdsConfig {
    pub fn has_credentials(&self) -> bool {
        [
            &self.client_id,
            &self.client_secret,
            &self.refresh_token,
            &self.developer_token,
            &self.customer_id,
        ]
        .iter()
        .all(|v| !v.is_empty())
    }
}

/// Google Ads Keyword Planner client.
pub struct GoogleAdsClient {
    client: Client,
    config: GoogleAdsConfig,
    base_url: String,
    token_url: String,
    configured: bool,
}

impl GoogleAdsClient {
    pub fn new(config: GoogleAdsConfig) -> Result<Self, ProviderError> {
        let configured = config.has_credentials();
        if !configured {
            warn!("Google Ads API not fully configured - Keyword Planner tier disabled");
        }

        Ok(Self {
            client: http_client(config.timeout_secs)?,
            base_url: config
                .base_url
                .clone()
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
                .trim_end_matches('/')
                .to_string(),
            token_url: config
                .token_url
                .clone()
                .unwrap_or_else(|| DEFAULT_TOKEN_URL.to_string()),
            configured,
            config,
        })
    }

    async fn access_token(&self) -> Result<String, ProviderError> {
        let token = refresh_access_token(
            &self.client,
            RefreshGrant {
                token_url: &self.token_url,
                client_id: &self.config.client_id,
                client_secret: &self.config.client_secret,
                refresh_token: &self.config.refresh_token,
                scope: None,
            },
        )
        .await?;

        if token.is_empty() {
            return Err(ProviderError::AuthFailed(
                "token endpoint returned no access_token".to_string(),
            ));
        }
        Ok(token)
    }

    fn language_constant(&self, language: &str) -> String {
        match language_id(language) {
            Some(id) => format!("languageConstants/{}", id),
            None => format!("languageConstants/{}", self.config.language_id),
        }
    }
}

#[async_trait]
impl KeywordProvider for GoogleAdsClient {
    fn tag(&self) -> ProviderTag {
        ProviderTag::GoogleAds
    }

    fn is_configured(&self) -> bool {
        self.configured
    }

    async fn fetch(&self, query: &KeywordQuery) -> Result<Vec<KeywordRecord>, ProviderError> {
        if !self.configured {
            return Err(ProviderError::NotConfigured(
                "Google Ads OAuth credentials, developer token or customer id missing"
                    .to_string(),
            ));
        }

        let token = self.access_token().await?;
        let customer_id = self.config.customer_id.replace('-', "");
        let url = format!(
            "{}/{}/customers/{}:generateKeywordIdeas",
            self.base_url, self.config.api_version, customer_id
        );

        let body = GenerateIdeasRequest {
            language: self.language_constant(&query.language),
            geo_target_constants: query
                .location_codes
                .iter()
                .map(|code| format!("geoTargetConstants/{}", code))
                .collect(),
            keyword_seed: KeywordSeed {
                keywords: query.seeds(),
            },
            keyword_plan_network: "GOOGLE_SEARCH",
        };

        debug!(url = %url, seeds = query.seeds().len(), "Google Ads generateKeywordIdeas");

        let mut request = self
            .client
            .post(&url)
            .bearer_auth(&token)
            .header("developer-token", &self.config.developer_token)
            .json(&body);
        if let Some(login_id) = self.config.login_customer_id.as_deref() {
            request = request.header("login-customer-id", login_id.replace('-', ""));
        }

        let response = request.send().await.map_err(ProviderError::from_transport)?;
        let ideas: GenerateIdeasResponse =
            parse_json(check_status(response).await?, "generateKeywordIdeas").await?;

        let records: Vec<KeywordRecord> = ideas
            .results
            .unwrap_or_default()
            .into_iter()
            .filter_map(map_idea)
            .collect();

        info!(count = records.len(), "Retrieved keyword ideas from Google Ads API");
        Ok(records)
    }
}

/// ISO 639-1 code to Google Ads language constant id.
fn language_id(language: &str) -> Option<&'static str> {
    Some(match language {
        "en" => "1000",
        "de" => "1001",
        "fr" => "1002",
        "es" => "1003",
        "it" => "1004",
        "ja" => "1005",
        "da" => "1009",
        "nl" => "1010",
        "fi" => "1011",
        "ko" => "1012",
        "no" => "1013",
        "pt" => "1014",
        "sv" => "1015",
        "zh" => "1017",
        "ru" => "1031",
        _ => return None,
    })
}

// ============================================================================
// Wire types
// ============================================================================

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateIdeasRequest<'a> {
    language: String,
    geo_target_constants: Vec<String>,
    keyword_seed: KeywordSeed<'a>,
    keyword_plan_network: &'static str,
}

#[derive(Debug, Serialize)]
struct KeywordSeed<'a> {
    keywords: &'a [String],
}

#[derive(Debug, Deserialize)]
struct GenerateIdeasResponse {
    #[serde(default)]
    results: Option<Vec<KeywordIdea>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct KeywordIdea {
    #[serde(default)]
    text: Option<String>,
    #[serde(default)]
    keyword_idea_metrics: Option<IdeaMetrics>,
}

/// Int64 fields arrive as JSON strings in the REST encoding.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct IdeaMetrics {
    #[serde(default, deserialize_with = "lenient_u64")]
    avg_monthly_searches: Option<u64>,
    #[serde(default)]
    competition: Option<String>,
    #[serde(default, deserialize_with = "lenient_u64")]
    low_top_of_page_bid_micros: Option<u64>,
    #[serde(default, deserialize_with = "lenient_u64")]
    high_top_of_page_bid_micros: Option<u64>,
}

fn competition_from_enum(value: Option<&str>) -> Competition {
    match value {
        Some("LOW") => Competition::Low,
        Some("MEDIUM") => Competition::Medium,
        Some("HIGH") => Competition::High,
        // UNSPECIFIED, UNKNOWN, absent
        _ => Competition::Unknown,
    }
}

fn map_idea(idea: KeywordIdea) -> Option<KeywordRecord> {
    let metrics = idea.keyword_idea_metrics?;
    let record = KeywordRecord::new(
        idea.text?,
        metrics.avg_monthly_searches.unwrap_or(0),
        competition_from_enum(metrics.competition.as_deref()),
        ProviderTag::GoogleAds,
    )?;
    Some(record.with_bids(
        metrics.low_top_of_page_bid_micros.unwrap_or(0),
        metrics.high_top_of_page_bid_micros.unwrap_or(0),
    ))
}

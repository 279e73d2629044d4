//! Microsoft Advertising keyword planner client (AdInsight REST).

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info, warn};

use super::normalize::{
    bids_from_cpc, competition_from_value, lenient_string, value_as_f64, value_as_u64,
};
use super::oauth::{refresh_access_token, RefreshGrant};
use super::{check_status, http_client, parse_json, KeywordProvider, ProviderError};
use crate::keyword::{KeywordQuery, KeywordRecord, ProviderTag};

const DEFAULT_BASE_URL: &str = "https://adinsight.api.bingads.microsoft.com/Api/Advertiser";
const DEFAULT_TOKEN_URL: &str = "https://login.live.com/oauth20_token.srf";
const KEYWORD_IDEAS_PATH: &str = "/AdInsight/v13/KeywordIdeas/Query";
const MAX_SEEDS: usize = 50;
const NETWORK: &str = "OwnedAndOperatedAndSyndicatedSearch";
const IDEA_ATTRIBUTES: [&str; 4] =
    ["Keyword", "MonthlySearchCounts", "Competition", "SuggestedBid"];

/// Microsoft Advertising configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MicrosoftAdsConfig {
    #[serde(default, deserialize_with = "lenient_string")]
    pub developer_token: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub client_id: String,
    /// Optional for public-client app registrations.
    #[serde(default, deserialize_with = "lenient_string")]
    pub client_secret: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub refresh_token: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub customer_id: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub account_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_url: Option<String>,
    /// OAuth scope sent with the refresh grant, if the app registration needs one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,
    #[serde(default = "default_timeout")]
    pub timeout_secs: u32,
}

fn default_timeout() -> u32 {
    30
}

impl Default for MicrosoftAdsConfig {
    fn default() -> Self {
        Self {
            developer_token: String::new(),
            client_id: String::new(),
            client_secret: String::new(),
            refresh_token: String::new(),
            customer_id: String::new(),
            account_id: String::new(),
            base_url: None,
            token_url: None,
            scope: None,
            timeout_secs: default_timeout(),
        }
    }
}

impl MicrosoftAdsConfig {
    pub fn has_credentials(&self) -> bool {
        [
            &self.developer_token,
            &self.client_id,
            &self.refresh_token,
            &self.customer_id,
            &self.account_id,
        ]
        .iter()
        .all(|v| !v.is_empty())
    }
}

/// Microsoft Advertising keyword planner client.
pub struct MicrosoftAdsClient {
    client: Client,
    config: MicrosoftAdsConfig,
    base_url: String,
    token_url: String,
    configured: bool,
}

impl MicrosoftAdsClient {
    pub fn new(config: MicrosoftAdsConfig) -> Result<Self, ProviderError> {
        let configured = config.has_credentials();
        if !configured {
            warn!("Microsoft Ads API not fully configured - planner tier disabled");
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
}

#[async_trait]
impl KeywordProvider for MicrosoftAdsClient {
    fn tag(&self) -> ProviderTag {
        ProviderTag::MicrosoftAds
    }

    fn is_configured(&self) -> bool {
        self.configured
    }

    async fn fetch(&self, query: &KeywordQuery) -> Result<Vec<KeywordRecord>, ProviderError> {
        if !self.configured {
            return Err(ProviderError::NotConfigured(
                "MSADS developer token, OAuth client, customer or account id missing".to_string(),
            ));
        }

        let token = refresh_access_token(
            &self.client,
            RefreshGrant {
                token_url: &self.token_url,
                client_id: &self.config.client_id,
                client_secret: &self.config.client_secret,
                refresh_token: &self.config.refresh_token,
                scope: self.config.scope.as_deref(),
            },
        )
        .await?;

        if token.is_empty() {
            warn!("Microsoft Ads token refresh returned no access token, skipping call");
            return Ok(Vec::new());
        }

        let body = KeywordIdeasRequest {
            keywords: query.seeds().iter().take(MAX_SEEDS).map(String::as_str).collect(),
            language: language_name(&query.language),
            location_ids: query.location_codes.clone(),
            network: NETWORK,
            idea_attributes: IDEA_ATTRIBUTES,
        };

        let url = format!("{}{}", self.base_url, KEYWORD_IDEAS_PATH);
        debug!(url = %url, seeds = body.keywords.len(), "Microsoft Ads KeywordIdeas query");

        let response = self
            .client
            .post(&url)
            .header("AuthenticationToken", &token)
            .header("DeveloperToken", &self.config.developer_token)
            .header("CustomerId", &self.config.customer_id)
            .header("CustomerAccountId", &self.config.account_id)
            .json(&body)
            .send()
            .await
            .map_err(ProviderError::from_transport)?;

        let ideas: KeywordIdeasResponse =
            parse_json(check_status(response).await?, "KeywordIdeas").await?;

        let records: Vec<KeywordRecord> = ideas
            .keyword_ideas
            .unwrap_or_default()
            .iter()
            .filter_map(map_idea)
            .collect();

        info!(count = records.len(), "Retrieved keyword ideas from Microsoft Ads");
        Ok(records)
    }
}

/// AdInsight expects language names rather than ISO codes.
fn language_name(code: &str) -> String {
    match code {
        "en" => "English",
        "de" => "German",
        "fr" => "French",
        "es" => "Spanish",
        "it" => "Italian",
        "nl" => "Dutch",
        "pt" => "Portuguese",
        "sv" => "Swedish",
        "da" => "Danish",
        "fi" => "Finnish",
        "no" => "Norwegian",
        other => other,
    }
    .to_string()
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
struct KeywordIdeasRequest<'a> {
    keywords: Vec<&'a str>,
    language: String,
    location_ids: Vec<u32>,
    network: &'static str,
    idea_attributes: [&'static str; 4],
}

#[derive(Debug, Deserialize)]
struct KeywordIdeasResponse {
    #[serde(default, rename = "KeywordIdeas", alias = "keywordIdeas")]
    keyword_ideas: Option<Vec<Value>>,
}

/// Integer mean of the monthly search counts; non-numeric entries are ignored.
fn average_monthly(counts: Option<&Value>) -> u64 {
    let values: Vec<u64> = match counts {
        Some(Value::Array(items)) => items.iter().filter_map(value_as_u64).collect(),
        _ => Vec::new(),
    };
    if values.is_empty() {
        return 0;
    }
    let total: u128 = values.iter().map(|&v| u128::from(v)).sum();
    // The mean never exceeds the largest count, so it fits back into u64.
    u64::try_from(total / values.len() as u128).unwrap_or(u64::MAX)
}

fn map_idea(idea: &Value) -> Option<KeywordRecord> {
    let text = idea
        .get("Keyword")
        .or_else(|| idea.get("Text"))
        .and_then(Value::as_str)?;
    let volume = average_monthly(idea.get("MonthlySearchCounts"));
    let competition = competition_from_value(idea.get("Competition"));
    let bid = idea
        .get("SuggestedBid")
        .and_then(value_as_f64)
        .unwrap_or(0.0);
    let (low, high) = bids_from_cpc(bid);

    KeywordRecord::new(text, volume, competition, ProviderTag::MicrosoftAds)
        .map(|r| r.with_bids(low, high))
}

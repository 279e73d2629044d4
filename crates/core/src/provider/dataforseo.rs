//! DataForSEO keyword data client.
//!
//! Strategy:
//! 1. `keywords_data/google_ads/keywords_for_keywords` for the seeds.
//! 2. If that comes back sparse, pull Labs `keyword_ideas` for the first seed
//!    and enrich the new terms through `keywords_data/google_ads/search_volume`.
//! 3. Drop terms naming the brand or competitor, and terms under the volume
//!    floor.

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{debug, error, info, warn};

use super::normalize::{
    bids_from_cpc, competition_from_value, dedup_preserving_order, lenient_string, value_as_f64,
    value_as_u64,
};
use super::{check_status, http_client, parse_json, KeywordProvider, ProviderError};
use crate::keyword::{KeywordQuery, KeywordRecord, ProviderTag};

const DEFAULT_BASE_URL: &str = "https://api.dataforseo.com";
const KEYWORDS_FOR_KEYWORDS: &str = "/v3/keywords_data/google_ads/keywords_for_keywords/live";
const KEYWORD_IDEAS: &str = "/v3/dataforseo_labs/google/keyword_ideas/live";
const SEARCH_VOLUME: &str = "/v3/keywords_data/google_ads/search_volume/live";

/// Upstream caps per task.
const MAX_SEEDS_PER_TASK: usize = 50;
const MAX_VOLUME_KEYWORDS: usize = 700;
const SUCCESS_STATUS: u64 = 20000;

/// DataForSEO client configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataForSeoConfig {
    /// Account login (used with `password`).
    #[serde(default, deserialize_with = "lenient_string")]
    pub login: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub password: String,
    /// API key sent as the Basic auth user with an empty password. Takes
    /// precedence over login/password when set.
    #[serde(default, deserialize_with = "lenient_string")]
    pub api_key: String,
    /// Base URL (default: https://api.dataforseo.com).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    #[serde(default = "default_timeout")]
    pub timeout_secs: u32,
    /// Expand through keyword ideas when fewer primary results than this.
    #[serde(default = "default_expansion_threshold")]
    pub expansion_threshold: usize,
    /// Maximum number of expansion ideas to enrich.
    #[serde(default = "default_expansion_limit")]
    pub expansion_limit: usize,
}

fn default_timeout() -> u32 {
    30
}

fn default_expansion_threshold() -> usize {
    30
}

fn default_expansion_limit() -> usize {
    400
}

impl Default for DataForSeoConfig {
    fn default() -> Self {
        Self {
            login: String::new(),
            password: String::new(),
            api_key: String::new(),
            base_url: None,
            timeout_secs: default_timeout(),
            expansion_threshold: default_expansion_threshold(),
            expansion_limit: default_expansion_limit(),
        }
    }
}

impl DataForSeoConfig {
    pub fn has_credentials(&self) -> bool {
        !self.api_key.is_empty() || (!self.login.is_empty() && !self.password.is_empty())
    }
}

#[derive(Debug, Clone)]
enum Credentials {
    ApiKey(String),
    Login { login: String, password: String },
}

/// DataForSEO API client.
pub struct DataForSeoClient {
    client: Client,
    base_url: String,
    credentials: Option<Credentials>,
    expansion_threshold: usize,
    expansion_limit: usize,
}

impl DataForSeoClient {
    /// Create a new client. Missing credentials leave it unconfigured.
    pub fn new(config: DataForSeoConfig) -> Result<Self, ProviderError> {
        let credentials = if !config.api_key.is_empty() {
            Some(Credentials::ApiKey(config.api_key.clone()))
        } else if config.has_credentials() {
            Some(Credentials::Login {
                login: config.login.clone(),
                password: config.password.clone(),
            })
        } else {
            warn!("DataForSEO credentials not configured - skipping as primary source");
            None
        };

        Ok(Self {
            client: http_client(config.timeout_secs)?,
            base_url: config
                .base_url
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
                .trim_end_matches('/')
                .to_string(),
            credentials,
            expansion_threshold: config.expansion_threshold,
            expansion_limit: config.expansion_limit,
        })
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.credentials {
            Some(Credentials::ApiKey(key)) => request.basic_auth(key, None::<&str>),
            Some(Credentials::Login { login, password }) => {
                request.basic_auth(login, Some(password))
            }
            None => request,
        }
    }

    /// POST a task array and flatten every keyword item in the results.
    async fn post_tasks(&self, path: &str, payload: Value) -> Result<Vec<Value>, ProviderError> {
        let url = format!("{}{}", self.base_url, path);
        debug!(path, "DataForSEO request");

        let response = self
            .authorize(self.client.post(&url))
            .json(&payload)
            .send()
            .await
            .map_err(ProviderError::from_transport)?;

        let body: TaskEnvelope = parse_json(check_status(response).await?, path).await?;
        body.into_items()
    }

    async fn keywords_for_keywords(
        &self,
        query: &KeywordQuery,
    ) -> Result<Vec<KeywordRecord>, ProviderError> {
        let seeds: Vec<&String> = query.seeds().iter().take(MAX_SEEDS_PER_TASK).collect();
        let payload = json!([{
            "keywords": seeds,
            "location_code": query.primary_location(),
            "language_code": query.language,
        }]);

        let items = self.post_tasks(KEYWORDS_FOR_KEYWORDS, payload).await?;
        Ok(items.iter().filter_map(map_keyword_item).collect())
    }

    async fn keyword_ideas(&self, query: &KeywordQuery) -> Result<Vec<String>, ProviderError> {
        let payload = json!([{
            "keyword": query.seeds()[0],
            "location_code": query.primary_location(),
            "language_code": query.language,
            "limit": self.expansion_limit.clamp(100, 1000),
        }]);

        let items = self.post_tasks(KEYWORD_IDEAS, payload).await?;
        let ideas: Vec<String> = items
            .iter()
            .filter_map(|it| it.get("keyword").and_then(Value::as_str))
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let mut ideas = dedup_preserving_order(ideas);
        ideas.truncate(self.expansion_limit);
        Ok(ideas)
    }

    async fn search_volume(
        &self,
        keywords: &[String],
        query: &KeywordQuery,
    ) -> Result<Vec<KeywordRecord>, ProviderError> {
        if keywords.is_empty() {
            return Ok(Vec::new());
        }
        let batch: Vec<&String> = keywords.iter().take(MAX_VOLUME_KEYWORDS).collect();
        let payload = json!([{
            "keywords": batch,
            "location_code": query.primary_location(),
            "language_code": query.language,
        }]);

        let items = self.post_tasks(SEARCH_VOLUME, payload).await?;
        Ok(items.iter().filter_map(map_keyword_item).collect())
    }

    /// Pull expansion ideas not already present and enrich them with metrics.
    async fn expand(
        &self,
        query: &KeywordQuery,
        present: &[KeywordRecord],
    ) -> Result<Vec<KeywordRecord>, ProviderError> {
        let ideas = self.keyword_ideas(query).await?;
        let to_enrich: Vec<String> = ideas
            .into_iter()
            .filter(|idea| !present.iter().any(|p| p.text() == idea))
            .collect();
        debug!(count = to_enrich.len(), "DataForSEO enriching expansion ideas");
        self.search_volume(&to_enrich, query).await
    }
}

#[async_trait]
impl KeywordProvider for DataForSeoClient {
    fn tag(&self) -> ProviderTag {
        ProviderTag::DataForSeo
    }

    fn is_configured(&self) -> bool {
        self.credentials.is_some()
    }

    async fn fetch(&self, query: &KeywordQuery) -> Result<Vec<KeywordRecord>, ProviderError> {
        if !self.is_configured() {
            return Err(ProviderError::NotConfigured(
                "DataForSEO login/password or api_key missing".to_string(),
            ));
        }

        let (mut records, primary_error) = match self.keywords_for_keywords(query).await {
            Ok(records) => (records, None),
            Err(e) => {
                warn!(error = %e, "DataForSEO keywords_for_keywords failed");
                (Vec::new(), Some(e))
            }
        };

        if records.len() < self.expansion_threshold {
            match self.expand(query, &records).await {
                Ok(enriched) => records.extend(enriched),
                Err(e) => {
                    error!(error = %e, "DataForSEO Labs enrichment failed");
                    if records.is_empty() {
                        if let Some(primary) = primary_error {
                            return Err(primary);
                        }
                    }
                }
            }
        }

        let exclude = query.exclusion_tokens();
        let before = records.len();
        let filtered = filter_terms(records, query.min_volume, &exclude);
        info!(
            fetched = before,
            kept = filtered.len(),
            "DataForSEO returned keywords"
        );
        Ok(filtered)
    }
}

// ============================================================================
// Response handling
// ============================================================================

#[derive(Debug, Deserialize)]
struct TaskEnvelope {
    #[serde(default)]
    tasks: Option<Vec<Task>>,
}

#[derive(Debug, Deserialize)]
struct Task {
    #[serde(default)]
    status_code: Option<u64>,
    #[serde(default)]
    status_message: Option<String>,
    #[serde(default)]
    result: Option<Vec<Value>>,
}

impl TaskEnvelope {
    /// Flatten results into keyword items. Google Ads endpoints put keyword
    /// objects directly in `result`; Labs endpoints nest them under `items`.
    /// Fails only when no task succeeded and at least one reported an error.
    fn into_items(self) -> Result<Vec<Value>, ProviderError> {
        let tasks = self.tasks.unwrap_or_default();
        let mut items = Vec::new();
        let mut failure: Option<(u64, String)> = None;
        let mut any_success = false;

        for task in tasks {
            match task.status_code {
                Some(code) if code != SUCCESS_STATUS => {
                    failure = Some((code, task.status_message.unwrap_or_default()));
                    continue;
                }
                _ => any_success = true,
            }
            for entry in task.result.unwrap_or_default() {
                match entry.get("items") {
                    Some(Value::Array(nested)) => items.extend(nested.iter().cloned()),
                    Some(_) => {}
                    None => items.push(entry),
                }
            }
        }

        match failure {
            Some((code, message)) if !any_success => Err(ProviderError::ApiError {
                status: u16::try_from(code).unwrap_or(u16::MAX),
                message,
            }),
            _ => Ok(items),
        }
    }
}

/// Map one keyword item. Metrics live either at the top level or, for Labs
/// results, under `keyword_info`.
fn map_keyword_item(item: &Value) -> Option<KeywordRecord> {
    let text = item.get("keyword").and_then(Value::as_str)?;
    let info = item.get("keyword_info");
    let field = |name: &str| {
        item.get(name)
            .filter(|v| !v.is_null())
            .or_else(|| info.and_then(|i| i.get(name)).filter(|v| !v.is_null()))
    };

    let volume = field("avg_monthly_searches")
        .or_else(|| field("search_volume"))
        .and_then(value_as_u64)
        .unwrap_or(0);
    let competition = competition_from_value(field("competition"));
    let cpc = field("cpc").and_then(value_as_f64).unwrap_or(0.0);
    let (low, high) = bids_from_cpc(cpc);

    KeywordRecord::new(text, volume, competition, ProviderTag::DataForSeo)
        .map(|r| r.with_bids(low, high))
}

/// Drop terms containing an excluded token and terms under the volume floor.
fn filter_terms(
    records: Vec<KeywordRecord>,
    min_volume: u64,
    exclude_tokens: &[String],
) -> Vec<KeywordRecord> {
    records
        .into_iter()
        .filter(|r| {
            let lowered = r.text().to_lowercase();
            !exclude_tokens.iter().any(|t| lowered.contains(t.as_str()))
        })
        .filter(|r| r.monthly_volume() >= min_volume)
        .collect()
}

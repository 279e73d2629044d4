//! SerpAPI keyword discovery.
//!
//! SerpAPI has no volume data. Each seed is searched twice; suggestions and
//! related questions from the first pass score 3 per occurrence and related
//! searches from the second score 2. The accumulated score stands in for
//! monthly volume.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::normalize::{dedup_preserving_order, lenient_string};
use super::{check_status, http_client, parse_json, KeywordProvider, ProviderError};
use crate::keyword::{Competition, KeywordQuery, KeywordRecord, ProviderTag};

const DEFAULT_BASE_URL: &str = "https://serpapi.com/search.json";
const SUGGESTION_WEIGHT: u64 = 3;
const RELATED_WEIGHT: u64 = 2;

/// SerpAPI configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SerpApiConfig {
    #[serde(default, deserialize_with = "lenient_string")]
    pub api_key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    /// Number of seeds searched per request.
    #[serde(default = "default_max_seeds")]
    pub max_seeds: usize,
    #[serde(default = "default_google_domain")]
    pub google_domain: String,
    #[serde(default = "default_timeout")]
    pub timeout_secs: u32,
}

fn default_max_seeds() -> usize {
    5
}

fn default_google_domain() -> String {
    "google.com".to_string()
}

fn default_timeout() -> u32 {
    20
}

impl Default for SerpApiConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: None,
            max_seeds: default_max_seeds(),
            google_domain: default_google_domain(),
            timeout_secs: default_timeout(),
        }
    }
}

/// SerpAPI discovery client.
pub struct SerpApiClient {
    client: Client,
    api_key: String,
    base_url: String,
    max_seeds: usize,
    google_domain: String,
}

impl SerpApiClient {
    pub fn new(config: SerpApiConfig) -> Result<Self, ProviderError> {
        if config.api_key.is_empty() {
            warn!("SerpAPI key not configured - discovery will be disabled");
        }

        Ok(Self {
            client: http_client(config.timeout_secs)?,
            api_key: config.api_key,
            base_url: config
                .base_url
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            max_seeds: config.max_seeds,
            google_domain: config.google_domain,
        })
    }

    async fn search(
        &self,
        seed: &str,
        language: &str,
        num: Option<u32>,
    ) -> Result<SearchResponse, ProviderError> {
        let mut params: Vec<(&str, String)> = vec![
            ("engine", "google".to_string()),
            ("q", seed.to_string()),
            ("google_domain", self.google_domain.clone()),
            ("hl", language.to_string()),
            ("api_key", self.api_key.clone()),
        ];
        if let Some(num) = num {
            params.push(("num", num.to_string()));
        }

        debug!(seed, "SerpAPI search");
        let response = self
            .client
            .get(&self.base_url)
            .query(&params)
            .send()
            .await
            .map_err(ProviderError::from_transport)?;

        parse_json(check_status(response).await?, "SerpAPI search").await
    }

    /// Suggested searches and related questions for a seed, deduplicated.
    async fn suggestions(&self, seed: &str, language: &str) -> Result<Vec<String>, ProviderError> {
        let res = self.search(seed, language, Some(10)).await?;
        let mut out: Vec<String> = res
            .suggested_searches
            .unwrap_or_default()
            .into_iter()
            .filter_map(|s| s.query.or(s.title))
            .collect();
        out.extend(
            res.related_questions
                .unwrap_or_default()
                .into_iter()
                .filter_map(|q| q.question),
        );
        Ok(dedup_preserving_order(clean(out)))
    }

    /// Related searches for a seed, deduplicated.
    async fn related(&self, seed: &str, language: &str) -> Result<Vec<String>, ProviderError> {
        let res = self.search(seed, language, None).await?;
        let out: Vec<String> = res
            .related_searches
            .unwrap_or_default()
            .into_iter()
            .filter_map(|s| s.query.or(s.title))
            .collect();
        Ok(dedup_preserving_order(clean(out)))
    }
}

#[async_trait]
impl KeywordProvider for SerpApiClient {
    fn tag(&self) -> ProviderTag {
        ProviderTag::SerpApi
    }

    fn is_configured(&self) -> bool {
        !self.api_key.is_empty()
    }

    async fn fetch(&self, query: &KeywordQuery) -> Result<Vec<KeywordRecord>, ProviderError> {
        if !self.is_configured() {
            return Err(ProviderError::NotConfigured("SERPAPI_KEY missing".to_string()));
        }

        let mut tally = Tally::default();
        let mut last_error = None;
        let mut succeeded = false;

        for seed in query.seeds().iter().take(self.max_seeds) {
            match self.suggestions(seed, &query.language).await {
                Ok(hits) => {
                    succeeded = true;
                    tally.add(hits, SUGGESTION_WEIGHT);
                }
                Err(e) => {
                    warn!(seed = %seed, error = %e, "SerpAPI suggestion lookup failed");
                    last_error = Some(e);
                }
            }
            match self.related(seed, &query.language).await {
                Ok(hits) => {
                    succeeded = true;
                    tally.add(hits, RELATED_WEIGHT);
                }
                Err(e) => {
                    warn!(seed = %seed, error = %e, "SerpAPI related search failed");
                    last_error = Some(e);
                }
            }
        }

        if !succeeded {
            if let Some(e) = last_error {
                return Err(e);
            }
        }

        let records = tally.into_records();
        info!(count = records.len(), "SerpAPI discovered keywords");
        Ok(records)
    }
}

/// Accumulates scores per suggestion in first-seen order.
#[derive(Debug, Default)]
struct Tally {
    entries: Vec<(String, u64)>,
}

impl Tally {
    fn add(&mut self, hits: Vec<String>, weight: u64) {
        for hit in hits {
            match self.entries.iter_mut().find(|(text, _)| *text == hit) {
                Some((_, score)) => *score += weight,
                None => self.entries.push((hit, weight)),
            }
        }
    }

    fn into_records(self) -> Vec<KeywordRecord> {
        self.entries
            .into_iter()
            .filter_map(|(text, score)| {
                KeywordRecord::new(text, score, Competition::Unknown, ProviderTag::SerpApi)
            })
            .collect()
    }
}

fn clean(items: Vec<String>) -> Vec<String> {
    items
        .into_iter()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    suggested_searches: Option<Vec<SearchLink>>,
    #[serde(default)]
    related_questions: Option<Vec<RelatedQuestion>>,
    #[serde(default)]
    related_searches: Option<Vec<SearchLink>>,
}

#[derive(Debug, Deserialize)]
struct SearchLink {
    #[serde(default)]
    query: Option<String>,
    #[serde(default)]
    title: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RelatedQuestion {
    #[serde(default)]
    question: Option<String>,
}

//! Keyword generation and filtering handlers.

use std::sync::Arc;

use axum::{extract::rejection::JsonRejection, extract::State, Json};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use semplan_core::{
    filter_keywords as run_filter, FilterCriteria, FilterOutcome, KeywordQuery, PlanError,
    ProviderAttempt, ScoredKeyword, Scorer,
};

use super::error::{track, ApiError};
use crate::state::AppState;

const DEFAULT_MAX_RESULTS: usize = 1000;

// ============================================================================
// Request/Response types
// ============================================================================

/// A location given as a geo target id, either as a number or a numeric string.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum LocationCode {
    Code(u32),
    Text(String),
}

impl LocationCode {
    fn parse(&self) -> Result<u32, PlanError> {
        match self {
            Self::Code(code) => Ok(*code),
            Self::Text(text) => text.trim().parse().map_err(|_| {
                PlanError::validation(format!("location '{}' is not a numeric geo target id", text))
            }),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct GenerateKeywordsRequest {
    #[serde(default)]
    pub seed_keywords: Vec<String>,
    #[serde(default)]
    pub brand_url: Option<String>,
    #[serde(default)]
    pub competitor_url: Option<String>,
    #[serde(default)]
    pub locations: Vec<LocationCode>,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub max_results: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct GenerateKeywordsResponse {
    pub status: &'static str,
    pub total_keywords: usize,
    pub keywords: Vec<ScoredKeyword>,
    pub data_source: &'static str,
    pub no_data: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub attempts: Vec<ProviderAttempt>,
    pub generated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct FilterKeywordsRequest {
    #[serde(default)]
    pub keywords: Vec<ScoredKeyword>,
    #[serde(flatten)]
    pub criteria: FilterCriteria,
}

#[derive(Debug, Serialize)]
pub struct FilterKeywordsResponse {
    pub status: &'static str,
    #[serde(flatten)]
    pub outcome: FilterOutcome,
}

// ============================================================================
// Handlers
// ============================================================================

fn build_query(
    state: &AppState,
    body: GenerateKeywordsRequest,
) -> Result<(KeywordQuery, usize), PlanError> {
    let planner = state.planner();

    let max_results = body.max_results.unwrap_or(DEFAULT_MAX_RESULTS);
    if max_results == 0 {
        return Err(PlanError::validation("max_results must be at least 1"));
    }

    let locations = body
        .locations
        .iter()
        .map(LocationCode::parse)
        .collect::<Result<Vec<u32>, _>>()?;

    let query = KeywordQuery::new(&body.seed_keywords)?
        .with_locations(if locations.is_empty() {
            vec![planner.default_location_code]
        } else {
            locations
        })
        .with_language(
            body.language
                .unwrap_or_else(|| planner.default_language.clone()),
        )
        .with_brand_url(body.brand_url)
        .with_competitor_url(body.competitor_url)
        .with_min_volume(planner.default_min_volume);

    Ok((query, max_results.min(planner.max_results)))
}

/// POST /api/v1/generate_keywords
///
/// Runs the provider waterfall for the seeds and scores whatever the first
/// productive tier returned. An empty result is still a success.
pub async fn generate_keywords(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<GenerateKeywordsRequest>, JsonRejection>,
) -> Result<Json<GenerateKeywordsResponse>, ApiError> {
    let Json(body) = payload?;

    let built = build_query(&state, body);
    track("generate_keywords", &built);
    let (query, max_results) = built?;

    let acquisition = state.waterfall().acquire(&query).await;
    let message = acquisition.no_data_message();
    let data_source = acquisition.provider.map(|p| p.as_str()).unwrap_or("none");

    let scored = Scorer::for_query(&query).score_all(acquisition.records);
    let total_keywords = scored.len();
    let keywords: Vec<ScoredKeyword> = scored.into_iter().take(max_results).collect();

    info!(
        seeds = query.seeds().len(),
        total_keywords,
        returned = keywords.len(),
        data_source,
        "Keyword generation complete"
    );

    Ok(Json(GenerateKeywordsResponse {
        status: "success",
        total_keywords,
        keywords,
        data_source,
        no_data: total_keywords == 0,
        message,
        attempts: acquisition.attempts,
        generated_at: Utc::now(),
    }))
}

/// POST /api/v1/filter_keywords
pub async fn filter_keywords(
    payload: Result<Json<FilterKeywordsRequest>, JsonRejection>,
) -> Result<Json<FilterKeywordsResponse>, ApiError> {
    let Json(body) = payload?;

    let result = run_filter(body.keywords, &body.criteria);
    track("filter_keywords", &result);
    let outcome = result?;

    info!(
        original = outcome.original_count,
        kept = outcome.filtered_count,
        "Keywords filtered"
    );

    Ok(Json(FilterKeywordsResponse {
        status: "success",
        outcome,
    }))
}

//! Ad group, Performance Max theme and bid handlers.

use axum::{extract::rejection::JsonRejection, Json};
use serde::{Deserialize, Serialize};
use tracing::info;

use semplan_core::{
    bucketize, calculate_bids as run_bids, group_keywords as run_grouping,
    insights::{PMAX_BEST_PRACTICES, PMAX_OPTIMIZATION_FEATURES},
    metrics::PLANNING_RUNS,
    planning::GROUPING_NOTES,
    AdGroup, BidRequest, BidSummary, PMaxTheme, ScoredKeyword,
};

use super::error::{track, ApiError};

/// Keyword list shared by the grouping and theme endpoints. Filter fields sent
/// alongside are accepted and ignored.
#[derive(Debug, Deserialize)]
pub struct KeywordSetRequest {
    #[serde(default)]
    pub keywords: Vec<ScoredKeyword>,
}

#[derive(Debug, Serialize)]
pub struct GroupKeywordsResponse {
    pub status: &'static str,
    pub ad_groups: Vec<AdGroup>,
    pub total_keywords: usize,
    pub grouped_keywords: usize,
    pub optimization_notes: [&'static str; 3],
}

#[derive(Debug, Serialize)]
pub struct PMaxThemesResponse {
    pub status: &'static str,
    pub themes: Vec<PMaxTheme>,
    pub total_keywords: usize,
    pub data_source: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<&'static str>,
    pub optimization_features: [&'static str; 4],
    pub best_practices: [&'static str; 4],
}

#[derive(Debug, Serialize)]
pub struct CalculateBidsResponse {
    pub status: &'static str,
    #[serde(flatten)]
    pub summary: BidSummary,
}

/// POST /api/v1/group_keywords
pub async fn group_keywords(
    payload: Result<Json<KeywordSetRequest>, JsonRejection>,
) -> Result<Json<GroupKeywordsResponse>, ApiError> {
    let Json(body) = payload?;

    let ad_groups = run_grouping(&body.keywords);
    let grouped_keywords = ad_groups.iter().map(|g| g.keywords.len()).sum();
    PLANNING_RUNS.with_label_values(&["group_keywords", "ok"]).inc();

    info!(
        groups = ad_groups.len(),
        grouped_keywords,
        "Keywords grouped"
    );

    Ok(Json(GroupKeywordsResponse {
        status: "success",
        ad_groups,
        total_keywords: body.keywords.len(),
        grouped_keywords,
        optimization_notes: GROUPING_NOTES,
    }))
}

/// POST /api/v1/pmax_themes
pub async fn pmax_themes(
    payload: Result<Json<KeywordSetRequest>, JsonRejection>,
) -> Result<Json<PMaxThemesResponse>, ApiError> {
    let Json(body) = payload?;

    let themes = bucketize(&body.keywords);
    PLANNING_RUNS.with_label_values(&["pmax_themes", "ok"]).inc();

    info!(themes = themes.len(), "Performance Max themes built");

    Ok(Json(PMaxThemesResponse {
        status: "success",
        message: themes
            .is_empty()
            .then_some("No keywords supplied - no Performance Max themes generated"),
        themes,
        total_keywords: body.keywords.len(),
        data_source: "keyword_analysis",
        optimization_features: PMAX_OPTIMIZATION_FEATURES,
        best_practices: PMAX_BEST_PRACTICES,
    }))
}

/// POST /api/v1/calculate_bids
pub async fn calculate_bids(
    payload: Result<Json<BidRequest>, JsonRejection>,
) -> Result<Json<CalculateBidsResponse>, ApiError> {
    let Json(request) = payload?;

    let result = run_bids(&request);
    track("calculate_bids", &result);
    let summary = result?;

    info!(
        ad_groups = summary.bid_recommendations.len(),
        total_budget = summary.total_budget,
        "Bids calculated"
    );

    Ok(Json(CalculateBidsResponse {
        status: "success",
        summary,
    }))
}

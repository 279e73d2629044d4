//! Static SEM guidance handlers.

use axum::Json;
use chrono::{DateTime, Utc};
use serde::Serialize;

use semplan_core::insights::{
    campaign_optimizations, sem_trends, CampaignOptimization, Trend, BEST_PRACTICES,
    OPTIMIZATION_INSIGHTS, OPTIMIZATION_NEXT_STEPS,
};

#[derive(Debug, Serialize)]
pub struct TrendsResponse {
    pub status: &'static str,
    pub trends: Vec<Trend>,
    pub best_practices: [&'static str; 5],
    pub data_source: &'static str,
    pub generated_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct OptimizeCampaignsResponse {
    pub status: &'static str,
    pub optimizations: Vec<CampaignOptimization>,
    pub key_insights: [&'static str; 4],
    pub next_steps: [&'static str; 4],
}

/// GET /api/v1/trends
pub async fn trends() -> Json<TrendsResponse> {
    Json(TrendsResponse {
        status: "success",
        trends: sem_trends(),
        best_practices: BEST_PRACTICES,
        data_source: "static",
        generated_at: Utc::now(),
    })
}

/// POST /api/v1/optimize_campaigns
///
/// The templates do not depend on the request, so any body is accepted.
pub async fn optimize_campaigns() -> Json<OptimizeCampaignsResponse> {
    Json(OptimizeCampaignsResponse {
        status: "success",
        optimizations: campaign_optimizations(),
        key_insights: OPTIMIZATION_INSIGHTS,
        next_steps: OPTIMIZATION_NEXT_STEPS,
    })
}

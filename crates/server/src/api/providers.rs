//! Provider status handler.

use std::sync::Arc;

use axum::{extract::State, Json};
use serde::Serialize;

use semplan_core::ProviderStatus;

use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct ProvidersStatusResponse {
    pub status: &'static str,
    /// Providers in waterfall order.
    pub providers: Vec<ProviderStatus>,
    pub configured_count: usize,
}

/// GET /api/v1/providers/status
pub async fn get_status(State(state): State<Arc<AppState>>) -> Json<ProvidersStatusResponse> {
    let providers = state.waterfall().statuses();
    let configured_count = providers.iter().filter(|p| p.configured).count();

    Json(ProvidersStatusResponse {
        status: "success",
        providers,
        configured_count,
    })
}

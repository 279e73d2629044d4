use axum::{
    http::HeaderValue,
    middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::warn;

use semplan_core::CorsConfig;

use super::{handlers, insights, keywords, middleware::metrics_middleware, planning, providers};
use crate::state::AppState;

pub fn create_router(state: Arc<AppState>) -> Router {
    let cors = cors_layer(&state.config().cors);

    let api_routes = Router::new()
        // Health, config and metrics
        .route("/health", get(handlers::health))
        .route("/config", get(handlers::get_config))
        .route("/metrics", get(handlers::metrics))
        .route("/providers/status", get(providers::get_status))
        // Keyword acquisition and filtering
        .route("/generate_keywords", post(keywords::generate_keywords))
        .route("/filter_keywords", post(keywords::filter_keywords))
        // Campaign planning
        .route("/group_keywords", post(planning::group_keywords))
        .route("/pmax_themes", post(planning::pmax_themes))
        .route("/calculate_bids", post(planning::calculate_bids))
        // Static guidance
        .route("/trends", get(insights::trends))
        .route("/optimize_campaigns", post(insights::optimize_campaigns))
        .with_state(state);

    Router::new()
        .nest("/api/v1", api_routes)
        .layer(middleware::from_fn(metrics_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}

fn cors_layer(config: &CorsConfig) -> CorsLayer {
    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);
    if config.allows_any() {
        return layer.allow_origin(Any);
    }

    let origins: Vec<HeaderValue> = config
        .allowed_origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();
    layer.allow_origin(AllowOrigin::list(origins))
}

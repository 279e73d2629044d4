//! Prometheus metrics for core components.
//!
//! This module provides metrics for:
//! - Keyword providers (calls, latency, result sizes)
//! - The acquisition waterfall (which tier served a request)
//! - Planning stages (validation and stage failures)

use once_cell::sync::Lazy;
use prometheus::{HistogramOpts, HistogramVec, IntCounterVec, Opts};

// =============================================================================
// Provider Metrics
// =============================================================================

/// Provider calls total by provider and result.
pub static PROVIDER_CALLS: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("semplan_provider_calls_total", "Total keyword provider calls"),
        &["provider", "result"], // result: "returned", "empty", "failed"
    )
    .unwrap()
});

/// Provider call duration in seconds.
pub static PROVIDER_DURATION: Lazy<HistogramVec> = Lazy::new(|| {
    HistogramVec::new(
        HistogramOpts::new(
            "semplan_provider_duration_seconds",
            "Duration of keyword provider calls",
        )
        .buckets(vec![0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 20.0, 30.0]),
        &["provider"],
    )
    .unwrap()
});

/// Keywords returned per provider call.
pub static KEYWORDS_RETURNED: Lazy<HistogramVec> = Lazy::new(|| {
    HistogramVec::new(
        HistogramOpts::new(
            "semplan_keywords_returned",
            "Number of keywords returned per provider call",
        )
        .buckets(vec![0.0, 1.0, 10.0, 30.0, 100.0, 250.0, 500.0, 1000.0]),
        &["provider"],
    )
    .unwrap()
});

// =============================================================================
// Waterfall Metrics
// =============================================================================

/// Waterfall outcomes by serving provider ("none" when every tier was empty).
pub static WATERFALL_OUTCOMES: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new(
            "semplan_waterfall_outcomes_total",
            "Total waterfall acquisitions by serving provider",
        ),
        &["provider"],
    )
    .unwrap()
});

// =============================================================================
// Planning Metrics
// =============================================================================

/// Planning stage runs by stage and result.
pub static PLANNING_RUNS: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("semplan_planning_runs_total", "Total planning stage runs"),
        &["stage", "result"], // result: "ok", "invalid", "error"
    )
    .unwrap()
});

// =============================================================================
// Helper functions
// =============================================================================

/// Get all core metrics for registration in a registry.
pub fn all_metrics() -> Vec<Box<dyn prometheus::core::Collector>> {
    vec![
        // Providers
        Box::new(PROVIDER_CALLS.clone()),
        Box::new(PROVIDER_DURATION.clone()),
        Box::new(KEYWORDS_RETURNED.clone()),
        // Waterfall
        Box::new(WATERFALL_OUTCOMES.clone()),
        // Planning
        Box::new(PLANNING_RUNS.clone()),
    ]
}

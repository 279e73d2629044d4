//! End-to-end tests driving the router in-process with mock providers.

mod common;

use axum::http::StatusCode;
use serde_json::json;

use common::{fixtures, TestFixture};
use semplan_core::{Competition, Config, ProviderError, ProviderTag};

// =============================================================================
// Health, config, status
// =============================================================================

#[tokio::test]
async fn test_health() {
    let fixture = TestFixture::new();
    let response = fixture.get("/api/v1/health").await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["status"], "ok");
    assert!(response.body["version"].is_string());
}

#[tokio::test]
async fn test_config_is_sanitized() {
    let mut config = Config::default();
    config.providers.serpapi.api_key = "super-secret".to_string();
    let fixture = TestFixture::with_config(config);

    let response = fixture.get("/api/v1/config").await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(
        response.body["providers"]["serpapi"]["credentials_configured"],
        true
    );
    assert!(!response.body.to_string().contains("super-secret"));
}

#[tokio::test]
async fn test_providers_status_in_waterfall_order() {
    let fixture = TestFixture::new();
    fixture.google_ads.set_configured(true);

    let response = fixture.get("/api/v1/providers/status").await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["configured_count"], 1);

    let providers = response.body["providers"].as_array().unwrap();
    let order: Vec<&str> = providers
        .iter()
        .map(|p| p["provider"].as_str().unwrap())
        .collect();
    assert_eq!(
        order,
        vec!["dataforseo", "keyword_planner", "ms_ads_planner", "serpapi"]
    );
    assert_eq!(providers[0]["priority"], 1);
    assert_eq!(providers[1]["configured"], true);
}

#[tokio::test]
async fn test_metrics_endpoint() {
    let fixture = TestFixture::new();
    fixture.get("/api/v1/health").await;

    let (status, body) = fixture.get_text("/api/v1/metrics").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("semplan_http_requests_total"));
}

// =============================================================================
// Keyword generation
// =============================================================================

#[tokio::test]
async fn test_generate_with_nothing_configured_returns_no_data() {
    let fixture = TestFixture::new();

    let response = fixture
        .post(
            "/api/v1/generate_keywords",
            json!({ "seed_keywords": ["running shoes"] }),
        )
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["status"], "success");
    assert_eq!(response.body["total_keywords"], 0);
    assert_eq!(response.body["keywords"], json!([]));
    assert_eq!(response.body["no_data"], true);
    assert_eq!(response.body["data_source"], "none");
    assert!(response.body["message"]
        .as_str()
        .unwrap()
        .contains("no keyword provider is configured"));
    assert_eq!(response.body["attempts"].as_array().unwrap().len(), 4);
    assert!(response.body["generated_at"].is_string());
    assert_eq!(fixture.total_provider_calls().await, 0);
}

#[tokio::test]
async fn test_generate_running_shoes_from_keyword_planner() {
    let fixture = TestFixture::new();
    fixture.google_ads.set_configured(true);
    fixture
        .google_ads
        .set_results(vec![semplan_core::KeywordRecord::new(
            "running shoes",
            12_000,
            Competition::Medium,
            ProviderTag::GoogleAds,
        )
        .unwrap()
        .with_bids(800_000, 1_500_000)])
        .await;

    let response = fixture
        .post(
            "/api/v1/generate_keywords",
            json!({ "seed_keywords": ["running shoes"] }),
        )
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["total_keywords"], 1);
    assert_eq!(response.body["no_data"], false);
    assert_eq!(response.body["data_source"], "keyword_planner");
    assert!(response.body.get("message").is_none());

    let keyword = &response.body["keywords"][0];
    assert_eq!(keyword["keyword"], "running shoes");
    assert_eq!(keyword["avg_monthly_searches"], 12_000);
    assert_eq!(keyword["competition"], "Medium");
    assert_eq!(keyword["top_of_page_bid_low"], 0.8);
    assert_eq!(keyword["top_of_page_bid_high"], 1.5);
    assert_eq!(keyword["source"], "keyword_planner");
    assert_eq!(keyword["intent"], "commercial");
    assert_eq!(keyword["difficulty_score"], 0.5);
    assert_eq!(keyword["opportunity_score"], 0.57);

    let attempts = response.body["attempts"].as_array().unwrap();
    assert_eq!(attempts.len(), 2);
    assert_eq!(attempts[0]["outcome"], "not_configured");
    assert_eq!(attempts[1]["outcome"], "returned");
    assert_eq!(attempts[1]["count"], 1);
}

#[tokio::test]
async fn test_generate_stops_at_first_productive_tier() {
    let fixture = TestFixture::new();
    for provider in [&fixture.dataforseo, &fixture.google_ads, &fixture.serpapi] {
        provider.set_configured(true);
    }
    fixture
        .dataforseo
        .set_results(fixtures::running_shoes_records())
        .await;
    fixture
        .serpapi
        .set_results(vec![fixtures::record(
            "unused",
            1,
            Competition::Unknown,
            ProviderTag::SerpApi,
        )])
        .await;

    let response = fixture
        .post(
            "/api/v1/generate_keywords",
            json!({ "seed_keywords": ["running shoes"], "brand_url": "https://www.acme.com" }),
        )
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data_source"], "dataforseo");
    assert_eq!(response.body["total_keywords"], 5);
    assert_eq!(fixture.dataforseo.call_count().await, 1);
    assert_eq!(fixture.google_ads.call_count().await, 0);
    assert_eq!(fixture.serpapi.call_count().await, 0);
}

#[tokio::test]
async fn test_generate_falls_through_failures() {
    let fixture = TestFixture::new();
    fixture.dataforseo.set_configured(true);
    fixture.serpapi.set_configured(true);
    fixture
        .dataforseo
        .set_next_error(ProviderError::RateLimitExceeded)
        .await;
    fixture
        .serpapi
        .set_results(vec![fixtures::record(
            "trail running shoes",
            5,
            Competition::Unknown,
            ProviderTag::SerpApi,
        )])
        .await;

    let response = fixture
        .post(
            "/api/v1/generate_keywords",
            json!({ "seed_keywords": ["running shoes"] }),
        )
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data_source"], "serpapi");
    let attempts = response.body["attempts"].as_array().unwrap();
    assert_eq!(attempts[0]["outcome"], "failed");
    assert!(attempts[0]["reason"].is_string());
    assert_eq!(attempts[3]["outcome"], "returned");
}

#[tokio::test]
async fn test_generate_applies_request_targeting_and_truncates() {
    let fixture = TestFixture::new();
    fixture.dataforseo.set_configured(true);
    fixture
        .dataforseo
        .set_results(fixtures::running_shoes_records())
        .await;

    let response = fixture
        .post(
            "/api/v1/generate_keywords",
            json!({
                "seed_keywords": ["  running shoes ", ""],
                "locations": ["2276", 2040],
                "language": "DE",
                "max_results": 2
            }),
        )
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["total_keywords"], 5);
    assert_eq!(response.body["keywords"].as_array().unwrap().len(), 2);

    let queries = fixture.dataforseo.recorded_queries().await;
    assert_eq!(queries.len(), 1);
    assert_eq!(queries[0].seeds(), ["running shoes".to_string()]);
    assert_eq!(queries[0].location_codes, vec![2276, 2040]);
    assert_eq!(queries[0].language, "de");
}

#[tokio::test]
async fn test_generate_rejects_blank_seeds_before_any_provider() {
    let fixture = TestFixture::new();
    fixture.dataforseo.set_configured(true);

    for body in [
        json!({ "seed_keywords": [] }),
        json!({ "seed_keywords": ["   ", ""] }),
        json!({}),
    ] {
        let response = fixture.post("/api/v1/generate_keywords", body).await;
        assert_eq!(response.status, StatusCode::BAD_REQUEST);
        assert_eq!(response.body["status"], "error");
        assert!(response.body["error"].is_string());
    }
    assert_eq!(fixture.total_provider_calls().await, 0);
}

#[tokio::test]
async fn test_generate_rejects_bad_locations_and_max_results() {
    let fixture = TestFixture::new();

    let response = fixture
        .post(
            "/api/v1/generate_keywords",
            json!({ "seed_keywords": ["shoes"], "locations": ["Berlin"] }),
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);

    let response = fixture
        .post(
            "/api/v1/generate_keywords",
            json!({ "seed_keywords": ["shoes"], "max_results": 0 }),
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_malformed_json_is_bad_request() {
    let fixture = TestFixture::new();
    let response = fixture
        .post_raw("/api/v1/generate_keywords", "{ not json")
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["status"], "error");
}

// =============================================================================
// Planning stages
// =============================================================================

#[tokio::test]
async fn test_filter_keywords() {
    let fixture = TestFixture::new();
    let keywords = serde_json::to_value(fixtures::running_shoes_scored()).unwrap();

    let response = fixture
        .post(
            "/api/v1/filter_keywords",
            json!({
                "keywords": keywords,
                "min_search_volume": 1000,
                "max_competition": "Medium",
                "min_opportunity_score": 0.0
            }),
        )
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["status"], "success");
    assert_eq!(response.body["original_count"], 5);
    // "best running shoes" is High competition
    assert_eq!(response.body["filtered_count"], 4);
    assert_eq!(response.body["filter_criteria"]["min_search_volume"], 1000);

    let opportunities: Vec<f64> = response.body["keywords"]
        .as_array()
        .unwrap()
        .iter()
        .map(|k| k["opportunity_score"].as_f64().unwrap())
        .collect();
    assert!(opportunities.windows(2).all(|w| w[0] >= w[1]));
}

#[tokio::test]
async fn test_filter_rejects_blank_keyword_text() {
    let fixture = TestFixture::new();
    let response = fixture
        .post(
            "/api/v1/filter_keywords",
            json!({ "keywords": [ { "keyword": "  " } ] }),
        )
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_group_keywords() {
    let fixture = TestFixture::new();
    let keywords = serde_json::to_value(fixtures::running_shoes_scored()).unwrap();

    let response = fixture
        .post("/api/v1/group_keywords", json!({ "keywords": keywords }))
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["total_keywords"], 5);
    assert_eq!(response.body["grouped_keywords"], 5);
    assert_eq!(
        response.body["optimization_notes"].as_array().unwrap().len(),
        3
    );

    let groups = response.body["ad_groups"].as_array().unwrap();
    let names: Vec<&str> = groups.iter().map(|g| g["name"].as_str().unwrap()).collect();
    assert_eq!(names, vec!["Category Terms", "Informational Terms"]);
    assert_eq!(groups[0]["cpc_range"], json!({ "low": 3.2, "high": 8.5 }));
    assert_eq!(
        groups[1]["suggested_match_types"]["exact"],
        json!([])
    );
}

#[tokio::test]
async fn test_pmax_themes() {
    let fixture = TestFixture::new();
    let keywords = serde_json::to_value(fixtures::running_shoes_scored()).unwrap();

    let response = fixture
        .post("/api/v1/pmax_themes", json!({ "keywords": keywords }))
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["total_keywords"], 5);
    assert_eq!(response.body["data_source"], "keyword_analysis");
    assert!(!response.body["themes"].as_array().unwrap().is_empty());
    assert_eq!(
        response.body["optimization_features"].as_array().unwrap().len(),
        4
    );

    let empty = fixture
        .post("/api/v1/pmax_themes", json!({ "keywords": [] }))
        .await;
    assert_eq!(empty.status, StatusCode::OK);
    assert_eq!(empty.body["themes"], json!([]));
    assert!(empty.body["message"].is_string());
}

#[tokio::test]
async fn test_calculate_bids() {
    let fixture = TestFixture::new();
    let ad_groups = serde_json::to_value(fixtures::running_shoes_ad_groups()).unwrap();

    let response = fixture
        .post(
            "/api/v1/calculate_bids",
            json!({ "ad_groups": ad_groups, "budgets": { "search": 6000.0 } }),
        )
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["status"], "success");
    assert_eq!(response.body["total_budget"], 6000.0);
    // 36 + 24 conversions
    assert_eq!(response.body["target_cpa"], 100.0);
    assert_eq!(response.body["expected_roas"], 4.0);

    let recs = response.body["bid_recommendations"].as_array().unwrap();
    assert_eq!(recs[0]["ad_group_name"], "Category Terms");
    assert_eq!(recs[0]["recommended_bid"], 3.2);
    assert_eq!(recs[1]["recommended_bid"], 2.0);
    assert_eq!(
        response.body["optimization_strategy"]["bid_strategy"],
        "Target ROAS"
    );
}

#[tokio::test]
async fn test_calculate_bids_without_roas_target() {
    let fixture = TestFixture::new();
    let response = fixture
        .post(
            "/api/v1/calculate_bids",
            json!({ "ad_groups": [], "budgets": { "search": 100.0 }, "target_roas": null }),
        )
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(
        response.body["optimization_strategy"]["bid_strategy"],
        "Target CPA"
    );
    assert_eq!(response.body["target_cpa"], 100.0);
}

#[tokio::test]
async fn test_calculate_bids_validation_errors() {
    let fixture = TestFixture::new();

    for body in [
        json!({ "ad_groups": [], "budgets": { "search": -1.0 } }),
        json!({ "ad_groups": [], "budgets": {}, "conversion_rate": 0.0 }),
        json!({ "ad_groups": [], "budgets": {}, "conversion_rate": 1.5 }),
        json!({
            "ad_groups": [ { "name": "x", "cpc_range": { "low": 5.0, "high": 1.0 } } ],
            "budgets": {}
        }),
    ] {
        let response = fixture.post("/api/v1/calculate_bids", body).await;
        assert_eq!(response.status, StatusCode::BAD_REQUEST);
        assert_eq!(response.body["status"], "error");
    }
}

#[tokio::test]
async fn test_calculate_bids_overflow_is_stage_error() {
    let fixture = TestFixture::new();
    let response = fixture
        .post(
            "/api/v1/calculate_bids",
            json!({ "ad_groups": [], "budgets": { "a": 1.0e308, "b": 1.0e308 } }),
        )
        .await;

    assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(response.body["stage"], "calculate_bids");
    assert!(response.body["error"].is_string());
}

// =============================================================================
// Static guidance
// =============================================================================

#[tokio::test]
async fn test_trends() {
    let fixture = TestFixture::new();
    let response = fixture.get("/api/v1/trends").await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["trends"].as_array().unwrap().len(), 6);
    assert_eq!(response.body["best_practices"].as_array().unwrap().len(), 5);
}

#[tokio::test]
async fn test_optimize_campaigns_ignores_body() {
    let fixture = TestFixture::new();
    let response = fixture
        .post(
            "/api/v1/optimize_campaigns",
            json!({ "ad_groups": [], "budgets": { "search": 100.0 } }),
        )
        .await;

    assert_eq!(response.status, StatusCode::OK);
    let optimizations = response.body["optimizations"].as_array().unwrap();
    assert_eq!(optimizations[0]["campaign_type"], "Search");
    assert_eq!(optimizations[1]["bid_strategy"], "Maximize Conversion Value");
    assert_eq!(response.body["next_steps"].as_array().unwrap().len(), 4);
}

#[tokio::test]
async fn test_unknown_route_is_not_found() {
    let fixture = TestFixture::new();
    let response = fixture.get("/api/v1/does-not-exist").await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

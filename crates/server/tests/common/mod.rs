//! Common test utilities for E2E testing with mocks.
//!
//! This module provides a test fixture that builds the router in-process
//! with a waterfall of mock keyword providers, so every endpoint can be
//! exercised without provider accounts or network access.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use semplan_core::{
    testing::MockKeywordProvider, Config, KeywordProvider, ProviderTag, Waterfall,
};
use semplan_server::{api::create_router, state::AppState};

/// Re-export fixtures for test convenience
pub use semplan_core::testing::fixtures;

/// Test fixture for E2E testing with mock providers.
///
/// The four mocks sit in the same order as the real waterfall and start
/// unconfigured.
///
/// # Example
///
/// ```rust,ignore
/// #[tokio::test]
/// async fn test_generate() {
///     let fixture = TestFixture::new();
///     fixture.dataforseo.set_configured(true);
///     fixture.dataforseo.set_results(fixtures::running_shoes_records()).await;
///
///     let response = fixture.post("/api/v1/generate_keywords", json!({
///         "seed_keywords": ["running shoes"]
///     })).await;
///
///     assert_eq!(response.status, 200);
/// }
/// ```
pub struct TestFixture {
    /// The Axum router for testing
    pub router: Router,
    pub dataforseo: Arc<MockKeywordProvider>,
    pub google_ads: Arc<MockKeywordProvider>,
    pub microsoft_ads: Arc<MockKeywordProvider>,
    pub serpapi: Arc<MockKeywordProvider>,
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub body: Value,
}

impl TestFixture {
    /// Create a fixture with default config and every provider unconfigured.
    pub fn new() -> Self {
        Self::with_config(Config::default())
    }

    pub fn with_config(config: Config) -> Self {
        let dataforseo = Arc::new(MockKeywordProvider::unconfigured(ProviderTag::DataForSeo));
        let google_ads = Arc::new(MockKeywordProvider::unconfigured(ProviderTag::GoogleAds));
        let microsoft_ads =
            Arc::new(MockKeywordProvider::unconfigured(ProviderTag::MicrosoftAds));
        let serpapi = Arc::new(MockKeywordProvider::unconfigured(ProviderTag::SerpApi));

        let providers: Vec<Arc<dyn KeywordProvider>> = vec![
            dataforseo.clone(),
            google_ads.clone(),
            microsoft_ads.clone(),
            serpapi.clone(),
        ];
        let state = Arc::new(AppState::new(config, Arc::new(Waterfall::new(providers))));

        Self {
            router: create_router(state),
            dataforseo,
            google_ads,
            microsoft_ads,
            serpapi,
        }
    }

    /// Total fetch calls across every mock provider.
    pub async fn total_provider_calls(&self) -> usize {
        self.dataforseo.call_count().await
            + self.google_ads.call_count().await
            + self.microsoft_ads.call_count().await
            + self.serpapi.call_count().await
    }

    pub async fn get(&self, path: &str) -> TestResponse {
        self.request("GET", path, None).await
    }

    pub async fn post(&self, path: &str, body: Value) -> TestResponse {
        self.request("POST", path, Some(body)).await
    }

    /// Send a POST with a raw body, for malformed-JSON cases.
    pub async fn post_raw(&self, path: &str, body: &str) -> TestResponse {
        let request = Request::builder()
            .method("POST")
            .uri(path)
            .header("Content-Type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        self.send(request).await
    }

    /// Send a request and return the raw status and text body.
    pub async fn get_text(&self, path: &str) -> (StatusCode, String) {
        let request = Request::builder().uri(path).body(Body::empty()).unwrap();
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Failed to send request");
        let status = response.status();
        let bytes = response
            .into_body()
            .collect()
            .await
            .expect("Failed to collect body")
            .to_bytes();
        (status, String::from_utf8_lossy(&bytes).into_owned())
    }

    async fn request(&self, method: &str, path: &str, body: Option<Value>) -> TestResponse {
        let mut request_builder = Request::builder().method(method).uri(path);

        let body = if let Some(json_body) = body {
            request_builder = request_builder.header("Content-Type", "application/json");
            Body::from(serde_json::to_vec(&json_body).unwrap())
        } else {
            Body::empty()
        };

        self.send(request_builder.body(body).unwrap()).await
    }

    async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let body_bytes = response
            .into_body()
            .collect()
            .await
            .expect("Failed to collect body")
            .to_bytes();

        let body: Value = if body_bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&body_bytes).unwrap_or(Value::Null)
        };

        TestResponse { status, body }
    }
}

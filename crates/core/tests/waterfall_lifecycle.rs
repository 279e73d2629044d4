//! Waterfall lifecycle integration tests.
//!
//! These tests drive the provider chain with mock providers and follow the
//! served records through scoring and grouping:
//! acquire -> score -> group

use std::sync::Arc;

use semplan_core::{
    group_keywords,
    testing::{fixtures, MockKeywordProvider},
    AttemptOutcome, Intent, KeywordProvider, ProviderError, ProviderTag, Scorer, Waterfall,
};

/// The four tiers in production order, all configured and empty.
struct TestHarness {
    dataforseo: Arc<MockKeywordProvider>,
    google_ads: Arc<MockKeywordProvider>,
    microsoft_ads: Arc<MockKeywordProvider>,
    serpapi: Arc<MockKeywordProvider>,
}

impl TestHarness {
    fn new() -> Self {
        Self {
            dataforseo: Arc::new(MockKeywordProvider::new(ProviderTag::DataForSeo)),
            google_ads: Arc::new(MockKeywordProvider::new(ProviderTag::GoogleAds)),
            microsoft_ads: Arc::new(MockKeywordProvider::new(ProviderTag::MicrosoftAds)),
            serpapi: Arc::new(MockKeywordProvider::new(ProviderTag::SerpApi)),
        }
    }

    fn waterfall(&self) -> Waterfall {
        let providers: Vec<Arc<dyn KeywordProvider>> = vec![
            self.dataforseo.clone(),
            self.google_ads.clone(),
            self.microsoft_ads.clone(),
            self.serpapi.clone(),
        ];
        Waterfall::new(providers)
    }

    async fn call_counts(&self) -> [usize; 4] {
        [
            self.dataforseo.call_count().await,
            self.google_ads.call_count().await,
            self.microsoft_ads.call_count().await,
            self.serpapi.call_count().await,
        ]
    }
}

fn outcomes(attempts: &[semplan_core::ProviderAttempt]) -> Vec<(ProviderTag, &str)> {
    attempts
        .iter()
        .map(|a| (a.provider, a.outcome.as_str()))
        .collect()
}

#[tokio::test]
async fn test_primary_provider_serves_and_pipeline_scores() {
    let harness = TestHarness::new();
    harness
        .dataforseo
        .set_results(fixtures::running_shoes_records())
        .await;

    let query = fixtures::query(&["running shoes"])
        .with_brand_url(Some("https://www.acme.com".to_string()));
    let acquisition = harness.waterfall().acquire(&query).await;

    assert_eq!(acquisition.provider, Some(ProviderTag::DataForSeo));
    assert_eq!(acquisition.records.len(), 5);
    assert_eq!(
        outcomes(&acquisition.attempts),
        vec![(ProviderTag::DataForSeo, "returned")]
    );
    assert_eq!(harness.call_counts().await, [1, 0, 0, 0]);
    assert_eq!(acquisition.no_data_message(), None);

    let scored = Scorer::for_query(&query).score_all(acquisition.records);
    let head = &scored[0];
    assert_eq!(head.text(), "running shoes");
    assert_eq!(head.difficulty(), 0.5);
    assert_eq!(head.opportunity(), 0.57);
    assert_eq!(head.intent(), Intent::Commercial);
    assert_eq!(head.source(), ProviderTag::DataForSeo);

    let question = scored
        .iter()
        .find(|k| k.text() == "how to choose running shoes")
        .unwrap();
    assert_eq!(question.intent(), Intent::Informational);

    let groups = group_keywords(&scored);
    let names: Vec<&str> = groups.iter().map(|g| g.name.as_str()).collect();
    assert!(names.contains(&"Category Terms"));
    assert!(names.contains(&"Informational Terms"));
    let grouped: usize = groups.iter().map(|g| g.keywords.len()).sum();
    assert_eq!(grouped, 5);
}

#[tokio::test]
async fn test_empty_and_failing_tiers_fall_through() {
    let harness = TestHarness::new();
    harness
        .google_ads
        .set_next_error(ProviderError::RateLimitExceeded)
        .await;
    harness.microsoft_ads.set_configured(false);
    harness
        .serpapi
        .set_results(vec![fixtures::record(
            "trail running shoes",
            5,
            semplan_core::Competition::Unknown,
            ProviderTag::SerpApi,
        )])
        .await;

    let acquisition = harness
        .waterfall()
        .acquire(&fixtures::query(&["running shoes"]))
        .await;

    assert_eq!(acquisition.provider, Some(ProviderTag::SerpApi));
    assert_eq!(
        outcomes(&acquisition.attempts),
        vec![
            (ProviderTag::DataForSeo, "empty"),
            (ProviderTag::GoogleAds, "failed"),
            (ProviderTag::MicrosoftAds, "not_configured"),
            (ProviderTag::SerpApi, "returned"),
        ]
    );
    assert_eq!(harness.call_counts().await, [1, 1, 0, 1]);

    match &acquisition.attempts[1].outcome {
        AttemptOutcome::Failed { reason } => assert!(reason.contains("Rate limit")),
        other => panic!("expected failure, got {:?}", other),
    }
}

#[tokio::test]
async fn test_every_tier_queried_with_same_query() {
    let harness = TestHarness::new();
    let query = fixtures::query(&["running shoes", "trail shoes"])
        .with_locations(vec![2276])
        .with_language("DE");

    let acquisition = harness.waterfall().acquire(&query).await;
    assert!(acquisition.is_empty());
    assert_eq!(acquisition.provider, None);

    for provider in [
        &harness.dataforseo,
        &harness.google_ads,
        &harness.microsoft_ads,
        &harness.serpapi,
    ] {
        let seen = provider.recorded_queries().await;
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].seeds(), &["running shoes", "trail shoes"]);
        assert_eq!(seen[0].location_codes, vec![2276]);
        assert_eq!(seen[0].language, "de");
    }

    assert_eq!(
        acquisition.no_data_message().as_deref(),
        Some("No keyword data available - every configured provider returned no results")
    );
}

#[tokio::test]
async fn test_nothing_configured_makes_no_calls() {
    let harness = TestHarness::new();
    for provider in [
        &harness.dataforseo,
        &harness.google_ads,
        &harness.microsoft_ads,
        &harness.serpapi,
    ] {
        provider.set_configured(false);
    }

    let waterfall = harness.waterfall();
    assert!(waterfall.statuses().iter().all(|s| !s.configured));

    let acquisition = waterfall.acquire(&fixtures::query(&["shoes"])).await;
    assert!(acquisition.nothing_configured());
    assert_eq!(harness.call_counts().await, [0, 0, 0, 0]);
    assert_eq!(
        acquisition.no_data_message().as_deref(),
        Some("No keyword data available - no keyword provider is configured")
    );
}

#[tokio::test]
async fn test_failure_message_names_failed_providers() {
    let harness = TestHarness::new();
    harness.dataforseo.set_next_error(ProviderError::Timeout).await;
    harness
        .serpapi
        .set_next_error(ProviderError::AuthFailed("bad key".to_string()))
        .await;

    let acquisition = harness
        .waterfall()
        .acquire(&fixtures::query(&["shoes"]))
        .await;

    assert_eq!(
        acquisition.no_data_message().as_deref(),
        Some("No keyword data available - provider calls failed: dataforseo, serpapi")
    );

    // The injected errors are one-shot; a second run sees empty tiers.
    let again = harness
        .waterfall()
        .acquire(&fixtures::query(&["shoes"]))
        .await;
    assert!(again
        .attempts
        .iter()
        .all(|a| a.outcome == AttemptOutcome::Empty));
}

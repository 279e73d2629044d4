//! Testing utilities and mock implementations for E2E tests.
//!
//! This module provides a mock keyword provider and fixture builders,
//! allowing waterfall and planning tests without real provider accounts.
//!
//! # Example
//!
//! ```rust,ignore
//! use semplan_core::testing::{MockKeywordProvider, fixtures};
//!
//! let dataforseo = Arc::new(MockKeywordProvider::new(ProviderTag::DataForSeo));
//! dataforseo.set_results(fixtures::running_shoes_records()).await;
//!
//! let waterfall = Waterfall::new(vec![dataforseo.clone()]);
//! ```

mod mock_provider;

pub use mock_provider::MockKeywordProvider;

/// Test fixtures and helper functions.
pub mod fixtures {
    use crate::keyword::{
        Competition, Intent, KeywordQuery, KeywordRecord, ProviderTag, ScoredKeyword,
    };
    use crate::planning::{group_keywords, AdGroup};
    use crate::scoring::Scorer;

    /// Create a query for the given seeds with default targeting.
    pub fn query(seeds: &[&str]) -> KeywordQuery {
        KeywordQuery::new(seeds.iter().copied()).expect("fixture seeds must not be blank")
    }

    /// Create a record with a 0.8..1.2 USD bid range.
    pub fn record(
        text: &str,
        volume: u64,
        competition: Competition,
        provider: ProviderTag,
    ) -> KeywordRecord {
        KeywordRecord::new(text, volume, competition, provider)
            .expect("fixture text must not be blank")
            .with_bids(800_000, 1_200_000)
    }

    /// Create a scored keyword with explicit intent and opportunity.
    pub fn scored(text: &str, volume: u64, intent: Intent, opportunity: f64) -> ScoredKeyword {
        let record = record(text, volume, Competition::Medium, ProviderTag::DataForSeo);
        ScoredKeyword::new(record, 0.5, opportunity, intent)
    }

    /// The canonical running-shoes result set.
    pub fn running_shoes_records() -> Vec<KeywordRecord> {
        vec![
            record("running shoes", 12_000, Competition::Medium, ProviderTag::DataForSeo),
            record("best running shoes", 9_500, Competition::High, ProviderTag::DataForSeo),
            record("running shoes for women", 6_600, Competition::Medium, ProviderTag::DataForSeo),
            record("how to choose running shoes", 1_900, Competition::Low, ProviderTag::DataForSeo),
            record("winter running shoes", 1_300, Competition::Low, ProviderTag::DataForSeo),
        ]
    }

    /// Running-shoes records scored with `acme` as the brand.
    pub fn running_shoes_scored() -> Vec<ScoredKeyword> {
        Scorer::new(vec!["acme".to_string()]).score_all(running_shoes_records())
    }

    /// Ad groups built from the running-shoes set.
    pub fn running_shoes_ad_groups() -> Vec<AdGroup> {
        group_keywords(&running_shoes_scored())
    }
}

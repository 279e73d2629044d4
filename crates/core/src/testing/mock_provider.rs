//! Mock keyword provider for testing.

use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::keyword::{KeywordQuery, KeywordRecord, ProviderTag};
use crate::provider::{KeywordProvider, ProviderError};

/// Mock implementation of the KeywordProvider trait.
///
/// Provides controllable behavior for testing:
/// - Return scripted keyword records
/// - Toggle the configured flag
/// - Track queries for assertions
/// - Simulate failures
///
/// # Example
///
/// ```rust,ignore
/// use semplan_core::testing::{MockKeywordProvider, fixtures};
///
/// let provider = MockKeywordProvider::new(ProviderTag::DataForSeo);
/// let record = fixtures::record("shoes", 900, Competition::Low, ProviderTag::DataForSeo);
/// provider.set_results(vec![record]).await;
///
/// let records = provider.fetch(&fixtures::query(&["shoes"])).await?;
/// assert_eq!(records.len(), 1);
/// ```
#[derive(Debug)]
pub struct MockKeywordProvider {
    tag: ProviderTag,
    configured: AtomicBool,
    /// Records returned by every successful fetch.
    results: Arc<RwLock<Vec<KeywordRecord>>>,
    /// Recorded queries.
    queries: Arc<RwLock<Vec<KeywordQuery>>>,
    /// If set, the next fetch will fail with this error.
    next_error: Arc<RwLock<Option<ProviderError>>>,
}

impl MockKeywordProvider {
    /// Create a configured provider that returns nothing.
    pub fn new(tag: ProviderTag) -> Self {
        Self {
            tag,
            configured: AtomicBool::new(true),
            results: Arc::new(RwLock::new(Vec::new())),
            queries: Arc::new(RwLock::new(Vec::new())),
            next_error: Arc::new(RwLock::new(None)),
        }
    }

    /// Create an unconfigured provider.
    pub fn unconfigured(tag: ProviderTag) -> Self {
        let provider = Self::new(tag);
        provider.set_configured(false);
        provider
    }

    pub fn set_configured(&self, configured: bool) {
        self.configured.store(configured, Ordering::SeqCst);
    }

    /// Set the records returned by subsequent fetches.
    pub async fn set_results(&self, records: Vec<KeywordRecord>) {
        *self.results.write().await = records;
    }

    /// Clear scripted records.
    pub async fn clear_results(&self) {
        self.results.write().await.clear();
    }

    // =========================================================================
    // Query Tracking
    // =========================================================================

    /// Get all recorded queries.
    pub async fn recorded_queries(&self) -> Vec<KeywordQuery> {
        self.queries.read().await.clone()
    }

    /// Get the number of fetches performed.
    pub async fn call_count(&self) -> usize {
        self.queries.read().await.len()
    }

    // =========================================================================
    // Error Simulation
    // =========================================================================

    /// Make the next fetch fail with the given error.
    pub async fn set_next_error(&self, error: ProviderError) {
        *self.next_error.write().await = Some(error);
    }

    pub async fn clear_next_error(&self) {
        *self.next_error.write().await = None;
    }

    async fn take_error(&self) -> Option<ProviderError> {
        self.next_error.write().await.take()
    }
}

#[async_trait]
impl KeywordProvider for MockKeywordProvider {
    fn tag(&self) -> ProviderTag {
        self.tag
    }

    fn is_configured(&self) -> bool {
        self.configured.load(Ordering::SeqCst)
    }

    async fn fetch(&self, query: &KeywordQuery) -> Result<Vec<KeywordRecord>, ProviderError> {
        self.queries.write().await.push(query.clone());

        if let Some(error) = self.take_error().await {
            return Err(error);
        }

        Ok(self.results.read().await.clone())
    }
}

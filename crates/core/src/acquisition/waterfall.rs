use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, info, warn};

use super::types::{Acquisition, AttemptOutcome, ProviderAttempt};
use crate::config::ProvidersConfig;
use crate::keyword::KeywordQuery;
use crate::metrics;
use crate::provider::{
    DataForSeoClient, GoogleAdsClient, KeywordProvider, MicrosoftAdsClient, ProviderError,
    ProviderStatus, SerpApiClient,
};

/// Ordered chain of keyword providers.
pub struct Waterfall {
    providers: Vec<Arc<dyn KeywordProvider>>,
}

impl Waterfall {
    /// Build a waterfall from providers in priority order.
    pub fn new(providers: Vec<Arc<dyn KeywordProvider>>) -> Self {
        Self { providers }
    }

    /// Build the standard four-tier chain from configuration.
    pub fn from_config(config: &ProvidersConfig) -> Result<Self, ProviderError> {
        let providers: Vec<Arc<dyn KeywordProvider>> = vec![
            Arc::new(DataForSeoClient::new(config.dataforseo.clone())?),
            Arc::new(GoogleAdsClient::new(config.google_ads.clone())?),
            Arc::new(MicrosoftAdsClient::new(config.microsoft_ads.clone())?),
            Arc::new(SerpApiClient::new(config.serpapi.clone())?),
        ];
        Ok(Self::new(providers))
    }

    /// Configuration state of every tier, in waterfall order.
    pub fn statuses(&self) -> Vec<ProviderStatus> {
        self.providers
            .iter()
            .enumerate()
            .map(|(i, p)| {
                let tag = p.tag();
                ProviderStatus {
                    provider: tag,
                    name: tag.display_name(),
                    configured: p.is_configured(),
                    priority: i + 1,
                }
            })
            .collect()
    }

    /// Run the chain until one provider returns keywords.
    pub async fn acquire(&self, query: &KeywordQuery) -> Acquisition {
        let mut attempts = Vec::with_capacity(self.providers.len());

        for provider in &self.providers {
            let tag = provider.tag();

            if !provider.is_configured() {
                debug!(provider = %tag, "Provider not configured, skipping");
                attempts.push(ProviderAttempt {
                    provider: tag,
                    outcome: AttemptOutcome::NotConfigured,
                });
                continue;
            }

            let start = Instant::now();
            let result = provider.fetch(query).await;
            metrics::PROVIDER_DURATION
                .with_label_values(&[tag.as_str()])
                .observe(start.elapsed().as_secs_f64());

            let outcome = match result {
                Ok(records) if !records.is_empty() => {
                    let count = records.len();
                    metrics::KEYWORDS_RETURNED
                        .with_label_values(&[tag.as_str()])
                        .observe(count as f64);
                    metrics::PROVIDER_CALLS
                        .with_label_values(&[tag.as_str(), "returned"])
                        .inc();
                    metrics::WATERFALL_OUTCOMES
                        .with_label_values(&[tag.as_str()])
                        .inc();

                    info!(provider = %tag, count, "Keyword acquisition served");
                    attempts.push(ProviderAttempt {
                        provider: tag,
                        outcome: AttemptOutcome::Returned { count },
                    });
                    return Acquisition {
                        records,
                        provider: Some(tag),
                        attempts,
                    };
                }
                Ok(_) => {
                    info!(provider = %tag, "Provider returned no keywords, falling through");
                    AttemptOutcome::Empty
                }
                Err(e) => {
                    warn!(provider = %tag, error = %e, "Provider call failed, falling through");
                    AttemptOutcome::Failed {
                        reason: e.to_string(),
                    }
                }
            };

            metrics::KEYWORDS_RETURNED
                .with_label_values(&[tag.as_str()])
                .observe(0.0);
            metrics::PROVIDER_CALLS
                .with_label_values(&[tag.as_str(), outcome.as_str()])
                .inc();
            attempts.push(ProviderAttempt {
                provider: tag,
                outcome,
            });
        }

        metrics::WATERFALL_OUTCOMES.with_label_values(&["none"]).inc();
        info!(
            tiers = attempts.len(),
            "No provider returned keyword data"
        );
        Acquisition {
            records: Vec::new(),
            provider: None,
            attempts,
        }
    }
}

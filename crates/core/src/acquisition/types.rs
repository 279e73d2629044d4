use serde::Serialize;

use crate::keyword::{KeywordRecord, ProviderTag};

/// What happened when the waterfall reached one provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum AttemptOutcome {
    /// Credentials missing; the provider was not called.
    NotConfigured,
    /// The provider answered with no keywords.
    Empty,
    /// The call failed; the reason is the provider error message.
    Failed { reason: String },
    /// The provider returned keywords and ended the waterfall.
    Returned { count: usize },
}

impl AttemptOutcome {
    /// Label used for metrics.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NotConfigured => "not_configured",
            Self::Empty => "empty",
            Self::Failed { .. } => "failed",
            Self::Returned { .. } => "returned",
        }
    }
}

/// One tier of the waterfall.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProviderAttempt {
    pub provider: ProviderTag,
    #[serde(flatten)]
    pub outcome: AttemptOutcome,
}

/// Result of running the waterfall for one query.
#[derive(Debug, Clone, Serialize)]
pub struct Acquisition {
    pub records: Vec<KeywordRecord>,
    /// Provider that served the records, `None` when every tier came up empty.
    pub provider: Option<ProviderTag>,
    pub attempts: Vec<ProviderAttempt>,
}

impl Acquisition {
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// True when no provider in the chain had credentials.
    pub fn nothing_configured(&self) -> bool {
        self.attempts
            .iter()
            .all(|a| a.outcome == AttemptOutcome::NotConfigured)
    }

    /// Human-readable explanation for an empty acquisition.
    pub fn no_data_message(&self) -> Option<String> {
        if !self.is_empty() {
            return None;
        }
        if self.nothing_configured() {
            return Some(
                "No keyword data available - no keyword provider is configured".to_string(),
            );
        }
        let failed: Vec<&str> = self
            .attempts
            .iter()
            .filter(|a| matches!(a.outcome, AttemptOutcome::Failed { .. }))
            .map(|a| a.provider.as_str())
            .collect();
        if failed.is_empty() {
            Some(
                "No keyword data available - every configured provider returned no results"
                    .to_string(),
            )
        } else {
            Some(format!(
                "No keyword data available - provider calls failed: {}",
                failed.join(", ")
            ))
        }
    }
}

use thiserror::Error;

/// Errors raised by the planning stages (scoring, filtering, grouping,
/// theming, bidding) and by request validation ahead of acquisition.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum PlanError {
    /// Caller input was rejected before any provider or stage ran.
    #[error("Validation failed: {0}")]
    Validation(String),

    /// A planning stage produced a result it cannot stand behind.
    #[error("{stage} failed: {message}")]
    Stage {
        stage: &'static str,
        message: String,
    },
}

impl PlanError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn stage(stage: &'static str, message: impl Into<String>) -> Self {
        Self::Stage {
            stage,
            message: message.into(),
        }
    }
}

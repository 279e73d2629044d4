//! Error responses shared by the API handlers.

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use tracing::error;

use semplan_core::{metrics::PLANNING_RUNS, PlanError};

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub status: &'static str,
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stage: Option<&'static str>,
}

/// Failure of an API request, mapped onto an HTTP status.
#[derive(Debug)]
pub enum ApiError {
    /// Rejected input: 400.
    Validation(String),
    /// A planning stage failed: 500 with the stage name.
    Stage {
        stage: &'static str,
        message: String,
    },
}

impl From<PlanError> for ApiError {
    fn from(e: PlanError) -> Self {
        match e {
            PlanError::Validation(message) => Self::Validation(message),
            PlanError::Stage { stage, message } => Self::Stage { stage, message },
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::Validation(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            Self::Validation(message) => (
                StatusCode::BAD_REQUEST,
                ErrorResponse {
                    status: "error",
                    error: message,
                    stage: None,
                },
            ),
            Self::Stage { stage, message } => {
                error!(stage, error = %message, "Planning stage failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorResponse {
                        status: "error",
                        error: message,
                        stage: Some(stage),
                    },
                )
            }
        };
        (status, Json(body)).into_response()
    }
}

/// Count a planning stage run by outcome.
pub fn track<T>(stage: &str, result: &Result<T, PlanError>) {
    let outcome = match result {
        Ok(_) => "ok",
        Err(PlanError::Validation(_)) => "invalid",
        Err(PlanError::Stage { .. }) => "error",
    };
    PLANNING_RUNS.with_label_values(&[stage, outcome]).inc();
}

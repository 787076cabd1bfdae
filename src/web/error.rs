//! API error handling for listgate.
//!
//! Failures are reported like every other result: HTTP 200 with the outcome
//! code as the JSON body.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::{ListGateError, Outcome};

/// API error type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ApiError(pub Outcome);

impl ApiError {
    /// Outcome carried by this error.
    pub fn outcome(&self) -> Outcome {
        self.0
    }

    /// Create an unknown list error.
    pub fn unknown_list() -> Self {
        Self(Outcome::UnknownList)
    }

    /// Create an invalid params error.
    pub fn invalid_params() -> Self {
        Self(Outcome::InvalidParams)
    }

    /// Create an engine failure error.
    pub fn engine_failure() -> Self {
        Self(Outcome::EngineFailure)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (StatusCode::OK, Json(self.0)).into_response()
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?} ({})", self.0, self.0.code())
    }
}

impl std::error::Error for ApiError {}

impl From<ListGateError> for ApiError {
    fn from(err: ListGateError) -> Self {
        match &err {
            ListGateError::UnknownList(_) => ApiError::unknown_list(),
            _ => {
                tracing::error!("Internal error: {}", err);
                ApiError::engine_failure()
            }
        }
    }
}

//! Error types for the lookup service
//!
//! Provides unified error handling using thiserror. Only direct
//! single-source queries surface upstream failures to the caller; the
//! cross-source search always answers with an outcome object instead.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::models::ErrorResponse;
use crate::source::SourceError;

// == Lookup Error Enum ==
/// Unified error type for the HTTP surface.
#[derive(Error, Debug)]
pub enum LookupError {
    /// Caller referenced a source id that is not configured
    #[error("Unknown source: {0}")]
    UnknownSource(String),

    /// A directly queried source failed entirely
    #[error(transparent)]
    Source(#[from] SourceError),

    /// Internal server error
    #[error("Internal error: {0}")]
    Internal(String),
}

// == IntoResponse Implementation ==
impl IntoResponse for LookupError {
    fn into_response(self) -> Response {
        let status = match &self {
            LookupError::UnknownSource(_) => StatusCode::NOT_FOUND,
            LookupError::Source(SourceError::Auth { .. }) => StatusCode::BAD_GATEWAY,
            LookupError::Source(SourceError::Unreachable { .. }) => StatusCode::BAD_GATEWAY,
            LookupError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(ErrorResponse::new(self.to_string()));

        (status, body).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for the lookup service.
pub type Result<T> = std::result::Result<T, LookupError>;

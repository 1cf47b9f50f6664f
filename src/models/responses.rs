//! Response DTOs for the lookup service API
//!
//! Cross-source search responses are the cached [`SearchOutcome`] serialized
//! verbatim; only the endpoints with no domain type of their own get a DTO
//! here.

use serde::Serialize;
use serde_json::Value;

/// Response body for single-source search (GET /sources/:source_id/search/:id)
#[derive(Debug, Clone, Serialize)]
pub struct SingleSearchResponse {
    /// The matched record, or null when the source does not have it
    #[serde(rename = "match")]
    pub record: Option<Value>,
}

impl SingleSearchResponse {
    /// Creates a new SingleSearchResponse
    pub fn new(record: Option<Value>) -> Self {
        Self { record }
    }
}

/// Response body for the cache reset endpoint (POST /cache/clear)
#[derive(Debug, Clone, Serialize)]
pub struct ClearResponse {
    /// Confirmation message
    pub message: String,
}

impl ClearResponse {
    /// Creates a new ClearResponse
    pub fn cleared() -> Self {
        Self {
            message: "Cache cleared".to_string(),
        }
    }
}

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Number of configured sources
    pub sources: usize,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    /// Creates a new HealthResponse with current timestamp
    pub fn healthy(sources: usize) -> Self {
        Self {
            status: "healthy".to_string(),
            sources,
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// Error response body for all error conditions
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    /// Error message describing what went wrong
    pub error: String,
}

impl ErrorResponse {
    /// Creates a new ErrorResponse
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

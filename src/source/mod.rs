//! Source Module
//!
//! Abstraction over one upstream booking data provider. The coordinator only
//! ever talks to sources through the [`SourceClient`] trait, so tests swap
//! the HTTP-backed client for in-memory mocks.

mod client;

pub use client::TravelApiClient;

use async_trait::async_trait;
use serde_json::Value;

// == Source Error ==
/// A source that failed entirely. Partial sub-request failures are not
/// errors; they surface through [`FetchOutcome::failed_requests`].
///
/// `Display` and `Error` are implemented by hand because the `source`
/// fields are plain identifiers, not chained error causes.
#[derive(Debug, Clone)]
pub enum SourceError {
    /// Upstream rejected our credentials
    Auth { source: String, message: String },

    /// Every sub-request to the source failed
    Unreachable { source: String, message: String },
}

impl std::fmt::Display for SourceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SourceError::Auth { source, message } => {
                write!(f, "authentication failed for source '{source}': {message}")
            }
            SourceError::Unreachable { source, message } => {
                write!(f, "source '{source}' unreachable: {message}")
            }
        }
    }
}

impl std::error::Error for SourceError {}

impl SourceError {
    /// The source this error belongs to.
    pub fn source_id(&self) -> &str {
        match self {
            SourceError::Auth { source, .. } | SourceError::Unreachable { source, .. } => source,
        }
    }
}

// == Fetch Outcome ==
/// Result of pulling the full record set from one source.
///
/// A fetch may span several date-windowed sub-requests; failed sub-requests
/// contribute nothing but are counted here, so callers can tell "zero
/// records" apart from "some windows failed".
#[derive(Debug, Clone, Default)]
pub struct FetchOutcome {
    /// Union of records from all successful sub-requests
    pub records: Vec<Value>,
    /// Sub-requests that failed and contributed an empty set
    pub failed_requests: usize,
    /// Total sub-requests issued
    pub total_requests: usize,
}

impl FetchOutcome {
    /// Fetch completed but some sub-requests contributed nothing.
    pub fn is_partial(&self) -> bool {
        self.failed_requests > 0 && self.failed_requests < self.total_requests
    }
}

// == Source Client ==
/// One independently-authenticated upstream provider.
#[async_trait]
pub trait SourceClient: Send + Sync {
    /// Opaque identifier for this source; defines configuration order.
    fn source_id(&self) -> &str;

    /// Fetches every record the source currently exposes.
    ///
    /// Fails only when the source is entirely unreachable (e.g. its
    /// authentication call fails or every sub-request errors).
    async fn fetch_all(&self) -> Result<FetchOutcome, SourceError>;
}

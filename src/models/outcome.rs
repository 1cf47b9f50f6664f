//! Search Outcome Types
//!
//! The result of resolving one booking id, either against a single source or
//! across every configured source. Outcomes are stored verbatim in the
//! lookup cache and serialized as-is by the HTTP layer, so wire names live
//! here.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Duration string reported when an outcome is served from the lookup cache.
pub const CACHED_DURATION: &str = "0ms (cached)";

// == Per-Source Outcome ==
/// What one source reported during a cross-source search.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceOutcome {
    /// Source identifier
    pub source: String,
    /// Whether this source contained a matching record
    pub found: bool,
    /// Number of records the source currently exposes
    #[serde(rename = "recordCount")]
    pub record_count: usize,
    /// Error message when the source was unreachable
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl SourceOutcome {
    /// Outcome for a source that answered, whether or not it had the record.
    pub fn answered(source: impl Into<String>, found: bool, record_count: usize) -> Self {
        Self {
            source: source.into(),
            found,
            record_count,
            error: None,
        }
    }

    /// Outcome for a source that failed entirely (auth or connectivity).
    pub fn errored(source: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            found: false,
            record_count: 0,
            error: Some(error.into()),
        }
    }
}

// == Search Outcome ==
/// Full result of a cross-source search.
///
/// `record: None` is a first-class "confirmed not found" outcome, cached
/// like any other so a known-missing id does not trigger repeated fan-outs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchOutcome {
    /// The matched record, or null when no source had it
    #[serde(rename = "match")]
    pub record: Option<Value>,
    /// Which source produced the match
    #[serde(rename = "sourceOfMatch")]
    pub source_of_match: Option<String>,
    /// One entry per source queried, in configuration order
    #[serde(rename = "perSourceOutcomes")]
    pub per_source_outcomes: Vec<SourceOutcome>,
    /// Wall-clock time spent producing this result, recorded at write time
    #[serde(rename = "searchDurationMs")]
    pub search_duration_ms: String,
}

impl SearchOutcome {
    /// Builds an outcome from the winning record (if any) and the ordered
    /// per-source reports.
    pub fn new(
        record: Option<Value>,
        source_of_match: Option<String>,
        per_source_outcomes: Vec<SourceOutcome>,
        duration_ms: u128,
    ) -> Self {
        Self {
            record,
            source_of_match,
            per_source_outcomes,
            search_duration_ms: format!("{}ms", duration_ms),
        }
    }

    /// Copy returned on a lookup-cache hit. The stored duration is not
    /// replayed; a hit reports an effectively-zero duration instead.
    pub fn as_cached(&self) -> Self {
        let mut outcome = self.clone();
        outcome.search_duration_ms = CACHED_DURATION.to_string();
        outcome
    }

    /// True when at least one source produced a match.
    pub fn is_found(&self) -> bool {
        self.record.is_some()
    }
}

//! Cache Statistics Module
//!
//! Introspection snapshot over both cache tables. Ages are computed against
//! "now" at call time, so reported values are live rather than cached.

use serde::Serialize;

// == Cache Stats ==
/// Point-in-time view of the cache contents.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CacheStats {
    /// Number of live record-set entries
    pub record_set_count: usize,
    /// Number of live lookup-result entries
    pub lookup_count: usize,
    /// Age in seconds of the oldest record set, None when the table is empty
    pub oldest_record_set_age_seconds: Option<u64>,
    /// Age in seconds of the oldest lookup result, None when the table is empty
    pub oldest_lookup_age_seconds: Option<u64>,
}

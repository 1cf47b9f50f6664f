//! Cache Entry Module
//!
//! Timestamped cache entries with per-entry TTL. Both cache tables (record
//! sets and lookup results) share the same expiry rules, so the entry is
//! generic over the stored value.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

// == Cache Entry ==
/// A single cached value with its capture time and fixed TTL.
#[derive(Debug, Clone)]
pub struct CacheEntry<T> {
    /// The stored value
    pub value: T,
    /// Capture timestamp (Unix milliseconds)
    pub cached_at_ms: u64,
    /// Duration after which the entry is considered stale
    pub ttl: Duration,
}

impl<T> CacheEntry<T> {
    // == Constructor ==
    /// Creates a new entry stamped with the current time.
    pub fn new(value: T, ttl: Duration) -> Self {
        Self {
            value,
            cached_at_ms: current_timestamp_ms(),
            ttl,
        }
    }

    // == Age ==
    /// Elapsed time since the entry was captured.
    pub fn age(&self) -> Duration {
        Duration::from_millis(current_timestamp_ms().saturating_sub(self.cached_at_ms))
    }

    /// Age in whole seconds, for live stats reporting.
    pub fn age_seconds(&self) -> u64 {
        self.age().as_secs()
    }

    // == Is Expired ==
    /// Checks whether the entry has outlived its TTL.
    ///
    /// Boundary condition: an entry is live while `now - cached_at <= ttl`
    /// and stale strictly after, so a freshly written entry with a zero TTL
    /// is still readable within the same millisecond.
    pub fn is_expired(&self) -> bool {
        self.age() > self.ttl
    }
}

// == Utility Functions ==
/// Returns current Unix timestamp in milliseconds.
pub fn current_timestamp_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("Time went backwards")
        .as_millis() as u64
}

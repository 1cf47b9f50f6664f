//! Cache Store Module
//!
//! In-memory TTL cache with two independent keyed tables: full record-set
//! snapshots per upstream source, and individual search outcomes per lookup
//! key. Each entry carries its own timestamp and fixed TTL; stale entries
//! are treated as absent and lazily evicted on read, with a periodic sweep
//! picking up whatever reads never touch.
//!
//! Misses are represented as `None`, never as an error.

use std::collections::HashMap;
use std::time::Duration;

use serde_json::Value;

use crate::cache::{CacheEntry, CacheStats};
use crate::models::SearchOutcome;

// == Booking Cache ==
/// TTL cache over booking record sets and lookup results.
#[derive(Debug)]
pub struct BookingCache {
    /// Full booking-set snapshots, keyed by source id
    record_sets: HashMap<String, CacheEntry<Vec<Value>>>,
    /// Search outcomes, keyed by lookup key
    lookups: HashMap<String, CacheEntry<SearchOutcome>>,
    /// Fixed TTL stamped onto record-set entries
    record_set_ttl: Duration,
    /// Fixed TTL stamped onto lookup entries
    lookup_ttl: Duration,
}

impl BookingCache {
    // == Constructor ==
    /// Creates an empty cache with the given per-table TTLs.
    pub fn new(record_set_ttl: Duration, lookup_ttl: Duration) -> Self {
        Self {
            record_sets: HashMap::new(),
            lookups: HashMap::new(),
            record_set_ttl,
            lookup_ttl,
        }
    }

    // == Record Sets ==
    /// Returns the cached record set for a source if still live.
    ///
    /// A stale entry is deleted and reported as absent, so this read may
    /// mutate the table.
    pub fn get_record_set(&mut self, source_id: &str) -> Option<Vec<Value>> {
        match self.record_sets.get(source_id) {
            Some(entry) if !entry.is_expired() => Some(entry.value.clone()),
            Some(_) => {
                self.record_sets.remove(source_id);
                None
            }
            None => None,
        }
    }

    /// Unconditionally overwrites the record set for a source, stamping the
    /// current time and the fixed record-set TTL.
    pub fn put_record_set(&mut self, source_id: impl Into<String>, records: Vec<Value>) {
        self.record_sets
            .insert(source_id.into(), CacheEntry::new(records, self.record_set_ttl));
    }

    // == Lookup Results ==
    /// Returns the cached outcome for a lookup key if still live.
    ///
    /// Cached outcomes are returned verbatim, including "confirmed not
    /// found" ones; negative results are cached too.
    pub fn get_lookup_result(&mut self, lookup_key: &str) -> Option<SearchOutcome> {
        match self.lookups.get(lookup_key) {
            Some(entry) if !entry.is_expired() => Some(entry.value.clone()),
            Some(_) => {
                self.lookups.remove(lookup_key);
                None
            }
            None => None,
        }
    }

    /// Unconditionally overwrites the outcome for a lookup key, stamping the
    /// current time and the fixed lookup TTL.
    pub fn put_lookup_result(&mut self, lookup_key: impl Into<String>, outcome: SearchOutcome) {
        self.lookups
            .insert(lookup_key.into(), CacheEntry::new(outcome, self.lookup_ttl));
    }

    // == Sweep ==
    /// Deletes every entry in both tables whose age exceeds its own TTL.
    ///
    /// Idempotent and safe on empty tables. Returns the number of entries
    /// removed.
    pub fn sweep_expired(&mut self) -> usize {
        let before = self.record_sets.len() + self.lookups.len();

        self.record_sets.retain(|_, entry| !entry.is_expired());
        self.lookups.retain(|_, entry| !entry.is_expired());

        before - self.record_sets.len() - self.lookups.len()
    }

    // == Stats ==
    /// Live snapshot of both tables; no side effects.
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            record_set_count: self.record_sets.len(),
            lookup_count: self.lookups.len(),
            oldest_record_set_age_seconds: self
                .record_sets
                .values()
                .map(CacheEntry::age_seconds)
                .max(),
            oldest_lookup_age_seconds: self.lookups.values().map(CacheEntry::age_seconds).max(),
        }
    }

    // == Clear ==
    /// Empties both tables unconditionally; operator-triggered reset.
    pub fn clear_all(&mut self) {
        self.record_sets.clear();
        self.lookups.clear();
    }

    // == Test Support ==
    /// Rewrites a record-set entry's capture time, for expiry tests.
    #[cfg(test)]
    pub fn age_record_set(&mut self, source_id: &str, age: Duration) {
        if let Some(entry) = self.record_sets.get_mut(source_id) {
            entry.cached_at_ms -= age.as_millis() as u64;
        }
    }

    /// Rewrites a lookup entry's capture time, for expiry tests.
    #[cfg(test)]
    pub fn age_lookup_result(&mut self, lookup_key: &str, age: Duration) {
        if let Some(entry) = self.lookups.get_mut(lookup_key) {
            entry.cached_at_ms -= age.as_millis() as u64;
        }
    }
}

impl Default for BookingCache {
    /// Production TTLs: 5 minutes for record sets, 2 minutes for lookups.
    fn default() -> Self {
        Self::new(Duration::from_secs(300), Duration::from_secs(120))
    }
}

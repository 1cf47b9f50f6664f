//! Multi-Source Search Coordinator
//!
//! Resolves one booking id against potentially many independent upstream
//! sources. The cache is consulted before any upstream call; on a miss the
//! coordinator fans out across every configured source concurrently, merges
//! the reports in configuration order, and writes the result back before
//! returning.

use std::sync::Arc;
use std::time::Instant;

use futures::future::join_all;
use serde_json::Value;
use tokio::sync::RwLock;
use tracing::{debug, warn};

use crate::cache::BookingCache;
use crate::models::{SearchOutcome, SourceOutcome};
use crate::search::matching;
use crate::source::{SourceClient, SourceError};

// == Lookup Keys ==
/// Cache key for a cross-source search. Namespaced apart from single-source
/// keys so the two never collide for the same id.
pub fn multi_lookup_key(lookup_id: &str) -> String {
    format!("multi_{}", lookup_id)
}

/// Cache key for a single-source search, scoped by the source id.
pub fn source_lookup_key(source_id: &str, lookup_id: &str) -> String {
    format!("{}:{}", source_id, lookup_id)
}

// == Search Coordinator ==
/// Owns the cache handle and the ordered source list. Declaration order of
/// the sources is the tie-break order for cross-source matches.
pub struct SearchCoordinator {
    cache: Arc<RwLock<BookingCache>>,
    sources: Vec<Arc<dyn SourceClient>>,
}

impl SearchCoordinator {
    // == Constructor ==
    pub fn new(cache: Arc<RwLock<BookingCache>>, sources: Vec<Arc<dyn SourceClient>>) -> Self {
        Self { cache, sources }
    }

    /// The configured sources, in declaration order.
    pub fn sources(&self) -> &[Arc<dyn SourceClient>] {
        &self.sources
    }

    /// The source with the given id, if configured.
    pub fn source_by_id(&self, source_id: &str) -> Option<&Arc<dyn SourceClient>> {
        self.sources.iter().find(|s| s.source_id() == source_id)
    }

    // == Per-Source Fetch Primitive ==
    /// The full record set of one source: served from cache when live,
    /// otherwise fetched, de-duplicated by id (first occurrence kept),
    /// sorted by the numeric portion of the id, and cached before returning.
    ///
    /// Propagates the error when the source is entirely unreachable; nothing
    /// is cached in that case.
    pub async fn all_records(&self, source: &dyn SourceClient) -> Result<Vec<Value>, SourceError> {
        if let Some(records) = self.cache.write().await.get_record_set(source.source_id()) {
            debug!("Record set for '{}' served from cache", source.source_id());
            return Ok(records);
        }

        let outcome = source.fetch_all().await?;
        if outcome.is_partial() {
            warn!(
                "Source '{}' answered partially: {}/{} sub-requests failed",
                source.source_id(),
                outcome.failed_requests,
                outcome.total_requests
            );
        }

        let records = normalize_records(outcome.records);
        self.cache
            .write()
            .await
            .put_record_set(source.source_id(), records.clone());

        Ok(records)
    }

    /// Record count of one source, served from the same cache path.
    async fn record_count(&self, source: &dyn SourceClient) -> Result<usize, SourceError> {
        self.all_records(source).await.map(|records| records.len())
    }

    // == Single-Source Search ==
    /// Resolves a lookup id against one source. Outcomes, found or
    /// confirmed-not-found, are cached under a source-scoped key.
    pub async fn find_in_source(
        &self,
        source: &dyn SourceClient,
        lookup_id: &str,
    ) -> Result<Option<Value>, SourceError> {
        let key = source_lookup_key(source.source_id(), lookup_id);

        if let Some(outcome) = self.cache.write().await.get_lookup_result(&key) {
            return Ok(outcome.record);
        }

        let started = Instant::now();
        let records = self.all_records(source).await?;
        let matched = matching::find_match(&records, lookup_id).cloned();

        let outcome = SearchOutcome::new(
            matched.clone(),
            matched.as_ref().map(|_| source.source_id().to_string()),
            vec![SourceOutcome::answered(
                source.source_id(),
                matched.is_some(),
                records.len(),
            )],
            started.elapsed().as_millis(),
        );
        self.cache.write().await.put_lookup_result(key, outcome);

        Ok(matched)
    }

    // == Cross-Source Search ==
    /// Resolves a lookup id across every configured source.
    ///
    /// All sources are queried concurrently (each source runs its match and
    /// its record-count fetch in parallel too). A failing source contributes
    /// a not-found outcome carrying its error and never aborts siblings, so
    /// this operation always produces a result. The winning match is the one
    /// from the first source in configuration order that reported a hit;
    /// completion order plays no part in the tie-break.
    pub async fn find_across_sources(&self, lookup_id: &str) -> SearchOutcome {
        let key = multi_lookup_key(lookup_id);

        if let Some(outcome) = self.cache.write().await.get_lookup_result(&key) {
            debug!("Cross-source result for '{}' served from cache", lookup_id);
            return outcome.as_cached();
        }

        let started = Instant::now();

        let queries = self.sources.iter().map(|source| async move {
            let (matched, count) = tokio::join!(
                self.find_in_source(source.as_ref(), lookup_id),
                self.record_count(source.as_ref()),
            );
            (source.source_id().to_string(), matched, count)
        });

        // join_all yields results in source-declaration order no matter
        // which future settles first.
        let results = join_all(queries).await;

        let mut record = None;
        let mut source_of_match = None;
        let mut per_source = Vec::with_capacity(results.len());

        for (source_id, matched, count) in results {
            match matched {
                Ok(found_record) => {
                    let found = found_record.is_some();
                    if found && record.is_none() {
                        record = found_record;
                        source_of_match = Some(source_id.clone());
                    }
                    per_source.push(SourceOutcome::answered(
                        source_id,
                        found,
                        count.unwrap_or(0),
                    ));
                }
                Err(err) => {
                    warn!("Source '{}' failed during cross-source search: {}", source_id, err);
                    per_source.push(SourceOutcome::errored(source_id, err.to_string()));
                }
            }
        }

        let outcome = SearchOutcome::new(
            record,
            source_of_match,
            per_source,
            started.elapsed().as_millis(),
        );
        self.cache
            .write()
            .await
            .put_lookup_result(key, outcome.clone());

        outcome
    }
}

// == Helpers ==
/// De-duplicates by record id keeping the first occurrence, then sorts by
/// the numeric portion of the id for deterministic match order. Records
/// without any identifier are kept as-is and sort as 0.
fn normalize_records(records: Vec<Value>) -> Vec<Value> {
    let mut seen = std::collections::HashSet::new();
    let mut merged: Vec<Value> = records
        .into_iter()
        .filter(|record| match matching::record_id(record) {
            Some(id) => seen.insert(id.to_string()),
            None => true,
        })
        .collect();

    merged.sort_by_key(matching::sort_key);
    merged
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::FetchOutcome;
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    /// In-memory source with a call counter and optional artificial delay.
    struct MockSource {
        id: String,
        records: Vec<Value>,
        calls: AtomicUsize,
        delay: Option<Duration>,
        fail_with: Option<String>,
    }

    impl MockSource {
        fn new(id: &str, ids: &[&str]) -> Self {
            Self {
                id: id.to_string(),
                records: ids.iter().map(|id| json!({ "id": id })).collect(),
                calls: AtomicUsize::new(0),
                delay: None,
                fail_with: None,
            }
        }

        fn with_delay(mut self, delay: Duration) -> Self {
            self.delay = Some(delay);
            self
        }

        fn failing(id: &str, message: &str) -> Self {
            Self {
                fail_with: Some(message.to_string()),
                ..Self::new(id, &[])
            }
        }

        fn call_count(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl SourceClient for MockSource {
        fn source_id(&self) -> &str {
            &self.id
        }

        async fn fetch_all(&self) -> Result<FetchOutcome, SourceError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }
            if let Some(message) = &self.fail_with {
                return Err(SourceError::Auth {
                    source: self.id.clone(),
                    message: message.clone(),
                });
            }
            Ok(FetchOutcome {
                records: self.records.clone(),
                failed_requests: 0,
                total_requests: 1,
            })
        }
    }

    fn coordinator(sources: Vec<Arc<MockSource>>) -> SearchCoordinator {
        let cache = Arc::new(RwLock::new(BookingCache::default()));
        let sources: Vec<Arc<dyn SourceClient>> = sources
            .into_iter()
            .map(|s| s as Arc<dyn SourceClient>)
            .collect();
        SearchCoordinator::new(cache, sources)
    }

    #[tokio::test]
    async fn test_all_records_cached_after_first_fetch() {
        let source = Arc::new(MockSource::new("a", &["RRP-2", "RRP-1"]));
        let coord = coordinator(vec![source.clone()]);

        let first = coord.all_records(source.as_ref()).await.unwrap();
        let second = coord.all_records(source.as_ref()).await.unwrap();

        assert_eq!(first, second);
        assert_eq!(source.call_count(), 1, "second read must hit the cache");
    }

    #[tokio::test]
    async fn test_all_records_sorted_and_deduplicated() {
        let source = Arc::new(MockSource::new("a", &["RRP-30", "RRP-2", "RRP-30", "RRP-10"]));
        let coord = coordinator(vec![source.clone()]);

        let records = coord.all_records(source.as_ref()).await.unwrap();
        let ids: Vec<&str> = records.iter().map(|r| r["id"].as_str().unwrap()).collect();

        assert_eq!(ids, vec!["RRP-2", "RRP-10", "RRP-30"]);
    }

    #[tokio::test]
    async fn test_unreachable_source_not_cached() {
        let source = Arc::new(MockSource::failing("a", "bad credentials"));
        let coord = coordinator(vec![source.clone()]);

        assert!(coord.all_records(source.as_ref()).await.is_err());
        assert!(coord.all_records(source.as_ref()).await.is_err());
        // A failed fetch caches nothing, so both attempts hit upstream.
        assert_eq!(source.call_count(), 2);
    }

    #[tokio::test]
    async fn test_find_in_source_caches_negative_result() {
        let source = Arc::new(MockSource::new("a", &["RRP-1"]));
        let coord = coordinator(vec![source.clone()]);

        assert!(coord
            .find_in_source(source.as_ref(), "RRP-404")
            .await
            .unwrap()
            .is_none());
        let calls_after_first = source.call_count();

        assert!(coord
            .find_in_source(source.as_ref(), "RRP-404")
            .await
            .unwrap()
            .is_none());
        assert_eq!(
            source.call_count(),
            calls_after_first,
            "second not-found search must be served from cache"
        );
    }

    #[tokio::test]
    async fn test_single_source_error_propagates() {
        let source = Arc::new(MockSource::failing("a", "bad credentials"));
        let coord = coordinator(vec![source.clone()]);

        let result = coord.find_in_source(source.as_ref(), "RRP-1").await;
        assert!(matches!(result, Err(SourceError::Auth { .. })));
    }

    #[tokio::test]
    async fn test_cross_source_scenario_match_in_second_source() {
        let a = Arc::new(MockSource::new("A", &["RRP-1", "RRP-2"]));
        let b = Arc::new(MockSource::new("B", &["RRP-3"]));
        let coord = coordinator(vec![a, b]);

        let outcome = coord.find_across_sources("RRP-3").await;

        assert_eq!(outcome.record.as_ref().unwrap()["id"], "RRP-3");
        assert_eq!(outcome.source_of_match.as_deref(), Some("B"));
        assert_eq!(outcome.per_source_outcomes.len(), 2);

        let a_outcome = &outcome.per_source_outcomes[0];
        assert_eq!(a_outcome.source, "A");
        assert!(!a_outcome.found);
        assert_eq!(a_outcome.record_count, 2);

        let b_outcome = &outcome.per_source_outcomes[1];
        assert_eq!(b_outcome.source, "B");
        assert!(b_outcome.found);
        assert_eq!(b_outcome.record_count, 1);
    }

    #[tokio::test]
    async fn test_cross_source_not_found_cached_with_no_extra_calls() {
        let a = Arc::new(MockSource::new("A", &["RRP-1", "RRP-2"]));
        let b = Arc::new(MockSource::new("B", &["RRP-3"]));
        let coord = coordinator(vec![a.clone(), b.clone()]);

        let outcome = coord.find_across_sources("RRP-9999").await;
        assert!(outcome.record.is_none());
        assert!(outcome.per_source_outcomes.iter().all(|o| !o.found));

        let a_calls = a.call_count();
        let b_calls = b.call_count();

        let repeat = coord.find_across_sources("RRP-9999").await;
        assert!(repeat.record.is_none());
        assert_eq!(repeat.search_duration_ms, crate::models::CACHED_DURATION);
        assert_eq!(a.call_count(), a_calls, "cached repeat must not call source A");
        assert_eq!(b.call_count(), b_calls, "cached repeat must not call source B");
    }

    #[tokio::test]
    async fn test_tie_break_is_configuration_order_not_arrival_order() {
        // Both sources contain a colliding id; the first-configured source
        // is slower, yet must still win the tie-break.
        let slow_first = Arc::new(
            MockSource::new("first", &["RRP-7"]).with_delay(Duration::from_millis(150)),
        );
        let fast_second = Arc::new(MockSource::new("second", &["RRP-7"]));
        let coord = coordinator(vec![slow_first, fast_second]);

        let outcome = coord.find_across_sources("RRP-7").await;

        assert_eq!(outcome.source_of_match.as_deref(), Some("first"));
        assert_eq!(outcome.per_source_outcomes[0].source, "first");
        assert_eq!(outcome.per_source_outcomes[1].source, "second");
    }

    #[tokio::test]
    async fn test_failed_source_does_not_abort_siblings() {
        let broken = Arc::new(MockSource::failing("broken", "authentication failed"));
        let healthy = Arc::new(MockSource::new("healthy", &["RRP-5"]));
        let coord = coordinator(vec![broken, healthy]);

        let outcome = coord.find_across_sources("RRP-5").await;

        assert_eq!(outcome.source_of_match.as_deref(), Some("healthy"));
        let broken_outcome = &outcome.per_source_outcomes[0];
        assert!(!broken_outcome.found);
        assert!(broken_outcome.error.as_ref().unwrap().contains("authentication failed"));
    }

    #[tokio::test]
    async fn test_all_sources_failed_still_returns_outcome() {
        let a = Arc::new(MockSource::failing("a", "down"));
        let b = Arc::new(MockSource::failing("b", "down"));
        let coord = coordinator(vec![a, b]);

        let outcome = coord.find_across_sources("RRP-1").await;

        assert!(outcome.record.is_none());
        assert_eq!(outcome.per_source_outcomes.len(), 2);
        assert!(outcome.per_source_outcomes.iter().all(|o| o.error.is_some()));
    }

    #[tokio::test]
    async fn test_multi_and_single_source_keys_are_disjoint() {
        let a = Arc::new(MockSource::new("A", &["RRP-1"]));
        let coord = coordinator(vec![a.clone()]);

        // Prime the cross-source namespace.
        let outcome = coord.find_across_sources("RRP-1").await;
        assert!(outcome.is_found());

        // A single-source search for the same id is a distinct lookup; it
        // reuses the record-set cache but not the multi_ result.
        let matched = coord.find_in_source(a.as_ref(), "RRP-1").await.unwrap();
        assert_eq!(matched.unwrap()["id"], "RRP-1");
    }
}

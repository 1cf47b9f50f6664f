//! API Handlers
//!
//! HTTP request handlers wrapping the search coordinator and cache. These
//! are thin: all lookup and caching semantics live in the coordinator.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};
use tokio::sync::RwLock;

use crate::cache::{BookingCache, CacheStats};
use crate::config::Config;
use crate::error::{LookupError, Result};
use crate::models::{ClearResponse, HealthResponse, SearchOutcome, SingleSearchResponse};
use crate::search::SearchCoordinator;
use crate::source::{SourceClient, TravelApiClient};

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Thread-safe cache store, shared with the sweep task
    pub cache: Arc<RwLock<BookingCache>>,
    /// Multi-source search coordinator
    pub coordinator: Arc<SearchCoordinator>,
}

impl AppState {
    /// Creates a new AppState over the given sources.
    pub fn new(cache: BookingCache, sources: Vec<Arc<dyn SourceClient>>) -> Self {
        let cache = Arc::new(RwLock::new(cache));
        let coordinator = Arc::new(SearchCoordinator::new(cache.clone(), sources));
        Self { cache, coordinator }
    }

    /// Creates a new AppState from configuration, building one HTTP client
    /// per enabled source.
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let timeout = std::time::Duration::from_secs(config.upstream_timeout);

        let sources = config
            .enabled_sources()
            .into_iter()
            .map(|source_config| {
                TravelApiClient::new(source_config, timeout)
                    .map(|client| Arc::new(client) as Arc<dyn SourceClient>)
            })
            .collect::<anyhow::Result<Vec<_>>>()?;

        let cache = BookingCache::new(
            std::time::Duration::from_secs(config.record_set_ttl),
            std::time::Duration::from_secs(config.lookup_ttl),
        );

        Ok(Self::new(cache, sources))
    }
}

/// Handler for GET /search/:id
///
/// Cross-source search. Always answers 200 with the full outcome object,
/// even when every source failed; callers distinguish "not found" from
/// "all sources errored" via `match` plus `perSourceOutcomes`.
pub async fn search_handler(
    State(state): State<AppState>,
    Path(lookup_id): Path<String>,
) -> Json<SearchOutcome> {
    Json(state.coordinator.find_across_sources(&lookup_id).await)
}

/// Handler for GET /sources/:source_id/search/:id
///
/// Single-source search. Unlike the fan-out, a direct query propagates the
/// source's failure to the caller.
pub async fn source_search_handler(
    State(state): State<AppState>,
    Path((source_id, lookup_id)): Path<(String, String)>,
) -> Result<Json<SingleSearchResponse>> {
    let source = state
        .coordinator
        .source_by_id(&source_id)
        .ok_or_else(|| LookupError::UnknownSource(source_id.clone()))?
        .clone();

    let matched = state
        .coordinator
        .find_in_source(source.as_ref(), &lookup_id)
        .await?;

    Ok(Json(SingleSearchResponse::new(matched)))
}

/// Handler for GET /cache/stats
///
/// Cache introspection; ages are computed live.
pub async fn stats_handler(State(state): State<AppState>) -> Json<CacheStats> {
    let cache = state.cache.read().await;
    Json(cache.stats())
}

/// Handler for POST /cache/clear
///
/// Operator-triggered reset of both cache tables.
pub async fn clear_handler(State(state): State<AppState>) -> Json<ClearResponse> {
    let mut cache = state.cache.write().await;
    cache.clear_all();
    Json(ClearResponse::cleared())
}

/// Handler for GET /health
pub async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse::healthy(state.coordinator.sources().len()))
}

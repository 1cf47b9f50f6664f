//! Travel API Client
//!
//! reqwest-backed [`SourceClient`] for one upstream booking provider.
//! Handles the token-based authentication handshake (tokens are cached and
//! refreshed shortly before expiry) and pulls the full record set through
//! several date-windowed requests issued in parallel.

use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{Months, NaiveDate, Utc};
use futures::future::join_all;
use reqwest::Client as HttpClient;
use serde::Deserialize;
use serde_json::Value;
use tokio::sync::RwLock;
use tracing::{debug, warn};

use crate::config::SourceConfig;
use crate::source::{FetchOutcome, SourceClient, SourceError};

// == Constants ==
/// Tokens are refreshed once they are within this margin of expiry.
const TOKEN_REFRESH_MARGIN: Duration = Duration::from_secs(60);

/// How far back and forward the date-windowed fetch reaches, in months.
const FETCH_PAST_MONTHS: u32 = 24;
const FETCH_FUTURE_MONTHS: u32 = 12;

/// Width of one fetch window, in months.
const FETCH_WINDOW_MONTHS: u32 = 6;

// == Auth ==
#[derive(Debug, Deserialize)]
struct AuthResponse {
    token: String,
    #[serde(rename = "expirationInSeconds")]
    expiration_in_seconds: u64,
}

#[derive(Debug, Clone)]
struct CachedToken {
    token: String,
    expires_at: Instant,
}

impl CachedToken {
    /// A token is reused only while it stays clear of the refresh margin.
    fn is_usable(&self) -> bool {
        Instant::now() + TOKEN_REFRESH_MARGIN < self.expires_at
    }
}

// == Travel API Client ==
/// HTTP client for one configured source.
pub struct TravelApiClient {
    config: SourceConfig,
    http: HttpClient,
    token: RwLock<Option<CachedToken>>,
}

impl TravelApiClient {
    /// Builds a client for one source with a bounded per-request timeout.
    pub fn new(config: SourceConfig, timeout: Duration) -> Result<Self> {
        let http = HttpClient::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            config,
            http,
            token: RwLock::new(None),
        })
    }

    /// Returns a valid auth token, authenticating when none is cached or the
    /// cached one is within the refresh margin of expiry.
    async fn auth_token(&self) -> Result<String, SourceError> {
        if let Some(cached) = self.token.read().await.as_ref() {
            if cached.is_usable() {
                return Ok(cached.token.clone());
            }
        }

        let url = format!("{}/resources/authentication/authenticate", self.config.base_url);
        let body = serde_json::json!({
            "username": self.config.username,
            "password": self.config.password,
            "micrositeId": self.config.microsite_id,
        });

        let response = self
            .http
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| SourceError::Auth {
                source: self.config.id.clone(),
                message: e.to_string(),
            })?;

        if !response.status().is_success() {
            return Err(SourceError::Auth {
                source: self.config.id.clone(),
                message: format!("authentication returned {}", response.status()),
            });
        }

        let auth: AuthResponse = response.json().await.map_err(|e| SourceError::Auth {
            source: self.config.id.clone(),
            message: e.to_string(),
        })?;

        let cached = CachedToken {
            token: auth.token.clone(),
            expires_at: Instant::now() + Duration::from_secs(auth.expiration_in_seconds),
        };
        *self.token.write().await = Some(cached);

        debug!("Authenticated against source '{}'", self.config.id);
        Ok(auth.token)
    }

    /// Fetches one date window of bookings. Failures are reported as a
    /// message so the caller can count them without aborting siblings.
    async fn fetch_window(
        &self,
        token: &str,
        from: NaiveDate,
        to: NaiveDate,
    ) -> std::result::Result<Vec<Value>, String> {
        let url = format!("{}/resources/booking/getBookings", self.config.base_url);

        let response = self
            .http
            .get(&url)
            .header("auth-token", token)
            .query(&[
                ("microsite", self.config.microsite_id.as_str()),
                ("from", &from.to_string()),
                ("to", &to.to_string()),
            ])
            .send()
            .await
            .map_err(|e| e.to_string())?;

        if !response.status().is_success() {
            return Err(format!("window {}..{} returned {}", from, to, response.status()));
        }

        let body: Value = response.json().await.map_err(|e| e.to_string())?;
        Ok(extract_records(&body))
    }
}

#[async_trait]
impl SourceClient for TravelApiClient {
    fn source_id(&self) -> &str {
        &self.config.id
    }

    async fn fetch_all(&self) -> std::result::Result<FetchOutcome, SourceError> {
        let token = self.auth_token().await?;

        let windows = date_windows(Utc::now().date_naive());
        let fetches = windows
            .iter()
            .map(|(from, to)| self.fetch_window(&token, *from, *to));
        let results = join_all(fetches).await;

        fold_window_results(&self.config.id, results)
    }
}

// == Helpers ==
/// Folds per-window fetch results into a [`FetchOutcome`]. A failed window
/// contributes an empty set and is counted; only when every window failed
/// does the fold report the source as unreachable.
fn fold_window_results(
    source: &str,
    results: Vec<std::result::Result<Vec<Value>, String>>,
) -> std::result::Result<FetchOutcome, SourceError> {
    let total_requests = results.len();
    let mut records = Vec::new();
    let mut failed_requests = 0;
    let mut last_error = String::new();

    for result in results {
        match result {
            Ok(mut window_records) => records.append(&mut window_records),
            Err(message) => {
                warn!(
                    "Source '{}' sub-request failed, contributing empty set: {}",
                    source, message
                );
                failed_requests += 1;
                last_error = message;
            }
        }
    }

    if total_requests > 0 && failed_requests == total_requests {
        return Err(SourceError::Unreachable {
            source: source.to_string(),
            message: last_error,
        });
    }

    Ok(FetchOutcome {
        records,
        failed_requests,
        total_requests,
    })
}

/// Consecutive date windows covering recent and upcoming bookings.
fn date_windows(today: NaiveDate) -> Vec<(NaiveDate, NaiveDate)> {
    let start = today - Months::new(FETCH_PAST_MONTHS);
    let end = today + Months::new(FETCH_FUTURE_MONTHS);

    let mut windows = Vec::new();
    let mut from = start;
    while from < end {
        let to = (from + Months::new(FETCH_WINDOW_MONTHS)).min(end);
        windows.push((from, to));
        from = to;
    }
    windows
}

/// Pulls the record array out of an upstream response body. The API has
/// returned both bare arrays and wrapped objects, so accept either.
fn extract_records(body: &Value) -> Vec<Value> {
    match body {
        Value::Array(records) => records.clone(),
        Value::Object(map) => {
            for key in ["bookedTrip", "bookings", "booking"] {
                if let Some(Value::Array(records)) = map.get(key) {
                    return records.clone();
                }
            }
            // Fall back to the first array-valued field.
            map.values()
                .find_map(|v| v.as_array().cloned())
                .unwrap_or_default()
        }
        _ => Vec::new(),
    }
}

//! Configuration Module
//!
//! Handles loading server and source configuration from environment
//! variables. Sources are declared as one explicit, ordered JSON list —
//! declaration order is the cross-source tie-break order.

use std::env;

use anyhow::{Context, Result};
use serde::Deserialize;
use tracing::warn;

use crate::cache::{LOOKUP_TTL_SECS, RECORD_SET_TTL_SECS};

// == Source Config ==
/// Credentials and endpoint for one upstream source.
#[derive(Debug, Clone, Deserialize)]
pub struct SourceConfig {
    /// Opaque source identifier, unique within the list
    pub id: String,
    /// Base URL of the upstream booking API
    pub base_url: String,
    /// Microsite identifier sent with every request
    pub microsite_id: String,
    /// Username for the authentication call
    pub username: String,
    /// Password for the authentication call
    pub password: String,
    /// Statically excludes a source known to fail authentication, so every
    /// search does not pay a repeated failing-auth penalty
    #[serde(default)]
    pub disabled: bool,
}

// == Config ==
/// Server configuration parameters.
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server port
    pub server_port: u16,
    /// Background sweep task interval in seconds
    pub sweep_interval: u64,
    /// TTL in seconds for cached record sets
    pub record_set_ttl: u64,
    /// TTL in seconds for cached lookup results
    pub lookup_ttl: u64,
    /// Per-request timeout in seconds for upstream calls
    pub upstream_timeout: u64,
    /// Ordered upstream source list, as declared
    pub sources: Vec<SourceConfig>,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    /// - `SWEEP_INTERVAL_SECS` - Sweep frequency in seconds (default: 300)
    /// - `RECORD_SET_TTL_SECS` - Record-set TTL in seconds (default: 300)
    /// - `LOOKUP_TTL_SECS` - Lookup-result TTL in seconds (default: 120)
    /// - `UPSTREAM_TIMEOUT_SECS` - Upstream call timeout (default: 30)
    /// - `SOURCES_JSON` - JSON array of source definitions (default: empty)
    pub fn from_env() -> Result<Self> {
        let sources = match env::var("SOURCES_JSON") {
            Ok(raw) => {
                serde_json::from_str(&raw).context("Failed to parse SOURCES_JSON")?
            }
            Err(_) => Vec::new(),
        };

        Ok(Self {
            server_port: env_or("SERVER_PORT", 3000),
            sweep_interval: env_or("SWEEP_INTERVAL_SECS", 300),
            record_set_ttl: env_or("RECORD_SET_TTL_SECS", RECORD_SET_TTL_SECS),
            lookup_ttl: env_or("LOOKUP_TTL_SECS", LOOKUP_TTL_SECS),
            upstream_timeout: env_or("UPSTREAM_TIMEOUT_SECS", 30),
            sources,
        })
    }

    /// The sources to actually query, in declaration order.
    ///
    /// Disabled sources are dropped here, once at startup, with a single
    /// warning each.
    pub fn enabled_sources(&self) -> Vec<SourceConfig> {
        self.sources
            .iter()
            .filter(|source| {
                if source.disabled {
                    warn!("Source '{}' is disabled by configuration, skipping", source.id);
                    false
                } else {
                    true
                }
            })
            .cloned()
            .collect()
    }
}

fn env_or<T: std::str::FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_port: 3000,
            sweep_interval: 300,
            record_set_ttl: RECORD_SET_TTL_SECS,
            lookup_ttl: LOOKUP_TTL_SECS,
            upstream_timeout: 30,
            sources: Vec::new(),
        }
    }
}

//! Booking Lookup - cache and multi-source search coordinator
//!
//! Resolves booking ids across multiple independently-authenticated upstream
//! providers, with a process-local TTL cache in front of every upstream call.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod models;
pub mod search;
pub mod source;
pub mod tasks;

pub use api::AppState;
pub use cache::BookingCache;
pub use config::Config;
pub use search::SearchCoordinator;
pub use tasks::spawn_sweep_task;

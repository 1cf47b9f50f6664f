//! Cache Module
//!
//! Process-local TTL cache over booking record sets and search outcomes.

mod entry;
mod stats;
mod store;


// Re-export public types
pub use entry::CacheEntry;
pub use stats::CacheStats;
pub use store::BookingCache;

// == Public Constants ==
/// TTL for full record-set snapshots per source
pub const RECORD_SET_TTL_SECS: u64 = 300;

/// TTL for individual lookup results (negative results included)
pub const LOOKUP_TTL_SECS: u64 = 120;

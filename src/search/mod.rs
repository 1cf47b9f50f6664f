//! Search Module
//!
//! Record matching rules and the multi-source search coordinator.

mod coordinator;
pub mod matching;

pub use coordinator::{multi_lookup_key, source_lookup_key, SearchCoordinator};

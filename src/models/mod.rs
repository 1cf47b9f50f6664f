//! Models Module
//!
//! Domain outcome types and HTTP response DTOs.

pub mod outcome;
pub mod responses;

pub use outcome::{SearchOutcome, SourceOutcome, CACHED_DURATION};
pub use responses::{ClearResponse, ErrorResponse, HealthResponse, SingleSearchResponse};

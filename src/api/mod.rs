//! API Module
//!
//! HTTP handlers and routing for the lookup service REST API.
//!
//! # Endpoints
//! - `GET /search/:id` - Cross-source booking search
//! - `GET /sources/:source_id/search/:id` - Single-source booking search
//! - `GET /cache/stats` - Cache introspection
//! - `POST /cache/clear` - Operator cache reset
//! - `GET /health` - Health check endpoint

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;

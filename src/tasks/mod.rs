//! Background Tasks Module
//!
//! Periodic maintenance tasks for the lookup service.

pub mod sweep;

pub use sweep::spawn_sweep_task;

//! Service layer for the futsal league engine
//!
//! Wires the store, the managers, the notification pipeline and metrics
//! together and owns the background task lifecycle.

pub mod app;

pub use app::{AppState, LeagueSummary, ServiceError};

//! Metrics for the league engine
//!
//! Prometheus counters and histograms for ledger, roster and notification
//! activity. Exposition over HTTP is left to the embedding service; the
//! collector can render the text format on demand.

pub mod collector;

pub use collector::{
    LedgerMetrics, MetricsCollector, MetricsTimer, NotificationMetrics, PerformanceMetrics,
    RosterMetrics,
};

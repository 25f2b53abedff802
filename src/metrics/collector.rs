//! Metrics collection using Prometheus

use crate::error::LeagueError;
use crate::types::NotificationKind;
use anyhow::Result;
use prometheus::{
    Encoder, HistogramOpts, HistogramVec, IntCounter, IntCounterVec, Opts, Registry, TextEncoder,
};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Main metrics collector for the league engine
#[derive(Clone)]
pub struct MetricsCollector {
    /// Prometheus registry
    registry: Arc<Registry>,

    /// Match and standings metrics
    ledger_metrics: LedgerMetrics,

    /// Team membership metrics
    roster_metrics: RosterMetrics,

    /// Notification intent metrics
    notification_metrics: NotificationMetrics,

    /// Operation timings and failures
    performance_metrics: PerformanceMetrics,
}

/// Match and standings metrics
#[derive(Clone)]
pub struct LedgerMetrics {
    /// Match saves by state-machine transition
    pub matches_recorded_total: IntCounterVec,

    /// Ledger operations applied to team counters (apply/revert)
    pub standings_updates_total: IntCounterVec,

    /// Player match statistics rows recorded
    pub player_stats_recorded_total: IntCounter,
}

/// Team membership metrics
#[derive(Clone)]
pub struct RosterMetrics {
    /// Transfer requests by resulting status
    pub transfer_requests_total: IntCounterVec,

    /// Teams created
    pub teams_created_total: IntCounter,

    /// Player profiles registered
    pub players_registered_total: IntCounter,

    /// Players who left their team
    pub departures_total: IntCounter,
}

/// Notification metrics
#[derive(Clone)]
pub struct NotificationMetrics {
    /// Notification intents by kind and outcome
    pub notifications_total: IntCounterVec,
}

/// Performance metrics
#[derive(Clone)]
pub struct PerformanceMetrics {
    /// Duration of core operations
    pub operation_duration: HistogramVec,

    /// Failed core operations by error kind
    pub operation_errors_total: IntCounterVec,
}

impl MetricsCollector {
    /// Create a new metrics collector with default registry
    pub fn new() -> Result<Self> {
        let registry = Arc::new(Registry::new());
        Self::with_registry(registry)
    }

    /// Create a new metrics collector with custom registry
    pub fn with_registry(registry: Arc<Registry>) -> Result<Self> {
        let ledger_metrics = LedgerMetrics::new(&registry)?;
        let roster_metrics = RosterMetrics::new(&registry)?;
        let notification_metrics = NotificationMetrics::new(&registry)?;
        let performance_metrics = PerformanceMetrics::new(&registry)?;

        Ok(Self {
            registry,
            ledger_metrics,
            roster_metrics,
            notification_metrics,
            performance_metrics,
        })
    }

    /// Get the Prometheus registry
    pub fn registry(&self) -> Arc<Registry> {
        self.registry.clone()
    }

    pub fn ledger(&self) -> &LedgerMetrics {
        &self.ledger_metrics
    }

    pub fn roster(&self) -> &RosterMetrics {
        &self.roster_metrics
    }

    pub fn notifications(&self) -> &NotificationMetrics {
        &self.notification_metrics
    }

    pub fn performance(&self) -> &PerformanceMetrics {
        &self.performance_metrics
    }

    /// Record a match save, labelled by its state-machine transition
    pub fn record_match_transition(&self, transition: &str) {
        self.ledger_metrics
            .matches_recorded_total
            .with_label_values(&[transition])
            .inc();
    }

    /// Record a ledger operation ("apply" or "revert")
    pub fn record_standings_update(&self, operation: &str) {
        self.ledger_metrics
            .standings_updates_total
            .with_label_values(&[operation])
            .inc();
    }

    pub fn record_player_stats(&self) {
        self.ledger_metrics.player_stats_recorded_total.inc();
    }

    /// Record a transfer request reaching `status`
    pub fn record_transfer_request(&self, status: &str) {
        self.roster_metrics
            .transfer_requests_total
            .with_label_values(&[status])
            .inc();
    }

    pub fn record_team_created(&self) {
        self.roster_metrics.teams_created_total.inc();
    }

    pub fn record_player_registered(&self) {
        self.roster_metrics.players_registered_total.inc();
    }

    pub fn record_departure(&self) {
        self.roster_metrics.departures_total.inc();
    }

    /// Record a notification outcome ("emitted", "dropped", "delivered", "failed")
    pub fn record_notification(&self, kind: NotificationKind, status: &str) {
        self.notification_metrics
            .notifications_total
            .with_label_values(&[kind.as_str(), status])
            .inc();
    }

    /// Record a finished core operation
    pub fn record_operation(
        &self,
        operation: &str,
        duration: Duration,
        error: Option<&LeagueError>,
    ) {
        self.performance_metrics
            .operation_duration
            .with_label_values(&[operation])
            .observe(duration.as_secs_f64());

        if let Some(error) = error {
            self.performance_metrics
                .operation_errors_total
                .with_label_values(&[operation, error.kind()])
                .inc();
        }
    }

    /// Render all metrics in the Prometheus text format
    pub fn render(&self) -> Result<String> {
        let encoder = TextEncoder::new();
        let mut buffer = Vec::new();
        encoder.encode(&self.registry.gather(), &mut buffer)?;
        Ok(String::from_utf8(buffer)?)
    }

    /// Create a timer for measuring operation duration
    pub fn start_timer(&self) -> MetricsTimer {
        MetricsTimer::new()
    }
}

/// Timer for measuring operation durations
pub struct MetricsTimer {
    start: Instant,
}

impl MetricsTimer {
    fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    /// Get the elapsed duration
    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    /// Stop the timer and return the duration
    pub fn stop(self) -> Duration {
        self.elapsed()
    }
}

impl LedgerMetrics {
    fn new(registry: &Registry) -> Result<Self> {
        let matches_recorded_total = IntCounterVec::new(
            Opts::new(
                "futsal_league_matches_recorded_total",
                "Match saves by state transition",
            ),
            &["transition"],
        )?;
        registry.register(Box::new(matches_recorded_total.clone()))?;

        let standings_updates_total = IntCounterVec::new(
            Opts::new(
                "futsal_league_standings_updates_total",
                "Ledger operations applied to team standings",
            ),
            &["operation"],
        )?;
        registry.register(Box::new(standings_updates_total.clone()))?;

        let player_stats_recorded_total = IntCounter::new(
            "futsal_league_player_stats_recorded_total",
            "Player match statistics rows recorded",
        )?;
        registry.register(Box::new(player_stats_recorded_total.clone()))?;

        Ok(Self {
            matches_recorded_total,
            standings_updates_total,
            player_stats_recorded_total,
        })
    }
}

impl RosterMetrics {
    fn new(registry: &Registry) -> Result<Self> {
        let transfer_requests_total = IntCounterVec::new(
            Opts::new(
                "futsal_league_transfer_requests_total",
                "Transfer requests by resulting status",
            ),
            &["status"],
        )?;
        registry.register(Box::new(transfer_requests_total.clone()))?;

        let teams_created_total =
            IntCounter::new("futsal_league_teams_created_total", "Teams created")?;
        registry.register(Box::new(teams_created_total.clone()))?;

        let players_registered_total = IntCounter::new(
            "futsal_league_players_registered_total",
            "Player profiles registered",
        )?;
        registry.register(Box::new(players_registered_total.clone()))?;

        let departures_total = IntCounter::new(
            "futsal_league_departures_total",
            "Players who left their team",
        )?;
        registry.register(Box::new(departures_total.clone()))?;

        Ok(Self {
            transfer_requests_total,
            teams_created_total,
            players_registered_total,
            departures_total,
        })
    }
}

impl NotificationMetrics {
    fn new(registry: &Registry) -> Result<Self> {
        let notifications_total = IntCounterVec::new(
            Opts::new(
                "futsal_league_notifications_total",
                "Notification intents by kind and outcome",
            ),
            &["kind", "status"],
        )?;
        registry.register(Box::new(notifications_total.clone()))?;

        Ok(Self {
            notifications_total,
        })
    }
}

impl PerformanceMetrics {
    fn new(registry: &Registry) -> Result<Self> {
        let operation_duration = HistogramVec::new(
            HistogramOpts::new(
                "futsal_league_operation_duration_seconds",
                "Duration of core league operations",
            )
            .buckets(vec![0.0001, 0.0005, 0.001, 0.005, 0.01, 0.05, 0.1]),
            &["operation"],
        )?;
        registry.register(Box::new(operation_duration.clone()))?;

        let operation_errors_total = IntCounterVec::new(
            Opts::new(
                "futsal_league_operation_errors_total",
                "Failed core operations by error kind",
            ),
            &["operation", "kind"],
        )?;
        registry.register(Box::new(operation_errors_total.clone()))?;

        Ok(Self {
            operation_duration,
            operation_errors_total,
        })
    }
}

impl Default for MetricsCollector {
    fn default() -> Self {
        Self::new().expect("Failed to create default metrics collector")
    }
}

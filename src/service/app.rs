//! Main application state and service coordination

use crate::config::AppConfig;
use crate::error::{LeagueError, Result as LeagueResult};
use crate::matches::MatchRecorder;
use crate::metrics::MetricsCollector;
use crate::notify::{
    emit_best_effort, emit_with_backpressure, messages, ChannelNotificationEmitter, NoopNotificationEmitter,
    NotificationDispatcher, NotificationEmitter, NotificationInbox,
};
use crate::players::PlayerDirectory;
use crate::roster::RosterManager;
use crate::standings::{standings_table, top_teams, StandingsRow};
use crate::storage::LeagueStore;
use crate::types::{Actor, NotificationIntent, RequestStatus, Team};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::{mpsc, watch, RwLock};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

/// Service-level errors
#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Service initialization error: {message}")]
    Initialization { message: String },

    #[error("Background task error: {message}")]
    BackgroundTask { message: String },

    #[error("Snapshot error: {message}")]
    Snapshot { message: String },
}

/// Counts over the whole league
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeagueSummary {
    pub players: usize,
    pub free_agents: usize,
    pub teams: usize,
    pub matches: usize,
    pub finished_matches: usize,
    pub pending_requests: usize,
}

/// Main application state containing all service components
pub struct AppState {
    config: AppConfig,
    store: Arc<LeagueStore>,
    metrics: Arc<MetricsCollector>,
    emitter: Arc<dyn NotificationEmitter>,
    inbox: Arc<NotificationInbox>,

    players: PlayerDirectory,
    roster: RosterManager,
    matches: MatchRecorder,

    /// Receiving end of the notification queue until the dispatcher takes it
    intent_receiver: Option<mpsc::Receiver<NotificationIntent>>,
    shutdown_tx: watch::Sender<bool>,
    background_tasks: Vec<JoinHandle<()>>,
    is_running: Arc<RwLock<bool>>,
}

impl AppState {
    /// Initialize the application with all dependencies
    pub async fn new(config: AppConfig) -> Result<Self, ServiceError> {
        info!("Initializing {} league service", config.service.name);

        crate::config::validate_config(&config).map_err(|e| ServiceError::Configuration {
            message: e.to_string(),
        })?;

        let store = Arc::new(Self::initialize_store(&config)?);
        let metrics = Arc::new(MetricsCollector::new().map_err(|e| {
            ServiceError::Initialization {
                message: format!("Failed to create metrics collector: {}", e),
            }
        })?);

        let (emitter, intent_receiver): (Arc<dyn NotificationEmitter>, _) =
            if config.notifications.enabled {
                let (emitter, receiver) =
                    ChannelNotificationEmitter::channel(config.notifications.queue_capacity);
                let emitter: Arc<dyn NotificationEmitter> = Arc::new(emitter);
                (emitter, Some(receiver))
            } else {
                info!("Notifications disabled; intents will be discarded");
                let emitter: Arc<dyn NotificationEmitter> = Arc::new(NoopNotificationEmitter);
                (emitter, None)
            };

        Ok(Self::with_components(
            config,
            store,
            emitter,
            intent_receiver,
            metrics,
        ))
    }

    /// Assemble the service from explicit components
    pub fn with_components(
        config: AppConfig,
        store: Arc<LeagueStore>,
        emitter: Arc<dyn NotificationEmitter>,
        intent_receiver: Option<mpsc::Receiver<NotificationIntent>>,
        metrics: Arc<MetricsCollector>,
    ) -> Self {
        let (shutdown_tx, _) = watch::channel(false);

        Self {
            players: PlayerDirectory::new(store.clone(), metrics.clone()),
            roster: RosterManager::new(store.clone(), emitter.clone(), metrics.clone()),
            matches: MatchRecorder::new(store.clone(), metrics.clone()),
            inbox: Arc::new(NotificationInbox::with_limit(
                config.notifications.inbox_limit,
            )),
            config,
            store,
            metrics,
            emitter,
            intent_receiver,
            shutdown_tx,
            background_tasks: Vec::new(),
            is_running: Arc::new(RwLock::new(false)),
        }
    }

    fn initialize_store(config: &AppConfig) -> Result<LeagueStore, ServiceError> {
        match &config.league.snapshot_path {
            Some(path) if path.exists() => {
                LeagueStore::load_from(path).map_err(|e| ServiceError::Snapshot {
                    message: e.to_string(),
                })
            }
            Some(path) => {
                info!(
                    "Snapshot {} does not exist yet, starting with an empty league",
                    path.display()
                );
                Ok(LeagueStore::new())
            }
            None => Ok(LeagueStore::new()),
        }
    }

    /// Start the notification dispatcher
    pub async fn start(&mut self) -> Result<(), ServiceError> {
        if *self.is_running.read().await {
            return Err(ServiceError::Initialization {
                message: "Service is already running".to_string(),
            });
        }

        if let Some(receiver) = self.intent_receiver.take() {
            let handle = NotificationDispatcher::new(self.metrics.clone())
                .with_delivery(self.inbox.clone())
                .spawn(receiver, self.shutdown_tx.subscribe());
            self.background_tasks.push(handle);
        }

        *self.is_running.write().await = true;
        info!(
            "League service started with {} background task(s)",
            self.background_tasks.len()
        );
        Ok(())
    }

    /// Stop background tasks, delivering queued notifications, and write the
    /// snapshot if one is configured
    pub async fn shutdown(&mut self) -> Result<(), ServiceError> {
        info!("Starting graceful shutdown of league service");
        *self.is_running.write().await = false;

        let _ = self.shutdown_tx.send(true);

        let timeout = self.config.shutdown_timeout();
        let mut task_failure = None;
        for handle in self.background_tasks.drain(..) {
            match tokio::time::timeout(timeout, handle).await {
                Ok(Ok(())) => debug!("Background task stopped"),
                Ok(Err(e)) => {
                    error!("Background task failed: {}", e);
                    task_failure.get_or_insert_with(|| e.to_string());
                }
                Err(_) => warn!("Background task did not stop within {:?}", timeout),
            }
        }

        // The snapshot is written even when a task failed
        if let Some(path) = &self.config.league.snapshot_path {
            self.store
                .save_to(path)
                .map_err(|e| ServiceError::Snapshot {
                    message: e.to_string(),
                })?;
        }

        info!("Final roster statistics: {:?}", self.roster.get_stats());
        if let Some(message) = task_failure {
            return Err(ServiceError::BackgroundTask { message });
        }
        info!("League service shutdown completed");
        Ok(())
    }

    pub async fn is_running(&self) -> bool {
        *self.is_running.read().await
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn store(&self) -> Arc<LeagueStore> {
        self.store.clone()
    }

    pub fn metrics(&self) -> Arc<MetricsCollector> {
        self.metrics.clone()
    }

    pub fn inbox(&self) -> Arc<NotificationInbox> {
        self.inbox.clone()
    }

    pub fn players(&self) -> &PlayerDirectory {
        &self.players
    }

    pub fn roster(&self) -> &RosterManager {
        &self.roster
    }

    pub fn matches(&self) -> &MatchRecorder {
        &self.matches
    }

    /// Send a SYSTEM notice to every registered player; admin only.
    ///
    /// Once the dispatcher runs, each notice waits for queue capacity. Before
    /// that, notices beyond the queue capacity are dropped. Returns the number
    /// of intents the queue accepted.
    pub async fn broadcast(
        &self,
        actor: &Actor,
        message: &str,
        title: Option<&str>,
    ) -> LeagueResult<usize> {
        actor.require_admin("broadcast notifications")?;
        if message.trim().is_empty() {
            return Err(LeagueError::validation("Broadcast message cannot be empty"));
        }

        let title = title
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .unwrap_or(messages::DEFAULT_TITLE);
        let recipients: Vec<String> = self.store.read(|state| {
            state
                .players
                .values()
                .map(|p| p.actor_id.clone())
                .collect()
        })?;

        let dispatching = self.intent_receiver.is_none();
        let mut emitted = 0;
        for recipient in &recipients {
            let intent = messages::system_notice(recipient.clone(), title, message);
            let accepted = if dispatching {
                emit_with_backpressure(self.emitter.as_ref(), &self.metrics, intent).await
            } else {
                emit_best_effort(self.emitter.as_ref(), &self.metrics, intent).await
            };
            if accepted {
                emitted += 1;
            }
        }

        if emitted < recipients.len() {
            warn!(
                "Broadcast '{}' reached {} of {} player(s)",
                title,
                emitted,
                recipients.len()
            );
        }
        info!(
            "Broadcast '{}' from '{}' to {} player(s)",
            title, actor.id, emitted
        );
        Ok(emitted)
    }

    /// League table
    pub fn standings(&self) -> LeagueResult<Vec<StandingsRow>> {
        self.store.read(|state| standings_table(state.teams.values()))
    }

    /// Teams with the most wins, limited by configuration
    pub fn top_teams(&self) -> LeagueResult<Vec<Team>> {
        let limit = self.config.league.top_teams_limit;
        self.store.read(|state| top_teams(state.teams.values(), limit))
    }

    pub fn summary(&self) -> LeagueResult<LeagueSummary> {
        self.store.read(|state| LeagueSummary {
            players: state.players.len(),
            free_agents: state.players.values().filter(|p| p.is_free_agent()).count(),
            teams: state.teams.len(),
            matches: state.matches.len(),
            finished_matches: state.matches.values().filter(|m| m.is_finished).count(),
            pending_requests: state
                .transfer_requests
                .values()
                .filter(|r| r.status == RequestStatus::Pending)
                .count(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::players::PlayerRegistration;
    use crate::roster::NewTeam;
    use crate::types::{NotificationKind, Position};

    #[tokio::test]
    async fn test_join_request_reaches_captain_inbox() {
        let mut app = AppState::new(AppConfig::default()).await.unwrap();
        app.start().await.unwrap();

        let captain = app
            .players()
            .register_player("cap", PlayerRegistration::new("Cap", Position::Goalkeeper))
            .unwrap();
        let player = app
            .players()
            .register_player("deniz", PlayerRegistration::new("Deniz", Position::Striker))
            .unwrap();
        let team = app
            .roster()
            .create_team(captain.id, NewTeam::new("Red Lions"))
            .unwrap();
        app.roster().request_join(player.id, team.id).await.unwrap();

        app.shutdown().await.unwrap();

        let inbox = app.inbox().list_for("cap").unwrap();
        assert_eq!(inbox.len(), 1);
        assert_eq!(inbox[0].kind, NotificationKind::TeamRequest);
        assert_eq!(app.inbox().unread_count("cap").unwrap(), 1);
        assert!(!app.is_running().await);
    }

    #[tokio::test]
    async fn test_broadcast_is_admin_only() {
        let mut app = AppState::new(AppConfig::default()).await.unwrap();
        app.start().await.unwrap();
        for actor in ["a", "b"] {
            app.players()
                .register_player(actor, PlayerRegistration::new(actor, Position::Striker))
                .unwrap();
        }

        let err = app
            .broadcast(&Actor::player("a"), "Season starts", None)
            .await
            .unwrap_err();
        assert!(err.is_forbidden());

        let sent = app
            .broadcast(&Actor::admin("admin"), "Season starts", Some("League"))
            .await
            .unwrap();
        assert_eq!(sent, 2);

        app.shutdown().await.unwrap();
        let notices = app.inbox().list_for("b").unwrap();
        assert_eq!(notices.len(), 1);
        assert_eq!(notices[0].kind, NotificationKind::System);
        assert_eq!(notices[0].title, "League");
    }

    fn small_queue_config() -> AppConfig {
        let mut config = AppConfig::default();
        config.notifications.queue_capacity = 2;
        config
    }

    fn register_many(app: &AppState, count: usize) -> Vec<String> {
        let actors: Vec<String> = (0..count).map(|i| format!("player-{}", i)).collect();
        for actor in &actors {
            app.players()
                .register_player(actor, PlayerRegistration::new(actor.as_str(), Position::Striker))
                .unwrap();
        }
        actors
    }

    #[tokio::test]
    async fn test_broadcast_larger_than_queue_reaches_everyone() {
        let mut app = AppState::new(small_queue_config()).await.unwrap();
        app.start().await.unwrap();
        let actors = register_many(&app, 5);

        let sent = app
            .broadcast(&Actor::admin("admin"), "Pitch closed", None)
            .await
            .unwrap();
        app.shutdown().await.unwrap();

        let mut delivered = 0;
        for actor in &actors {
            delivered += app.inbox().list_for(actor).unwrap().len();
        }
        assert_eq!(sent, 5);
        assert_eq!(delivered, sent);
    }

    #[tokio::test]
    async fn test_broadcast_before_start_counts_only_queued_notices() {
        let mut app = AppState::new(small_queue_config()).await.unwrap();
        register_many(&app, 5);

        let sent = app
            .broadcast(&Actor::admin("admin"), "Pitch closed", None)
            .await
            .unwrap();
        assert_eq!(sent, 2);

        app.start().await.unwrap();
        app.shutdown().await.unwrap();
        assert_eq!(app.inbox().len(), sent);
    }

    #[tokio::test]
    async fn test_disabled_notifications_are_discarded() {
        let mut config = AppConfig::default();
        config.notifications.enabled = false;
        let mut app = AppState::new(config).await.unwrap();
        app.start().await.unwrap();

        app.players()
            .register_player("a", PlayerRegistration::new("A", Position::Striker))
            .unwrap();
        let sent = app
            .broadcast(&Actor::admin("admin"), "Hello", None)
            .await
            .unwrap();
        assert_eq!(sent, 1);

        app.shutdown().await.unwrap();
        assert!(app.inbox().is_empty());
    }

    #[tokio::test]
    async fn test_summary_and_standings() {
        let app = AppState::new(AppConfig::default()).await.unwrap();
        let captain = app
            .players()
            .register_player("cap", PlayerRegistration::new("Cap", Position::Striker))
            .unwrap();
        app.players()
            .register_player("free", PlayerRegistration::new("Free", Position::Striker))
            .unwrap();
        app.roster()
            .create_team(captain.id, NewTeam::new("Red Lions"))
            .unwrap();

        let summary = app.summary().unwrap();
        assert_eq!(summary.players, 2);
        assert_eq!(summary.free_agents, 1);
        assert_eq!(summary.teams, 1);
        assert_eq!(app.standings().unwrap().len(), 1);
        assert_eq!(app.top_teams().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_failed_background_task_is_reported_after_snapshot() {
        let path = std::env::temp_dir().join(format!("futsal-league-{}.json", uuid::Uuid::new_v4()));
        let mut config = AppConfig::default();
        config.league.snapshot_path = Some(path.clone());

        let mut app = AppState::new(config).await.unwrap();
        app.start().await.unwrap();
        app.background_tasks
            .push(tokio::spawn(async { panic!("delivery worker crashed") }));

        let err = app.shutdown().await.unwrap_err();
        assert!(matches!(err, ServiceError::BackgroundTask { .. }));
        assert!(path.exists());
        let _ = std::fs::remove_file(path);
    }

    #[tokio::test]
    async fn test_snapshot_written_on_shutdown() {
        let path = std::env::temp_dir().join(format!("futsal-league-{}.json", uuid::Uuid::new_v4()));
        let mut config = AppConfig::default();
        config.league.snapshot_path = Some(path.clone());

        let mut app = AppState::new(config.clone()).await.unwrap();
        app.players()
            .register_player("a", PlayerRegistration::new("A", Position::Striker))
            .unwrap();
        app.shutdown().await.unwrap();

        let reloaded = AppState::new(config).await.unwrap();
        assert_eq!(reloaded.summary().unwrap().players, 1);
        let _ = std::fs::remove_file(path);
    }
}

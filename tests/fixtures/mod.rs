//! Test fixtures and mock implementations for integration testing

#![allow(dead_code)]

use async_trait::async_trait;
use futsal_league::error::Result;
use futsal_league::metrics::MetricsCollector;
use futsal_league::notify::{NotificationEmitter, RecordingNotificationEmitter};
use futsal_league::types::{Actor, NotificationIntent, Player, Position, Team, TeamId};
use futsal_league::{
    LeagueStore, MatchInput, MatchRecorder, NewTeam, PlayerDirectory, PlayerRegistration,
    RosterManager,
};
use mockall::mock;
use std::sync::Arc;

// Emitter whose behaviour each test scripts
mock! {
    pub Emitter {}

    #[async_trait]
    impl NotificationEmitter for Emitter {
        async fn emit(&self, intent: NotificationIntent) -> Result<()>;
    }
}

/// A complete league wired against one store
pub struct TestLeague {
    pub store: Arc<LeagueStore>,
    pub metrics: Arc<MetricsCollector>,
    pub emitter: Arc<RecordingNotificationEmitter>,
    pub players: PlayerDirectory,
    pub roster: RosterManager,
    pub matches: MatchRecorder,
    pub admin: Actor,
}

impl TestLeague {
    pub fn new() -> Self {
        Self::with_emitter_recording(Arc::new(RecordingNotificationEmitter::new()))
    }

    fn with_emitter_recording(emitter: Arc<RecordingNotificationEmitter>) -> Self {
        let store = Arc::new(LeagueStore::new());
        let metrics = Arc::new(MetricsCollector::new().expect("metrics collector"));
        Self {
            players: PlayerDirectory::new(store.clone(), metrics.clone()),
            roster: RosterManager::new(store.clone(), emitter.clone(), metrics.clone()),
            matches: MatchRecorder::new(store.clone(), metrics.clone()),
            store,
            metrics,
            emitter,
            admin: Actor::admin("league-admin"),
        }
    }

    /// Roster manager using a different emitter over the same store
    pub fn roster_with(&self, emitter: Arc<dyn NotificationEmitter>) -> RosterManager {
        RosterManager::new(self.store.clone(), emitter, self.metrics.clone())
    }

    pub fn register(&self, actor: &str, position: Position) -> Player {
        self.players
            .register_player(actor, PlayerRegistration::new(actor, position))
            .expect("register player")
    }

    /// Register a captain and found a team named `name`
    pub fn team(&self, name: &str) -> (Team, Player) {
        let captain = self.register(&format!("{}-captain", name), Position::Goalkeeper);
        let team = self
            .roster
            .create_team(captain.id, NewTeam::new(name))
            .expect("create team");
        (team, captain)
    }

    pub fn team_state(&self, team_id: TeamId) -> Team {
        self.store
            .read(|state| state.team(team_id).cloned())
            .expect("read lock")
            .expect("team exists")
    }

    pub fn player_state(&self, player: &Player) -> Player {
        self.players.player(player.id).expect("player exists")
    }

    pub fn finish(&self, team1: TeamId, team2: TeamId, score1: i64, score2: i64) -> futsal_league::Match {
        self.matches
            .record_match(
                &self.admin,
                MatchInput::new(team1, team2)
                    .with_scores(score1, score2)
                    .finished(true),
            )
            .expect("record match")
    }
}

//! Roster manager implementation
//!
//! Every membership transition runs inside one store transaction. Captains
//! and players are told about request changes through notification intents
//! emitted after the transaction commits.

use super::team::{normalize_name, normalize_short_name, NewTeam, TeamUpdate};
use crate::error::{LeagueError, Result};
use crate::metrics::MetricsCollector;
use crate::notify::{emit_best_effort, messages, NotificationEmitter};
use crate::storage::{LeagueState, LeagueStore};
use crate::types::{
    Decision, NotificationIntent, Player, PlayerId, RequestId, RequestStatus, Standings, Team,
    TeamId, TransferRequest,
};
use crate::utils::{current_timestamp, generate_id};
use std::sync::{Arc, RwLock};
use tracing::{debug, info, warn};

/// Statistics about roster operations
#[derive(Debug, Clone, Default)]
pub struct RosterStats {
    /// Join requests created
    pub requests_created: u64,
    /// Requests accepted by a captain
    pub requests_accepted: u64,
    /// Requests rejected by a captain
    pub requests_rejected: u64,
    /// Accepts refused because the requester had joined another team meanwhile
    pub requests_superseded: u64,
    pub teams_created: u64,
    pub departures: u64,
}

/// What a respond transaction committed
enum Resolution {
    Resolved {
        request: TransferRequest,
        notice: NotificationIntent,
    },
    /// Accept arrived after the requester joined another team; the request
    /// was rejected instead
    Superseded {
        request: TransferRequest,
        notice: NotificationIntent,
    },
}

/// Owns team membership, captaincy and transfer requests
#[derive(Clone)]
pub struct RosterManager {
    store: Arc<LeagueStore>,
    emitter: Arc<dyn NotificationEmitter>,
    metrics: Arc<MetricsCollector>,
    stats: Arc<RwLock<RosterStats>>,
}

impl RosterManager {
    pub fn new(
        store: Arc<LeagueStore>,
        emitter: Arc<dyn NotificationEmitter>,
        metrics: Arc<MetricsCollector>,
    ) -> Self {
        Self {
            store,
            emitter,
            metrics,
            stats: Arc::new(RwLock::new(RosterStats::default())),
        }
    }

    /// Ask to join a team.
    ///
    /// The team's captain, if any, gets a TEAM_REQUEST notification.
    pub async fn request_join(
        &self,
        player_id: PlayerId,
        team_id: TeamId,
    ) -> Result<TransferRequest> {
        let timer = self.metrics.start_timer();
        let result = self.store.transaction(|state| {
            let player = state.player(player_id)?;
            let team = state.team(team_id)?;

            if let Some(current) = player.current_team {
                return Err(LeagueError::conflict(format!(
                    "Player {} already belongs to team {}",
                    player_id, current
                )));
            }
            if state.has_pending_request(player_id, team_id) {
                return Err(LeagueError::conflict(format!(
                    "Player {} already has a pending request for team {}",
                    player_id, team_id
                )));
            }

            let notice = team
                .captain
                .and_then(|captain| state.players.get(&captain))
                .map(|captain| {
                    messages::join_request(
                        captain.actor_id.clone(),
                        &player.name,
                        &team.name,
                        team_id,
                    )
                });

            let request = TransferRequest {
                id: generate_id(),
                player_id,
                team_id,
                status: RequestStatus::Pending,
                created_at: current_timestamp(),
                resolved_at: None,
            };
            state.transfer_requests.insert(request.id, request.clone());
            Ok((request, notice))
        });
        self.metrics
            .record_operation("request_join", timer.stop(), result.as_ref().err());

        let (request, notice) = result?;
        self.metrics.record_transfer_request("pending");
        self.update_stats(|stats| stats.requests_created += 1);
        info!(
            "Player {} requested to join team {} (request {})",
            player_id, team_id, request.id
        );

        match notice {
            Some(notice) => {
                emit_best_effort(self.emitter.as_ref(), &self.metrics, notice).await;
            }
            None => debug!("Team {} has no captain to notify", team_id),
        }

        Ok(request)
    }

    /// Accept or reject a pending request as the target team's captain.
    ///
    /// Accepting a request whose player joined another team in the meantime
    /// rejects it instead and reports a conflict; that rejection is kept.
    pub async fn respond_to_request(
        &self,
        request_id: RequestId,
        acting_player: PlayerId,
        decision: Decision,
    ) -> Result<TransferRequest> {
        let timer = self.metrics.start_timer();
        let result = self.store.transaction(|state| {
            let request = state.transfer_request(request_id)?.clone();
            let team = state.team(request.team_id)?;

            if !team.is_captain(acting_player) {
                return Err(LeagueError::forbidden(format!(
                    "Only the captain of team {} can respond to its requests",
                    team.id
                )));
            }
            if request.status != RequestStatus::Pending {
                return Err(LeagueError::conflict(format!(
                    "Request {} is already {}",
                    request_id, request.status
                )));
            }

            let team_name = team.name.clone();
            let requester = state.player(request.player_id)?;
            let requester_actor = requester.actor_id.clone();
            let superseded =
                decision == Decision::Accept && requester.current_team.is_some();

            let status = match decision {
                Decision::Accept if !superseded => {
                    state.player_mut(request.player_id)?.current_team = Some(request.team_id);
                    RequestStatus::Accepted
                }
                _ => RequestStatus::Rejected,
            };

            let stored = state.transfer_request_mut(request_id)?;
            stored.status = status;
            stored.resolved_at = Some(current_timestamp());
            let request = stored.clone();

            let notice =
                messages::join_response(requester_actor, &team_name, request.team_id, status);
            Ok(if superseded {
                Resolution::Superseded { request, notice }
            } else {
                Resolution::Resolved { request, notice }
            })
        });
        self.metrics.record_operation(
            "respond_to_request",
            timer.stop(),
            result.as_ref().err(),
        );

        match result? {
            Resolution::Resolved { request, notice } => {
                self.metrics
                    .record_transfer_request(&request.status.to_string().to_lowercase());
                self.update_stats(|stats| match request.status {
                    RequestStatus::Accepted => stats.requests_accepted += 1,
                    _ => stats.requests_rejected += 1,
                });
                info!(
                    "Request {} for team {} resolved as {}",
                    request.id, request.team_id, request.status
                );
                emit_best_effort(self.emitter.as_ref(), &self.metrics, notice).await;
                Ok(request)
            }
            Resolution::Superseded { request, notice } => {
                self.metrics.record_transfer_request("superseded");
                self.update_stats(|stats| stats.requests_superseded += 1);
                warn!(
                    "Request {} rejected: player {} already joined another team",
                    request.id, request.player_id
                );
                emit_best_effort(self.emitter.as_ref(), &self.metrics, notice).await;
                Err(LeagueError::conflict(format!(
                    "Player {} already belongs to a team; request {} was rejected",
                    request.player_id, request.id
                )))
            }
        }
    }

    /// Leave the current team. Captains cannot leave.
    pub fn leave_team(&self, player_id: PlayerId) -> Result<Player> {
        let player = self.store.transaction(|state| {
            let player = state.player(player_id)?;
            let Some(team_id) = player.current_team else {
                return Err(LeagueError::conflict(format!(
                    "Player {} is not in a team",
                    player_id
                )));
            };
            if state
                .teams
                .get(&team_id)
                .is_some_and(|team| team.is_captain(player_id))
            {
                return Err(LeagueError::conflict(format!(
                    "Player {} is the captain of team {} and cannot leave it",
                    player_id, team_id
                )));
            }

            let player = state.player_mut(player_id)?;
            player.current_team = None;
            player.updated_at = current_timestamp();
            Ok(player.clone())
        })?;

        self.metrics.record_departure();
        self.update_stats(|stats| stats.departures += 1);
        info!("Player {} left their team", player_id);
        Ok(player)
    }

    /// Found a team led by `player_id`, who becomes its captain and first member
    pub fn create_team(&self, player_id: PlayerId, new_team: NewTeam) -> Result<Team> {
        let (name, short_name) = new_team.normalized()?;

        let team = self.store.transaction(|state| {
            let player = state.player(player_id)?;
            if let Some(current) = player.current_team {
                return Err(LeagueError::conflict(format!(
                    "Player {} already belongs to team {}",
                    player_id, current
                )));
            }
            if state.team_name_taken(&name, None) {
                return Err(LeagueError::conflict(format!(
                    "Team name '{}' is already taken",
                    name
                )));
            }

            let team = Team {
                id: generate_id(),
                name: name.clone(),
                short_name: short_name.clone(),
                standings: Standings::default(),
                captain: Some(player_id),
                created_at: current_timestamp(),
            };
            state.teams.insert(team.id, team.clone());

            let player = state.player_mut(player_id)?;
            player.current_team = Some(team.id);
            player.updated_at = current_timestamp();
            Ok(team)
        })?;

        self.metrics.record_team_created();
        self.update_stats(|stats| stats.teams_created += 1);
        info!(
            "Created team '{}' ({}) with captain {}",
            team.name, team.id, player_id
        );
        Ok(team)
    }

    /// Rename a team or change its short name; captain only
    pub fn update_team(
        &self,
        acting_player: PlayerId,
        team_id: TeamId,
        update: TeamUpdate,
    ) -> Result<Team> {
        let name = update.name.as_deref().map(normalize_name).transpose()?;
        let short_name = update
            .short_name
            .as_ref()
            .map(|s| normalize_short_name(s.as_deref()))
            .transpose()?;

        self.store.transaction(|state| {
            ensure_captain(state, acting_player, team_id)?;

            if let Some(name) = &name {
                if state.team_name_taken(name, Some(team_id)) {
                    return Err(LeagueError::conflict(format!(
                        "Team name '{}' is already taken",
                        name
                    )));
                }
            }

            let team = state.team_mut(team_id)?;
            if let Some(name) = name {
                team.name = name;
            }
            if let Some(short_name) = short_name {
                team.short_name = short_name;
            }
            debug!("Updated team {} - name: '{}'", team.id, team.name);
            Ok(team.clone())
        })
    }

    /// All requests addressed to a team, newest first; captain only
    pub fn team_requests(
        &self,
        acting_player: PlayerId,
        team_id: TeamId,
    ) -> Result<Vec<TransferRequest>> {
        self.store.read(|state| {
            ensure_captain(state, acting_player, team_id)?;
            Ok(newest_first(
                state
                    .transfer_requests
                    .values()
                    .filter(|r| r.team_id == team_id),
            ))
        })?
    }

    /// A player's own requests, newest first
    pub fn player_requests(&self, player_id: PlayerId) -> Result<Vec<TransferRequest>> {
        self.store.read(|state| {
            state.player(player_id)?;
            Ok(newest_first(
                state
                    .transfer_requests
                    .values()
                    .filter(|r| r.player_id == player_id),
            ))
        })?
    }

    pub fn team(&self, team_id: TeamId) -> Result<Team> {
        self.store.read(|state| state.team(team_id).cloned())?
    }

    /// Current members of a team, ordered by name
    pub fn members(&self, team_id: TeamId) -> Result<Vec<Player>> {
        self.store.read(|state| {
            state.team(team_id)?;
            let mut members: Vec<Player> = state.members_of(team_id).cloned().collect();
            members.sort_by(|a, b| a.name.cmp(&b.name));
            Ok(members)
        })?
    }

    /// Get current roster statistics
    pub fn get_stats(&self) -> RosterStats {
        self.stats
            .read()
            .map(|stats| stats.clone())
            .unwrap_or_default()
    }

    fn update_stats(&self, update: impl FnOnce(&mut RosterStats)) {
        if let Ok(mut stats) = self.stats.write() {
            update(&mut stats);
        }
    }
}

fn ensure_captain(state: &LeagueState, player_id: PlayerId, team_id: TeamId) -> Result<()> {
    let team = state.team(team_id)?;
    if !team.is_captain(player_id) {
        return Err(LeagueError::forbidden(format!(
            "Player {} is not the captain of team {}",
            player_id, team_id
        )));
    }
    Ok(())
}

fn newest_first<'a>(requests: impl Iterator<Item = &'a TransferRequest>) -> Vec<TransferRequest> {
    let mut requests: Vec<TransferRequest> = requests.cloned().collect();
    requests.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    requests
}

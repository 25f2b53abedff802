//! Relational league state

use crate::error::{LeagueError, Result};
use crate::types::{
    Match, MatchId, Player, PlayerId, PlayerMatchStats, RequestId, RequestStatus, Team, TeamId,
    TransferRequest,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// All league rows, keyed by id
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LeagueState {
    pub players: HashMap<PlayerId, Player>,
    pub teams: HashMap<TeamId, Team>,
    pub matches: HashMap<MatchId, Match>,
    pub player_stats: Vec<PlayerMatchStats>,
    pub transfer_requests: HashMap<RequestId, TransferRequest>,
}

impl LeagueState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn player(&self, id: PlayerId) -> Result<&Player> {
        self.players
            .get(&id)
            .ok_or_else(|| LeagueError::not_found("Player", id))
    }

    pub fn player_mut(&mut self, id: PlayerId) -> Result<&mut Player> {
        self.players
            .get_mut(&id)
            .ok_or_else(|| LeagueError::not_found("Player", id))
    }

    pub fn player_by_actor(&self, actor_id: &str) -> Option<&Player> {
        self.players.values().find(|p| p.actor_id == actor_id)
    }

    pub fn team(&self, id: TeamId) -> Result<&Team> {
        self.teams
            .get(&id)
            .ok_or_else(|| LeagueError::not_found("Team", id))
    }

    pub fn team_mut(&mut self, id: TeamId) -> Result<&mut Team> {
        self.teams
            .get_mut(&id)
            .ok_or_else(|| LeagueError::not_found("Team", id))
    }

    pub fn match_(&self, id: MatchId) -> Result<&Match> {
        self.matches
            .get(&id)
            .ok_or_else(|| LeagueError::not_found("Match", id))
    }

    pub fn transfer_request(&self, id: RequestId) -> Result<&TransferRequest> {
        self.transfer_requests
            .get(&id)
            .ok_or_else(|| LeagueError::not_found("TransferRequest", id))
    }

    pub fn transfer_request_mut(&mut self, id: RequestId) -> Result<&mut TransferRequest> {
        self.transfer_requests
            .get_mut(&id)
            .ok_or_else(|| LeagueError::not_found("TransferRequest", id))
    }

    /// Case-insensitive team name lookup, optionally ignoring one team
    pub fn team_name_taken(&self, name: &str, except: Option<TeamId>) -> bool {
        self.teams
            .values()
            .any(|t| Some(t.id) != except && t.name.trim().eq_ignore_ascii_case(name.trim()))
    }

    pub fn has_pending_request(&self, player_id: PlayerId, team_id: TeamId) -> bool {
        self.transfer_requests.values().any(|r| {
            r.player_id == player_id && r.team_id == team_id && r.status == RequestStatus::Pending
        })
    }

    pub fn stats_for_player(&self, player_id: PlayerId) -> impl Iterator<Item = &PlayerMatchStats> {
        self.player_stats
            .iter()
            .filter(move |s| s.player_id == player_id)
    }

    pub fn stats_for_match(&self, match_id: MatchId) -> impl Iterator<Item = &PlayerMatchStats> {
        self.player_stats
            .iter()
            .filter(move |s| s.match_id == match_id)
    }

    pub fn members_of(&self, team_id: TeamId) -> impl Iterator<Item = &Player> {
        self.players
            .values()
            .filter(move |p| p.current_team == Some(team_id))
    }
}

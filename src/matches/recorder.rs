//! Match recorder implementation

use super::stats::{self, LeaderboardEntry, MatchDetail, MatchSummary};
use super::transition::Transition;
use crate::error::{LeagueError, Result};
use crate::metrics::MetricsCollector;
use crate::standings::{apply_result, revert_result};
use crate::storage::{LeagueState, LeagueStore};
use crate::types::{Actor, Match, MatchId, PlayerId, PlayerMatchStats, TeamId};
use crate::utils::{current_timestamp, generate_id, non_negative};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info};

/// A match save as submitted by an admin.
///
/// Scores arrive signed so that negative input is rejected rather than
/// wrapped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchInput {
    /// Existing match to update; a new match is created when absent
    pub id: Option<MatchId>,
    pub team1: TeamId,
    pub team2: TeamId,
    pub team1_score: i64,
    pub team2_score: i64,
    pub is_finished: bool,
    pub date: DateTime<Utc>,
}

impl MatchInput {
    /// Unfinished 0-0 fixture dated now
    pub fn new(team1: TeamId, team2: TeamId) -> Self {
        Self {
            id: None,
            team1,
            team2,
            team1_score: 0,
            team2_score: 0,
            is_finished: false,
            date: current_timestamp(),
        }
    }

    pub fn with_id(mut self, id: MatchId) -> Self {
        self.id = Some(id);
        self
    }

    pub fn with_scores(mut self, team1_score: i64, team2_score: i64) -> Self {
        self.team1_score = team1_score;
        self.team2_score = team2_score;
        self
    }

    pub fn with_date(mut self, date: DateTime<Utc>) -> Self {
        self.date = date;
        self
    }

    pub fn finished(mut self, is_finished: bool) -> Self {
        self.is_finished = is_finished;
        self
    }

    /// Input that re-saves an existing match unchanged
    pub fn from_match(m: &Match) -> Self {
        Self {
            id: Some(m.id),
            team1: m.team1,
            team2: m.team2,
            team1_score: i64::from(m.team1_score),
            team2_score: i64::from(m.team2_score),
            is_finished: m.is_finished,
            date: m.date,
        }
    }
}

/// One player's line for a match
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerStatsInput {
    pub match_id: MatchId,
    pub player_id: PlayerId,
    pub team_id: TeamId,
    pub goals: i64,
    pub assists: i64,
    pub played: bool,
}

/// Records match results and keeps the standings ledger in step with them
#[derive(Clone)]
pub struct MatchRecorder {
    store: Arc<LeagueStore>,
    metrics: Arc<MetricsCollector>,
}

impl MatchRecorder {
    pub fn new(store: Arc<LeagueStore>, metrics: Arc<MetricsCollector>) -> Self {
        Self { store, metrics }
    }

    /// Create or update a match; admin only.
    ///
    /// The standings change for the save (none, apply, or revert+apply) is
    /// committed together with the match row. A finished match cannot be
    /// saved back to unfinished here; use [`MatchRecorder::reopen_match`].
    pub fn record_match(&self, actor: &Actor, input: MatchInput) -> Result<Match> {
        actor.require_admin("record matches")?;

        if input.team1 == input.team2 {
            return Err(LeagueError::validation(
                "A match needs two different teams",
            ));
        }
        let scores = (
            non_negative(input.team1_score, "team1_score")?,
            non_negative(input.team2_score, "team2_score")?,
        );

        let timer = self.metrics.start_timer();
        let result = self.store.transaction(|state| {
            state.team(input.team1)?;
            state.team(input.team2)?;

            let previous = match input.id {
                Some(id) => state.matches.get(&id).cloned(),
                None => None,
            };
            if let Some(previous) = &previous {
                if (previous.team1, previous.team2) != (input.team1, input.team2) {
                    return Err(LeagueError::validation(format!(
                        "The teams of match {} cannot be changed",
                        previous.id
                    )));
                }
            }

            let transition = Transition::classify(
                previous.as_ref().map(|m| (m.is_finished, m.scores())),
                input.is_finished,
                scores,
            );

            match transition {
                Transition::DraftToDraft | Transition::Unchanged => {}
                Transition::Finish => {
                    apply_to_teams(state, input.team1, input.team2, scores)?;
                }
                Transition::Correction { previous: old } => {
                    revert_from_teams(state, input.team1, input.team2, old)?;
                    apply_to_teams(state, input.team1, input.team2, scores)?;
                }
                Transition::Unfinish { .. } => {
                    return Err(LeagueError::conflict(
                        "A finished match cannot be saved as unfinished; reopen it instead",
                    ));
                }
            }

            let now = current_timestamp();
            let saved = Match {
                id: input.id.unwrap_or_else(generate_id),
                team1: input.team1,
                team2: input.team2,
                team1_score: scores.0,
                team2_score: scores.1,
                is_finished: input.is_finished,
                date: input.date,
                created_at: previous.map(|m| m.created_at).unwrap_or(now),
            };
            state.matches.insert(saved.id, saved.clone());
            Ok((saved, transition))
        });
        self.metrics
            .record_operation("record_match", timer.stop(), result.as_ref().err());

        let (saved, transition) = result?;
        self.metrics.record_match_transition(transition.label());
        match transition {
            Transition::Finish => self.metrics.record_standings_update("apply"),
            Transition::Correction { .. } => {
                self.metrics.record_standings_update("revert");
                self.metrics.record_standings_update("apply");
            }
            _ => {}
        }

        match transition {
            Transition::DraftToDraft | Transition::Unchanged => debug!(
                "Saved match {} without standings change ({})",
                saved.id,
                transition.label()
            ),
            Transition::Correction { previous } => info!(
                "Corrected match {} from {}-{} to {}-{}",
                saved.id, previous.0, previous.1, saved.team1_score, saved.team2_score
            ),
            _ => info!(
                "Finished match {}: {}-{}",
                saved.id, saved.team1_score, saved.team2_score
            ),
        }
        Ok(saved)
    }

    /// Take back a finished result and return the match to draft; admin only
    pub fn reopen_match(&self, actor: &Actor, match_id: MatchId) -> Result<Match> {
        actor.require_admin("reopen matches")?;

        let reopened = self.store.transaction(|state| {
            let current = state.match_(match_id)?.clone();
            if !current.is_finished {
                return Err(LeagueError::conflict(format!(
                    "Match {} is not finished",
                    match_id
                )));
            }

            revert_from_teams(state, current.team1, current.team2, current.scores())?;

            let reopened = Match {
                is_finished: false,
                ..current
            };
            state.matches.insert(reopened.id, reopened.clone());
            Ok(reopened)
        })?;

        self.metrics.record_match_transition("reopen");
        self.metrics.record_standings_update("revert");
        info!("Reopened match {}", match_id);
        Ok(reopened)
    }

    /// Store one player's line for a match; admin only
    pub fn update_player_stats(
        &self,
        actor: &Actor,
        input: PlayerStatsInput,
    ) -> Result<PlayerMatchStats> {
        actor.require_admin("record player statistics")?;
        let goals = non_negative(input.goals, "goals")?;
        let assists = non_negative(input.assists, "assists")?;

        let row = self.store.transaction(|state| {
            let m = state.match_(input.match_id)?;
            state.player(input.player_id)?;
            state.team(input.team_id)?;

            if !m.involves(input.team_id) {
                return Err(LeagueError::validation(format!(
                    "Team {} did not play in match {}",
                    input.team_id, input.match_id
                )));
            }
            if state
                .stats_for_match(input.match_id)
                .any(|s| s.player_id == input.player_id)
            {
                return Err(LeagueError::conflict(format!(
                    "Player {} already has statistics for match {}",
                    input.player_id, input.match_id
                )));
            }

            let row = PlayerMatchStats {
                match_id: input.match_id,
                player_id: input.player_id,
                team_id: input.team_id,
                goals,
                assists,
                played: input.played,
            };
            state.player_stats.push(row.clone());
            Ok(row)
        })?;

        self.metrics.record_player_stats();
        debug!(
            "Recorded stats for player {} in match {}: {} goals, {} assists",
            row.player_id, row.match_id, row.goals, row.assists
        );
        Ok(row)
    }

    pub fn get_match(&self, match_id: MatchId) -> Result<Match> {
        self.store.read(|state| state.match_(match_id).cloned())?
    }

    pub fn total_goals(&self, player_id: PlayerId) -> Result<u64> {
        self.store.read(|state| {
            state.player(player_id)?;
            Ok(stats::total_goals(state, player_id))
        })?
    }

    pub fn total_assists(&self, player_id: PlayerId) -> Result<u64> {
        self.store.read(|state| {
            state.player(player_id)?;
            Ok(stats::total_assists(state, player_id))
        })?
    }

    pub fn matches_played(&self, player_id: PlayerId) -> Result<usize> {
        self.store.read(|state| {
            state.player(player_id)?;
            Ok(stats::matches_played(state, player_id))
        })?
    }

    pub fn goal_leaderboard(&self, limit: usize) -> Result<Vec<LeaderboardEntry>> {
        self.store.read(|state| stats::goal_leaderboard(state, limit))
    }

    pub fn assist_leaderboard(&self, limit: usize) -> Result<Vec<LeaderboardEntry>> {
        self.store.read(|state| stats::assist_leaderboard(state, limit))
    }

    pub fn match_list(&self) -> Result<Vec<MatchSummary>> {
        self.store.read(stats::match_list)
    }

    pub fn team_matches(&self, team_id: TeamId) -> Result<Vec<MatchSummary>> {
        self.store.read(|state| stats::team_matches(state, team_id))?
    }

    /// Matches the player has a stats row in, most recent first
    pub fn player_matches(&self, player_id: PlayerId) -> Result<Vec<MatchSummary>> {
        self.store.read(|state| stats::player_matches(state, player_id))?
    }

    pub fn recent_matches(&self, limit: usize) -> Result<Vec<MatchSummary>> {
        self.store.read(|state| stats::recent_matches(state, limit))
    }

    pub fn match_detail(&self, match_id: MatchId) -> Result<MatchDetail> {
        self.store.read(|state| stats::match_detail(state, match_id))?
    }
}

fn apply_to_teams(
    state: &mut LeagueState,
    team1: TeamId,
    team2: TeamId,
    scores: (u32, u32),
) -> Result<()> {
    let (s1, s2) = apply_result(
        &state.team(team1)?.standings,
        &state.team(team2)?.standings,
        scores.0,
        scores.1,
    )?;
    state.team_mut(team1)?.standings = s1;
    state.team_mut(team2)?.standings = s2;
    Ok(())
}

fn revert_from_teams(
    state: &mut LeagueState,
    team1: TeamId,
    team2: TeamId,
    scores: (u32, u32),
) -> Result<()> {
    let (s1, s2) = revert_result(
        &state.team(team1)?.standings,
        &state.team(team2)?.standings,
        scores.0,
        scores.1,
    )?;
    state.team_mut(team1)?.standings = s1;
    state.team_mut(team2)?.standings = s2;
    Ok(())
}

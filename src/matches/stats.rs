//! Player aggregates and match read models
//!
//! Everything here is recomputed from the stored rows on each read.

use crate::error::Result;
use crate::storage::LeagueState;
use crate::types::{Match, MatchId, PlayerId, TeamId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Goals scored by a player across all matches
pub fn total_goals(state: &LeagueState, player_id: PlayerId) -> u64 {
    state
        .stats_for_player(player_id)
        .map(|s| u64::from(s.goals))
        .sum()
}

pub fn total_assists(state: &LeagueState, player_id: PlayerId) -> u64 {
    state
        .stats_for_player(player_id)
        .map(|s| u64::from(s.assists))
        .sum()
}

/// Matches the player actually took part in
pub fn matches_played(state: &LeagueState, player_id: PlayerId) -> usize {
    state.stats_for_player(player_id).filter(|s| s.played).count()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub player_id: PlayerId,
    pub name: String,
    pub team_id: Option<TeamId>,
    pub value: u64,
}

/// Top scorers; players without a goal are left out
pub fn goal_leaderboard(state: &LeagueState, limit: usize) -> Vec<LeaderboardEntry> {
    leaderboard(state, limit, total_goals)
}

/// Top assisters; players without an assist are left out
pub fn assist_leaderboard(state: &LeagueState, limit: usize) -> Vec<LeaderboardEntry> {
    leaderboard(state, limit, total_assists)
}

fn leaderboard(
    state: &LeagueState,
    limit: usize,
    metric: fn(&LeagueState, PlayerId) -> u64,
) -> Vec<LeaderboardEntry> {
    let mut entries: Vec<LeaderboardEntry> = state
        .players
        .values()
        .filter_map(|player| {
            let value = metric(state, player.id);
            (value > 0).then(|| LeaderboardEntry {
                player_id: player.id,
                name: player.name.clone(),
                team_id: player.current_team,
                value,
            })
        })
        .collect();

    entries.sort_by(|a, b| b.value.cmp(&a.value).then_with(|| a.name.cmp(&b.name)));
    entries.truncate(limit);
    entries
}

/// A match with its team names resolved
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchSummary {
    pub id: MatchId,
    pub team1: TeamId,
    pub team1_name: String,
    pub team2: TeamId,
    pub team2_name: String,
    pub team1_score: u32,
    pub team2_score: u32,
    pub is_finished: bool,
    pub winner: Option<TeamId>,
    pub date: DateTime<Utc>,
}

impl MatchSummary {
    fn from_match(state: &LeagueState, m: &Match) -> Self {
        Self {
            id: m.id,
            team1: m.team1,
            team1_name: team_name(state, m.team1),
            team2: m.team2,
            team2_name: team_name(state, m.team2),
            team1_score: m.team1_score,
            team2_score: m.team2_score,
            is_finished: m.is_finished,
            winner: m.winner(),
            date: m.date,
        }
    }
}

fn team_name(state: &LeagueState, team_id: TeamId) -> String {
    state
        .teams
        .get(&team_id)
        .map(|t| t.name.clone())
        .unwrap_or_else(|| team_id.to_string())
}

/// All matches, most recent first
pub fn match_list(state: &LeagueState) -> Vec<MatchSummary> {
    summaries(state, state.matches.values())
}

/// Matches a team played in, most recent first
pub fn team_matches(state: &LeagueState, team_id: TeamId) -> Result<Vec<MatchSummary>> {
    state.team(team_id)?;
    Ok(summaries(
        state,
        state.matches.values().filter(|m| m.involves(team_id)),
    ))
}

/// Matches with a stats row for the player, most recent first.
///
/// Membership comes from the rows, so matches played for a former team stay
/// listed after a transfer.
pub fn player_matches(state: &LeagueState, player_id: PlayerId) -> Result<Vec<MatchSummary>> {
    state.player(player_id)?;
    let match_ids: HashSet<MatchId> = state
        .stats_for_player(player_id)
        .map(|s| s.match_id)
        .collect();
    Ok(summaries(
        state,
        state.matches.values().filter(|m| match_ids.contains(&m.id)),
    ))
}

/// The latest `limit` matches
pub fn recent_matches(state: &LeagueState, limit: usize) -> Vec<MatchSummary> {
    let mut matches = match_list(state);
    matches.truncate(limit);
    matches
}

fn summaries<'a>(state: &LeagueState, matches: impl Iterator<Item = &'a Match>) -> Vec<MatchSummary> {
    let mut matches: Vec<&Match> = matches.collect();
    matches.sort_by(|a, b| b.date.cmp(&a.date).then_with(|| b.created_at.cmp(&a.created_at)));
    matches
        .into_iter()
        .map(|m| MatchSummary::from_match(state, m))
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerStatLine {
    pub player_id: PlayerId,
    pub name: String,
    pub team_id: TeamId,
    pub goals: u32,
    pub assists: u32,
    pub played: bool,
}

/// A match with every player's line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchDetail {
    pub summary: MatchSummary,
    pub stats: Vec<PlayerStatLine>,
}

pub fn match_detail(state: &LeagueState, match_id: MatchId) -> Result<MatchDetail> {
    let m = state.match_(match_id)?;
    let mut stats: Vec<PlayerStatLine> = state
        .stats_for_match(match_id)
        .map(|s| PlayerStatLine {
            player_id: s.player_id,
            name: state
                .players
                .get(&s.player_id)
                .map(|p| p.name.clone())
                .unwrap_or_default(),
            team_id: s.team_id,
            goals: s.goals,
            assists: s.assists,
            played: s.played,
        })
        .collect();
    stats.sort_by(|a, b| {
        (a.team_id != m.team1)
            .cmp(&(b.team_id != m.team1))
            .then_with(|| b.goals.cmp(&a.goals))
            .then_with(|| a.name.cmp(&b.name))
    });

    Ok(MatchDetail {
        summary: MatchSummary::from_match(state, m),
        stats,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Attributes, Player, PlayerMatchStats, Position, PreferredFoot, Standings, Team};
    use crate::utils::{current_timestamp, generate_id};
    use chrono::Duration;

    fn player(state: &mut LeagueState, name: &str) -> PlayerId {
        let id = generate_id();
        state.players.insert(
            id,
            Player {
                id,
                actor_id: name.to_string(),
                name: name.to_string(),
                age: 20,
                jersey_number: None,
                preferred_foot: PreferredFoot::Right,
                position: Position::Striker,
                attributes: Attributes::default(),
                attributes_initialized: true,
                current_team: None,
                created_at: current_timestamp(),
                updated_at: current_timestamp(),
            },
        );
        id
    }

    fn team(state: &mut LeagueState, name: &str) -> TeamId {
        let id = generate_id();
        state.teams.insert(
            id,
            Team {
                id,
                name: name.to_string(),
                short_name: None,
                standings: Standings::default(),
                captain: None,
                created_at: current_timestamp(),
            },
        );
        id
    }

    fn fixture(state: &mut LeagueState, team1: TeamId, team2: TeamId, days_ago: i64) -> MatchId {
        let id = generate_id();
        state.matches.insert(
            id,
            Match {
                id,
                team1,
                team2,
                team1_score: 1,
                team2_score: 0,
                is_finished: true,
                date: current_timestamp() - Duration::days(days_ago),
                created_at: current_timestamp(),
            },
        );
        id
    }

    fn line(state: &mut LeagueState, m: MatchId, p: PlayerId, t: TeamId, goals: u32, assists: u32, played: bool) {
        state.player_stats.push(PlayerMatchStats {
            match_id: m,
            player_id: p,
            team_id: t,
            goals,
            assists,
            played,
        });
    }

    #[test]
    fn test_aggregates_and_leaderboards() {
        let mut state = LeagueState::new();
        let a = team(&mut state, "Red Lions");
        let b = team(&mut state, "Blue Sharks");
        let m1 = fixture(&mut state, a, b, 2);
        let m2 = fixture(&mut state, b, a, 1);
        let ali = player(&mut state, "Ali");
        let bora = player(&mut state, "Bora");
        let cem = player(&mut state, "Cem");

        line(&mut state, m1, ali, a, 2, 0, true);
        line(&mut state, m2, ali, a, 1, 1, true);
        line(&mut state, m1, bora, b, 3, 0, true);
        line(&mut state, m2, cem, b, 0, 0, false);

        assert_eq!(total_goals(&state, ali), 3);
        assert_eq!(total_assists(&state, ali), 1);
        assert_eq!(matches_played(&state, ali), 2);
        assert_eq!(matches_played(&state, cem), 0);

        let goals = goal_leaderboard(&state, 10);
        let names: Vec<&str> = goals.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["Ali", "Bora"]);

        let assists = assist_leaderboard(&state, 10);
        assert_eq!(assists.len(), 1);
        assert_eq!(assists[0].player_id, ali);

        assert_eq!(goal_leaderboard(&state, 1).len(), 1);
    }

    #[test]
    fn test_match_lists_newest_first() {
        let mut state = LeagueState::new();
        let a = team(&mut state, "Red Lions");
        let b = team(&mut state, "Blue Sharks");
        let c = team(&mut state, "Green Eagles");
        let older = fixture(&mut state, a, b, 5);
        let newer = fixture(&mut state, b, a, 1);
        fixture(&mut state, b, c, 3);

        let all = match_list(&state);
        assert_eq!(all.len(), 3);
        assert_eq!(all[0].id, newer);

        let for_a = team_matches(&state, a).unwrap();
        let ids: Vec<MatchId> = for_a.iter().map(|m| m.id).collect();
        assert_eq!(ids, vec![newer, older]);
        assert_eq!(for_a[1].team1_name, "Red Lions");
        assert_eq!(for_a[1].winner, Some(a));

        assert!(team_matches(&state, generate_id()).unwrap_err().is_not_found());
    }

    #[test]
    fn test_player_matches_follow_stats_rows_across_transfer() {
        let mut state = LeagueState::new();
        let a = team(&mut state, "Red Lions");
        let b = team(&mut state, "Blue Sharks");
        let c = team(&mut state, "Green Eagles");
        let for_lions = fixture(&mut state, a, b, 4);
        let for_eagles = fixture(&mut state, c, b, 1);
        fixture(&mut state, a, c, 2);
        let ali = player(&mut state, "Ali");

        line(&mut state, for_lions, ali, a, 1, 0, true);
        state.players.get_mut(&ali).unwrap().current_team = Some(c);
        line(&mut state, for_eagles, ali, c, 0, 0, false);

        let matches = player_matches(&state, ali).unwrap();
        let ids: Vec<MatchId> = matches.iter().map(|m| m.id).collect();
        assert_eq!(ids, vec![for_eagles, for_lions]);
        assert_eq!(matches[1].team1_name, "Red Lions");
        assert_eq!(
            state
                .stats_for_player(ali)
                .find(|s| s.match_id == for_lions)
                .map(|s| s.team_id),
            Some(a)
        );

        let idle = player(&mut state, "Bora");
        assert!(player_matches(&state, idle).unwrap().is_empty());
        assert!(player_matches(&state, generate_id()).unwrap_err().is_not_found());
    }

    #[test]
    fn test_recent_matches_limits_to_latest() {
        let mut state = LeagueState::new();
        let a = team(&mut state, "Red Lions");
        let b = team(&mut state, "Blue Sharks");
        let days: Vec<MatchId> = (1..=5).map(|d| fixture(&mut state, a, b, d)).collect();

        let recent = recent_matches(&state, 3);
        let ids: Vec<MatchId> = recent.iter().map(|m| m.id).collect();
        assert_eq!(ids, days[..3].to_vec());
        assert_eq!(recent_matches(&state, 10).len(), 5);
    }

    #[test]
    fn test_match_detail() {
        let mut state = LeagueState::new();
        let a = team(&mut state, "Red Lions");
        let b = team(&mut state, "Blue Sharks");
        let m = fixture(&mut state, a, b, 0);
        let ali = player(&mut state, "Ali");
        let bora = player(&mut state, "Bora");
        line(&mut state, m, bora, b, 0, 0, true);
        line(&mut state, m, ali, a, 1, 0, true);

        let detail = match_detail(&state, m).unwrap();
        assert_eq!(detail.summary.team2_name, "Blue Sharks");
        assert_eq!(detail.stats.len(), 2);
        assert_eq!(detail.stats[0].name, "Ali");
        assert!(match_detail(&state, generate_id()).unwrap_err().is_not_found());
    }
}

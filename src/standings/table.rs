//! Standings read models

use crate::types::{Team, TeamId};
use serde::{Deserialize, Serialize};

/// One row of the league table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandingsRow {
    /// 1-based rank in the table
    pub rank: usize,
    pub team_id: TeamId,
    pub name: String,
    pub short_name: Option<String>,
    pub played: u32,
    pub wins: u32,
    pub draws: u32,
    pub losses: u32,
    pub goals_scored: u32,
    pub goals_conceded: u32,
    pub goal_difference: i64,
    pub points: u32,
    pub win_rate: f64,
}

/// League table: points desc, goal difference desc, then name
pub fn standings_table<'a>(teams: impl IntoIterator<Item = &'a Team>) -> Vec<StandingsRow> {
    let mut teams: Vec<&Team> = teams.into_iter().collect();
    teams.sort_by(|a, b| {
        b.standings
            .points
            .cmp(&a.standings.points)
            .then_with(|| b.goal_difference().cmp(&a.goal_difference()))
            .then_with(|| a.name.cmp(&b.name))
    });

    teams
        .into_iter()
        .enumerate()
        .map(|(index, team)| StandingsRow {
            rank: index + 1,
            team_id: team.id,
            name: team.name.clone(),
            short_name: team.short_name.clone(),
            played: team.standings.total_matches(),
            wins: team.standings.wins,
            draws: team.standings.draws,
            losses: team.standings.losses,
            goals_scored: team.standings.goals_scored,
            goals_conceded: team.standings.goals_conceded,
            goal_difference: team.goal_difference(),
            points: team.standings.points,
            win_rate: team.standings.win_rate(),
        })
        .collect()
}

/// Teams with the most wins; ties go to the team with more losses, then name
pub fn top_teams<'a>(teams: impl IntoIterator<Item = &'a Team>, limit: usize) -> Vec<Team> {
    let mut teams: Vec<&Team> = teams.into_iter().collect();
    teams.sort_by(|a, b| {
        b.standings
            .wins
            .cmp(&a.standings.wins)
            .then_with(|| b.standings.losses.cmp(&a.standings.losses))
            .then_with(|| a.name.cmp(&b.name))
    });
    teams.into_iter().take(limit).cloned().collect()
}

//! Apply/revert of match results on team counters
//!
//! Both operations are pure: they take the current counters of the two teams
//! and return updated copies. `revert_result` is the exact inverse of
//! `apply_result` for the same scores, which is what makes score corrections
//! safe.

use crate::error::{LeagueError, Result};
use crate::types::Standings;
use serde::{Deserialize, Serialize};

const POINTS_FOR_WIN: u32 = 3;
const POINTS_FOR_DRAW: u32 = 1;

/// Result of a match from team1's point of view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchOutcome {
    Team1Win,
    Team2Win,
    Draw,
}

impl MatchOutcome {
    pub fn from_scores(score1: u32, score2: u32) -> Self {
        match score1.cmp(&score2) {
            std::cmp::Ordering::Greater => MatchOutcome::Team1Win,
            std::cmp::Ordering::Less => MatchOutcome::Team2Win,
            std::cmp::Ordering::Equal => MatchOutcome::Draw,
        }
    }
}

/// Add one result to both teams' counters
pub fn apply_result(
    team1: &Standings,
    team2: &Standings,
    score1: u32,
    score2: u32,
) -> Result<(Standings, Standings)> {
    let mut t1 = *team1;
    let mut t2 = *team2;

    t1.goals_scored = add(t1.goals_scored, score1, "goals_scored")?;
    t1.goals_conceded = add(t1.goals_conceded, score2, "goals_conceded")?;
    t2.goals_scored = add(t2.goals_scored, score2, "goals_scored")?;
    t2.goals_conceded = add(t2.goals_conceded, score1, "goals_conceded")?;

    match MatchOutcome::from_scores(score1, score2) {
        MatchOutcome::Team1Win => {
            t1.wins = add(t1.wins, 1, "wins")?;
            t1.points = add(t1.points, POINTS_FOR_WIN, "points")?;
            t2.losses = add(t2.losses, 1, "losses")?;
        }
        MatchOutcome::Team2Win => {
            t2.wins = add(t2.wins, 1, "wins")?;
            t2.points = add(t2.points, POINTS_FOR_WIN, "points")?;
            t1.losses = add(t1.losses, 1, "losses")?;
        }
        MatchOutcome::Draw => {
            t1.draws = add(t1.draws, 1, "draws")?;
            t1.points = add(t1.points, POINTS_FOR_DRAW, "points")?;
            t2.draws = add(t2.draws, 1, "draws")?;
            t2.points = add(t2.points, POINTS_FOR_DRAW, "points")?;
        }
    }

    Ok((t1, t2))
}

/// Remove a previously applied result from both teams' counters.
///
/// Fails with `Internal` if a counter would go negative, which means the
/// result was never applied with these scores.
pub fn revert_result(
    team1: &Standings,
    team2: &Standings,
    score1: u32,
    score2: u32,
) -> Result<(Standings, Standings)> {
    let mut t1 = *team1;
    let mut t2 = *team2;

    t1.goals_scored = sub(t1.goals_scored, score1, "goals_scored")?;
    t1.goals_conceded = sub(t1.goals_conceded, score2, "goals_conceded")?;
    t2.goals_scored = sub(t2.goals_scored, score2, "goals_scored")?;
    t2.goals_conceded = sub(t2.goals_conceded, score1, "goals_conceded")?;

    match MatchOutcome::from_scores(score1, score2) {
        MatchOutcome::Team1Win => {
            t1.wins = sub(t1.wins, 1, "wins")?;
            t1.points = sub(t1.points, POINTS_FOR_WIN, "points")?;
            t2.losses = sub(t2.losses, 1, "losses")?;
        }
        MatchOutcome::Team2Win => {
            t2.wins = sub(t2.wins, 1, "wins")?;
            t2.points = sub(t2.points, POINTS_FOR_WIN, "points")?;
            t1.losses = sub(t1.losses, 1, "losses")?;
        }
        MatchOutcome::Draw => {
            t1.draws = sub(t1.draws, 1, "draws")?;
            t1.points = sub(t1.points, POINTS_FOR_DRAW, "points")?;
            t2.draws = sub(t2.draws, 1, "draws")?;
            t2.points = sub(t2.points, POINTS_FOR_DRAW, "points")?;
        }
    }

    Ok((t1, t2))
}

fn add(current: u32, delta: u32, counter: &str) -> Result<u32> {
    current
        .checked_add(delta)
        .ok_or_else(|| LeagueError::internal(format!("Standings counter {} overflowed", counter)))
}

fn sub(current: u32, delta: u32, counter: &str) -> Result<u32> {
    current.checked_sub(delta).ok_or_else(|| {
        LeagueError::internal(format!(
            "Cannot revert {} from {}: standings ledger out of sync",
            delta, counter
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn blank() -> Standings {
        Standings::default()
    }

    #[test]
    fn test_apply_home_win() {
        let (a, b) = apply_result(&blank(), &blank(), 3, 1).unwrap();

        assert_eq!(a.wins, 1);
        assert_eq!(a.points, 3);
        assert_eq!(a.goals_scored, 3);
        assert_eq!(a.goals_conceded, 1);
        assert_eq!(a.losses, 0);

        assert_eq!(b.losses, 1);
        assert_eq!(b.points, 0);
        assert_eq!(b.goals_scored, 1);
        assert_eq!(b.goals_conceded, 3);
    }

    #[test]
    fn test_apply_away_win() {
        let (a, b) = apply_result(&blank(), &blank(), 0, 2).unwrap();
        assert_eq!(a.losses, 1);
        assert_eq!(b.wins, 1);
        assert_eq!(b.points, 3);
    }

    #[test]
    fn test_apply_draw() {
        let (a, b) = apply_result(&blank(), &blank(), 2, 2).unwrap();
        for team in [a, b] {
            assert_eq!(team.draws, 1);
            assert_eq!(team.points, 1);
            assert_eq!(team.goals_scored, 2);
            assert_eq!(team.goals_conceded, 2);
        }
    }

    #[test]
    fn test_correction_from_win_to_draw() {
        let (a, b) = apply_result(&blank(), &blank(), 3, 1).unwrap();
        let (a, b) = revert_result(&a, &b, 3, 1).unwrap();
        let (a, b) = apply_result(&a, &b, 2, 2).unwrap();

        assert_eq!(a.wins, 0);
        assert_eq!(a.draws, 1);
        assert_eq!(a.points, 1);
        assert_eq!(a.goals_scored, 2);
        assert_eq!(a.goals_conceded, 2);
        assert_eq!(b.losses, 0);
        assert_eq!(b.draws, 1);
        assert_eq!(b.points, 1);
    }

    #[test]
    fn test_revert_without_apply_is_rejected() {
        let err = revert_result(&blank(), &blank(), 1, 0).unwrap_err();
        assert_eq!(err.kind(), "internal");
    }

    fn standings_strategy() -> impl Strategy<Value = Standings> {
        (0u32..50, 0u32..50, 0u32..50, 0u32..500, 0u32..500).prop_map(
            |(wins, draws, losses, goals_scored, goals_conceded)| Standings {
                wins,
                draws,
                losses,
                goals_scored,
                goals_conceded,
                points: 3 * wins + draws,
            },
        )
    }

    proptest! {
        #[test]
        fn prop_revert_undoes_apply(
            t1 in standings_strategy(),
            t2 in standings_strategy(),
            s1 in 0u32..30,
            s2 in 0u32..30,
        ) {
            let (a, b) = apply_result(&t1, &t2, s1, s2).unwrap();
            let (a, b) = revert_result(&a, &b, s1, s2).unwrap();
            prop_assert_eq!(a, t1);
            prop_assert_eq!(b, t2);
        }

        #[test]
        fn prop_points_stay_consistent(
            results in prop::collection::vec((0u32..10, 0u32..10, any::<bool>()), 1..40),
        ) {
            let mut a = Standings::default();
            let mut b = Standings::default();
            let mut applied: Vec<(u32, u32)> = Vec::new();

            for (s1, s2, revert) in results {
                if revert {
                    if let Some((r1, r2)) = applied.pop() {
                        let (na, nb) = revert_result(&a, &b, r1, r2).unwrap();
                        a = na;
                        b = nb;
                    }
                } else {
                    let (na, nb) = apply_result(&a, &b, s1, s2).unwrap();
                    a = na;
                    b = nb;
                    applied.push((s1, s2));
                }
                prop_assert!(a.is_consistent());
                prop_assert!(b.is_consistent());
            }
        }
    }
}

//! Concurrency tests for roster and ledger mutations
//!
//! Many tasks hit the same store at once; the transaction boundary must keep
//! membership exclusive and lose no standings update.

mod fixtures;

use fixtures::TestLeague;
use futsal_league::matches::MatchInput;
use futsal_league::types::{Decision, Position, RequestStatus};
use std::sync::Arc;
use std::time::Instant;

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_accepts_place_player_in_one_team() {
    let league = Arc::new(TestLeague::new());
    let player = league.register("deniz", Position::Striker);

    let mut pending = Vec::new();
    for name in ["Red Lions", "Blue Sharks", "Green Eagles", "Black Wolves"] {
        let (team, captain) = league.team(name);
        let request = league.roster.request_join(player.id, team.id).await.unwrap();
        pending.push((request.id, captain.id));
    }

    let handles: Vec<_> = pending
        .into_iter()
        .map(|(request_id, captain_id)| {
            let league = league.clone();
            tokio::spawn(async move {
                league
                    .roster
                    .respond_to_request(request_id, captain_id, Decision::Accept)
                    .await
            })
        })
        .collect();

    let results = futures::future::join_all(handles).await;
    let accepted = results
        .iter()
        .filter(|r| matches!(r, Ok(Ok(_))))
        .count();
    let conflicts = results
        .iter()
        .filter(|r| matches!(r, Ok(Err(e)) if e.is_conflict()))
        .count();

    assert_eq!(accepted, 1);
    assert_eq!(conflicts, 3);

    let requests = league.roster.player_requests(player.id).unwrap();
    let accepted_requests: Vec<_> = requests
        .iter()
        .filter(|r| r.status == RequestStatus::Accepted)
        .collect();
    assert_eq!(accepted_requests.len(), 1);
    assert_eq!(
        requests
            .iter()
            .filter(|r| r.status == RequestStatus::Rejected)
            .count(),
        3
    );

    let current = league.player_state(&player).current_team;
    assert_eq!(current, Some(accepted_requests[0].team_id));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_match_finishes_lose_no_update() {
    let league = Arc::new(TestLeague::new());
    let (home, _) = league.team("Red Lions");

    let mut opponents = Vec::new();
    for index in 0..20 {
        let (team, _) = league.team(&format!("Opponent {}", index));
        opponents.push(team.id);
    }

    let start = Instant::now();
    let handles: Vec<_> = opponents
        .iter()
        .map(|&opponent| {
            let league = league.clone();
            let home = home.id;
            tokio::spawn(async move {
                league.matches.record_match(
                    &league.admin,
                    MatchInput::new(home, opponent)
                        .with_scores(2, 1)
                        .finished(true),
                )
            })
        })
        .collect();

    let results = futures::future::join_all(handles).await;
    let elapsed = start.elapsed();
    assert!(results.iter().all(|r| matches!(r, Ok(Ok(_)))));

    let standings = league.team_state(home.id).standings;
    assert_eq!(standings.wins, 20);
    assert_eq!(standings.points, 60);
    assert_eq!(standings.goals_scored, 40);
    assert_eq!(standings.goals_conceded, 20);
    assert!(standings.is_consistent());

    for opponent in opponents {
        let s = league.team_state(opponent).standings;
        assert_eq!((s.losses, s.goals_scored, s.goals_conceded), (1, 1, 2));
    }

    println!("Recorded 20 concurrent results in {:?}", elapsed);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_corrections_of_one_match_stay_consistent() {
    let league = Arc::new(TestLeague::new());
    let (a, _) = league.team("Red Lions");
    let (b, _) = league.team("Blue Sharks");
    let m = league.finish(a.id, b.id, 1, 0);

    let handles: Vec<_> = (0..10i64)
        .map(|score| {
            let league = league.clone();
            let input = MatchInput::from_match(&m).with_scores(score, 3);
            tokio::spawn(async move { league.matches.record_match(&league.admin, input) })
        })
        .collect();
    futures::future::join_all(handles).await;

    let stored = league.matches.get_match(m.id).unwrap();
    let team_a = league.team_state(a.id).standings;
    let team_b = league.team_state(b.id).standings;

    // Exactly one result is counted, the one that was saved last
    assert_eq!(team_a.total_matches(), 1);
    assert_eq!(team_b.total_matches(), 1);
    assert_eq!(team_a.goals_scored, stored.team1_score);
    assert_eq!(team_b.goals_scored, stored.team2_score);
    assert!(team_a.is_consistent() && team_b.is_consistent());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_join_requests_keep_one_pending_per_team() {
    let league = Arc::new(TestLeague::new());
    let (team, _) = league.team("Red Lions");
    let player = league.register("deniz", Position::Striker);

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let league = league.clone();
            let (player_id, team_id) = (player.id, team.id);
            tokio::spawn(async move { league.roster.request_join(player_id, team_id).await })
        })
        .collect();

    let results = futures::future::join_all(handles).await;
    let created = results.iter().filter(|r| matches!(r, Ok(Ok(_)))).count();
    assert_eq!(created, 1);
    assert_eq!(league.roster.player_requests(player.id).unwrap().len(), 1);
}

//! Match results and player statistics
//!
//! Saving a match runs a small state machine deciding how the standings
//! ledger is touched, so that a result contributes to the standings exactly
//! once per scoring state.

pub mod recorder;
pub mod stats;
pub mod transition;

pub use recorder::{MatchInput, MatchRecorder, PlayerStatsInput};
pub use stats::{LeaderboardEntry, MatchDetail, MatchSummary, PlayerStatLine};
pub use transition::Transition;

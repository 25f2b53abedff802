//! Team standings
//!
//! The ledger applies and reverts the effect of one match result on the
//! two teams' counters; the table module turns counters into sorted read
//! models.

pub mod ledger;
pub mod table;

pub use ledger::{apply_result, revert_result, MatchOutcome};
pub use table::{standings_table, top_teams, StandingsRow};

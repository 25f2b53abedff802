//! Team membership and transfer requests
//!
//! A player belongs to at most one team. Joining happens through a
//! player-initiated request that only the team's captain can resolve; the
//! captain can never leave the team they lead.

pub mod manager;
pub mod team;

pub use manager::{RosterManager, RosterStats};
pub use team::{NewTeam, TeamUpdate};

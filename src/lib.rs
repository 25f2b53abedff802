//! Futsal League - roster and match-result consistency engine
//!
//! This crate keeps team standings consistent with recorded match results,
//! derives player ratings from positional attributes, and manages team
//! membership through captain-approved transfer requests. League events are
//! turned into notification intents delivered off the mutation path.

pub mod config;
pub mod error;
pub mod matches;
pub mod metrics;
pub mod notify;
pub mod players;
pub mod rating;
pub mod roster;
pub mod service;
pub mod standings;
pub mod storage;
pub mod types;
pub mod utils;

// Re-export commonly used types and traits
pub use error::{LeagueError, Result};
pub use types::*;

// Re-export key components
pub use matches::{MatchInput, MatchRecorder, PlayerStatsInput};
pub use notify::{NotificationEmitter, NotificationInbox};
pub use players::{PlayerDirectory, PlayerRegistration, ProfileUpdate};
pub use roster::{NewTeam, RosterManager, TeamUpdate};
pub use storage::LeagueStore;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

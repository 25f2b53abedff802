//! League state storage
//!
//! `LeagueState` holds every row of the league; `LeagueStore` guards it with
//! a lock and offers the all-or-nothing transaction boundary every roster and
//! standings mutation runs through.

pub mod state;
pub mod store;

pub use state::LeagueState;
pub use store::LeagueStore;

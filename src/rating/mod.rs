//! Positional overall rating
//!
//! The overall rating of a player is a pure function of position and
//! attributes. It is never stored; [`crate::types::Player::overall`] calls
//! [`compute_overall`] on every read.

pub mod engine;
pub mod seeding;
pub mod weights;

pub use engine::{compute_overall, compute_overall_for_code, DEFAULT_SCORE};
pub use seeding::initialize_attributes;
pub use weights::{weights_for, Weight};

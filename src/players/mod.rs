//! Player profiles
//!
//! Registration seeds archetype attributes exactly once; profile updates are
//! validated as a whole before anything is written.

pub mod directory;
pub mod profile;

pub use directory::PlayerDirectory;
pub use profile::{PlayerRegistration, ProfileUpdate};

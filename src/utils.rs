//! Utility functions for the league engine

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Generate a new unique entity ID
pub fn generate_id() -> Uuid {
    Uuid::new_v4()
}

/// Get the current UTC timestamp
pub fn current_timestamp() -> DateTime<Utc> {
    Utc::now()
}

/// Convert a signed count coming from a caller into a counter value
pub fn non_negative(value: i64, field: &str) -> crate::error::Result<u32> {
    u32::try_from(value).map_err(|_| {
        crate::error::LeagueError::validation(format!(
            "{} must be a non-negative integer, got {}",
            field, value
        ))
    })
}

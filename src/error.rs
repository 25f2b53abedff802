//! Error types for the league engine
//!
//! Core operations return [`LeagueError`] so callers can tell a rejected
//! intent (validation, conflict, permission) from a missing entity. The
//! application edge (config, CLI) wraps everything in `anyhow`.

/// Result type alias for core operations
pub type Result<T> = std::result::Result<T, LeagueError>;

/// Error taxonomy for roster, standings and match operations
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LeagueError {
    /// Malformed input, rejected before any mutation
    #[error("Validation failed: {reason}")]
    Validation { reason: String },

    /// The operation would break a league invariant
    #[error("Conflict: {reason}")]
    Conflict { reason: String },

    /// The acting player or actor lacks the required role
    #[error("Forbidden: {reason}")]
    Forbidden { reason: String },

    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl LeagueError {
    pub fn validation(reason: impl Into<String>) -> Self {
        Self::Validation {
            reason: reason.into(),
        }
    }

    pub fn conflict(reason: impl Into<String>) -> Self {
        Self::Conflict {
            reason: reason.into(),
        }
    }

    pub fn forbidden(reason: impl Into<String>) -> Self {
        Self::Forbidden {
            reason: reason.into(),
        }
    }

    pub fn not_found(entity: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            entity,
            id: id.to_string(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Short machine-readable label, used for metrics and logs
    pub fn kind(&self) -> &'static str {
        match self {
            LeagueError::Validation { .. } => "validation",
            LeagueError::Conflict { .. } => "conflict",
            LeagueError::Forbidden { .. } => "forbidden",
            LeagueError::NotFound { .. } => "not_found",
            LeagueError::Internal { .. } => "internal",
        }
    }

    pub fn is_conflict(&self) -> bool {
        matches!(self, LeagueError::Conflict { .. })
    }

    pub fn is_forbidden(&self) -> bool {
        matches!(self, LeagueError::Forbidden { .. })
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, LeagueError::Validation { .. })
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, LeagueError::NotFound { .. })
    }
}

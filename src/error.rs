//! Error types for the ladder service
//!
//! This module defines all error types using anyhow for consistent error handling
//! throughout the application. Callers that need to branch on the failure kind
//! recover a [`LadderError`] with `downcast_ref`.

use crate::types::MatchSide;

/// Result type alias for convenience
pub type Result<T> = anyhow::Result<T>;

/// Custom error types for specific ladder scenarios
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LadderError {
    #[error("Invalid request: {reason}")]
    Validation { reason: String },

    #[error("Player already exists: {name}")]
    Conflict { name: String },

    #[error("{} not found: {name}", side_label(.side))]
    PlayerNotFound {
        name: String,
        side: Option<MatchSide>,
    },

    #[error("Persistence error: {message}")]
    Persistence { message: String },

    #[error("Match could not be resolved: {reason}")]
    MutationFailed { reason: String },

    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Internal service error: {message}")]
    Internal { message: String },
}

impl LadderError {
    /// Short machine-readable tag for the error kind
    pub fn kind(&self) -> &'static str {
        match self {
            LadderError::Validation { .. } => "validation",
            LadderError::Conflict { .. } => "conflict",
            LadderError::PlayerNotFound { .. } => "player_not_found",
            LadderError::Persistence { .. } => "persistence",
            LadderError::MutationFailed { .. } => "mutation_failed",
            LadderError::Configuration { .. } => "configuration",
            LadderError::Internal { .. } => "internal",
        }
    }

    pub fn validation(reason: impl Into<String>) -> Self {
        LadderError::Validation {
            reason: reason.into(),
        }
    }
}

fn side_label(side: &Option<MatchSide>) -> &'static str {
    side.map(|s| s.as_str()).unwrap_or("player")
}

/// Recover the ladder error kind from an anyhow error, if there is one
pub fn ladder_error(err: &anyhow::Error) -> Option<&LadderError> {
    err.downcast_ref::<LadderError>()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_message_names_side() {
        let err = LadderError::PlayerNotFound {
            name: "bob".to_string(),
            side: Some(MatchSide::Loser),
        };
        assert_eq!(err.to_string(), "loser not found: bob");

        let err = LadderError::PlayerNotFound {
            name: "bob".to_string(),
            side: None,
        };
        assert_eq!(err.to_string(), "player not found: bob");
    }

    #[test]
    fn test_downcast_through_anyhow() {
        let err: anyhow::Error = LadderError::Conflict {
            name: "alice".to_string(),
        }
        .into();

        let recovered = ladder_error(&err).unwrap();
        assert_eq!(recovered.kind(), "conflict");
    }

    #[test]
    fn test_foreign_error_has_no_kind() {
        let err = anyhow::anyhow!("socket closed");
        assert!(ladder_error(&err).is_none());
    }
}

//! Utility functions for the ladder service

use crate::error::LadderError;
use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Longest accepted player name, in characters
pub const MAX_NAME_LENGTH: usize = 64;

/// Generate a new unique request ID for log correlation
pub fn generate_request_id() -> Uuid {
    Uuid::new_v4()
}

/// Get the current UTC timestamp
pub fn current_timestamp() -> DateTime<Utc> {
    Utc::now()
}

/// Check that a player name is usable as a ladder identifier.
///
/// Names are matched exactly, so surrounding whitespace is rejected rather
/// than trimmed.
pub fn validate_player_name(name: &str) -> Result<(), LadderError> {
    if name.is_empty() {
        return Err(LadderError::validation("name must be a non-empty string"));
    }
    if name.trim() != name {
        return Err(LadderError::validation(
            "name must not start or end with whitespace",
        ));
    }
    if name.chars().count() > MAX_NAME_LENGTH {
        return Err(LadderError::validation(format!(
            "name must be at most {} characters",
            MAX_NAME_LENGTH
        )));
    }
    if name.chars().any(char::is_control) {
        return Err(LadderError::validation(
            "name must not contain control characters",
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_unique_ids() {
        let id1 = generate_request_id();
        let id2 = generate_request_id();
        assert_ne!(id1, id2);
    }

    #[test]
    fn test_valid_names() {
        assert!(validate_player_name("alice").is_ok());
        assert!(validate_player_name("Bob Smith").is_ok());
        assert!(validate_player_name("żółw").is_ok());
        assert!(validate_player_name(&"x".repeat(MAX_NAME_LENGTH)).is_ok());
    }

    #[test]
    fn test_invalid_names() {
        assert!(validate_player_name("").is_err());
        assert!(validate_player_name(" alice").is_err());
        assert!(validate_player_name("alice\n").is_err());
        assert!(validate_player_name("al\u{7}ice").is_err());
        assert!(validate_player_name(&"x".repeat(MAX_NAME_LENGTH + 1)).is_err());
    }
}

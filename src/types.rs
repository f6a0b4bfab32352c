//! Common types used throughout the ladder service

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Unique, case-sensitive player identifier
pub type PlayerName = String;

/// Result of a single match from one player's point of view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Win,
    Loss,
}

impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Outcome::Win => write!(f, "win"),
            Outcome::Loss => write!(f, "loss"),
        }
    }
}

/// Which participant of a match a name refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchSide {
    Winner,
    Loser,
}

impl MatchSide {
    pub fn as_str(&self) -> &'static str {
        match self {
            MatchSide::Winner => "winner",
            MatchSide::Loser => "loser",
        }
    }

    /// The outcome recorded for the player on this side
    pub fn outcome(&self) -> Outcome {
        match self {
            MatchSide::Winner => Outcome::Win,
            MatchSide::Loser => Outcome::Loss,
        }
    }
}

/// Immutable snapshot appended to a player's history after every match
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub timestamp: DateTime<Utc>,
    /// Rating after the match was applied
    pub rating: f64,
    pub outcome: Outcome,
}

/// A player on the ladder
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub name: PlayerName,
    pub rating: f64,
    pub wins: u32,
    pub losses: u32,
    /// Chronological, append-only; always `wins + losses` long
    pub history: Vec<HistoryEntry>,
    pub created_at: DateTime<Utc>,
}

impl Player {
    /// Create a fresh player with no matches played
    pub fn new(name: impl Into<PlayerName>, initial_rating: f64) -> Self {
        Self {
            name: name.into(),
            rating: initial_rating,
            wins: 0,
            losses: 0,
            history: Vec::new(),
            created_at: Utc::now(),
        }
    }

    /// Total matches this player took part in
    pub fn matches_played(&self) -> u32 {
        self.wins + self.losses
    }

    /// Apply one resolved match to this record.
    ///
    /// This is the only place a rating changes after creation.
    pub fn apply(&mut self, delta: &PlayerDelta) {
        self.rating += delta.rating_delta;
        match delta.outcome {
            Outcome::Win => self.wins += 1,
            Outcome::Loss => self.losses += 1,
        }
        self.history.push(HistoryEntry {
            timestamp: delta.timestamp,
            rating: self.rating,
            outcome: delta.outcome,
        });
    }

    pub fn summary(&self) -> PlayerSummary {
        PlayerSummary {
            name: self.name.clone(),
            rating: self.rating,
            wins: self.wins,
            losses: self.losses,
        }
    }
}

/// Compact view used when listing the ladder
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerSummary {
    pub name: PlayerName,
    pub rating: f64,
    pub wins: u32,
    pub losses: u32,
}

/// Mutation record for one player produced by a resolved match
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerDelta {
    pub name: PlayerName,
    /// Signed: positive for the winner, negative for the loser
    pub rating_delta: f64,
    pub outcome: Outcome,
    pub timestamp: DateTime<Utc>,
}

/// Request to add a player to the ladder
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewPlayerRequest {
    pub name: String,
}

/// Request to record a head-to-head match
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchRequest {
    pub winner: PlayerName,
    pub loser: PlayerName,
}

impl MatchRequest {
    pub fn new(winner: impl Into<PlayerName>, loser: impl Into<PlayerName>) -> Self {
        Self {
            winner: winner.into(),
            loser: loser.into(),
        }
    }
}

/// Outcome of a resolved match, with both post-update records
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchResult {
    /// Amount added to the winner and subtracted from the loser
    pub delta: f64,
    pub timestamp: DateTime<Utc>,
    pub winner: Player,
    pub loser: Player,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn delta(rating_delta: f64, outcome: Outcome) -> PlayerDelta {
        PlayerDelta {
            name: "alice".to_string(),
            rating_delta,
            outcome,
            timestamp: Utc::now(),
        }
    }

    #[test]
    fn test_new_player_defaults() {
        let player = Player::new("alice", 1000.0);
        assert_eq!(player.rating, 1000.0);
        assert_eq!(player.wins, 0);
        assert_eq!(player.losses, 0);
        assert!(player.history.is_empty());
    }

    #[test]
    fn test_apply_keeps_history_in_step_with_counters() {
        let mut player = Player::new("alice", 1000.0);

        player.apply(&delta(16.0, Outcome::Win));
        player.apply(&delta(-10.0, Outcome::Loss));
        player.apply(&delta(12.5, Outcome::Win));

        assert_eq!(player.wins, 2);
        assert_eq!(player.losses, 1);
        assert_eq!(player.history.len() as u32, player.matches_played());
        assert_eq!(player.rating, 1018.5);

        let ratings: Vec<f64> = player.history.iter().map(|e| e.rating).collect();
        assert_eq!(ratings, vec![1016.0, 1006.0, 1018.5]);
        assert_eq!(player.history[1].outcome, Outcome::Loss);
    }

    #[test]
    fn test_outcome_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Outcome::Win).unwrap(), "\"win\"");
        assert_eq!(serde_json::to_string(&Outcome::Loss).unwrap(), "\"loss\"");
        assert_eq!(MatchSide::Loser.outcome(), Outcome::Loss);
    }
}

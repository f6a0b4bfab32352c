//! Rating engine trait and a test double
//!
//! This module defines the interface the ladder uses to turn two ratings
//! into a match delta. Implementations must be pure: no I/O, no hidden state
//! influencing the result.

/// Trait for computing the rating delta of a decisive head-to-head match
pub trait RatingEngine: Send + Sync {
    /// Amount to add to the winner's rating and subtract from the loser's.
    ///
    /// Strictly positive for finite inputs. Behaviour for non-finite
    /// ratings is unspecified; the store only ever holds finite values.
    fn rating_delta(&self, winner_rating: f64, loser_rating: f64) -> f64;

    /// Probability the winner was expected to win before the match
    fn expected_score(&self, winner_rating: f64, loser_rating: f64) -> f64;

    /// Sensitivity constant bounding a single delta
    fn k_factor(&self) -> f64;

    /// Rating assigned to newly created players
    fn initial_rating(&self) -> f64;

    /// Current configuration as JSON
    fn config(&self) -> serde_json::Value;
}

/// Engine returning the same delta for every match, recording each call
#[derive(Debug)]
pub struct FixedDeltaEngine {
    delta: f64,
    initial_rating: f64,
    calls: std::sync::Mutex<Vec<(f64, f64)>>,
}

impl FixedDeltaEngine {
    pub fn new(delta: f64, initial_rating: f64) -> Self {
        Self {
            delta,
            initial_rating,
            calls: std::sync::Mutex::new(Vec::new()),
        }
    }

    /// Get all (winner, loser) rating pairs seen so far (for testing)
    pub fn get_calls(&self) -> Vec<(f64, f64)> {
        self.calls
            .lock()
            .map(|calls| calls.clone())
            .unwrap_or_default()
    }
}

impl RatingEngine for FixedDeltaEngine {
    fn rating_delta(&self, winner_rating: f64, loser_rating: f64) -> f64 {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push((winner_rating, loser_rating));
        }
        self.delta
    }

    fn expected_score(&self, _winner_rating: f64, _loser_rating: f64) -> f64 {
        0.5
    }

    fn k_factor(&self) -> f64 {
        self.delta * 2.0
    }

    fn initial_rating(&self) -> f64 {
        self.initial_rating
    }

    fn config(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "fixed",
            "delta": self.delta,
            "initial_rating": self.initial_rating
        })
    }
}

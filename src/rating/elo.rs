//! Elo rating engine
//!
//! Concrete [`RatingEngine`] using the classic expected-score model from the
//! skillratings crate: `delta = K * (1 - E)` where
//! `E = 1 / (1 + 10^((loser - winner) / 400))`.

use crate::error::LadderError;
use crate::rating::calculator::RatingEngine;
use serde::{Deserialize, Serialize};
use skillratings::elo::{EloConfig, EloRating};

/// Starting rating for new ladder players
pub const DEFAULT_INITIAL_RATING: f64 = 1000.0;

/// Extended configuration for the Elo engine.
/// This wraps the skillratings EloConfig with the ladder's starting rating.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtendedEloConfig {
    /// Core Elo parameters (the K-factor)
    pub elo_config: EloConfig,
    /// Initial rating for new players
    pub initial_rating: f64,
}

impl Default for ExtendedEloConfig {
    fn default() -> Self {
        Self {
            // Conventional K = 32
            elo_config: EloConfig::new(),
            initial_rating: DEFAULT_INITIAL_RATING,
        }
    }
}

impl ExtendedEloConfig {
    pub fn with_k_factor(k: f64) -> Self {
        Self {
            elo_config: EloConfig { k },
            ..Self::default()
        }
    }

    /// Slower-moving ratings, for established ladders
    pub fn conservative() -> Self {
        Self::with_k_factor(16.0)
    }

    /// Faster-moving ratings, for new ladders
    pub fn aggressive() -> Self {
        Self::with_k_factor(40.0)
    }

    /// Validate configuration parameters
    pub fn validate(&self) -> crate::error::Result<()> {
        let k = self.elo_config.k;
        if !k.is_finite() || k <= 0.0 {
            return Err(LadderError::Configuration {
                message: format!("K-factor must be a positive finite number, got {}", k),
            }
            .into());
        }

        if !self.initial_rating.is_finite() {
            return Err(LadderError::Configuration {
                message: "Initial rating must be finite".to_string(),
            }
            .into());
        }

        Ok(())
    }
}

/// Elo rating engine
#[derive(Debug, Clone)]
pub struct EloEngine {
    config: ExtendedEloConfig,
}

impl EloEngine {
    /// Create a new Elo engine
    pub fn new(config: ExtendedEloConfig) -> crate::error::Result<Self> {
        config.validate()?;

        Ok(Self { config })
    }

    /// New ratings for (winner, loser) after the match
    pub fn resolve(&self, winner_rating: f64, loser_rating: f64) -> (f64, f64) {
        let delta = self.rating_delta(winner_rating, loser_rating);
        (winner_rating + delta, loser_rating - delta)
    }
}

impl Default for EloEngine {
    fn default() -> Self {
        Self {
            config: ExtendedEloConfig::default(),
        }
    }
}

impl RatingEngine for EloEngine {
    fn rating_delta(&self, winner_rating: f64, loser_rating: f64) -> f64 {
        let expected = self.expected_score(winner_rating, loser_rating);
        self.config.elo_config.k * (1.0 - expected)
    }

    fn expected_score(&self, winner_rating: f64, loser_rating: f64) -> f64 {
        let (expected_winner, _expected_loser) = skillratings::elo::expected_score(
            &EloRating {
                rating: winner_rating,
            },
            &EloRating {
                rating: loser_rating,
            },
        );
        expected_winner
    }

    fn k_factor(&self) -> f64 {
        self.config.elo_config.k
    }

    fn initial_rating(&self) -> f64 {
        self.config.initial_rating
    }

    fn config(&self) -> serde_json::Value {
        serde_json::to_value(&self.config).unwrap_or(serde_json::Value::Null)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_extended_elo_config_default() {
        let config = ExtendedEloConfig::default();
        assert_eq!(config.elo_config.k, 32.0);
        assert_eq!(config.initial_rating, 1000.0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_extended_elo_config_validation() {
        assert!(ExtendedEloConfig::with_k_factor(0.0).validate().is_err());
        assert!(ExtendedEloConfig::with_k_factor(-8.0).validate().is_err());
        assert!(ExtendedEloConfig::with_k_factor(f64::NAN).validate().is_err());

        let mut config = ExtendedEloConfig::default();
        config.initial_rating = f64::INFINITY;
        assert!(config.validate().is_err());

        assert!(EloEngine::new(ExtendedEloConfig::with_k_factor(0.0)).is_err());
    }

    #[test]
    fn test_config_presets() {
        let conservative = ExtendedEloConfig::conservative();
        let aggressive = ExtendedEloConfig::aggressive();
        let default = ExtendedEloConfig::default();

        assert!(conservative.elo_config.k < default.elo_config.k);
        assert!(aggressive.elo_config.k > default.elo_config.k);
        assert!(conservative.validate().is_ok());
        assert!(aggressive.validate().is_ok());
    }

    #[test]
    fn test_equal_ratings_give_half_k() {
        let engine = EloEngine::default();
        assert_eq!(engine.rating_delta(1000.0, 1000.0), 16.0);
        assert_eq!(engine.expected_score(1500.0, 1500.0), 0.5);
    }

    #[test]
    fn test_known_values() {
        let engine = EloEngine::default();

        // 400 points apart: expected score 10/11
        let favourite = engine.rating_delta(1400.0, 1000.0);
        assert!((favourite - 32.0 / 11.0).abs() < 1e-9);

        let upset = engine.rating_delta(1000.0, 1400.0);
        assert!((upset - 320.0 / 11.0).abs() < 1e-9);
    }

    #[test]
    fn test_resolve_is_symmetric() {
        let engine = EloEngine::default();
        let (winner, loser) = engine.resolve(1000.0, 1000.0);
        assert_eq!(winner, 1016.0);
        assert_eq!(loser, 984.0);
    }

    #[test]
    fn test_reverse_match_does_not_restore_ratings() {
        // Elo is not self-inverse: after alice beats bob, bob beating alice
        // from the new ratings is worth more than alice's gain, so bob ends
        // slightly ahead of where both started.
        let engine = EloEngine::default();

        let (alice, bob) = engine.resolve(1000.0, 1000.0);
        let (bob, alice) = engine.resolve(bob, alice);

        assert_ne!(alice, 1000.0);
        assert_ne!(bob, 1000.0);
        assert!(bob > 1000.0);
        assert!(alice < 1000.0);
        assert!((alice + bob - 2000.0).abs() < 1e-9);
    }

    #[test]
    fn test_config_as_json() {
        let engine = EloEngine::new(ExtendedEloConfig::aggressive()).unwrap();
        let config = engine.config();
        assert_eq!(config["elo_config"]["k"], 40.0);
        assert_eq!(config["initial_rating"], 1000.0);
    }

    proptest! {
        #[test]
        fn prop_delta_bounded_by_k(winner in 0.0f64..4000.0, loser in 0.0f64..4000.0) {
            let engine = EloEngine::default();
            let delta = engine.rating_delta(winner, loser);
            prop_assert!(delta > 0.0);
            prop_assert!(delta < engine.k_factor());
        }

        #[test]
        fn prop_stronger_winner_gains_less(winner in 0.0f64..4000.0, gap in 1.0f64..1000.0) {
            let engine = EloEngine::default();
            let half_k = engine.k_factor() / 2.0;
            prop_assert!(engine.rating_delta(winner + gap, winner) < half_k);
            prop_assert!(engine.rating_delta(winner, winner + gap) > half_k);
        }

        #[test]
        fn prop_equal_ratings_half_k(rating in -1000.0f64..5000.0) {
            let engine = EloEngine::default();
            prop_assert_eq!(engine.rating_delta(rating, rating), 16.0);
        }

        #[test]
        fn prop_delta_monotonic_in_gap(base in 0.0f64..3000.0, a in 0.0f64..500.0, b in 0.0f64..500.0) {
            prop_assume!((a - b).abs() > 1e-3);
            let engine = EloEngine::default();
            let (small, large) = if a < b { (a, b) } else { (b, a) };
            // larger upset gap, larger delta
            prop_assert!(engine.rating_delta(base, base + large) > engine.rating_delta(base, base + small));
        }
    }
}

//! Rating system configuration

use crate::rating::elo::{ExtendedEloConfig, DEFAULT_INITIAL_RATING};
use serde::{Deserialize, Serialize};
use skillratings::elo::EloConfig;

/// Rating settings as loaded from the environment or a config file
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RatingConfig {
    /// Rating given to every new player
    pub initial_rating: f64,
    /// Elo sensitivity constant
    pub k_factor: f64,
}

impl Default for RatingConfig {
    fn default() -> Self {
        Self {
            initial_rating: DEFAULT_INITIAL_RATING,
            k_factor: EloConfig::new().k,
        }
    }
}

impl RatingConfig {
    /// Engine configuration for these settings
    pub fn to_elo_config(&self) -> ExtendedEloConfig {
        ExtendedEloConfig {
            elo_config: EloConfig { k: self.k_factor },
            initial_rating: self.initial_rating,
        }
    }
}

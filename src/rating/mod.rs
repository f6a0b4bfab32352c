//! Rating system using the Elo expected-score model
//!
//! This module provides the rating engine, the storage interface for ladder
//! players, and integration with the skillratings crate.

pub mod calculator;
pub mod elo;
pub mod storage;

// Re-export commonly used types
pub use calculator::{FixedDeltaEngine, RatingEngine};
pub use elo::{EloEngine, ExtendedEloConfig};
pub use storage::{InMemoryPlayerStore, MockPlayerStore, PlayerStore};

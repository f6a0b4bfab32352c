//! Foosball Ladder - Elo rating service for head-to-head matches
//!
//! This crate keeps a ladder of named players, resolves decisive matches
//! with the Elo rating system, and serves the ladder over HTTP.

pub mod api;
pub mod config;
pub mod error;
pub mod ladder;
pub mod metrics;
pub mod rating;
pub mod service;
pub mod types;
pub mod utils;

// Re-export commonly used types and traits
pub use error::{LadderError, Result};
pub use types::*;

// Re-export key components
pub use ladder::LadderService;
pub use rating::{EloEngine, InMemoryPlayerStore, PlayerStore, RatingEngine};
pub use service::AppState;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

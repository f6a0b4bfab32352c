//! Ladder management: player registration and the match update protocol
//!
//! This module owns every rating mutation. Matches are serialized per
//! player and applied to the store as a single batch.

pub mod locks;
pub mod service;

pub use locks::PlayerLocks;
pub use service::{validate_match_request, LadderService, LadderStats};

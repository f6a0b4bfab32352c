//! Ladder route table

use crate::api::handlers::{create_player, get_player, list_players, resolve_match};
use crate::service::app::AppState;
use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

/// Router for the player and match endpoints
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(list_players))
        .route("/players", get(list_players).post(create_player))
        .route("/players/{name}", get(get_player))
        .route("/game", post(resolve_match))
        .with_state(state)
}

//! Test fixtures and mock implementations for integration testing

#![allow(dead_code)]

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use foosball_ladder::config::AppConfig;
use foosball_ladder::error::Result;
use foosball_ladder::ladder::LadderService;
use foosball_ladder::rating::{EloEngine, InMemoryPlayerStore, MockPlayerStore, PlayerStore};
use foosball_ladder::service::AppState;
use foosball_ladder::types::{NewPlayerRequest, Player, PlayerDelta, PlayerName};
use mockall::mock;
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceExt;

// Fully scriptable player store for failure-path tests
mock! {
    pub Store {}

    #[async_trait]
    impl PlayerStore for Store {
        async fn find_player_by_name(&self, name: &str) -> Result<Option<Player>>;
        async fn find_players_by_names(&self, names: &[PlayerName]) -> Result<Vec<Player>>;
        async fn insert_player(&self, name: &str, initial_rating: f64) -> Result<Player>;
        async fn apply_player_delta(&self, delta: &PlayerDelta) -> Result<Player>;
        async fn apply_deltas(&self, deltas: &[PlayerDelta]) -> Result<Vec<Player>>;
        async fn list_players(&self) -> Result<Vec<Player>>;
        async fn player_count(&self) -> Result<usize>;
    }
}

/// Ladder over a fresh in-memory store with the default Elo engine
pub fn create_test_ladder() -> (LadderService, Arc<InMemoryPlayerStore>) {
    let store = Arc::new(InMemoryPlayerStore::default());
    let ladder = LadderService::new(store.clone(), Arc::new(EloEngine::default()));
    (ladder, store)
}

/// Ladder over a mock store that can be told to fail writes
pub async fn create_mock_ladder(players: Vec<(&str, f64)>) -> (LadderService, Arc<MockPlayerStore>) {
    let store = Arc::new(MockPlayerStore::new());
    store.preset_players(players).await.unwrap();
    let ladder = LadderService::new(store.clone(), Arc::new(EloEngine::default()));
    (ladder, store)
}

/// Register every name on the ladder
pub async fn register_players(ladder: &LadderService, names: &[&str]) {
    for name in names {
        ladder
            .create_player(NewPlayerRequest {
                name: name.to_string(),
            })
            .await
            .unwrap();
    }
}

/// Application state and its full router, not bound to a port
pub async fn create_test_app() -> (Arc<AppState>, Router) {
    let state = Arc::new(AppState::new(AppConfig::default()).await.unwrap());
    let router = state.router();
    (state, router)
}

/// Send one request through the router and decode the JSON body
pub async fn send_json(
    router: &Router,
    method: &str,
    uri: &str,
    body: Option<&str>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(body) => {
            builder = builder.header("content-type", "application/json");
            Body::from(body.to_string())
        }
        None => Body::empty(),
    };

    let response = router
        .clone()
        .oneshot(builder.body(body).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}

/// Approximate float comparison for rating assertions
pub fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected {expected}, got {actual}"
    );
}

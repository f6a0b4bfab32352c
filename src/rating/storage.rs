//! Player storage interface and implementations
//!
//! This module defines the interface for persisting and retrieving ladder
//! players, with an in-memory implementation used by the service and a mock
//! that can be told to fail writes.

use crate::error::LadderError;
use crate::types::{Player, PlayerDelta, PlayerName};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::RwLock;

/// Trait for player storage operations
#[async_trait]
pub trait PlayerStore: Send + Sync {
    /// Get a player by exact name
    async fn find_player_by_name(&self, name: &str) -> crate::error::Result<Option<Player>>;

    /// Get every player whose name is in `names`; missing names are skipped
    async fn find_players_by_names(&self, names: &[PlayerName])
        -> crate::error::Result<Vec<Player>>;

    /// Create a player, failing with `Conflict` if the name is taken
    async fn insert_player(&self, name: &str, initial_rating: f64) -> crate::error::Result<Player>;

    /// Apply one match result to one player
    async fn apply_player_delta(&self, delta: &PlayerDelta) -> crate::error::Result<Player>;

    /// Apply several deltas as one unit: either all land or none do
    async fn apply_deltas(&self, deltas: &[PlayerDelta]) -> crate::error::Result<Vec<Player>>;

    /// All players, highest rating first
    async fn list_players(&self) -> crate::error::Result<Vec<Player>>;

    /// Get total number of players
    async fn player_count(&self) -> crate::error::Result<usize>;
}

/// Sort by rating descending, then by name so equal ratings list stably
pub fn sort_by_rating(players: &mut [Player]) {
    players.sort_by(|a, b| {
        b.rating
            .partial_cmp(&a.rating)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.name.cmp(&b.name))
    });
}

fn read_lock_error() -> LadderError {
    LadderError::Persistence {
        message: "Failed to acquire players read lock".to_string(),
    }
}

fn write_lock_error() -> LadderError {
    LadderError::Persistence {
        message: "Failed to acquire players write lock".to_string(),
    }
}

/// Apply `deltas` to `players` only if every target exists
fn apply_all(
    players: &mut HashMap<PlayerName, Player>,
    deltas: &[PlayerDelta],
) -> crate::error::Result<Vec<Player>> {
    if let Some(missing) = deltas.iter().find(|d| !players.contains_key(&d.name)) {
        return Err(LadderError::PlayerNotFound {
            name: missing.name.clone(),
            side: None,
        }
        .into());
    }

    let mut updated = Vec::with_capacity(deltas.len());
    for delta in deltas {
        if let Some(player) = players.get_mut(&delta.name) {
            player.apply(delta);
            updated.push(player.clone());
        }
    }
    Ok(updated)
}

/// In-memory player storage implementation
#[derive(Debug)]
pub struct InMemoryPlayerStore {
    players: RwLock<HashMap<PlayerName, Player>>,
    max_players: usize,
}

impl InMemoryPlayerStore {
    /// Create a new in-memory player store
    pub fn new(max_players: usize) -> Self {
        Self {
            players: RwLock::new(HashMap::new()),
            max_players,
        }
    }
}

impl Default for InMemoryPlayerStore {
    fn default() -> Self {
        Self::new(10000) // Default to 10,000 max players
    }
}

#[async_trait]
impl PlayerStore for InMemoryPlayerStore {
    async fn find_player_by_name(&self, name: &str) -> crate::error::Result<Option<Player>> {
        let players = self.players.read().map_err(|_| read_lock_error())?;
        Ok(players.get(name).cloned())
    }

    async fn find_players_by_names(
        &self,
        names: &[PlayerName],
    ) -> crate::error::Result<Vec<Player>> {
        let players = self.players.read().map_err(|_| read_lock_error())?;
        Ok(names
            .iter()
            .filter_map(|name| players.get(name).cloned())
            .collect())
    }

    async fn insert_player(&self, name: &str, initial_rating: f64) -> crate::error::Result<Player> {
        let mut players = self.players.write().map_err(|_| write_lock_error())?;

        if players.contains_key(name) {
            return Err(LadderError::Conflict {
                name: name.to_string(),
            }
            .into());
        }
        if players.len() >= self.max_players {
            return Err(LadderError::Persistence {
                message: format!("Player capacity of {} reached", self.max_players),
            }
            .into());
        }

        let player = Player::new(name, initial_rating);
        players.insert(player.name.clone(), player.clone());
        Ok(player)
    }

    async fn apply_player_delta(&self, delta: &PlayerDelta) -> crate::error::Result<Player> {
        let mut players = self.players.write().map_err(|_| write_lock_error())?;
        let mut updated = apply_all(&mut players, std::slice::from_ref(delta))?;
        updated.pop().ok_or_else(|| {
            LadderError::Internal {
                message: "Delta applied but no player returned".to_string(),
            }
            .into()
        })
    }

    async fn apply_deltas(&self, deltas: &[PlayerDelta]) -> crate::error::Result<Vec<Player>> {
        // One write lock for the whole batch keeps it all-or-nothing
        let mut players = self.players.write().map_err(|_| write_lock_error())?;
        apply_all(&mut players, deltas)
    }

    async fn list_players(&self) -> crate::error::Result<Vec<Player>> {
        let players = self.players.read().map_err(|_| read_lock_error())?;
        let mut all: Vec<Player> = players.values().cloned().collect();
        sort_by_rating(&mut all);
        Ok(all)
    }

    async fn player_count(&self) -> crate::error::Result<usize> {
        let players = self.players.read().map_err(|_| read_lock_error())?;
        Ok(players.len())
    }
}

/// Mock player storage for testing
#[derive(Debug, Default)]
pub struct MockPlayerStore {
    inner: InMemoryPlayerStore,
    applied_deltas: RwLock<Vec<PlayerDelta>>,
    fail_writes: std::sync::atomic::AtomicBool,
}

impl MockPlayerStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent delta write fail with a persistence error
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes
            .store(fail, std::sync::atomic::Ordering::SeqCst);
    }

    /// Get all deltas successfully applied (for testing)
    pub fn get_applied_deltas(&self) -> Vec<PlayerDelta> {
        self.applied_deltas
            .read()
            .map(|deltas| deltas.clone())
            .unwrap_or_default()
    }

    /// Preset players for testing
    pub async fn preset_players(&self, players: Vec<(&str, f64)>) -> crate::error::Result<()> {
        for (name, rating) in players {
            self.inner.insert_player(name, rating).await?;
        }
        Ok(())
    }

    fn check_writable(&self) -> crate::error::Result<()> {
        if self.fail_writes.load(std::sync::atomic::Ordering::SeqCst) {
            return Err(LadderError::Persistence {
                message: "Simulated write failure".to_string(),
            }
            .into());
        }
        Ok(())
    }

    fn record(&self, deltas: &[PlayerDelta]) {
        if let Ok(mut applied) = self.applied_deltas.write() {
            applied.extend_from_slice(deltas);
        }
    }
}

#[async_trait]
impl PlayerStore for MockPlayerStore {
    async fn find_player_by_name(&self, name: &str) -> crate::error::Result<Option<Player>> {
        self.inner.find_player_by_name(name).await
    }

    async fn find_players_by_names(
        &self,
        names: &[PlayerName],
    ) -> crate::error::Result<Vec<Player>> {
        self.inner.find_players_by_names(names).await
    }

    async fn insert_player(&self, name: &str, initial_rating: f64) -> crate::error::Result<Player> {
        self.inner.insert_player(name, initial_rating).await
    }

    async fn apply_player_delta(&self, delta: &PlayerDelta) -> crate::error::Result<Player> {
        self.check_writable()?;
        let player = self.inner.apply_player_delta(delta).await?;
        self.record(std::slice::from_ref(delta));
        Ok(player)
    }

    async fn apply_deltas(&self, deltas: &[PlayerDelta]) -> crate::error::Result<Vec<Player>> {
        self.check_writable()?;
        let players = self.inner.apply_deltas(deltas).await?;
        self.record(deltas);
        Ok(players)
    }

    async fn list_players(&self) -> crate::error::Result<Vec<Player>> {
        self.inner.list_players().await
    }

    async fn player_count(&self) -> crate::error::Result<usize> {
        self.inner.player_count().await
    }
}

//! Ladder service: player registration and match resolution
//!
//! The `LadderService` is the only writer of player ratings. It validates
//! requests, serializes matches per player, asks the rating engine for the
//! delta and hands both mutations to the store as one batch.

use crate::error::{ladder_error, LadderError, Result};
use crate::ladder::locks::PlayerLocks;
use crate::metrics::{MetricsCollector, MetricsTimer};
use crate::rating::{PlayerStore, RatingEngine};
use crate::types::{
    MatchRequest, MatchResult, MatchSide, NewPlayerRequest, Player, PlayerDelta, PlayerName,
    PlayerSummary,
};
use crate::utils::{current_timestamp, generate_request_id, validate_player_name};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// Statistics for monitoring the ladder
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
pub struct LadderStats {
    pub players: usize,
    pub players_created: u64,
    pub matches_resolved: u64,
    pub matches_rejected: u64,
    pub matches_failed: u64,
}

/// Coordinates the player store and rating engine
pub struct LadderService {
    store: Arc<dyn PlayerStore>,
    engine: Arc<dyn RatingEngine>,
    locks: PlayerLocks,
    metrics: Option<Arc<MetricsCollector>>,
    stats: std::sync::Mutex<LadderStats>,
}

impl LadderService {
    /// Create a new ladder service
    pub fn new(store: Arc<dyn PlayerStore>, engine: Arc<dyn RatingEngine>) -> Self {
        Self {
            store,
            engine,
            locks: PlayerLocks::new(),
            metrics: None,
            stats: std::sync::Mutex::new(LadderStats::default()),
        }
    }

    /// Create a new ladder service that reports to a metrics collector
    pub fn with_metrics(
        store: Arc<dyn PlayerStore>,
        engine: Arc<dyn RatingEngine>,
        metrics: Arc<MetricsCollector>,
    ) -> Self {
        Self {
            metrics: Some(metrics),
            ..Self::new(store, engine)
        }
    }

    pub fn engine(&self) -> Arc<dyn RatingEngine> {
        self.engine.clone()
    }

    /// All players with summary fields, highest rating first
    pub async fn list_players(&self) -> Result<Vec<PlayerSummary>> {
        let players = self.store.list_players().await?;
        debug!("Listing {} players", players.len());
        Ok(players.iter().map(Player::summary).collect())
    }

    /// Full record for one player, matched exactly by name
    pub async fn get_player(&self, name: &str) -> Result<Player> {
        self.store
            .find_player_by_name(name)
            .await?
            .ok_or_else(|| {
                LadderError::PlayerNotFound {
                    name: name.to_string(),
                    side: None,
                }
                .into()
            })
    }

    /// Register a new player at the engine's initial rating
    pub async fn create_player(&self, request: NewPlayerRequest) -> Result<Player> {
        validate_player_name(&request.name)?;

        let player = match self
            .store
            .insert_player(&request.name, self.engine.initial_rating())
            .await
        {
            Ok(player) => player,
            Err(e) => {
                warn!("Failed to create player '{}': {}", request.name, e);
                return Err(e);
            }
        };

        info!(
            "Player '{}' created with rating {}",
            player.name, player.rating
        );
        self.update_stats(|stats| {
            stats.players_created += 1;
            stats.players += 1;
        });
        if let Some(metrics) = &self.metrics {
            metrics.record_player_created();
        }

        Ok(player)
    }

    /// Record a decisive match and move both ratings by the engine's delta.
    ///
    /// Fails without side effects on validation or unknown names. A store
    /// failure while writing is reported as `MutationFailed`; the store's
    /// batch write guarantees neither player was changed in that case.
    pub async fn resolve_match(&self, request: MatchRequest) -> Result<MatchResult> {
        let request_id = generate_request_id();
        let timer = MetricsTimer::new();

        debug!(
            "[{}] Resolving match - winner: '{}', loser: '{}'",
            request_id, request.winner, request.loser
        );

        let result = self.resolve_match_inner(&request).await;

        match &result {
            Ok(resolved) => {
                let elapsed = timer.stop();
                info!(
                    "[{}] Match resolved - '{}' ({:.1}) beat '{}' ({:.1}), delta {:.2}, time: {:.2}ms",
                    request_id,
                    resolved.winner.name,
                    resolved.winner.rating,
                    resolved.loser.name,
                    resolved.loser.rating,
                    resolved.delta,
                    elapsed.as_secs_f64() * 1000.0
                );
                self.update_stats(|stats| stats.matches_resolved += 1);
                if let Some(metrics) = &self.metrics {
                    metrics.record_match_resolved(
                        resolved.delta,
                        resolved.winner.rating,
                        resolved.loser.rating,
                        elapsed,
                    );
                }
            }
            Err(e) => {
                let kind = ladder_error(e).map(LadderError::kind).unwrap_or("internal");
                if kind == "mutation_failed" || kind == "internal" {
                    error!("[{}] Match resolution failed: {}", request_id, e);
                    self.update_stats(|stats| stats.matches_failed += 1);
                } else {
                    warn!("[{}] Match rejected: {}", request_id, e);
                    self.update_stats(|stats| stats.matches_rejected += 1);
                }
                if let Some(metrics) = &self.metrics {
                    metrics.record_match_failed(kind);
                }
            }
        }

        result
    }

    async fn resolve_match_inner(&self, request: &MatchRequest) -> Result<MatchResult> {
        validate_match_request(request)?;

        let names = [request.winner.clone(), request.loser.clone()];

        // Existence check before locking keeps unknown names out of the lock table
        let (winner, loser) = self.load_pair(&names).await?;
        debug!(
            "Pre-lock ratings - '{}': {:.1}, '{}': {:.1}",
            winner.name, winner.rating, loser.name, loser.rating
        );

        let _guard = self
            .locks
            .lock_all(&[request.winner.as_str(), request.loser.as_str()])
            .await;

        // Re-read under the lock: another match may have moved either rating
        let (winner, loser) = self.load_pair(&names).await?;

        let delta = self.engine.rating_delta(winner.rating, loser.rating);
        let timestamp = current_timestamp();

        let deltas = [
            PlayerDelta {
                name: winner.name.clone(),
                rating_delta: delta,
                outcome: MatchSide::Winner.outcome(),
                timestamp,
            },
            PlayerDelta {
                name: loser.name.clone(),
                rating_delta: -delta,
                outcome: MatchSide::Loser.outcome(),
                timestamp,
            },
        ];

        let updated = self.store.apply_deltas(&deltas).await.map_err(|e| {
            LadderError::MutationFailed {
                reason: e.to_string(),
            }
        })?;

        let [winner, loser]: [Player; 2] =
            updated
                .try_into()
                .map_err(|players: Vec<Player>| LadderError::MutationFailed {
                    reason: format!("store returned {} players, expected 2", players.len()),
                })?;

        Ok(MatchResult {
            delta,
            timestamp,
            winner,
            loser,
        })
    }

    /// Resolve `[winner, loser]` names to records, naming the missing side
    async fn load_pair(&self, names: &[PlayerName; 2]) -> Result<(Player, Player)> {
        let mut players = self.store.find_players_by_names(names).await?;

        let take = |players: &mut Vec<Player>, name: &str, side: MatchSide| {
            players
                .iter()
                .position(|p| p.name == name)
                .map(|i| players.swap_remove(i))
                .ok_or_else(|| LadderError::PlayerNotFound {
                    name: name.to_string(),
                    side: Some(side),
                })
        };

        let winner = take(&mut players, &names[0], MatchSide::Winner)?;
        let loser = take(&mut players, &names[1], MatchSide::Loser)?;
        Ok((winner, loser))
    }

    /// Current ladder statistics
    pub async fn get_stats(&self) -> Result<LadderStats> {
        let players = self.store.player_count().await?;
        let mut stats = self
            .stats
            .lock()
            .map_err(|_| LadderError::Internal {
                message: "Failed to acquire stats lock".to_string(),
            })?
            .clone();
        stats.players = players;
        Ok(stats)
    }

    fn update_stats(&self, update: impl FnOnce(&mut LadderStats)) {
        if let Ok(mut stats) = self.stats.lock() {
            update(&mut stats);
        }
    }
}

/// Shape checks that need no store access
pub fn validate_match_request(request: &MatchRequest) -> std::result::Result<(), LadderError> {
    if request.winner.is_empty() {
        return Err(LadderError::validation("winner must be a non-empty string"));
    }
    if request.loser.is_empty() {
        return Err(LadderError::validation("loser must be a non-empty string"));
    }
    if request.winner == request.loser {
        return Err(LadderError::validation(
            "winner and loser must be different players",
        ));
    }
    Ok(())
}

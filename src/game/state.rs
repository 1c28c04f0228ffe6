//! Game State
//!
//! The orchestrator context: the loaded level, its index, the tick counter
//! and the play phase. Passed by reference through the tick function; there
//! is no global game state.

use serde::{Serialize, Deserialize};
use tracing::{info, warn};

use crate::config::GameConfig;
use crate::core::hash::{StateHash, compute_state_hash};
use crate::game::level::{Level, LevelError, LevelSource};
use crate::game::render::Hud;

/// Current phase of play.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[derive(Default)]
pub enum GamePhase {
    /// Simulation running
    #[default]
    Playing,
    /// Player died; ticks are no-ops
    GameOver,
}

/// Complete state of a play-through of one level.
#[derive(Clone, Debug)]
pub struct GameState {
    /// Index of the loaded level
    pub level_index: usize,

    /// The loaded level
    pub level: Level,

    /// Ticks simulated since load (first tick is 1)
    pub tick: u32,

    /// Current phase
    pub phase: GamePhase,
}

impl GameState {
    /// Load level `index` from `source`.
    ///
    /// Fails without building anything if the index is out of range or the
    /// source cannot produce the level.
    pub fn load(
        source: &dyn LevelSource,
        index: usize,
        config: &GameConfig,
    ) -> Result<Self, LevelError> {
        let count = source.level_count();
        if index >= count {
            let err = LevelError::IndexOutOfRange { index, count };
            warn!(%err, "Level load rejected");
            return Err(err);
        }

        let data = source.load(index).inspect_err(|err| {
            warn!(index, %err, "Level source failed");
        })?;
        let level = data.build(config).inspect_err(|err| {
            warn!(index, %err, "Level data invalid");
        })?;
        level.log_loaded(index, &data.name);

        Ok(Self {
            level_index: index,
            level,
            tick: 0,
            phase: GamePhase::Playing,
        })
    }

    /// Reload the current level from scratch.
    pub fn restart(&mut self, source: &dyn LevelSource, config: &GameConfig) -> Result<(), LevelError> {
        self.load_level(source, self.level_index, config)
    }

    /// Replace the current level. On error the current level stays installed.
    pub fn load_level(
        &mut self,
        source: &dyn LevelSource,
        index: usize,
        config: &GameConfig,
    ) -> Result<(), LevelError> {
        *self = Self::load(source, index, config)?;
        info!(level = index, "Level installed");
        Ok(())
    }

    /// Has the player died?
    #[inline]
    pub fn is_over(&self) -> bool {
        self.phase == GamePhase::GameOver
    }

    /// HUD snapshot.
    pub fn hud(&self) -> Hud {
        self.level.hud(self.level_index)
    }

    /// Compute hash of current state for replay verification.
    pub fn compute_hash(&self) -> StateHash {
        compute_state_hash(self.tick, self.level_index, |hasher| {
            hasher.update_usize(self.level.active_map_index());
            hasher.update_u32(self.level.gold());
            hasher.update_bool(self.is_over());

            let player = self.level.player();
            for tile in player.body() {
                hasher.update_position(tile.position());
                hasher.update_char(tile.symbol());
                hasher.update_bool(tile.is_collidable());
            }
            if let Some(stats) = player.stats() {
                stats.hash_into(hasher);
            }

            // Remaining option tiles capture one-shot trigger consumption
            for map_index in 0..self.level.map_count() {
                if let Some(map) = self.level.map_at(map_index) {
                    for option in map.option_tiles() {
                        hasher.update_position(option.position);
                        hasher.update_usize(option.triggers.len());
                    }
                }
            }
        })
    }
}

// =============================================================================
// TESTS
// =============================================================================

//! State Hashing for Replay Verification
//!
//! Deterministic SHA-256 hashing of simulation state. Two runs fed the same
//! level and the same recorded inputs must produce the same hash.

use sha2::{Sha256, Digest};
use super::position::Position;

/// Hash output type (256 bits / 32 bytes)
pub type StateHash = [u8; 32];

/// Deterministic hasher for game state.
///
/// Wraps SHA-256 with helpers for grid types.
/// Order of updates is critical for determinism.
pub struct StateHasher {
    hasher: Sha256,
}

impl StateHasher {
    /// Create a new hasher with domain separator.
    pub fn new(domain: &[u8]) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(domain);
        Self { hasher }
    }

    /// Create hasher for game state.
    pub fn for_game_state() -> Self {
        Self::new(b"TILE_PLATFORMER_STATE_V1")
    }

    /// Update with a u8 value.
    #[inline]
    pub fn update_u8(&mut self, value: u8) {
        self.hasher.update([value]);
    }

    /// Update with a u32 value (little-endian).
    #[inline]
    pub fn update_u32(&mut self, value: u32) {
        self.hasher.update(value.to_le_bytes());
    }

    /// Update with an i32 value (little-endian).
    #[inline]
    pub fn update_i32(&mut self, value: i32) {
        self.hasher.update(value.to_le_bytes());
    }

    /// Update with a usize, widened to u64 so the hash is platform independent.
    #[inline]
    pub fn update_usize(&mut self, value: usize) {
        self.hasher.update((value as u64).to_le_bytes());
    }

    /// Update with a Position.
    #[inline]
    pub fn update_position(&mut self, value: Position) {
        self.update_i32(value.x);
        self.update_i32(value.y);
    }

    /// Update with a tile symbol.
    #[inline]
    pub fn update_char(&mut self, value: char) {
        self.update_u32(value as u32);
    }

    /// Update with a boolean.
    #[inline]
    pub fn update_bool(&mut self, value: bool) {
        self.update_u8(value as u8);
    }

    /// Finalize and return the hash.
    pub fn finalize(self) -> StateHash {
        self.hasher.finalize().into()
    }
}

/// Compute state hash for replay verification.
///
/// Called by `GameState::compute_hash()`. The closure adds state-specific data.
pub fn compute_state_hash<F>(tick: u32, level_index: usize, add_state: F) -> StateHash
where
    F: FnOnce(&mut StateHasher),
{
    let mut hasher = StateHasher::for_game_state();

    hasher.update_u32(tick);
    hasher.update_usize(level_index);

    add_state(&mut hasher);

    hasher.finalize()
}

// =============================================================================
// TESTS
// =============================================================================

//! Player Stats
//!
//! Health, death and the jump state machine carried by a player-role entity.

use serde::{Serialize, Deserialize};
use crate::core::hash::StateHasher;
use crate::core::position::Position;

/// Jump state machine.
///
/// `Rising { frame }` covers frames `0..max`; frame `max` is `Hanging`.
/// `Falling` is also the spawn state, so a freshly loaded player cannot jump
/// until gravity has grounded it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[derive(Default)]
pub enum JumpState {
    /// Standing on something
    Grounded,
    /// Moving up two rows per tick (net one with gravity)
    Rising {
        /// Frames already risen
        frame: u32,
    },
    /// One-tick pause at the top of the arc
    Hanging,
    /// In the air, not jumping
    #[default]
    Falling,
}

impl JumpState {
    /// Can a jump start from here?
    #[inline]
    pub fn can_jump(self) -> bool {
        matches!(self, JumpState::Grounded)
    }

    /// Is the jump arc still running?
    #[inline]
    pub fn is_jumping(self) -> bool {
        matches!(self, JumpState::Rising { .. } | JumpState::Hanging)
    }

    /// Stable tag for hashing.
    pub(crate) fn tag(self) -> (u8, u32) {
        match self {
            JumpState::Grounded => (0, 0),
            JumpState::Rising { frame } => (1, frame),
            JumpState::Hanging => (2, 0),
            JumpState::Falling => (3, 0),
        }
    }
}

/// Stats block of a player-role entity.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlayerStats {
    /// Maximum health
    max_hp: u32,

    /// Current health, `0..=max_hp`
    current_hp: u32,

    /// One-way death flag
    dead: bool,

    /// Pending displacement for this tick
    direction: Position,

    /// Rising frames before the hang frame
    pub jump_height: u32,

    /// Jump state machine
    pub jump: JumpState,
}

impl PlayerStats {
    /// Create full-health stats in the spawn jump state.
    pub fn new(max_hp: u32, jump_height: u32) -> Self {
        Self {
            max_hp,
            current_hp: max_hp,
            dead: max_hp == 0,
            direction: Position::ZERO,
            jump_height,
            jump: JumpState::Falling,
        }
    }

    /// Current health.
    #[inline]
    pub fn hp(&self) -> u32 {
        self.current_hp
    }

    /// Maximum health.
    #[inline]
    pub fn max_hp(&self) -> u32 {
        self.max_hp
    }

    /// Has the player died?
    #[inline]
    pub fn is_dead(&self) -> bool {
        self.dead
    }

    /// Apply damage. Returns true if this call killed the player.
    ///
    /// Death is terminal: later damage keeps `dead` set and hp at zero.
    pub fn lose_hp(&mut self, amount: u32) -> bool {
        self.current_hp = self.current_hp.saturating_sub(amount);
        if self.current_hp == 0 && !self.dead {
            self.dead = true;
            return true;
        }
        false
    }

    /// Set the pending displacement.
    #[inline]
    pub fn set_direction(&mut self, direction: Position) {
        self.direction = direction;
    }

    /// Pending displacement (not consumed).
    #[inline]
    pub fn direction(&self) -> Position {
        self.direction
    }

    /// Consume the pending displacement, resetting it to zero.
    #[inline]
    pub fn take_direction(&mut self) -> Position {
        std::mem::take(&mut self.direction)
    }

    /// Hash these stats for replay verification.
    pub fn hash_into(&self, hasher: &mut StateHasher) {
        hasher.update_u32(self.max_hp);
        hasher.update_u32(self.current_hp);
        hasher.update_bool(self.dead);
        hasher.update_position(self.direction);
        hasher.update_u32(self.jump_height);
        let (tag, frame) = self.jump.tag();
        hasher.update_u8(tag);
        hasher.update_u32(frame);
    }
}

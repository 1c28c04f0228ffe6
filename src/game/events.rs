//! Game Events
//!
//! Events generated during simulation, for renderers, logs and replay checks.

use serde::{Serialize, Deserialize};
use crate::core::position::Position;

/// Game event data.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEventData {
    /// Jump started from the ground
    JumpStarted {
        /// Player's first body cell when the jump began
        from: Position,
    },

    /// Player came to rest after being airborne
    Landed {
        /// Player's first body cell after landing
        at: Position,
    },

    /// Damage trigger fired
    Damaged {
        /// Hit points removed
        amount: u32,
        /// Health afterwards
        hp: u32,
    },

    /// Gold trigger fired
    GoldCollected {
        /// Cell the gold sat on
        position: Position,
        /// Gold gained
        amount: u32,
        /// Level total afterwards
        total: u32,
    },

    /// Teleport switched the active map
    MapSwitched {
        /// Previous map index
        from: usize,
        /// New map index
        to: usize,
        /// Where the player's first body cell landed
        target: Position,
    },

    /// Health reached zero
    PlayerDied,
}

/// A game event with timing.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameEvent {
    /// Tick when event occurred
    pub tick: u32,

    /// Event data
    pub data: GameEventData,
}

impl GameEvent {
    /// Create a new event.
    pub fn new(tick: u32, data: GameEventData) -> Self {
        Self { tick, data }
    }

    /// Create jump started event.
    pub fn jump_started(tick: u32, from: Position) -> Self {
        Self::new(tick, GameEventData::JumpStarted { from })
    }

    /// Create landed event.
    pub fn landed(tick: u32, at: Position) -> Self {
        Self::new(tick, GameEventData::Landed { at })
    }

    /// Create damaged event.
    pub fn damaged(tick: u32, amount: u32, hp: u32) -> Self {
        Self::new(tick, GameEventData::Damaged { amount, hp })
    }

    /// Create gold collected event.
    pub fn gold_collected(tick: u32, position: Position, amount: u32, total: u32) -> Self {
        Self::new(tick, GameEventData::GoldCollected { position, amount, total })
    }

    /// Create map switched event.
    pub fn map_switched(tick: u32, from: usize, to: usize, target: Position) -> Self {
        Self::new(tick, GameEventData::MapSwitched { from, to, target })
    }

    /// Create player died event.
    pub fn player_died(tick: u32) -> Self {
        Self::new(tick, GameEventData::PlayerDied)
    }

    /// Does this event end the level?
    pub fn is_terminal(&self) -> bool {
        matches!(self.data, GameEventData::PlayerDied)
    }
}

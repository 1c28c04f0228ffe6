//! Game Logic Module
//!
//! All simulation code. Deterministic: no clocks, no randomness, no I/O
//! (the runner's timer is the only wall-clock reader).
//!
//! ## Module Structure
//!
//! - `tile`: Grid cells and entity body cells
//! - `entity`: Entity bodies and collision queries
//! - `player`: Health, death and jump state
//! - `map`: Static grid, occupancy overlay, footprint diffing
//! - `trigger`: Option tiles (damage, gold, teleport)
//! - `level`: Level aggregate, level data and sources
//! - `movement`: Validate-then-commit moves, jump arc, gravity
//! - `input`: Input intents, recording and replay
//! - `state`: Orchestrator context
//! - `tick`: One fixed-step simulation pass
//! - `events`: Game events
//! - `render`: Renderer contract and HUD
//! - `runner`: Fixed-step game loop

pub mod tile;
pub mod entity;
pub mod player;
pub mod map;
pub mod trigger;
pub mod level;
pub mod movement;
pub mod input;
pub mod state;
pub mod tick;
pub mod events;
pub mod render;
pub mod runner;

// Re-export key types
pub use tile::{Tile, EntityTile};
pub use entity::{Entity, Role};
pub use player::{PlayerStats, JumpState};
pub use map::{Map, CellChange};
pub use trigger::{OptionTile, Trigger, TriggerKind};
pub use level::{Level, LevelCatalog, LevelData, LevelError, LevelSource};
pub use input::{InputFrame, InputRecording, InputSource};
pub use state::{GameState, GamePhase};
pub use tick::TickResult;
pub use events::GameEvent;
pub use render::{Hud, Renderer};

//! # Tile Platformer
//!
//! Deterministic simulation core for a tile-grid platformer.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    TILE PLATFORMER                           │
//! ├─────────────────────────────────────────────────────────────┤
//! │  config.rs       - Tunables (frame rate, jump frames, ...)   │
//! │                                                              │
//! │  core/           - Deterministic primitives                  │
//! │  ├── position.rs - 2D integer grid vector                    │
//! │  ├── hash.rs     - State hashing for replay verification     │
//! │  └── timer.rs    - Fixed-step tick gate                      │
//! │                                                              │
//! │  game/           - Simulation                                │
//! │  ├── tile.rs     - Grid cells and entity body cells          │
//! │  ├── entity.rs   - Bodies and collision queries              │
//! │  ├── map.rs      - Grid authority and footprint diffing      │
//! │  ├── movement.rs - Validate-then-commit, jump, gravity       │
//! │  ├── trigger.rs  - Damage, gold and teleport tiles           │
//! │  ├── level.rs    - Level aggregate and level sources         │
//! │  ├── tick.rs     - One simulation pass                       │
//! │  └── runner.rs   - Fixed-step loop over input and renderer   │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Determinism Guarantee
//!
//! `core/` and `game/` (except the runner's wall clock) are deterministic:
//! - Integer grid positions only
//! - No HashMap (BTreeMap/BTreeSet for sorted iteration)
//! - No randomness
//!
//! Given the same level and input recording, a replay produces the same
//! state hash.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod config;
pub mod core;
pub mod game;

// Re-export commonly used types
pub use config::{GameConfig, ConfigError};
pub use core::position::Position;
pub use game::input::{InputFrame, InputRecording};
pub use game::level::{LevelCatalog, LevelError, LevelSource};
pub use game::state::GameState;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

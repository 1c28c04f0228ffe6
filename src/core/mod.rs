//! Core deterministic primitives.
//!
//! Grid positions, state hashing and the fixed-step tick gate. Nothing in
//! here knows about maps, entities or levels.

pub mod position;
pub mod hash;
pub mod timer;

// Re-export core types
pub use position::Position;
pub use hash::{StateHash, StateHasher, compute_state_hash};
pub use timer::FixedStepTimer;

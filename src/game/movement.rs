//! Movement and Physics
//!
//! Validate-then-commit movement for entities on a map.
//!
//! Every move is first tested on a translated copy of the colliding
//! positions ([`attempt_move`]). Only a clear move is committed through
//! [`commit_move`], the single path that mutates body positions and
//! re-diffs the map footprint.
//!
//! ## Jump arc
//!
//! A jump rises two rows per tick for `jump_height` ticks, hangs for one
//! tick, then falls. Gravity runs every tick afterwards, so the net motion
//! is one row up per rising tick and zero on the hang tick.

use std::collections::BTreeSet;
use tracing::debug;

use crate::core::position::Position;
use crate::game::entity::Entity;
use crate::game::map::{CellChange, Map};
use crate::game::player::JumpState;

/// Displacement of one rising jump frame.
pub const RISE: Position = Position::new(0, -2);

/// What gravity did this tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GravityOutcome {
    /// Moved down one row
    Fell,
    /// Blocked after being airborne
    Landed,
    /// Blocked and already grounded
    Resting,
}

// =============================================================================
// VALIDATE / COMMIT
// =============================================================================

/// Would `positions` translated by `direction` be clear of the map's collidable cells?
///
/// Pure: mutates nothing. Off-grid cells read as open here; callers that
/// care about the edge check bounds separately.
pub fn attempt_move(map: &Map, positions: &BTreeSet<Position>, direction: Position) -> bool {
    let translated: BTreeSet<Position> = positions.iter().map(|pos| *pos + direction).collect();
    !map.collides_with(&translated)
}

/// Collision-clear and every translated body cell on the grid.
fn move_is_clear(map: &Map, entity: &Entity, direction: Position) -> bool {
    attempt_move(map, entity.colliding_positions(), direction)
        && map.all_in_bounds(entity.body().iter().map(|tile| tile.position() + direction))
}

/// Bounds check on the translated first and last body cells only.
///
/// Exact for rectangular bodies stored row-major; other shapes may
/// poke a cell off-grid unnoticed.
fn corners_in_bounds(map: &Map, entity: &Entity, direction: Position) -> bool {
    match (entity.top_left(), entity.bottom_right()) {
        (Some(top_left), Some(bottom_right)) => {
            map.in_bounds(top_left + direction) && map.in_bounds(bottom_right + direction)
        }
        _ => true,
    }
}

/// Move `entity` by `direction` and re-diff its footprint on `map`.
///
/// Call only after the move was validated.
pub fn commit_move(map: &mut Map, entity: &mut Entity, direction: Position) -> Vec<CellChange> {
    let old_body = entity.body().to_vec();
    entity.translate(direction);
    map.update_footprint(&old_body, entity.body())
}

fn try_commit(
    map: &mut Map,
    entity: &mut Entity,
    direction: Position,
    changes: &mut Vec<CellChange>,
) -> bool {
    if move_is_clear(map, entity, direction) {
        changes.extend(commit_move(map, entity, direction));
        true
    } else {
        false
    }
}

fn set_jump(entity: &mut Entity, state: JumpState) {
    if let Some(stats) = entity.stats_mut() {
        stats.jump = state;
    }
}

// =============================================================================
// TICK STAGES
// =============================================================================

/// Start a jump if the player is grounded. The arc runs from this tick on.
pub fn start_jump(entity: &mut Entity) -> bool {
    match entity.stats_mut() {
        Some(stats) if stats.jump.can_jump() => {
            stats.jump = JumpState::Rising { frame: 0 };
            true
        }
        _ => false,
    }
}

/// Advance the jump state machine one tick.
pub fn resolve_jump(map: &mut Map, entity: &mut Entity, changes: &mut Vec<CellChange>) {
    let (jump, max) = match entity.stats() {
        Some(stats) => (stats.jump, stats.jump_height),
        None => return,
    };

    match jump {
        JumpState::Rising { frame } if frame < max => {
            // Both rows passed through must be open
            let clear = corners_in_bounds(map, entity, RISE)
                && attempt_move(map, entity.colliding_positions(), Position::UP)
                && attempt_move(map, entity.colliding_positions(), RISE);

            if clear {
                changes.extend(commit_move(map, entity, RISE));
                let next = frame + 1;
                set_jump(
                    entity,
                    if next >= max { JumpState::Hanging } else { JumpState::Rising { frame: next } },
                );
            } else {
                // Clamp to the top of the arc, creeping one row if possible
                set_jump(entity, JumpState::Hanging);
                let crept = try_commit(map, entity, Position::UP, changes);
                debug!(frame, crept, "Jump blocked");
            }
        }
        JumpState::Rising { .. } | JumpState::Hanging => {
            try_commit(map, entity, Position::UP, changes);
            set_jump(entity, JumpState::Falling);
        }
        JumpState::Grounded | JumpState::Falling => {}
    }
}

/// Apply the pending direction intent, consuming it. No partial moves.
pub fn resolve_move(map: &mut Map, entity: &mut Entity, changes: &mut Vec<CellChange>) -> bool {
    let direction = match entity.stats_mut() {
        Some(stats) => stats.take_direction(),
        None => return false,
    };
    if direction.is_zero() {
        return false;
    }

    let moved = try_commit(map, entity, direction, changes);
    if !moved {
        debug!(%direction, "Move blocked");
    }
    moved
}

/// Pull the entity down one row, or ground it.
pub fn apply_gravity(map: &mut Map, entity: &mut Entity, changes: &mut Vec<CellChange>) -> GravityOutcome {
    if try_commit(map, entity, Position::DOWN, changes) {
        // Walking off a ledge
        if let Some(stats) = entity.stats_mut() {
            if stats.jump == JumpState::Grounded {
                stats.jump = JumpState::Falling;
            }
        }
        return GravityOutcome::Fell;
    }

    let was_grounded = entity
        .stats()
        .is_some_and(|stats| stats.jump == JumpState::Grounded);
    set_jump(entity, JumpState::Grounded);

    if was_grounded {
        GravityOutcome::Resting
    } else {
        GravityOutcome::Landed
    }
}

// =============================================================================
// TESTS
// =============================================================================

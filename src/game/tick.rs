//! Simulation Tick
//!
//! One fixed-step pass over the stage sequence:
//!
//! ```text
//! intent → jump → move → triggers → gravity
//! ```
//!
//! Every committed move re-diffs the player's footprint on the spot, so the
//! map's occupancy is current when each later stage runs. Each stage may
//! decide not to move; later stages still run.

use tracing::{debug, info};

use crate::config::GameConfig;
use crate::game::events::GameEvent;
use crate::game::input::{InputFrame, InputRecording};
use crate::game::level::{LevelError, LevelSource};
use crate::game::render::Hud;
use crate::game::map::CellChange;
use crate::game::movement::{self, GravityOutcome};
use crate::game::player::PlayerStats;
use crate::game::state::{GamePhase, GameState};
use crate::game::trigger::process_triggers;

/// Result of a tick.
#[derive(Debug, Default)]
pub struct TickResult {
    /// Events generated this tick
    pub events: Vec<GameEvent>,
    /// Cells whose visible tile changed, in commit order
    pub changes: Vec<CellChange>,
    /// HUD after the tick
    pub hud: Hud,
    /// The active map changed; redraw it whole
    pub map_switched: bool,
    /// The player is dead; the loop should stop
    pub game_over: bool,
}

/// Run one simulation tick.
///
/// A tick after game over does nothing and reports `game_over` again.
pub fn tick(state: &mut GameState, input: InputFrame, config: &GameConfig) -> TickResult {
    let mut result = TickResult::default();

    if state.phase == GamePhase::GameOver {
        result.hud = state.hud();
        result.game_over = true;
        return result;
    }

    // 0. Advance tick counter
    state.tick += 1;
    let now = state.tick;

    // 1. Capture intent
    let intent = input.intent();
    let player = state.level.player_mut();
    if let Some(stats) = player.stats_mut() {
        stats.set_direction(intent.direction);
    }
    if intent.jump && movement::start_jump(player) {
        if let Some(from) = player.top_left() {
            debug!(tick = now, %from, "Jump started");
            result.events.push(GameEvent::jump_started(now, from));
        }
    }

    // 2. Jump resolution
    {
        let (map, player) = state.level.map_and_player_mut();
        movement::resolve_jump(map, player, &mut result.changes);
    }

    // 3. Horizontal / vertical intent move
    {
        let (map, player) = state.level.map_and_player_mut();
        movement::resolve_move(map, player, &mut result.changes);
    }

    // 4. Trigger scan
    let outcome = process_triggers(&mut state.level, config, now);
    result.events.extend(outcome.events);
    if outcome.map_switched {
        // Earlier changes were on the old map
        result.changes = outcome.changes;
        result.map_switched = true;
    } else {
        result.changes.extend(outcome.changes);
    }

    // 5. Gravity
    {
        let (map, player) = state.level.map_and_player_mut();
        if movement::apply_gravity(map, player, &mut result.changes) == GravityOutcome::Landed {
            if let Some(at) = player.top_left() {
                debug!(tick = now, %at, "Landed");
                result.events.push(GameEvent::landed(now, at));
            }
        }
    }

    // 6. End condition
    let dead = state
        .level
        .player()
        .stats()
        .is_some_and(PlayerStats::is_dead);
    if dead {
        state.phase = GamePhase::GameOver;
        result.game_over = true;
        info!(tick = now, level = state.level_index, gold = state.level.gold(), "Player died");
    }

    result.hud = state.hud();
    result
}

/// Replay a level from recorded inputs.
///
/// Returns the final state and every event raised.
pub fn replay_level(
    source: &dyn LevelSource,
    recording: &InputRecording,
    config: &GameConfig,
) -> Result<(GameState, Vec<GameEvent>), LevelError> {
    let mut state = GameState::load(source, recording.level_index, config)?;
    let mut all_events = Vec::new();

    for (_, frame) in recording.replay_iter() {
        let result = tick(&mut state, frame, config);
        all_events.extend(result.events);

        if result.game_over {
            break;
        }
    }

    Ok((state, all_events))
}

// =============================================================================
// TESTS
// =============================================================================

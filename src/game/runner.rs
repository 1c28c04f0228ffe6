//! Fixed-Step Game Loop
//!
//! Polls input, runs a tick whenever the timer allows, forwards the result to
//! the renderer, and stops after the tick in which the player died. Early
//! polls spin rather than sleep.

use std::time::Instant;
use tracing::{debug, info};

use crate::config::GameConfig;
use crate::core::hash::StateHash;
use crate::core::timer::FixedStepTimer;
use crate::game::input::{InputRecording, InputSource};
use crate::game::render::{RenderFrame, Renderer};
use crate::game::state::GameState;
use crate::game::tick::tick;

/// Outcome of a finished run.
#[derive(Clone, Debug)]
pub struct RunSummary {
    /// Ticks simulated
    pub ticks: u32,
    /// Gold collected
    pub gold: u32,
    /// State hash after the last tick
    pub final_hash: StateHash,
    /// Every input fed to the simulation
    pub recording: InputRecording,
}

/// Play the loaded level until the player dies.
pub fn run(
    state: &mut GameState,
    input: &mut dyn InputSource,
    renderer: &mut dyn Renderer,
    config: &GameConfig,
) -> RunSummary {
    let mut timer = FixedStepTimer::new(config.tick_interval());
    let mut recording = InputRecording::new(state.level_index);

    renderer.draw_level(state.level.map(), &state.hud());
    info!(
        level = state.level_index,
        interval_ms = timer.interval().as_millis() as u64,
        "Game loop started"
    );

    loop {
        if !timer.poll(Instant::now()) {
            std::hint::spin_loop();
            continue;
        }

        let frame = input.poll();
        let result = tick(state, frame, config);
        recording.record(state.tick, frame);

        if result.map_switched {
            renderer.draw_level(state.level.map(), &result.hud);
        } else {
            renderer.draw_frame(&RenderFrame {
                tick: state.tick,
                changes: &result.changes,
                hud: result.hud,
            });
        }

        for event in &result.events {
            debug!(tick = event.tick, event = ?event.data, "Event");
        }

        if result.game_over {
            break;
        }
    }

    let final_hash = state.compute_hash();
    info!(
        ticks = state.tick,
        gold = state.level.gold(),
        hash = %hex::encode(&final_hash[..8]),
        "Game loop finished"
    );

    RunSummary {
        ticks: state.tick,
        gold: state.level.gold(),
        final_hash,
        recording,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::position::Position;
    use crate::game::input::{InputFrame, ScriptedInput};
    use crate::game::level::{LevelCatalog, LevelData, MapData, PlayerData};
    use crate::game::render::TextRenderer;
    use crate::game::tick::replay_level;
    use crate::game::tile::EntityTile;
    use crate::game::trigger::{OptionTile, Trigger};

    fn spike_run() -> LevelCatalog {
        LevelCatalog::new(vec![LevelData {
            name: "spikes".to_string(),
            maps: vec![MapData {
                rows: vec!["      ".into(), "      ".into(), "######".into()],
                solid: "#".into(),
                options: vec![
                    OptionTile::new(
                        Position::new(2, 1),
                        vec![Trigger::Gold { amount: 5, replacement: Some('.') }],
                    ),
                    OptionTile::new(Position::new(5, 1), vec![Trigger::Damage { amount: 1 }]),
                ],
            }],
            start_map: 0,
            player: PlayerData {
                body: vec![EntityTile::new('@', true, Position::new(0, 1))],
                max_hp: 2,
                jump_height: None,
            },
        }])
    }

    fn fast_config() -> GameConfig {
        GameConfig { frame_rate: 10_000.0, ..GameConfig::default() }
    }

    #[test]
    fn test_run_until_death() {
        let catalog = spike_run();
        let config = fast_config();
        let mut state = GameState::load(&catalog, 0, &config).unwrap();
        let mut input = ScriptedInput::constant(InputFrame::right());
        let mut renderer = TextRenderer::new();

        let summary = run(&mut state, &mut input, &mut renderer, &config);

        // Reaches the spikes at the edge on tick 5, dies there on tick 6
        assert!(state.is_over());
        assert_eq!(summary.gold, 5);
        assert_eq!(summary.ticks, 6);
        assert_eq!(renderer.hud().hp, 0);
        assert_eq!(renderer.frames(), 6);
        assert_eq!(renderer.rows()[1], "  .  @".to_string());
    }

    #[test]
    fn test_run_recording_replays() {
        let catalog = spike_run();
        let config = fast_config();
        let mut state = GameState::load(&catalog, 0, &config).unwrap();
        let mut input = ScriptedInput::new(vec![InputFrame::IDLE, InputFrame::jump(), InputFrame::right()]);
        let mut renderer = TextRenderer::new();

        let summary = run(&mut state, &mut input, &mut renderer, &config);
        let (replayed, _) = replay_level(&catalog, &summary.recording, &config).unwrap();

        assert_eq!(replayed.tick, summary.ticks);
        assert_eq!(replayed.compute_hash(), summary.final_hash);
    }
}

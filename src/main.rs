//! Tile Platformer Demo
//!
//! Plays a built-in level with scripted input until the player dies, then
//! replays the recorded input and checks the state hashes match.

use anyhow::{bail, Context};
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use tile_platformer::{
    GameConfig, VERSION,
    game::{
        input::{InputFrame, InputRecording, ScriptedInput},
        level::LevelCatalog,
        render::TextRenderer,
        runner::run,
        state::GameState,
        tick::replay_level,
    },
};

/// Two maps: a corridor with gold and a teleport, then a spike pit.
const DEMO_LEVELS: &str = r#"{
  "levels": [
    {
      "name": "corridor",
      "start_map": 0,
      "maps": [
        {
          "rows": [
            "            ",
            "            ",
            "            ",
            "            ",
            "            ",
            "============"
          ],
          "solid": "=",
          "options": [
            { "position": { "x": 9, "y": 4 }, "triggers": [ { "kind": "gold", "amount": 5, "replacement": "." } ] },
            { "position": { "x": 10, "y": 4 }, "triggers": [ { "kind": "teleport", "map_index": 1, "target": { "x": 0, "y": 2 } } ] }
          ]
        },
        {
          "rows": [
            "========",
            "        ",
            "        ",
            "========"
          ],
          "solid": "=",
          "options": [
            { "position": { "x": 7, "y": 2 }, "triggers": [ { "kind": "damage", "amount": 1 } ] }
          ]
        }
      ],
      "player": {
        "body": [ { "tile": { "symbol": "@", "collidable": true }, "position": { "x": 1, "y": 4 } } ],
        "max_hp": 3
      }
    }
  ]
}"#;

fn main() -> anyhow::Result<()> {
    // Initialize logging
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = FmtSubscriber::builder().with_env_filter(filter).finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to set tracing subscriber")?;

    let config = GameConfig::from_env()?;
    info!("Tile Platformer v{}", VERSION);
    info!(
        "Frame rate: {} Hz, jump frames: {}",
        config.frame_rate, config.jumping_max_frame
    );

    let catalog = LevelCatalog::from_json(DEMO_LEVELS)?;
    let mut state = GameState::load(&catalog, 0, &config)?;

    // Land, hop once, then hold right into the spikes
    let mut input = ScriptedInput::new(vec![
        InputFrame::IDLE,
        InputFrame::jump(),
        InputFrame::right(),
    ]);
    let mut renderer = TextRenderer::new();

    info!("=== Playing ===");
    let summary = run(&mut state, &mut input, &mut renderer, &config);
    for row in renderer.rows() {
        info!("|{}|", row);
    }
    info!(
        "Finished after {} ticks with {} gold, hash {}",
        summary.ticks,
        summary.gold,
        hex::encode(summary.final_hash)
    );

    // Verify determinism by replaying the recording
    info!("=== Verifying Replay ===");
    let bytes = summary.recording.to_bytes()?;
    info!("Recording: {} deltas, {} bytes", summary.recording.deltas().len(), bytes.len());
    let recording = InputRecording::from_bytes(&bytes)?;

    let (replayed, events) = replay_level(&catalog, &recording, &config)?;
    let replay_hash = replayed.compute_hash();
    info!("Replay: {} events, hash {}", events.len(), hex::encode(replay_hash));

    if replay_hash != summary.final_hash {
        bail!("Replay diverged from the live run");
    }
    info!("Replay verified: hashes match");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_demo_levels_load() {
        let catalog = LevelCatalog::from_json(DEMO_LEVELS).unwrap();
        let state = GameState::load(&catalog, 0, &GameConfig::default()).unwrap();
        assert_eq!(state.level.map_count(), 2);
        assert!(state.level.map().is_collidable_at(tile_platformer::Position::new(0, 5)));
    }
}

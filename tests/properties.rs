//! Cross-module properties of the simulation core.

use std::collections::BTreeSet;

use proptest::prelude::*;

use tile_platformer::config::GameConfig;
use tile_platformer::core::position::Position;
use tile_platformer::game::entity::Entity;
use tile_platformer::game::map::Map;
use tile_platformer::game::movement::{apply_gravity, attempt_move, commit_move, GravityOutcome};
use tile_platformer::game::player::{JumpState, PlayerStats};
use tile_platformer::game::tick::tick;
use tile_platformer::game::tile::{EntityTile, Tile};
use tile_platformer::game::trigger::{OptionTile, Trigger};
use tile_platformer::game::level::{LevelCatalog, LevelData, MapData, PlayerData};
use tile_platformer::game::state::GameState;
use tile_platformer::InputFrame;

// =============================================================================
// STRATEGIES
// =============================================================================

fn arb_position() -> impl Strategy<Value = Position> {
    (-4i32..12, -4i32..12).prop_map(|(x, y)| Position::new(x, y))
}

fn arb_body() -> impl Strategy<Value = Vec<EntityTile>> {
    prop::collection::vec((arb_position(), any::<bool>()), 0..8).prop_map(|cells| {
        cells
            .into_iter()
            .map(|(pos, collidable)| EntityTile::new('o', collidable, pos))
            .collect()
    })
}

fn arb_map() -> impl Strategy<Value = Map> {
    prop::collection::vec(prop::collection::vec(any::<bool>(), 8), 8).prop_map(|grid| {
        let rows: Vec<String> = grid
            .iter()
            .map(|row| row.iter().map(|solid| if *solid { '#' } else { ' ' }).collect())
            .collect();
        Map::from_rows(&rows, |c| c == '#')
    })
}

fn arb_direction() -> impl Strategy<Value = Position> {
    (-2i32..=2, -2i32..=2).prop_map(|(x, y)| Position::new(x, y))
}

fn expected_colliding(body: &[EntityTile]) -> BTreeSet<Position> {
    body.iter()
        .filter(|tile| tile.is_collidable())
        .map(|tile| tile.position())
        .collect()
}

// =============================================================================
// PROPERTIES
// =============================================================================

proptest! {
    #[test]
    fn colliding_positions_match_body(body in arb_body(), direction in arb_direction()) {
        let mut map = Map::new(20, 20, Tile::EMPTY);
        let mut entity = Entity::new(body);
        prop_assert_eq!(entity.colliding_positions(), &expected_colliding(entity.body()));

        commit_move(&mut map, &mut entity, direction);
        prop_assert_eq!(entity.colliding_positions(), &expected_colliding(entity.body()));
    }

    #[test]
    fn collision_is_symmetric(a in arb_body(), b in arb_body()) {
        let a = Entity::new(a);
        let b = Entity::new(b);
        prop_assert_eq!(a.collides_with(&b), b.collides_with(&a));
    }

    #[test]
    fn attempt_move_is_pure(map in arb_map(), body in arb_body(), direction in arb_direction()) {
        let entity = Entity::new(body);
        let before = map.clone();

        let first = attempt_move(&map, entity.colliding_positions(), direction);
        let second = attempt_move(&map, entity.colliding_positions(), direction);

        prop_assert_eq!(first, second);
        prop_assert_eq!(&map, &before);
    }

    #[test]
    fn footprint_diff_restores_and_paints(
        map in arb_map(),
        old in arb_body(),
        new in arb_body(),
    ) {
        let mut map = map;
        let pristine = map.clone();
        map.update_footprint(&[], &old);
        map.update_footprint(&old, &new);

        let new_positions: BTreeSet<Position> = new.iter().map(|t| t.position()).collect();
        for tile in &old {
            let pos = tile.position();
            if !new_positions.contains(&pos) {
                prop_assert_eq!(map.visible_tile_at(pos), pristine.static_tile_at(pos));
            }
        }
        // Later cells win where the new body overlaps itself
        for tile in new.iter().rev() {
            let pos = tile.position();
            if map.in_bounds(pos) && new.iter().rev().find(|t| t.position() == pos) == Some(tile) {
                prop_assert_eq!(map.visible_tile_at(pos), Some(tile.tile));
            }
        }
        // The static layer never changes
        prop_assert_eq!(map.static_rows(), pristine.static_rows());
    }

    #[test]
    fn damage_death_is_terminal(max_hp in 1u32..10, hits in prop::collection::vec(0u32..4, 1..20)) {
        let mut stats = PlayerStats::new(max_hp, 4);
        let mut died = false;
        for hit in hits {
            stats.lose_hp(hit);
            died |= stats.is_dead();
            prop_assert_eq!(stats.is_dead(), died);
            prop_assert!(stats.hp() <= max_hp);
        }
    }
}

// =============================================================================
// SCENARIOS
// =============================================================================

fn player_at(pos: Position) -> Entity {
    Entity::player(vec![EntityTile::new('@', true, pos)], PlayerStats::new(3, 4))
}

#[test]
fn grounding_leaves_position_unchanged() {
    let mut map = Map::from_rows(&["    ", "    ", "####"], |c| c == '#');
    let body = vec![
        EntityTile::new('@', true, Position::new(1, 1)),
        EntityTile::new('@', true, Position::new(2, 1)),
    ];
    let mut player = Entity::player(body.clone(), PlayerStats::new(3, 4));
    if let Some(stats) = player.stats_mut() {
        stats.jump = JumpState::Rising { frame: 2 };
    }

    let mut changes = Vec::new();
    apply_gravity(&mut map, &mut player, &mut changes);
    assert_eq!(player.body(), body.as_slice());
    assert_eq!(player.stats().map(|s| s.jump), Some(JumpState::Grounded));
    assert!(changes.is_empty());
}

#[test]
fn scenario_fall_onto_floor_row() {
    // Floor row at y=4: the player comes to rest on top of it
    let mut map = Map::from_rows(&["     ", "     ", "     ", "     ", "#####"], |c| c == '#');
    let mut player = player_at(Position::new(2, 2));
    let mut changes = Vec::new();

    assert_eq!(apply_gravity(&mut map, &mut player, &mut changes), GravityOutcome::Fell);
    assert_eq!(player.top_left(), Some(Position::new(2, 3)));
    assert_eq!(apply_gravity(&mut map, &mut player, &mut changes), GravityOutcome::Landed);
    assert_eq!(player.top_left(), Some(Position::new(2, 3)));
    assert_eq!(player.stats().map(|s| s.jump), Some(JumpState::Grounded));
}

#[test]
fn scenario_fall_onto_bottom_edge() {
    // No floor tiles: the bottom edge of the grid stops the fall at y=4
    let mut map = Map::new(5, 5, Tile::EMPTY);
    let mut player = player_at(Position::new(2, 2));
    let mut changes = Vec::new();

    apply_gravity(&mut map, &mut player, &mut changes);
    apply_gravity(&mut map, &mut player, &mut changes);
    assert_eq!(player.top_left(), Some(Position::new(2, 4)));

    assert_eq!(apply_gravity(&mut map, &mut player, &mut changes), GravityOutcome::Landed);
    assert_eq!(player.top_left(), Some(Position::new(2, 4)));
    assert_eq!(player.stats().map(|s| s.jump), Some(JumpState::Grounded));
}

fn single_map_catalog(rows: &[&str], spawn: Position, options: Vec<OptionTile>) -> LevelCatalog {
    LevelCatalog::new(vec![LevelData {
        name: "scenario".to_string(),
        maps: vec![MapData {
            rows: rows.iter().map(|row| row.to_string()).collect(),
            solid: "#".into(),
            options,
        }],
        start_map: 0,
        player: PlayerData {
            body: vec![EntityTile::new('@', true, spawn)],
            max_hp: 3,
            jump_height: Some(4),
        },
    }])
}

#[test]
fn jump_arc_is_literal() {
    let mut rows = vec!["   "; 9];
    rows.push("###");
    let catalog = single_map_catalog(&rows, Position::new(1, 8), Vec::new());
    let config = GameConfig::default();
    let mut state = GameState::load(&catalog, 0, &config).unwrap();
    tick(&mut state, InputFrame::IDLE, &config);

    let y0 = 8;
    let mut rows_seen = Vec::new();
    tick(&mut state, InputFrame::jump(), &config);
    rows_seen.push(state.level.player().top_left().map(|p| p.y));
    for _ in 0..4 {
        tick(&mut state, InputFrame::IDLE, &config);
        rows_seen.push(state.level.player().top_left().map(|p| p.y));
    }

    let expected: Vec<Option<i32>> = [y0 - 1, y0 - 2, y0 - 3, y0 - 4, y0 - 4].into_iter().map(Some).collect();
    assert_eq!(rows_seen, expected);

    tick(&mut state, InputFrame::IDLE, &config);
    assert_eq!(state.level.player().top_left().map(|p| p.y), Some(y0 - 3));
}

#[test]
fn gold_is_one_shot_across_ticks() {
    let gold = Position::new(2, 1);
    let catalog = single_map_catalog(
        &["    ", "    ", "####"],
        Position::new(1, 1),
        vec![OptionTile::new(gold, vec![Trigger::Gold { amount: 5, replacement: Some('.') }])],
    );
    let config = GameConfig::default();
    let mut state = GameState::load(&catalog, 0, &config).unwrap();

    tick(&mut state, InputFrame::IDLE, &config);
    tick(&mut state, InputFrame::right(), &config);
    assert_eq!(state.level.gold(), 5);
    assert!(state.level.map().option_tile_at(gold).is_none());
    assert_eq!(state.level.map().static_tile_at(gold), Some(Tile::open('.')));

    // Step off and back on
    tick(&mut state, InputFrame::left(), &config);
    tick(&mut state, InputFrame::right(), &config);
    assert_eq!(state.level.gold(), 5);
    assert_eq!(state.level.map().visible_tile_at(gold), Some(Tile::solid('@')));
}

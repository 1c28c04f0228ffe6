//! Levels
//!
//! A level aggregates its maps, the player and the gold counter. Level data
//! comes from a [`LevelSource`]; the simulation never touches storage.

use serde::{Serialize, Deserialize};
use thiserror::Error;
use tracing::{info, trace};

use crate::config::GameConfig;
use crate::core::position::Position;
use crate::game::entity::Entity;
use crate::game::map::{CellChange, Map};
use crate::game::player::PlayerStats;
use crate::game::render::Hud;
use crate::game::tile::EntityTile;
use crate::game::trigger::{OptionTile, Trigger};

/// Level loading errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LevelError {
    /// Requested level index outside `0..count`.
    #[error("Level index {index} out of range (0..{count})")]
    IndexOutOfRange {
        /// Requested index
        index: usize,
        /// Number of levels available
        count: usize,
    },

    /// The source has no level for this index.
    #[error("Level {index} not found")]
    NotFound {
        /// Requested index
        index: usize,
    },

    /// The source could not produce valid level data.
    #[error("Level unreadable: {reason}")]
    Unreadable {
        /// What went wrong
        reason: String,
    },
}

impl LevelError {
    /// Bad request from the caller rather than a storage problem.
    pub fn is_configuration_error(&self) -> bool {
        matches!(self, LevelError::IndexOutOfRange { .. })
    }

    fn unreadable(reason: impl Into<String>) -> Self {
        LevelError::Unreadable { reason: reason.into() }
    }
}

// =============================================================================
// LEVEL DATA
// =============================================================================

/// Serialisable description of one map.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MapData {
    /// Character rows, top to bottom
    pub rows: Vec<String>,
    /// Symbols that block movement
    pub solid: String,
    /// Option tiles on this map
    #[serde(default)]
    pub options: Vec<OptionTile>,
}

impl MapData {
    /// Build the runtime map.
    pub fn build(&self) -> Map {
        let mut map = Map::from_rows(&self.rows, |symbol| self.solid.contains(symbol));
        for option in &self.options {
            map.add_option_tile(option.clone());
        }
        map
    }
}

/// Serialisable description of the player.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerData {
    /// Body cells at their spawn positions, row-major
    pub body: Vec<EntityTile>,
    /// Maximum (and starting) health
    pub max_hp: u32,
    /// Rising frames; the config default applies when absent
    #[serde(default)]
    pub jump_height: Option<u32>,
}

/// Everything needed to start a level.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelData {
    /// Display name
    #[serde(default)]
    pub name: String,
    /// Maps of this level
    pub maps: Vec<MapData>,
    /// Map the player spawns on
    #[serde(default)]
    pub start_map: usize,
    /// Player spawn
    pub player: PlayerData,
}

impl LevelData {
    /// Validate and build the runtime level.
    pub fn build(&self, config: &GameConfig) -> Result<Level, LevelError> {
        for (map_index, map) in self.maps.iter().enumerate() {
            for option in &map.options {
                for trigger in &option.triggers {
                    if let Trigger::Teleport { map_index: to, .. } = trigger {
                        if *to >= self.maps.len() {
                            return Err(LevelError::unreadable(format!(
                                "map {} teleports to missing map {}",
                                map_index, to
                            )));
                        }
                    }
                }
            }
        }

        if self.player.max_hp == 0 {
            return Err(LevelError::unreadable("player has no health"));
        }

        let stats = PlayerStats::new(
            self.player.max_hp,
            self.player.jump_height.unwrap_or(config.jumping_max_frame),
        );
        let player = Entity::player(self.player.body.clone(), stats);
        let maps = self.maps.iter().map(MapData::build).collect();

        Level::new(maps, self.start_map, player)
    }
}

/// Supplier of level data.
pub trait LevelSource {
    /// Number of levels available.
    fn level_count(&self) -> usize;

    /// Produce the data for level `index`.
    fn load(&self, index: usize) -> Result<LevelData, LevelError>;
}

/// In-memory level source.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelCatalog {
    /// Levels in play order
    pub levels: Vec<LevelData>,
}

impl LevelCatalog {
    /// Create a catalog.
    pub fn new(levels: Vec<LevelData>) -> Self {
        Self { levels }
    }

    /// Parse a catalog from JSON text.
    pub fn from_json(text: &str) -> Result<Self, LevelError> {
        serde_json::from_str(text).map_err(|e| LevelError::unreadable(e.to_string()))
    }
}

impl LevelSource for LevelCatalog {
    fn level_count(&self) -> usize {
        self.levels.len()
    }

    fn load(&self, index: usize) -> Result<LevelData, LevelError> {
        self.levels
            .get(index)
            .cloned()
            .ok_or(LevelError::NotFound { index })
    }
}

// =============================================================================
// LEVEL
// =============================================================================

/// Runtime level: maps, player and gold.
#[derive(Clone, Debug)]
pub struct Level {
    maps: Vec<Map>,
    active_map: usize,
    player: Entity,
    gold: u32,
}

impl Level {
    /// Create a level and paint the player's spawn footprint.
    pub fn new(maps: Vec<Map>, active_map: usize, player: Entity) -> Result<Self, LevelError> {
        if active_map >= maps.len() {
            return Err(LevelError::unreadable(format!(
                "start map {} of {} maps",
                active_map,
                maps.len()
            )));
        }
        if player.stats().is_none() {
            return Err(LevelError::unreadable("player entity has no stats"));
        }

        let mut level = Self {
            maps,
            active_map,
            player,
            gold: 0,
        };
        let body = level.player.body().to_vec();
        level.maps[active_map].update_footprint(&[], &body);
        Ok(level)
    }

    /// Active map.
    #[inline]
    pub fn map(&self) -> &Map {
        &self.maps[self.active_map]
    }

    /// Active map, mutably.
    #[inline]
    pub fn map_mut(&mut self) -> &mut Map {
        &mut self.maps[self.active_map]
    }

    /// Any map of this level.
    pub fn map_at(&self, index: usize) -> Option<&Map> {
        self.maps.get(index)
    }

    /// Index of the active map.
    #[inline]
    pub fn active_map_index(&self) -> usize {
        self.active_map
    }

    /// Number of maps.
    pub fn map_count(&self) -> usize {
        self.maps.len()
    }

    /// The player entity.
    #[inline]
    pub fn player(&self) -> &Entity {
        &self.player
    }

    /// The player entity, mutably.
    #[inline]
    pub fn player_mut(&mut self) -> &mut Entity {
        &mut self.player
    }

    /// Active map and player borrowed together.
    pub fn map_and_player_mut(&mut self) -> (&mut Map, &mut Entity) {
        (&mut self.maps[self.active_map], &mut self.player)
    }

    /// Active option tiles (those on the active map).
    pub fn option_tiles(&self) -> impl Iterator<Item = &OptionTile> {
        self.map().option_tiles()
    }

    /// Gold collected so far.
    #[inline]
    pub fn gold(&self) -> u32 {
        self.gold
    }

    /// Add gold, returning the new total.
    pub fn add_gold(&mut self, amount: u32) -> u32 {
        self.gold = self.gold.saturating_add(amount);
        self.gold
    }

    /// Make map `index` active and place the player's first cell on `target`.
    ///
    /// The footprint is erased from the old map and painted on the new one.
    /// Returns the painted cells, or `None` if the map does not exist.
    pub fn switch_map(&mut self, index: usize, target: Position) -> Option<Vec<CellChange>> {
        if index >= self.maps.len() {
            return None;
        }

        let old_body = self.player.body().to_vec();
        self.maps[self.active_map].update_footprint(&old_body, &[]);

        self.active_map = index;
        self.player.place_at(target);

        let changes = self.maps[index].update_footprint(&[], self.player.body());
        trace!(map = index, %target, "Player placed on new map");
        Some(changes)
    }

    /// HUD snapshot.
    pub fn hud(&self, level_index: usize) -> Hud {
        let (hp, max_hp) = self
            .player
            .stats()
            .map(|stats| (stats.hp(), stats.max_hp()))
            .unwrap_or_default();
        Hud {
            hp,
            max_hp,
            gold: self.gold,
            level_index,
            map_index: self.active_map,
        }
    }

    pub(crate) fn log_loaded(&self, level_index: usize, name: &str) {
        info!(
            level = level_index,
            level_name = name,
            maps = self.maps.len(),
            width = self.map().width(),
            height = self.map().height(),
            "Level loaded"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::tile::Tile;

    fn sample_data() -> LevelData {
        LevelData {
            name: "sample".to_string(),
            maps: vec![
                MapData {
                    rows: vec!["     ".into(), "     ".into(), "#####".into()],
                    solid: "#".into(),
                    options: vec![OptionTile::new(
                        Position::new(4, 1),
                        vec![Trigger::Teleport { map_index: 1, target: Position::new(1, 1) }],
                    )],
                },
                MapData {
                    rows: vec!["#####".into(), "     ".into(), "#####".into()],
                    solid: "#".into(),
                    options: Vec::new(),
                },
            ],
            start_map: 0,
            player: PlayerData {
                body: vec![EntityTile::new('@', true, Position::new(1, 1))],
                max_hp: 3,
                jump_height: None,
            },
        }
    }

    #[test]
    fn test_build_level() {
        let level = sample_data().build(&GameConfig::default()).unwrap();
        assert_eq!(level.map_count(), 2);
        assert_eq!(level.active_map_index(), 0);
        assert_eq!(level.gold(), 0);
        assert_eq!(level.option_tiles().count(), 1);
        assert_eq!(level.player().stats().map(|s| s.jump_height), Some(4));
        // Spawn footprint painted
        assert_eq!(level.map().visible_tile_at(Position::new(1, 1)), Some(Tile::solid('@')));
    }

    #[test]
    fn test_build_rejects_bad_teleport() {
        let mut data = sample_data();
        data.maps[0].options[0].triggers = vec![Trigger::Teleport { map_index: 9, target: Position::ZERO }];
        let err = data.build(&GameConfig::default()).unwrap_err();
        assert!(matches!(err, LevelError::Unreadable { .. }));
        assert!(!err.is_configuration_error());
    }

    #[test]
    fn test_build_rejects_bad_start_map() {
        let mut data = sample_data();
        data.start_map = 2;
        assert!(matches!(
            data.build(&GameConfig::default()),
            Err(LevelError::Unreadable { .. })
        ));
    }

    #[test]
    fn test_build_rejects_zero_health() {
        let mut data = sample_data();
        data.player.max_hp = 0;
        assert!(matches!(
            data.build(&GameConfig::default()),
            Err(LevelError::Unreadable { .. })
        ));
    }

    #[test]
    fn test_prop_cannot_be_player() {
        let map = Map::new(3, 3, Tile::EMPTY);
        let prop = Entity::new(vec![EntityTile::new('o', true, Position::ZERO)]);
        assert!(Level::new(vec![map], 0, prop).is_err());
    }

    #[test]
    fn test_catalog_load() {
        let catalog = LevelCatalog::new(vec![sample_data()]);
        assert_eq!(catalog.level_count(), 1);
        assert!(catalog.load(0).is_ok());
        assert_eq!(catalog.load(3), Err(LevelError::NotFound { index: 3 }));
    }

    #[test]
    fn test_catalog_json_roundtrip() {
        let catalog = LevelCatalog::new(vec![sample_data()]);
        let json = serde_json::to_string(&catalog).unwrap();
        assert_eq!(LevelCatalog::from_json(&json).unwrap(), catalog);
    }

    #[test]
    fn test_catalog_bad_json() {
        let err = LevelCatalog::from_json("{ not json").unwrap_err();
        assert!(matches!(err, LevelError::Unreadable { .. }));
    }

    #[test]
    fn test_hud() {
        let mut level = sample_data().build(&GameConfig::default()).unwrap();
        level.add_gold(7);
        let hud = level.hud(2);
        assert_eq!(hud, Hud { hp: 3, max_hp: 3, gold: 7, level_index: 2, map_index: 0 });
    }

    #[test]
    fn test_error_display() {
        let err = LevelError::IndexOutOfRange { index: 5, count: 2 };
        assert_eq!(err.to_string(), "Level index 5 out of range (0..2)");
        assert!(err.is_configuration_error());
    }
}

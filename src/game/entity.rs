//! Entities
//!
//! An entity is an ordered body of `EntityTile`s plus a cached set of the
//! positions that can collide. The cache is derived from the body and is
//! rebuilt every time the body moves.

use std::collections::BTreeSet;
use serde::{Serialize, Deserialize};

use crate::core::position::Position;
use crate::game::map::Map;
use crate::game::player::PlayerStats;
use crate::game::tile::EntityTile;

/// What an entity is, beyond its footprint.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[derive(Default)]
pub enum Role {
    /// Inert footprint with no stats
    #[default]
    Prop,
    /// The controllable player
    Player(PlayerStats),
}

/// Composite of body tiles with derived colliding positions.
///
/// Not serialisable on its own: levels store the body and stats and build the
/// entity through a constructor, which keeps the cache in sync.
#[derive(Clone, Debug, PartialEq)]
pub struct Entity {
    body: Vec<EntityTile>,
    colliding_positions: BTreeSet<Position>,
    role: Role,
}

impl Entity {
    /// Create a prop entity from its body.
    pub fn new(body: Vec<EntityTile>) -> Self {
        Self::with_role(body, Role::Prop)
    }

    /// Create a player entity.
    pub fn player(body: Vec<EntityTile>, stats: PlayerStats) -> Self {
        Self::with_role(body, Role::Player(stats))
    }

    /// Create an entity with an explicit role.
    pub fn with_role(body: Vec<EntityTile>, role: Role) -> Self {
        let mut entity = Self {
            body,
            colliding_positions: BTreeSet::new(),
            role,
        };
        entity.recompute_colliding_positions();
        entity
    }

    /// Body cells in their original order.
    #[inline]
    pub fn body(&self) -> &[EntityTile] {
        &self.body
    }

    /// Positions of the collidable body cells.
    #[inline]
    pub fn colliding_positions(&self) -> &BTreeSet<Position> {
        &self.colliding_positions
    }

    /// Rebuild the colliding-position cache from the body.
    pub fn recompute_colliding_positions(&mut self) {
        self.colliding_positions = self
            .body
            .iter()
            .filter(|tile| tile.is_collidable())
            .map(|tile| tile.position())
            .collect();
    }

    /// True iff any colliding position is in `positions`.
    pub fn collides_with_positions(&self, positions: &BTreeSet<Position>) -> bool {
        // Walk the smaller set
        if self.colliding_positions.len() <= positions.len() {
            self.colliding_positions.iter().any(|p| positions.contains(p))
        } else {
            positions.iter().any(|p| self.colliding_positions.contains(p))
        }
    }

    /// True iff the two entities' colliding positions overlap.
    pub fn collides_with(&self, other: &Entity) -> bool {
        self.collides_with_positions(other.colliding_positions())
    }

    /// True iff a colliding position sits on a collidable map cell.
    pub fn collides_with_map(&self, map: &Map) -> bool {
        self.collides_with_positions(map.collidable_positions())
    }

    /// Position of the first body cell.
    ///
    /// Bodies are expected in row-major order, making this the top-left corner.
    pub fn top_left(&self) -> Option<Position> {
        self.body.first().map(|tile| tile.position())
    }

    /// Position of the last body cell (bottom-right for row-major bodies).
    pub fn bottom_right(&self) -> Option<Position> {
        self.body.last().map(|tile| tile.position())
    }

    /// Entity role.
    #[inline]
    pub fn role(&self) -> &Role {
        &self.role
    }

    /// Player stats, if this is a player.
    pub fn stats(&self) -> Option<&PlayerStats> {
        match &self.role {
            Role::Player(stats) => Some(stats),
            Role::Prop => None,
        }
    }

    /// Mutable player stats, if this is a player.
    pub fn stats_mut(&mut self) -> Option<&mut PlayerStats> {
        match &mut self.role {
            Role::Player(stats) => Some(stats),
            Role::Prop => None,
        }
    }

    /// Shift every body cell by `direction`.
    ///
    /// Only `movement::commit_move` and `place_at` call this, so the map's
    /// footprint is always re-diffed afterwards.
    pub(crate) fn translate(&mut self, direction: Position) {
        for tile in &mut self.body {
            let moved = tile.position() + direction;
            tile.set_position(moved);
        }
        self.recompute_colliding_positions();
    }

    /// Move the body so its first cell lands on `anchor`, keeping its shape.
    pub(crate) fn place_at(&mut self, anchor: Position) {
        if let Some(top_left) = self.top_left() {
            self.translate(anchor - top_left);
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::tile::Tile;

    fn block(x: i32, y: i32, w: i32, h: i32) -> Entity {
        let mut body = Vec::new();
        for dy in 0..h {
            for dx in 0..w {
                body.push(EntityTile::new('o', true, Position::new(x + dx, y + dy)));
            }
        }
        Entity::new(body)
    }

    #[test]
    fn test_colliding_positions_skip_open_cells() {
        let entity = Entity::new(vec![
            EntityTile::new('@', true, Position::new(1, 1)),
            EntityTile::new('~', false, Position::new(2, 1)),
            EntityTile::new('@', true, Position::new(1, 2)),
        ]);

        let expected: BTreeSet<_> = [Position::new(1, 1), Position::new(1, 2)].into();
        assert_eq!(entity.colliding_positions(), &expected);
    }

    #[test]
    fn test_translate_recomputes_cache() {
        let mut entity = block(0, 0, 2, 1);
        entity.translate(Position::new(3, 4));

        let expected: BTreeSet<_> = [Position::new(3, 4), Position::new(4, 4)].into();
        assert_eq!(entity.colliding_positions(), &expected);
        assert_eq!(entity.top_left(), Some(Position::new(3, 4)));
        assert_eq!(entity.bottom_right(), Some(Position::new(4, 4)));
    }

    #[test]
    fn test_place_at_keeps_shape() {
        let mut entity = block(5, 5, 2, 2);
        entity.place_at(Position::new(0, 1));

        let positions: Vec<_> = entity.body().iter().map(|t| t.position()).collect();
        assert_eq!(
            positions,
            vec![
                Position::new(0, 1),
                Position::new(1, 1),
                Position::new(0, 2),
                Position::new(1, 2),
            ]
        );
    }

    #[test]
    fn test_entity_collision() {
        let a = block(0, 0, 2, 2);
        let b = block(1, 1, 2, 2);
        let c = block(5, 5, 1, 1);

        assert!(a.collides_with(&b));
        assert!(b.collides_with(&a));
        assert!(!a.collides_with(&c));
        assert!(!c.collides_with(&a));
    }

    #[test]
    fn test_open_cells_never_collide() {
        let ghost = Entity::new(vec![EntityTile::new('~', false, Position::new(0, 0))]);
        let solid = block(0, 0, 1, 1);
        assert!(!ghost.collides_with(&solid));
        assert!(!solid.collides_with(&ghost));
    }

    #[test]
    fn test_collides_with_map() {
        let map = Map::from_rows(&["   ", " # ", "   "], |c| c == '#');
        assert!(block(1, 1, 1, 1).collides_with_map(&map));
        assert!(block(0, 0, 2, 2).collides_with_map(&map));
        assert!(!block(0, 0, 1, 1).collides_with_map(&map));
        assert_eq!(map.static_tile_at(Position::new(1, 1)), Some(Tile::solid('#')));
    }

    #[test]
    fn test_prop_has_no_stats() {
        let mut entity = block(0, 0, 1, 1);
        assert!(entity.stats().is_none());
        assert!(entity.stats_mut().is_none());
        assert_eq!(entity.role(), &Role::Prop);
    }

    #[test]
    fn test_empty_body() {
        let mut entity = Entity::new(Vec::new());
        assert!(entity.colliding_positions().is_empty());
        assert_eq!(entity.top_left(), None);
        entity.place_at(Position::new(3, 3));
        assert!(entity.body().is_empty());
    }
}

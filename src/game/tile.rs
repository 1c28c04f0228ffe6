//! Tiles
//!
//! A `Tile` is what a grid cell looks like and whether it blocks movement.
//! An `EntityTile` is a tile pinned to an absolute grid position; entities
//! are built from them.

use serde::{Serialize, Deserialize};
use crate::core::position::Position;

/// Static grid-cell descriptor.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Tile {
    /// Glyph the renderer draws for this cell
    pub symbol: char,
    /// Does this cell block movement?
    pub collidable: bool,
}

impl Tile {
    /// Empty, walkable cell.
    pub const EMPTY: Self = Self { symbol: ' ', collidable: false };

    /// Create a tile.
    pub const fn new(symbol: char, collidable: bool) -> Self {
        Self { symbol, collidable }
    }

    /// Create a blocking tile.
    pub const fn solid(symbol: char) -> Self {
        Self::new(symbol, true)
    }

    /// Create a non-blocking tile.
    pub const fn open(symbol: char) -> Self {
        Self::new(symbol, false)
    }
}

impl Default for Tile {
    fn default() -> Self {
        Self::EMPTY
    }
}

/// One cell of an entity's body.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EntityTile {
    /// Appearance and collidability
    pub tile: Tile,
    /// Absolute grid position
    position: Position,
}

impl EntityTile {
    /// Create a body cell at `position`.
    pub const fn new(symbol: char, collidable: bool, position: Position) -> Self {
        Self {
            tile: Tile::new(symbol, collidable),
            position,
        }
    }

    /// Current grid position.
    #[inline]
    pub fn position(&self) -> Position {
        self.position
    }

    /// Glyph of this cell.
    #[inline]
    pub fn symbol(&self) -> char {
        self.tile.symbol
    }

    /// Does this cell block / get blocked?
    #[inline]
    pub fn is_collidable(&self) -> bool {
        self.tile.collidable
    }

    /// Only the owning entity moves its cells.
    #[inline]
    pub(crate) fn set_position(&mut self, position: Position) {
        self.position = position;
    }
}

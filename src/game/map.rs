//! Tile Map
//!
//! Authoritative grid of static tiles plus an occupancy overlay recording
//! which cells a moving entity currently covers. Collision queries only
//! ever look at the static layer.

use std::collections::{BTreeMap, BTreeSet};
use serde::{Serialize, Deserialize};
use tracing::trace;

use crate::core::position::Position;
use crate::game::tile::{EntityTile, Tile};
use crate::game::trigger::{OptionTile, TriggerKind};

/// A cell whose visible tile changed, for the renderer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellChange {
    /// Grid position
    pub position: Position,
    /// Tile now visible there
    pub tile: Tile,
}

/// Grid of tiles with bounds, collision queries and footprint diffing.
#[derive(Clone, Debug, PartialEq)]
pub struct Map {
    width: i32,
    height: i32,
    /// Static level geometry, row-major
    tiles: Vec<Tile>,
    /// Entity occupancy overlay, row-major
    occupants: Vec<Option<Tile>>,
    /// Cached positions of collidable static tiles
    collidable: BTreeSet<Position>,
    /// Option tiles by position
    options: BTreeMap<Position, OptionTile>,
}

impl Map {
    /// Create a `width` x `height` map filled with `fill`.
    pub fn new(width: i32, height: i32, fill: Tile) -> Self {
        let width = width.max(0);
        let height = height.max(0);
        let cells = (width as usize) * (height as usize);
        let mut map = Self {
            width,
            height,
            tiles: vec![fill; cells],
            occupants: vec![None; cells],
            collidable: BTreeSet::new(),
            options: BTreeMap::new(),
        };
        map.rebuild_collidable();
        map
    }

    /// Build a map from character rows.
    ///
    /// Width is the longest row; shorter rows are padded with empty cells.
    /// `is_collidable` decides which symbols block movement.
    pub fn from_rows<I, S, F>(rows: I, is_collidable: F) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
        F: Fn(char) -> bool,
    {
        let rows: Vec<Vec<char>> = rows
            .into_iter()
            .map(|row| row.as_ref().chars().collect())
            .collect();
        let width = rows.iter().map(Vec::len).max().unwrap_or(0) as i32;
        let height = rows.len() as i32;

        let mut map = Self::new(width, height, Tile::EMPTY);
        for (y, row) in rows.iter().enumerate() {
            for (x, symbol) in row.iter().enumerate() {
                let index = y * width as usize + x;
                map.tiles[index] = Tile::new(*symbol, is_collidable(*symbol));
            }
        }
        map.rebuild_collidable();
        map
    }

    /// Grid width in cells.
    #[inline]
    pub fn width(&self) -> i32 {
        self.width
    }

    /// Grid height in cells.
    #[inline]
    pub fn height(&self) -> i32 {
        self.height
    }

    /// Is `pos` on the grid?
    #[inline]
    pub fn in_bounds(&self, pos: Position) -> bool {
        pos.x >= 0 && pos.y >= 0 && pos.x < self.width && pos.y < self.height
    }

    /// Are all of `positions` on the grid?
    pub fn all_in_bounds<I>(&self, positions: I) -> bool
    where
        I: IntoIterator<Item = Position>,
    {
        positions.into_iter().all(|pos| self.in_bounds(pos))
    }

    fn index(&self, pos: Position) -> Option<usize> {
        if self.in_bounds(pos) {
            Some(pos.y as usize * self.width as usize + pos.x as usize)
        } else {
            None
        }
    }

    /// Static tile at `pos`, ignoring occupancy.
    pub fn static_tile_at(&self, pos: Position) -> Option<Tile> {
        self.index(pos).map(|i| self.tiles[i])
    }

    /// What a renderer should show at `pos`: the occupant if any, else the static tile.
    pub fn visible_tile_at(&self, pos: Position) -> Option<Tile> {
        self.index(pos).map(|i| self.occupants[i].unwrap_or(self.tiles[i]))
    }

    /// Is some entity painted on `pos`?
    pub fn is_occupied(&self, pos: Position) -> bool {
        self.index(pos).is_some_and(|i| self.occupants[i].is_some())
    }

    /// Is the static tile at `pos` collidable? Off-grid reads as open.
    pub fn is_collidable_at(&self, pos: Position) -> bool {
        self.collidable.contains(&pos)
    }

    /// All collidable static cells.
    #[inline]
    pub fn collidable_positions(&self) -> &BTreeSet<Position> {
        &self.collidable
    }

    /// True iff any of `positions` is an in-bounds collidable cell.
    pub fn collides_with(&self, positions: &BTreeSet<Position>) -> bool {
        positions.iter().any(|pos| self.is_collidable_at(*pos))
    }

    /// Permanently replace the static tile at `pos`. Off-grid writes are ignored.
    ///
    /// Returns the change a renderer should see, if the cell is not hidden
    /// under an occupant.
    pub fn set_tile_at(&mut self, pos: Position, tile: Tile) -> Option<CellChange> {
        let index = self.index(pos)?;
        self.tiles[index] = tile;
        if tile.collidable {
            self.collidable.insert(pos);
        } else {
            self.collidable.remove(&pos);
        }

        if self.occupants[index].is_some() {
            None
        } else {
            Some(CellChange { position: pos, tile })
        }
    }

    /// Change only the symbol at `pos`, keeping its collidability.
    pub fn set_symbol_at(&mut self, pos: Position, symbol: char) -> Option<CellChange> {
        let current = self.static_tile_at(pos)?;
        self.set_tile_at(pos, Tile::new(symbol, current.collidable))
    }

    /// Diff an entity's footprint from `old_body` to `new_body`.
    ///
    /// Cells left behind show their static tile again; every new cell shows
    /// the entity's tile. Off-grid cells are skipped. Returns the cells whose
    /// visible tile was (re)written.
    pub fn update_footprint(
        &mut self,
        old_body: &[EntityTile],
        new_body: &[EntityTile],
    ) -> Vec<CellChange> {
        let new_positions: BTreeSet<Position> =
            new_body.iter().map(|tile| tile.position()).collect();
        let mut changes = Vec::with_capacity(old_body.len() + new_body.len());

        for old in old_body {
            let pos = old.position();
            if new_positions.contains(&pos) {
                continue;
            }
            if let Some(index) = self.index(pos) {
                self.occupants[index] = None;
                changes.push(CellChange { position: pos, tile: self.tiles[index] });
            }
        }

        for new in new_body {
            let pos = new.position();
            if let Some(index) = self.index(pos) {
                self.occupants[index] = Some(new.tile);
                changes.push(CellChange { position: pos, tile: new.tile });
            }
        }

        #[cfg(feature = "debug-tracing")]
        trace!(changed = changes.len(), "Footprint diff");

        changes
    }

    // =========================================================================
    // Option tiles
    // =========================================================================

    /// Attach an option tile. Triggers merge with any already at that position.
    pub fn add_option_tile(&mut self, option: OptionTile) {
        match self.options.get_mut(&option.position) {
            Some(existing) => existing.triggers.extend(option.triggers),
            None => {
                self.options.insert(option.position, option);
            }
        }
    }

    /// Active option tiles in position order.
    pub fn option_tiles(&self) -> impl Iterator<Item = &OptionTile> {
        self.options.values()
    }

    /// Option tile at `pos`, if any.
    pub fn option_tile_at(&self, pos: Position) -> Option<&OptionTile> {
        self.options.get(&pos)
    }

    /// Remove every trigger of `kind` at `pos`. Empty option tiles are dropped.
    pub fn remove_trigger_at(&mut self, pos: Position, kind: TriggerKind) {
        if let Some(option) = self.options.get_mut(&pos) {
            option.triggers.retain(|trigger| trigger.kind() != kind);
            if option.triggers.is_empty() {
                self.options.remove(&pos);
                trace!(%pos, "Option tile exhausted");
            }
        }
    }

    /// Static symbols as rows, for debugging and tests.
    pub fn static_rows(&self) -> Vec<String> {
        self.tiles
            .chunks(self.width.max(1) as usize)
            .map(|row| row.iter().map(|tile| tile.symbol).collect())
            .collect()
    }

    fn rebuild_collidable(&mut self) {
        let width = self.width.max(1) as usize;
        self.collidable = self
            .tiles
            .iter()
            .enumerate()
            .filter(|(_, tile)| tile.collidable)
            .map(|(i, _)| Position::new((i % width) as i32, (i / width) as i32))
            .collect();
    }
}

// =============================================================================
// TESTS
// =============================================================================

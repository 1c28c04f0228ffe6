//! Renderer Contract
//!
//! The simulation never draws. After each tick it hands a renderer the cells
//! that changed plus the HUD scalars; a renderer that wants the whole grid
//! reads it from the map.

use serde::{Serialize, Deserialize};

use crate::core::position::Position;
use crate::game::map::{CellChange, Map};

/// HUD scalars for the renderer.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hud {
    /// Current health
    pub hp: u32,
    /// Maximum health
    pub max_hp: u32,
    /// Gold collected in this level
    pub gold: u32,
    /// Level index
    pub level_index: usize,
    /// Active map index
    pub map_index: usize,
}

/// What changed during one tick.
#[derive(Clone, Copy, Debug)]
pub struct RenderFrame<'a> {
    /// Tick number
    pub tick: u32,
    /// Cells to redraw
    pub changes: &'a [CellChange],
    /// HUD after the tick
    pub hud: Hud,
}

/// Display collaborator.
pub trait Renderer {
    /// Draw a whole map (after load or a map switch).
    fn draw_level(&mut self, map: &Map, hud: &Hud);

    /// Draw the incremental changes of one tick.
    fn draw_frame(&mut self, frame: &RenderFrame<'_>);
}

/// Renders every visible tile into text rows.
///
/// Useful for logs and tests; keeps the latest grid and redraws changed
/// cells in place.
#[derive(Clone, Debug, Default)]
pub struct TextRenderer {
    rows: Vec<Vec<char>>,
    hud: Hud,
    frames: u32,
}

impl TextRenderer {
    /// Create an empty renderer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current grid as strings.
    pub fn rows(&self) -> Vec<String> {
        self.rows.iter().map(|row| row.iter().collect()).collect()
    }

    /// Last HUD received.
    pub fn hud(&self) -> Hud {
        self.hud
    }

    /// Frames drawn since the last full redraw.
    pub fn frames(&self) -> u32 {
        self.frames
    }
}

impl Renderer for TextRenderer {
    fn draw_level(&mut self, map: &Map, hud: &Hud) {
        self.rows = (0..map.height())
            .map(|y| {
                (0..map.width())
                    .map(|x| {
                        map.visible_tile_at(Position::new(x, y))
                            .map(|tile| tile.symbol)
                            .unwrap_or(' ')
                    })
                    .collect()
            })
            .collect();
        self.hud = *hud;
        self.frames = 0;
    }

    fn draw_frame(&mut self, frame: &RenderFrame<'_>) {
        for change in frame.changes {
            let (x, y) = (change.position.x, change.position.y);
            if x < 0 || y < 0 {
                continue;
            }
            if let Some(cell) = self
                .rows
                .get_mut(y as usize)
                .and_then(|row| row.get_mut(x as usize))
            {
                *cell = change.tile.symbol;
            }
        }
        self.hud = frame.hud;
        self.frames += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::tile::{EntityTile, Tile};

    #[test]
    fn test_text_renderer_tracks_changes() {
        let mut map = Map::from_rows(&["   ", "###"], |c| c == '#');
        let body = [EntityTile::new('@', true, Position::new(0, 0))];
        map.update_footprint(&[], &body);

        let mut renderer = TextRenderer::new();
        renderer.draw_level(&map, &Hud::default());
        assert_eq!(renderer.rows(), vec!["@  ".to_string(), "###".to_string()]);

        let moved = [EntityTile::new('@', true, Position::new(1, 0))];
        let changes = map.update_footprint(&body, &moved);
        let hud = Hud { hp: 2, ..Hud::default() };
        renderer.draw_frame(&RenderFrame { tick: 1, changes: &changes, hud });

        assert_eq!(renderer.rows(), vec![" @ ".to_string(), "###".to_string()]);
        assert_eq!(renderer.hud().hp, 2);
        assert_eq!(renderer.frames(), 1);
    }

    #[test]
    fn test_off_grid_changes_ignored() {
        let mut renderer = TextRenderer::new();
        renderer.draw_level(&Map::new(2, 1, Tile::EMPTY), &Hud::default());
        let changes = [
            CellChange { position: Position::new(-1, 0), tile: Tile::solid('x') },
            CellChange { position: Position::new(5, 0), tile: Tile::solid('x') },
        ];
        renderer.draw_frame(&RenderFrame { tick: 1, changes: &changes, hud: Hud::default() });
        assert_eq!(renderer.rows(), vec!["  ".to_string()]);
    }
}

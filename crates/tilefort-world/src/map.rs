//! The fixed-size tile grid.

use serde::{Deserialize, Serialize};

use crate::{Position, Tile};

/// A width×height grid of tiles. Dimensions are immutable after
/// generation; tile contents mutate in place.
///
/// Serialized as `{width, height, cells[y][x]}` — this is the map
/// snapshot sent to clients verbatim on join or explicit request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TileMap {
    width: i32,
    height: i32,
    cells: Vec<Vec<Tile>>,
}

impl TileMap {
    /// Builds a map from pre-generated rows. `cells[y][x]` indexing.
    ///
    /// Only [`MapGenerator`](crate::MapGenerator) and tests construct
    /// maps directly.
    pub fn from_cells(cells: Vec<Vec<Tile>>) -> Self {
        let height = cells.len() as i32;
        let width = cells.first().map_or(0, |row| row.len() as i32);
        Self {
            width,
            height,
            cells,
        }
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    /// The map's center — the fixed default spawn coordinate.
    pub fn center(&self) -> Position {
        Position::new(self.width / 2, self.height / 2)
    }

    /// Whether a position lies within `[0,width)×[0,height)`.
    pub fn in_bounds(&self, pos: Position) -> bool {
        pos.x >= 0 && pos.x < self.width && pos.y >= 0 && pos.y < self.height
    }

    /// The tile at `pos`, or `None` when out of bounds.
    pub fn tile(&self, pos: Position) -> Option<&Tile> {
        if !self.in_bounds(pos) {
            return None;
        }
        Some(&self.cells[pos.y as usize][pos.x as usize])
    }

    /// Mutable access to the tile at `pos`.
    pub fn tile_mut(&mut self, pos: Position) -> Option<&mut Tile> {
        if !self.in_bounds(pos) {
            return None;
        }
        Some(&mut self.cells[pos.y as usize][pos.x as usize])
    }

    /// Replaces the tile at `pos`. Out-of-bounds writes are ignored —
    /// callers are expected to have validated the coordinate.
    pub fn set(&mut self, pos: Position, tile: Tile) {
        if self.in_bounds(pos) {
            self.cells[pos.y as usize][pos.x as usize] = tile;
        }
    }

    /// Whether the tile at `pos` exists and is passable (grass).
    pub fn is_passable(&self, pos: Position) -> bool {
        self.tile(pos).is_some_and(|t| t.kind.is_passable())
    }
}

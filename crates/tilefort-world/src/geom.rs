//! Grid coordinates and cardinal movement.

use serde::{Deserialize, Serialize};

/// A position on the tile grid.
///
/// Signed so that `Direction::offset` can step past the map edge and let
/// the bounds check reject the result, rather than wrapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    /// Creates a position from coordinates.
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Manhattan distance to another position.
    pub fn manhattan(&self, other: &Position) -> i32 {
        (self.x - other.x).abs() + (self.y - other.y).abs()
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// The four cardinal movement directions.
///
/// Serialized lowercase (`"up"`, `"down"`, ...) to match the wire format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// All four directions, for uniform random picks.
    pub const ALL: [Direction; 4] =
        [Self::Up, Self::Down, Self::Left, Self::Right];

    /// The destination one step from `pos` in this direction.
    ///
    /// Pure — no bounds knowledge. Callers validate the result against
    /// the map.
    pub fn offset(self, pos: Position) -> Position {
        match self {
            Self::Up => Position::new(pos.x, pos.y - 1),
            Self::Down => Position::new(pos.x, pos.y + 1),
            Self::Left => Position::new(pos.x - 1, pos.y),
            Self::Right => Position::new(pos.x + 1, pos.y),
        }
    }
}

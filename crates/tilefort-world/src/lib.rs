//! World model for Tilefort: tiles, items, and the map grid.
//!
//! This is the leaf crate of the workspace — everything else builds on
//! these types. It knows nothing about rooms, players, or networking.
//!
//! # Key types
//!
//! - [`TileKind`] / [`Tile`] — one grid cell with destructible durability
//! - [`TileMap`] — the fixed-size grid, border forced solid
//! - [`MapGenerator`] — weighted-random interior fill
//! - [`Item`] / [`ToolKind`] — inventory keys and the mining efficiency table
//! - [`Position`] / [`Direction`] — grid coordinates and cardinal movement

mod generate;
mod geom;
mod items;
mod map;
mod tile;

pub use generate::MapGenerator;
pub use geom::{Direction, Position};
pub use items::{ArmorSet, ArmorSlot, Item, ToolKind};
pub use map::TileMap;
pub use tile::{Tile, TileKind};

//! Tile kinds and the destructible-durability cell type.

use serde::{Deserialize, Serialize};

use crate::Item;

/// The terrain/block kinds a grid cell can hold.
///
/// Grass is the unique passable kind — everything else blocks movement
/// and can support a placed block directly above it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TileKind {
    Grass,
    Tree,
    Stone,
    IronOre,
    Diamond,
    BarbedWire,
    WoodenFence,
}

impl TileKind {
    /// Fixed durability profile: how many hit points a fresh tile of this
    /// kind has before it converts to grass.
    pub fn durability(self) -> u32 {
        match self {
            Self::Grass => 1,
            Self::Tree => 3,
            Self::Stone => 5,
            Self::IronOre => 8,
            Self::Diamond => 12,
            Self::BarbedWire => 2,
            Self::WoodenFence => 2,
        }
    }

    /// Whether players and monsters can stand on this kind.
    pub fn is_passable(self) -> bool {
        matches!(self, Self::Grass)
    }

    /// Whether a block may be placed on the cell directly above a tile of
    /// this kind.
    pub fn is_supporting(self) -> bool {
        matches!(
            self,
            Self::Grass | Self::Stone | Self::Tree | Self::IronOre | Self::Diamond
        )
    }

    /// Whether this kind is in the placement allow-list.
    pub fn is_placeable(self) -> bool {
        !matches!(self, Self::Grass)
    }

    /// The inventory resource gained when a tile of this kind is destroyed,
    /// and consumed when one is placed. Grass yields nothing.
    pub fn resource(self) -> Option<Item> {
        match self {
            Self::Grass => None,
            Self::Tree => Some(Item::Tree),
            Self::Stone => Some(Item::Stone),
            Self::IronOre => Some(Item::Iron),
            Self::Diamond => Some(Item::Diamond),
            Self::BarbedWire => Some(Item::BarbedWire),
            Self::WoodenFence => Some(Item::WoodenFence),
        }
    }

    /// Inclusive range of resources dropped when a tile of this kind is
    /// fully mined.
    pub fn drop_range(self) -> std::ops::RangeInclusive<u32> {
        match self {
            Self::Grass => 0..=0,
            Self::Tree => 2..=4,
            Self::Stone => 2..=3,
            Self::IronOre | Self::Diamond => 1..=1,
            Self::BarbedWire | Self::WoodenFence => 1..=1,
        }
    }
}

/// One grid cell: a kind plus its remaining durability.
///
/// Field names are camelCase on the wire — the map snapshot is sent to
/// clients verbatim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tile {
    #[serde(rename = "type")]
    pub kind: TileKind,
    pub max_durability: u32,
    pub current_durability: u32,
    /// Derived: `(max - current) / max`, kept in sync by the mining
    /// resolver so clients can render progress without recomputing.
    pub mining_progress: f32,
    pub resource_yield: u32,
}

impl Tile {
    /// A fresh tile of `kind` with its full durability profile.
    pub fn new(kind: TileKind, resource_yield: u32) -> Self {
        let durability = kind.durability();
        Self {
            kind,
            max_durability: durability,
            current_durability: durability,
            mining_progress: 0.0,
            resource_yield,
        }
    }

    /// A passable grass tile (the result of fully mining anything).
    pub fn grass() -> Self {
        Self::new(TileKind::Grass, 0)
    }

    /// Repairs a tile whose durability state is missing or inconsistent.
    ///
    /// Tiles created by older snapshots or edited in place may carry a
    /// zero max durability; mining initializes them lazily so placed and
    /// generated tiles are handled uniformly.
    pub fn ensure_durability(&mut self) {
        if self.max_durability == 0 {
            self.max_durability = self.kind.durability();
            self.current_durability = self.max_durability;
            self.mining_progress = 0.0;
        }
        if self.current_durability > self.max_durability {
            self.current_durability = self.max_durability;
        }
    }
}

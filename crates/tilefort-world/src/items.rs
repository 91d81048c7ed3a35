//! Inventory items, tools, and armor.
//!
//! All game balance tables live here as plain match expressions: the
//! mining efficiency table, trade costs, and armor health bonuses. They
//! are fixed data, not configuration.

use serde::{Deserialize, Serialize};

use crate::TileKind;

/// Everything that can sit in a player's inventory.
///
/// Resources come from mining and monster drops; craftables come from
/// the trade table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Item {
    // Resources
    Tree,
    Stone,
    Iron,
    Diamond,
    Beef,
    BarbedWire,
    WoodenFence,
    // Tools
    WoodenPickaxe,
    StonePickaxe,
    IronPickaxe,
    DiamondPickaxe,
    IronAxe,
    DiamondAxe,
    IronSword,
    DiamondSword,
    // Armor
    IronHelmet,
    IronChestplate,
    IronLeggings,
    IronBoots,
    DiamondHelmet,
    DiamondChestplate,
    DiamondLeggings,
    DiamondBoots,
}

impl Item {
    /// Trade cost for craftable items: `(material, amount)`.
    /// `None` for raw resources — they cannot be traded for.
    pub fn trade_cost(self) -> Option<(Item, u32)> {
        match self {
            Self::WoodenPickaxe => Some((Item::Tree, 5)),
            Self::StonePickaxe => Some((Item::Stone, 5)),
            Self::IronPickaxe => Some((Item::Iron, 5)),
            Self::DiamondPickaxe => Some((Item::Diamond, 5)),
            Self::IronSword => Some((Item::Iron, 4)),
            Self::DiamondSword => Some((Item::Diamond, 4)),
            Self::IronAxe => Some((Item::Iron, 4)),
            Self::DiamondAxe => Some((Item::Diamond, 4)),
            Self::IronHelmet => Some((Item::Iron, 5)),
            Self::IronChestplate => Some((Item::Iron, 8)),
            Self::IronLeggings => Some((Item::Iron, 7)),
            Self::IronBoots => Some((Item::Iron, 4)),
            Self::DiamondHelmet => Some((Item::Diamond, 5)),
            Self::DiamondChestplate => Some((Item::Diamond, 8)),
            Self::DiamondLeggings => Some((Item::Diamond, 7)),
            Self::DiamondBoots => Some((Item::Diamond, 4)),
            Self::BarbedWire => Some((Item::Iron, 5)),
            Self::WoodenFence => Some((Item::Tree, 5)),
            _ => None,
        }
    }

    /// Which armor slot this item occupies, if it is armor.
    pub fn armor_slot(self) -> Option<ArmorSlot> {
        match self {
            Self::IronHelmet | Self::DiamondHelmet => Some(ArmorSlot::Helmet),
            Self::IronChestplate | Self::DiamondChestplate => {
                Some(ArmorSlot::Chest)
            }
            Self::IronLeggings | Self::DiamondLeggings => {
                Some(ArmorSlot::Leggings)
            }
            Self::IronBoots | Self::DiamondBoots => Some(ArmorSlot::Boots),
            _ => None,
        }
    }

    /// Max-health bonus granted while this armor piece is equipped.
    pub fn armor_bonus(self) -> f32 {
        match self {
            Self::IronHelmet => 2.0,
            Self::IronChestplate => 4.0,
            Self::IronLeggings => 3.0,
            Self::IronBoots => 1.0,
            Self::DiamondHelmet => 4.0,
            Self::DiamondChestplate => 7.0,
            Self::DiamondLeggings => 6.0,
            Self::DiamondBoots => 3.0,
            _ => 0.0,
        }
    }
}

/// The tool a player mines with. `Hand` is the default when no tool is
/// selected.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "snake_case")]
pub enum ToolKind {
    #[default]
    Hand,
    WoodenPickaxe,
    StonePickaxe,
    IronPickaxe,
    DiamondPickaxe,
    IronAxe,
    DiamondAxe,
    IronSword,
    DiamondSword,
}

impl ToolKind {
    /// Durability removed per hit against a tile kind.
    ///
    /// An entry of 0 means the tool cannot affect that kind at all and
    /// the mining attempt is rejected outright. Grass is 0 for every
    /// tool — it is already the floor.
    pub fn efficiency(self, kind: TileKind) -> u32 {
        use TileKind::*;
        match self {
            Self::Hand => match kind {
                Tree | BarbedWire | WoodenFence => 1,
                _ => 0,
            },
            Self::WoodenPickaxe => match kind {
                Tree => 1,
                Stone => 2,
                IronOre => 1,
                Diamond => 0,
                BarbedWire => 2,
                WoodenFence => 1,
                Grass => 0,
            },
            Self::StonePickaxe => match kind {
                Tree => 1,
                Stone => 4,
                IronOre => 2,
                Diamond => 1,
                BarbedWire => 4,
                WoodenFence => 2,
                Grass => 0,
            },
            Self::IronPickaxe => match kind {
                Tree => 1,
                Stone => 6,
                IronOre => 6,
                Diamond => 4,
                BarbedWire => 6,
                WoodenFence => 3,
                Grass => 0,
            },
            Self::DiamondPickaxe => match kind {
                Tree => 1,
                Stone => 12,
                IronOre => 12,
                Diamond => 8,
                BarbedWire => 12,
                WoodenFence => 6,
                Grass => 0,
            },
            Self::IronAxe => match kind {
                Tree | WoodenFence => 6,
                _ => 0,
            },
            Self::DiamondAxe => match kind {
                Tree | WoodenFence => 12,
                _ => 0,
            },
            Self::IronSword => match kind {
                Tree | Stone | IronOre => 1,
                BarbedWire => 3,
                WoodenFence => 2,
                _ => 0,
            },
            Self::DiamondSword => match kind {
                Tree | Stone | IronOre => 1,
                BarbedWire => 6,
                WoodenFence => 4,
                _ => 0,
            },
        }
    }
}

/// The four fixed armor slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArmorSlot {
    Helmet,
    Chest,
    Leggings,
    Boots,
}

/// A player's equipped armor: one optional piece per slot.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ArmorSet {
    pub helmet: Option<Item>,
    pub chest: Option<Item>,
    pub leggings: Option<Item>,
    pub boots: Option<Item>,
}

impl ArmorSet {
    /// The piece currently in `slot`.
    pub fn get(&self, slot: ArmorSlot) -> Option<Item> {
        match slot {
            ArmorSlot::Helmet => self.helmet,
            ArmorSlot::Chest => self.chest,
            ArmorSlot::Leggings => self.leggings,
            ArmorSlot::Boots => self.boots,
        }
    }

    /// Replaces the piece in `slot`, returning the displaced one.
    pub fn set(&mut self, slot: ArmorSlot, item: Option<Item>) -> Option<Item> {
        let target = match slot {
            ArmorSlot::Helmet => &mut self.helmet,
            ArmorSlot::Chest => &mut self.chest,
            ArmorSlot::Leggings => &mut self.leggings,
            ArmorSlot::Boots => &mut self.boots,
        };
        std::mem::replace(target, item)
    }

    /// Total max-health bonus from all equipped pieces.
    pub fn bonus_health(&self) -> f32 {
        [self.helmet, self.chest, self.leggings, self.boots]
            .into_iter()
            .flatten()
            .map(Item::armor_bonus)
            .sum()
    }
}

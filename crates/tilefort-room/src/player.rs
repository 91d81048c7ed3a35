//! The player roster entry: the single source of truth for player state.

use std::collections::HashMap;

use tilefort_protocol::{AccountId, PlayerId, PlayerSnapshot};
use tilefort_world::{ArmorSet, ArmorSlot, Direction, Item, Position};

/// Health every player starts with, before armor bonuses.
pub const BASE_HEALTH: f32 = 20.0;

/// The fixed palette; players are colored round-robin by join order.
pub const PLAYER_COLORS: [&str; 8] = [
    "#e74c3c", "#3498db", "#2ecc71", "#f1c40f", "#9b59b6", "#e67e22",
    "#1abc9c", "#e84393",
];

/// One player inside a room.
///
/// Owned exclusively by the room actor; everything the rest of the
/// server learns about a player comes from [`PlayerSnapshot`]s.
#[derive(Debug, Clone)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    pub account: Option<AccountId>,
    pub position: Position,
    pub direction: Direction,
    pub color: String,
    pub health: f32,
    pub score: u32,
    pub inventory: HashMap<Item, u32>,
    pub armor: ArmorSet,
    pub selected_slot: u8,
}

impl Player {
    /// A fresh player at `spawn` with full base health.
    pub fn new(
        id: PlayerId,
        name: String,
        account: Option<AccountId>,
        spawn: Position,
        color: String,
    ) -> Self {
        Self {
            id,
            name,
            account,
            position: spawn,
            direction: Direction::Down,
            color,
            health: BASE_HEALTH,
            score: 0,
            inventory: HashMap::new(),
            armor: ArmorSet::default(),
            selected_slot: 0,
        }
    }

    /// Current max health: base plus equipped armor bonuses.
    pub fn max_health(&self) -> f32 {
        BASE_HEALTH + self.armor.bonus_health()
    }

    pub fn is_dead(&self) -> bool {
        self.health <= 0.0
    }

    /// Applies damage, clamping at zero.
    pub fn take_damage(&mut self, amount: f32) {
        self.health = (self.health - amount).max(0.0);
    }

    /// Heals up to max health.
    pub fn heal(&mut self, amount: f32) {
        self.health = (self.health + amount).min(self.max_health());
    }

    /// Re-clamps health after a max-health change (armor unequipped).
    pub fn clamp_health(&mut self) {
        self.health = self.health.min(self.max_health());
    }

    pub fn add_item(&mut self, item: Item, count: u32) {
        *self.inventory.entry(item).or_insert(0) += count;
    }

    pub fn item_count(&self, item: Item) -> u32 {
        self.inventory.get(&item).copied().unwrap_or(0)
    }

    /// Removes `count` of an item. Returns `false` (no mutation) when
    /// the player holds fewer than `count`.
    pub fn remove_item(&mut self, item: Item, count: u32) -> bool {
        match self.inventory.get_mut(&item) {
            Some(held) if *held >= count => {
                *held -= count;
                if *held == 0 {
                    self.inventory.remove(&item);
                }
                true
            }
            _ => false,
        }
    }

    /// Equips an armor piece from inventory. Any displaced piece goes
    /// back to inventory. Returns `false` if the item isn't armor or
    /// isn't held.
    pub fn equip_armor(&mut self, item: Item) -> bool {
        let Some(slot) = item.armor_slot() else {
            return false;
        };
        if !self.remove_item(item, 1) {
            return false;
        }
        if let Some(displaced) = self.armor.set(slot, Some(item)) {
            self.add_item(displaced, 1);
        }
        true
    }

    /// Unequips the piece in `slot` back to inventory. Health is
    /// re-clamped against the reduced max. Returns `false` when the
    /// slot is empty.
    pub fn unequip_armor(&mut self, slot: ArmorSlot) -> bool {
        let Some(removed) = self.armor.set(slot, None) else {
            return false;
        };
        self.add_item(removed, 1);
        self.clamp_health();
        true
    }

    /// Resets the player after death: full base health at `spawn`,
    /// empty inventory and armor. Score survives — it mirrors the
    /// ledger, which is never rolled back.
    pub fn restart(&mut self, spawn: Position) {
        self.inventory.clear();
        self.armor = ArmorSet::default();
        self.health = BASE_HEALTH;
        self.position = spawn;
        self.direction = Direction::Down;
        self.selected_slot = 0;
    }

    /// The public view sent over the wire.
    pub fn snapshot(&self) -> PlayerSnapshot {
        PlayerSnapshot {
            id: self.id,
            name: self.name.clone(),
            position: self.position,
            color: self.color.clone(),
            health: self.health,
            max_health: self.max_health(),
            score: self.score,
            inventory: self.inventory.iter().map(|(&i, &n)| (i, n)).collect(),
            armor: self.armor.clone(),
            selected_slot: self.selected_slot,
        }
    }
}

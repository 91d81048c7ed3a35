//! Identity types and shared wire structures.
//!
//! Everything here crosses the wire as part of one or more events in
//! [`crate::events`], so field names follow the client's camelCase
//! convention.

use std::fmt;

use serde::{Deserialize, Serialize};
use tilefort_world::{ArmorSet, Item, Position};

/// A unique identifier for a connected player.
///
/// Assigned per connection; not stable across reconnects. Serialized as
/// a plain number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(pub u64);

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "P-{}", self.0)
    }
}

/// A room code chosen by the creating client.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoomId(pub String);

impl fmt::Display for RoomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RoomId {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

/// A unique identifier for a monster, scoped to its room.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MonsterId(pub u64);

impl fmt::Display for MonsterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "M-{}", self.0)
    }
}

/// A persistent account identity, for players who are logged in.
///
/// Guests have no account; their scores live only in the server's
/// in-memory guest ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccountId(pub u64);

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "A-{}", self.0)
    }
}

/// Who should receive an outbound event.
///
/// Game handlers return `(Recipient, ServerEvent)` pairs; the room actor
/// resolves them against its player senders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Recipient {
    /// Every player in the room.
    All,
    /// One specific player.
    Player(PlayerId),
    /// Everyone except the specified player, for "player X did a thing"
    /// broadcasts where X already knows.
    AllExcept(PlayerId),
}

/// The day/night cycle state of a room.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Day,
    Night,
}

impl Phase {
    /// The other phase.
    pub fn toggled(self) -> Self {
        match self {
            Self::Day => Self::Night,
            Self::Night => Self::Day,
        }
    }
}

/// The full public state of a player, sent on join and after any change
/// that touches health, inventory, or equipment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerSnapshot {
    pub id: PlayerId,
    pub name: String,
    pub position: Position,
    /// CSS color string assigned at join.
    pub color: String,
    pub health: f32,
    pub max_health: f32,
    pub score: u32,
    pub inventory: Vec<(Item, u32)>,
    pub armor: ArmorSet,
    pub selected_slot: u8,
}

/// The public state of a monster, sent on spawn and in bulk refreshes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonsterSnapshot {
    pub id: MonsterId,
    pub position: Position,
    pub health: i32,
    pub max_health: i32,
}

/// One row of the merged top-10 leaderboard.
///
/// `id` is a display key, not a session identity: account rows use the
/// account id, guest rows a per-connection guest key, so the client can
/// merge updates by row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RankingEntry {
    pub rank: u32,
    pub id: String,
    pub name: String,
    pub score: u32,
    pub is_guest: bool,
}

//! Client and server game events.
//!
//! Both enums are internally tagged: `{"type": "mine-block", ...}` with
//! kebab-case tags and camelCase fields, matching the browser client.
//! [`ClientEvent`] is everything the server accepts; [`ServerEvent`] is
//! everything it emits.

use serde::{Deserialize, Serialize};
use tilefort_world::{
    ArmorSlot, Direction, Item, Position, Tile, TileKind, TileMap, ToolKind,
};

use crate::types::{
    AccountId, MonsterId, MonsterSnapshot, Phase, PlayerId, PlayerSnapshot,
    RankingEntry, RoomId,
};

/// Every event a client may send.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case", rename_all_fields = "camelCase")]
pub enum ClientEvent {
    /// Create a room with the given code. Joining is a separate
    /// `join-room` that follows the `room-created` reply.
    CreateRoom { room_id: RoomId },

    /// Join an existing room. `account` is present for logged-in
    /// players; guests omit it.
    JoinRoom {
        room_id: RoomId,
        display_name: String,
        #[serde(default)]
        account: Option<AccountId>,
    },

    /// Step one tile in a cardinal direction.
    MovePlayer { direction: Direction },

    /// Hit the tile at `(x, y)` with a tool. A missing `tool` means
    /// bare hands.
    MineBlock {
        x: i32,
        y: i32,
        #[serde(default)]
        tool: ToolKind,
    },

    /// Place a block of `block` kind at `(x, y)`, consuming the matching
    /// resource from inventory.
    PlaceBlock { x: i32, y: i32, block: TileKind },

    /// Attack an adjacent monster with the selected tool.
    AttackMonster { monster_id: MonsterId },

    /// Consume a usable item (beef heals).
    UseItem { item: Item },

    /// Exchange resources for a craftable item per the trade table.
    TradeItem { item: Item },

    /// Equip an armor piece from inventory.
    EquipArmor { item: Item },

    /// Unequip the armor piece in a slot, returning it to inventory.
    UnequipArmor { slot: ArmorSlot },

    /// Select a hotbar slot (0-4).
    ChangeHotbarSlot { slot: u8 },

    /// Broadcast a chat line to the room.
    SendChatMessage { message: String },

    /// Ask for a fresh full map snapshot.
    RequestMap,

    /// Respawn after death: full health at the center spawn with a
    /// cleared inventory. Score is kept.
    RestartGame,
}

/// Every event the server may emit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case", rename_all_fields = "camelCase")]
pub enum ServerEvent {
    // -- Room lifecycle --
    RoomCreated { room_id: RoomId },
    RoomJoined {
        room_id: RoomId,
        player: PlayerSnapshot,
        phase: Phase,
    },
    RoomError { message: String },
    /// Sent to a joining player: everyone already in the room.
    ExistingPlayers { players: Vec<PlayerSnapshot> },
    PlayerJoined { player: PlayerSnapshot },
    PlayerLeft { player_id: PlayerId },
    PhaseChanged { phase: Phase },

    // -- Map --
    MapData { map: TileMap },
    /// One cell changed: mined a step, fully mined, or placed.
    BlockUpdated { x: i32, y: i32, tile: Tile },

    // -- Movement --
    PlayerMoved {
        player_id: PlayerId,
        position: Position,
        direction: Direction,
    },
    /// A rejected move; carries where the player actually is so the
    /// client can snap back.
    MoveError {
        message: String,
        current_position: Position,
    },

    // -- Mining and placement --
    MiningError { message: String },
    PlacementError { message: String },

    // -- Monsters --
    /// Full roster refresh: after a night spawn wave or the day cull.
    MonstersUpdated { monsters: Vec<MonsterSnapshot> },
    MonsterMoved {
        monster_id: MonsterId,
        position: Position,
    },
    MonsterAttacking {
        monster_id: MonsterId,
        player_id: PlayerId,
    },
    MonsterDamaged { monster_id: MonsterId, health: i32 },
    MonsterDied { monster_id: MonsterId },

    // -- Combat --
    PlayerAttackSuccess { monster_id: MonsterId, damage: i32 },
    PlayerDamaged { player_id: PlayerId, health: f32 },

    // -- Player state --
    /// Full snapshot after any inventory, health, or equipment change.
    PlayerUpdated { player: PlayerSnapshot },
    PlayerHotbarChanged { player_id: PlayerId, slot: u8 },
    PlayerRestarted { player: PlayerSnapshot },
    /// A rejected use/equip/unequip action, sent only to the actor.
    ActionError { message: String },

    // -- Trading --
    TradeSuccess { item: Item },
    TradeError { message: String },

    // -- Score and ranking --
    ScoreUpdated { player_id: PlayerId, score: u32 },
    RankingUpdated { ranking: Vec<RankingEntry> },

    // -- Chat --
    ChatMessage {
        player_id: PlayerId,
        name: String,
        message: String,
    },
    SystemMessage { message: String },
}

//! Room actors for the game server.
//!
//! A room is one independent game world: a generated map, a player
//! roster, a monster population, and a day/night clock. Each room runs
//! as a single tokio task that owns all of its state; the rest of the
//! server talks to it through a [`RoomHandle`].
//!
//! The [`RoomManager`] tracks live rooms and destroys a room when its
//! last player leaves.

pub mod combat;
mod config;
mod error;
mod manager;
pub mod mining;
mod monsters;
mod player;
mod room;
mod state;

pub use combat::{
    attack, kill_award, AttackOutcome, ScoreAward, BEEF_DROP_CHANCE,
    PLAYER_ATTACK_DAMAGE,
};
pub use config::RoomConfig;
pub use error::RoomError;
pub use manager::RoomManager;
pub use mining::{mine, place, MineOutcome, MineReject, PlaceReject};
pub use monsters::{
    DamageOutcome, Monster, MonsterManager, MONSTER_DAMAGE,
};
pub use player::{Player, BASE_HEALTH, PLAYER_COLORS};
pub use room::{
    spawn_room, LeaveOutcome, PlayerSender, RoomHandle, RoomInfo,
    DEFAULT_CHANNEL_SIZE,
};
pub use state::{Effects, GameState};

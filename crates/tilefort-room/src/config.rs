//! Per-room configuration.

use std::ops::RangeInclusive;
use std::time::Duration;

/// Tunable parameters for a room. Every room created by one manager
/// shares the same config.
#[derive(Debug, Clone)]
pub struct RoomConfig {
    /// Map dimensions in tiles.
    pub map_width: i32,
    pub map_height: i32,

    /// How long each day or night phase lasts.
    pub phase_duration: Duration,

    /// How often monsters move and attack during the night.
    pub monster_tick: Duration,

    /// How many monsters spawn at nightfall, drawn uniformly.
    pub spawn_count: RangeInclusive<u32>,

    /// Random probes per monster when looking for a free spawn tile.
    /// A crowded map can make a monster silently fail to spawn.
    pub spawn_attempts: u32,

    /// Maximum players per room.
    pub max_players: usize,
}

impl Default for RoomConfig {
    fn default() -> Self {
        Self {
            map_width: 50,
            map_height: 50,
            phase_duration: Duration::from_secs(60),
            monster_tick: Duration::from_secs(1),
            spawn_count: 5..=9,
            spawn_attempts: 50,
            max_players: 16,
        }
    }
}

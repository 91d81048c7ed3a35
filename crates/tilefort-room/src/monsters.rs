//! Monster spawning, movement, and the hit/death bookkeeping.

use std::collections::{HashMap, HashSet};
use std::ops::RangeInclusive;

use rand::seq::IndexedRandom;
use rand::Rng;
use tilefort_protocol::{MonsterId, MonsterSnapshot};
use tilefort_world::{Direction, Position, TileMap};

/// Damage a monster deals per attack tick.
pub const MONSTER_DAMAGE: f32 = 2.5;

/// One zombie. Health is rolled at spawn.
#[derive(Debug, Clone)]
pub struct Monster {
    pub id: MonsterId,
    pub position: Position,
    pub health: i32,
    pub max_health: i32,
}

impl Monster {
    pub fn snapshot(&self) -> MonsterSnapshot {
        MonsterSnapshot {
            id: self.id,
            position: self.position,
            health: self.health,
            max_health: self.max_health,
        }
    }
}

/// The result of damaging a monster.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DamageOutcome {
    pub remaining: i32,
    pub died: bool,
}

/// Owns every live monster in a room.
///
/// Invariant: a monster is in the map iff its health is positive.
/// Death removes it in the same call that drops health to zero, so a
/// second hit on a dying monster is a no-op.
#[derive(Debug, Default)]
pub struct MonsterManager {
    monsters: HashMap<MonsterId, Monster>,
    next_id: u64,
}

impl MonsterManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Spawns a nightfall wave. Each monster probes random interior
    /// tiles for a free spot; `attempts` misses means that monster
    /// silently doesn't spawn. Returns how many actually spawned.
    pub fn spawn_wave<R: Rng + ?Sized>(
        &mut self,
        map: &TileMap,
        player_positions: &HashSet<Position>,
        count: RangeInclusive<u32>,
        attempts: u32,
        rng: &mut R,
    ) -> usize {
        let wanted = rng.random_range(count);
        let mut spawned = 0;
        for _ in 0..wanted {
            if let Some(pos) = self.probe(map, player_positions, attempts, rng) {
                self.spawn_at(pos, rng);
                spawned += 1;
            }
        }
        spawned
    }

    fn probe<R: Rng + ?Sized>(
        &self,
        map: &TileMap,
        player_positions: &HashSet<Position>,
        attempts: u32,
        rng: &mut R,
    ) -> Option<Position> {
        for _ in 0..attempts {
            let pos = Position::new(
                rng.random_range(0..map.width()),
                rng.random_range(0..map.height()),
            );
            if map.is_passable(pos) && self.is_free(pos, player_positions) {
                return Some(pos);
            }
        }
        None
    }

    fn is_free(&self, pos: Position, player_positions: &HashSet<Position>) -> bool {
        !player_positions.contains(&pos)
            && !self.monsters.values().any(|m| m.position == pos)
    }

    fn spawn_at<R: Rng + ?Sized>(&mut self, pos: Position, rng: &mut R) {
        self.next_id += 1;
        let id = MonsterId(self.next_id);
        let health = rng.random_range(1..=3);
        self.monsters.insert(
            id,
            Monster {
                id,
                position: pos,
                health,
                max_health: health,
            },
        );
    }

    /// Removes every monster. Daybreak.
    pub fn clear(&mut self) {
        self.monsters.clear();
    }

    /// Moves each monster one random cardinal step. A step is accepted
    /// iff the destination is in-bounds grass with no player or monster
    /// on it; otherwise the monster stays put. Returns accepted moves.
    pub fn move_all<R: Rng + ?Sized>(
        &mut self,
        map: &TileMap,
        player_positions: &HashSet<Position>,
        rng: &mut R,
    ) -> Vec<(MonsterId, Position)> {
        let mut occupied: HashSet<Position> =
            self.monsters.values().map(|m| m.position).collect();
        let mut moves = Vec::new();

        let ids: Vec<MonsterId> = self.monsters.keys().copied().collect();
        for id in ids {
            let current = self.monsters[&id].position;
            let direction = Direction::ALL
                .choose(rng)
                .copied()
                .unwrap_or(Direction::Up);
            let dest = direction.offset(current);
            if !map.is_passable(dest)
                || player_positions.contains(&dest)
                || occupied.contains(&dest)
            {
                continue;
            }
            occupied.remove(&current);
            occupied.insert(dest);
            if let Some(monster) = self.monsters.get_mut(&id) {
                monster.position = dest;
            }
            moves.push((id, dest));
        }
        moves
    }

    /// Which players each monster can hit this tick: every
    /// (monster, target) pair within Manhattan distance 1.
    pub fn attack_targets(
        &self,
        targets: &[(tilefort_protocol::PlayerId, Position)],
    ) -> Vec<(MonsterId, tilefort_protocol::PlayerId)> {
        let mut hits = Vec::new();
        for monster in self.monsters.values() {
            for &(player, pos) in targets {
                if monster.position.manhattan(&pos) <= 1 {
                    hits.push((monster.id, player));
                }
            }
        }
        hits
    }

    /// Applies damage. Death removes the monster atomically; `None`
    /// means the id is unknown (already dead), a no-op.
    pub fn damage(&mut self, id: MonsterId, amount: i32) -> Option<DamageOutcome> {
        let monster = self.monsters.get_mut(&id)?;
        monster.health -= amount;
        if monster.health <= 0 {
            self.monsters.remove(&id);
            Some(DamageOutcome {
                remaining: 0,
                died: true,
            })
        } else {
            Some(DamageOutcome {
                remaining: self.monsters[&id].health,
                died: false,
            })
        }
    }

    pub fn get(&self, id: MonsterId) -> Option<&Monster> {
        self.monsters.get(&id)
    }

    pub fn snapshots(&self) -> Vec<MonsterSnapshot> {
        self.monsters.values().map(Monster::snapshot).collect()
    }

    pub fn len(&self) -> usize {
        self.monsters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.monsters.is_empty()
    }
}

//! Player-versus-monster combat and the score bridge.

use rand::Rng;
use tilefort_protocol::{AccountId, MonsterId, PlayerId};
use tilefort_ranking::KILL_SCORE;
use tilefort_world::Item;

use crate::{MonsterManager, Player};

/// Damage a player deals per attack.
pub const PLAYER_ATTACK_DAMAGE: i32 = 1;

/// Chance a killed monster drops beef for the killer.
pub const BEEF_DROP_CHANCE: f64 = 0.5;

/// A pending score award, handed off to the ranking layer.
///
/// Carries everything the async award task needs so the room actor
/// doesn't have to be consulted again until the result comes back.
#[derive(Debug, Clone)]
pub struct ScoreAward {
    pub player: PlayerId,
    pub name: String,
    pub account: Option<AccountId>,
    pub delta: u32,
}

/// What one attack did.
#[derive(Debug, Clone, PartialEq)]
pub enum AttackOutcome {
    /// The monster survived with this much health.
    Hit { remaining: i32 },
    /// The monster died. `beef` says whether it dropped beef (already
    /// added to the attacker's inventory); the award still needs to go
    /// through the ranking layer.
    Kill { beef: bool },
    /// Unknown monster id: already dead or never existed. No-op.
    NotFound,
}

/// Resolves an attack-monster action.
///
/// Damage is fixed; on a kill the beef drop is rolled and the killer's
/// inventory updated in place. Score is NOT applied here: the caller
/// builds a [`ScoreAward`] and routes it through the ranking layer.
pub fn attack<R: Rng + ?Sized>(
    monsters: &mut MonsterManager,
    attacker: &mut Player,
    monster_id: MonsterId,
    rng: &mut R,
) -> AttackOutcome {
    let Some(outcome) = monsters.damage(monster_id, PLAYER_ATTACK_DAMAGE) else {
        return AttackOutcome::NotFound;
    };
    if !outcome.died {
        return AttackOutcome::Hit {
            remaining: outcome.remaining,
        };
    }

    let beef = rng.random_bool(BEEF_DROP_CHANCE);
    if beef {
        attacker.add_item(Item::Beef, 1);
    }
    AttackOutcome::Kill { beef }
}

/// The award for one kill by `player`.
pub fn kill_award(player: &Player) -> ScoreAward {
    ScoreAward {
        player: player.id,
        name: player.name.clone(),
        account: player.account,
        delta: KILL_SCORE,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::PLAYER_COLORS;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use tilefort_world::Position;

    fn rng(seed: u64) -> StdRng {
        StdRng::seed_from_u64(seed)
    }

    fn attacker() -> Player {
        Player::new(
            PlayerId(1),
            "Alice".into(),
            None,
            Position::new(5, 5),
            PLAYER_COLORS[0].into(),
        )
    }

    fn spawn_one(seed: u64) -> (MonsterManager, MonsterId, i32) {
        let mut monsters = MonsterManager::new();
        let map = tilefort_world::MapGenerator::new(20, 20)
            .generate(&mut rng(seed));
        monsters.spawn_wave(
            &map,
            &std::collections::HashSet::new(),
            1..=1,
            50,
            &mut rng(seed),
        );
        let snap = monsters.snapshots().pop().expect("one monster");
        (monsters, snap.id, snap.health)
    }

    #[test]
    fn test_attack_whittles_health_then_kills() {
        let (mut monsters, id, health) = spawn_one(3);
        let mut p = attacker();
        let mut r = rng(4);

        for expected in (1..health).rev() {
            let outcome = attack(&mut monsters, &mut p, id, &mut r);
            assert_eq!(outcome, AttackOutcome::Hit { remaining: expected });
        }

        let last = attack(&mut monsters, &mut p, id, &mut r);
        assert!(matches!(last, AttackOutcome::Kill { .. }));
        assert!(monsters.get(id).is_none());
    }

    #[test]
    fn test_attack_dead_monster_is_noop() {
        let (mut monsters, id, health) = spawn_one(5);
        let mut p = attacker();
        let mut r = rng(6);
        for _ in 0..health {
            attack(&mut monsters, &mut p, id, &mut r);
        }

        let outcome = attack(&mut monsters, &mut p, id, &mut r);
        assert_eq!(outcome, AttackOutcome::NotFound);
    }

    #[test]
    fn test_kill_sometimes_drops_beef() {
        // Over many seeded kills both branches of the 50% roll appear.
        let mut dropped = 0;
        let mut skipped = 0;
        for seed in 0..40 {
            let (mut monsters, id, health) = spawn_one(seed);
            let mut p = attacker();
            let mut r = rng(seed + 1000);
            for _ in 0..health {
                attack(&mut monsters, &mut p, id, &mut r);
            }
            if p.item_count(Item::Beef) > 0 {
                dropped += 1;
            } else {
                skipped += 1;
            }
        }
        assert!(dropped > 0, "beef never dropped across 40 kills");
        assert!(skipped > 0, "beef always dropped across 40 kills");
    }

    #[test]
    fn test_kill_award_carries_identity_and_delta() {
        let mut p = attacker();
        p.account = Some(AccountId(7));

        let award = kill_award(&p);
        assert_eq!(award.player, PlayerId(1));
        assert_eq!(award.account, Some(AccountId(7)));
        assert_eq!(award.delta, KILL_SCORE);
        assert_eq!(award.name, "Alice");
    }
}

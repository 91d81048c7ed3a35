//! The in-memory guest score ledger.

use std::collections::HashMap;

use tilefort_protocol::PlayerId;

/// One guest's score.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuestScore {
    pub player: PlayerId,
    pub name: String,
    pub score: u32,
}

/// Scores for players without an account.
///
/// Guests never touch the persistent store; their scores live in this
/// ledger for the lifetime of the process, so a guest's kills stay on
/// the board after they disconnect.
#[derive(Debug, Default)]
pub struct GuestLedger {
    scores: HashMap<PlayerId, (String, u32)>,
}

impl GuestLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `delta` to a guest's score and returns the new total.
    pub fn award(&mut self, player: PlayerId, name: &str, delta: u32) -> u32 {
        let entry = self
            .scores
            .entry(player)
            .or_insert_with(|| (name.to_owned(), 0));
        entry.1 += delta;
        entry.1
    }

    /// All guest scores, unordered.
    pub fn entries(&self) -> Vec<GuestScore> {
        self.scores
            .iter()
            .map(|(&player, (name, score))| GuestScore {
                player,
                name: name.clone(),
                score: *score,
            })
            .collect()
    }
}

//! The merged leaderboard facade.

use std::sync::Mutex;

use tilefort_protocol::{AccountId, PlayerId, RankingEntry};

use crate::{GuestLedger, RankingError, ScoreStore};

/// Points awarded per monster kill.
pub const KILL_SCORE: u32 = 10;

/// Rows in the published leaderboard.
pub const RANKING_SIZE: usize = 10;

/// Awards scores and produces the published top-10.
///
/// One `Ranking` is shared by the whole server behind an `Arc`. Account
/// awards go through the [`ScoreStore`]; guest awards land in the
/// in-process [`GuestLedger`]. The published leaderboard is the two
/// sources merged, sorted by score descending, cut to
/// [`RANKING_SIZE`] rows.
#[derive(Debug)]
pub struct Ranking<S> {
    store: S,
    guests: Mutex<GuestLedger>,
}

impl<S: ScoreStore> Ranking<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            guests: Mutex::new(GuestLedger::new()),
        }
    }

    /// Awards points to a guest. Synchronous: the ledger is in-process.
    /// Returns the guest's new total.
    pub fn award_guest(&self, player: PlayerId, name: &str, delta: u32) -> u32 {
        match self.guests.lock() {
            Ok(mut guests) => guests.award(player, name, delta),
            Err(poisoned) => poisoned.into_inner().award(player, name, delta),
        }
    }

    /// Awards points to a logged-in account and returns the new
    /// persisted total.
    ///
    /// # Errors
    /// Returns [`RankingError::Store`] if persistence fails. The caller
    /// drops the award and keeps playing.
    pub async fn award_account(
        &self,
        account: AccountId,
        name: &str,
        delta: u32,
    ) -> Result<u32, RankingError> {
        self.store.add_score(account, name, delta).await
    }

    /// The published leaderboard: persistent top rows merged with every
    /// guest, re-sorted, cut to [`RANKING_SIZE`].
    ///
    /// # Errors
    /// Returns [`RankingError::Store`] if the store read fails; guest
    /// scores alone are never published in that case, so clients don't
    /// see accounts vanish from the board.
    pub async fn top(&self) -> Result<Vec<RankingEntry>, RankingError> {
        let accounts = self.store.read_top(RANKING_SIZE).await?;

        let mut rows: Vec<RankingEntry> = accounts
            .into_iter()
            .map(|a| RankingEntry {
                rank: 0,
                id: a.account.to_string(),
                name: a.name,
                score: a.score,
                is_guest: false,
            })
            .collect();

        let guest_entries = match self.guests.lock() {
            Ok(guests) => guests.entries(),
            Err(poisoned) => poisoned.into_inner().entries(),
        };
        rows.extend(guest_entries.into_iter().map(|g| RankingEntry {
            rank: 0,
            id: format!("guest-{}", g.player),
            name: g.name,
            score: g.score,
            is_guest: true,
        }));

        rows.sort_by(|a, b| b.score.cmp(&a.score));
        rows.truncate(RANKING_SIZE);
        for (i, row) in rows.iter_mut().enumerate() {
            row.rank = (i + 1) as u32;
        }
        Ok(rows)
    }
}

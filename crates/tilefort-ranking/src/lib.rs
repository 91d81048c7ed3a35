//! Score and leaderboard layer for Tilefort.
//!
//! Kills earn [`KILL_SCORE`] points. Logged-in accounts persist through
//! a [`ScoreStore`]; guests score into an in-process [`GuestLedger`].
//! [`Ranking`] merges both into the top-10 board clients render.
//!
//! Store I/O is async and failure-tolerant: rooms award scores from
//! spawned tasks and a store outage only costs the persistence, never
//! the game.

mod error;
mod ledger;
mod ranking;
mod store;

pub use error::RankingError;
pub use ledger::{GuestLedger, GuestScore};
pub use ranking::{Ranking, KILL_SCORE, RANKING_SIZE};
pub use store::{AccountScore, InMemoryScoreStore, ScoreStore};

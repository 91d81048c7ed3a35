//! Persistent score storage for logged-in accounts.

use std::collections::HashMap;
use std::future::Future;
use std::sync::Mutex;

use tilefort_protocol::AccountId;

use crate::RankingError;

/// One account's persisted score.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountScore {
    pub account: AccountId,
    pub name: String,
    pub score: u32,
}

/// Where account scores live between sessions.
///
/// Implementations are expected to be backed by real storage (a
/// database, a key-value service). The server holds one store shared by
/// every room and only ever calls it from spawned tasks, so store
/// latency never stalls a room's event loop.
pub trait ScoreStore: Send + Sync + 'static {
    /// Adds `delta` to an account's score, creating the record if
    /// needed, and returns the new total. `name` refreshes the display
    /// name on every write.
    fn add_score(
        &self,
        account: AccountId,
        name: &str,
        delta: u32,
    ) -> impl Future<Output = Result<u32, RankingError>> + Send;

    /// The top `limit` accounts by score, descending.
    fn read_top(
        &self,
        limit: usize,
    ) -> impl Future<Output = Result<Vec<AccountScore>, RankingError>> + Send;
}

/// A [`ScoreStore`] backed by a plain in-process map.
///
/// The default for development and tests; scores vanish on restart.
#[derive(Debug, Default)]
pub struct InMemoryScoreStore {
    scores: Mutex<HashMap<AccountId, (String, u32)>>,
}

impl InMemoryScoreStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ScoreStore for InMemoryScoreStore {
    async fn add_score(
        &self,
        account: AccountId,
        name: &str,
        delta: u32,
    ) -> Result<u32, RankingError> {
        let mut scores = self
            .scores
            .lock()
            .map_err(|e| RankingError::Store(e.to_string()))?;
        let entry = scores.entry(account).or_insert_with(|| (name.to_owned(), 0));
        entry.0 = name.to_owned();
        entry.1 += delta;
        Ok(entry.1)
    }

    async fn read_top(
        &self,
        limit: usize,
    ) -> Result<Vec<AccountScore>, RankingError> {
        let scores = self
            .scores
            .lock()
            .map_err(|e| RankingError::Store(e.to_string()))?;
        let mut top: Vec<AccountScore> = scores
            .iter()
            .map(|(&account, (name, score))| AccountScore {
                account,
                name: name.clone(),
                score: *score,
            })
            .collect();
        top.sort_by(|a, b| b.score.cmp(&a.score));
        top.truncate(limit);
        Ok(top)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_add_score_accumulates_and_returns_total() {
        let store = InMemoryScoreStore::new();
        assert_eq!(store.add_score(AccountId(1), "Alice", 10).await.unwrap(), 10);
        assert_eq!(store.add_score(AccountId(1), "Alice", 10).await.unwrap(), 20);
    }

    #[tokio::test]
    async fn test_add_score_refreshes_display_name() {
        let store = InMemoryScoreStore::new();
        store.add_score(AccountId(1), "Alice", 10).await.unwrap();
        store.add_score(AccountId(1), "Alicia", 10).await.unwrap();

        let top = store.read_top(10).await.unwrap();
        assert_eq!(top[0].name, "Alicia");
    }

    #[tokio::test]
    async fn test_read_top_sorts_descending_and_truncates() {
        let store = InMemoryScoreStore::new();
        store.add_score(AccountId(1), "low", 10).await.unwrap();
        store.add_score(AccountId(2), "high", 50).await.unwrap();
        store.add_score(AccountId(3), "mid", 30).await.unwrap();

        let top = store.read_top(2).await.unwrap();
        assert_eq!(top.len(), 2);
        assert_eq!(top[0].name, "high");
        assert_eq!(top[1].name, "mid");
    }

    #[tokio::test]
    async fn test_read_top_of_empty_store_is_empty() {
        let store = InMemoryScoreStore::new();
        assert!(store.read_top(10).await.unwrap().is_empty());
    }
}

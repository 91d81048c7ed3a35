//! Error types for the ranking layer.

/// Errors that can occur while reading or writing scores.
#[derive(Debug, thiserror::Error)]
pub enum RankingError {
    /// The backing score store failed or is unreachable. Gameplay is
    /// never blocked on this; the award is simply not persisted.
    #[error("score store unavailable: {0}")]
    Store(String),
}

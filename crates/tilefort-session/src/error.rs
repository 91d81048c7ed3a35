//! Error types for the session layer.

use tilefort_protocol::PlayerId;

/// Errors that can occur while tracking player sessions.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// No session exists for the given player.
    #[error("session not found for player {0}")]
    NotFound(PlayerId),

    /// The player already has an active session. One connection, one
    /// session.
    #[error("player {0} already has an active session")]
    AlreadyConnected(PlayerId),

    /// The player is already in a room and must leave it first.
    #[error("player {0} is already in a room")]
    AlreadyInRoom(PlayerId),

    /// The player sent a room-scoped event while not in any room.
    #[error("player {0} is not in a room")]
    NotInRoom(PlayerId),
}

//! Error types for the room layer.

use tilefort_protocol::{PlayerId, RoomId};

/// Errors that can occur during room management.
#[derive(Debug, thiserror::Error)]
pub enum RoomError {
    /// No room exists with the given id.
    #[error("room {0} not found")]
    NotFound(RoomId),

    /// A room with the given id already exists. Room codes are
    /// client-chosen, so collisions are a user error, not a bug.
    #[error("room {0} already exists")]
    AlreadyExists(RoomId),

    /// The room's actor task is gone (shutting down or crashed).
    #[error("room {0} is unavailable")]
    Unavailable(RoomId),

    /// The room is at its player capacity.
    #[error("room {0} is full")]
    RoomFull(RoomId),

    /// The player is already in this room.
    #[error("player {0} is already in room {1}")]
    AlreadyInRoom(PlayerId, RoomId),

    /// The player is not in the room they addressed.
    #[error("player {0} is not in the room")]
    NotInRoom(PlayerId),
}

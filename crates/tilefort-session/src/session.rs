//! The per-connection session record.

use tilefort_protocol::{AccountId, PlayerId, RoomId};

/// The server's record of one connected player.
///
/// A session exists exactly as long as the underlying connection. There
/// is no reconnection grace period: a dropped connection removes the
/// player from their room, and a returning client joins fresh.
#[derive(Debug, Clone)]
pub struct Session {
    /// Which player this session belongs to.
    pub player_id: PlayerId,

    /// The persistent account bound at join time, if the player is
    /// logged in. Guests stay `None` and score only into the room's
    /// guest ledger.
    pub account: Option<AccountId>,

    /// The room the player currently occupies, if any. Kept in sync by
    /// [`SessionRegistry`](crate::SessionRegistry) so room-scoped
    /// events can be routed without asking every room.
    pub room: Option<RoomId>,
}

impl Session {
    /// A fresh session for a newly accepted connection.
    pub fn new(player_id: PlayerId) -> Self {
        Self {
            player_id,
            account: None,
            room: None,
        }
    }
}

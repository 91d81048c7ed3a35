//! The session registry: tracks every connected player and where they are.
//!
//! # Concurrency note
//!
//! `SessionRegistry` is NOT thread-safe by itself — it uses a plain
//! `HashMap`. The server wraps it in a mutex at a higher level; keeping
//! it synchronous here avoids hidden locking.

use std::collections::HashMap;

use tilefort_protocol::{AccountId, PlayerId, RoomId};

use crate::{Session, SessionError};

/// Tracks all active sessions, keyed by player ID.
///
/// The registry answers two questions the connection handler asks on
/// every inbound event: "which room is this player in?" and "which
/// account do they play as?". Room membership itself is owned by the
/// rooms; this is the routing index.
#[derive(Debug, Default)]
pub struct SessionRegistry {
    sessions: HashMap<PlayerId, Session>,
}

impl SessionRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a session for a newly accepted connection.
    ///
    /// # Errors
    /// Returns [`SessionError::AlreadyConnected`] if the player already
    /// has a session.
    pub fn connect(&mut self, player_id: PlayerId) -> Result<(), SessionError> {
        if self.sessions.contains_key(&player_id) {
            return Err(SessionError::AlreadyConnected(player_id));
        }
        self.sessions.insert(player_id, Session::new(player_id));
        tracing::info!(%player_id, "session opened");
        Ok(())
    }

    /// Removes a player's session, returning it so the caller can tear
    /// down room membership.
    ///
    /// # Errors
    /// Returns [`SessionError::NotFound`] if no session exists.
    pub fn disconnect(
        &mut self,
        player_id: PlayerId,
    ) -> Result<Session, SessionError> {
        let session = self
            .sessions
            .remove(&player_id)
            .ok_or(SessionError::NotFound(player_id))?;
        tracing::info!(%player_id, "session closed");
        Ok(session)
    }

    /// Records that a player entered a room, binding their account at
    /// the same time.
    ///
    /// # Errors
    /// - [`SessionError::NotFound`] — no session for this player
    /// - [`SessionError::AlreadyInRoom`] — must leave the current room
    ///   first
    pub fn enter_room(
        &mut self,
        player_id: PlayerId,
        room: RoomId,
        account: Option<AccountId>,
    ) -> Result<(), SessionError> {
        let session = self
            .sessions
            .get_mut(&player_id)
            .ok_or(SessionError::NotFound(player_id))?;
        if session.room.is_some() {
            return Err(SessionError::AlreadyInRoom(player_id));
        }
        session.room = Some(room);
        session.account = account;
        Ok(())
    }

    /// Clears a player's room membership, returning the room they left.
    ///
    /// # Errors
    /// - [`SessionError::NotFound`] — no session for this player
    /// - [`SessionError::NotInRoom`] — nothing to leave
    pub fn leave_room(
        &mut self,
        player_id: PlayerId,
    ) -> Result<RoomId, SessionError> {
        let session = self
            .sessions
            .get_mut(&player_id)
            .ok_or(SessionError::NotFound(player_id))?;
        session
            .room
            .take()
            .ok_or(SessionError::NotInRoom(player_id))
    }

    /// The room a player currently occupies.
    pub fn room_of(&self, player_id: PlayerId) -> Option<&RoomId> {
        self.sessions.get(&player_id)?.room.as_ref()
    }

    /// The account a player is bound to, if logged in.
    pub fn account_of(&self, player_id: PlayerId) -> Option<AccountId> {
        self.sessions.get(&player_id)?.account
    }

    /// Looks up a session by player ID.
    pub fn get(&self, player_id: PlayerId) -> Option<&Session> {
        self.sessions.get(&player_id)
    }

    /// Number of active sessions.
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pid(id: u64) -> PlayerId {
        PlayerId(id)
    }

    fn room(code: &str) -> RoomId {
        RoomId::from(code)
    }

    #[test]
    fn test_connect_new_player_creates_session() {
        let mut reg = SessionRegistry::new();
        reg.connect(pid(1)).unwrap();

        let session = reg.get(pid(1)).expect("session should exist");
        assert_eq!(session.player_id, pid(1));
        assert!(session.room.is_none());
        assert!(session.account.is_none());
    }

    #[test]
    fn test_connect_duplicate_returns_already_connected() {
        let mut reg = SessionRegistry::new();
        reg.connect(pid(1)).unwrap();

        let result = reg.connect(pid(1));
        assert!(
            matches!(result, Err(SessionError::AlreadyConnected(p)) if p == pid(1))
        );
    }

    #[test]
    fn test_disconnect_returns_session_with_room() {
        let mut reg = SessionRegistry::new();
        reg.connect(pid(1)).unwrap();
        reg.enter_room(pid(1), room("cave"), None).unwrap();

        let session = reg.disconnect(pid(1)).unwrap();
        assert_eq!(session.room, Some(room("cave")));
        assert!(reg.get(pid(1)).is_none());
    }

    #[test]
    fn test_disconnect_unknown_player_returns_not_found() {
        let mut reg = SessionRegistry::new();
        let result = reg.disconnect(pid(99));
        assert!(matches!(result, Err(SessionError::NotFound(p)) if p == pid(99)));
    }

    #[test]
    fn test_enter_room_binds_account() {
        let mut reg = SessionRegistry::new();
        reg.connect(pid(1)).unwrap();
        reg.enter_room(pid(1), room("cave"), Some(AccountId(7)))
            .unwrap();

        assert_eq!(reg.room_of(pid(1)), Some(&room("cave")));
        assert_eq!(reg.account_of(pid(1)), Some(AccountId(7)));
    }

    #[test]
    fn test_enter_room_twice_returns_already_in_room() {
        let mut reg = SessionRegistry::new();
        reg.connect(pid(1)).unwrap();
        reg.enter_room(pid(1), room("cave"), None).unwrap();

        let result = reg.enter_room(pid(1), room("mine"), None);
        assert!(
            matches!(result, Err(SessionError::AlreadyInRoom(p)) if p == pid(1))
        );
        // Original membership is untouched.
        assert_eq!(reg.room_of(pid(1)), Some(&room("cave")));
    }

    #[test]
    fn test_leave_room_clears_membership() {
        let mut reg = SessionRegistry::new();
        reg.connect(pid(1)).unwrap();
        reg.enter_room(pid(1), room("cave"), None).unwrap();

        let left = reg.leave_room(pid(1)).unwrap();
        assert_eq!(left, room("cave"));
        assert!(reg.room_of(pid(1)).is_none());
    }

    #[test]
    fn test_leave_room_without_room_returns_not_in_room() {
        let mut reg = SessionRegistry::new();
        reg.connect(pid(1)).unwrap();

        let result = reg.leave_room(pid(1));
        assert!(matches!(result, Err(SessionError::NotInRoom(p)) if p == pid(1)));
    }

    #[test]
    fn test_room_of_unknown_player_is_none() {
        let reg = SessionRegistry::new();
        assert!(reg.room_of(pid(99)).is_none());
        assert!(reg.account_of(pid(99)).is_none());
    }

    #[test]
    fn test_len_tracks_session_count() {
        let mut reg = SessionRegistry::new();
        assert!(reg.is_empty());

        reg.connect(pid(1)).unwrap();
        reg.connect(pid(2)).unwrap();
        assert_eq!(reg.len(), 2);

        reg.disconnect(pid(1)).unwrap();
        assert_eq!(reg.len(), 1);
    }

    #[test]
    fn test_players_have_independent_membership() {
        let mut reg = SessionRegistry::new();
        reg.connect(pid(1)).unwrap();
        reg.connect(pid(2)).unwrap();
        reg.enter_room(pid(1), room("cave"), None).unwrap();
        reg.enter_room(pid(2), room("mine"), Some(AccountId(3)))
            .unwrap();

        reg.leave_room(pid(1)).unwrap();

        assert!(reg.room_of(pid(1)).is_none());
        assert_eq!(reg.room_of(pid(2)), Some(&room("mine")));
        assert_eq!(reg.account_of(pid(2)), Some(AccountId(3)));
    }
}

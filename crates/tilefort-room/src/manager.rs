//! Room lifecycle: create, route into, and destroy room actors.

use std::collections::HashMap;
use std::sync::Arc;

use tilefort_protocol::{AccountId, ClientEvent, PlayerId, RoomId};
use tilefort_ranking::{Ranking, ScoreStore};

use crate::room::{spawn_room, PlayerSender, RoomHandle};
use crate::{RoomConfig, RoomError};

/// Owns the map of live rooms and enforces creation/destruction rules.
///
/// The manager does not track which room a player is in; the session
/// layer holds that index and passes the room id in with every call.
pub struct RoomManager<S: ScoreStore> {
    rooms: HashMap<RoomId, RoomHandle>,
    ranking: Arc<Ranking<S>>,
    config: RoomConfig,
}

impl<S: ScoreStore> RoomManager<S> {
    pub fn new(ranking: Arc<Ranking<S>>, config: RoomConfig) -> Self {
        Self {
            rooms: HashMap::new(),
            ranking,
            config,
        }
    }

    pub fn room_count(&self) -> usize {
        self.rooms.len()
    }

    pub fn contains(&self, room_id: &RoomId) -> bool {
        self.rooms.contains_key(room_id)
    }

    /// Creates an empty room with a client-chosen id.
    pub fn create_room(&mut self, room_id: RoomId) -> Result<(), RoomError> {
        if self.rooms.contains_key(&room_id) {
            return Err(RoomError::AlreadyExists(room_id));
        }
        let handle = spawn_room(
            room_id.clone(),
            self.config.clone(),
            Arc::clone(&self.ranking),
        );
        self.rooms.insert(room_id.clone(), handle);
        tracing::info!(%room_id, rooms = self.rooms.len(), "room created");
        Ok(())
    }

    /// Adds a player to an existing room.
    pub async fn join_room(
        &self,
        room_id: &RoomId,
        player_id: PlayerId,
        name: String,
        account: Option<AccountId>,
        sender: PlayerSender,
    ) -> Result<(), RoomError> {
        let handle = self.handle(room_id)?;
        handle.join(player_id, name, account, sender).await
    }

    /// Removes a player from a room, destroying the room if it was the
    /// last one out.
    pub async fn leave_room(
        &mut self,
        room_id: &RoomId,
        player_id: PlayerId,
    ) -> Result<(), RoomError> {
        let handle = self.handle(room_id)?;
        let outcome = handle.leave(player_id).await?;
        if outcome.now_empty {
            if let Some(handle) = self.rooms.remove(room_id) {
                handle.shutdown().await;
                tracing::info!(
                    %room_id,
                    rooms = self.rooms.len(),
                    "empty room destroyed"
                );
            }
        }
        Ok(())
    }

    /// Forwards a gameplay event to the player's room.
    pub async fn route_event(
        &self,
        room_id: &RoomId,
        player_id: PlayerId,
        event: ClientEvent,
    ) -> Result<(), RoomError> {
        let handle = self.handle(room_id)?;
        handle.send_event(player_id, event).await
    }

    fn handle(&self, room_id: &RoomId) -> Result<&RoomHandle, RoomError> {
        self.rooms
            .get(room_id)
            .ok_or_else(|| RoomError::NotFound(room_id.clone()))
    }
}

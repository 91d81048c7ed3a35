//! Per-connection handler: one task per WebSocket client.
//!
//! The handler owns both directions of the connection. Inbound frames
//! decode to [`ClientEvent`]s and route through the session registry to
//! the player's room; outbound [`ServerEvent`]s arrive on an unbounded
//! channel that the player's room holds the sending half of.

use std::sync::Arc;

use tokio::sync::mpsc;

use tilefort_protocol::{
    ClientEvent, Codec, PlayerId, ProtocolError, ServerEvent,
};
use tilefort_ranking::ScoreStore;
use tilefort_transport::{Connection, WebSocketConnection};

use crate::server::ServerState;
use crate::TilefortError;

/// Drop guard that tears down the player's session when the handler
/// exits, including on panic. `Drop` is synchronous, so the async
/// cleanup runs in a fire-and-forget task.
struct SessionGuard<S: ScoreStore> {
    player_id: PlayerId,
    state: Arc<ServerState<S>>,
}

impl<S: ScoreStore> Drop for SessionGuard<S> {
    fn drop(&mut self) {
        let player_id = self.player_id;
        let state = Arc::clone(&self.state);
        tokio::spawn(async move {
            cleanup(player_id, &state).await;
        });
    }
}

/// Removes the session and, if the player was in a room, leaves it.
async fn cleanup<S: ScoreStore>(player_id: PlayerId, state: &ServerState<S>) {
    let session = {
        let mut sessions = state.sessions.lock().await;
        match sessions.disconnect(player_id) {
            Ok(session) => session,
            Err(e) => {
                tracing::debug!(%player_id, error = %e, "disconnect cleanup skipped");
                return;
            }
        }
    };
    if let Some(room_id) = session.room {
        let mut rooms = state.rooms.lock().await;
        if let Err(e) = rooms.leave_room(&room_id, player_id).await {
            tracing::warn!(%player_id, %room_id, error = %e, "room leave on disconnect failed");
        }
    }
}

/// Handles one connection from accept to close.
pub(crate) async fn handle_connection<S: ScoreStore>(
    conn: WebSocketConnection,
    state: Arc<ServerState<S>>,
) -> Result<(), TilefortError> {
    // Connection ids are process-unique, so they double as player ids.
    let player_id = PlayerId(conn.id().into_inner());
    tracing::debug!(%player_id, "handling new connection");

    {
        let mut sessions = state.sessions.lock().await;
        sessions.connect(player_id)?;
    }
    let _guard = SessionGuard {
        player_id,
        state: Arc::clone(&state),
    };

    // The room pushes events for this player into `outbound_tx`; this
    // task is the only writer to the socket.
    let (outbound_tx, mut outbound_rx) = mpsc::unbounded_channel::<ServerEvent>();

    loop {
        tokio::select! {
            incoming = conn.recv() => {
                match incoming {
                    Ok(Some(text)) => {
                        handle_frame(&conn, &state, player_id, &text, &outbound_tx)
                            .await?;
                    }
                    Ok(None) => {
                        tracing::info!(%player_id, "connection closed cleanly");
                        break;
                    }
                    Err(e) => {
                        tracing::debug!(%player_id, error = %e, "recv error");
                        break;
                    }
                }
            }
            event = outbound_rx.recv() => {
                match event {
                    Some(event) => send_event(&conn, &state.codec, &event).await?,
                    // Room side dropped the sender; the player was
                    // removed from the room out from under us.
                    None => break,
                }
            }
        }
    }

    Ok(())
}

/// Decodes and dispatches one inbound frame. Malformed frames are
/// logged and dropped rather than killing the connection.
async fn handle_frame<S: ScoreStore>(
    conn: &WebSocketConnection,
    state: &Arc<ServerState<S>>,
    player_id: PlayerId,
    text: &str,
    outbound_tx: &mpsc::UnboundedSender<ServerEvent>,
) -> Result<(), TilefortError> {
    let event: ClientEvent = match state.codec.decode(text.as_bytes()) {
        Ok(event) => event,
        Err(e) => {
            tracing::debug!(%player_id, error = %e, "undecodable frame");
            return Ok(());
        }
    };

    match event {
        ClientEvent::CreateRoom { room_id } => {
            let result = {
                let mut rooms = state.rooms.lock().await;
                rooms.create_room(room_id.clone())
            };
            let reply = match result {
                Ok(()) => ServerEvent::RoomCreated { room_id },
                Err(e) => ServerEvent::RoomError {
                    message: e.to_string(),
                },
            };
            send_event(conn, &state.codec, &reply).await?;
        }

        ClientEvent::JoinRoom {
            room_id,
            display_name,
            account,
        } => {
            // Sessions lock first, rooms second (the global order).
            // Membership is recorded only after the room accepts.
            let mut sessions = state.sessions.lock().await;
            if sessions.room_of(player_id).is_some() {
                drop(sessions);
                send_event(
                    conn,
                    &state.codec,
                    &ServerEvent::RoomError {
                        message: "already in a room".into(),
                    },
                )
                .await?;
                return Ok(());
            }

            let join_result = {
                let rooms = state.rooms.lock().await;
                rooms
                    .join_room(
                        &room_id,
                        player_id,
                        display_name,
                        account,
                        outbound_tx.clone(),
                    )
                    .await
            };
            match join_result {
                Ok(()) => {
                    sessions.enter_room(player_id, room_id, account)?;
                }
                Err(e) => {
                    drop(sessions);
                    send_event(
                        conn,
                        &state.codec,
                        &ServerEvent::RoomError {
                            message: e.to_string(),
                        },
                    )
                    .await?;
                }
            }
        }

        event => {
            let room_id = {
                let sessions = state.sessions.lock().await;
                sessions.room_of(player_id).cloned()
            };
            let Some(room_id) = room_id else {
                send_event(
                    conn,
                    &state.codec,
                    &ServerEvent::RoomError {
                        message: "not in a room".into(),
                    },
                )
                .await?;
                return Ok(());
            };

            let result = {
                let rooms = state.rooms.lock().await;
                rooms.route_event(&room_id, player_id, event).await
            };
            if let Err(e) = result {
                tracing::debug!(%player_id, %room_id, error = %e, "event routing failed");
                send_event(
                    conn,
                    &state.codec,
                    &ServerEvent::RoomError {
                        message: e.to_string(),
                    },
                )
                .await?;
            }
        }
    }

    Ok(())
}

/// Encodes and writes one event to the socket.
async fn send_event(
    conn: &WebSocketConnection,
    codec: &impl Codec,
    event: &ServerEvent,
) -> Result<(), TilefortError> {
    let bytes = codec.encode(event)?;
    let text = String::from_utf8(bytes)
        .map_err(|e| ProtocolError::InvalidMessage(e.to_string()))?;
    conn.send(&text).await.map_err(TilefortError::Transport)?;
    Ok(())
}

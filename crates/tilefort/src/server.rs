//! Server builder and accept loop.
//!
//! Ties the layers together: transport → protocol → session → room,
//! with the ranking layer shared across all rooms.

use std::sync::Arc;

use tokio::sync::Mutex;

use tilefort_protocol::JsonCodec;
use tilefort_ranking::{Ranking, ScoreStore};
use tilefort_room::{RoomConfig, RoomManager};
use tilefort_session::SessionRegistry;
use tilefort_transport::{Transport, WebSocketTransport};

use crate::handler::handle_connection;
use crate::TilefortError;

/// Shared server state, one per process, cloned into each connection
/// handler task behind an `Arc`.
///
/// Lock order is sessions before rooms; every handler path takes them
/// in that order.
pub(crate) struct ServerState<S: ScoreStore> {
    pub(crate) sessions: Mutex<SessionRegistry>,
    pub(crate) rooms: Mutex<RoomManager<S>>,
    pub(crate) codec: JsonCodec,
}

/// Builder for a [`TilefortServer`].
pub struct TilefortServerBuilder {
    bind_addr: String,
    room_config: RoomConfig,
}

impl TilefortServerBuilder {
    pub fn new() -> Self {
        Self {
            bind_addr: "127.0.0.1:8080".to_string(),
            room_config: RoomConfig::default(),
        }
    }

    /// Sets the listen address.
    pub fn bind(mut self, addr: &str) -> Self {
        self.bind_addr = addr.to_string();
        self
    }

    /// Overrides the configuration used for every room.
    pub fn room_config(mut self, config: RoomConfig) -> Self {
        self.room_config = config;
        self
    }

    /// Binds the transport and assembles the server around the given
    /// score store.
    pub async fn build<S: ScoreStore>(
        self,
        store: S,
    ) -> Result<TilefortServer<S>, TilefortError> {
        let transport = WebSocketTransport::bind(&self.bind_addr).await?;
        let ranking = Arc::new(Ranking::new(store));

        let state = Arc::new(ServerState {
            sessions: Mutex::new(SessionRegistry::new()),
            rooms: Mutex::new(RoomManager::new(ranking, self.room_config)),
            codec: JsonCodec,
        });

        Ok(TilefortServer { transport, state })
    }
}

impl Default for TilefortServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// A running game server. Call [`run`](Self::run) to start accepting
/// connections.
pub struct TilefortServer<S: ScoreStore> {
    transport: WebSocketTransport,
    state: Arc<ServerState<S>>,
}

impl<S: ScoreStore> TilefortServer<S> {
    pub fn builder() -> TilefortServerBuilder {
        TilefortServerBuilder::new()
    }

    /// The bound address, useful when binding to port 0 in tests.
    pub fn local_addr(&self) -> Result<std::net::SocketAddr, TilefortError> {
        Ok(self.transport.local_addr()?)
    }

    /// Runs the accept loop until the process is terminated. Each
    /// connection gets its own handler task.
    pub async fn run(mut self) -> Result<(), TilefortError> {
        tracing::info!("server running");

        loop {
            match self.transport.accept().await {
                Ok(conn) => {
                    let state = Arc::clone(&self.state);
                    tokio::spawn(async move {
                        if let Err(e) = handle_connection(conn, state).await {
                            tracing::debug!(error = %e, "connection ended with error");
                        }
                    });
                }
                Err(e) => {
                    tracing::error!(error = %e, "accept failed");
                }
            }
        }
    }
}

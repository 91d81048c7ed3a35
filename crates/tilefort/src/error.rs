//! Unified error type for the server binary.

use tilefort_protocol::ProtocolError;
use tilefort_ranking::RankingError;
use tilefort_room::RoomError;
use tilefort_session::SessionError;
use tilefort_transport::TransportError;

/// Top-level error wrapping every layer's error type.
///
/// The `#[from]` impls let connection handlers use `?` across layer
/// boundaries without manual conversions.
#[derive(Debug, thiserror::Error)]
pub enum TilefortError {
    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    #[error(transparent)]
    Session(#[from] SessionError),

    #[error(transparent)]
    Room(#[from] RoomError),

    #[error(transparent)]
    Ranking(#[from] RankingError),
}

//! # Tilefort
//!
//! Real-time multiplayer server for a tile-based survival game.
//!
//! Clients connect over WebSocket and speak JSON events. Each room is
//! an independent world: a generated 50×50 map, a day/night cycle,
//! monsters at night, and a shared leaderboard across rooms.
//!
//! ```rust,no_run
//! use tilefort::TilefortServer;
//! use tilefort_ranking::InMemoryScoreStore;
//!
//! # async fn run() -> Result<(), tilefort::TilefortError> {
//! let server = TilefortServer::<InMemoryScoreStore>::builder()
//!     .bind("0.0.0.0:8080")
//!     .build(InMemoryScoreStore::new())
//!     .await?;
//! server.run().await
//! # }
//! ```

mod error;
mod handler;
mod server;

pub use error::TilefortError;
pub use server::{TilefortServer, TilefortServerBuilder};

//! Server binary: binds the WebSocket listener and runs until killed.

use tilefort::{TilefortError, TilefortServer};
use tilefort_ranking::InMemoryScoreStore;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), TilefortError> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let addr = std::env::var("TILEFORT_ADDR")
        .unwrap_or_else(|_| "0.0.0.0:8080".to_string());

    let server = TilefortServer::<InMemoryScoreStore>::builder()
        .bind(&addr)
        .build(InMemoryScoreStore::new())
        .await?;
    server.run().await
}

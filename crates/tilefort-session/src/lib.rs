//! Session layer for Tilefort.
//!
//! Tracks who is connected and where they are:
//!
//! - [`Session`] — one connected player: identity, optional account,
//!   current room.
//! - [`SessionRegistry`] — the routing index the connection handler
//!   consults for every room-scoped event.
//! - [`SessionError`] — what can go wrong.
//!
//! Sessions live exactly as long as their connection. Room membership
//! is owned by the room layer; the registry mirrors it for routing.

mod error;
mod registry;
mod session;

pub use error::SessionError;
pub use registry::SessionRegistry;
pub use session::Session;

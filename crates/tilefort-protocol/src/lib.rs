//! Wire protocol for Tilefort.
//!
//! Defines the language clients and the server speak:
//!
//! - **Identity and shared types** ([`PlayerId`], [`RoomId`],
//!   [`PlayerSnapshot`], ...) — structures embedded in events.
//! - **Events** ([`ClientEvent`], [`ServerEvent`]) — every message that
//!   travels on the wire, tagged JSON in both directions.
//! - **Codec** ([`Codec`], [`JsonCodec`]) — how events become bytes.
//! - **Errors** ([`ProtocolError`]).
//!
//! The protocol layer sits between transport (raw bytes) and the session
//! and room layers. It knows nothing about connections or game rules.

mod codec;
mod error;
mod events;
mod types;

pub use codec::Codec;
#[cfg(feature = "json")]
pub use codec::JsonCodec;
pub use error::ProtocolError;
pub use events::{ClientEvent, ServerEvent};
pub use types::{
    AccountId, MonsterId, MonsterSnapshot, Phase, PlayerId, PlayerSnapshot,
    RankingEntry, Recipient, RoomId,
};

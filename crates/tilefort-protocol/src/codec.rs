//! Codec trait and implementations.
//!
//! The transport layer moves raw bytes; the codec turns those bytes into
//! typed events and back. [`JsonCodec`] is the only implementation today,
//! matching the browser client's JSON wire format. A binary codec can be
//! added later without touching the rest of the stack.

use serde::{de::DeserializeOwned, Serialize};

use crate::ProtocolError;

/// Converts wire messages to bytes and back.
///
/// `Send + Sync + 'static` so a single codec instance can be shared by
/// every connection task.
pub trait Codec: Send + Sync + 'static {
    /// Serializes a value into bytes.
    ///
    /// # Errors
    /// Returns [`ProtocolError::Encode`] if serialization fails.
    fn encode<T: Serialize>(&self, value: &T) -> Result<Vec<u8>, ProtocolError>;

    /// Deserializes bytes back into a value.
    ///
    /// # Errors
    /// Returns [`ProtocolError::Decode`] if the bytes are malformed or
    /// don't match the expected shape.
    fn decode<T: DeserializeOwned>(&self, data: &[u8]) -> Result<T, ProtocolError>;
}

/// A [`Codec`] backed by `serde_json`.
///
/// Human-readable, inspectable in browser DevTools, and what the client
/// expects. Behind the `json` feature flag (enabled by default).
#[cfg(feature = "json")]
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

#[cfg(feature = "json")]
impl Codec for JsonCodec {
    fn encode<T: Serialize>(&self, value: &T) -> Result<Vec<u8>, ProtocolError> {
        serde_json::to_vec(value).map_err(ProtocolError::Encode)
    }

    fn decode<T: DeserializeOwned>(&self, data: &[u8]) -> Result<T, ProtocolError> {
        serde_json::from_slice(data).map_err(ProtocolError::Decode)
    }
}

#[cfg(all(test, feature = "json"))]
mod tests {
    use super::*;
    use crate::{ClientEvent, PlayerId};
    use tilefort_world::Direction;

    #[test]
    fn test_json_codec_round_trips_client_events() {
        let codec = JsonCodec;
        let event = ClientEvent::MovePlayer {
            direction: Direction::Left,
        };
        let bytes = codec.encode(&event).unwrap();
        let decoded: ClientEvent = codec.decode(&bytes).unwrap();
        assert_eq!(event, decoded);
    }

    #[test]
    fn test_decode_garbage_returns_error() {
        let codec = JsonCodec;
        let result: Result<ClientEvent, _> = codec.decode(b"not json at all");
        assert!(matches!(result, Err(ProtocolError::Decode(_))));
    }

    #[test]
    fn test_decode_unknown_event_type_returns_error() {
        let codec = JsonCodec;
        let result: Result<ClientEvent, _> =
            codec.decode(br#"{"type": "fly-to-moon", "speed": 9000}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_encode_produces_plain_json() {
        let codec = JsonCodec;
        let bytes = codec.encode(&PlayerId(42)).unwrap();
        assert_eq!(bytes, b"42");
    }
}

//! Codec trait and implementations for serializing/deserializing events.
//!
//! The server never touches `serde_json` directly; it goes through the
//! [`Codec`] trait so the wire format stays swappable. [`JsonCodec`] is
//! the only implementation today and matches what the browser client
//! speaks.

use serde::{Serialize, de::DeserializeOwned};

use crate::ProtocolError;

/// Converts between event types and raw bytes.
///
/// `encode` accepts any `Serialize` type and `decode` any
/// `DeserializeOwned` type, so one codec instance serves both event
/// directions on both channels. `Send + Sync + 'static` because the codec
/// is shared by every connection task.
pub trait Codec: Send + Sync + 'static {
    /// Serializes a value into bytes.
    ///
    /// # Errors
    /// Returns `ProtocolError::Encode` if serialization fails.
    fn encode<T: Serialize>(
        &self,
        value: &T,
    ) -> Result<Vec<u8>, ProtocolError>;

    /// Deserializes bytes back into a value.
    ///
    /// # Errors
    /// Returns `ProtocolError::Decode` if the bytes are malformed,
    /// incomplete, or don't match the expected type. Undecodable client
    /// frames are dropped by the caller, never echoed back.
    fn decode<T: DeserializeOwned>(
        &self,
        data: &[u8],
    ) -> Result<T, ProtocolError>;
}

// ---------------------------------------------------------------------------
// JsonCodec
// ---------------------------------------------------------------------------

/// A [`Codec`] that uses JSON (via `serde_json`).
///
/// Behind the `json` feature flag (enabled by default).
///
/// ## Example
///
/// ```rust
/// use omerta_protocol::{Codec, JsonCodec, ServerEvent};
///
/// let codec = JsonCodec;
///
/// let bytes = codec.encode(&ServerEvent::Pong).unwrap();
/// assert_eq!(bytes, br#"{"type":"pong"}"#);
///
/// let decoded: ServerEvent = codec.decode(&bytes).unwrap();
/// assert_eq!(decoded, ServerEvent::Pong);
/// ```
#[cfg(feature = "json")]
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

#[cfg(feature = "json")]
impl Codec for JsonCodec {
    fn encode<T: Serialize>(
        &self,
        value: &T,
    ) -> Result<Vec<u8>, ProtocolError> {
        serde_json::to_vec(value).map_err(ProtocolError::Encode)
    }

    fn decode<T: DeserializeOwned>(
        &self,
        data: &[u8],
    ) -> Result<T, ProtocolError> {
        serde_json::from_slice(data).map_err(ProtocolError::Decode)
    }
}

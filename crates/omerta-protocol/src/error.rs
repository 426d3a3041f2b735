//! Error types for the protocol layer.
//!
//! Each crate in the workspace defines its own error enum; a
//! `ProtocolError` always means a serialization problem, never a
//! networking or game-rule one.

/// Errors that can occur in the protocol layer.
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    /// Serialization failed (turning an event into bytes).
    ///
    /// Practically unreachable for this protocol's types, but the codec
    /// seam keeps it explicit rather than panicking.
    #[cfg(feature = "json")]
    #[error("encode failed: {0}")]
    Encode(serde_json::Error),

    /// Deserialization failed (turning bytes into an event).
    ///
    /// Common causes: malformed JSON, an unknown `type` tag, missing
    /// required fields, or fields of the wrong type. The server treats
    /// every decode failure as an invalid command and drops it.
    #[cfg(feature = "json")]
    #[error("decode failed: {0}")]
    Decode(serde_json::Error),
}

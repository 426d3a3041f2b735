//! Unified error type for the Omerta server.

use omerta_protocol::ProtocolError;
use omerta_question::QuestionError;
use omerta_transport::TransportError;

/// Top-level error that wraps all crate-specific errors.
///
/// The `#[from]` attribute on each variant auto-generates `From` impls,
/// so the `?` operator converts sub-crate errors automatically. Game
/// rule refusals ([`omerta_game::GameError`]) never appear here: they
/// are logged and dropped where they happen, per the silent-rejection
/// contract.
#[derive(Debug, thiserror::Error)]
pub enum OmertaError {
    /// A transport-level error (bind, accept, send, recv).
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// A protocol-level error (encode, decode).
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// A question service configuration error. Fetch failures are not
    /// errors at this level; they turn into the fallback question.
    #[error(transparent)]
    Question(#[from] QuestionError),
}

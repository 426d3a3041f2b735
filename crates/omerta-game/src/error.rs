use omerta_protocol::{Phase, PlayerId};
use thiserror::Error;

/// Why the registry refused a command.
///
/// None of these ever reach a client. The server logs the refusal and
/// drops the command, so the variants exist for diagnostics and for
/// tests to assert on.
#[derive(Debug, Error)]
pub enum GameError {
    /// The command needs an active room and none exists.
    #[error("no active room")]
    NoRoom,

    /// The connection already holds a seat or a waiting slot.
    #[error("player {0} already joined")]
    AlreadyJoined(PlayerId),

    /// The command is not legal in the room's current phase.
    #[error("not allowed in phase {0}")]
    WrongPhase(Phase),

    /// Start was requested while a populated room is past its lobby.
    #[error("cannot start in phase {phase}, reset first")]
    StartRejected { phase: Phase },

    /// The roster is too small even after merging the waiting pool.
    #[error("need at least 3 players to start, have {have}")]
    NotEnoughPlayers { have: usize },

    /// The caller does not hold the acting role, or is dead.
    #[error("player {0} may not perform this action")]
    NotAllowed(PlayerId),

    /// The target is not a usable roster member for this action.
    #[error("invalid target {0}")]
    InvalidTarget(PlayerId),

    /// An answer arrived without a question id.
    #[error("empty question id")]
    EmptyQuestionId,

    /// A question response arrived for a round the game already left.
    #[error("stale question response")]
    StaleQuestion,
}

//! Core wire types shared by every message in the omerta protocol.
//!
//! Everything here is shaped for JSON: ids serialize as plain numbers,
//! enums as lowercase strings, and the snapshot structs use camelCase
//! keys so a browser client can consume them directly.

use serde::{Deserialize, Serialize};

use std::fmt;

use omerta_transport::ConnectionId;

// ---------------------------------------------------------------------------
// Identity types
// ---------------------------------------------------------------------------

/// A unique identifier for a player.
///
/// There is no account system: a player IS their connection, so the id is
/// minted from the transport's [`ConnectionId`] and stays stable for the
/// connection's lifetime. Newtyped so a `PlayerId` can never be confused
/// with a [`RoomId`] even though both are `u64` underneath.
///
/// `#[serde(transparent)]` keeps the JSON form a bare number: a
/// `PlayerId(42)` serializes as `42`, not `{"0":42}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(pub u64);

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "P-{}", self.0)
    }
}

impl From<ConnectionId> for PlayerId {
    fn from(id: ConnectionId) -> Self {
        Self(id.into_inner())
    }
}

/// A unique identifier for the game room.
///
/// The process hosts exactly one room at a time, but the id still travels
/// on the wire (`roomId`) so clients can tell a fresh room from the one
/// they knew before a reset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoomId(pub u64);

impl fmt::Display for RoomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "R-{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Game enums
// ---------------------------------------------------------------------------

/// The phase of the room's game loop.
///
/// Serialized lowercase (`"lobby"`, `"night"`, ...) to match the strings
/// clients branch on. The lobby is the default for a fresh room.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    /// Gathering players; the game has not started.
    #[default]
    Lobby,
    /// Night round: the godfather and doctor pick targets.
    Night,
    /// Daytime discussion between nights.
    Day,
    /// A winner was found; the room lingers until reset.
    Ended,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Lobby => write!(f, "lobby"),
            Self::Night => write!(f, "night"),
            Self::Day => write!(f, "day"),
            Self::Ended => write!(f, "ended"),
        }
    }
}

/// A player's hidden role.
///
/// Roles travel on the wire in exactly one place: the private `role_info`
/// event sent to the player who owns the role. Public snapshots never
/// carry them.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// No special powers. Every player starts here.
    #[default]
    Villager,
    /// Picks a kill target each night.
    Godfather,
    /// Picks a save target each night; a matching save nullifies the kill.
    Doctor,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Villager => write!(f, "villager"),
            Self::Godfather => write!(f, "godfather"),
            Self::Doctor => write!(f, "doctor"),
        }
    }
}

/// The winning side, reported in `night_result` once the game is decided.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Winner {
    /// All mafia are dead.
    Village,
    /// The mafia matches or outnumbers the living village.
    Mafia,
}

impl fmt::Display for Winner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Village => write!(f, "village"),
            Self::Mafia => write!(f, "mafia"),
        }
    }
}

// ---------------------------------------------------------------------------
// Public projections
// ---------------------------------------------------------------------------

/// The public view of one player inside a [`RoomSnapshot`].
///
/// Deliberately role-free: this struct is what every client sees, so the
/// hidden role must never appear here. JSON shape:
///
/// ```json
/// { "id": 3, "name": "Ana", "alive": true, "isHost": false }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerSummary {
    pub id: PlayerId,
    pub name: String,
    pub alive: bool,
    pub is_host: bool,
}

/// The full public view of the room, pushed as `room_state` after every
/// successful mutation. Always a complete recomputation, never a diff.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomSnapshot {
    pub room_id: RoomId,
    pub phase: Phase,
    pub doctor_enabled: bool,
    pub night_round: u32,
    /// Players in join order.
    pub players: Vec<PlayerSummary>,
}

/// One entry in the control channel's view of the waiting pool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WaitingPlayer {
    pub id: PlayerId,
    pub name: String,
}

/// One answer option in an `mcq_question` event.
///
/// Options cover the whole roster, dead players included, so clients can
/// render the full cast.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionOption {
    pub id: PlayerId,
    pub name: String,
    pub alive: bool,
}

// =========================================================================
// Tests
// =========================================================================

//! The event vocabulary of both channels.
//!
//! Every frame on the wire is one JSON object with a `type` tag naming the
//! event and the payload fields inlined beside it (internally tagged):
//!
//! ```json
//! { "type": "night_kill", "targetId": 7 }
//! ```
//!
//! Three enums cover the whole protocol: [`PlayerEvent`] (inbound on the
//! player channel), [`ControlCommand`] (inbound on the control channel)
//! and [`ServerEvent`] (outbound on either). A frame whose tag or fields
//! do not match is a decode error, which the server drops silently; no
//! error event exists in this protocol.

use serde::{Deserialize, Serialize};

use crate::types::{
    Phase, PlayerId, QuestionOption, Role, RoomId, RoomSnapshot,
    WaitingPlayer, Winner,
};

// ---------------------------------------------------------------------------
// Inbound: player channel
// ---------------------------------------------------------------------------

/// Events a participant may send.
///
/// Tags are snake_case, payload fields camelCase, matching what the
/// browser client emits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    tag = "type",
    rename_all = "snake_case",
    rename_all_fields = "camelCase"
)]
pub enum PlayerEvent {
    /// Enter the game. An absent or empty name gets a default later.
    Join {
        #[serde(default)]
        name: String,
    },
    /// Godfather only, at night: mark `targetId` for the kill.
    NightKill { target_id: PlayerId },
    /// Doctor only, at night: mark `targetId` for the save.
    NightSave { target_id: PlayerId },
    /// Answer the current side question. The id is echoed from
    /// `mcq_question` but never matched against it.
    McqAnswer {
        question_id: String,
        target_id: PlayerId,
    },
    /// Liveness probe; answered with [`ServerEvent::Pong`].
    Ping,
}

// ---------------------------------------------------------------------------
// Inbound: control channel
// ---------------------------------------------------------------------------

/// Commands the game-master client may send.
///
/// The `control_` prefix is part of the wire contract, hence the explicit
/// renames.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    tag = "type",
    rename_all = "snake_case",
    rename_all_fields = "camelCase"
)]
pub enum ControlCommand {
    /// Toggle whether the next game includes a doctor.
    #[serde(rename = "control_set_doctor_enabled")]
    SetDoctorEnabled { enabled: bool },
    /// Merge the waiting pool, assign roles and begin night 1.
    #[serde(rename = "control_start_game")]
    StartGame,
    /// Resolve the night's actions and evaluate the win condition.
    #[serde(rename = "control_end_night")]
    EndNight,
    /// Leave day and begin the next night round.
    #[serde(rename = "control_start_next_night")]
    StartNextNight,
    /// Discard the room and the waiting pool.
    #[serde(rename = "control_reset_game")]
    ResetGame,
    /// Liveness probe; answered with [`ServerEvent::Pong`].
    Ping,
}

// ---------------------------------------------------------------------------
// Outbound
// ---------------------------------------------------------------------------

/// Events the server pushes to clients.
///
/// `room_state` and `control_state` are always full recomputations of the
/// current state; clients replace, never merge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    tag = "type",
    rename_all = "snake_case",
    rename_all_fields = "camelCase"
)]
pub enum ServerEvent {
    /// First event on any connection: the peer's own id, so it can
    /// recognise itself in rosters and option lists.
    Welcome { id: PlayerId },
    /// Public room view, pushed to every rostered player.
    RoomState(RoomSnapshot),
    /// Pushed to players parked in the waiting pool.
    WaitingCount { count: usize },
    /// Private: the recipient's own hidden role, sent once at game start.
    RoleInfo { role: Role },
    /// The night round's side question, with the roster as options.
    McqQuestion {
        question_id: String,
        text: String,
        options: Vec<QuestionOption>,
    },
    /// Outcome of a resolved night. `killedId` is null when the save
    /// matched the kill or no kill was set; `winner` is null while the
    /// game continues.
    NightResult {
        room_id: RoomId,
        killed_id: Option<PlayerId>,
        winner: Option<Winner>,
    },
    /// The room moved between night and day.
    PhaseChange { room_id: RoomId, phase: Phase },
    /// Operator view: the full room (or null before the first join /
    /// after a reset) plus the waiting pool.
    ControlState {
        active_room: Option<RoomSnapshot>,
        waiting_count: usize,
        waiting_players: Vec<WaitingPlayer>,
    },
    /// Reply to a `ping` from either channel.
    Pong,
}

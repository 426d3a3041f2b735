//! The room and its players.
//!
//! A [`Room`] is a plain record: the registry owns it, the rules mutate
//! it, and nothing here performs I/O. Projections for the wire are built
//! from it on demand, every time, so clients always see a full
//! recomputation.

use std::collections::BTreeMap;

use omerta_protocol::{
    Phase, PlayerId, PlayerSummary, QuestionOption, Role, RoomId,
    RoomSnapshot,
};

/// The one room's id. The process hosts a single game room; resets swap
/// the room out but the id clients see never changes.
pub const ROOM_ID: RoomId = RoomId(1);

/// One participant.
#[derive(Debug, Clone)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    pub role: Role,
    pub alive: bool,
    pub is_host: bool,
}

impl Player {
    /// Creates a fresh, living villager. Host status is decided by the
    /// roster at admission time.
    pub fn new(id: PlayerId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            role: Role::Villager,
            alive: true,
            is_host: false,
        }
    }

    /// The public view of this player. Never includes the role.
    pub fn summary(&self) -> PlayerSummary {
        PlayerSummary {
            id: self.id,
            name: self.name.clone(),
            alive: self.alive,
            is_host: self.is_host,
        }
    }
}

/// The authoritative state of the game room.
///
/// `players` keeps join order: iteration order is the order players
/// entered the roster, which keeps snapshots and option lists stable.
/// Role holders are referenced by id; the ids are weak in the sense that
/// every lookup tolerates the id pointing at nothing.
#[derive(Debug)]
pub struct Room {
    pub id: RoomId,
    /// Stamped by the registry at creation. A room created after a reset
    /// carries a larger generation, which is how in-flight question
    /// responses for a discarded room are recognised and dropped.
    pub generation: u64,
    pub phase: Phase,
    pub players: Vec<Player>,
    pub godfather_id: Option<PlayerId>,
    pub doctor_id: Option<PlayerId>,
    pub doctor_enabled: bool,
    pub night_kill_target: Option<PlayerId>,
    pub night_save_target: Option<PlayerId>,
    pub current_question_id: Option<String>,
    pub current_question_text: Option<String>,
    /// 0 in lobby; 1 from game start, +1 per subsequent night.
    pub night_round: u32,
    /// Answers per night round: round → (answering player → chosen
    /// target). Dead players may answer; rounds stay recorded until the
    /// room is discarded.
    pub mcq_answers: BTreeMap<u32, BTreeMap<PlayerId, PlayerId>>,
}

impl Room {
    /// Creates an empty lobby-phase room with the given generation stamp.
    pub fn new(generation: u64) -> Self {
        Self {
            id: ROOM_ID,
            generation,
            phase: Phase::Lobby,
            players: Vec::new(),
            godfather_id: None,
            doctor_id: None,
            doctor_enabled: false,
            night_kill_target: None,
            night_save_target: None,
            current_question_id: None,
            current_question_text: None,
            night_round: 0,
            mcq_answers: BTreeMap::new(),
        }
    }

    /// Whether a new player may enter the roster directly.
    ///
    /// Joinable in the lobby and after a finished game; during night and
    /// day newcomers are parked in the waiting pool instead.
    pub fn is_joinable(&self) -> bool {
        matches!(self.phase, Phase::Lobby | Phase::Ended)
    }

    /// Looks up a rostered player.
    pub fn player(&self, id: PlayerId) -> Option<&Player> {
        self.players.iter().find(|p| p.id == id)
    }

    /// Looks up a rostered player mutably.
    pub fn player_mut(&mut self, id: PlayerId) -> Option<&mut Player> {
        self.players.iter_mut().find(|p| p.id == id)
    }

    /// Whether the id is on the roster.
    pub fn contains(&self, id: PlayerId) -> bool {
        self.player(id).is_some()
    }

    /// Counts (mafia, village) among living players.
    ///
    /// Mafia is 1 exactly when the godfather id resolves to a living
    /// rostered player; everyone else alive counts as village.
    pub fn alive_counts(&self) -> (usize, usize) {
        let alive = self.players.iter().filter(|p| p.alive).count();
        let mafia = match self.godfather_id {
            Some(id) => {
                usize::from(self.player(id).is_some_and(|p| p.alive))
            }
            None => 0,
        };
        (mafia, alive - mafia)
    }

    /// Stores the current question and opens this round's answer book.
    pub fn set_question(
        &mut self,
        question_id: impl Into<String>,
        text: impl Into<String>,
    ) {
        self.current_question_id = Some(question_id.into());
        self.current_question_text = Some(text.into());
        self.mcq_answers.entry(self.night_round.max(1)).or_default();
    }

    /// Records an answer for the current round, overwriting the caller's
    /// previous one. Rounds are keyed from 1 even if asked before the
    /// first night officially ticks.
    pub fn record_answer(&mut self, player: PlayerId, target: PlayerId) {
        self.mcq_answers
            .entry(self.night_round.max(1))
            .or_default()
            .insert(player, target);
    }

    /// Clears the night's action slots and the current question. Called
    /// by night resolution; the answer history stays.
    pub fn clear_night_state(&mut self) {
        self.night_kill_target = None;
        self.night_save_target = None;
        self.current_question_id = None;
        self.current_question_text = None;
    }

    /// The full public projection, players in join order.
    pub fn snapshot(&self) -> RoomSnapshot {
        RoomSnapshot {
            room_id: self.id,
            phase: self.phase,
            doctor_enabled: self.doctor_enabled,
            night_round: self.night_round,
            players: self.players.iter().map(Player::summary).collect(),
        }
    }

    /// The answer options for a question round: the whole roster, dead
    /// players included.
    pub fn question_options(&self) -> Vec<QuestionOption> {
        self.players
            .iter()
            .map(|p| QuestionOption {
                id: p.id,
                name: p.name.clone(),
                alive: p.alive,
            })
            .collect()
    }
}

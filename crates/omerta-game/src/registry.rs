//! The process-wide registry: one lazily created room plus the waiting
//! pool of players who arrived mid-game.
//!
//! Every command handler goes through this type, one command at a time.
//! Methods validate, mutate, and report; they never perform I/O, and a
//! refusal is an error the caller logs and drops rather than something a
//! client ever hears about.

use omerta_protocol::{Phase, PlayerId, WaitingPlayer, Winner};
use rand::Rng;

use crate::error::GameError;
use crate::room::{Player, Room};
use crate::rules;

/// Minimum roster size for a game to start.
pub const MIN_PLAYERS: usize = 3;

/// Display name given to players who join without one.
const DEFAULT_NAME: &str = "Player";

/// Where a joining player ended up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    /// Entered the room roster.
    Roster,
    /// Parked in the waiting pool until the next game start.
    Waiting,
}

/// What a night resolution produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NightOutcome {
    /// The player the mafia killed, unless the save nullified it.
    pub killed: Option<PlayerId>,
    /// The winning side, if the game is now decided.
    pub winner: Option<Winner>,
}

/// Owner of all game state in the process.
///
/// The room is created lazily on first demand and destroyed only by
/// [`reset`](Registry::reset). Its `generation` stamp comes from a
/// counter here that never rewinds, so state captured before an await
/// can be checked for staleness afterwards.
#[derive(Debug, Default)]
pub struct Registry {
    active_room: Option<Room>,
    waiting: Vec<Player>,
    generation: u64,
}

impl Registry {
    /// Creates an empty registry: no room, no waiting players.
    pub fn new() -> Self {
        Self::default()
    }

    /// The active room, if one exists.
    pub fn room(&self) -> Option<&Room> {
        self.active_room.as_ref()
    }

    /// The active room, mutably.
    pub fn room_mut(&mut self) -> Option<&mut Room> {
        self.active_room.as_mut()
    }

    /// Players parked in the waiting pool, in join order.
    pub fn waiting(&self) -> &[Player] {
        &self.waiting
    }

    /// The waiting pool as wire entries for `control_state`.
    pub fn waiting_entries(&self) -> Vec<WaitingPlayer> {
        self.waiting
            .iter()
            .map(|p| WaitingPlayer {
                id: p.id,
                name: p.name.clone(),
            })
            .collect()
    }

    /// Returns the room, creating a fresh lobby room on first demand.
    fn ensure_room(&mut self) -> &mut Room {
        if self.active_room.is_none() {
            self.generation += 1;
            tracing::info!(generation = self.generation, "room created");
        }
        let generation = self.generation;
        self.active_room
            .get_or_insert_with(|| Room::new(generation))
    }

    /// Whether the id is already rostered or waiting.
    fn is_known(&self, id: PlayerId) -> bool {
        self.waiting.iter().any(|p| p.id == id)
            || self.active_room.as_ref().is_some_and(|r| r.contains(id))
    }

    // -----------------------------------------------------------------
    // Player commands
    // -----------------------------------------------------------------

    /// Admits a player: into the roster while the room is joinable,
    /// otherwise into the waiting pool. An empty name becomes
    /// `"Player"`. A connection that already joined is refused so a
    /// rejoin cannot clobber a live player record.
    pub fn join(
        &mut self,
        id: PlayerId,
        name: &str,
    ) -> Result<Placement, GameError> {
        if self.is_known(id) {
            return Err(GameError::AlreadyJoined(id));
        }
        let name = if name.is_empty() { DEFAULT_NAME } else { name };

        let room = self.ensure_room();
        if room.is_joinable() {
            let mut player = Player::new(id, name);
            player.is_host = room.players.is_empty();
            room.players.push(player);
            tracing::info!(%id, "player joined the roster");
            return Ok(Placement::Roster);
        }

        self.waiting.push(Player::new(id, name));
        tracing::info!(%id, "player parked in the waiting pool");
        Ok(Placement::Waiting)
    }

    /// Records the godfather's kill target for this night.
    pub fn night_kill(
        &mut self,
        caller: PlayerId,
        target: PlayerId,
    ) -> Result<(), GameError> {
        let room = self.active_room.as_mut().ok_or(GameError::NoRoom)?;
        night_action_guard(room, caller, room.godfather_id, target)?;
        room.night_kill_target = Some(target);
        Ok(())
    }

    /// Records the doctor's save target for this night.
    pub fn night_save(
        &mut self,
        caller: PlayerId,
        target: PlayerId,
    ) -> Result<(), GameError> {
        let room = self.active_room.as_mut().ok_or(GameError::NoRoom)?;
        night_action_guard(room, caller, room.doctor_id, target)?;
        room.night_save_target = Some(target);
        Ok(())
    }

    /// Records a side-question answer for the current night round.
    ///
    /// The caller need not be rostered or alive; only the target must be
    /// on the roster, and the echoed question id merely has to be
    /// non-empty. It is never matched against the stored question.
    pub fn record_answer(
        &mut self,
        caller: PlayerId,
        question_id: &str,
        target: PlayerId,
    ) -> Result<(), GameError> {
        let room = self.active_room.as_mut().ok_or(GameError::NoRoom)?;
        if room.phase != Phase::Night {
            return Err(GameError::WrongPhase(room.phase));
        }
        if question_id.is_empty() {
            return Err(GameError::EmptyQuestionId);
        }
        if !room.contains(target) {
            return Err(GameError::InvalidTarget(target));
        }
        room.record_answer(caller, target);
        Ok(())
    }

    // -----------------------------------------------------------------
    // Control commands
    // -----------------------------------------------------------------

    /// Sets the doctor toggle for the next game, creating the room if
    /// none exists yet.
    pub fn set_doctor_enabled(&mut self, enabled: bool) {
        self.ensure_room().doctor_enabled = enabled;
    }

    /// Starts the game: merges the waiting pool into the roster, checks
    /// the headcount, deals roles and enters night 1.
    ///
    /// Start is refused while a populated room is mid-game or finished;
    /// after a finished game the operator resets first. The merge
    /// happens before the headcount check and persists even when the
    /// check fails; the merged roster then surfaces on the next
    /// successful mutation's broadcast.
    pub fn start_game<R: Rng + ?Sized>(
        &mut self,
        rng: &mut R,
    ) -> Result<(), GameError> {
        if let Some(room) = &self.active_room {
            if room.phase != Phase::Lobby && !room.players.is_empty() {
                return Err(GameError::StartRejected { phase: room.phase });
            }
        }

        let waiting = std::mem::take(&mut self.waiting);
        let room = self.ensure_room();
        room.players.extend(waiting);

        if room.players.len() < MIN_PLAYERS {
            return Err(GameError::NotEnoughPlayers {
                have: room.players.len(),
            });
        }

        rules::assign_roles(room, rng);
        room.phase = Phase::Night;
        room.night_round = 1;
        tracing::info!(
            players = room.players.len(),
            doctor = room.doctor_id.is_some(),
            "game started"
        );
        Ok(())
    }

    /// Resolves the night and evaluates the win condition. Moves to day
    /// when the game continues; a winner leaves the room in `ended`.
    pub fn end_night(&mut self) -> Result<NightOutcome, GameError> {
        let room = self.active_room.as_mut().ok_or(GameError::NoRoom)?;
        if room.phase != Phase::Night {
            return Err(GameError::WrongPhase(room.phase));
        }

        let killed = rules::resolve_night(room);
        let winner = rules::evaluate_win(room);
        if winner.is_none() {
            room.phase = Phase::Day;
        }
        tracing::info!(
            round = room.night_round,
            killed = killed.map(|id| id.0),
            winner = winner.map(|w| w.to_string()),
            "night resolved"
        );
        Ok(NightOutcome { killed, winner })
    }

    /// Leaves day and begins the next night round. Returns the new
    /// round number.
    pub fn start_next_night(&mut self) -> Result<u32, GameError> {
        let room = self.active_room.as_mut().ok_or(GameError::NoRoom)?;
        if room.phase != Phase::Day {
            return Err(GameError::WrongPhase(room.phase));
        }
        room.phase = Phase::Night;
        room.night_round += 1;
        tracing::info!(round = room.night_round, "next night started");
        Ok(room.night_round)
    }

    /// Discards the room and the waiting pool. The next join or doctor
    /// toggle creates a fresh room with a higher generation.
    pub fn reset(&mut self) {
        self.active_room = None;
        self.waiting.clear();
        tracing::info!("game reset, room and waiting pool discarded");
    }

    // -----------------------------------------------------------------
    // Question rounds
    // -----------------------------------------------------------------

    /// Applies a fetched question, but only if the room still matches
    /// the `(generation, round)` captured before the fetch and is still
    /// in its night. Anything else means the game moved on while the
    /// request was in flight, and the response must be discarded.
    pub fn apply_question(
        &mut self,
        generation: u64,
        round: u32,
        question_id: &str,
        text: &str,
    ) -> Result<(), GameError> {
        let room = self
            .active_room
            .as_mut()
            .ok_or(GameError::StaleQuestion)?;
        if room.generation != generation
            || room.night_round != round
            || room.phase != Phase::Night
        {
            return Err(GameError::StaleQuestion);
        }
        room.set_question(question_id, text);
        Ok(())
    }
}

/// Shared validation for the two night actions: night phase, the caller
/// must hold the role and be alive, and the target must be a living
/// rostered player.
fn night_action_guard(
    room: &Room,
    caller: PlayerId,
    holder: Option<PlayerId>,
    target: PlayerId,
) -> Result<(), GameError> {
    if room.phase != Phase::Night {
        return Err(GameError::WrongPhase(room.phase));
    }
    if holder != Some(caller) {
        return Err(GameError::NotAllowed(caller));
    }
    if !room.player(caller).is_some_and(|p| p.alive) {
        return Err(GameError::NotAllowed(caller));
    }
    if !room.player(target).is_some_and(|p| p.alive) {
        return Err(GameError::InvalidTarget(target));
    }
    Ok(())
}

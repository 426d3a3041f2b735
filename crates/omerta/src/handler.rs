//! Per-connection handler: welcome, outbound pump, and command routing.
//!
//! Each accepted connection gets its own Tokio task running
//! [`handle_connection`]. The flow is:
//!   1. Send `welcome` with the connection's player id
//!   2. Register an outbound queue in the hub, spawn the writer task
//!   3. Loop: decode inbound frames and dispatch per channel
//!
//! Refused commands are logged and dropped. Nothing goes back to the
//! client about them, so every event a client does receive reflects a
//! mutation that actually happened.

use std::sync::Arc;

use omerta_game::{NightOutcome, ROOM_ID, Room};
use omerta_protocol::{
    Codec, ControlCommand, Phase, PlayerEvent, PlayerId, ServerEvent,
};
use omerta_question::Question;
use omerta_transport::{Channel, Connection, WebSocketConnection};
use tokio::sync::mpsc;

use crate::OmertaError;
use crate::hub::Outbound;
use crate::server::ServerState;

/// Drop guard that removes the connection's hub entry when the handler
/// exits. This ensures cleanup even if the handler panics. Since `Drop`
/// is synchronous, we spawn a fire-and-forget task for the async lock.
///
/// Only the hub entry goes away. The player stays in the roster or the
/// waiting pool; disconnection is not modeled as removal.
struct HubGuard {
    channel: Channel,
    id: PlayerId,
    state: Arc<ServerState>,
}

impl Drop for HubGuard {
    fn drop(&mut self) {
        let (channel, id) = (self.channel, self.id);
        let state = Arc::clone(&self.state);
        tokio::spawn(async move {
            state.hub.lock().await.remove(channel, id);
        });
    }
}

/// Handles a single connection from accept to close.
pub(crate) async fn handle_connection(
    conn: WebSocketConnection,
    state: Arc<ServerState>,
) -> Result<(), OmertaError> {
    let id = PlayerId::from(conn.id());
    let channel = conn.channel();
    tracing::debug!(%id, %channel, "handling new connection");

    // The client learns its id first; every later event references
    // players by these ids.
    let welcome = state.codec.encode(&ServerEvent::Welcome { id })?;
    conn.send(&welcome).await?;

    let (tx, mut rx) = mpsc::unbounded_channel();
    state.hub.lock().await.insert(channel, id, tx.clone());
    let _guard = HubGuard {
        channel,
        id,
        state: Arc::clone(&state),
    };

    // Writer task: drains the queue, encodes, writes to the socket.
    // Broadcasters only ever touch the queue, so a slow client cannot
    // stall a command handler.
    let writer_conn = conn.clone();
    let codec = state.codec;
    let writer = tokio::spawn(async move {
        while let Some(event) = rx.recv().await {
            let bytes = match codec.encode(&event) {
                Ok(bytes) => bytes,
                Err(e) => {
                    tracing::error!(error = %e, "failed to encode event");
                    continue;
                }
            };
            if writer_conn.send(&bytes).await.is_err() {
                break;
            }
        }
    });

    // A control panel wants the current picture the moment it attaches.
    if channel == Channel::Control {
        let snapshot = control_snapshot(&state).await;
        let _ = tx.send(snapshot);
    }

    loop {
        let data = match conn.recv().await {
            Ok(Some(data)) => data,
            Ok(None) => {
                tracing::info!(%id, %channel, "connection closed");
                break;
            }
            Err(e) => {
                tracing::debug!(%id, error = %e, "recv error");
                break;
            }
        };

        match channel {
            Channel::Player => {
                dispatch_player_event(&state, id, &tx, &data).await;
            }
            Channel::Control => {
                dispatch_control_command(&state, id, &tx, &data).await;
            }
        }
    }

    writer.abort();
    Ok(())
    // _guard drops here → hub entry removed.
}

// -------------------------------------------------------------------------
// Player channel
// -------------------------------------------------------------------------

async fn dispatch_player_event(
    state: &Arc<ServerState>,
    id: PlayerId,
    tx: &Outbound,
    data: &[u8],
) {
    let event: PlayerEvent = match state.codec.decode(data) {
        Ok(event) => event,
        Err(e) => {
            tracing::debug!(%id, error = %e, "undecodable player frame dropped");
            return;
        }
    };

    match event {
        PlayerEvent::Join { name } => {
            let joined = state.registry.lock().await.join(id, &name);
            match joined {
                Ok(placement) => {
                    tracing::debug!(%id, ?placement, "join accepted");
                    sync_state(state).await;
                }
                Err(e) => tracing::debug!(%id, error = %e, "join refused"),
            }
        }

        PlayerEvent::NightKill { target_id } => {
            let result = state.registry.lock().await.night_kill(id, target_id);
            if let Err(e) = result {
                tracing::debug!(%id, error = %e, "night_kill refused");
            }
        }

        PlayerEvent::NightSave { target_id } => {
            let result = state.registry.lock().await.night_save(id, target_id);
            if let Err(e) = result {
                tracing::debug!(%id, error = %e, "night_save refused");
            }
        }

        PlayerEvent::McqAnswer {
            question_id,
            target_id,
        } => {
            let result = state
                .registry
                .lock()
                .await
                .record_answer(id, &question_id, target_id);
            if let Err(e) = result {
                tracing::debug!(%id, error = %e, "mcq_answer refused");
            }
        }

        PlayerEvent::Ping => {
            let _ = tx.send(ServerEvent::Pong);
        }
    }
}

// -------------------------------------------------------------------------
// Control channel
// -------------------------------------------------------------------------

async fn dispatch_control_command(
    state: &Arc<ServerState>,
    id: PlayerId,
    tx: &Outbound,
    data: &[u8],
) {
    let command: ControlCommand = match state.codec.decode(data) {
        Ok(command) => command,
        Err(e) => {
            tracing::debug!(%id, error = %e, "undecodable control frame dropped");
            return;
        }
    };

    match command {
        ControlCommand::SetDoctorEnabled { enabled } => {
            state.registry.lock().await.set_doctor_enabled(enabled);
            tracing::info!(enabled, "doctor toggle set");
            sync_state(state).await;
        }

        ControlCommand::StartGame => start_game(state).await,
        ControlCommand::EndNight => end_night(state).await,
        ControlCommand::StartNextNight => start_next_night(state).await,

        ControlCommand::ResetGame => {
            state.registry.lock().await.reset();
            sync_state(state).await;
        }

        ControlCommand::Ping => {
            let _ = tx.send(ServerEvent::Pong);
        }
    }
}

/// Deals roles, tells each player theirs, runs the first question
/// round, then publishes the new state.
async fn start_game(state: &Arc<ServerState>) {
    let started = {
        let mut registry = state.registry.lock().await;
        match registry.start_game(&mut rand::rng()) {
            Ok(()) => registry.room().map(|room| {
                let roles: Vec<_> =
                    room.players.iter().map(|p| (p.id, p.role)).collect();
                (roles, room.generation, room.night_round)
            }),
            Err(e) => {
                tracing::debug!(error = %e, "start_game refused");
                None
            }
        }
    };
    let Some((roles, generation, round)) = started else {
        return;
    };

    // Each rostered player learns their own role, nobody else's.
    {
        let hub = state.hub.lock().await;
        for (player, role) in roles {
            hub.to_player(player, ServerEvent::RoleInfo { role });
        }
    }

    run_question_round(state, generation, round).await;
    sync_state(state).await;
}

/// Resolves the night: the roster hears the result, then either the
/// game is over or day begins.
async fn end_night(state: &Arc<ServerState>) {
    let resolved = {
        let mut registry = state.registry.lock().await;
        let outcome = match registry.end_night() {
            Ok(outcome) => outcome,
            Err(e) => {
                tracing::debug!(error = %e, "end_night refused");
                return;
            }
        };
        let roster = registry.room().map(roster_ids).unwrap_or_default();
        let phase = registry.room().map(|room| room.phase);
        (outcome, roster, phase)
    };
    let (NightOutcome { killed, winner }, roster, phase) = resolved;

    {
        let hub = state.hub.lock().await;
        hub.to_players(
            &roster,
            &ServerEvent::NightResult {
                room_id: ROOM_ID,
                killed_id: killed,
                winner,
            },
        );
        if winner.is_none() {
            if let Some(phase) = phase {
                hub.to_players(
                    &roster,
                    &ServerEvent::PhaseChange {
                        room_id: ROOM_ID,
                        phase,
                    },
                );
            }
        }
    }

    sync_state(state).await;
}

/// Leaves day for the next night round and asks a fresh question.
async fn start_next_night(state: &Arc<ServerState>) {
    let advanced = {
        let mut registry = state.registry.lock().await;
        match registry.start_next_night() {
            Ok(round) => {
                let generation = registry
                    .room()
                    .map(|room| room.generation)
                    .unwrap_or_default();
                let roster =
                    registry.room().map(roster_ids).unwrap_or_default();
                Some((roster, generation, round))
            }
            Err(e) => {
                tracing::debug!(error = %e, "start_next_night refused");
                None
            }
        }
    };
    let Some((roster, generation, round)) = advanced else {
        return;
    };

    state.hub.lock().await.to_players(
        &roster,
        &ServerEvent::PhaseChange {
            room_id: ROOM_ID,
            phase: Phase::Night,
        },
    );

    run_question_round(state, generation, round).await;
    sync_state(state).await;
}

// -------------------------------------------------------------------------
// Question rounds and state pushes
// -------------------------------------------------------------------------

/// Fetches one question and, if the game still sits in the round it was
/// fetched for, stores it and puts it to the roster.
///
/// The fetch happens with no lock held. The `(generation, round)` pair
/// captured before the await decides whether the response still applies
/// when it lands; anything that moved on in the meantime makes the
/// response stale and it is dropped. A failed fetch becomes the
/// deterministic fallback question, so the round never stalls.
async fn run_question_round(state: &Arc<ServerState>, generation: u64, round: u32) {
    let question = match state.question.fetch().await {
        Ok(question) => question,
        Err(e) => {
            tracing::warn!(error = %e, round, "question fetch failed, using fallback");
            Question::fallback(round)
        }
    };

    let staged = {
        let mut registry = state.registry.lock().await;
        let applied = registry.apply_question(
            generation,
            round,
            &question.id,
            &question.text,
        );
        match applied {
            Ok(()) => registry
                .room()
                .map(|room| (roster_ids(room), room.question_options())),
            Err(e) => {
                tracing::debug!(error = %e, round, "question response discarded");
                None
            }
        }
    };
    let Some((roster, options)) = staged else {
        return;
    };

    state.hub.lock().await.to_players(
        &roster,
        &ServerEvent::McqQuestion {
            question_id: question.id,
            text: question.text,
            options,
        },
    );
}

/// Recomputes and pushes the full picture after a successful mutation:
/// the public snapshot to the roster, the pool size to the waiting
/// players, and the control view to every attached panel. Full state
/// every time, never a patch.
async fn sync_state(state: &Arc<ServerState>) {
    let (snapshot, roster, waiting_ids, waiting_players) = {
        let registry = state.registry.lock().await;
        let snapshot = registry.room().map(Room::snapshot);
        let roster = registry.room().map(roster_ids).unwrap_or_default();
        let waiting_ids: Vec<PlayerId> =
            registry.waiting().iter().map(|p| p.id).collect();
        (snapshot, roster, waiting_ids, registry.waiting_entries())
    };
    let waiting_count = waiting_ids.len();

    let hub = state.hub.lock().await;
    if let Some(snapshot) = &snapshot {
        hub.to_players(&roster, &ServerEvent::RoomState(snapshot.clone()));
    }
    hub.to_players(
        &waiting_ids,
        &ServerEvent::WaitingCount {
            count: waiting_count,
        },
    );
    hub.to_all_controllers(&ServerEvent::ControlState {
        active_room: snapshot,
        waiting_count,
        waiting_players,
    });
}

/// The control view for a panel that just attached.
async fn control_snapshot(state: &Arc<ServerState>) -> ServerEvent {
    let registry = state.registry.lock().await;
    ServerEvent::ControlState {
        active_room: registry.room().map(Room::snapshot),
        waiting_count: registry.waiting().len(),
        waiting_players: registry.waiting_entries(),
    }
}

fn roster_ids(room: &Room) -> Vec<PlayerId> {
    room.players.iter().map(|p| p.id).collect()
}

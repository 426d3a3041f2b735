//! The game rules: role assignment, night resolution, win evaluation.
//!
//! Pure functions over a [`Room`]; the registry decides when they run
//! and the server layer decides what to broadcast afterwards.

use omerta_protocol::{Phase, PlayerId, Role, Winner};
use rand::Rng;
use rand::seq::SliceRandom;

use crate::room::Room;

/// Deals roles for a starting game.
///
/// Every player is first reset to a living villager, then the roster ids
/// are shuffled: the first becomes godfather, the second doctor when the
/// doctor is enabled and at least two players exist. The two roles can
/// therefore never land on the same player.
pub fn assign_roles<R: Rng + ?Sized>(room: &mut Room, rng: &mut R) {
    for player in &mut room.players {
        player.role = Role::Villager;
        player.alive = true;
    }

    let mut ids: Vec<PlayerId> =
        room.players.iter().map(|p| p.id).collect();
    ids.shuffle(rng);

    room.godfather_id = ids.first().copied();
    if let Some(id) = room.godfather_id {
        if let Some(player) = room.player_mut(id) {
            player.role = Role::Godfather;
        }
    }

    room.doctor_id = if room.doctor_enabled && ids.len() >= 2 {
        let id = ids[1];
        if let Some(player) = room.player_mut(id) {
            player.role = Role::Doctor;
        }
        Some(id)
    } else {
        None
    };
}

/// Resolves the night's actions and returns who died, if anyone.
///
/// A save on the same target nullifies the kill. A kill target that no
/// longer resolves to a rostered player is ignored. Both action slots
/// and the current question are cleared regardless of the outcome.
pub fn resolve_night(room: &mut Room) -> Option<PlayerId> {
    let kill = room.night_kill_target;
    let save = room.night_save_target;

    let killed = match kill {
        Some(target) if Some(target) == save => None,
        Some(target) => room.player_mut(target).map(|p| {
            p.alive = false;
            target
        }),
        None => None,
    };

    room.clear_night_state();
    killed
}

/// Evaluates the win condition after a resolution.
///
/// Village wins when no mafia remains; mafia wins when it matches or
/// outnumbers the living village. Finding a winner moves the room to
/// [`Phase::Ended`] as a side effect.
pub fn evaluate_win(room: &mut Room) -> Option<Winner> {
    let (mafia, village) = room.alive_counts();
    let winner = if mafia == 0 {
        Some(Winner::Village)
    } else if mafia >= village {
        Some(Winner::Mafia)
    } else {
        None
    };

    if winner.is_some() {
        room.phase = Phase::Ended;
    }
    winner
}

//! Game state and rules for Omerta.
//!
//! Everything here is synchronous and deterministic: the registry owns
//! the single active room and the waiting pool, pure rule functions
//! resolve nights and evaluate wins, and randomness enters only through
//! the `Rng` handed to role assignment. The server crate wraps one
//! [`Registry`] in a lock and drives it from connection handlers.
//!
//! # Key types
//!
//! - [`Registry`] — owns the active room and the waiting pool
//! - [`Room`] / [`Player`] — the mutable game state
//! - [`rules`] — night resolution and win evaluation
//! - [`GameError`] — why a command was refused (never sent to clients)

mod error;
mod registry;
mod room;
pub mod rules;

pub use error::GameError;
pub use registry::{MIN_PLAYERS, NightOutcome, Placement, Registry};
pub use room::{Player, ROOM_ID, Room};

//! Wire protocol for the omerta game server.
//!
//! This crate defines the language clients and server speak:
//!
//! - **Types** ([`PlayerId`], [`Phase`], [`Role`], [`RoomSnapshot`], ...) —
//!   identities, game enums and the public projections.
//! - **Events** ([`PlayerEvent`], [`ControlCommand`], [`ServerEvent`]) —
//!   the tagged event vocabulary of the player and control channels.
//! - **Codec** ([`Codec`] trait, [`JsonCodec`]) — how events are
//!   converted to/from bytes.
//! - **Errors** ([`ProtocolError`]) — what can go wrong doing that.
//!
//! # Architecture
//!
//! The protocol layer sits between transport (raw frames on a routed
//! channel) and the game state. It knows the shape of every message but
//! nothing about rooms, rosters or phase rules.
//!
//! ```text
//! Transport (bytes + channel) → Protocol (events) → Game (state)
//! ```

mod codec;
mod error;
mod events;
mod types;

pub use codec::Codec;
#[cfg(feature = "json")]
pub use codec::JsonCodec;
pub use error::ProtocolError;
pub use events::{ControlCommand, PlayerEvent, ServerEvent};
pub use types::{
    Phase, PlayerId, PlayerSummary, QuestionOption, Role, RoomId,
    RoomSnapshot, WaitingPlayer, Winner,
};

//! Session server for a Mafia-style social deduction game.
//!
//! One process hosts one room. Players connect over the player channel
//! to join, receive secret roles, and act at night; a game master
//! drives the phase cycle over the control channel. Every accepted
//! command is answered with full-state pushes, so clients render
//! whatever the latest event says and nothing else.
//!
//! The pieces:
//! - [`omerta_transport`]: WebSocket listener and channel routing
//! - [`omerta_protocol`]: wire events and the JSON codec
//! - [`omerta_game`]: the registry, room state, and night rules
//! - [`omerta_question`]: HTTP client for the side-question service
//! - this crate: the server loop gluing them together
//!
//! # Example
//!
//! ```rust,no_run
//! use omerta::OmertaServer;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let server = OmertaServer::builder()
//!         .bind("0.0.0.0:8000")
//!         .build()
//!         .await?;
//!     server.run().await?;
//!     Ok(())
//! }
//! ```

mod error;
mod handler;
mod hub;
mod server;

pub use error::OmertaError;
pub use server::{OmertaServer, OmertaServerBuilder};

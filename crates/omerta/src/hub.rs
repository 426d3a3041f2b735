//! Outbound fan-out: which connection gets which events.
//!
//! Each live connection registers an unbounded sender here, keyed by
//! player id and split by channel. Pushing an event never blocks and
//! never fails loudly: a closed receiver just means the connection is
//! on its way out, and its entry disappears when the handler's guard
//! drops.

use std::collections::HashMap;

use omerta_protocol::{PlayerId, ServerEvent};
use omerta_transport::Channel;
use tokio::sync::mpsc::UnboundedSender;

/// Per-connection outbound queue. The handler's writer task drains the
/// other end, encodes, and writes to the socket.
pub(crate) type Outbound = UnboundedSender<ServerEvent>;

/// Registry of live connections on both channels.
#[derive(Debug, Default)]
pub(crate) struct Hub {
    players: HashMap<PlayerId, Outbound>,
    controllers: HashMap<PlayerId, Outbound>,
}

impl Hub {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn insert(&mut self, channel: Channel, id: PlayerId, tx: Outbound) {
        self.map_for(channel).insert(id, tx);
    }

    pub(crate) fn remove(&mut self, channel: Channel, id: PlayerId) {
        self.map_for(channel).remove(&id);
    }

    fn map_for(&mut self, channel: Channel) -> &mut HashMap<PlayerId, Outbound> {
        match channel {
            Channel::Player => &mut self.players,
            Channel::Control => &mut self.controllers,
        }
    }

    /// Queues an event for one player connection. Unknown or closed
    /// recipients are skipped; the roster outlives its sockets.
    pub(crate) fn to_player(&self, id: PlayerId, event: ServerEvent) {
        if let Some(tx) = self.players.get(&id) {
            let _ = tx.send(event);
        }
    }

    /// Queues an event for each of the given player connections.
    pub(crate) fn to_players(&self, ids: &[PlayerId], event: &ServerEvent) {
        for id in ids {
            if let Some(tx) = self.players.get(id) {
                let _ = tx.send(event.clone());
            }
        }
    }

    /// Queues an event for every control connection.
    pub(crate) fn to_all_controllers(&self, event: &ServerEvent) {
        for tx in self.controllers.values() {
            let _ = tx.send(event.clone());
        }
    }
}

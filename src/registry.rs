//! Live connection bookkeeping.

use axum::extract::ws::Message;
use std::collections::HashMap;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Opaque ID type for connections
pub type ConnectionId = String;

/// Outbound channel for one participant. The socket writer task drains the
/// other end, so pushes never block the coordinator.
pub type ConnectionSender = mpsc::UnboundedSender<Message>;

/// One registered participant.
pub struct Connection {
    /// Learned from submissions; never set by the transport layer.
    pub display_name: Option<String>,
    sender: ConnectionSender,
    keepalive: Option<JoinHandle<()>>,
}

/// All currently connected participants.
///
/// Lives inside the coordinator lock, so methods take `&mut self` and need
/// no interior synchronization of their own. Iteration order is irrelevant.
#[derive(Default)]
pub struct ConnectionRegistry {
    connections: HashMap<ConnectionId, Connection>,
}

impl ConnectionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, sender: ConnectionSender) -> ConnectionId {
        let id = ulid::Ulid::new().to_string();
        self.connections.insert(
            id.clone(),
            Connection {
                display_name: None,
                sender,
                keepalive: None,
            },
        );
        id
    }

    /// Remove the connection and stop its keepalive. Unknown ids are a
    /// no-op, which also makes a second unregister of the same id harmless.
    pub fn unregister(&mut self, id: &str) {
        if let Some(conn) = self.connections.remove(id) {
            if let Some(probe) = conn.keepalive {
                probe.abort();
            }
        }
    }

    /// Hand the connection its keepalive task. If the connection vanished
    /// between registration and spawn, the probe is stopped right away.
    pub fn attach_keepalive(&mut self, id: &str, probe: JoinHandle<()>) {
        match self.connections.get_mut(id) {
            Some(conn) => conn.keepalive = Some(probe),
            None => probe.abort(),
        }
    }

    /// Overwritten on every submission from this connection.
    pub fn set_display_name(&mut self, id: &str, name: &str) {
        if let Some(conn) = self.connections.get_mut(id) {
            conn.display_name = Some(name.to_string());
        }
    }

    pub fn display_name(&self, id: &str) -> Option<&str> {
        self.connections.get(id)?.display_name.as_deref()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.connections.contains_key(id)
    }

    pub fn count(&self) -> usize {
        self.connections.len()
    }

    /// Visit every live connection's id and sender.
    pub fn for_each(&self, mut f: impl FnMut(&ConnectionId, &ConnectionSender)) {
        for (id, conn) in &self.connections {
            f(id, &conn.sender);
        }
    }
}

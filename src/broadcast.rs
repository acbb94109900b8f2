//! Fan-out of one message to every registered connection.

use crate::protocol::ServerMessage;
use crate::registry::{ConnectionId, ConnectionRegistry};
use axum::extract::ws::Message;

/// Serialize `message` once and push the identical payload to every
/// registered connection.
///
/// A connection whose channel is gone is treated as an implicit disconnect:
/// it is logged and pruned after the fan-out, and delivery to the remaining
/// connections continues regardless. Nothing is surfaced to the caller.
pub fn broadcast(registry: &mut ConnectionRegistry, message: &ServerMessage) {
    let payload = match serde_json::to_string(message) {
        Ok(payload) => payload,
        Err(e) => {
            tracing::error!("failed to serialize broadcast: {e}");
            return;
        }
    };

    let mut dead: Vec<ConnectionId> = Vec::new();
    registry.for_each(|id, sender| {
        if sender.send(Message::Text(payload.clone().into())).is_err() {
            tracing::warn!(connection = %id, "send failed, dropping connection");
            dead.push(id.clone());
        }
    });

    for id in dead {
        registry.unregister(&id);
    }
}

//! Per-connection liveness probing.

use crate::registry::ConnectionSender;
use axum::body::Bytes;
use axum::extract::ws::Message;
use std::time::Duration;
use tokio::task::JoinHandle;

/// Spawn the recurring probe for one connection.
///
/// Each tick pushes a Ping through the connection's outbound channel. Once
/// the channel closes (writer task gone, transport dead) the task exits on
/// its own; `ConnectionRegistry::unregister` aborts it eagerly, and aborting
/// an already-finished task is a no-op. Missing Pong replies are not acted
/// upon.
pub fn spawn(sender: ConnectionSender, interval: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        // The first tick completes immediately; consume it so the first
        // probe goes out one full interval after registration.
        ticker.tick().await;
        loop {
            ticker.tick().await;
            if sender.send(Message::Ping(Bytes::new())).is_err() {
                break;
            }
        }
    })
}

//! WebSocket endpoint: upgrade handling and the per-connection event loop.

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::IntoResponse,
};
use futures::{sink::SinkExt, stream::StreamExt};
use std::sync::Arc;
use tokio::sync::mpsc;

use crate::router;
use crate::state::AppState;

/// WebSocket upgrade handler. Only the designated upgrade route is wired to
/// this, so every other path is turned away before an upgrade can happen.
pub async fn ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    tracing::info!("WebSocket connection request");
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

/// Drive one participant's connection.
///
/// A writer task is the only owner of the sink; everything outbound
/// (broadcasts and keepalive pings alike) funnels through the connection's
/// channel. The read loop feeds inbound text frames to the router one at a
/// time, so each connection's messages are handled in arrival order.
async fn handle_socket(socket: WebSocket, state: Arc<AppState>) {
    let (mut sink, mut stream) = socket.split();
    let (tx, mut rx) = mpsc::unbounded_channel::<Message>();

    let mut writer = tokio::spawn(async move {
        while let Some(message) = rx.recv().await {
            if sink.send(message).await.is_err() {
                break;
            }
        }
    });

    let id = state.register_connection(tx).await;

    loop {
        tokio::select! {
            frame = stream.next() => {
                match frame {
                    Some(Ok(Message::Text(text))) => {
                        router::route_frame(&state, &id, &text).await;
                    }
                    Some(Ok(Message::Close(_))) => {
                        tracing::debug!(connection = %id, "close frame received");
                        break;
                    }
                    // Pongs answer our keepalive probes; a missing reply is
                    // not acted upon. Client pings are answered by axum.
                    Some(Ok(_)) => {}
                    Some(Err(e)) => {
                        tracing::debug!(connection = %id, "socket error: {e}");
                        break;
                    }
                    None => break,
                }
            }
            // Writer gone means the transport is dead; stop reading too.
            _ = &mut writer => break,
        }
    }

    state.unregister_connection(&id).await;
    writer.abort();
}

//! Per-connection session loop.
//!
//! Registers the channel with the hub, greets the client with its
//! assigned identifier, then runs the read/write loop: inbound text
//! frames are parsed into envelopes and dispatched, outbound frames are
//! drained from the connection's queue and written to the socket.

use std::sync::Arc;

use axum::extract::ws::{Message, WebSocket};
use futures_util::{SinkExt, StreamExt};
use tokio::sync::{Semaphore, mpsc};

use crate::app_state::AppState;
use crate::domain::{HubCommand, ServerFrame};
use crate::error::GatewayError;

/// Runs the session for one upgraded WebSocket until it disconnects.
///
/// Inbound envelopes are dispatched on their own tasks, bounded per
/// connection by a semaphore of `max_parallel_invocations` permits;
/// envelopes reach the hub in socket order, but dispatch completion
/// order across envelopes is unspecified. On any exit path the
/// connection is torn down and its memberships cascade-removed.
pub async fn run_connection(socket: WebSocket, state: AppState) {
    let (mut ws_tx, mut ws_rx) = socket.split();
    let (frame_tx, mut frame_rx) = mpsc::channel(state.config.send_queue_capacity);

    let hub = Arc::clone(&state.hub);
    let connection_id = hub.connect(frame_tx).await;

    // The client needs its own identifier before it can be named as a
    // response receiver by anyone else.
    let greeting = ServerFrame::Connected { connection_id };
    let greeting_json = serde_json::to_string(&greeting).unwrap_or_default();
    if ws_tx.send(Message::text(greeting_json)).await.is_err() {
        hub.disconnect(connection_id).await;
        return;
    }

    let invocations = Arc::new(Semaphore::new(state.config.max_parallel_invocations));

    loop {
        tokio::select! {
            // Inbound envelope from the client.
            msg = ws_rx.next() => {
                match msg {
                    Some(Ok(Message::Text(text))) => {
                        match serde_json::from_str::<HubCommand>(&text) {
                            Ok(command) => {
                                let Ok(permit) =
                                    Arc::clone(&invocations).acquire_owned().await
                                else {
                                    break;
                                };
                                let hub = Arc::clone(&hub);
                                tokio::spawn(async move {
                                    hub.dispatch(connection_id, command).await;
                                    drop(permit);
                                });
                            }
                            Err(e) => {
                                let err = GatewayError::InvalidEnvelope(e.to_string());
                                tracing::debug!(connection_id = %connection_id, %err, "rejected inbound frame");
                                let frame = ServerFrame::Error {
                                    message: err.to_string(),
                                };
                                let json = serde_json::to_string(&frame).unwrap_or_default();
                                if ws_tx.send(Message::text(json)).await.is_err() {
                                    break;
                                }
                            }
                        }
                    }
                    Some(Ok(Message::Close(_))) | None => break,
                    _ => {}
                }
            }
            // Outbound frame routed to this connection.
            frame = frame_rx.recv() => {
                match frame {
                    Some(frame) => {
                        let json = serde_json::to_string(&frame).unwrap_or_default();
                        if ws_tx.send(Message::text(json)).await.is_err() {
                            break;
                        }
                    }
                    None => break,
                }
            }
        }
    }

    hub.disconnect(connection_id).await;
    tracing::debug!(connection_id = %connection_id, "session ended");
}

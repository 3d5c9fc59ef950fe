//! WebSocket connection handling
//!
//! One connection per session identifier. The receive loop decodes inbound
//! frames and hands user messages to the engine; a writer task drains the
//! outbound frame channel to the socket. Disconnect or any error escaping
//! the loop converges on a single finalization call.

use axum::extract::ws::{Message as WsMessage, WebSocket};
use futures::stream::SplitSink;
use futures::{SinkExt, StreamExt};
use parlance_core::{ClientFrame, ServerFrame, SessionId};
use parlance_engine::SessionLifecycle;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

const FRAME_BUFFER: usize = 64;

/// Handle one WebSocket connection for its whole lifetime.
pub async fn handle_connection(
    socket: WebSocket,
    session_id: String,
    lifecycle: Arc<SessionLifecycle>,
) {
    let (ws_tx, mut ws_rx) = socket.split();

    let (frame_tx, frame_rx) = mpsc::channel::<ServerFrame>(FRAME_BUFFER);
    let writer = tokio::spawn(forward_frames(frame_rx, ws_tx));

    let mut engine = lifecycle.connect(SessionId::new(session_id)).await;

    while let Some(message) = ws_rx.next().await {
        match message {
            Ok(WsMessage::Text(text)) => match serde_json::from_str::<ClientFrame>(&text) {
                Ok(ClientFrame::Message { content }) => {
                    let content = content.trim();
                    if content.is_empty() {
                        continue;
                    }
                    engine.run_turn(content, &frame_tx).await;
                }
                // Unknown frame types and malformed JSON are silently
                // ignored; no error frame goes back for bad input.
                Ok(ClientFrame::Unknown) | Err(_) => {
                    debug!(session = %engine.session_id(), "ignoring unrecognized frame");
                }
            },
            Ok(WsMessage::Close(_)) => {
                info!(session = %engine.session_id(), "client disconnected");
                break;
            }
            Ok(_) => {} // Binary, Ping, Pong — ignore
            Err(e) => {
                warn!(session = %engine.session_id(), "websocket error: {}", e);
                break;
            }
        }
    }

    lifecycle.disconnect(&mut engine).await;

    // Close the channel so the writer drains and exits.
    drop(frame_tx);
    let _ = writer.await;
}

/// Forward outbound frames to the socket until the channel closes or the
/// client goes away.
async fn forward_frames(
    mut frames: mpsc::Receiver<ServerFrame>,
    mut sink: SplitSink<WebSocket, WsMessage>,
) {
    while let Some(frame) = frames.recv().await {
        match serde_json::to_string(&frame) {
            Ok(json) => {
                if sink.send(WsMessage::Text(json)).await.is_err() {
                    break; // Client disconnected
                }
            }
            Err(e) => warn!("failed to encode frame: {}", e),
        }
    }
}

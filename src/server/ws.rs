//! WebSocket event stream.
//!
//! On connect the client gets a full workspace sync, then every
//! [`WorkspaceEvent`] as it happens. Mutations go through the REST routes;
//! inbound frames other than pings are ignored.

use axum::extract::State;
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::response::IntoResponse;
use serde::Serialize;
use tracing::{debug, info, warn};

use super::{AppState, WorkspaceView};
use crate::session::WorkspaceEvent;

/// Frames sent to WebSocket clients.
#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum WsFrame {
    WorkspaceSync { workspace: WorkspaceView },
    Event { event: WorkspaceEvent },
}

pub async fn ws_handler(ws: WebSocketUpgrade, State(state): State<AppState>) -> impl IntoResponse {
    info!("WebSocket client connecting");
    ws.on_upgrade(|socket| handle_socket(socket, state))
}

async fn handle_socket(mut socket: WebSocket, state: AppState) {
    info!("WebSocket client connected");

    if send_sync(&mut socket, &state).await.is_err() {
        warn!("Failed to send initial sync, client disconnected");
        return;
    }

    let mut rx = state.session.subscribe();

    loop {
        tokio::select! {
            result = rx.recv() => {
                match result {
                    Ok(event) => {
                        let frame = WsFrame::Event { event };
                        if send_frame(&mut socket, &frame).await.is_err() {
                            debug!("Client disconnected during send");
                            break;
                        }
                    }
                    Err(tokio::sync::broadcast::error::RecvError::Lagged(n)) => {
                        warn!(missed = n, "WS client lagged behind broadcast");
                        // Re-sync with the full workspace state.
                        if send_sync(&mut socket, &state).await.is_err() {
                            break;
                        }
                    }
                    Err(tokio::sync::broadcast::error::RecvError::Closed) => {
                        debug!("Event broadcast closed");
                        break;
                    }
                }
            }

            result = socket.recv() => {
                match result {
                    Some(Ok(Message::Ping(data))) => {
                        if socket.send(Message::Pong(data)).await.is_err() {
                            break;
                        }
                    }
                    Some(Ok(Message::Close(_))) | None => {
                        info!("WebSocket client disconnected");
                        break;
                    }
                    Some(Err(e)) => {
                        warn!(error = %e, "WebSocket error");
                        break;
                    }
                    _ => {}
                }
            }
        }
    }
}

async fn send_sync(socket: &mut WebSocket, state: &AppState) -> Result<(), axum::Error> {
    let workspace = {
        let session = state.session.lock().await;
        WorkspaceView::from_session(&session)
    };
    send_frame(socket, &WsFrame::WorkspaceSync { workspace }).await
}

async fn send_frame(socket: &mut WebSocket, frame: &WsFrame) -> Result<(), axum::Error> {
    match serde_json::to_string(frame) {
        Ok(json) => socket.send(Message::Text(json.into())).await,
        Err(e) => {
            warn!(error = %e, "Failed to serialize WS frame");
            Ok(())
        }
    }
}

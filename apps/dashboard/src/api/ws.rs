//! WebSocket endpoint pushing stats snapshots as they arrive.

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::Response,
};
use futures::{stream::SplitSink, SinkExt, StreamExt};
use rclone_stats::StatsReport;
use serde::Serialize;
use tokio::sync::broadcast;

use crate::services::MonitorEvent;
use crate::AppState;

// =============================================================================
// Message Types
// =============================================================================

/// WebSocket message sent to clients.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum WsMessage {
    /// A new snapshot replaced the previous one.
    Stats(StatsReport),

    /// The rclone rc API became reachable or unreachable.
    Connection { connected: bool },
}

impl From<MonitorEvent> for WsMessage {
    fn from(event: MonitorEvent) -> Self {
        match event {
            MonitorEvent::Report(report) => WsMessage::Stats((*report).clone()),
            MonitorEvent::Connection { connected } => WsMessage::Connection { connected },
        }
    }
}

// =============================================================================
// Handler
// =============================================================================

/// GET /api/ws
///
/// Sends the connection state and current snapshot on connect, then every
/// update published by the monitor.
pub async fn ws_handler(ws: WebSocketUpgrade, State(state): State<AppState>) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

/// Serialize and send one message. Returns false once the client is gone.
async fn send(sender: &mut SplitSink<WebSocket, Message>, message: &WsMessage) -> bool {
    match serde_json::to_string(message) {
        Ok(json) => sender.send(Message::Text(json)).await.is_ok(),
        Err(e) => {
            tracing::error!("Failed to serialize WebSocket message: {}", e);
            true
        }
    }
}

async fn handle_socket(socket: WebSocket, state: AppState) {
    let (mut sender, mut receiver) = socket.split();

    // Subscribe before reading the snapshot so nothing published in between is lost
    let mut event_rx = state.monitor.subscribe();

    tracing::info!("WebSocket client connected");

    let connected = WsMessage::Connection {
        connected: state.monitor.is_connected(),
    };
    if !send(&mut sender, &connected).await {
        return;
    }
    if let Some(report) = state.monitor.snapshot().await {
        if !send(&mut sender, &WsMessage::Stats((*report).clone())).await {
            return;
        }
    }

    loop {
        tokio::select! {
            event = event_rx.recv() => {
                match event {
                    Ok(event) => {
                        if !send(&mut sender, &WsMessage::from(event)).await {
                            tracing::debug!("WebSocket send failed, closing connection");
                            break;
                        }
                    }
                    Err(broadcast::error::RecvError::Lagged(count)) => {
                        // Only the newest snapshot matters; skipped ones are stale
                        tracing::warn!("WebSocket client lagged, missed {} events", count);
                    }
                    Err(broadcast::error::RecvError::Closed) => {
                        tracing::debug!("Event channel closed, closing WebSocket");
                        break;
                    }
                }
            }

            msg = receiver.next() => {
                match msg {
                    Some(Ok(Message::Ping(data))) => {
                        if sender.send(Message::Pong(data)).await.is_err() {
                            break;
                        }
                    }
                    Some(Ok(Message::Close(_))) | None => {
                        tracing::debug!("WebSocket client closed");
                        break;
                    }
                    Some(Ok(_)) => {}
                    Some(Err(e)) => {
                        tracing::debug!("WebSocket error: {}", e);
                        break;
                    }
                }
            }
        }
    }

    tracing::info!("WebSocket client disconnected");
}

//! WebSocket handler for live engine readings

use axum::{
    extract::{
        ws::{Message, WebSocket},
        State, WebSocketUpgrade,
    },
    response::Response,
};
use futures::{SinkExt, StreamExt};
use serde_json::json;
use std::sync::Arc;
use tokio::sync::{broadcast, mpsc};

use crate::api::AppState;
use crate::telemetry::EngineTelemetry;

/// Largest client frame accepted, in bytes
const MAX_FRAME_BYTES: usize = 4 * 1024;

/// Handles WebSocket upgrade requests on `/ws/engine`
pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

/// Handles an established connection.
///
/// Readings sent by the client are recorded; the resulting analytics reach
/// this client and every other one through the telemetry broadcast. Rejected
/// frames are answered with `{"error": ...}` on this socket only.
async fn handle_socket(socket: WebSocket, state: Arc<AppState>) {
    let (mut sender, mut receiver) = socket.split();
    let telemetry = Arc::clone(&state.telemetry);

    let mut updates = telemetry.subscribe();
    let (reply_tx, mut reply_rx) = mpsc::channel::<String>(16);

    metrics::gauge!("twin_ws_clients").increment(1.0);
    tracing::debug!("Engine WebSocket connected");

    let initial = serde_json::to_string(&telemetry.analytics()).ok();

    let send_task = tokio::spawn(async move {
        if let Some(json) = initial {
            if sender.send(Message::Text(json)).await.is_err() {
                return;
            }
        }

        loop {
            let frame = tokio::select! {
                update = updates.recv() => match update {
                    Ok(analytics) => match serde_json::to_string(&analytics) {
                        Ok(json) => json,
                        Err(e) => {
                            tracing::error!("Failed to serialize engine update: {}", e);
                            continue;
                        }
                    },
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        tracing::debug!(skipped, "WebSocket client lagging, skipped updates");
                        continue;
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                },
                reply = reply_rx.recv() => match reply {
                    Some(json) => json,
                    None => break,
                },
            };

            if sender.send(Message::Text(frame)).await.is_err() {
                break;
            }
        }
    });

    let recv_task = tokio::spawn(async move {
        while let Some(Ok(msg)) = receiver.next().await {
            match msg {
                Message::Text(text) => {
                    if let Some(error) = accept_frame(&telemetry, &text) {
                        if reply_tx.send(error).await.is_err() {
                            break;
                        }
                    }
                }
                Message::Close(_) => break,
                // axum answers pings itself
                _ => {}
            }
        }
    });

    tokio::select! {
        _ = send_task => {},
        _ = recv_task => {},
    }

    metrics::gauge!("twin_ws_clients").decrement(1.0);
    tracing::debug!("Engine WebSocket disconnected");
}

/// Record a client frame; returns the error frame to send back, if any.
pub fn accept_frame(telemetry: &EngineTelemetry, text: &str) -> Option<String> {
    let result = if text.len() > MAX_FRAME_BYTES {
        Err(format!("frame exceeds {} bytes", MAX_FRAME_BYTES))
    } else {
        EngineTelemetry::parse_reading(text)
            .and_then(|reading| telemetry.record(reading))
            .map_err(|e| e.to_string())
    };

    match result {
        Ok(_) => None,
        Err(message) => {
            tracing::debug!(error = %message, "Rejected engine frame");
            Some(json!({ "error": message }).to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TelemetryConfig;

    #[test]
    fn test_accept_valid_frame() {
        let telemetry = EngineTelemetry::new(TelemetryConfig::default());
        assert!(accept_frame(&telemetry, r#"{"energy": 520.0, "temp": 310.0}"#).is_none());
        assert_eq!(telemetry.latest().temp, 310.0);
    }

    #[test]
    fn test_reject_malformed_frame() {
        let telemetry = EngineTelemetry::new(TelemetryConfig::default());
        let reply = accept_frame(&telemetry, r#"{"energy": 520.0}"#).unwrap();

        let value: serde_json::Value = serde_json::from_str(&reply).unwrap();
        assert!(value["error"].as_str().unwrap().contains("malformed"));
        assert!(telemetry.history().is_empty());
    }

    #[test]
    fn test_reject_oversized_frame() {
        let telemetry = EngineTelemetry::new(TelemetryConfig::default());
        let frame = format!(r#"{{"energy": 1.0, "temp": 1.0, "pad": "{}"}}"#, "x".repeat(5000));
        assert!(accept_frame(&telemetry, &frame).is_some());
        assert!(telemetry.history().is_empty());
    }
}

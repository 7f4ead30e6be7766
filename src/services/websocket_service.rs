use axum::extract::ws::{Message, WebSocket};
use futures::{SinkExt, StreamExt};
use thiserror::Error;
use tokio::{sync::mpsc, task::JoinHandle};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::{
    dto::ws::{ControlAck, ControlInboundMessage},
    services::scoreboard_service,
    state::{ControllerConnection, SharedState, command::Command},
};

/// Failures while handling a single control frame.
#[derive(Debug, Error)]
enum ControlError {
    /// Writer channel closed; the connection is gone.
    #[error("connection closed")]
    ConnectionClosed,
    #[error("invalid control message: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Handle the full lifecycle of a control-panel WebSocket connection.
pub async fn handle_socket(state: SharedState, socket: WebSocket) {
    let (mut sender, mut receiver) = socket.split();
    let (outbound_tx, mut outbound_rx) = mpsc::unbounded_channel::<Message>();

    // Dedicated writer task keeps acks flowing even while we await inbound frames.
    let writer_task = tokio::spawn(async move {
        while let Some(message) = outbound_rx.recv().await {
            if sender.send(message).await.is_err() {
                break;
            }
        }
    });

    let id = Uuid::new_v4();
    state.controllers().insert(
        id,
        ControllerConnection {
            id,
            tx: outbound_tx.clone(),
        },
    );
    info!(%id, connected = state.controllers().len(), "controller connected");

    while let Some(message) = receiver.next().await {
        match message {
            Ok(Message::Text(text)) => {
                debug!(%id, payload = %text, "received control message");
                match handle_text(&state, &outbound_tx, text.as_str()).await {
                    Ok(()) => {}
                    Err(ControlError::ConnectionClosed) => {
                        info!(%id, "connection closed while acknowledging, terminating");
                        break;
                    }
                    Err(err) => warn!(%id, error = %err, "ignoring control message"),
                }
            }
            Ok(Message::Ping(payload)) => {
                let _ = outbound_tx.send(Message::Pong(payload));
            }
            Ok(Message::Close(frame)) => {
                info!(%id, "controller closed");
                let _ = outbound_tx.send(Message::Close(frame));
                break;
            }
            Ok(Message::Binary(_)) => {}
            Ok(Message::Pong(_)) => {}
            Err(err) => {
                warn!(%id, error = %err, "websocket error");
                break;
            }
        }
    }

    state.controllers().remove(&id);
    info!(%id, "controller disconnected");

    finalize(writer_task, outbound_tx).await;
}

/// Resolve one frame into a command, execute it and acknowledge.
async fn handle_text(
    state: &SharedState,
    tx: &mpsc::UnboundedSender<Message>,
    text: &str,
) -> Result<(), ControlError> {
    let command = match ControlInboundMessage::from_json_str(text)? {
        ControlInboundMessage::Key { key } => state.config().key_bindings().resolve(&key).cloned(),
        ControlInboundMessage::Command { command } => Some(command),
    };

    let ack = match command {
        Some(command) => execute_and_ack(state, command).await,
        None => ControlAck::ignored(),
    };
    send_message_to_websocket(tx, &ack)
}

async fn execute_and_ack(state: &SharedState, command: Command) -> ControlAck {
    let display = scoreboard_service::execute(state, command.clone()).await;
    ControlAck::executed(&command, display)
}

/// Serialize a payload and push it onto the provided WebSocket sender.
///
/// Serialization failures are logged and swallowed; only a closed writer is
/// reported back to the caller.
fn send_message_to_websocket<T>(
    tx: &mpsc::UnboundedSender<Message>,
    value: &T,
) -> Result<(), ControlError>
where
    T: ?Sized + serde::Serialize + std::fmt::Debug,
{
    let payload = match serde_json::to_string(value) {
        Ok(p) => p,
        Err(err) => {
            warn!(error = %err, "failed to serialize message `{value:?}`");
            return Ok(());
        }
    };

    tx.send(Message::Text(payload.into()))
        .map_err(|_| ControlError::ConnectionClosed)
}

/// Ensure the writer task winds down before we return from the socket handler.
async fn finalize(writer_task: JoinHandle<()>, outbound_tx: mpsc::UnboundedSender<Message>) {
    drop(outbound_tx);
    let _ = writer_task.await;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{config::AppConfig, state::AppState};

    async fn ack_for(state: &SharedState, text: &str) -> Result<serde_json::Value, ControlError> {
        let (tx, mut rx) = mpsc::unbounded_channel();
        handle_text(state, &tx, text).await?;
        let Some(Message::Text(reply)) = rx.recv().await else {
            panic!("expected a text reply");
        };
        Ok(serde_json::from_str(reply.as_str()).unwrap())
    }

    #[tokio::test]
    async fn key_presses_execute_bound_commands() {
        let state = AppState::new(AppConfig::default());

        let ack = ack_for(&state, r#"{"type":"key","key":"o"}"#).await.unwrap();
        assert_eq!(ack["accepted"], true);
        assert_eq!(ack["command"], "adjust");
        assert_eq!(ack["display"]["scores"]["visitor"], 1);

        let ack = ack_for(&state, r#"{"type":"key","key":"F12"}"#).await.unwrap();
        assert_eq!(ack["accepted"], false);
        assert!(ack.get("display").is_none());
    }

    #[tokio::test]
    async fn direct_commands_bypass_bindings() {
        let state = AppState::new(AppConfig::default());
        let ack = ack_for(
            &state,
            r#"{"type":"command","command":{"command":"reset_and_configure","minutes":12,"seconds":0}}"#,
        )
        .await
        .unwrap();
        assert_eq!(ack["display"]["game_clock_text"], "12:00");
    }

    #[tokio::test]
    async fn malformed_frames_are_rejected() {
        let state = AppState::new(AppConfig::default());
        let err = ack_for(&state, r#"{"type":"shout"}"#).await.unwrap_err();
        assert!(matches!(err, ControlError::Parse(_)));
    }

    #[tokio::test]
    async fn closed_writer_is_reported() {
        let state = AppState::new(AppConfig::default());
        let (tx, rx) = mpsc::unbounded_channel();
        drop(rx);
        let err = handle_text(&state, &tx, r#"{"type":"key","key":"Control"}"#)
            .await
            .unwrap_err();
        assert!(matches!(err, ControlError::ConnectionClosed));
    }
}

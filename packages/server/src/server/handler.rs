//! WebSocket connection handlers and per-message dispatch.

use std::sync::Arc;

use axum::{
    Json,
    extract::{
        State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::IntoResponse,
};
use futures_util::{sink::SinkExt, stream::StreamExt};
use tokio::sync::mpsc;
use uuid::Uuid;

use crate::error::SceneError;
use crate::messages::{ClientMessage, GameInfo, ServerMessage};
use crate::scene::{SceneProvider, parse_float};

use super::state::AppState;

pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(|socket| handle_socket(socket, state))
}

/// Health check endpoint
pub async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({"status": "ok"}))
}

/// Run one connection's lifecycle: register, process inbound frames
/// strictly sequentially, and unregister on every exit path.
pub async fn handle_socket(socket: WebSocket, state: Arc<AppState>) {
    let client_id = Uuid::new_v4();

    // Channel through which both responses and broadcast frames reach this
    // client; a single writer task keeps the socket ordering consistent.
    let (tx, mut rx) = mpsc::unbounded_channel::<String>();

    {
        let mut registry = state.registry.lock().await;
        registry.register(client_id, tx.clone());
    }
    tracing::info!("Client '{}' connected and registered", client_id);

    let (mut sender, mut receiver) = socket.split();

    let recv_state = state.clone();
    let mut recv_task = tokio::spawn(async move {
        while let Some(msg) = receiver.next().await {
            let msg = match msg {
                Ok(msg) => msg,
                Err(e) => {
                    tracing::debug!("Client '{}' transport error: {}", client_id, e);
                    break;
                }
            };

            match msg {
                Message::Text(text) => {
                    let request = match serde_json::from_str::<ClientMessage>(text.as_str()) {
                        Ok(request) => request,
                        Err(e) => {
                            // A frame that is not valid JSON (or is missing
                            // required fields) is fatal for this connection.
                            tracing::warn!(
                                "Client '{}' sent an undecodable frame, closing: {}",
                                client_id,
                                e
                            );
                            break;
                        }
                    };

                    if let Some(response) = dispatch(&recv_state, request).await {
                        match serde_json::to_string(&response) {
                            Ok(json) => {
                                if tx.send(json).is_err() {
                                    break;
                                }
                            }
                            Err(e) => {
                                tracing::error!("Failed to serialize response: {}", e);
                            }
                        }
                    }
                }
                Message::Close(_) => {
                    tracing::debug!("Client '{}' requested close", client_id);
                    break;
                }
                // Ping/pong is handled by the WebSocket layer; binary
                // frames are not part of the protocol.
                _ => {}
            }
        }
    });

    let mut send_task = tokio::spawn(async move {
        while let Some(frame) = rx.recv().await {
            if sender.send(Message::Text(frame.into())).await.is_err() {
                break;
            }
        }
    });

    // If any one of the tasks completes, abort the other
    tokio::select! {
        _ = &mut recv_task => send_task.abort(),
        _ = &mut send_task => recv_task.abort(),
    };

    // The unregister step runs regardless of which side ended the
    // connection or why.
    {
        let mut registry = state.registry.lock().await;
        registry.unregister(&client_id);
    }
    tracing::info!("Client '{}' disconnected and removed from registry", client_id);
}

/// Handle a single decoded request and produce the response frame, if any.
///
/// Every fault is converted into an `error` message here; nothing raised by
/// the scene collaborator terminates the connection.
pub(crate) async fn dispatch(state: &AppState, request: ClientMessage) -> Option<ServerMessage> {
    let response = match request {
        ClientMessage::GetObjects => ServerMessage::Objects {
            data: state.scene.list_objects().await,
        },
        ClientMessage::GetObjectProperties { name } => {
            // Record the selection before the lookup: a nonexistent name is
            // still the new selection.
            {
                let mut registry = state.registry.lock().await;
                registry.set_selected(Some(name.clone()));
            }
            object_properties_message(state.scene.as_ref(), &name).await
        }
        ClientMessage::UpdateObjectProperty {
            object,
            property,
            value,
            axis,
        } => match state
            .scene
            .update_property(&object, &property, &value, axis.as_deref())
            .await
        {
            Ok(()) => ServerMessage::UpdateSuccess,
            Err(e) => {
                tracing::warn!("Update of '{}.{}' rejected: {}", object, property, e);
                ServerMessage::Error {
                    message: e.to_string(),
                }
            }
        },
        ClientMessage::ToggleVisibility { object } => {
            match state.scene.toggle_visibility(&object).await {
                Ok(visible) => ServerMessage::VisibilityUpdated { object, visible },
                Err(e) => ServerMessage::Error {
                    message: e.to_string(),
                },
            }
        }
        ClientMessage::GetGameInfo => {
            let mouse_visible = state.registry.lock().await.mouse_visible();
            ServerMessage::GameInfo {
                data: GameInfo {
                    fps: state.scene.average_frame_rate().await,
                    game_speed: state.scene.time_scale().await,
                    mouse_visible,
                },
            }
        }
        ClientMessage::SetGameSpeed { speed } => match parse_float(&speed) {
            Ok(scale) => {
                state.scene.set_time_scale(scale).await;
                // Echo the requested value back literally, not the applied one.
                ServerMessage::GameSpeedUpdated { speed }
            }
            Err(e) => ServerMessage::Error {
                message: e.to_string(),
            },
        },
        // Deliberate stub: no current engine binding exposes a physics
        // debug overlay.
        ClientMessage::TogglePhysicsDebug => ServerMessage::Error {
            message: "Physics debug visualization is not supported by this engine".to_string(),
        },
        ClientMessage::ToggleMouse => {
            let visible = {
                let mut registry = state.registry.lock().await;
                registry.toggle_mouse()
            };
            state.scene.show_mouse_cursor(visible).await;
            ServerMessage::MouseVisibilityUpdated { visible }
        }
        ClientMessage::RestartGame => {
            state.scene.restart().await;
            ServerMessage::GameRestarted
        }
        ClientMessage::EndGame => {
            state.scene.end().await;
            ServerMessage::GameEnded
        }
        ClientMessage::Unknown => return None,
    };

    Some(response)
}

/// Build the `object_properties` frame for a name, or the `error` frame the
/// protocol reports instead.
pub(crate) async fn object_properties_message(
    scene: &dyn SceneProvider,
    name: &str,
) -> ServerMessage {
    match scene.snapshot(name).await {
        Ok(data) => ServerMessage::ObjectProperties { data },
        Err(e @ SceneError::ObjectNotFound(_)) => ServerMessage::Error {
            message: e.to_string(),
        },
        Err(e) => {
            tracing::error!("Failed to snapshot object '{}': {}", name, e);
            ServerMessage::Error {
                message: format!("Error processing object {name}: {e}"),
            }
        }
    }
}

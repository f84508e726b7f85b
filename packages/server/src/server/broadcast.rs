//! Periodic broadcast of scene state to every connected client.

use std::sync::Arc;
use std::time::Duration;

use crate::messages::ServerMessage;

use super::handler::object_properties_message;
use super::state::{AppState, ClientTx};
use uuid::Uuid;

/// Fixed broadcast period: twice per second, best-effort cadence.
pub const BROADCAST_INTERVAL: Duration = Duration::from_millis(500);

/// Run the broadcast loop until the server shuts down.
///
/// Each tick, while any clients are connected, pushes the full object list
/// to every client, plus the selected object's property snapshot if a
/// selection is set.
pub async fn run_broadcast_loop(state: Arc<AppState>) {
    let mut interval = tokio::time::interval(BROADCAST_INTERVAL);
    loop {
        interval.tick().await;
        broadcast_tick(&state).await;
    }
}

/// One broadcast tick.
pub(crate) async fn broadcast_tick(state: &AppState) {
    // Take an iterate-once membership snapshot so fan-out is unaffected by
    // clients connecting or disconnecting mid-tick.
    let (senders, selected) = {
        let registry = state.registry.lock().await;
        if registry.is_empty() {
            return;
        }
        (registry.snapshot_senders(), registry.selected())
    };

    let objects = ServerMessage::Objects {
        data: state.scene.list_objects().await,
    };
    fan_out(&senders, &objects, "object list");

    if let Some(name) = selected {
        let properties = object_properties_message(state.scene.as_ref(), &name).await;
        fan_out(&senders, &properties, "object properties");
    }
}

/// Serialize a frame once and send the identical string to every client.
/// A failed send is logged and skipped; it never aborts the rest.
fn fan_out(senders: &[(Uuid, ClientTx)], message: &ServerMessage, what: &str) {
    let frame = match serde_json::to_string(message) {
        Ok(frame) => frame,
        Err(e) => {
            // The server constructs every outbound frame itself, so this
            // indicates a bug rather than bad input.
            tracing::error!("Failed to serialize {} broadcast: {}", what, e);
            return;
        }
    };

    for (client_id, tx) in senders {
        if tx.send(frame.clone()).is_err() {
            tracing::warn!("Failed to push {} to client '{}'", what, client_id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::memory::InMemoryScene;
    use serde_json::Value;
    use tokio::sync::mpsc;
    use uuid::Uuid;

    async fn register_client(state: &AppState) -> mpsc::UnboundedReceiver<String> {
        let (tx, rx) = mpsc::unbounded_channel();
        state.registry.lock().await.register(Uuid::new_v4(), tx);
        rx
    }

    fn frame_type(frame: &str) -> String {
        let value: Value = serde_json::from_str(frame).unwrap();
        value["type"].as_str().unwrap().to_string()
    }

    #[tokio::test]
    async fn test_tick_without_clients_does_nothing() {
        // given (precondition):
        let state = AppState::new(Arc::new(InMemoryScene::demo()));

        // when (operation): no clients are registered
        broadcast_tick(&state).await;

        // then (expected result): nothing to observe, and nothing panicked
        assert!(state.registry.lock().await.is_empty());
    }

    #[tokio::test]
    async fn test_tick_pushes_object_list_to_every_client() {
        // given (precondition):
        let state = AppState::new(Arc::new(InMemoryScene::demo()));
        let mut rx1 = register_client(&state).await;
        let mut rx2 = register_client(&state).await;

        // when (operation):
        broadcast_tick(&state).await;

        // then (expected result): both clients got the identical frame
        let frame1 = rx1.recv().await.unwrap();
        let frame2 = rx2.recv().await.unwrap();
        assert_eq!(frame1, frame2);
        assert_eq!(frame_type(&frame1), "objects");
    }

    #[tokio::test]
    async fn test_tick_with_selection_pushes_identical_snapshot_to_all() {
        // given (precondition):
        let state = AppState::new(Arc::new(InMemoryScene::demo()));
        let mut rx1 = register_client(&state).await;
        let mut rx2 = register_client(&state).await;
        state
            .registry
            .lock()
            .await
            .set_selected(Some("Cube".to_string()));

        // when (operation):
        broadcast_tick(&state).await;

        // then (expected result): object list plus byte-identical snapshots
        let _ = rx1.recv().await.unwrap();
        let _ = rx2.recv().await.unwrap();
        let snapshot1 = rx1.recv().await.unwrap();
        let snapshot2 = rx2.recv().await.unwrap();
        assert_eq!(snapshot1, snapshot2);
        assert_eq!(frame_type(&snapshot1), "object_properties");
    }

    #[tokio::test]
    async fn test_tick_with_missing_selection_reports_error_frames() {
        // given (precondition): the selection names an object that is gone
        let state = AppState::new(Arc::new(InMemoryScene::demo()));
        let mut rx = register_client(&state).await;
        state
            .registry
            .lock()
            .await
            .set_selected(Some("Ghost".to_string()));

        // when (operation):
        broadcast_tick(&state).await;

        // then (expected result): the tick still completes, with an error
        // frame in place of the snapshot
        let _ = rx.recv().await.unwrap();
        let frame = rx.recv().await.unwrap();
        assert_eq!(frame_type(&frame), "error");
        assert!(frame.contains("Ghost"));
    }

    #[tokio::test]
    async fn test_dropped_client_does_not_starve_the_others() {
        // given (precondition): three clients, one of which disconnected
        // without being unregistered yet
        let state = AppState::new(Arc::new(InMemoryScene::demo()));
        let mut rx1 = register_client(&state).await;
        let rx2 = register_client(&state).await;
        let mut rx3 = register_client(&state).await;
        drop(rx2);

        // when (operation):
        broadcast_tick(&state).await;

        // then (expected result): the survivors still receive the tick
        assert_eq!(frame_type(&rx1.recv().await.unwrap()), "objects");
        assert_eq!(frame_type(&rx3.recv().await.unwrap()), "objects");
    }
}

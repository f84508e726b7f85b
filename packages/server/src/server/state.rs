//! Server state and connection management.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{Mutex, mpsc};
use uuid::Uuid;

use crate::scene::SceneProvider;

/// Outbound channel of one connected client; frames are pre-serialized JSON.
pub type ClientTx = mpsc::UnboundedSender<String>;

/// Process-wide client registry and selection state.
///
/// Guarded by a single mutex inside [`AppState`], so registrations,
/// selection changes and the broadcast loop's reads are atomic with respect
/// to each other.
pub struct Registry {
    clients: HashMap<Uuid, ClientTx>,
    selected: Option<String>,
    mouse_visible: bool,
}

impl Registry {
    pub fn new() -> Self {
        Self {
            clients: HashMap::new(),
            selected: None,
            mouse_visible: true,
        }
    }

    pub fn register(&mut self, client_id: Uuid, sender: ClientTx) {
        self.clients.insert(client_id, sender);
    }

    /// Remove a client. Removing an already-absent client is a no-op, which
    /// covers the race between disconnect detection and cleanup.
    pub fn unregister(&mut self, client_id: &Uuid) {
        self.clients.remove(client_id);
    }

    pub fn is_empty(&self) -> bool {
        self.clients.is_empty()
    }

    pub fn len(&self) -> usize {
        self.clients.len()
    }

    /// The selected object name broadcast to all clients. It need not
    /// currently exist in the scene.
    pub fn selected(&self) -> Option<String> {
        self.selected.clone()
    }

    pub fn set_selected(&mut self, name: Option<String>) {
        self.selected = name;
    }

    pub fn mouse_visible(&self) -> bool {
        self.mouse_visible
    }

    /// Flip the process-wide mouse-cursor flag and return the new value.
    pub fn toggle_mouse(&mut self) -> bool {
        self.mouse_visible = !self.mouse_visible;
        self.mouse_visible
    }

    /// Iterate-once copy of the current membership, so broadcast fan-out is
    /// unaffected by concurrent connects and disconnects.
    pub fn snapshot_senders(&self) -> Vec<(Uuid, ClientTx)> {
        self.clients
            .iter()
            .map(|(id, tx)| (*id, tx.clone()))
            .collect()
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

/// Shared application state.
pub struct AppState {
    /// Client registry, selection and mouse flag under one lock.
    pub registry: Mutex<Registry>,
    /// The external scene, serialized internally by its implementation.
    pub scene: Arc<dyn SceneProvider>,
}

impl AppState {
    pub fn new(scene: Arc<dyn SceneProvider>) -> Self {
        Self {
            registry: Mutex::new(Registry::new()),
            scene,
        }
    }
}

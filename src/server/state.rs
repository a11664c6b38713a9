//! Shared server state.

use std::sync::Arc;

use tokio::sync::Mutex;

use crate::common::time::Clock;

use super::catalog::RoomCatalog;
use super::events::PresenceSnapshot;
use super::registry::SessionRegistry;
use super::router::MessageRouter;
use super::transport::Transport;

/// The mutable chat core: who is online and which rooms exist.
///
/// Guarded by a single mutex so every mutation-plus-presence-broadcast runs
/// as one serialized step (the ordering point the handlers rely on).
#[derive(Debug, Default)]
pub struct ChatState {
    pub registry: SessionRegistry,
    pub catalog: RoomCatalog,
}

impl ChatState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Recompute the presence view from the current registry and catalog.
    pub fn presence(&self) -> PresenceSnapshot {
        PresenceSnapshot {
            users: self.registry.snapshot(),
            groups: self.catalog.snapshot(),
        }
    }
}

/// Shared application state, constructed once at startup and passed into
/// every per-connection handler.
pub struct AppState {
    pub chat: Mutex<ChatState>,
    pub transport: Arc<dyn Transport>,
    pub router: MessageRouter,
}

impl AppState {
    pub fn new(transport: Arc<dyn Transport>, clock: Arc<dyn Clock>) -> Self {
        Self {
            chat: Mutex::new(ChatState::new()),
            router: MessageRouter::new(transport.clone(), clock),
            transport,
        }
    }
}

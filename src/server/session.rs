//! Per-connection session controller.
//!
//! Binds a connection's inbound events to the registry, catalog and router.
//! A session is `Named` once its connection holds a username; room and send
//! operations require that and are dropped (logged) otherwise. Every
//! state-changing operation ends with a presence broadcast, emitted while
//! the chat lock is still held so all clients observe mutations in order.

use std::sync::Arc;

use super::catalog::private_room_name;
use super::error::ChatError;
use super::events::{ClientEvent, ServerFrame};
use super::state::{AppState, ChatState};
use super::transport::ConnId;

/// What the event loop should do after handling an inbound event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionControl {
    Continue,
    Stop,
}

#[derive(Clone)]
pub struct ConnectionSession {
    conn: ConnId,
    state: Arc<AppState>,
}

impl ConnectionSession {
    pub fn new(conn: ConnId, state: Arc<AppState>) -> Self {
        Self { conn, state }
    }

    /// Greet a fresh connection with the current presence snapshot.
    pub async fn on_connect(&self) {
        let chat = self.state.chat.lock().await;
        self.emit_to_self(&ServerFrame::available(&chat.presence()))
            .await;
    }

    /// Dispatch one inbound client event.
    pub async fn handle(&self, event: ClientEvent) -> SessionControl {
        match event {
            ClientEvent::Join { username } | ClientEvent::ChangeUsername { username } => {
                self.join_chat(&username).await;
            }
            ClientEvent::JoinGroup { group } => {
                self.join_group(&group).await;
            }
            ClientEvent::JoinPrivate { username } => {
                self.join_private(&username).await;
            }
            ClientEvent::SendGroupMessage {
                message,
                group,
                is_text,
            } => {
                self.send_group_message(message, &group, is_text).await;
            }
            ClientEvent::SendPrivateMessage {
                message,
                username,
                is_text,
            } => {
                self.send_private_message(message, &username, is_text).await;
            }
            ClientEvent::Disconnect => return SessionControl::Stop,
        }
        SessionControl::Continue
    }

    /// Claim (or rename to) `username`. Duplicate names bounce an `error`
    /// frame back to this connection only; success broadcasts presence.
    async fn join_chat(&self, username: &str) {
        let mut chat = self.state.chat.lock().await;
        match chat.registry.register(self.conn, username) {
            Ok(()) => {
                tracing::info!("Connection '{}' claimed username '{}'", self.conn, username);
                self.broadcast_presence(&chat).await;
            }
            Err(e) => {
                tracing::warn!(
                    "Connection '{}' rejected for username '{}': {}",
                    self.conn,
                    username,
                    e
                );
                self.emit_to_self(&ServerFrame::error(&e.to_string())).await;
            }
        }
    }

    async fn join_group(&self, group: &str) {
        let mut chat = self.state.chat.lock().await;
        let Some(username) = chat.registry.username_of(self.conn).map(str::to_owned) else {
            tracing::warn!(
                "Connection '{}' tried to join group '{}' without a username",
                self.conn,
                group
            );
            return;
        };

        self.state.transport.join_room(self.conn, group).await;
        self.state
            .router
            .send_group(&username, group, Some("joining".to_string()), true)
            .await;

        if chat.catalog.ensure_group(group) {
            tracing::info!("Group room '{}' created by '{}'", group, username);
            self.broadcast_presence(&chat).await;
        }
    }

    async fn join_private(&self, target: &str) {
        let mut chat = self.state.chat.lock().await;
        let Some(username) = chat.registry.username_of(self.conn).map(str::to_owned) else {
            tracing::warn!(
                "Connection '{}' tried to open a private room without a username",
                self.conn
            );
            return;
        };
        let Some(target_conn) = chat.registry.connection_of(target) else {
            tracing::warn!("{}", ChatError::TargetNotFound(target.to_string()));
            return;
        };

        // Both ends join the canonical room before the system message goes out.
        let room = private_room_name(&username, target);
        self.state.transport.join_room(self.conn, &room).await;
        self.state.transport.join_room(target_conn, &room).await;
        self.state
            .router
            .send_private(
                &chat.registry,
                &username,
                target,
                Some("joining".to_string()),
                true,
            )
            .await;

        if chat.catalog.ensure_private(&username, target) {
            tracing::info!("Private room '{}' created", room);
            self.broadcast_presence(&chat).await;
        }
    }

    async fn send_group_message(&self, message: Option<String>, group: &str, is_text: bool) {
        let chat = self.state.chat.lock().await;
        let Some(username) = chat.registry.username_of(self.conn) else {
            tracing::warn!(
                "Connection '{}' tried to message group '{}' without a username",
                self.conn,
                group
            );
            return;
        };
        self.state
            .router
            .send_group(username, group, message, is_text)
            .await;
    }

    async fn send_private_message(&self, message: Option<String>, target: &str, is_text: bool) {
        let chat = self.state.chat.lock().await;
        let Some(username) = chat.registry.username_of(self.conn) else {
            tracing::warn!(
                "Connection '{}' tried to message '{}' without a username",
                self.conn,
                target
            );
            return;
        };
        self.state
            .router
            .send_private(&chat.registry, username, target, message, is_text)
            .await;
    }

    /// Terminal teardown: release the username and tell everyone left.
    /// Idempotent; safe to call after an explicit `disconnect` event.
    pub async fn disconnect(&self) {
        let mut chat = self.state.chat.lock().await;
        chat.registry.unregister(self.conn);
        tracing::info!("Connection '{}' removed from registry", self.conn);
        self.broadcast_presence(&chat).await;
    }

    async fn emit_to_self(&self, frame: &ServerFrame) {
        if let Err(e) = self.state.transport.emit_to(self.conn, &frame.encode()).await {
            tracing::warn!("Failed to emit '{}' to '{}': {}", frame.event, self.conn, e);
        }
    }

    // Callers hold the chat lock; emitting before it drops is what keeps
    // presence broadcasts in mutation order across connections.
    async fn broadcast_presence(&self, chat: &ChatState) {
        let frame = ServerFrame::available(&chat.presence()).encode();
        self.state.transport.emit_all(&frame).await;
    }
}

//! Transport capability and its in-process WebSocket adapter.
//!
//! The core never talks to sockets directly; it asks the transport to
//! deliver a pre-serialized frame to a connection, a room, or everyone, and
//! to move connections in and out of rooms. Room membership is owned here,
//! not by the core.

use std::collections::{HashMap, HashSet};
use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::{Mutex, mpsc};
use uuid::Uuid;

use super::error::TransportError;

/// Channel feeding a connection's outbound WebSocket task.
pub type FrameSender = mpsc::UnboundedSender<String>;

/// Opaque connection identity, minted by the transport at upgrade time.
/// The core only associates data with it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ConnId(Uuid);

impl ConnId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ConnId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ConnId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Delivery capability the session core is written against.
///
/// `emit_to` surfaces a missing connection as an error; the room and
/// broadcast variants tolerate partial failure (slow or vanished peers are
/// logged and skipped).
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Transport: Send + Sync {
    /// Attach a connection's outbound channel.
    async fn register(&self, conn: ConnId, sender: FrameSender);

    /// Detach a connection and remove it from every room it joined.
    async fn unregister(&self, conn: ConnId);

    /// Add a connection to a room, creating the room on first join.
    async fn join_room(&self, conn: ConnId, room: &str);

    /// Deliver a frame to a single connection.
    async fn emit_to(&self, conn: ConnId, frame: &str) -> Result<(), TransportError>;

    /// Deliver a frame to every connection currently in `room`.
    async fn emit_to_room(&self, room: &str, frame: &str);

    /// Deliver a frame to every registered connection.
    async fn emit_all(&self, frame: &str);
}

/// WebSocket-backed transport: one unbounded sender per connection plus a
/// name-to-members map for rooms.
#[derive(Default)]
pub struct WsTransport {
    conns: Mutex<HashMap<ConnId, FrameSender>>,
    rooms: Mutex<HashMap<String, HashSet<ConnId>>>,
}

impl WsTransport {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Transport for WsTransport {
    async fn register(&self, conn: ConnId, sender: FrameSender) {
        let mut conns = self.conns.lock().await;
        conns.insert(conn, sender);
        tracing::debug!("Connection '{}' registered to transport", conn);
    }

    async fn unregister(&self, conn: ConnId) {
        {
            let mut conns = self.conns.lock().await;
            conns.remove(&conn);
        }
        let mut rooms = self.rooms.lock().await;
        for members in rooms.values_mut() {
            members.remove(&conn);
        }
        tracing::debug!("Connection '{}' unregistered from transport", conn);
    }

    async fn join_room(&self, conn: ConnId, room: &str) {
        let mut rooms = self.rooms.lock().await;
        rooms.entry(room.to_string()).or_default().insert(conn);
        tracing::debug!("Connection '{}' joined room '{}'", conn, room);
    }

    async fn emit_to(&self, conn: ConnId, frame: &str) -> Result<(), TransportError> {
        let conns = self.conns.lock().await;
        let sender = conns
            .get(&conn)
            .ok_or(TransportError::ConnectionNotFound(conn))?;
        sender
            .send(frame.to_string())
            .map_err(|e| TransportError::SendFailed(e.to_string()))?;
        Ok(())
    }

    async fn emit_to_room(&self, room: &str, frame: &str) {
        let members: Vec<ConnId> = {
            let rooms = self.rooms.lock().await;
            rooms
                .get(room)
                .map(|members| members.iter().copied().collect())
                .unwrap_or_default()
        };

        let conns = self.conns.lock().await;
        for member in members {
            if let Some(sender) = conns.get(&member) {
                if sender.send(frame.to_string()).is_err() {
                    tracing::warn!("Failed to push frame to connection '{}'", member);
                }
            }
        }
    }

    async fn emit_all(&self, frame: &str) {
        let conns = self.conns.lock().await;
        for (conn, sender) in conns.iter() {
            if sender.send(frame.to_string()).is_err() {
                tracing::warn!("Failed to push frame to connection '{}'", conn);
            }
        }
    }
}

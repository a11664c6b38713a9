//! Wire DTOs: inbound client events and outbound server frames.

use serde::{Deserialize, Serialize};

use super::catalog::RoomEntry;

/// Client-originated events, internally tagged on `"event"`.
///
/// `message` is optional on the send events; a missing or null message is
/// normalized to the empty string when the envelope is built.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "event", rename_all = "kebab-case", rename_all_fields = "camelCase")]
pub enum ClientEvent {
    Join {
        username: String,
    },
    ChangeUsername {
        username: String,
    },
    JoinGroup {
        group: String,
    },
    JoinPrivate {
        username: String,
    },
    SendGroupMessage {
        #[serde(default)]
        message: Option<String>,
        group: String,
        #[serde(default)]
        is_text: bool,
    },
    SendPrivateMessage {
        #[serde(default)]
        message: Option<String>,
        username: String,
        #[serde(default)]
        is_text: bool,
    },
    Disconnect,
}

/// A routed chat message. Built fresh per send, never stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    pub chat_name: String,
    pub from: String,
    pub message: String,
    pub is_text: bool,
    /// ISO 8601 timestamp, millisecond precision, UTC.
    pub time: String,
}

/// Derived view of who is online and which rooms exist. Recomputed per
/// broadcast.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PresenceSnapshot {
    pub users: Vec<String>,
    pub groups: Vec<RoomEntry>,
}

/// Outbound envelope. Room-bound frames carry their room in the event name
/// (`group-<name>` / `private-<name>`) so clients subscribe per room instead
/// of filtering a shared firehose.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerFrame {
    pub event: String,
    pub payload: serde_json::Value,
}

impl ServerFrame {
    pub fn available(snapshot: &PresenceSnapshot) -> Self {
        Self {
            event: "available".to_string(),
            payload: serde_json::to_value(snapshot).unwrap(),
        }
    }

    pub fn error(message: &str) -> Self {
        Self {
            event: "error".to_string(),
            payload: serde_json::Value::String(message.to_string()),
        }
    }

    pub fn group_message(group: &str, message: &ChatMessage) -> Self {
        Self {
            event: format!("group-{group}"),
            payload: serde_json::to_value(message).unwrap(),
        }
    }

    pub fn private_message(room: &str, message: &ChatMessage) -> Self {
        Self {
            event: format!("private-{room}"),
            payload: serde_json::to_value(message).unwrap(),
        }
    }

    pub fn encode(&self) -> String {
        serde_json::to_string(self).unwrap()
    }
}

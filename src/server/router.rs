//! Message envelope construction and room dispatch.

use std::sync::Arc;

use crate::common::time::Clock;

use super::catalog::private_room_name;
use super::error::ChatError;
use super::events::{ChatMessage, ServerFrame};
use super::registry::SessionRegistry;
use super::transport::Transport;

/// Builds message envelopes and hands them to the transport's room
/// broadcast, one event namespace per room.
pub struct MessageRouter {
    transport: Arc<dyn Transport>,
    clock: Arc<dyn Clock>,
}

impl MessageRouter {
    pub fn new(transport: Arc<dyn Transport>, clock: Arc<dyn Clock>) -> Self {
        Self { transport, clock }
    }

    fn build_message(
        &self,
        chat_name: &str,
        from: &str,
        message: Option<String>,
        is_text: bool,
    ) -> ChatMessage {
        ChatMessage {
            chat_name: chat_name.to_string(),
            from: from.to_string(),
            message: message.unwrap_or_default(),
            is_text,
            time: self.clock.now_rfc3339(),
        }
    }

    /// Broadcast a message into a group room as event `group-<group>`.
    pub async fn send_group(&self, from: &str, group: &str, message: Option<String>, is_text: bool) {
        let envelope = self.build_message(group, from, message, is_text);
        let frame = ServerFrame::group_message(group, &envelope).encode();
        self.transport.emit_to_room(group, &frame).await;
    }

    /// Broadcast a message into the private room shared with `target` as
    /// event `private-<room>`. An unknown target drops the send; the sender
    /// is not notified.
    pub async fn send_private(
        &self,
        registry: &SessionRegistry,
        from: &str,
        target: &str,
        message: Option<String>,
        is_text: bool,
    ) {
        if registry.connection_of(target).is_none() {
            tracing::warn!("{}", ChatError::TargetNotFound(target.to_string()));
            return;
        }
        let room = private_room_name(from, target);
        let envelope = self.build_message(&room, from, message, is_text);
        let frame = ServerFrame::private_message(&room, &envelope).encode();
        self.transport.emit_to_room(&room, &frame).await;
    }
}

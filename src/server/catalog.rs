//! Room catalog and canonical private room naming.

use serde::{Deserialize, Serialize};

/// Derive the canonical, order-independent channel name for two usernames.
///
/// Symmetric for all inputs: `private_room_name(a, b) == private_room_name(b, a)`.
/// Equal names produce the degenerate self-chat name `"a-a"`, which is
/// allowed and not special-cased.
pub fn private_room_name(a: &str, b: &str) -> String {
    if a <= b {
        format!("{a}-{b}")
    } else {
        format!("{b}-{a}")
    }
}

/// A known room: `(is_group, name)`.
///
/// Serializes as a two-element JSON array `[isGroup, name]`, the shape the
/// presence snapshot carries on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomEntry(pub bool, pub String);

impl RoomEntry {
    pub fn group(name: &str) -> Self {
        Self(true, name.to_string())
    }

    pub fn private(name: &str) -> Self {
        Self(false, name.to_string())
    }

    pub fn is_group(&self) -> bool {
        self.0
    }

    pub fn name(&self) -> &str {
        &self.1
    }
}

/// Process-wide set of known rooms, group and private, in creation order.
///
/// Uniqueness is keyed on the name alone: `ensure_*` is a no-op on an
/// existing name even when the kind differs, so a group and a private room
/// never coexist under one name.
#[derive(Debug, Default)]
pub struct RoomCatalog {
    entries: Vec<RoomEntry>,
}

impl RoomCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    fn contains(&self, name: &str) -> bool {
        self.entries.iter().any(|entry| entry.name() == name)
    }

    /// Add a group room if absent. Returns `true` iff newly created.
    pub fn ensure_group(&mut self, name: &str) -> bool {
        if self.contains(name) {
            return false;
        }
        self.entries.push(RoomEntry::group(name));
        true
    }

    /// Add the private room for a username pair if absent.
    /// Returns `true` iff newly created.
    pub fn ensure_private(&mut self, a: &str, b: &str) -> bool {
        let name = private_room_name(a, b);
        if self.contains(&name) {
            return false;
        }
        self.entries.push(RoomEntry::private(&name));
        true
    }

    pub fn snapshot(&self) -> Vec<RoomEntry> {
        self.entries.clone()
    }
}

//! Connection-to-username registry.

use std::collections::HashMap;

use super::error::ChatError;
use super::transport::ConnId;

/// Process-wide mapping from connection identity to claimed username.
///
/// Exactly one entry per live connection; usernames are unique across all
/// live entries at any instant. The registry owns the mapping and nothing
/// else; broadcasting the resulting presence change is the caller's job.
#[derive(Debug, Default)]
pub struct SessionRegistry {
    users: HashMap<ConnId, String>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim `username` for `conn`.
    ///
    /// Fails with `DuplicateName` if any live connection already holds the
    /// exact (case-sensitive) name. The check scans every live name,
    /// including the caller's own, so re-claiming one's current name also
    /// fails. On success any prior name held by `conn` is replaced, which is
    /// what makes `change-username` a rename-in-place.
    pub fn register(&mut self, conn: ConnId, username: &str) -> Result<(), ChatError> {
        if self.users.values().any(|name| name == username) {
            return Err(ChatError::DuplicateName);
        }
        self.users.insert(conn, username.to_string());
        Ok(())
    }

    /// Remove the mapping for `conn`. No-op if absent.
    pub fn unregister(&mut self, conn: ConnId) {
        self.users.remove(&conn);
    }

    pub fn username_of(&self, conn: ConnId) -> Option<&str> {
        self.users.get(&conn).map(String::as_str)
    }

    /// Resolve a username back to its connection. Linear scan; fine at the
    /// registry sizes this server handles.
    pub fn connection_of(&self, username: &str) -> Option<ConnId> {
        self.users
            .iter()
            .find_map(|(conn, name)| (name == username).then_some(*conn))
    }

    /// All live usernames. Order is not meaningful.
    pub fn snapshot(&self) -> Vec<String> {
        self.users.values().cloned().collect()
    }
}

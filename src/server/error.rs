//! Error types for the session and routing core.

use thiserror::Error;

use super::transport::ConnId;

/// Failures of the session/room core.
///
/// `DuplicateName` is the only user-visible failure; its display string is
/// what gets sent back on the `error` event. `TargetNotFound` is logged
/// server-side and the triggering request is dropped.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ChatError {
    #[error("Username cannot be duplicated")]
    DuplicateName,
    #[error("Username {0} not found")]
    TargetNotFound(String),
}

/// Failures while pushing frames through the transport.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("connection {0} not found")]
    ConnectionNotFound(ConnId),
    #[error("failed to push frame: {0}")]
    SendFailed(String),
}

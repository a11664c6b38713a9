//! Real-time presence and room-based message relay.
//!
//! Clients hold a persistent WebSocket connection, claim a unique display
//! name, join group or private rooms, and exchange messages routed through
//! named channels. Presence changes are broadcast to every connection.

pub mod server;

// shared library
pub mod common;

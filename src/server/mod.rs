//! Presence and room-based chat relay server implementation.

pub mod catalog;
pub mod error;
pub mod events;
pub mod registry;
pub mod router;
pub mod session;
pub mod state;
pub mod transport;

mod handler;
mod runner;
mod signal;

pub use runner::run_server;

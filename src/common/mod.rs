//! Shared utilities used by the server and its tests.

pub mod logger;
pub mod time;

//! Soundpad remote control client
//!
//! This library talks to the Soundpad desktop application through its
//! remote control pipe: one text command out, one text response back.

pub mod cli;
pub mod commands;
pub mod common;
pub mod ipc;
pub mod remote;

// Re-export commonly used types
pub use common::{Error, Result};
pub use ipc::{Command, Reply, Status, Transport, CLIENT_VERSION};
pub use remote::{PlayStatus, Sound, SoundpadClient};

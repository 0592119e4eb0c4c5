//! IPC with the Soundpad application
//!
//! Uses Soundpad's named pipe on Windows and a Unix domain socket elsewhere.

pub mod pipe;
pub mod protocol;
pub mod transport;

pub use pipe::{Connector, Pipe, PipeConnector};
pub use protocol::{Command, Reply, Status, CLIENT_VERSION};
pub use transport::Transport;

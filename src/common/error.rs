//! Error types for the Soundpad remote client
//!
//! Error messages are meant to be actionable for someone sitting in front of
//! the CLI, with a hint on how to resolve the common cases.

use std::io;
use thiserror::Error;

use crate::ipc::protocol::Status;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the Soundpad remote client
#[derive(Error, Debug)]
pub enum Error {
    // === Connection Errors ===
    #[error("Could not reach Soundpad at '{endpoint}'. Is it running?")]
    PeerNotRunning { endpoint: String },

    #[error("Soundpad at '{endpoint}' is not accepting connections right now")]
    PipeBusy { endpoint: String },

    #[error("Failed to connect to '{endpoint}': {source}")]
    ConnectionFailed {
        endpoint: String,
        #[source]
        source: io::Error,
    },

    // === Exchange Errors ===
    #[error("Pipe communication error: {0}")]
    Transport(#[source] io::Error),

    #[error("Remote control is offline")]
    Offline,

    #[error("Soundpad reported failure: {0}")]
    Status(Status),

    #[error("Unexpected response to '{command}': expected {expected}, received '{response}'")]
    Protocol {
        command: String,
        response: String,
        expected: String,
    },

    #[error("Invalid sound list: {0}")]
    SoundList(#[from] serde_xml_rs::Error),

    #[error("Remote control version mismatch: client speaks {client}, Soundpad speaks {server}")]
    Incompatible { client: String, server: String },

    // === Configuration Errors ===
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid configuration file: {0}")]
    ConfigParse(String),

    // === IO Errors ===
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Failed to read file '{path}': {error}")]
    FileRead { path: String, error: String },

    // === Serialization Errors ===
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Classify a failure to open the endpoint
    pub fn connect_failed(endpoint: &str, source: io::Error) -> Self {
        let endpoint = endpoint.to_string();

        #[cfg(windows)]
        {
            use windows_sys::Win32::Foundation::ERROR_PIPE_BUSY;
            if source.raw_os_error() == Some(ERROR_PIPE_BUSY as i32) {
                return Self::PipeBusy { endpoint };
            }
        }

        match source.kind() {
            io::ErrorKind::NotFound | io::ErrorKind::ConnectionRefused => {
                Self::PeerNotRunning { endpoint }
            }
            _ => Self::ConnectionFailed { endpoint, source },
        }
    }

    /// Create a protocol error for a response of the wrong shape
    pub fn protocol(command: &str, response: &str, expected: &str) -> Self {
        Self::Protocol {
            command: command.to_string(),
            response: response.to_string(),
            expected: expected.to_string(),
        }
    }

    /// Whether this error means the peer could not be reached at all
    pub fn is_connection_error(&self) -> bool {
        matches!(
            self,
            Self::PeerNotRunning { .. } | Self::PipeBusy { .. } | Self::ConnectionFailed { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_endpoint_is_not_running() {
        let err = Error::connect_failed(
            "sp_remote_control",
            io::Error::new(io::ErrorKind::NotFound, "no such pipe"),
        );
        assert!(matches!(err, Error::PeerNotRunning { .. }));
        assert!(err.is_connection_error());
        assert!(err.to_string().contains("Is it running?"));
    }

    #[test]
    fn test_other_open_failure_keeps_source() {
        let err = Error::connect_failed(
            "sp_remote_control",
            io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        );
        match err {
            Error::ConnectionFailed { source, .. } => {
                assert_eq!(source.kind(), io::ErrorKind::PermissionDenied)
            }
            other => panic!("Expected ConnectionFailed, got {other:?}"),
        }
    }

    #[test]
    fn test_transport_error_is_not_connection_error() {
        let err = Error::Transport(io::Error::new(io::ErrorKind::BrokenPipe, "gone"));
        assert!(!err.is_connection_error());
    }
}

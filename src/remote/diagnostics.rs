//! Diagnostic reporting for the non-raising command layer
//!
//! Convenience methods never fail; when a command goes wrong they fall back
//! to a safe default and describe what happened to a [`DiagnosticSink`].

use std::fmt;
use std::sync::Mutex;

/// Something that went wrong while running a command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    /// Empty response: Soundpad could not be reached
    Offline { command: String },
    /// Soundpad answered with a failure status (or no status at all)
    Failed { command: String, response: String },
    /// A number was expected
    NotNumeric { command: String, response: String },
    /// Any other response of the wrong shape
    Unexpected {
        command: String,
        response: String,
        expected: String,
    },
}

impl Diagnostic {
    pub fn command(&self) -> &str {
        match self {
            Self::Offline { command }
            | Self::Failed { command, .. }
            | Self::NotNumeric { command, .. }
            | Self::Unexpected { command, .. } => command,
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Offline { .. } => f.write_str("Remote control is offline."),
            Self::Failed { response, .. } => write!(f, "Failed: {response}"),
            Self::NotNumeric { response, .. } => {
                write!(f, "Expected numeric response, but received: {response}")
            }
            Self::Unexpected {
                response, expected, ..
            } => write!(f, "Expected {expected}, but received: {response}"),
        }
    }
}

/// Receives diagnostics from the command layer
pub trait DiagnosticSink: Send + Sync {
    fn report(&self, diagnostic: Diagnostic);
}

/// Emits every diagnostic as a `tracing` warning
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn report(&self, diagnostic: Diagnostic) {
        tracing::warn!(command = diagnostic.command(), "{}", diagnostic);
    }
}

/// Drops every diagnostic
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentSink;

impl DiagnosticSink for SilentSink {
    fn report(&self, _diagnostic: Diagnostic) {}
}

/// Keeps diagnostics in memory, for callers that want to inspect them
#[derive(Debug, Default)]
pub struct CollectingSink {
    diagnostics: Mutex<Vec<Diagnostic>>,
}

impl CollectingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Remove and return everything collected so far
    pub fn take(&self) -> Vec<Diagnostic> {
        let mut diagnostics = self
            .diagnostics
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        std::mem::take(&mut *diagnostics)
    }
}

impl DiagnosticSink for CollectingSink {
    fn report(&self, diagnostic: Diagnostic) {
        self.diagnostics
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .push(diagnostic);
    }
}

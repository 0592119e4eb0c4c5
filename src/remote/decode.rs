//! Response decoders for the non-raising command layer
//!
//! Each decoder turns raw response text into a typed value, falling back to
//! a safe default and reporting a [`Diagnostic`] when the response does not
//! have the shape the command promises.

use std::str::FromStr;

use crate::ipc::protocol::{Command, Reply};

use super::diagnostics::{Diagnostic, DiagnosticSink};
use super::soundlist::{Sound, SoundList};
use super::types::PlayStatus;

/// Which failures a text getter reports
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextCheck {
    /// Report status codes and offline
    All,
    /// Report status codes only; an empty answer is a legitimate value
    StatusOnly,
    /// Report offline only; the answer is never a status code
    OfflineOnly,
}

/// Reports diagnostics for one command
pub struct Decoder<'a> {
    command: &'a Command,
    sink: &'a dyn DiagnosticSink,
}

impl<'a> Decoder<'a> {
    pub fn new(command: &'a Command, sink: &'a dyn DiagnosticSink) -> Self {
        Self { command, sink }
    }

    /// `true` only for `R-200`
    pub fn success(&self, response: &str) -> bool {
        match Reply::classify(response) {
            reply if reply.is_ok() => true,
            Reply::Offline => {
                self.offline();
                false
            }
            _ => {
                self.failed(response);
                false
            }
        }
    }

    /// A number, or `default`
    pub fn number<T: FromStr>(&self, response: &str, default: T) -> T {
        match Reply::classify(response) {
            Reply::Offline => self.offline(),
            Reply::Status(_) => self.failed(response),
            Reply::Payload(text) => match text.trim().parse() {
                Ok(value) => return value,
                Err(_) => self.sink.report(Diagnostic::NotNumeric {
                    command: self.command.to_string(),
                    response: text,
                }),
            },
        }
        default
    }

    /// `1` means true; anything else is false
    pub fn flag(&self, response: &str) -> bool {
        self.number::<i64>(response, 0) == 1
    }

    /// The response text itself, after reporting per `check`
    pub fn text(&self, response: String, check: TextCheck) -> String {
        match Reply::classify(&response) {
            Reply::Offline if check != TextCheck::StatusOnly => self.offline(),
            Reply::Status(_) if check != TextCheck::OfflineOnly => self.failed(&response),
            _ => {}
        }
        response
    }

    /// A play status, or `STOPPED`
    pub fn play_status(&self, response: &str) -> PlayStatus {
        match Reply::classify(response) {
            Reply::Offline => self.offline(),
            Reply::Status(_) => self.failed(response),
            Reply::Payload(text) => match text.parse() {
                Ok(status) => return status,
                Err(_) => self.unexpected(&text, "a play status"),
            },
        }
        PlayStatus::default()
    }

    /// Parsed sound list, or nothing
    pub fn sounds(&self, response: &str) -> Vec<Sound> {
        match Reply::classify(response) {
            Reply::Offline => self.offline(),
            Reply::Status(_) => self.failed(response),
            Reply::Payload(text) => match text.parse::<SoundList>() {
                Ok(list) => return list.sounds,
                Err(e) => {
                    tracing::debug!(error = %e, "Sound list did not parse");
                    self.unexpected(&text, "an XML sound list")
                }
            },
        }
        Vec::new()
    }

    fn offline(&self) {
        self.sink.report(Diagnostic::Offline {
            command: self.command.to_string(),
        });
    }

    fn failed(&self, response: &str) {
        self.sink.report(Diagnostic::Failed {
            command: self.command.to_string(),
            response: response.to_string(),
        });
    }

    fn unexpected(&self, response: &str, expected: &str) {
        self.sink.report(Diagnostic::Unexpected {
            command: self.command.to_string(),
            response: response.to_string(),
            expected: expected.to_string(),
        });
    }
}

//! Command layer over the transport
//!
//! Stateless command formatting and response decoding, one method per
//! remote control command.

pub mod client;
pub mod decode;
pub mod diagnostics;
pub mod soundlist;
pub mod types;

pub use client::SoundpadClient;
pub use diagnostics::{CollectingSink, Diagnostic, DiagnosticSink, SilentSink, TracingSink};
pub use soundlist::{Sound, SoundList};
pub use types::PlayStatus;

//! Configuration file handling

use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

use super::paths::{self, config_path};
use super::Result;

/// Main configuration structure
#[derive(Debug, Deserialize, Default)]
pub struct Config {
    /// Where to find Soundpad
    #[serde(default)]
    pub connection: ConnectionConfig,

    /// Exchange settings
    #[serde(default)]
    pub transport: TransportConfig,

    /// Diagnostic reporting
    #[serde(default)]
    pub diagnostics: DiagnosticsConfig,
}

/// Connection settings
#[derive(Debug, Deserialize)]
pub struct ConnectionConfig {
    /// Pipe name, or a full endpoint path
    #[serde(default = "default_pipe_name")]
    pub pipe_name: String,
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            pipe_name: default_pipe_name(),
        }
    }
}

fn default_pipe_name() -> String {
    paths::PIPE_NAME.to_string()
}

/// Transport settings
#[derive(Debug, Deserialize)]
pub struct TransportConfig {
    /// Minimum spacing between two exchanges, in milliseconds
    #[serde(default = "default_pacing_tick")]
    pub pacing_tick_ms: u64,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            pacing_tick_ms: default_pacing_tick(),
        }
    }
}

impl TransportConfig {
    pub fn pacing_tick(&self) -> Duration {
        Duration::from_millis(self.pacing_tick_ms)
    }
}

fn default_pacing_tick() -> u64 {
    1
}

/// Diagnostic settings
#[derive(Debug, Deserialize)]
pub struct DiagnosticsConfig {
    /// Report failed commands and malformed responses
    #[serde(default = "default_report")]
    pub report: bool,
}

impl Default for DiagnosticsConfig {
    fn default() -> Self {
        Self {
            report: default_report(),
        }
    }
}

fn default_report() -> bool {
    true
}

impl Config {
    /// Load configuration from the default config file
    ///
    /// Returns default configuration if file doesn't exist
    pub fn load() -> Result<Self> {
        match config_path() {
            Some(path) if path.exists() => Self::load_from(&path),
            _ => Ok(Self::default()),
        }
    }

    /// Load configuration from an explicit file
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| super::Error::FileRead {
            path: path.display().to_string(),
            error: e.to_string(),
        })?;
        Self::parse(&content)
    }

    /// Parse configuration from TOML text
    pub fn parse(content: &str) -> Result<Self> {
        let config: Self =
            toml::from_str(content).map_err(|e| super::Error::ConfigParse(e.to_string()))?;

        if config.connection.pipe_name.trim().is_empty() {
            return Err(super::Error::Config(
                "connection.pipe_name must not be empty".to_string(),
            ));
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::Error;

    #[test]
    fn test_empty_file_uses_defaults() {
        let config = Config::parse("").unwrap();
        assert_eq!(config.connection.pipe_name, "sp_remote_control");
        assert_eq!(config.transport.pacing_tick(), Duration::from_millis(1));
        assert!(config.diagnostics.report);
    }

    #[test]
    fn test_partial_sections() {
        let config = Config::parse(
            r#"
            [transport]
            pacing_tick_ms = 15

            [diagnostics]
            report = false
            "#,
        )
        .unwrap();
        assert_eq!(config.connection.pipe_name, "sp_remote_control");
        assert_eq!(config.transport.pacing_tick_ms, 15);
        assert!(!config.diagnostics.report);
    }

    #[test]
    fn test_blank_pipe_name_rejected() {
        let err = Config::parse("[connection]\npipe_name = \"  \"").unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_malformed_toml() {
        let err = Config::parse("[transport\npacing_tick_ms = 1").unwrap_err();
        assert!(matches!(err, Error::ConfigParse(_)));
    }

    #[test]
    fn test_load_from_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = Config::load_from(&dir.path().join("nope.toml")).unwrap_err();
        assert!(matches!(err, Error::FileRead { .. }));
    }
}

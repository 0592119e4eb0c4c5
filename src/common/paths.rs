//! Cross-platform endpoint and configuration paths
//!
//! Windows: Soundpad listens on the named pipe `\\.\pipe\sp_remote_control`
//! Unix: a domain socket of the same name under $XDG_RUNTIME_DIR or /tmp,
//! for peers that speak the same protocol

use std::path::PathBuf;

/// Name of the pipe Soundpad opens for remote control
pub const PIPE_NAME: &str = "sp_remote_control";

/// Directory name used for configuration files
const APP_NAME: &str = "soundpad-remote";

/// Resolve a pipe name to the full endpoint path
///
/// Names that already look like a path are returned unchanged.
#[cfg(windows)]
pub fn endpoint(pipe_name: &str) -> PathBuf {
    if pipe_name.starts_with(r"\\") {
        return PathBuf::from(pipe_name);
    }
    PathBuf::from(format!(r"\\.\pipe\{}", pipe_name))
}

#[cfg(unix)]
pub fn endpoint(pipe_name: &str) -> PathBuf {
    if pipe_name.contains('/') {
        return PathBuf::from(pipe_name);
    }

    // Try XDG_RUNTIME_DIR first (preferred on Linux)
    if let Ok(runtime_dir) = std::env::var("XDG_RUNTIME_DIR") {
        return PathBuf::from(runtime_dir).join(pipe_name);
    }

    PathBuf::from("/tmp").join(pipe_name)
}

/// Get the configuration directory path
///
/// Uses the directories crate for platform-appropriate locations:
/// - Linux: `~/.config/soundpad-remote/`
/// - macOS: `~/Library/Application Support/soundpad-remote/`
/// - Windows: `%APPDATA%\soundpad-remote\`
pub fn config_dir() -> Option<PathBuf> {
    directories::ProjectDirs::from("", "", APP_NAME).map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the configuration file
pub fn config_path() -> Option<PathBuf> {
    config_dir().map(|dir| dir.join("config.toml"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_ends_with_pipe_name() {
        let path = endpoint(PIPE_NAME);
        assert!(path.to_string_lossy().ends_with(PIPE_NAME));
    }

    #[cfg(windows)]
    #[test]
    fn test_windows_endpoint() {
        assert_eq!(
            endpoint(PIPE_NAME),
            PathBuf::from(r"\\.\pipe\sp_remote_control")
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_explicit_path_is_kept() {
        assert_eq!(
            endpoint("/run/user/1000/custom.sock"),
            PathBuf::from("/run/user/1000/custom.sock")
        );
    }

    #[test]
    fn test_config_path_is_toml() {
        if let Some(path) = config_path() {
            assert_eq!(path.extension().and_then(|e| e.to_str()), Some("toml"));
        }
    }
}

//! Scalar types reported by Soundpad

use serde::Serialize;
use std::fmt;
use std::str::FromStr;

use crate::common::Error;

/// Playback state as reported by `GetPlayStatus()`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PlayStatus {
    #[default]
    Stopped,
    Playing,
    Paused,
    Seeking,
}

impl PlayStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Stopped => "STOPPED",
            Self::Playing => "PLAYING",
            Self::Paused => "PAUSED",
            Self::Seeking => "SEEKING",
        }
    }
}

impl FromStr for PlayStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "STOPPED" => Ok(Self::Stopped),
            "PLAYING" => Ok(Self::Playing),
            "PAUSED" => Ok(Self::Paused),
            "SEEKING" => Ok(Self::Seeking),
            _ => Err(Error::protocol("GetPlayStatus()", s, "a play status")),
        }
    }
}

impl fmt::Display for PlayStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_known_names() {
        assert_eq!("PLAYING".parse::<PlayStatus>().unwrap(), PlayStatus::Playing);
        assert_eq!("SEEKING".parse::<PlayStatus>().unwrap(), PlayStatus::Seeking);
        assert_eq!(PlayStatus::Paused.to_string(), "PAUSED");
    }

    #[test]
    fn test_names_are_case_sensitive() {
        assert!("playing".parse::<PlayStatus>().is_err());
    }

    #[test]
    fn test_default_is_stopped() {
        assert_eq!(PlayStatus::default(), PlayStatus::Stopped);
    }
}

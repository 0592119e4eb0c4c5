//! Typed view of the XML sound list
//!
//! `GetSoundlist()` answers with a document like:
//! ```text
//! <Soundlist>
//!   <Sound index="1" url="C:\sounds\cue.mp3" artist="" title="cue"
//!          duration="0:03" addedOn="2022-11-27" lastPlayedOn="2022-11-27"
//!          playCount="9"/>
//! </Soundlist>
//! ```

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::time::Duration;

/// The full `<Soundlist>` document
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SoundList {
    #[serde(rename = "$value", default)]
    pub sounds: Vec<Sound>,
}

impl FromStr for SoundList {
    type Err = serde_xml_rs::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        serde_xml_rs::from_str(s)
    }
}

/// One sound entry
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Sound {
    /// Position in the "All sounds" category; what `DoPlaySound` expects
    pub index: u64,
    pub url: String,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub artist: Option<String>,
    pub title: String,
    #[serde(default, with = "duration")]
    pub duration: Duration,
    #[serde(default, deserialize_with = "lenient_date")]
    pub added_on: Option<NaiveDate>,
    #[serde(default, deserialize_with = "lenient_date")]
    pub last_played_on: Option<NaiveDate>,
    #[serde(default)]
    pub play_count: u64,
}

/// First sound whose title contains `word`, ignoring case
pub fn find_by_title<'a>(sounds: &'a [Sound], word: &str) -> Option<&'a Sound> {
    let word = word.to_lowercase();
    sounds
        .iter()
        .find(|sound| sound.title.to_lowercase().contains(&word))
}

/// Parse `s`, `m:ss` or `h:mm:ss`; malformed parts count as zero
pub fn parse_duration(s: &str) -> Duration {
    let mut parts = s.trim().rsplit(':');
    let mut part = || -> u64 {
        parts
            .next()
            .and_then(|p| p.trim().parse().ok())
            .unwrap_or_default()
    };
    let seconds = part();
    let minutes = part();
    let hours = part();

    // Peer-supplied values; clamp rather than overflow
    let total = hours
        .saturating_mul(60 * 60)
        .saturating_add(minutes.saturating_mul(60))
        .saturating_add(seconds);
    Duration::from_secs(total)
}

/// Render a duration the way Soundpad does (`m:ss`, or `h:mm:ss`)
pub fn format_duration(duration: Duration) -> String {
    let total = duration.as_secs();
    let (hours, minutes, seconds) = (total / 3600, (total / 60) % 60, total % 60);
    if hours > 0 {
        format!("{hours}:{minutes:02}:{seconds:02}")
    } else {
        format!("{minutes}:{seconds:02}")
    }
}

mod duration {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Ok(super::parse_duration(&s))
    }

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&super::format_duration(*duration))
    }
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    Ok((!s.is_empty()).then_some(s))
}

// Never-played sounds carry an empty or placeholder date
fn lenient_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    Ok(NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    const MYLIST: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<Soundlist>
  <Sound index="1" url="C:\sounds\ba dum tss.mp3" artist="" title="ba dum tss" duration="0:02" addedOn="2022-11-27" lastPlayedOn="2022-11-27" playCount="15"/>
  <Sound index="2" url="C:\sounds\firework.mp3" artist="Pyro" title="firework" duration="0:02" addedOn="2022-11-27" lastPlayedOn="2022-11-28" playCount="1"/>
  <Sound index="3" url="C:\sounds\cue.mp3" artist="" title="cue" duration="1:02:03" addedOn="2022-11-27" lastPlayedOn="" playCount="0"/>
</Soundlist>"#;

    fn sounds() -> Vec<Sound> {
        MYLIST.parse::<SoundList>().unwrap().sounds
    }

    #[test]
    fn test_fields() {
        let sounds = sounds();
        assert_eq!(sounds.len(), 3);
        assert_eq!(sounds[1].index, 2);
        assert_eq!(sounds[1].title, "firework");
        assert_eq!(sounds[1].url, r"C:\sounds\firework.mp3");
        assert_eq!(sounds[0].play_count, 15);
    }

    #[test]
    fn test_empty_artist_is_none() {
        let sounds = sounds();
        assert_eq!(sounds[0].artist, None);
        assert_eq!(sounds[1].artist.as_deref(), Some("Pyro"));
    }

    #[test]
    fn test_dates() {
        let sounds = sounds();
        assert_eq!(
            sounds[1].last_played_on,
            NaiveDate::from_ymd_opt(2022, 11, 28)
        );
        assert_eq!(sounds[2].last_played_on, None);
    }

    #[test]
    fn test_durations() {
        let sounds = sounds();
        assert_eq!(sounds[0].duration, Duration::from_secs(2));
        assert_eq!(sounds[2].duration, Duration::from_secs(3723));
    }

    #[test]
    fn test_parse_duration_is_lenient() {
        assert_eq!(parse_duration("42"), Duration::from_secs(42));
        assert_eq!(parse_duration("x:10"), Duration::from_secs(10));
        assert_eq!(parse_duration(""), Duration::ZERO);
    }

    #[test]
    fn test_parse_duration_saturates() {
        assert_eq!(
            parse_duration("5124095576030432:00:00"),
            Duration::from_secs(u64::MAX)
        );
        assert_eq!(
            parse_duration("18446744073709551615:59:59"),
            Duration::from_secs(u64::MAX)
        );
    }

    #[test]
    fn test_oversized_duration_in_document() {
        let xml = r#"<Soundlist>
  <Sound index="1" url="C:\sounds\long.mp3" artist="" title="long" duration="5124095576030432:00:00" addedOn="" lastPlayedOn="" playCount="0"/>
</Soundlist>"#;
        let sounds = xml.parse::<SoundList>().unwrap().sounds;
        assert_eq!(sounds[0].duration, Duration::from_secs(u64::MAX));
    }

    #[test]
    fn test_find_by_title() {
        let sounds = sounds();
        assert_eq!(find_by_title(&sounds, "FIRE").map(|s| s.index), Some(2));
        assert_eq!(find_by_title(&sounds, "dum").map(|s| s.index), Some(1));
        assert!(find_by_title(&sounds, "airhorn").is_none());
    }

    #[test]
    fn test_find_by_title_takes_first_match() {
        let sounds = sounds();
        // "u" is in both "ba dum tss" and "cue"
        assert_eq!(find_by_title(&sounds, "u").map(|s| s.index), Some(1));
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(Duration::from_secs(3)), "0:03");
        assert_eq!(format_duration(Duration::from_secs(3723)), "1:02:03");
    }

    #[test]
    fn test_malformed_document() {
        assert!("<Soundlist><Sound".parse::<SoundList>().is_err());
    }
}

//! Soundpad remote control protocol
//!
//! Requests are plain text calls such as `DoPlaySound(5, true, false)`.
//! Responses are either a status code (`R-200`, `R-404: Command not found.`),
//! a bare scalar, or an XML document, depending on the command.

use std::fmt;
use std::str::FromStr;

use crate::common::Error;

/// Remote control interface version this client implements
pub const CLIENT_VERSION: &str = "1.1.1";

/// Commands understood by Soundpad
///
/// `Display` renders the exact wire text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    // === Playback (v1.0.0) ===
    PlaySound { index: i32 },
    PlaySoundOn {
        index: i32,
        render_line: bool,
        capture_line: bool,
    },
    PlayPreviousSound,
    PlayNextSound,
    StopSound,
    TogglePause,
    JumpMs(i32),
    SeekMs(i32),

    // === Recording (v1.0.0) ===
    StartRecording,
    StopRecording,
    RecordingPositionMs,
    RecordingPeak,

    // === Search & selection (v1.0.0) ===
    Search(String),
    ResetSearch,
    SelectPreviousHit,
    SelectNextHit,
    SelectRow(i32),
    ScrollBy(i32),
    ScrollTo(i32),

    // === Queries (v1.0.0) ===
    SoundFileCount,
    PlaybackPositionMs,
    PlaybackDurationMs,
    SoundList {
        from: Option<i32>,
        to: Option<i32>,
    },
    TitleText,
    StatusBarText,
    PlayStatus,
    Version,
    RemoteControlVersion,
    IsAlive,

    // === Editing (v1.0.0) ===
    AddSound { url: String },
    AddSoundAt { url: String, index: i32 },
    RemoveSelectedEntries { remove_on_disk: bool },
    Undo,
    Redo,
    SaveSoundList,

    // === Volume (v1.0.0) ===
    Volume,
    IsMuted,
    SetVolume(i32),
    ToggleMute,

    // === v1.1.0 ===
    PlaySelectedSound,
    PlayCurrentSoundAgain,
    PlayPreviouslyPlayedSound,
    AddCategory { name: String, parent: i32 },
    AddSoundToCategory {
        url: String,
        category: i32,
        position: i32,
    },
    StartRecordingSpeakers,
    StartRecordingMicrophone,
    SelectCategory(i32),
    SelectPreviousCategory,
    SelectNextCategory,
    RemoveCategory(i32),
    Categories {
        with_sounds: bool,
        with_icons: bool,
    },
    Category {
        index: i32,
        with_sounds: bool,
        with_icons: bool,
    },

    // === v1.1.1 ===
    PlaySoundFromCategory {
        category: i32,
        sound: i32,
        render_line: bool,
        capture_line: bool,
    },

    /// Any other command text, sent verbatim
    Raw(String),
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use Command::*;

        match self {
            PlaySound { index } => write!(f, "DoPlaySound({index})"),
            PlaySoundOn {
                index,
                render_line,
                capture_line,
            } => write!(f, "DoPlaySound({index}, {render_line}, {capture_line})"),
            PlayPreviousSound => f.write_str("DoPlayPreviousSound()"),
            PlayNextSound => f.write_str("DoPlayNextSound()"),
            StopSound => f.write_str("DoStopSound()"),
            TogglePause => f.write_str("DoTogglePause()"),
            JumpMs(ms) => write!(f, "DoJumpMs({ms})"),
            SeekMs(ms) => write!(f, "DoSeekMs({ms})"),

            StartRecording => f.write_str("DoStartRecording()"),
            StopRecording => f.write_str("DoStopRecording()"),
            RecordingPositionMs => f.write_str("GetRecordingPositionInMs()"),
            RecordingPeak => f.write_str("GetRecordingPeak()"),

            Search(term) => write!(f, "DoSearch(\"{term}\")"),
            ResetSearch => f.write_str("DoResetSearch()"),
            SelectPreviousHit => f.write_str("DoSelectPreviousHit()"),
            SelectNextHit => f.write_str("DoSelectNextHit()"),
            SelectRow(row) => write!(f, "DoSelectIndex({row})"),
            ScrollBy(rows) => write!(f, "DoScrollBy({rows})"),
            ScrollTo(row) => write!(f, "DoScrollTo({row})"),

            SoundFileCount => f.write_str("GetSoundFileCount()"),
            PlaybackPositionMs => f.write_str("GetPlaybackPositionInMs()"),
            PlaybackDurationMs => f.write_str("GetPlaybackDurationInMs()"),
            SoundList { from, to } => match (from, to) {
                (Some(from), Some(to)) => write!(f, "GetSoundlist({from},{to})"),
                (Some(from), None) => write!(f, "GetSoundlist({from})"),
                // Soundpad has no "up to" form; start from the first sound
                (None, Some(to)) => write!(f, "GetSoundlist(1,{to})"),
                (None, None) => f.write_str("GetSoundlist()"),
            },
            TitleText => f.write_str("GetTitleText()"),
            StatusBarText => f.write_str("GetStatusBarText()"),
            PlayStatus => f.write_str("GetPlayStatus()"),
            Version => f.write_str("GetVersion()"),
            RemoteControlVersion => f.write_str("GetRemoteControlVersion()"),
            IsAlive => f.write_str("IsAlive()"),

            AddSound { url } => write!(f, "DoAddSound(\"{url}\")"),
            AddSoundAt { url, index } => write!(f, "DoAddSound(\"{url}\", {index})"),
            RemoveSelectedEntries { remove_on_disk } => {
                write!(f, "DoRemoveSelectedEntries({remove_on_disk})")
            }
            Undo => f.write_str("DoUndo()"),
            Redo => f.write_str("DoRedo()"),
            SaveSoundList => f.write_str("DoSaveSoundlist()"),

            Volume => f.write_str("GetVolume()"),
            IsMuted => f.write_str("IsMuted()"),
            SetVolume(volume) => write!(f, "SetVolume({volume})"),
            ToggleMute => f.write_str("DoToggleMute()"),

            PlaySelectedSound => f.write_str("DoPlaySelectedSound()"),
            PlayCurrentSoundAgain => f.write_str("DoPlayCurrentSoundAgain()"),
            PlayPreviouslyPlayedSound => f.write_str("DoPlayPreviouslyPlayedSound()"),
            AddCategory { name, parent } => write!(f, "DoAddCategory(\"{name}\", {parent})"),
            AddSoundToCategory {
                url,
                category,
                position,
            } => write!(f, "DoAddSound(\"{url}\", {category}, {position})"),
            StartRecordingSpeakers => f.write_str("DoStartRecordingSpeakers()"),
            StartRecordingMicrophone => f.write_str("DoStartRecordingMicrophone()"),
            SelectCategory(index) => write!(f, "DoSelectCategory({index})"),
            SelectPreviousCategory => f.write_str("DoSelectPreviousCategory()"),
            SelectNextCategory => f.write_str("DoSelectNextCategory()"),
            RemoveCategory(index) => write!(f, "DoRemoveCategory({index})"),
            Categories {
                with_sounds,
                with_icons,
            } => write!(f, "GetCategories({with_sounds}, {with_icons})"),
            Category {
                index,
                with_sounds,
                with_icons,
            } => write!(f, "GetCategory({index}, {with_sounds}, {with_icons})"),

            PlaySoundFromCategory {
                category,
                sound,
                render_line,
                capture_line,
            } => write!(
                f,
                "DoPlaySoundFromCategory({category}, {sound}, {render_line}, {capture_line})"
            ),

            Raw(text) => f.write_str(text),
        }
    }
}

/// A status code response such as `R-200` or `R-404: Command not found.`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Status {
    /// Numeric code, mirroring HTTP semantics
    pub code: u32,
    /// Text after the code, if any
    pub detail: Option<String>,
}

impl Status {
    pub const OK: u32 = 200;
    pub const NO_CONTENT: u32 = 204;
    pub const BAD_REQUEST: u32 = 400;
    pub const NOT_FOUND: u32 = 404;

    /// Detail Soundpad sends with a 404 for an unknown verb
    pub const COMMAND_NOT_FOUND: &'static str = "Command not found.";

    pub fn is_ok(&self) -> bool {
        self.code == Self::OK
    }

    /// A 404 for a command Soundpad does not know, as opposed to a missing
    /// sound or category
    pub fn is_command_not_found(&self) -> bool {
        self.code == Self::NOT_FOUND && self.detail.as_deref() == Some(Self::COMMAND_NOT_FOUND)
    }

    /// Parse `R-<code>[: detail]`; None if the text is not a status code
    pub fn parse(s: &str) -> Option<Self> {
        let rest = s.strip_prefix("R-")?;
        let digits = rest.find(|c: char| !c.is_ascii_digit()).unwrap_or(rest.len());
        if digits == 0 {
            return None;
        }
        // Any run of digits is a status; codes too large to hold saturate
        let code = rest[..digits].parse().unwrap_or(u32::MAX);

        let detail = rest[digits..]
            .trim_start_matches(':')
            .trim();
        let detail = (!detail.is_empty()).then(|| detail.to_string());

        Some(Self { code, detail })
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.detail {
            Some(detail) => write!(f, "R-{}: {}", self.code, detail),
            None => write!(f, "R-{}", self.code),
        }
    }
}

/// A classified response
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    /// Empty response: the peer could not be reached
    Offline,
    /// `R-<code>` status
    Status(Status),
    /// Anything else: a scalar or a document
    Payload(String),
}

impl Reply {
    /// Classify raw response text
    pub fn classify(response: &str) -> Self {
        if response.is_empty() {
            return Self::Offline;
        }
        match Status::parse(response) {
            Some(status) => Self::Status(status),
            None => Self::Payload(response.to_string()),
        }
    }

    pub fn is_ok(&self) -> bool {
        matches!(self, Self::Status(status) if status.is_ok())
    }

    pub fn is_offline(&self) -> bool {
        matches!(self, Self::Offline)
    }

    /// Succeed only on `R-200`
    pub fn expect_ok(self, command: &Command) -> Result<(), Error> {
        match self {
            Self::Status(status) if status.is_ok() => Ok(()),
            Self::Status(status) => Err(Error::Status(status)),
            Self::Offline => Err(Error::Offline),
            Self::Payload(text) => {
                Err(Error::protocol(&command.to_string(), &text, "a status code"))
            }
        }
    }

    /// Take the payload, turning status codes and offline into errors
    pub fn into_payload(self) -> Result<String, Error> {
        match self {
            Self::Payload(text) => Ok(text),
            Self::Status(status) => Err(Error::Status(status)),
            Self::Offline => Err(Error::Offline),
        }
    }

    /// Parse the payload as `T`
    pub fn parse<T: FromStr>(self, command: &Command, expected: &str) -> Result<T, Error> {
        let text = self.into_payload()?;
        text.trim()
            .parse()
            .map_err(|_| Error::protocol(&command.to_string(), &text, expected))
    }
}

impl fmt::Display for Reply {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Offline => f.write_str(""),
            Self::Status(status) => status.fmt(f),
            Self::Payload(text) => f.write_str(text),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_wire_text() {
        let cases = [
            (Command::PlaySound { index: 5 }, "DoPlaySound(5)"),
            (
                Command::PlaySoundOn {
                    index: 3,
                    render_line: true,
                    capture_line: false,
                },
                "DoPlaySound(3, true, false)",
            ),
            (Command::JumpMs(-5000), "DoJumpMs(-5000)"),
            (Command::SelectRow(7), "DoSelectIndex(7)"),
            (Command::Search("ba dum".into()), "DoSearch(\"ba dum\")"),
            (
                Command::SoundList {
                    from: Some(2),
                    to: Some(9),
                },
                "GetSoundlist(2,9)",
            ),
            (
                Command::SoundList {
                    from: Some(4),
                    to: None,
                },
                "GetSoundlist(4)",
            ),
            (
                Command::SoundList {
                    from: None,
                    to: None,
                },
                "GetSoundlist()",
            ),
            (
                Command::AddSoundAt {
                    url: r"C:\sounds\cue.mp3".into(),
                    index: 2,
                },
                r#"DoAddSound("C:\sounds\cue.mp3", 2)"#,
            ),
            (
                Command::RemoveSelectedEntries {
                    remove_on_disk: false,
                },
                "DoRemoveSelectedEntries(false)",
            ),
            (
                Command::AddCategory {
                    name: "memes".into(),
                    parent: -1,
                },
                "DoAddCategory(\"memes\", -1)",
            ),
            (
                Command::Category {
                    index: 2,
                    with_sounds: true,
                    with_icons: false,
                },
                "GetCategory(2, true, false)",
            ),
            (
                Command::PlaySoundFromCategory {
                    category: -1,
                    sound: 5,
                    render_line: true,
                    capture_line: true,
                },
                "DoPlaySoundFromCategory(-1, 5, true, true)",
            ),
            (Command::SaveSoundList, "DoSaveSoundlist()"),
            (Command::Raw("IsAlive()".into()), "IsAlive()"),
        ];

        for (command, expected) in cases {
            assert_eq!(command.to_string(), expected);
        }
    }

    #[test]
    fn test_status_parse() {
        assert_eq!(
            Status::parse("R-200"),
            Some(Status {
                code: 200,
                detail: None
            })
        );
        assert_eq!(
            Status::parse("R-404: Command not found."),
            Some(Status {
                code: 404,
                detail: Some("Command not found.".into())
            })
        );
        assert_eq!(Status::parse("R-"), None);
        assert_eq!(Status::parse("Recording"), None);
    }

    #[test]
    fn test_status_parse_large_codes() {
        assert_eq!(Status::parse("R-99999").map(|s| s.code), Some(99999));
        assert_eq!(
            Status::parse("R-123456789012345: odd").map(|s| s.code),
            Some(u32::MAX)
        );
        assert!(matches!(
            Reply::classify("R-99999"),
            Reply::Status(Status { code: 99999, .. })
        ));
    }

    #[test]
    fn test_command_not_found() {
        let unknown = Status::parse("R-404: Command not found.").unwrap();
        assert!(unknown.is_command_not_found());

        let missing = Status::parse("R-404: Sound not found.").unwrap();
        assert!(!missing.is_command_not_found());
        assert!(!Status::parse("R-404").unwrap().is_command_not_found());
        assert!(!Status::parse("R-400: Command not found.")
            .unwrap()
            .is_command_not_found());
    }

    #[test]
    fn test_classify() {
        assert!(Reply::classify("R-200").is_ok());
        assert!(Reply::classify("").is_offline());
        assert!(!Reply::classify("R-404").is_ok());
        assert!(!Reply::classify("R-404").is_offline());
        assert_eq!(
            Reply::classify("PLAYING"),
            Reply::Payload("PLAYING".into())
        );
        // Title text that merely starts with R is not a status code
        assert_eq!(
            Reply::classify("Recording - Soundpad"),
            Reply::Payload("Recording - Soundpad".into())
        );
    }

    #[test]
    fn test_expect_ok() {
        let cmd = Command::StopSound;
        assert!(Reply::classify("R-200").expect_ok(&cmd).is_ok());
        assert!(matches!(
            Reply::classify("R-204").expect_ok(&cmd),
            Err(Error::Status(Status { code: 204, .. }))
        ));
        assert!(matches!(
            Reply::classify("").expect_ok(&cmd),
            Err(Error::Offline)
        ));
        assert!(matches!(
            Reply::classify("5").expect_ok(&cmd),
            Err(Error::Protocol { .. })
        ));
    }

    #[test]
    fn test_parse_numeric() {
        let cmd = Command::SoundFileCount;
        let count: i64 = Reply::classify("5000").parse(&cmd, "a number").unwrap();
        assert_eq!(count, 5000);

        let err = Reply::classify("abc")
            .parse::<i64>(&cmd, "a number")
            .unwrap_err();
        match err {
            Error::Protocol { command, response, .. } => {
                assert_eq!(command, "GetSoundFileCount()");
                assert_eq!(response, "abc");
            }
            other => panic!("Expected Protocol error, got {other:?}"),
        }
    }
}

//! Mock Soundpad peer for integration testing
//!
//! Listens on a Unix domain socket and answers remote control commands
//! from a small in-memory sound library, so the client and the CLI can be
//! exercised without the real application.
//!
//! Usage: `mock_soundpad <socket path> [--remote-version <version>]`
//! Prints `ready` on stdout once the socket accepts connections.

#[cfg(not(unix))]
fn main() {
    eprintln!("mock_soundpad is only available on Unix platforms.");
    std::process::exit(1);
}

#[cfg(unix)]
fn main() {
    use std::io::Write;

    use interprocess::local_socket::{prelude::*, GenericFilePath, ListenerOptions};

    let mut args = std::env::args().skip(1);
    let path = args.next().expect("usage: mock_soundpad <socket path>");
    let mut remote_version = "1.1.1".to_string();
    while let Some(arg) = args.next() {
        if arg == "--remote-version" {
            remote_version = args.next().expect("--remote-version needs a value");
        }
    }

    let _ = std::fs::remove_file(&path);
    let name = path
        .as_str()
        .to_fs_name::<GenericFilePath>()
        .expect("invalid socket path");
    let listener = ListenerOptions::new()
        .name(name)
        .create_sync()
        .expect("failed to bind socket");

    println!("ready");
    std::io::stdout().flush().ok();

    let mut state = MockState::new(remote_version);

    // One client at a time, like the real pipe
    for stream in listener.incoming() {
        let Ok(stream) = stream else { continue };
        if serve(stream, &mut state) {
            break;
        }
    }

    let _ = std::fs::remove_file(&path);
}

/// Serve one connection; returns true when asked to shut down
#[cfg(unix)]
fn serve(mut stream: interprocess::local_socket::Stream, state: &mut MockState) -> bool {
    use std::io::{Read, Write};

    let mut buf = [0u8; 4096];
    loop {
        let n = match stream.read(&mut buf) {
            Ok(0) | Err(_) => return false,
            Ok(n) => n,
        };
        let request = String::from_utf8_lossy(&buf[..n]).into_owned();

        if request == "Shutdown()" {
            return true;
        }
        if request == "DropConnection()" {
            return false;
        }

        let response = state.handle(&request);
        if stream.write_all(response.as_bytes()).is_err() {
            return false;
        }
    }
}

struct MockSound {
    title: &'static str,
    artist: &'static str,
    duration: &'static str,
    play_count: u32,
}

struct MockState {
    remote_version: String,
    sounds: Vec<MockSound>,
    play_status: &'static str,
    volume: i32,
    muted: bool,
    recording: bool,
}

impl MockState {
    fn new(remote_version: String) -> Self {
        Self {
            remote_version,
            sounds: vec![
                MockSound {
                    title: "ba dum tss",
                    artist: "",
                    duration: "0:02",
                    play_count: 15,
                },
                MockSound {
                    title: "firework",
                    artist: "Pyro",
                    duration: "0:02",
                    play_count: 1,
                },
                MockSound {
                    title: "cue",
                    artist: "",
                    duration: "0:03",
                    play_count: 9,
                },
            ],
            play_status: "STOPPED",
            volume: 75,
            muted: false,
            recording: false,
        }
    }

    fn handle(&mut self, request: &str) -> String {
        let (verb, args) = parse_call(request);
        let ok = || "R-200".to_string();

        match verb {
            "IsAlive" => ok(),
            "GetVersion" => "4.1.0".to_string(),
            "GetRemoteControlVersion" => self.remote_version.clone(),
            "GetTitleText" => "Soundpad".to_string(),
            "GetStatusBarText" => "Ready".to_string(),
            "GetPlayStatus" => self.play_status.to_string(),
            "GetSoundFileCount" => self.sounds.len().to_string(),
            "GetPlaybackPositionInMs" => "0".to_string(),
            "GetPlaybackDurationInMs" => match self.play_status {
                "STOPPED" => "0".to_string(),
                _ => "2000".to_string(),
            },
            "GetRecordingPositionInMs" => (if self.recording { "1500" } else { "0" }).to_string(),
            "GetRecordingPeak" => "0".to_string(),
            "GetVolume" => self.volume.to_string(),
            "IsMuted" => (if self.muted { "1" } else { "0" }).to_string(),
            "GetSoundlist" => self.sound_list(&args),
            "GetCategories" | "GetCategory" => {
                "<Categories><Category index=\"1\" name=\"All sounds\"/></Categories>".to_string()
            }

            "DoPlaySound" => match args.first().and_then(|a| a.parse::<usize>().ok()) {
                Some(index) if (1..=self.sounds.len()).contains(&index) => {
                    self.sounds[index - 1].play_count += 1;
                    self.play_status = "PLAYING";
                    ok()
                }
                _ => "R-204".to_string(),
            },
            "DoStopSound" => {
                self.play_status = "STOPPED";
                ok()
            }
            "DoTogglePause" => {
                self.play_status = match self.play_status {
                    "PLAYING" => "PAUSED",
                    "PAUSED" => "PLAYING",
                    other => other,
                };
                ok()
            }
            "SetVolume" => match args.first().and_then(|a| a.parse::<i32>().ok()) {
                Some(volume) if (0..=100).contains(&volume) => {
                    self.volume = volume;
                    ok()
                }
                _ => "R-400".to_string(),
            },
            "DoToggleMute" => {
                self.muted = !self.muted;
                ok()
            }
            "DoStartRecording" | "DoStartRecordingSpeakers" | "DoStartRecordingMicrophone" => {
                self.recording = true;
                ok()
            }
            "DoStopRecording" => {
                self.recording = false;
                ok()
            }
            "DoAddSound" => {
                if args.first().is_some_and(|url| url.starts_with('"') && url.len() > 2) {
                    ok()
                } else {
                    "R-400".to_string()
                }
            }
            verb if verb.starts_with("Do") && KNOWN_ACTIONS.contains(&verb) => ok(),
            _ => "R-404: Command not found.".to_string(),
        }
    }

    fn sound_list(&self, args: &[String]) -> String {
        let from = args.first().and_then(|a| a.parse::<usize>().ok()).unwrap_or(1);
        let to = args
            .get(1)
            .and_then(|a| a.parse::<usize>().ok())
            .unwrap_or(self.sounds.len());

        let mut xml = String::from("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<Soundlist>\n");
        for (i, sound) in self.sounds.iter().enumerate() {
            let index = i + 1;
            if index < from || index > to {
                continue;
            }
            xml.push_str(&format!(
                "  <Sound index=\"{}\" url=\"C:\\sounds\\{}.mp3\" artist=\"{}\" title=\"{}\" \
                 duration=\"{}\" addedOn=\"2022-11-27\" lastPlayedOn=\"2022-11-27\" playCount=\"{}\"/>\n",
                index, sound.title, sound.artist, sound.title, sound.duration, sound.play_count
            ));
        }
        xml.push_str("</Soundlist>");
        xml
    }
}

const KNOWN_ACTIONS: &[&str] = &[
    "DoPlayPreviousSound",
    "DoPlayNextSound",
    "DoJumpMs",
    "DoSeekMs",
    "DoSearch",
    "DoResetSearch",
    "DoSelectPreviousHit",
    "DoSelectNextHit",
    "DoSelectIndex",
    "DoScrollBy",
    "DoScrollTo",
    "DoRemoveSelectedEntries",
    "DoUndo",
    "DoRedo",
    "DoSaveSoundlist",
    "DoPlaySelectedSound",
    "DoPlayCurrentSoundAgain",
    "DoPlayPreviouslyPlayedSound",
    "DoAddCategory",
    "DoSelectCategory",
    "DoSelectPreviousCategory",
    "DoSelectNextCategory",
    "DoRemoveCategory",
    "DoPlaySoundFromCategory",
];

/// Split `Verb(a, b)` into the verb and its trimmed arguments
fn parse_call(request: &str) -> (&str, Vec<String>) {
    let Some((verb, rest)) = request.split_once('(') else {
        return (request.trim(), Vec::new());
    };
    let inner = rest.trim_end().trim_end_matches(')');
    let args = inner
        .split(',')
        .map(|a| a.trim().to_string())
        .filter(|a| !a.is_empty())
        .collect();
    (verb.trim(), args)
}

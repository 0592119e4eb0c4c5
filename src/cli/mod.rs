//! CLI command handling
//!
//! Dispatches CLI commands to Soundpad and formats output.
//! Actions go through the raising path so failures surface as errors;
//! status queries use the tolerant accessors.

use std::io::{self, BufRead, Write};

use serde::Serialize;

use crate::commands::{Commands, RecordCommands};
use crate::common::{Error, Result};
use crate::ipc::pipe::Connector;
use crate::ipc::protocol::{Command, CLIENT_VERSION};
use crate::remote::soundlist::{find_by_title, format_duration, Sound, SoundList};
use crate::remote::{PlayStatus, SoundpadClient};

/// Snapshot printed by `soundpad status`
#[derive(Debug, Serialize)]
pub struct StatusReport {
    pub alive: bool,
    pub version: Option<String>,
    pub remote_control_version: Option<String>,
    pub compatible: bool,
    pub play_status: PlayStatus,
    pub position_ms: Option<i64>,
    pub duration_ms: Option<i64>,
    pub volume: i32,
    pub muted: bool,
    pub sound_count: Option<i64>,
}

/// Dispatch a CLI command
pub fn dispatch<C: Connector>(command: Commands, client: &SoundpadClient<C>) -> Result<()> {
    match command {
        Commands::Status { json } => {
            client.connect()?;
            let report = status_report(client);

            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print_status(&report);
            }
            Ok(())
        }

        Commands::Check => {
            client.check_compatibility()?;
            println!("Soundpad speaks remote control version {}", CLIENT_VERSION);
            Ok(())
        }

        Commands::Play {
            index,
            speakers,
            mic,
        } => {
            let command = if speakers || mic {
                Command::PlaySoundOn {
                    index,
                    render_line: !mic,
                    capture_line: !speakers,
                }
            } else {
                Command::PlaySound { index }
            };
            run(client, command)?;
            println!("Playing sound {}", index);
            Ok(())
        }

        Commands::PlayWords { words } => {
            let sounds = fetch_sounds(client)?;

            if !words.is_empty() {
                return play_words(client, &sounds, &words);
            }

            let stdin = io::stdin();
            loop {
                print!("> ");
                io::stdout().flush()?;

                let mut line = String::new();
                if stdin.lock().read_line(&mut line)? == 0 {
                    println!();
                    return Ok(());
                }
                let words: Vec<&str> = line.split_whitespace().collect();
                play_words(client, &sounds, &words)?;
            }
        }

        Commands::PlayCategory {
            category,
            sound,
            speakers,
            mic,
        } => {
            run(
                client,
                Command::PlaySoundFromCategory {
                    category,
                    sound,
                    render_line: !mic,
                    capture_line: !speakers,
                },
            )?;
            println!("Playing sound {} of category {}", sound, category);
            Ok(())
        }

        Commands::PlaySelected => run(client, Command::PlaySelectedSound),
        Commands::Replay => run(client, Command::PlayCurrentSoundAgain),
        Commands::PreviousPlayed => run(client, Command::PlayPreviouslyPlayedSound),
        Commands::Next => run(client, Command::PlayNextSound),
        Commands::Previous => run(client, Command::PlayPreviousSound),
        Commands::Stop => run(client, Command::StopSound),
        Commands::Pause => run(client, Command::TogglePause),
        Commands::Jump { millis } => run(client, Command::JumpMs(millis)),
        Commands::Seek { millis } => run(client, Command::SeekMs(millis)),

        Commands::Record(record) => match record {
            RecordCommands::Start => run(client, Command::StartRecording),
            RecordCommands::Speakers => run(client, Command::StartRecordingSpeakers),
            RecordCommands::Microphone => run(client, Command::StartRecordingMicrophone),
            RecordCommands::Stop => run(client, Command::StopRecording),
            RecordCommands::Position => {
                println!("{} ms", query_number(client, Command::RecordingPositionMs)?);
                Ok(())
            }
            RecordCommands::Peak => {
                println!("{}", query_number(client, Command::RecordingPeak)?);
                Ok(())
            }
        },

        Commands::Search {
            term,
            next,
            previous,
        } => {
            let command = match term {
                Some(term) => Command::Search(term),
                None if next => Command::SelectNextHit,
                None if previous => Command::SelectPreviousHit,
                None => Command::ResetSearch,
            };
            run(client, command)
        }

        Commands::Volume { level } => match level {
            Some(level) => {
                run(client, Command::SetVolume(level))?;
                println!("Volume set to {}", level);
                Ok(())
            }
            None => {
                println!("{}", query_number(client, Command::Volume)?);
                Ok(())
            }
        },

        Commands::Mute { show } => {
            if !show {
                run(client, Command::ToggleMute)?;
            }
            let muted = query_number(client, Command::IsMuted)? == 1;
            println!("{}", if muted { "Muted" } else { "Unmuted" });
            Ok(())
        }

        Commands::List {
            from,
            to,
            json,
            raw,
        } => {
            let command = Command::SoundList { from, to };
            let xml = client.execute(&command)?.into_payload()?;

            if raw {
                println!("{}", xml);
                return Ok(());
            }

            let sounds = xml.parse::<SoundList>()?.sounds;
            if json {
                println!("{}", serde_json::to_string_pretty(&sounds)?);
            } else if sounds.is_empty() {
                println!("No sounds");
            } else {
                for sound in &sounds {
                    print_sound(sound);
                }
            }
            Ok(())
        }

        Commands::Categories { sounds, icons } => {
            let command = Command::Categories {
                with_sounds: sounds,
                with_icons: icons,
            };
            println!("{}", client.execute(&command)?.into_payload()?);
            Ok(())
        }

        Commands::Category {
            index,
            sounds,
            icons,
        } => {
            let command = Command::Category {
                index,
                with_sounds: sounds,
                with_icons: icons,
            };
            println!("{}", client.execute(&command)?.into_payload()?);
            Ok(())
        }

        Commands::SelectCategory {
            index,
            next,
            previous: _,
        } => {
            let command = match index {
                Some(index) => Command::SelectCategory(index),
                None if next => Command::SelectNextCategory,
                None => Command::SelectPreviousCategory,
            };
            run(client, command)
        }

        Commands::AddSound {
            path,
            at,
            category,
            position,
        } => {
            let command = match (at, category, position) {
                (Some(index), _, _) => Command::AddSoundAt { url: path, index },
                (None, Some(category), Some(position)) => Command::AddSoundToCategory {
                    url: path,
                    category,
                    position,
                },
                _ => Command::AddSound { url: path },
            };
            run(client, command)?;
            println!("Sound added");
            Ok(())
        }

        Commands::AddCategory { name, parent } => {
            run(client, Command::AddCategory { name, parent })?;
            println!("Category added");
            Ok(())
        }

        Commands::RemoveCategory { index } => {
            run(client, Command::RemoveCategory(index))?;
            println!("Category {} removed", index);
            Ok(())
        }

        Commands::RemoveSelected { on_disk } => run(
            client,
            Command::RemoveSelectedEntries {
                remove_on_disk: on_disk,
            },
        ),

        Commands::Undo => run(client, Command::Undo),
        Commands::Redo => run(client, Command::Redo),
        Commands::Save => run(client, Command::SaveSoundList),

        Commands::Raw { command } => {
            let reply = client.execute(&Command::Raw(command))?;
            if reply.is_offline() {
                return Err(Error::Offline);
            }
            println!("{}", reply);
            Ok(())
        }
    }
}

fn fetch_sounds<C: Connector>(client: &SoundpadClient<C>) -> Result<Vec<Sound>> {
    let command = Command::SoundList {
        from: None,
        to: None,
    };
    let xml = client.execute(&command)?.into_payload()?;
    Ok(xml.parse::<SoundList>()?.sounds)
}

/// Play the first title match for each word; misses are only logged
fn play_words<C: Connector>(
    client: &SoundpadClient<C>,
    sounds: &[Sound],
    words: &[impl AsRef<str>],
) -> Result<()> {
    for word in words {
        let word = word.as_ref();
        let Some(sound) = find_by_title(sounds, word) else {
            tracing::warn!("No sound found for {word}");
            continue;
        };
        let Ok(index) = i32::try_from(sound.index) else {
            tracing::warn!("Sound index {} is out of range", sound.index);
            continue;
        };

        run(client, Command::PlaySound { index })?;
        println!("Playing sound {} ({})", index, sound.title);
    }
    Ok(())
}

/// Run a command that answers with a status code
fn run<C: Connector>(client: &SoundpadClient<C>, command: Command) -> Result<()> {
    client.execute(&command)?.expect_ok(&command)
}

/// Run a command that answers with a number
fn query_number<C: Connector>(client: &SoundpadClient<C>, command: Command) -> Result<i64> {
    client.execute(&command)?.parse(&command, "a number")
}

/// Collect the status snapshot; fields Soundpad cannot answer are left empty
pub fn status_report<C: Connector>(client: &SoundpadClient<C>) -> StatusReport {
    let alive = client.is_alive();
    let non_empty = |s: String| (!s.is_empty()).then_some(s);
    let non_negative = |n: i64| (n >= 0).then_some(n);

    let remote_control_version = non_empty(client.remote_control_version());
    let compatible = remote_control_version.as_deref() == Some(CLIENT_VERSION);

    StatusReport {
        alive,
        version: non_empty(client.version()),
        remote_control_version,
        compatible,
        play_status: client.play_status(),
        position_ms: non_negative(client.playback_position()),
        duration_ms: non_negative(client.playback_duration()),
        volume: client.volume(),
        muted: client.is_muted(),
        sound_count: non_negative(client.sound_file_count()),
    }
}

fn print_status(report: &StatusReport) {
    println!(
        "Soundpad: {}",
        if report.alive { "running" } else { "not responding" }
    );
    println!("  Version:                {}", report.version.as_deref().unwrap_or("?"));
    println!(
        "  Remote control version: {}{}",
        report.remote_control_version.as_deref().unwrap_or("?"),
        if report.compatible {
            String::new()
        } else {
            format!(" (client speaks {})", CLIENT_VERSION)
        }
    );
    println!("  Play status:            {}", report.play_status);
    if let (Some(position), Some(duration)) = (report.position_ms, report.duration_ms) {
        println!("  Position:               {} / {} ms", position, duration);
    }
    println!(
        "  Volume:                 {}{}",
        report.volume,
        if report.muted { " (muted)" } else { "" }
    );
    if let Some(count) = report.sound_count {
        println!("  Sounds:                 {}", count);
    }
}

fn print_sound(sound: &Sound) {
    println!(
        "{:>5}  {}{}  [{}]",
        sound.index,
        sound.title,
        sound
            .artist
            .as_ref()
            .map(|a| format!(" - {}", a))
            .unwrap_or_default(),
        format_duration(sound.duration)
    );
}

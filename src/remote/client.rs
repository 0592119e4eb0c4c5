//! Typed client for the Soundpad remote control interface
//!
//! Every convenience method formats one [`Command`], sends it through the
//! [`Transport`] and decodes the answer. They never fail: problems turn into
//! a safe default plus a [`Diagnostic`](super::Diagnostic) for the sink.
//! Use [`SoundpadClient::execute`] when the error itself matters.

use std::sync::Arc;

use crate::common::config::Config;
use crate::common::{Error, Result};
use crate::ipc::pipe::{Connector, PipeConnector};
use crate::ipc::protocol::{Command, Reply, CLIENT_VERSION};
use crate::ipc::transport::Transport;

use super::decode::{Decoder, TextCheck};
use super::diagnostics::{DiagnosticSink, SilentSink, TracingSink};
use super::soundlist::Sound;
use super::types::PlayStatus;

/// Client for one Soundpad instance
///
/// Cheap to share behind an `Arc`; concurrent calls are serialized by the
/// transport.
pub struct SoundpadClient<C: Connector = PipeConnector> {
    transport: Transport<C>,
    sink: Arc<dyn DiagnosticSink>,
}

impl SoundpadClient<PipeConnector> {
    /// Client for the default Soundpad pipe
    pub fn new() -> Self {
        Self::with_transport(Transport::new())
    }

    /// Client built from configuration
    pub fn from_config(config: &Config) -> Self {
        let transport = Transport::with_connector(PipeConnector::new(&config.connection.pipe_name))
            .with_pacing_tick(config.transport.pacing_tick());

        let sink: Arc<dyn DiagnosticSink> = if config.diagnostics.report {
            Arc::new(TracingSink)
        } else {
            Arc::new(SilentSink)
        };

        Self::with_transport(transport).with_sink(sink)
    }
}

impl Default for SoundpadClient<PipeConnector> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Connector> SoundpadClient<C> {
    pub fn with_transport(transport: Transport<C>) -> Self {
        Self {
            transport,
            sink: Arc::new(TracingSink),
        }
    }

    /// Replace the diagnostic sink
    pub fn with_sink(mut self, sink: Arc<dyn DiagnosticSink>) -> Self {
        self.sink = sink;
        self
    }

    pub fn transport(&self) -> &Transport<C> {
        &self.transport
    }

    /// Open the connection now instead of on the first command
    pub fn connect(&self) -> Result<()> {
        self.transport.ensure_connected()
    }

    /// Drop the connection; the next command reconnects
    pub fn disconnect(&self) {
        self.transport.close();
    }

    /// Send a command and return the classified reply, propagating
    /// connection and transport errors
    pub fn execute(&self, command: &Command) -> Result<Reply> {
        self.transport.request(&command.to_string())
    }

    /// Fail unless Soundpad speaks the same interface version
    pub fn check_compatibility(&self) -> Result<()> {
        let command = Command::RemoteControlVersion;
        let server = match self.execute(&command)? {
            // Builds older than the version query do not know the command
            Reply::Status(status) if status.is_command_not_found() => "unknown".to_string(),
            reply => reply.into_payload()?,
        };
        if server != CLIENT_VERSION {
            return Err(Error::Incompatible {
                client: CLIENT_VERSION.to_string(),
                server,
            });
        }
        Ok(())
    }

    // Non-raising send: failures read as an empty response
    fn send(&self, command: &Command) -> String {
        self.transport.send_request_or_empty(&command.to_string())
    }

    fn decoder<'a>(&'a self, command: &'a Command) -> Decoder<'a> {
        Decoder::new(command, self.sink.as_ref())
    }

    fn run(&self, command: Command) -> bool {
        let response = self.send(&command);
        self.decoder(&command).success(&response)
    }

    fn number(&self, command: Command) -> i64 {
        let response = self.send(&command);
        self.decoder(&command).number(&response, -1)
    }

    fn text(&self, command: Command, check: TextCheck) -> String {
        let response = self.send(&command);
        self.decoder(&command).text(response, check)
    }

    // === Playback ===

    /// Play the sound at `index` in the "All sounds" category
    pub fn play_sound(&self, index: i32) -> bool {
        self.run(Command::PlaySound { index })
    }

    /// Play a sound on the speakers (`render_line`) and/or the microphone
    /// (`capture_line`)
    pub fn play_sound_on(&self, index: i32, render_line: bool, capture_line: bool) -> bool {
        self.run(Command::PlaySoundOn {
            index,
            render_line,
            capture_line,
        })
    }

    pub fn play_previous_sound(&self) -> bool {
        self.run(Command::PlayPreviousSound)
    }

    pub fn play_next_sound(&self) -> bool {
        self.run(Command::PlayNextSound)
    }

    pub fn stop_sound(&self) -> bool {
        self.run(Command::StopSound)
    }

    pub fn toggle_pause(&self) -> bool {
        self.run(Command::TogglePause)
    }

    /// Jump relative to the current position; negative values go back
    pub fn jump(&self, millis: i32) -> bool {
        self.run(Command::JumpMs(millis))
    }

    /// Jump to an absolute position in the current sound
    pub fn seek(&self, millis: i32) -> bool {
        self.run(Command::SeekMs(millis))
    }

    pub fn play_selected_sound(&self) -> bool {
        self.run(Command::PlaySelectedSound)
    }

    pub fn play_current_sound_again(&self) -> bool {
        self.run(Command::PlayCurrentSoundAgain)
    }

    pub fn play_previously_played_sound(&self) -> bool {
        self.run(Command::PlayPreviouslyPlayedSound)
    }

    /// Play the `sound`-th entry of a category; category -1 is the one
    /// currently selected
    pub fn play_sound_from_category(
        &self,
        category: i32,
        sound: i32,
        render_line: bool,
        capture_line: bool,
    ) -> bool {
        self.run(Command::PlaySoundFromCategory {
            category,
            sound,
            render_line,
            capture_line,
        })
    }

    // === Recording ===

    /// Start recording; true if recording started or was already running
    pub fn start_recording(&self) -> bool {
        self.run(Command::StartRecording)
    }

    pub fn start_recording_speakers(&self) -> bool {
        self.run(Command::StartRecordingSpeakers)
    }

    pub fn start_recording_microphone(&self) -> bool {
        self.run(Command::StartRecordingMicrophone)
    }

    pub fn stop_recording(&self) -> bool {
        self.run(Command::StopRecording)
    }

    pub fn recording_position(&self) -> i64 {
        self.number(Command::RecordingPositionMs)
    }

    pub fn recording_peak(&self) -> i64 {
        self.number(Command::RecordingPeak)
    }

    // === Search & selection ===

    pub fn search(&self, term: &str) -> bool {
        self.run(Command::Search(term.to_string()))
    }

    pub fn reset_search(&self) -> bool {
        self.run(Command::ResetSearch)
    }

    pub fn select_previous_hit(&self) -> bool {
        self.run(Command::SelectPreviousHit)
    }

    pub fn select_next_hit(&self) -> bool {
        self.run(Command::SelectNextHit)
    }

    /// Select a row of the currently shown category (not a sound index)
    pub fn select_row(&self, row: i32) -> bool {
        self.run(Command::SelectRow(row))
    }

    pub fn scroll_by(&self, rows: i32) -> bool {
        self.run(Command::ScrollBy(rows))
    }

    pub fn scroll_to(&self, row: i32) -> bool {
        self.run(Command::ScrollTo(row))
    }

    // === Queries ===

    /// Number of sounds across all categories, or -1
    pub fn sound_file_count(&self) -> i64 {
        self.number(Command::SoundFileCount)
    }

    pub fn playback_position(&self) -> i64 {
        self.number(Command::PlaybackPositionMs)
    }

    pub fn playback_duration(&self) -> i64 {
        self.number(Command::PlaybackDurationMs)
    }

    /// Raw XML sound list; `from` starts at 1 and `to` is inclusive
    pub fn sound_list(&self, from: Option<i32>, to: Option<i32>) -> String {
        self.text(Command::SoundList { from, to }, TextCheck::All)
    }

    /// Parsed sound list
    pub fn sounds(&self, from: Option<i32>, to: Option<i32>) -> Vec<Sound> {
        let command = Command::SoundList { from, to };
        let response = self.send(&command);
        self.decoder(&command).sounds(&response)
    }

    pub fn title_text(&self) -> String {
        self.text(Command::TitleText, TextCheck::StatusOnly)
    }

    pub fn status_bar_text(&self) -> String {
        self.text(Command::StatusBarText, TextCheck::StatusOnly)
    }

    pub fn play_status(&self) -> PlayStatus {
        let command = Command::PlayStatus;
        let response = self.send(&command);
        self.decoder(&command).play_status(&response)
    }

    /// Soundpad's own version, not the interface version
    pub fn version(&self) -> String {
        self.text(Command::Version, TextCheck::OfflineOnly)
    }

    pub fn remote_control_version(&self) -> String {
        self.text(Command::RemoteControlVersion, TextCheck::OfflineOnly)
    }

    /// Whether Soundpad speaks [`CLIENT_VERSION`]
    pub fn is_compatible(&self) -> bool {
        self.remote_control_version() == CLIENT_VERSION
    }

    /// Whether Soundpad is running and answering
    pub fn is_alive(&self) -> bool {
        self.run(Command::IsAlive)
    }

    // === Editing ===

    /// Append a sound file to the list
    pub fn add_sound(&self, url: &str) -> bool {
        self.run(Command::AddSound {
            url: url.to_string(),
        })
    }

    pub fn add_sound_at(&self, url: &str, index: i32) -> bool {
        self.run(Command::AddSoundAt {
            url: url.to_string(),
            index,
        })
    }

    pub fn add_sound_to_category(&self, url: &str, category: i32, position: i32) -> bool {
        self.run(Command::AddSoundToCategory {
            url: url.to_string(),
            category,
            position,
        })
    }

    /// Remove the selected entries; `remove_on_disk` makes Soundpad ask for
    /// confirmation and delete the files too
    pub fn remove_selected_entries(&self, remove_on_disk: bool) -> bool {
        self.run(Command::RemoveSelectedEntries { remove_on_disk })
    }

    pub fn undo(&self) -> bool {
        self.run(Command::Undo)
    }

    pub fn redo(&self) -> bool {
        self.run(Command::Redo)
    }

    pub fn save_sound_list(&self) -> bool {
        self.run(Command::SaveSoundList)
    }

    // === Categories ===

    /// Add a category; `parent` -1 appends at the bottom of the tree
    pub fn add_category(&self, name: &str, parent: i32) -> bool {
        self.run(Command::AddCategory {
            name: name.to_string(),
            parent,
        })
    }

    pub fn select_category(&self, index: i32) -> bool {
        self.run(Command::SelectCategory(index))
    }

    pub fn select_previous_category(&self) -> bool {
        self.run(Command::SelectPreviousCategory)
    }

    pub fn select_next_category(&self) -> bool {
        self.run(Command::SelectNextCategory)
    }

    pub fn remove_category(&self, index: i32) -> bool {
        self.run(Command::RemoveCategory(index))
    }

    /// Raw XML category tree
    pub fn categories(&self, with_sounds: bool, with_icons: bool) -> String {
        self.text(
            Command::Categories {
                with_sounds,
                with_icons,
            },
            TextCheck::All,
        )
    }

    pub fn category(&self, index: i32, with_sounds: bool, with_icons: bool) -> String {
        self.text(
            Command::Category {
                index,
                with_sounds,
                with_icons,
            },
            TextCheck::All,
        )
    }

    // === Volume ===

    /// Speaker volume between 0 and 100, or 0
    pub fn volume(&self) -> i32 {
        let command = Command::Volume;
        let response = self.send(&command);
        self.decoder(&command).number(&response, 0)
    }

    pub fn set_volume(&self, volume: i32) -> bool {
        self.run(Command::SetVolume(volume))
    }

    /// True if the speakers are muted or at zero volume
    pub fn is_muted(&self) -> bool {
        let command = Command::IsMuted;
        let response = self.send(&command);
        self.decoder(&command).flag(&response)
    }

    pub fn toggle_mute(&self) -> bool {
        self.run(Command::ToggleMute)
    }
}

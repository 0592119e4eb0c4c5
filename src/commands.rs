//! CLI command definitions
//!
//! Defines the clap commands for the soundpad CLI.

use clap::{ArgGroup, Subcommand};

#[derive(Subcommand)]
pub enum Commands {
    /// Show whether Soundpad is reachable, its versions and playback state
    Status {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Verify that Soundpad speaks the same remote control version
    Check,

    /// Play a sound by its index in the "All sounds" category
    Play {
        /// Sound index (see 'soundpad list')
        index: i32,

        /// Play on the speakers only
        #[arg(long, conflicts_with = "mic")]
        speakers: bool,

        /// Play on the microphone only
        #[arg(long)]
        mic: bool,
    },

    /// Play sounds by title: each word plays the first sound whose title
    /// contains it (no words reads lines from stdin)
    PlayWords {
        /// Words to look up, case-insensitive
        words: Vec<String>,
    },

    /// Play the n-th sound of a category
    PlayCategory {
        /// Category index, -1 for the selected category
        #[arg(allow_negative_numbers = true)]
        category: i32,

        /// Position of the sound in the category, starting at 1
        sound: i32,

        /// Play on the speakers only
        #[arg(long, conflicts_with = "mic")]
        speakers: bool,

        /// Play on the microphone only
        #[arg(long)]
        mic: bool,
    },

    /// Play the selected sound
    PlaySelected,

    /// Play the current sound again
    Replay,

    /// Play the previously played sound
    PreviousPlayed,

    /// Play the next sound in the list
    Next,

    /// Play the previous sound in the list
    #[command(alias = "prev")]
    Previous,

    /// Stop playback
    Stop,

    /// Toggle pause
    Pause,

    /// Jump forward (or back, with a negative value) in milliseconds
    Jump {
        #[arg(allow_negative_numbers = true)]
        millis: i32,
    },

    /// Seek to a position in milliseconds
    Seek { millis: i32 },

    /// Recording control
    #[command(subcommand)]
    Record(RecordCommands),

    /// Highlight sounds matching a term (no term resets the search)
    Search {
        term: Option<String>,

        /// Select the next hit instead of searching
        #[arg(long, conflicts_with_all = ["term", "previous"])]
        next: bool,

        /// Select the previous hit instead of searching
        #[arg(long, conflicts_with = "term")]
        previous: bool,
    },

    /// Show or set the speaker volume
    Volume {
        /// New volume between 0 and 100
        #[arg(value_parser = clap::value_parser!(i32).range(0..=100))]
        level: Option<i32>,
    },

    /// Toggle mute (or show mute state with --show)
    Mute {
        #[arg(long)]
        show: bool,
    },

    /// List sounds
    #[command(alias = "ls")]
    List {
        /// First sound index, starting at 1
        #[arg(long)]
        from: Option<i32>,

        /// Last sound index, inclusive
        #[arg(long)]
        to: Option<i32>,

        /// Output as JSON
        #[arg(long)]
        json: bool,

        /// Print the XML exactly as Soundpad sent it
        #[arg(long, conflicts_with = "json")]
        raw: bool,
    },

    /// Print the category tree as XML
    Categories {
        /// Include the sounds of every category
        #[arg(long)]
        sounds: bool,

        /// Include base64 encoded icons
        #[arg(long)]
        icons: bool,
    },

    /// Print one category as XML
    Category {
        index: i32,

        #[arg(long)]
        sounds: bool,

        #[arg(long)]
        icons: bool,
    },

    /// Select a category (or step with --next / --previous)
    #[command(group(ArgGroup::new("target").required(true).args(["index", "next", "previous"])))]
    SelectCategory {
        index: Option<i32>,

        #[arg(long, conflicts_with_all = ["index", "previous"])]
        next: bool,

        #[arg(long, conflicts_with = "index")]
        previous: bool,
    },

    /// Add a sound file
    AddSound {
        /// Full path of the file
        path: String,

        /// Insert at this index instead of appending
        #[arg(long, conflicts_with = "category")]
        at: Option<i32>,

        /// Add to this category
        #[arg(long, requires = "position")]
        category: Option<i32>,

        /// Position within the category
        #[arg(long)]
        position: Option<i32>,
    },

    /// Add a category
    AddCategory {
        name: String,

        /// Parent category index
        #[arg(long, default_value = "-1", allow_negative_numbers = true)]
        parent: i32,
    },

    /// Remove a category
    RemoveCategory { index: i32 },

    /// Remove the selected entries
    RemoveSelected {
        /// Delete the files on disk too (Soundpad asks for confirmation)
        #[arg(long)]
        on_disk: bool,
    },

    /// Undo the last action
    Undo,

    /// Redo the last undone action
    Redo,

    /// Save the sound list
    Save,

    /// Send a raw command and print the response
    Raw {
        /// Command text, e.g. 'GetPlayStatus()'
        command: String,
    },
}

#[derive(Subcommand)]
pub enum RecordCommands {
    /// Start recording
    Start,

    /// Start recording the speakers
    Speakers,

    /// Start recording the microphone
    Microphone,

    /// Stop recording
    Stop,

    /// Show the recording position in milliseconds
    Position,

    /// Show the current recording peak
    Peak,
}

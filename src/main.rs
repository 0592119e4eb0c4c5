//! Soundpad remote control CLI
//!
//! Talks to a running Soundpad through its remote control pipe.

use std::path::PathBuf;

use clap::Parser;
use commands::Commands;
use soundpad::common::{config::Config, logging};
use soundpad::{cli, commands, SoundpadClient};

#[derive(Parser)]
#[command(name = "soundpad", about = "Remote control for Soundpad")]
#[command(version, long_about = None)]
struct Cli {
    /// Pipe name or endpoint path (overrides the config file)
    #[arg(long, global = true)]
    pipe: Option<String>,

    /// Configuration file (default: platform config dir)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log every pipe exchange
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

fn main() {
    let cli = Cli::parse();

    logging::init_cli(cli.verbose);

    let config = match &cli.config {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    };

    let result = config.and_then(|mut config| {
        if let Some(pipe) = cli.pipe {
            config.connection.pipe_name = pipe;
        }
        let client = SoundpadClient::from_config(&config);
        cli::dispatch(cli.command, &client)
    });

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

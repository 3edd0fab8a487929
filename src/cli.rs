use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "overview-drag")]
#[command(about = "Replays overview window drags against an in-memory shell")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Replay a JSON gesture script and print the JSON report
    Replay {
        /// Path to the gesture script.
        script: PathBuf,
        /// Path to the config file (default: `$XDG_CONFIG_HOME/overview-drag/config.kdl`).
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Include the shell events of every gesture in the report.
        #[arg(long)]
        events: bool,
    },
    /// Validate the config file
    Validate {
        /// Path to the config file (default: `$XDG_CONFIG_HOME/overview-drag/config.kdl`).
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

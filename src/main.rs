use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::rc::Rc;

use anyhow::{anyhow, Context};
use clap::Parser;
use directories::ProjectDirs;
use overview_drag::overview::DragOptions;
use overview_drag::replay::{replay, Script};
use overview_drag_config::Config;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

mod cli;

use self::cli::{Cli, Commands};

const DEFAULT_LOG_FILTER: &str = "overview_drag=info";

fn main() -> anyhow::Result<ExitCode> {
    // Logs go to stderr so that reports on stdout stay parseable.
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(env_filter)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Replay {
            script,
            config,
            events,
        } => {
            let config = load_config(config.as_deref())?;
            let script = Script::load(&script)?;
            let options = Rc::new(DragOptions::from_config(&config));

            let report = replay(&script, options, events)?;
            let json = serde_json::to_string_pretty(&report).context("error serializing report")?;
            println!("{json}");
            Ok(ExitCode::SUCCESS)
        }
        Commands::Validate { config } => {
            let Some(path) = config.or_else(default_config_path) else {
                return Err(anyhow!("no config path given and no default config location"));
            };

            match Config::load(&path) {
                Ok(_) => {
                    info!("config at {path:?} is valid");
                    Ok(ExitCode::SUCCESS)
                }
                Err(err) => {
                    eprintln!("{err:?}");
                    Ok(ExitCode::FAILURE)
                }
            }
        }
    }
}

fn default_config_path() -> Option<PathBuf> {
    let Some(dirs) = ProjectDirs::from("", "", "overview-drag") else {
        warn!("error retrieving home directory");
        return None;
    };

    let mut path = dirs.config_dir().to_owned();
    path.push("config.kdl");
    Some(path)
}

/// Loads the config at `path`, or at the default location.
///
/// A missing default config means defaults, while an explicitly given path has to exist.
fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    let path = match path {
        Some(path) => path.to_owned(),
        None => match default_config_path() {
            Some(path) if path.exists() => path,
            _ => {
                info!("no config file, using defaults");
                return Ok(Config::default());
            }
        },
    };

    // The Debug output of the diagnostic includes the offending KDL span.
    Config::load(&path).map_err(|err| anyhow!("{err:?}"))
}

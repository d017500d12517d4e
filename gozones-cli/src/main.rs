//! Go Zones CLI - Command-line interface
//!
//! This binary drives the Go Zones library: it loads the zone layers,
//! toggles them, and locates addresses or coordinates on the map.

mod commands;
mod error;
mod runner;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use gozones::config::config_file_path;

use commands::config::ConfigCommands;
use commands::layers::LayersArgs;
use error::CliError;
use runner::CliRunner;

#[derive(Parser)]
#[command(name = "gozones")]
#[command(version, about = "Florida go/no-go zone map", long_about = None)]
struct Cli {
    /// Configuration file (default: ~/.gozones/config.ini)
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write the default configuration file if none exists
    Init,

    /// Inspect configuration
    #[command(subcommand)]
    Config(ConfigCommands),

    /// Load all zone layers and list their state
    Layers {
        /// Show a layer (repeatable)
        #[arg(long, value_name = "KEY")]
        show: Vec<String>,

        /// Hide a layer (repeatable)
        #[arg(long, value_name = "KEY")]
        hide: Vec<String>,
    },

    /// Find an address and mark it on the map
    Locate {
        /// Free-text address, e.g. 400 N Tampa St, Tampa, FL
        #[arg(required = true, num_args = 1..)]
        address: Vec<String>,
    },

    /// Mark coordinates on the map (no network access)
    Plot {
        /// "LAT, LNG" in decimal degrees, e.g. "28.4, -82.5"
        #[arg(allow_hyphen_values = true)]
        coordinates: String,
    },

    /// Start an interactive map session
    Session,
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        e.exit();
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    let config_path = cli.config.unwrap_or_else(config_file_path);

    match cli.command {
        Commands::Init => commands::init::run(&config_path),
        Commands::Config(command) => commands::config::run(command, &config_path),
        Commands::Layers { show, hide } => {
            let runner = CliRunner::new(&config_path)?;
            commands::layers::run(&runner, LayersArgs { show, hide })
        }
        Commands::Locate { address } => {
            let runner = CliRunner::new(&config_path)?;
            commands::locate::run_locate(&runner, &address)
        }
        Commands::Plot { coordinates } => {
            let runner = CliRunner::new(&config_path)?;
            commands::locate::run_plot(&runner, &coordinates)
        }
        Commands::Session => {
            let runner = CliRunner::new(&config_path)?;
            commands::session::run(&runner)
        }
    }
}

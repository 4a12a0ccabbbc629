use std::{
    fs::File,
    io::{self, BufReader, IsTerminal},
    path::PathBuf,
};

use clap::Parser;
use tracing::debug;

use crate::{config::BoardConfig, models::store::TaskStore};

mod config;
mod models;
mod services;
mod shell;
mod ui;

#[derive(Parser)]
#[command(
    name = "taskboard",
    about = "A pending / processing / done task board for your terminal"
)]
struct Cli {
    /// Path to a JSON config file (defaults to the user config directory)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Read board commands from a file instead of the terminal
    #[arg(short, long)]
    script: Option<PathBuf>,
}

fn main() {
    init_logging();

    let cli = Cli::parse();

    let config = match BoardConfig::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: Failed to load config: {}", e);
            std::process::exit(1);
        }
    };

    if !config.color {
        colored::control::set_override(false);
    }

    // Board state lives only as long as this process
    let mut store = TaskStore::with_labels(config.available_labels);

    let result = match cli.script {
        Some(path) => {
            let file = File::open(&path).unwrap_or_else(|e| {
                eprintln!("Error: Failed to open script '{}': {}", path.display(), e);
                std::process::exit(1);
            });
            debug!(path = %path.display(), "running script");
            shell::run(&mut store, BufReader::new(file), false)
        }
        None => {
            let stdin = io::stdin();
            let interactive = stdin.is_terminal();
            if interactive {
                println!("taskboard: type 'help' for commands, 'quit' to leave");
            }
            shell::run(&mut store, stdin.lock(), interactive)
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Logs go to stderr so they never interleave with the rendered board.
/// The filter is read from `TASKBOARD_LOG` and defaults to `warn`.
fn init_logging() {
    let filter = tracing_subscriber::EnvFilter::try_from_env("TASKBOARD_LOG")
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .compact()
        .init();
}

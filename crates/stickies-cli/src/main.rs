//! Stickies CLI
//!
//! Command-line interface and terminal board for Stickies.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use stickies_core::{open_storage, Config, NoteColor, NoteStore};

mod commands;
mod editor;
mod output;
mod tui;

use output::{Output, OutputFormat, ToastPrinter};

#[derive(Parser)]
#[command(name = "stickies")]
#[command(about = "Stickies - colored sticky notes for the terminal")]
#[command(version)]
#[command(propagate_version = true)]
struct Cli {
    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Quiet mode - minimal output
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Use a config file other than the default
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Open the note board (default)
    Board,
    /// Create a new note
    #[command(alias = "add")]
    Create {
        /// Note color (yellow, pink, green, blue)
        #[arg(short, long, default_value_t = NoteColor::Yellow)]
        color: NoteColor,
    },
    /// List all notes, bottom of the stack first
    #[command(alias = "ls")]
    List,
    /// Show one note
    Show {
        /// Note ID (full or prefix)
        id: String,
    },
    /// Replace a note's text
    Edit {
        /// Note ID (full or prefix)
        id: String,
        /// New text (opens editor if not provided)
        text: Option<String>,
    },
    /// Move a note; the position is kept inside the viewport
    Move {
        /// Note ID (full or prefix)
        id: String,
        #[arg(allow_negative_numbers = true)]
        x: i32,
        #[arg(allow_negative_numbers = true)]
        y: i32,
    },
    /// Resize a note within the allowed bounds
    Resize {
        /// Note ID (full or prefix)
        id: String,
        width: i32,
        height: i32,
    },
    /// Bring a note to the front
    Focus {
        /// Note ID (full or prefix)
        id: String,
    },
    /// Delete a note
    #[command(alias = "rm")]
    Delete {
        /// Note ID (full or prefix)
        id: String,
        /// Skip confirmation
        #[arg(short, long)]
        yes: bool,
    },
    /// Delete every note
    Clear {
        /// Skip confirmation
        #[arg(short, long)]
        yes: bool,
    },
    /// Show storage and board status
    Status,
    /// Show or set configuration
    Config {
        #[command(subcommand)]
        command: Option<ConfigCommands>,
    },
}

#[derive(Subcommand, Clone)]
enum ConfigCommands {
    /// Show current configuration
    Show,
    /// Set a configuration value
    Set {
        /// Configuration key (data_dir, storage, viewport_width, ...)
        key: String,
        /// Configuration value
        value: String,
    },
}

fn main() -> ExitCode {
    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:?}", e);
            if let Some(hint) = output::recovery_hint(&e) {
                eprintln!("\nHint: {}", hint);
            }
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let output = Output::new(OutputFormat::from_flags(cli.json, cli.quiet));
    let config_path = cli.config.as_ref();

    // Config commands work even when the current config is broken
    if let Some(Commands::Config { command }) = &cli.command {
        return handle_config_command(command.clone(), config_path, &output);
    }

    let config =
        Config::load_with_cli_override(config_path).context("Failed to load configuration")?;

    // The board owns the terminal, so it logs to a file instead
    if matches!(&cli.command, Some(Commands::Board) | None) {
        return tui::run(&config);
    }

    init_cli_logging();

    let storage = open_storage(&config).context("Failed to open storage")?;
    let mut store = NoteStore::open(storage, config.viewport(), ToastPrinter::new(output.format));

    match cli.command {
        Some(Commands::Create { color }) => commands::note::create(&mut store, color, &output),
        Some(Commands::List) => commands::note::list(&store, &output),
        Some(Commands::Show { id }) => commands::note::show(&store, &id, &output),
        Some(Commands::Edit { id, text }) => commands::note::edit(&mut store, &id, text, &output),
        Some(Commands::Move { id, x, y }) => {
            commands::note::move_to(&mut store, &id, x, y, &output)
        }
        Some(Commands::Resize { id, width, height }) => {
            commands::note::resize(&mut store, &id, width, height, &output)
        }
        Some(Commands::Focus { id }) => commands::note::focus(&mut store, &id, &output),
        Some(Commands::Delete { id, yes }) => {
            commands::note::delete(&mut store, &id, yes, &output)
        }
        Some(Commands::Clear { yes }) => commands::note::clear(&mut store, yes, &output),
        Some(Commands::Status) => commands::status::show(&store, &config, &output),
        Some(Commands::Board) | Some(Commands::Config { .. }) | None => Ok(()),
    }
}

fn handle_config_command(
    command: Option<ConfigCommands>,
    config_path: Option<&PathBuf>,
    output: &Output,
) -> Result<()> {
    match command {
        Some(ConfigCommands::Show) | None => commands::config::show(config_path, output),
        Some(ConfigCommands::Set { key, value }) => {
            commands::config::set(key, value, config_path, output)
        }
    }
}

/// Log to stderr for one-shot commands, filtered by STICKIES_LOG (default: warn)
fn init_cli_logging() {
    let level = std::env::var("STICKIES_LOG").unwrap_or_else(|_| "warn".to_string());
    let env_filter = EnvFilter::new(format!("stickies_core={},stickies_cli={}", level, level));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

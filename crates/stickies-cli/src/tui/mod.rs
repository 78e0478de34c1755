//! Stickies board
//!
//! Full-screen terminal board with mouse capture.
//!
//! ## Mouse
//!
//! - Drag a note's header to move it
//! - Drag the bottom-right corner to resize it
//! - Click the × in the top-right corner to delete it
//! - Click a note's text to edit it; Esc stops editing
//!
//! ## Keys
//!
//! - Ctrl+Shift+N (or Ctrl+N): new yellow note
//! - y/p/g/b: new yellow/pink/green/blue note
//! - d or Delete: delete the focused note
//! - C: clear all notes
//! - ?: help
//! - q or Ctrl+C: quit

mod app;
mod ui;

use std::fs::File;
use std::io::{stdout, Stdout};
use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::prelude::*;
use tracing::info;
use tracing_subscriber::EnvFilter;

use stickies_core::{open_storage, Config, NoteStore, RecordingNotifier, SharedViewport};

use app::{App, CellSize};

/// How long to wait for input before redrawing
const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Run the board until the user quits
pub fn run(config: &Config) -> Result<()> {
    init_tui_logging(config);

    let storage = open_storage(config).context("Failed to open storage")?;
    let viewport = SharedViewport::new(config.viewport());
    let notifier = RecordingNotifier::new();
    let mut store = NoteStore::open(storage, viewport.clone(), notifier.clone());

    let mut app = App::new(
        CellSize::new(config.cell_width, config.cell_height),
        viewport,
        notifier,
    );

    let mut terminal = setup_terminal()?;
    let result = run_app(&mut terminal, &mut app, &mut store);
    restore_terminal(&mut terminal)?;

    info!(notes = store.len(), "board closed");
    result
}

fn setup_terminal() -> Result<Terminal<CrosstermBackend<Stdout>>> {
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout))?;
    terminal.hide_cursor()?;
    Ok(terminal)
}

fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> Result<()> {
    terminal.show_cursor()?;
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    Ok(())
}

fn run_app<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    store: &mut NoteStore,
) -> Result<()> {
    loop {
        app.check_toast_timeout();

        let mut board = app.board;
        terminal.draw(|frame| board = ui::draw(frame, app, store))?;
        app.set_board_area(board);

        if !event::poll(POLL_INTERVAL)? {
            continue;
        }

        match event::read()? {
            Event::Key(key) => app.handle_key(store, key),
            Event::Mouse(mouse) => app.handle_mouse(store, mouse),
            Event::Resize(width, height) => {
                app.set_board_area(ui::board_area(Rect::new(0, 0, width, height)));
            }
            _ => {}
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

/// Log to a file while the board owns the terminal
///
/// Only active when STICKIES_LOG is set.
fn init_tui_logging(config: &Config) {
    let Ok(log_level) = std::env::var("STICKIES_LOG") else {
        return;
    };

    let log_path = config.log_path();

    let log_file = match File::create(&log_path) {
        Ok(f) => f,
        Err(e) => {
            eprintln!("Warning: Could not create log file {:?}: {}", log_path, e);
            return;
        }
    };

    let env_filter = EnvFilter::new(format!(
        "stickies_core={},stickies_cli={}",
        log_level, log_level
    ));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_ansi(false)
        .with_writer(log_file)
        .try_init();

    info!("board logging initialized to {:?}", log_path);
}

//! Board state and input handling
//!
//! Terminal cells are mapped onto the pixel plane the store works in: each
//! cell stands for `cell_width` x `cell_height` pixels, and a mouse event is
//! taken to land on the center of its cell.

use std::time::{Duration, Instant};

use crossterm::event::{
    KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use ratatui::layout::Rect;
use tracing::{debug, warn};

use crate::output::format_store_error;

use stickies_core::geometry::{hit_test, topmost_at};
use stickies_core::{
    HitRegion, InteractionController, Note, NoteColor, NoteId, NoteStore, Notification, Point,
    RecordingNotifier, SharedViewport, StoreResult, Viewport,
};

/// How long a toast stays on screen
const TOAST_DURATION: Duration = Duration::from_secs(3);

/// Pixels covered by one terminal cell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellSize {
    pub width: i32,
    pub height: i32,
}

impl CellSize {
    pub fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }

    /// Pixel at the center of the cell at `(col, row)` of the board
    ///
    /// Cells left of or above the board give negative coordinates.
    pub fn to_point(&self, col: i32, row: i32) -> Point {
        Point::new(
            col * self.width + self.width / 2,
            row * self.height + self.height / 2,
        )
    }

    /// Cells covered by a note, relative to the board origin
    pub fn note_cells(&self, note: &Note) -> Rect {
        let left = note.x.max(0) / self.width;
        let top = note.y.max(0) / self.height;
        let right = note.x.max(0).saturating_add(note.width) / self.width;
        let bottom = note.y.max(0).saturating_add(note.height) / self.height;
        Rect::new(
            to_cells(left),
            to_cells(top),
            to_cells(right - left),
            to_cells(bottom - top),
        )
    }

    /// Viewport in pixels for a board of the given size in cells
    pub fn viewport_for(&self, board: Rect) -> Viewport {
        Viewport::new(
            i32::from(board.width) * self.width,
            i32::from(board.height) * self.height,
        )
    }
}

fn to_cells(value: i32) -> u16 {
    u16::try_from(value.max(0)).unwrap_or(u16::MAX)
}

/// Application state
pub struct App {
    /// Whether the app should quit
    pub should_quit: bool,
    /// Whether help overlay is visible
    pub show_help: bool,
    /// Note whose text receives key presses
    pub editing: Option<NoteId>,
    /// Drag / resize state machine
    pub controller: InteractionController,
    /// Latest notification, shown on the toast line
    pub toast: Option<Notification>,
    /// Error message shown instead of the toast
    pub error: Option<String>,
    /// Screen area notes are drawn in
    pub board: Rect,
    pub cell: CellSize,
    viewport: SharedViewport,
    notifier: RecordingNotifier,
    toast_time: Option<Instant>,
}

impl App {
    pub fn new(cell: CellSize, viewport: SharedViewport, notifier: RecordingNotifier) -> Self {
        Self {
            should_quit: false,
            show_help: false,
            editing: None,
            controller: InteractionController::new(),
            toast: None,
            error: None,
            board: Rect::default(),
            cell,
            viewport,
            notifier,
            toast_time: None,
        }
    }

    /// Record where the board is drawn, resizing the store's viewport to match
    pub fn set_board_area(&mut self, board: Rect) {
        if board == self.board {
            return;
        }
        self.board = board;
        let viewport = self.cell.viewport_for(board);
        debug!(width = viewport.width, height = viewport.height, "viewport resized");
        self.viewport.set(viewport);
    }

    /// Pixel point for a screen position, if it lies on the board
    pub fn board_point(&self, column: u16, row: u16) -> Option<Point> {
        let inside = column >= self.board.x
            && column < self.board.right()
            && row >= self.board.y
            && row < self.board.bottom();
        inside.then(|| self.pointer_point(column, row))
    }

    /// Pixel point for a screen position, off-board positions included
    fn pointer_point(&self, column: u16, row: u16) -> Point {
        self.cell.to_point(
            i32::from(column) - i32::from(self.board.x),
            i32::from(row) - i32::from(self.board.y),
        )
    }

    /// Note drawn with the emphasized border: the one being dragged or
    /// resized, otherwise the one on top
    pub fn focused_note<'a>(&self, store: &'a NoteStore) -> Option<&'a Note> {
        let active = self
            .controller
            .active_note()
            .or(self.editing.as_ref())
            .and_then(|id| store.get(id));
        active.or_else(|| store.notes().iter().max_by_key(|note| note.z_index))
    }

    /// Show the most recent store notification, if a new one arrived
    pub fn take_notifications(&mut self) {
        if let Some(notification) = self.notifier.latest() {
            self.notifier.clear();
            self.toast = Some(notification);
            self.error = None;
            self.toast_time = Some(Instant::now());
        }
    }

    /// Show an error on the toast line
    pub fn set_error(&mut self, message: impl Into<String>) {
        let message = message.into();
        warn!("{}", message);
        self.error = Some(message);
        self.toast_time = Some(Instant::now());
    }

    /// Clear an expired toast or error
    pub fn check_toast_timeout(&mut self) {
        if let Some(time) = self.toast_time {
            if time.elapsed() > TOAST_DURATION {
                self.toast = None;
                self.error = None;
                self.toast_time = None;
            }
        }
    }

    /// Toggle help overlay
    pub fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
    }

    // ==================== Keyboard ====================

    /// Handle a key press
    pub fn handle_key(&mut self, store: &mut NoteStore, key: KeyEvent) {
        if key.kind != KeyEventKind::Press {
            return;
        }

        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.should_quit = true;
            return;
        }

        if self.show_help {
            self.show_help = false;
            return;
        }

        let result = match self.editing.clone() {
            Some(id) => self.handle_edit_key(store, &id, key),
            None => self.handle_board_key(store, key),
        };
        self.finish(result);
    }

    fn handle_board_key(&mut self, store: &mut NoteStore, key: KeyEvent) -> StoreResult<()> {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

        match key.code {
            // Ctrl+Shift+N arrives as 'N' or, when the terminal drops Shift, as 'n'
            KeyCode::Char('n') | KeyCode::Char('N') if ctrl => {
                store.create(NoteColor::Yellow)?;
            }
            KeyCode::Char(c) if !ctrl => match c {
                'y' => {
                    store.create(NoteColor::Yellow)?;
                }
                'p' => {
                    store.create(NoteColor::Pink)?;
                }
                'g' => {
                    store.create(NoteColor::Green)?;
                }
                'b' => {
                    store.create(NoteColor::Blue)?;
                }
                'd' => self.delete_focused(store)?,
                'C' => {
                    if !store.is_empty() {
                        self.controller.pointer_up();
                        store.clear_all()?;
                    }
                }
                '?' => self.toggle_help(),
                'q' => self.should_quit = true,
                _ => {}
            },
            KeyCode::Delete => self.delete_focused(store)?,
            _ => {}
        }
        Ok(())
    }

    fn delete_focused(&mut self, store: &mut NoteStore) -> StoreResult<()> {
        let Some(id) = self.focused_note(store).map(|note| note.id.clone()) else {
            return Ok(());
        };
        if self.controller.active_note() == Some(&id) {
            self.controller.pointer_up();
        }
        store.delete(&id)?;
        Ok(())
    }

    fn handle_edit_key(
        &mut self,
        store: &mut NoteStore,
        id: &NoteId,
        key: KeyEvent,
    ) -> StoreResult<()> {
        let Some(note) = store.get(id) else {
            self.editing = None;
            return Ok(());
        };
        let mut text = note.text.clone();

        match key.code {
            KeyCode::Esc => {
                self.editing = None;
                return Ok(());
            }
            KeyCode::Enter => text.push('\n'),
            KeyCode::Backspace => {
                if text.pop().is_none() {
                    return Ok(());
                }
            }
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => text.push(c),
            _ => return Ok(()),
        }

        self.controller.text_input(store, id, text)?;
        Ok(())
    }

    // ==================== Mouse ====================

    /// Handle a mouse event
    pub fn handle_mouse(&mut self, store: &mut NoteStore, mouse: MouseEvent) {
        if self.show_help {
            if matches!(mouse.kind, MouseEventKind::Down(_)) {
                self.show_help = false;
            }
            return;
        }

        let result = match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                self.pointer_down(store, mouse.column, mouse.row)
            }
            MouseEventKind::Drag(MouseButton::Left) => {
                let point = self.pointer_point(mouse.column, mouse.row);
                self.controller.pointer_move(store, point)
            }
            MouseEventKind::Up(MouseButton::Left) => {
                self.controller.pointer_up();
                Ok(())
            }
            _ => Ok(()),
        };
        self.finish(result);
    }

    fn pointer_down(&mut self, store: &mut NoteStore, column: u16, row: u16) -> StoreResult<()> {
        let Some(point) = self.board_point(column, row) else {
            return Ok(());
        };
        let Some((id, region)) = topmost_at(store.notes(), point)
            .and_then(|note| hit_test(note, point).map(|region| (note.id.clone(), region)))
        else {
            self.editing = None;
            return Ok(());
        };

        if region == HitRegion::DeleteButton {
            if self.editing.as_ref() == Some(&id) {
                self.editing = None;
            }
            store.delete(&id)?;
            return Ok(());
        }

        self.controller.pointer_down(store, &id, region, point)?;
        self.editing = match region {
            HitRegion::Text => Some(id),
            _ if self.editing.as_ref() == Some(&id) => Some(id),
            _ => None,
        };
        Ok(())
    }

    fn finish(&mut self, result: StoreResult<()>) {
        match result {
            Ok(()) => self.take_notifications(),
            Err(e) => {
                self.take_notifications();
                self.set_error(format_store_error(&e));
            }
        }
    }
}

//! UI rendering for the board

use std::rc::Rc;

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use stickies_core::{Note, NoteColor, NoteStore, Severity};

use super::app::App;
use crate::output::format_toast;

const DELETE_GLYPH: &str = "×";
const RESIZE_GLYPH: &str = "◢";
const CURSOR_GLYPH: &str = "▏";

/// Header, board and toast line
fn layout(area: Rect) -> Rc<[Rect]> {
    Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(area)
}

/// Area notes are drawn in for a terminal of the given size
pub fn board_area(area: Rect) -> Rect {
    layout(area)[1]
}

/// Draw the whole board, returning the area notes were drawn in
pub fn draw(frame: &mut Frame, app: &App, store: &NoteStore) -> Rect {
    let chunks = layout(frame.area());

    draw_header(frame, store, chunks[0]);
    if store.is_empty() {
        draw_welcome(frame, chunks[1]);
    } else {
        draw_notes(frame, app, store, chunks[1]);
    }
    draw_toast_bar(frame, app, chunks[2]);

    if app.show_help {
        draw_help_overlay(frame);
    }

    chunks[1]
}

fn draw_header(frame: &mut Frame, store: &NoteStore, area: Rect) {
    let count = match store.len() {
        1 => "1 note".to_string(),
        n => format!("{} notes", n),
    };

    let line = Line::from(vec![
        Span::styled(" Stickies ", Style::default().add_modifier(Modifier::BOLD)),
        Span::raw(format!(" {}  ", count)),
        Span::styled(
            "Ctrl+Shift+N new · y/p/g/b color · d delete · C clear · ?:help · q:quit",
            Style::default().add_modifier(Modifier::DIM),
        ),
    ]);

    frame.render_widget(Paragraph::new(line), area);
}

fn draw_welcome(frame: &mut Frame, area: Rect) {
    let text = vec![
        Line::from(Span::styled(
            "Welcome to Stickies!",
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from("Press Ctrl+Shift+N (or y, p, g, b) to create your first note."),
        Line::from("Drag a note by its header, resize it from the corner,"),
        Line::from("and click its text to start typing."),
    ];

    let height = (text.len() as u16).min(area.height);
    let top = area.y + area.height.saturating_sub(height) / 2;
    let centered = Rect::new(area.x, top, area.width, height);

    let paragraph = Paragraph::new(text)
        .alignment(Alignment::Center)
        .style(Style::default().add_modifier(Modifier::DIM));
    frame.render_widget(paragraph, centered);
}

/// Draw notes bottom of the stack first, so higher z-indices paint over lower
fn draw_notes(frame: &mut Frame, app: &App, store: &NoteStore, board: Rect) {
    let focused = app.focused_note(store).map(|note| note.id.clone());

    for note in store.stacked() {
        let cells = app.cell.note_cells(note);
        let full = Rect::new(
            board.x.saturating_add(cells.x),
            board.y.saturating_add(cells.y),
            cells.width,
            cells.height,
        );
        let area = full.intersection(board);
        if area.width < 2 || area.height < 2 {
            continue;
        }

        let is_focused = focused.as_ref() == Some(&note.id);
        let is_editing = app.editing.as_ref() == Some(&note.id);
        draw_note(frame, note, area, is_focused, is_editing);

        // Corner glyphs only make sense where the note's real corners are
        if area == full {
            draw_corner_glyphs(frame, area);
        }
    }
}

fn draw_note(frame: &mut Frame, note: &Note, area: Rect, focused: bool, editing: bool) {
    let background = note_background(note.color);
    let base = Style::default().bg(background).fg(Color::Black);

    let (border_type, border_style) = if focused {
        (BorderType::Thick, base.add_modifier(Modifier::BOLD))
    } else {
        (BorderType::Plain, base.fg(Color::DarkGray))
    };

    let block = Block::default()
        .title(Line::from(" Note ").left_aligned())
        .borders(Borders::ALL)
        .border_type(border_type)
        .border_style(border_style)
        .style(base);

    // The second row belongs to the header strip, text starts below it
    let inner = block.inner(area);
    let text_area = Rect {
        y: inner.y.saturating_add(1),
        height: inner.height.saturating_sub(1),
        ..inner
    };

    frame.render_widget(Clear, area);
    frame.render_widget(block, area);

    let mut lines: Vec<Line> = note.text.split('\n').map(Line::from).collect();
    if editing {
        if let Some(last) = lines.last_mut() {
            last.push_span(Span::styled(
                CURSOR_GLYPH,
                Style::default().add_modifier(Modifier::SLOW_BLINK),
            ));
        }
    }
    let paragraph = Paragraph::new(lines)
        .style(base)
        .wrap(Wrap { trim: false });
    frame.render_widget(paragraph, text_area);
}

/// Put the delete glyph on the top-right corner and the resize glyph on the
/// bottom-right corner of a note's border
fn draw_corner_glyphs(frame: &mut Frame, area: Rect) {
    let right = area.right().saturating_sub(1);
    let bottom = area.bottom().saturating_sub(1);
    let buffer = frame.buffer_mut();

    if let Some(cell) = buffer.cell_mut((right, area.y)) {
        cell.set_symbol(DELETE_GLYPH);
    }
    if let Some(cell) = buffer.cell_mut((right, bottom)) {
        cell.set_symbol(RESIZE_GLYPH);
    }
}

fn note_background(color: NoteColor) -> Color {
    match color {
        NoteColor::Yellow => Color::LightYellow,
        NoteColor::Pink => Color::LightMagenta,
        NoteColor::Green => Color::LightGreen,
        NoteColor::Blue => Color::LightBlue,
    }
}

/// Draw the toast line at the bottom
fn draw_toast_bar(frame: &mut Frame, app: &App, area: Rect) {
    let paragraph = if let Some(error) = &app.error {
        Paragraph::new(error.as_str()).style(Style::default().fg(Color::Red))
    } else if let Some(toast) = &app.toast {
        let style = match toast.severity {
            Severity::Default => Style::default().fg(Color::Green),
            Severity::Destructive => Style::default().fg(Color::Red),
        };
        Paragraph::new(format_toast(toast)).style(style)
    } else if app.editing.is_some() {
        Paragraph::new("Editing note text - Esc to stop")
            .style(Style::default().add_modifier(Modifier::DIM))
    } else {
        Paragraph::new("")
    };

    frame.render_widget(paragraph, area);
}

/// Draw help overlay
fn draw_help_overlay(frame: &mut Frame) {
    let area = frame.area();

    let popup_width = 52.min(area.width.saturating_sub(4));
    let popup_height = 20.min(area.height.saturating_sub(4));
    let popup_x = (area.width.saturating_sub(popup_width)) / 2;
    let popup_y = (area.height.saturating_sub(popup_height)) / 2;
    let popup_area = Rect::new(popup_x, popup_y, popup_width, popup_height);

    frame.render_widget(Clear, popup_area);

    let help_text = vec![
        Line::from(vec![Span::styled(
            "Keyboard Shortcuts",
            Style::default().add_modifier(Modifier::BOLD),
        )]),
        Line::from(""),
        Line::from("Notes:"),
        Line::from("  Ctrl+Shift+N   New yellow note (also Ctrl+N)"),
        Line::from("  y/p/g/b        New yellow/pink/green/blue note"),
        Line::from("  d, Delete      Delete the focused note"),
        Line::from("  C              Clear all notes"),
        Line::from(""),
        Line::from("Mouse:"),
        Line::from("  Drag header    Move note"),
        Line::from("  Drag ◢         Resize note"),
        Line::from("  Click ×        Delete note"),
        Line::from("  Click text     Edit text (Esc to stop)"),
        Line::from(""),
        Line::from("  ?              Toggle help"),
        Line::from("  q, Ctrl+C      Quit"),
        Line::from(""),
        Line::from(vec![Span::styled(
            "Press any key to close",
            Style::default().add_modifier(Modifier::DIM),
        )]),
    ];

    let block = Block::default()
        .title(" Help ")
        .borders(Borders::ALL)
        .border_style(Style::default().add_modifier(Modifier::BOLD));

    let paragraph = Paragraph::new(help_text).block(block);
    frame.render_widget(paragraph, popup_area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::{backend::TestBackend, Terminal};
    use stickies_core::{NotePatch, RecordingNotifier, SharedViewport, Viewport};

    use crate::tui::app::CellSize;

    fn render(app: &App, store: &NoteStore) -> String {
        let mut terminal = Terminal::new(TestBackend::new(80, 24)).unwrap();
        terminal
            .draw(|frame| {
                draw(frame, app, store);
            })
            .unwrap();
        let buffer = terminal.backend().buffer();
        buffer
            .content()
            .chunks(buffer.area.width as usize)
            .map(|row| row.iter().map(|cell| cell.symbol()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn setup() -> (App, NoteStore) {
        let viewport = SharedViewport::new(Viewport::new(800, 440));
        let notifier = RecordingNotifier::new();
        let store = NoteStore::in_memory(viewport.clone(), notifier.clone());
        let mut app = App::new(CellSize::new(10, 20), viewport, notifier);
        app.set_board_area(board_area(Rect::new(0, 0, 80, 24)));
        (app, store)
    }

    #[test]
    fn test_board_area_leaves_header_and_toast_rows() {
        assert_eq!(board_area(Rect::new(0, 0, 80, 24)), Rect::new(0, 1, 80, 22));
    }

    #[test]
    fn test_empty_board_shows_welcome() {
        let (app, store) = setup();
        let screen = render(&app, &store);
        assert!(screen.contains("Welcome to Stickies!"));
        assert!(screen.contains("0 notes"));
    }

    #[test]
    fn test_note_drawn_with_text_and_glyphs() {
        let (mut app, mut store) = setup();
        let note = store.create(NoteColor::Pink).unwrap();
        store
            .update(&note.id, &NotePatch::position(0, 0))
            .unwrap();
        store
            .update(&note.id, &NotePatch::text("buy milk"))
            .unwrap();
        app.take_notifications();

        let screen = render(&app, &store);
        let rows: Vec<&str> = screen.lines().collect();

        assert!(rows[0].contains("1 note"));
        assert!(rows[1].contains("Note"));
        assert!(rows[1].contains(DELETE_GLYPH));
        assert!(rows[3].contains("buy milk"));
        // 200px tall note at 20px rows: border rows 1 and 10
        assert!(rows[10].contains(RESIZE_GLYPH));
        assert!(rows[23].contains("Note created!"));
    }
}

//! Note command handlers
//!
//! Every handler resolves its id argument against the store first, so a
//! unique prefix works anywhere a full id does.

use anyhow::{bail, Context, Result};

use stickies_core::{NoteColor, NoteId, NotePatch, NoteStore};

use crate::editor::{confirm, edit_text};
use crate::output::{short_id, Output, OutputFormat};

/// Create a new note
pub fn create(store: &mut NoteStore, color: NoteColor, output: &Output) -> Result<()> {
    let note = store.create(color).context("Failed to create note")?;

    match output.format {
        OutputFormat::Human => println!("ID: {}", note.id),
        OutputFormat::Json | OutputFormat::Quiet => output_note(store, &note.id, output),
    }
    Ok(())
}

/// List all notes, bottom of the stack first
pub fn list(store: &NoteStore, output: &Output) -> Result<()> {
    output.print_notes(&store.stacked());
    Ok(())
}

/// Show a single note
pub fn show(store: &NoteStore, id: &str, output: &Output) -> Result<()> {
    let note_id = parse_note_id(id, store)?;
    output_note(store, &note_id, output);
    Ok(())
}

/// Replace a note's text, opening the editor when no text is given
pub fn edit(
    store: &mut NoteStore,
    id: &str,
    text: Option<String>,
    output: &Output,
) -> Result<()> {
    let note_id = parse_note_id(id, store)?;

    let text = match text {
        Some(text) => text,
        None => {
            let Some(note) = store.get(&note_id) else {
                bail!("No note found matching: {}", id);
            };
            let header = format!("Editing {} ({})", note.id, note.color);
            edit_text(&header, &note.text).context("Failed to edit note")?
        }
    };

    store
        .update(&note_id, &NotePatch::text(text))
        .context("Failed to update note")?;

    output.success(&format!("Updated note {}", note_id));
    Ok(())
}

/// Move a note; the stored position is clamped to the viewport
pub fn move_to(store: &mut NoteStore, id: &str, x: i32, y: i32, output: &Output) -> Result<()> {
    let note_id = parse_note_id(id, store)?;

    store
        .update(&note_id, &NotePatch::position(x, y))
        .context("Failed to move note")?;

    if let Some(note) = store.get(&note_id) {
        output.success(&format!(
            "Moved {} to {}, {}",
            short_id(note),
            note.x,
            note.y
        ));
    }
    Ok(())
}

/// Resize a note; the stored size is clamped to the size bounds
pub fn resize(
    store: &mut NoteStore,
    id: &str,
    width: i32,
    height: i32,
    output: &Output,
) -> Result<()> {
    let note_id = parse_note_id(id, store)?;

    store
        .update(&note_id, &NotePatch::size(width, height))
        .context("Failed to resize note")?;

    if let Some(note) = store.get(&note_id) {
        output.success(&format!(
            "Resized {} to {}x{}",
            short_id(note),
            note.width,
            note.height
        ));
    }
    Ok(())
}

/// Bring a note to the front
pub fn focus(store: &mut NoteStore, id: &str, output: &Output) -> Result<()> {
    let note_id = parse_note_id(id, store)?;

    store.focus(&note_id).context("Failed to focus note")?;

    if let Some(note) = store.get(&note_id) {
        output.success(&format!(
            "Brought {} to front (z-index {})",
            short_id(note),
            note.z_index
        ));
    }
    Ok(())
}

/// Delete a note
pub fn delete(store: &mut NoteStore, id: &str, yes: bool, output: &Output) -> Result<()> {
    let note_id = parse_note_id(id, store)?;

    if output.should_prompt() && !yes {
        if let Some(note) = store.get(&note_id) {
            let preview = note.text.lines().next().unwrap_or("(empty)");
            println!("Delete {} note: {} - {}", note.color, short_id(note), preview);
        }
        if !confirm("Are you sure?")? {
            println!("Cancelled.");
            return Ok(());
        }
    }

    store.delete(&note_id).context("Failed to delete note")?;
    Ok(())
}

/// Delete every note
pub fn clear(store: &mut NoteStore, yes: bool, output: &Output) -> Result<()> {
    if store.is_empty() {
        output.message("No notes to clear.");
        return Ok(());
    }

    if output.should_prompt() && !yes {
        println!("Delete all {} note(s)", store.len());
        if !confirm("Are you sure?")? {
            println!("Cancelled.");
            return Ok(());
        }
    }

    store.clear_all().context("Failed to clear notes")?;
    Ok(())
}

fn output_note(store: &NoteStore, id: &NoteId, output: &Output) {
    if let Some(note) = store.get(id) {
        output.print_note(note);
    }
}

/// Parse a note ID (supports full ID or unique prefix)
fn parse_note_id(id: &str, store: &NoteStore) -> Result<NoteId> {
    let exact = NoteId::from(id);
    if store.get(&exact).is_some() {
        return Ok(exact);
    }

    let matches = store.find_by_prefix(id);

    match matches.len() {
        0 => bail!("No note found matching: {}", id),
        1 => Ok(matches[0].id.clone()),
        _ => {
            eprintln!("Multiple notes match '{}':", id);
            for note in &matches {
                let preview = note.text.lines().next().unwrap_or("");
                eprintln!("  {} - {}", note.id, preview);
            }
            bail!("Ambiguous ID. Please provide more characters.");
        }
    }
}

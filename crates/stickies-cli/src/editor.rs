//! Interactive editing support
//!
//! Opens $EDITOR for editing note text and asks for confirmation before
//! destructive commands.

use anyhow::{bail, Context, Result};
use std::env;
use std::fs;
use std::io::{self, IsTerminal, Write};
use std::process::Command;

/// Delimiters of the header line shown above the text while editing
const COMMENT_PREFIX: &str = "<!--";
const COMMENT_SUFFIX: &str = "-->";

/// Open note text in the user's preferred editor
///
/// Uses $EDITOR, $VISUAL, or falls back to common editors. `header` is shown
/// above the text as a comment and stripped again afterwards.
pub fn edit_text(header: &str, initial_text: &str) -> Result<String> {
    let editor = find_editor()?;

    let temp_path = env::temp_dir().join(format!("stickies_edit_{}.txt", std::process::id()));
    let initial = format!(
        "{} {} {}\n{}",
        COMMENT_PREFIX, header, COMMENT_SUFFIX, initial_text
    );

    fs::write(&temp_path, initial)
        .with_context(|| format!("Failed to create temp file: {:?}", temp_path))?;

    let status = Command::new(&editor)
        .arg(&temp_path)
        .status()
        .with_context(|| format!("Failed to run editor: {}", editor))?;

    if !status.success() {
        let _ = fs::remove_file(&temp_path);
        bail!(
            "Editor '{}' exited with non-zero status. Check that your editor is configured correctly.",
            editor
        );
    }

    let content = fs::read_to_string(&temp_path)
        .with_context(|| format!("Failed to read edited file: {:?}", temp_path))?;
    let _ = fs::remove_file(&temp_path);

    Ok(strip_edit_markup(&content))
}

/// Drop the header line and the single trailing newline editors add on save
///
/// Anything else the user typed, including their own `<!--` lines and
/// trailing spaces, is kept.
fn strip_edit_markup(content: &str) -> String {
    let body = match content.split_once('\n') {
        Some((first, rest)) if is_header(first) => rest,
        None if is_header(content) => "",
        _ => content,
    };
    let body = body
        .strip_suffix("\r\n")
        .or_else(|| body.strip_suffix('\n'))
        .unwrap_or(body);
    body.to_string()
}

fn is_header(line: &str) -> bool {
    let line = line.trim_end_matches('\r');
    line.starts_with(COMMENT_PREFIX) && line.ends_with(COMMENT_SUFFIX)
}

/// Find the user's preferred editor
fn find_editor() -> Result<String> {
    for var in ["EDITOR", "VISUAL"] {
        if let Ok(editor) = env::var(var) {
            if !editor.is_empty() {
                return Ok(editor);
            }
        }
    }

    let common_editors = ["nano", "vim", "vi", "emacs", "notepad"];
    for editor in common_editors {
        if command_exists(editor) {
            return Ok(editor.to_string());
        }
    }

    bail!(
        "No editor found. Set $EDITOR environment variable.\n\
         Example: export EDITOR=nano"
    )
}

/// Check if a command exists in PATH
fn command_exists(cmd: &str) -> bool {
    Command::new("which")
        .arg(cmd)
        .output()
        .map(|o| o.status.success())
        .unwrap_or(false)
}

/// Prompt for confirmation
///
/// Returns true if user confirms, false otherwise.
/// In non-interactive mode (no TTY), returns false.
pub fn confirm(prompt: &str) -> Result<bool> {
    if !io::stdin().is_terminal() {
        return Ok(false);
    }

    print!("{} [y/N] ", prompt);
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;

    let input = input.trim().to_lowercase();
    Ok(input == "y" || input == "yes")
}

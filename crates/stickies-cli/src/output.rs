//! Output formatting for CLI
//!
//! Provides consistent output formatting across all commands:
//! - Human-readable default output
//! - JSON output (--json flag)
//! - Quiet mode for scripting (--quiet flag)

use stickies_core::{Note, Notification, Notifier, Severity, StorageError, StoreError};

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable output (default)
    Human,
    /// JSON output
    Json,
    /// Quiet mode - minimal output
    Quiet,
}

impl OutputFormat {
    /// Create format from CLI flags
    pub fn from_flags(json: bool, quiet: bool) -> Self {
        if quiet {
            OutputFormat::Quiet
        } else if json {
            OutputFormat::Json
        } else {
            OutputFormat::Human
        }
    }
}

/// Output helper for consistent formatting
pub struct Output {
    /// The output format
    pub format: OutputFormat,
}

impl Output {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Print a single note
    pub fn print_note(&self, note: &Note) {
        match self.format {
            OutputFormat::Human => {
                println!("ID:       {}", note.id);
                println!("Color:    {}", note.color);
                println!("Position: {}, {}", note.x, note.y);
                println!("Size:     {} x {}", note.width, note.height);
                println!("Z-index:  {}", note.z_index);
                println!();
                if note.text.is_empty() {
                    println!("(empty)");
                } else {
                    println!("{}", note.text);
                }
            }
            OutputFormat::Json => print_json(note),
            OutputFormat::Quiet => {
                println!("{}", note.id);
            }
        }
    }

    /// Print a list of notes
    pub fn print_notes(&self, notes: &[&Note]) {
        match self.format {
            OutputFormat::Human => {
                if notes.is_empty() {
                    println!("No notes yet. Create one with `stickies create`.");
                    return;
                }
                for note in notes {
                    println!(
                        "{} | {:<6} | {:>4},{:<4} | {}x{} | {}",
                        short_id(note),
                        note.color.as_str(),
                        note.x,
                        note.y,
                        note.width,
                        note.height,
                        truncate_line(&note.text, 40)
                    );
                }
                println!("\n{} note(s)", notes.len());
            }
            OutputFormat::Json => print_json(&notes),
            OutputFormat::Quiet => {
                for note in notes {
                    println!("{}", note.id);
                }
            }
        }
    }

    /// Print a success message
    pub fn success(&self, message: &str) {
        match self.format {
            OutputFormat::Human => println!("✓ {}", message),
            OutputFormat::Json => {
                println!(
                    "{}",
                    serde_json::json!({"status": "success", "message": message})
                );
            }
            OutputFormat::Quiet => {}
        }
    }

    /// Check if we should prompt for confirmation
    pub fn should_prompt(&self) -> bool {
        self.format == OutputFormat::Human
    }

    /// Print an informational message
    pub fn message(&self, msg: &str) {
        match self.format {
            OutputFormat::Human => println!("{}", msg),
            OutputFormat::Json => {
                println!("{}", serde_json::json!({"message": msg}));
            }
            OutputFormat::Quiet => {}
        }
    }
}

/// Prints store notifications as they happen
pub struct ToastPrinter {
    format: OutputFormat,
}

impl ToastPrinter {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }
}

impl Notifier for ToastPrinter {
    fn notify(&self, notification: Notification) {
        match self.format {
            OutputFormat::Human => println!("{}", format_toast(&notification)),
            OutputFormat::Json => print_json(&notification),
            OutputFormat::Quiet => {}
        }
    }
}

/// One-line human rendering of a notification
pub fn format_toast(notification: &Notification) -> String {
    let mark = match notification.severity {
        Severity::Default => "✓",
        Severity::Destructive => "✗",
    };
    format!(
        "{} {}: {}",
        mark, notification.title, notification.description
    )
}

/// One-line rendering of a failed store write, with a hint when there is one
pub fn format_store_error(error: &StoreError) -> String {
    let message = format!("Error: {}", error);
    match error.recovery_suggestion() {
        Some(suggestion) if !message.contains(suggestion) => format!("{} {}", message, suggestion),
        _ => message,
    }
}

/// Recovery suggestion for the first storage failure in an error chain
pub fn recovery_hint(error: &anyhow::Error) -> Option<&'static str> {
    error.chain().find_map(|cause| {
        if let Some(e) = cause.downcast_ref::<StoreError>() {
            e.recovery_suggestion()
        } else {
            cause
                .downcast_ref::<StorageError>()
                .and_then(StorageError::recovery_suggestion)
        }
    })
}

/// Id cut down to its timestamp and the start of the random suffix
pub fn short_id(note: &Note) -> &str {
    let id = note.id.as_str();
    let end = id
        .char_indices()
        .nth(SHORT_ID_LEN)
        .map(|(index, _)| index)
        .unwrap_or(id.len());
    &id[..end]
}

const SHORT_ID_LEN: usize = 22;

fn print_json<T: serde::Serialize + ?Sized>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("Failed to serialize output: {}", e),
    }
}

/// Truncate a string to max length, adding "..." if truncated
fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

/// Truncate to first line and max length
fn truncate_line(s: &str, max_len: usize) -> String {
    let first_line = s.lines().next().unwrap_or("");
    truncate(first_line, max_len)
}

#[cfg(test)]
mod tests {
    use super::*;
    use stickies_core::{NoteColor, NoteId};

    #[test]
    fn test_format_from_flags() {
        assert_eq!(OutputFormat::from_flags(false, false), OutputFormat::Human);
        assert_eq!(OutputFormat::from_flags(true, false), OutputFormat::Json);
        assert_eq!(OutputFormat::from_flags(false, true), OutputFormat::Quiet);
        // Quiet takes precedence
        assert_eq!(OutputFormat::from_flags(true, true), OutputFormat::Quiet);
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("this is a long string", 10), "this is...");
        // Multi-byte characters are never split
        assert_eq!(truncate("ééééééééééé", 5), "éé...");
    }

    #[test]
    fn test_truncate_line() {
        assert_eq!(truncate_line("single line", 20), "single line");
        assert_eq!(truncate_line("line one\nline two", 20), "line one");
        assert_eq!(truncate_line("", 20), "");
    }

    #[test]
    fn test_format_toast() {
        let created = Notification::new("Note created!", "New pink sticky note added.");
        assert_eq!(
            format_toast(&created),
            "✓ Note created!: New pink sticky note added."
        );

        let deleted = Notification::destructive("Note deleted", "Sticky note removed.");
        assert_eq!(format_toast(&deleted), "✗ Note deleted: Sticky note removed.");
    }

    #[test]
    fn test_format_store_error() {
        let err = StoreError::from(StorageError::PermissionDenied {
            path: "/data/kv".into(),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        });
        let message = format_store_error(&err);
        assert!(message.starts_with("Error: Failed to persist notes"));
        assert!(message.ends_with("change ownership."));

        let err = StoreError::from(StorageError::InvalidKey {
            key: "a/b".to_string(),
        });
        assert!(!format_store_error(&err).ends_with("change ownership."));
    }

    #[test]
    fn test_recovery_hint_found_under_context() {
        use anyhow::Context;

        let failed: Result<(), StoreError> = Err(StorageError::DiskFull {
            path: "/data".into(),
            source: std::io::Error::new(std::io::ErrorKind::Other, "No space left on device"),
        }
        .into());
        let err = failed.context("Failed to create note").unwrap_err();
        assert_eq!(recovery_hint(&err), Some("Free up disk space and try again."));

        let err = anyhow::anyhow!("Note not found: abc");
        assert_eq!(recovery_hint(&err), None);
    }

    #[test]
    fn test_short_id() {
        let mut note = Note::new(NoteColor::Blue, 0, 0, 1001);
        note.id = NoteId::from("note-1700000000000-abc123xyz");
        assert_eq!(short_id(&note), "note-1700000000000-abc");

        note.id = NoteId::from("n1");
        assert_eq!(short_id(&note), "n1");
    }
}

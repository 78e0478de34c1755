//! User-facing notifications
//!
//! The store reports "note created", "note deleted" and "all notes cleared"
//! through a [`Notifier`]. Rendering the message is up to the front end.

use std::cell::RefCell;
use std::rc::Rc;

use serde::Serialize;

/// How a notification should be presented
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    #[default]
    Default,
    Destructive,
}

/// A toast-style message
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub title: String,
    pub description: String,
    pub severity: Severity,
}

impl Notification {
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            severity: Severity::Default,
        }
    }

    pub fn destructive(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            severity: Severity::Destructive,
        }
    }
}

/// Presentation collaborator for notifications
pub trait Notifier {
    fn notify(&self, notification: Notification);
}

/// Discards every notification
#[derive(Debug, Clone, Copy, Default)]
pub struct NullNotifier;

impl Notifier for NullNotifier {
    fn notify(&self, _notification: Notification) {}
}

/// Keeps every notification in order
///
/// Clones share the same log, so one handle can go to the store while
/// another is read by the UI.
#[derive(Debug, Clone, Default)]
pub struct RecordingNotifier {
    log: Rc<RefCell<Vec<Notification>>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// All notifications received so far
    pub fn notifications(&self) -> Vec<Notification> {
        self.log.borrow().clone()
    }

    /// Most recent notification
    pub fn latest(&self) -> Option<Notification> {
        self.log.borrow().last().cloned()
    }

    pub fn clear(&self) {
        self.log.borrow_mut().clear();
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notification: Notification) {
        self.log.borrow_mut().push(notification);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording_notifier_shares_log_between_clones() {
        let notifier = RecordingNotifier::new();
        let handle = notifier.clone();

        notifier.notify(Notification::new("Note created!", "New yellow sticky note added."));
        notifier.notify(Notification::destructive("Note deleted", "Sticky note removed."));

        assert_eq!(handle.notifications().len(), 2);
        let latest = handle.latest().unwrap();
        assert_eq!(latest.title, "Note deleted");
        assert_eq!(latest.severity, Severity::Destructive);

        handle.clear();
        assert!(notifier.latest().is_none());
    }

    #[test]
    fn test_severity_serialization() {
        let json = serde_json::to_value(Notification::destructive("a", "b")).unwrap();
        assert_eq!(json["severity"], "destructive");
    }
}

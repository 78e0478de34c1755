//! Pointer interaction
//!
//! Turns pointer down / move / up sequences into geometry updates on one note
//! at a time. A pointer-down on a note's body starts a drag session, on its
//! resize handle a resize session. The session holds everything the moves
//! need and is consumed on pointer-up; with no session, moves do nothing.
//!
//! Text input bypasses sessions entirely.

use tracing::debug;

use crate::geometry::{clamp_position, clamp_size, HitRegion, Point};
use crate::models::{NoteId, NotePatch};
use crate::store::{NoteStore, StoreResult};

/// What an active session does with pointer movement
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InteractionMode {
    /// Moving the note; `offset` is the pointer position relative to the
    /// note's top-left corner at pointer-down
    Dragging { offset: Point },
    /// Resizing from the bottom-right corner
    Resizing {
        start: Point,
        start_width: i32,
        start_height: i32,
    },
}

/// A drag or resize in progress
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InteractionSession {
    pub note_id: NoteId,
    pub mode: InteractionMode,
}

/// Pointer state machine shared by all notes
///
/// At most one session exists at a time, so only one note is ever dragged
/// or resized.
#[derive(Debug, Default)]
pub struct InteractionController {
    session: Option<InteractionSession>,
}

impl InteractionController {
    pub fn new() -> Self {
        Self::default()
    }

    /// The active session, if any
    pub fn session(&self) -> Option<&InteractionSession> {
        self.session.as_ref()
    }

    pub fn is_active(&self) -> bool {
        self.session.is_some()
    }

    /// Note being dragged or resized
    pub fn active_note(&self) -> Option<&NoteId> {
        self.session.as_ref().map(|session| &session.note_id)
    }

    /// Handle a pointer-down on `region` of the note with `id`
    ///
    /// The note is raised to the top for every region except the delete
    /// button. Returns whether a drag or resize session started. A session
    /// left over from a missed pointer-up is replaced.
    pub fn pointer_down(
        &mut self,
        store: &mut NoteStore,
        id: &NoteId,
        region: HitRegion,
        point: Point,
    ) -> StoreResult<bool> {
        if region == HitRegion::DeleteButton {
            return Ok(false);
        }

        if !store.focus(id)? {
            return Ok(false);
        }
        let Some(note) = store.get(id) else {
            return Ok(false);
        };

        let mode = match region {
            HitRegion::Body => InteractionMode::Dragging {
                offset: Point::new(point.x - note.x, point.y - note.y),
            },
            HitRegion::ResizeHandle => InteractionMode::Resizing {
                start: point,
                start_width: note.width,
                start_height: note.height,
            },
            HitRegion::Text | HitRegion::DeleteButton => return Ok(false),
        };

        debug!(%id, ?mode, "interaction started");
        self.session = Some(InteractionSession {
            note_id: id.clone(),
            mode,
        });
        Ok(true)
    }

    /// Handle pointer movement; a no-op without a session
    pub fn pointer_move(&mut self, store: &mut NoteStore, point: Point) -> StoreResult<()> {
        let Some(session) = &self.session else {
            return Ok(());
        };

        let patch = match session.mode {
            InteractionMode::Dragging { offset } => {
                let Some(note) = store.get(&session.note_id) else {
                    return Ok(());
                };
                let (x, y) = clamp_position(
                    point.x - offset.x,
                    point.y - offset.y,
                    note.width,
                    note.height,
                    store.viewport(),
                );
                NotePatch::position(x, y)
            }
            InteractionMode::Resizing {
                start,
                start_width,
                start_height,
            } => {
                let (width, height) = clamp_size(
                    start_width + (point.x - start.x),
                    start_height + (point.y - start.y),
                );
                NotePatch::size(width, height)
            }
        };

        store.update(&session.note_id, &patch)?;
        Ok(())
    }

    /// End the current session, returning it
    pub fn pointer_up(&mut self) -> Option<InteractionSession> {
        let session = self.session.take();
        if let Some(ref session) = session {
            debug!(id = %session.note_id, "interaction ended");
        }
        session
    }

    /// Replace the text of a note; never touches the session
    pub fn text_input(
        &self,
        store: &mut NoteStore,
        id: &NoteId,
        text: impl Into<String>,
    ) -> StoreResult<bool> {
        store.update(id, &NotePatch::text(text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Viewport;
    use crate::models::{Note, NoteColor};
    use crate::notify::NullNotifier;
    use crate::storage::MemoryStorage;
    use crate::store::STORAGE_KEY;

    /// Store on a 1024x768 viewport holding one 250x200 note at (100, 100)
    fn store_with_note() -> (NoteStore, NoteId) {
        let note = Note {
            id: NoteId::from("note-1-drag"),
            text: String::new(),
            x: 100,
            y: 100,
            width: 250,
            height: 200,
            color: NoteColor::Yellow,
            z_index: 1001,
        };
        let payload = serde_json::to_string(&vec![note.clone()]).unwrap();
        let store = NoteStore::open(
            MemoryStorage::with_value(STORAGE_KEY, payload),
            Viewport::new(1024, 768),
            NullNotifier,
        );
        (store, note.id)
    }

    #[test]
    fn test_drag_moves_by_pointer_delta() {
        let (mut store, id) = store_with_note();
        let mut controller = InteractionController::new();

        assert!(controller
            .pointer_down(&mut store, &id, HitRegion::Body, Point::new(110, 105))
            .unwrap());
        controller
            .pointer_move(&mut store, Point::new(210, 155))
            .unwrap();

        let note = store.get(&id).unwrap();
        assert_eq!((note.x, note.y), (200, 150));
    }

    #[test]
    fn test_drag_clamps_to_viewport() {
        let (mut store, id) = store_with_note();
        let mut controller = InteractionController::new();

        controller
            .pointer_down(&mut store, &id, HitRegion::Body, Point::new(100, 100))
            .unwrap();
        controller
            .pointer_move(&mut store, Point::new(2100, 100))
            .unwrap();

        let note = store.get(&id).unwrap();
        assert_eq!(note.x, 1024 - 250);

        controller
            .pointer_move(&mut store, Point::new(-500, -500))
            .unwrap();
        let note = store.get(&id).unwrap();
        assert_eq!((note.x, note.y), (0, 0));
    }

    #[test]
    fn test_resize_follows_delta_within_bounds() {
        let (mut store, id) = store_with_note();
        let mut controller = InteractionController::new();

        assert!(controller
            .pointer_down(&mut store, &id, HitRegion::ResizeHandle, Point::new(345, 295))
            .unwrap());

        controller
            .pointer_move(&mut store, Point::new(375, 315))
            .unwrap();
        let note = store.get(&id).unwrap();
        assert_eq!((note.width, note.height), (280, 220));

        controller
            .pointer_move(&mut store, Point::new(1000, 1000))
            .unwrap();
        let note = store.get(&id).unwrap();
        assert_eq!((note.width, note.height), (400, 300));

        controller
            .pointer_move(&mut store, Point::new(0, 0))
            .unwrap();
        let note = store.get(&id).unwrap();
        assert_eq!((note.width, note.height), (200, 150));
    }

    #[test]
    fn test_pointer_up_ends_session() {
        let (mut store, id) = store_with_note();
        let mut controller = InteractionController::new();

        controller
            .pointer_down(&mut store, &id, HitRegion::Body, Point::new(100, 100))
            .unwrap();
        let session = controller.pointer_up().unwrap();
        assert_eq!(session.note_id, id);
        assert!(!controller.is_active());

        controller
            .pointer_move(&mut store, Point::new(500, 500))
            .unwrap();
        let note = store.get(&id).unwrap();
        assert_eq!((note.x, note.y), (100, 100));
        assert!(controller.pointer_up().is_none());
    }

    #[test]
    fn test_text_region_focuses_without_dragging() {
        let (mut store, id) = store_with_note();
        let mut controller = InteractionController::new();
        let before = store.highest_z_index();

        let started = controller
            .pointer_down(&mut store, &id, HitRegion::Text, Point::new(150, 200))
            .unwrap();

        assert!(!started);
        assert!(!controller.is_active());
        assert_eq!(store.get(&id).unwrap().z_index, before + 1);
    }

    #[test]
    fn test_pointer_down_focuses_note() {
        let (mut store, id) = store_with_note();
        let other = store.create(NoteColor::Pink).unwrap();
        let mut controller = InteractionController::new();

        controller
            .pointer_down(&mut store, &id, HitRegion::ResizeHandle, Point::new(345, 295))
            .unwrap();

        assert!(store.get(&id).unwrap().z_index > store.get(&other.id).unwrap().z_index);
        assert_eq!(controller.active_note(), Some(&id));
    }

    #[test]
    fn test_delete_button_is_ignored() {
        let (mut store, id) = store_with_note();
        let mut controller = InteractionController::new();
        let before = store.highest_z_index();

        assert!(!controller
            .pointer_down(&mut store, &id, HitRegion::DeleteButton, Point::new(345, 105))
            .unwrap());
        assert_eq!(store.highest_z_index(), before);
    }

    #[test]
    fn test_unknown_note_starts_nothing() {
        let (mut store, _) = store_with_note();
        let mut controller = InteractionController::new();

        assert!(!controller
            .pointer_down(
                &mut store,
                &NoteId::from("missing"),
                HitRegion::Body,
                Point::new(0, 0)
            )
            .unwrap());
        assert!(controller.session().is_none());
    }

    #[test]
    fn test_new_pointer_down_replaces_session() {
        let (mut store, id) = store_with_note();
        let other = store.create(NoteColor::Blue).unwrap();
        let mut controller = InteractionController::new();

        controller
            .pointer_down(&mut store, &id, HitRegion::Body, Point::new(100, 100))
            .unwrap();
        controller
            .pointer_down(
                &mut store,
                &other.id,
                HitRegion::Body,
                Point::new(other.x, other.y),
            )
            .unwrap();

        assert_eq!(controller.active_note(), Some(&other.id));
        controller
            .pointer_move(&mut store, Point::new(other.x + 5, other.y + 5))
            .unwrap();
        let original = store.get(&id).unwrap();
        assert_eq!((original.x, original.y), (100, 100));
    }

    #[test]
    fn test_text_input_does_not_touch_session() {
        let (mut store, id) = store_with_note();
        let mut controller = InteractionController::new();
        controller
            .pointer_down(&mut store, &id, HitRegion::Body, Point::new(100, 100))
            .unwrap();

        assert!(controller.text_input(&mut store, &id, "remember").unwrap());

        assert_eq!(store.get(&id).unwrap().text, "remember");
        assert!(controller.is_active());
    }
}

//! Note store
//!
//! The `NoteStore` is the only thing that mutates the note collection and the
//! z-order counter. Every successful mutation:
//! - runs registered listeners with the new collection (re-render hook)
//! - writes the whole collection as JSON under a fixed storage key
//!
//! ## Loading
//!
//! Opening never fails. A missing key gives an empty board; a payload that
//! cannot be parsed (or is not UTF-8) is logged, copied aside under a backup
//! key, and the board starts empty. Restored notes are clamped into the size
//! bounds, the viewport and the z-index range.
//!
//! ## Usage
//!
//! ```ignore
//! let mut store = NoteStore::open(storage, Viewport::new(1280, 800), NullNotifier);
//!
//! let note = store.create(NoteColor::Pink)?;
//! store.update(&note.id, &NotePatch::text("call back"))?;
//! store.focus(&note.id)?;
//! ```

use std::collections::HashSet;

use rand::Rng;
use thiserror::Error;
use tracing::{debug, error, info, warn};

use crate::geometry::{clamp_note, clamp_patch, placement_range, Viewport, ViewportProvider};
use crate::models::{
    Note, NoteColor, NoteId, NotePatch, DEFAULT_HEIGHT, DEFAULT_WIDTH, Z_INDEX_FLOOR,
};
use crate::notify::{Notification, Notifier};
use crate::storage::{KeyValueStorage, MemoryStorage, StorageError};

/// Storage key holding the serialized collection
pub const STORAGE_KEY: &str = "sticky-notes";

/// Storage key an unreadable payload is copied to before it gets overwritten
pub const CORRUPT_BACKUP_KEY: &str = "sticky-notes.corrupt";

/// Errors from store mutations
///
/// These only come from persisting. The in-memory collection has already
/// been updated when one is returned.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Failed to persist notes: {0}")]
    Storage(#[from] StorageError),

    #[error("Failed to serialize notes: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl StoreError {
    /// What the user can do about the failure, if anything
    pub fn recovery_suggestion(&self) -> Option<&'static str> {
        match self {
            StoreError::Storage(e) => e.recovery_suggestion(),
            StoreError::Serialize(_) => None,
        }
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Handle returned by [`NoteStore::subscribe`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Listener = Box<dyn FnMut(&[Note])>;

/// Owned note collection with durable storage
pub struct NoteStore {
    notes: Vec<Note>,
    /// Highest z-index ever handed out; only grows
    highest_z_index: i64,
    storage: Box<dyn KeyValueStorage>,
    viewport: Box<dyn ViewportProvider>,
    notifier: Box<dyn Notifier>,
    listeners: Vec<(SubscriptionId, Listener)>,
    next_subscription: u64,
}

impl NoteStore {
    /// Open the store, loading whatever the storage holds
    pub fn open(
        storage: impl KeyValueStorage + 'static,
        viewport: impl ViewportProvider + 'static,
        notifier: impl Notifier + 'static,
    ) -> Self {
        let mut storage: Box<dyn KeyValueStorage> = Box::new(storage);
        let notes = load_notes(storage.as_mut(), viewport.viewport());
        let highest_z_index = notes
            .iter()
            .map(|note| note.z_index)
            .fold(Z_INDEX_FLOOR, i64::max);

        info!(
            notes = notes.len(),
            highest_z_index, "loaded notes from storage"
        );

        Self {
            notes,
            highest_z_index,
            storage,
            viewport: Box::new(viewport),
            notifier: Box::new(notifier),
            listeners: Vec::new(),
            next_subscription: 0,
        }
    }

    /// Open an empty store over non-durable storage
    pub fn in_memory(
        viewport: impl ViewportProvider + 'static,
        notifier: impl Notifier + 'static,
    ) -> Self {
        Self::open(MemoryStorage::new(), viewport, notifier)
    }

    // ==================== Queries ====================

    /// All notes, in creation order
    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    /// All notes from bottom to top of the stack
    pub fn stacked(&self) -> Vec<&Note> {
        let mut notes: Vec<&Note> = self.notes.iter().collect();
        notes.sort_by_key(|note| note.z_index);
        notes
    }

    pub fn get(&self, id: &NoteId) -> Option<&Note> {
        self.notes.iter().find(|note| note.id == *id)
    }

    /// Notes whose id starts with `prefix`
    pub fn find_by_prefix(&self, prefix: &str) -> Vec<&Note> {
        self.notes
            .iter()
            .filter(|note| note.id.starts_with(prefix))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.notes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    /// Current value of the z-order counter
    pub fn highest_z_index(&self) -> i64 {
        self.highest_z_index
    }

    /// Viewport the store clamps against right now
    pub fn viewport(&self) -> Viewport {
        self.viewport.viewport()
    }

    /// The underlying storage
    pub fn storage(&self) -> &dyn KeyValueStorage {
        self.storage.as_ref()
    }

    /// Give the storage back, dropping the in-memory state
    pub fn into_storage(self) -> Box<dyn KeyValueStorage> {
        self.storage
    }

    // ==================== Mutations ====================

    /// Create a note of the given color at a random on-screen position
    pub fn create(&mut self, color: NoteColor) -> StoreResult<Note> {
        self.create_with_rng(color, &mut rand::thread_rng())
    }

    /// Create a note, drawing its position from `rng`
    pub fn create_with_rng<R: Rng + ?Sized>(
        &mut self,
        color: NoteColor,
        rng: &mut R,
    ) -> StoreResult<Note> {
        let (xs, ys) = placement_range(self.viewport.viewport(), DEFAULT_WIDTH, DEFAULT_HEIGHT);
        let x = rng.gen_range(xs);
        let y = rng.gen_range(ys);

        let z_index = self.highest_z_index.saturating_add(1);
        let mut note = Note::new(color, x, y, z_index);
        while self.get(&note.id).is_some() {
            note.id = NoteId::generate();
        }

        self.highest_z_index = z_index;
        self.notes.push(note.clone());
        debug!(id = %note.id, %color, x, y, z_index, "created note");

        self.commit()?;
        self.notifier.notify(Notification::new(
            "Note created!",
            format!("New {} sticky note added.", color),
        ));
        Ok(note)
    }

    /// Merge `patch` into the note with `id`
    ///
    /// Geometry is clamped to the size bounds and the current viewport.
    /// Returns `false` (and writes nothing) when no note has that id.
    pub fn update(&mut self, id: &NoteId, patch: &NotePatch) -> StoreResult<bool> {
        let viewport = self.viewport.viewport();
        let Some(note) = self.notes.iter_mut().find(|note| note.id == *id) else {
            debug!(%id, "update ignored, note not found");
            return Ok(false);
        };

        let patch = clamp_patch(note, patch, viewport);
        note.apply(&patch);

        if let Some(z_index) = patch.z_index {
            self.highest_z_index = self.highest_z_index.max(z_index);
        }

        self.commit()?;
        Ok(true)
    }

    /// Remove the note with `id`; `false` if there was none
    pub fn delete(&mut self, id: &NoteId) -> StoreResult<bool> {
        let Some(index) = self.notes.iter().position(|note| note.id == *id) else {
            debug!(%id, "delete ignored, note not found");
            return Ok(false);
        };

        self.notes.remove(index);
        debug!(%id, "deleted note");

        self.commit()?;
        self.notifier.notify(Notification::destructive(
            "Note deleted",
            "Sticky note removed.",
        ));
        Ok(true)
    }

    /// Raise the note with `id` above every other note
    pub fn focus(&mut self, id: &NoteId) -> StoreResult<bool> {
        let Some(note) = self.notes.iter_mut().find(|note| note.id == *id) else {
            return Ok(false);
        };

        self.highest_z_index = self.highest_z_index.saturating_add(1);
        note.z_index = self.highest_z_index;

        self.commit()?;
        Ok(true)
    }

    /// Remove every note
    ///
    /// The z-order counter is kept, so notes created afterwards still stack
    /// above anything ever handed out before.
    pub fn clear_all(&mut self) -> StoreResult<()> {
        let removed = self.notes.len();
        self.notes.clear();
        debug!(removed, "cleared all notes");

        self.commit()?;
        self.notifier.notify(Notification::destructive(
            "All notes cleared",
            "All sticky notes have been removed.",
        ));
        Ok(())
    }

    // ==================== Subscriptions ====================

    /// Call `listener` with the full collection after every mutation
    pub fn subscribe<F>(&mut self, listener: F) -> SubscriptionId
    where
        F: FnMut(&[Note]) + 'static,
    {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Stop calling a listener; `false` if it was already gone
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(listener_id, _)| *listener_id != id);
        self.listeners.len() != before
    }

    /// Notify listeners and persist the whole collection
    fn commit(&mut self) -> StoreResult<()> {
        for (_, listener) in self.listeners.iter_mut() {
            listener(self.notes.as_slice());
        }

        let payload = serialize_notes(&self.notes)?;
        self.storage.set(STORAGE_KEY, &payload)?;
        Ok(())
    }
}

/// Serialize a collection to the stored JSON form
pub fn serialize_notes(notes: &[Note]) -> serde_json::Result<String> {
    serde_json::to_string(notes)
}

/// Parse the stored JSON form
pub fn deserialize_notes(payload: &str) -> serde_json::Result<Vec<Note>> {
    serde_json::from_str(payload)
}

/// Copy an unreadable payload aside so the next write cannot destroy it
fn back_up_unreadable(storage: &mut dyn KeyValueStorage, payload: &str) {
    match storage.set(CORRUPT_BACKUP_KEY, payload) {
        Ok(()) => warn!(key = CORRUPT_BACKUP_KEY, "unreadable notes backed up"),
        Err(e) => warn!(error = %e, "could not back up unreadable notes"),
    }
}

/// Read the collection, falling back to empty on any failure
///
/// Restored notes are clamped into the size bounds, the viewport and the
/// z-index range before the store sees them.
fn load_notes(storage: &mut dyn KeyValueStorage, viewport: Viewport) -> Vec<Note> {
    let payload = match storage.get(STORAGE_KEY) {
        Ok(Some(payload)) => payload,
        Ok(None) => return Vec::new(),
        Err(StorageError::InvalidData { path, lossy }) => {
            error!(path = %path.display(), "stored notes are not valid UTF-8, starting empty");
            back_up_unreadable(storage, &lossy);
            return Vec::new();
        }
        Err(e) => {
            error!(error = %e, "failed to read notes from storage, starting empty");
            return Vec::new();
        }
    };

    let notes = match deserialize_notes(&payload) {
        Ok(notes) => notes,
        Err(e) => {
            error!(error = %e, "failed to load notes, starting empty");
            back_up_unreadable(storage, &payload);
            return Vec::new();
        }
    };

    let mut seen = HashSet::new();
    let before = notes.len();
    let mut notes: Vec<Note> = notes
        .into_iter()
        .filter(|note| seen.insert(note.id.clone()))
        .collect();
    if notes.len() != before {
        warn!(
            dropped = before - notes.len(),
            "dropped notes with duplicate ids"
        );
    }

    for note in notes.iter_mut() {
        let original = (note.x, note.y, note.width, note.height, note.z_index);
        if clamp_note(note, viewport) {
            warn!(
                id = %note.id,
                ?original,
                x = note.x,
                y = note.y,
                width = note.width,
                height = note.height,
                z_index = note.z_index,
                "clamped out-of-range note on load"
            );
        }
    }
    notes
}

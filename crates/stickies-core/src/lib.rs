//! Stickies Core Library
//!
//! This crate provides the core functionality for Stickies: colored note
//! cards that can be dragged, resized and edited, and that survive restarts
//! through a local key-value store.
//!
//! # Architecture
//!
//! - **NoteStore**: sole owner of the note collection and the z-order counter
//! - **InteractionController**: pointer drag / resize state machine
//! - **KeyValueStorage**: durable backend the store writes the collection to
//!
//! # Quick Start
//!
//! ```text
//! let config = Config::load()?;
//! let storage = open_storage(&config)?;
//! let mut store = NoteStore::open(storage, config.viewport(), NullNotifier);
//!
//! let note = store.create(NoteColor::Yellow)?;
//! store.update(&note.id, &NotePatch::text("Stand-up at 10"))?;
//! ```
//!
//! # Modules
//!
//! - `store`: Note collection, persistence and notifications (main entry point)
//! - `interaction`: Drag and resize sessions
//! - `geometry`: Clamping, placement and hit testing
//! - `models`: Note, color and patch types
//! - `notify`: Notification collaborator
//! - `storage`: Key-value backends
//! - `config`: Application configuration

pub mod config;
pub mod geometry;
pub mod interaction;
pub mod models;
pub mod notify;
pub mod storage;
pub mod store;

pub use config::{Config, StorageBackend};
pub use geometry::{HitRegion, Point, SharedViewport, Viewport, ViewportProvider};
pub use interaction::{InteractionController, InteractionMode, InteractionSession};
pub use models::{Note, NoteColor, NoteId, NotePatch};
pub use notify::{Notification, Notifier, NullNotifier, RecordingNotifier, Severity};
pub use storage::{open_storage, KeyValueStorage, StorageError};
pub use store::{NoteStore, StoreError, StoreResult};

//! Viewport geometry
//!
//! Every bound a note must respect lives here: size limits, keeping a note
//! inside the viewport, where new notes may be placed, and which part of a
//! note a pointer lands on. Creation, dragging, resizing and the store all
//! clamp through these functions.

use std::cell::Cell;
use std::ops::RangeInclusive;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::models::{
    Note, NotePatch, MAX_HEIGHT, MAX_WIDTH, MIN_HEIGHT, MIN_WIDTH, PLACEMENT_OFFSET_X,
    PLACEMENT_OFFSET_Y, Z_INDEX_CEILING,
};

/// Height of the header strip (title and delete button)
pub const HEADER_HEIGHT: i32 = 40;
/// Width of the delete button at the right end of the header
pub const DELETE_BUTTON_WIDTH: i32 = 24;
/// Side length of the square resize handle in the bottom-right corner
pub const RESIZE_HANDLE_SIZE: i32 = 16;

/// Visible area notes live in, in pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: i32,
    pub height: i32,
}

impl Viewport {
    pub fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }
}

/// Source of the current viewport size
///
/// The store asks on every placement and clamp, so a provider that tracks
/// window (or terminal) resizes keeps bounds current.
pub trait ViewportProvider {
    fn viewport(&self) -> Viewport;
}

impl ViewportProvider for Viewport {
    fn viewport(&self) -> Viewport {
        *self
    }
}

/// Viewport handle that can be resized after the store was built
///
/// Clones share the same size.
#[derive(Debug, Clone)]
pub struct SharedViewport(Rc<Cell<Viewport>>);

impl SharedViewport {
    pub fn new(viewport: Viewport) -> Self {
        Self(Rc::new(Cell::new(viewport)))
    }

    pub fn set(&self, viewport: Viewport) {
        self.0.set(viewport);
    }
}

impl ViewportProvider for SharedViewport {
    fn viewport(&self) -> Viewport {
        self.0.get()
    }
}

/// A pointer position, in pixels
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Clamp a size into the allowed note dimensions
pub fn clamp_size(width: i32, height: i32) -> (i32, i32) {
    (
        width.clamp(MIN_WIDTH, MAX_WIDTH),
        height.clamp(MIN_HEIGHT, MAX_HEIGHT),
    )
}

/// Clamp a single axis so `[value, value + size]` stays inside `[0, limit]`
///
/// When the note is larger than the viewport the axis is pinned to 0.
pub fn clamp_axis(value: i32, size: i32, limit: i32) -> i32 {
    value.min(limit.saturating_sub(size)).max(0)
}

/// Clamp a position so a note of the given size stays fully in the viewport
pub fn clamp_position(x: i32, y: i32, width: i32, height: i32, viewport: Viewport) -> (i32, i32) {
    (
        clamp_axis(x, width, viewport.width),
        clamp_axis(y, height, viewport.height),
    )
}

/// Pull a restored note back inside the size bounds, the viewport and the
/// z-index range; `true` when anything changed
pub fn clamp_note(note: &mut Note, viewport: Viewport) -> bool {
    let before = (note.x, note.y, note.width, note.height, note.z_index);

    let (width, height) = clamp_size(note.width, note.height);
    let (x, y) = clamp_position(note.x, note.y, width, height, viewport);
    note.x = x;
    note.y = y;
    note.width = width;
    note.height = height;
    note.z_index = note.z_index.clamp(0, Z_INDEX_CEILING);

    before != (note.x, note.y, note.width, note.height, note.z_index)
}

/// Clamp the geometry carried by a patch against the note it will apply to
///
/// Size fields are limited to the size bounds. Whenever the patch moves or
/// resizes the note, the resulting position is clamped against the resulting
/// size, so a resize at the right edge pulls the note back into view.
/// Already-clamped input comes back unchanged.
pub fn clamp_patch(note: &Note, patch: &NotePatch, viewport: Viewport) -> NotePatch {
    let mut clamped = patch.clone();
    let mut width = note.width;
    let mut height = note.height;

    if patch.has_size() {
        let (w, h) = clamp_size(
            patch.width.unwrap_or(note.width),
            patch.height.unwrap_or(note.height),
        );
        width = w;
        height = h;
        clamped.width = patch.width.map(|_| w);
        clamped.height = patch.height.map(|_| h);
    }

    if patch.has_position() || patch.has_size() {
        let (x, y) = clamp_position(
            patch.x.unwrap_or(note.x),
            patch.y.unwrap_or(note.y),
            width,
            height,
            viewport,
        );
        if patch.x.is_some() || x != note.x {
            clamped.x = Some(x);
        }
        if patch.y.is_some() || y != note.y {
            clamped.y = Some(y);
        }
    }

    clamped.z_index = patch.z_index.map(|z| z.clamp(0, Z_INDEX_CEILING));

    clamped
}

/// Ranges a new note's top-left corner may be drawn from
///
/// The upper bound keeps the note fully visible; the lower bound keeps the
/// placement offset from the edges whenever the viewport leaves room for it.
pub fn placement_range(
    viewport: Viewport,
    width: i32,
    height: i32,
) -> (RangeInclusive<i32>, RangeInclusive<i32>) {
    let max_x = viewport.width.saturating_sub(width).max(0);
    let max_y = viewport.height.saturating_sub(height).max(0);
    (
        PLACEMENT_OFFSET_X.min(max_x)..=max_x,
        PLACEMENT_OFFSET_Y.min(max_y)..=max_y,
    )
}

/// Part of a note a pointer landed on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitRegion {
    /// Header and borders: starts a drag
    Body,
    /// Editable text area: never drags
    Text,
    /// Bottom-right corner: starts a resize
    ResizeHandle,
    /// Close button in the header
    DeleteButton,
}

/// Check whether a point lies inside a note
pub fn contains(note: &Note, point: Point) -> bool {
    point.x >= note.x
        && point.x < note.x + note.width
        && point.y >= note.y
        && point.y < note.y + note.height
}

/// Find which region of a note a point hits, if any
pub fn hit_test(note: &Note, point: Point) -> Option<HitRegion> {
    if !contains(note, point) {
        return None;
    }

    let local_x = point.x - note.x;
    let local_y = point.y - note.y;

    if local_x >= note.width - RESIZE_HANDLE_SIZE && local_y >= note.height - RESIZE_HANDLE_SIZE {
        return Some(HitRegion::ResizeHandle);
    }
    if local_y < HEADER_HEIGHT {
        if local_x >= note.width - DELETE_BUTTON_WIDTH {
            return Some(HitRegion::DeleteButton);
        }
        return Some(HitRegion::Body);
    }
    Some(HitRegion::Text)
}

/// The note drawn on top at the given point
pub fn topmost_at(notes: &[Note], point: Point) -> Option<&Note> {
    notes
        .iter()
        .filter(|note| contains(note, point))
        .max_by_key(|note| note.z_index)
}

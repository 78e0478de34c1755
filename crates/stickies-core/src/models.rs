//! Data models for Stickies
//!
//! Defines the sticky note record, its color palette and the partial update
//! used to mutate it. The serialized form matches the JSON array the browser
//! widget keeps in local storage: `{id, text, x, y, width, height, color, zIndex}`.

use std::fmt;
use std::str::FromStr;

use chrono::Utc;
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

/// Width of a freshly created note, in pixels
pub const DEFAULT_WIDTH: i32 = 250;
/// Height of a freshly created note, in pixels
pub const DEFAULT_HEIGHT: i32 = 200;

pub const MIN_WIDTH: i32 = 200;
pub const MAX_WIDTH: i32 = 400;
pub const MIN_HEIGHT: i32 = 150;
pub const MAX_HEIGHT: i32 = 300;

/// Lowest value the z-order counter ever starts from
pub const Z_INDEX_FLOOR: i64 = 1000;
/// Highest z-index kept; larger values lose precision as JSON numbers
pub const Z_INDEX_CEILING: i64 = 9_007_199_254_740_991;

/// Horizontal offset new notes keep from the left edge (when there is room)
pub const PLACEMENT_OFFSET_X: i32 = 20;
/// Vertical offset new notes keep from the top edge, clear of the control panel
pub const PLACEMENT_OFFSET_Y: i32 = 80;

const ID_PREFIX: &str = "note";
const ID_SUFFIX_LEN: usize = 9;
const BASE36: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Opaque note identifier
///
/// Generated ids look like `note-1718000000000-k3j9x0a1b`: creation time in
/// milliseconds followed by a random base36 suffix.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NoteId(String);

impl NoteId {
    /// Generate a fresh id
    pub fn generate() -> Self {
        let millis = Utc::now().timestamp_millis();
        Self(format!("{}-{}-{}", ID_PREFIX, millis, random_suffix()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Check whether this id starts with the given prefix
    pub fn starts_with(&self, prefix: &str) -> bool {
        self.0.starts_with(prefix)
    }
}

impl fmt::Display for NoteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for NoteId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for NoteId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl AsRef<str> for NoteId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Random base36 suffix drawn from a v4 UUID
fn random_suffix() -> String {
    let mut value = Uuid::new_v4().as_u128();
    let mut suffix = String::with_capacity(ID_SUFFIX_LEN);
    for _ in 0..ID_SUFFIX_LEN {
        suffix.push(BASE36[(value % 36) as usize] as char);
        value /= 36;
    }
    suffix
}

/// Note color palette
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoteColor {
    #[default]
    Yellow,
    Pink,
    Green,
    Blue,
}

impl NoteColor {
    pub const ALL: [NoteColor; 4] = [
        NoteColor::Yellow,
        NoteColor::Pink,
        NoteColor::Green,
        NoteColor::Blue,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            NoteColor::Yellow => "yellow",
            NoteColor::Pink => "pink",
            NoteColor::Green => "green",
            NoteColor::Blue => "blue",
        }
    }
}

impl fmt::Display for NoteColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown color name
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown note color '{0}'. Valid colors: yellow, pink, green, blue")]
pub struct ParseColorError(String);

impl FromStr for NoteColor {
    type Err = ParseColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "yellow" => Ok(NoteColor::Yellow),
            "pink" => Ok(NoteColor::Pink),
            "green" => Ok(NoteColor::Green),
            "blue" => Ok(NoteColor::Blue),
            _ => Err(ParseColorError(s.to_string())),
        }
    }
}

/// A sticky note
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    /// Unique identifier, never reassigned
    pub id: NoteId,
    /// Free-form content
    pub text: String,
    /// Left edge, in pixels
    #[serde(deserialize_with = "pixel")]
    pub x: i32,
    /// Top edge, in pixels
    #[serde(deserialize_with = "pixel")]
    pub y: i32,
    #[serde(deserialize_with = "pixel")]
    pub width: i32,
    #[serde(deserialize_with = "pixel")]
    pub height: i32,
    /// Fixed at creation
    pub color: NoteColor,
    /// Stacking order, higher draws on top
    pub z_index: i64,
}

impl Note {
    /// Create an empty note of default size at the given position
    pub fn new(color: NoteColor, x: i32, y: i32, z_index: i64) -> Self {
        Self {
            id: NoteId::generate(),
            text: String::new(),
            x,
            y,
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            color,
            z_index,
        }
    }

    /// Merge a patch into this note. Values are taken as given.
    pub fn apply(&mut self, patch: &NotePatch) {
        if let Some(ref text) = patch.text {
            self.text = text.clone();
        }
        if let Some(x) = patch.x {
            self.x = x;
        }
        if let Some(y) = patch.y {
            self.y = y;
        }
        if let Some(width) = patch.width {
            self.width = width;
        }
        if let Some(height) = patch.height {
            self.height = height;
        }
        if let Some(z_index) = patch.z_index {
            self.z_index = z_index;
        }
    }
}

/// Browser-written payloads store positions as floats; accept any finite
/// number and round it to the nearest pixel.
fn pixel<'de, D>(deserializer: D) -> Result<i32, D::Error>
where
    D: Deserializer<'de>,
{
    let value = f64::deserialize(deserializer)?;
    if !value.is_finite() || value < i32::MIN as f64 || value > i32::MAX as f64 {
        return Err(serde::de::Error::custom(format!(
            "pixel value out of range: {}",
            value
        )));
    }
    Ok(value.round() as i32)
}

/// Partial update for a note
///
/// Color is deliberately absent: notes cannot be recolored.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NotePatch {
    pub text: Option<String>,
    pub x: Option<i32>,
    pub y: Option<i32>,
    pub width: Option<i32>,
    pub height: Option<i32>,
    pub z_index: Option<i64>,
}

impl NotePatch {
    pub fn position(x: i32, y: i32) -> Self {
        Self {
            x: Some(x),
            y: Some(y),
            ..Self::default()
        }
    }

    pub fn size(width: i32, height: i32) -> Self {
        Self {
            width: Some(width),
            height: Some(height),
            ..Self::default()
        }
    }

    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            ..Self::default()
        }
    }

    pub fn z_index(z_index: i64) -> Self {
        Self {
            z_index: Some(z_index),
            ..Self::default()
        }
    }

    pub fn has_position(&self) -> bool {
        self.x.is_some() || self.y.is_some()
    }

    pub fn has_size(&self) -> bool {
        self.width.is_some() || self.height.is_some()
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_note_new_defaults() {
        let note = Note::new(NoteColor::Yellow, 10, 20, 1001);
        assert_eq!(note.width, 250);
        assert_eq!(note.height, 200);
        assert_eq!(note.color, NoteColor::Yellow);
        assert_eq!(note.z_index, 1001);
        assert!(note.text.is_empty());
    }

    #[test]
    fn test_generated_ids_have_expected_shape() {
        let id = NoteId::generate();
        let parts: Vec<&str> = id.as_str().split('-').collect();
        assert_eq!(parts.len(), 3);
        assert_eq!(parts[0], "note");
        assert!(parts[1].parse::<i64>().is_ok());
        assert_eq!(parts[2].len(), 9);
        assert!(parts[2]
            .chars()
            .all(|c| c.is_ascii_digit() || c.is_ascii_lowercase()));
    }

    #[test]
    fn test_generated_ids_are_distinct() {
        let ids: HashSet<NoteId> = (0..1000).map(|_| NoteId::generate()).collect();
        assert_eq!(ids.len(), 1000);
    }

    #[test]
    fn test_color_parse_and_display() {
        assert_eq!("Pink".parse::<NoteColor>().unwrap(), NoteColor::Pink);
        assert_eq!(" blue ".parse::<NoteColor>().unwrap(), NoteColor::Blue);
        assert!("purple".parse::<NoteColor>().is_err());
        assert_eq!(NoteColor::Green.to_string(), "green");
        assert_eq!(NoteColor::default(), NoteColor::Yellow);
    }

    #[test]
    fn test_note_json_field_names() {
        let note = Note {
            id: NoteId::from("note-1-abc"),
            text: "hello".to_string(),
            x: 1,
            y: 2,
            width: 250,
            height: 200,
            color: NoteColor::Blue,
            z_index: 1005,
        };
        let value = serde_json::to_value(&note).unwrap();
        assert_eq!(value["id"], "note-1-abc");
        assert_eq!(value["color"], "blue");
        assert_eq!(value["zIndex"], 1005);
        assert!(value.get("z_index").is_none());
    }

    #[test]
    fn test_note_accepts_fractional_pixels() {
        let json = r#"{"id":"note-1-abc","text":"","x":120.6,"y":80.2,
            "width":250,"height":200,"color":"pink","zIndex":1001}"#;
        let note: Note = serde_json::from_str(json).unwrap();
        assert_eq!(note.x, 121);
        assert_eq!(note.y, 80);
    }

    #[test]
    fn test_note_rejects_unknown_color() {
        let json = r#"{"id":"a","text":"","x":0,"y":0,"width":250,"height":200,
            "color":"purple","zIndex":1}"#;
        assert!(serde_json::from_str::<Note>(json).is_err());
    }

    #[test]
    fn test_apply_patch() {
        let mut note = Note::new(NoteColor::Green, 0, 0, 1001);
        note.apply(&NotePatch::position(30, 40));
        assert_eq!((note.x, note.y), (30, 40));

        note.apply(&NotePatch::text("buy milk"));
        assert_eq!(note.text, "buy milk");
        assert_eq!((note.x, note.y), (30, 40));
        assert_eq!(note.color, NoteColor::Green);
    }

    #[test]
    fn test_patch_flags() {
        assert!(NotePatch::default().is_empty());
        assert!(NotePatch::position(1, 2).has_position());
        assert!(!NotePatch::position(1, 2).has_size());
        assert!(NotePatch::size(300, 200).has_size());
        assert!(!NotePatch::text("x").is_empty());
    }
}

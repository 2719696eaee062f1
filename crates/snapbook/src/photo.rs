//! Core photo types for snapbook.
//!
//! This module defines the saved photo record, its stable identifier, and
//! the policy that names freshly saved photos.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identifier assigned to a photo when it is saved.
///
/// Unlike a list position, an id never changes for the lifetime of the
/// record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PhotoId(Uuid);

impl PhotoId {
    /// Generate a fresh random identifier.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for PhotoId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for PhotoId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A saved photo.
///
/// The app only holds a reference to the image (`uri`); the pixels belong
/// to the platform's media layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhotoRecord {
    /// Stable identifier.
    pub id: PhotoId,

    /// Opaque reference to the captured image.
    pub uri: String,

    /// Editable text label.
    pub label: String,

    /// When the photo was saved into the list.
    pub captured_at: DateTime<Utc>,
}

impl PhotoRecord {
    /// Create a record for `uri` with the given label, stamped now.
    #[must_use]
    pub fn new(uri: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: PhotoId::new(),
            uri: uri.into(),
            label: label.into(),
            captured_at: Utc::now(),
        }
    }
}

/// How a newly saved photo is labelled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LabelPolicy {
    /// Every photo starts with the same text.
    Static {
        /// The placeholder label.
        text: String,
    },
    /// Photos are numbered by list position: `"{prefix} {n}"`, 1-based.
    Numbered {
        /// Text placed before the number.
        prefix: String,
    },
}

impl Default for LabelPolicy {
    fn default() -> Self {
        Self::Static {
            text: "New photo".to_string(),
        }
    }
}

impl LabelPolicy {
    /// Default numbered policy (`"Photo number N"`).
    #[must_use]
    pub fn numbered() -> Self {
        Self::Numbered {
            prefix: "Photo number".to_string(),
        }
    }

    /// Label for the photo that will occupy 1-based `position`.
    #[must_use]
    pub fn label_for(&self, position: usize) -> String {
        match self {
            Self::Static { text } => text.clone(),
            Self::Numbered { prefix } => format!("{prefix} {position}"),
        }
    }
}

/// Truncate `label` to at most `max_chars` characters.
///
/// A limit of zero leaves the label untouched.
#[must_use]
pub fn clamp_label(label: &str, max_chars: usize) -> String {
    if max_chars == 0 {
        return label.to_string();
    }
    label.chars().take(max_chars).collect()
}

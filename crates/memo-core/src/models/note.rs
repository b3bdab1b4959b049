//! Note model

use std::fmt;
use std::num::ParseIntError;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A unique identifier for a note, assigned by the note service on creation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NoteId(u64);

impl NoteId {
    /// Wrap a raw service-assigned identifier
    #[must_use]
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Get the raw numeric value of this ID
    #[must_use]
    pub const fn as_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Display for NoteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for NoteId {
    type Err = ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.parse()?))
    }
}

/// A note in the system
///
/// The identifier is absent until the note has been persisted by the
/// service; it is immutable once assigned and is the sole identity key
/// used to match edits and deletions back to collection entries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    /// Service-assigned identifier; `None` for unsaved drafts
    #[serde(default)]
    pub id: Option<NoteId>,
    /// Short text label
    pub title: String,
    /// Optional body text
    #[serde(default)]
    pub content: Option<String>,
    /// Client-side creation timestamp (RFC 3339 on the wire)
    pub created_at: DateTime<Utc>,
}

impl Note {
    /// Check whether `query` appears as a case-insensitive substring of
    /// the title or content
    #[must_use]
    pub fn matches(&self, query: &str) -> bool {
        let needle = query.to_lowercase();
        if self.title.to_lowercase().contains(&needle) {
            return true;
        }
        self.content
            .as_ref()
            .is_some_and(|content| content.to_lowercase().contains(&needle))
    }

    /// First line of the body, truncated to `max_chars` with an ellipsis
    #[must_use]
    pub fn preview(&self, max_chars: usize) -> String {
        let first_line = self
            .content
            .as_deref()
            .unwrap_or("")
            .lines()
            .next()
            .unwrap_or("")
            .trim();
        let collapsed = first_line.split_whitespace().collect::<Vec<_>>().join(" ");

        if collapsed.chars().count() <= max_chars {
            collapsed
        } else {
            let take_len = max_chars.saturating_sub(3);
            let mut truncated = collapsed.chars().take(take_len).collect::<String>();
            truncated.push_str("...");
            truncated
        }
    }

    /// Shallow merge used when an edit is committed: fields of `edit`
    /// take precedence, identity is kept from `self`
    pub fn merge_edit(&mut self, edit: &Self) {
        self.title = edit.title.clone();
        self.content = edit.content.clone();
        self.created_at = edit.created_at;
    }
}

/// An unsaved note as submitted to the service for creation
///
/// Same shape as [`Note`] minus the identifier, which only the service
/// can assign.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoteDraft {
    /// Short text label
    pub title: String,
    /// Optional body text
    #[serde(default)]
    pub content: Option<String>,
    /// Stamped on the client at draft-creation time
    pub created_at: DateTime<Utc>,
}

impl NoteDraft {
    /// Create an empty draft stamped with the current time
    #[must_use]
    pub fn new() -> Self {
        Self {
            title: String::new(),
            content: None,
            created_at: Utc::now(),
        }
    }

    /// Turn the draft into a persisted note carrying `id`
    #[must_use]
    pub fn into_note(self, id: NoteId) -> Note {
        Note {
            id: Some(id),
            title: self.title,
            content: self.content,
            created_at: self.created_at,
        }
    }
}

impl Default for NoteDraft {
    fn default() -> Self {
        Self::new()
    }
}

/// Destination collection chosen when a creation draft is started
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PinTarget {
    /// The non-pinned note collection
    #[default]
    Normal,
    /// The pinned note collection
    Pinned,
}

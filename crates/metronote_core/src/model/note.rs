//! Note record model.
//!
//! # Invariants
//! - `title` is never empty right after creation (placeholder fallback).
//! - `updated_at >= created_at`.

use crate::model::record::{Record, RecordId, Timestamp};
use serde::{Deserialize, Serialize};

/// Title used when a note is created without one.
pub const UNTITLED_NOTE_TITLE: &str = "Untitled Note";

/// Short text note.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    pub id: RecordId,
    pub title: String,
    #[serde(default)]
    pub content: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Partial update for a note. `None` keeps the current value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NotePatch {
    pub title: Option<String>,
    pub content: Option<String>,
}

impl NotePatch {
    pub fn title(value: impl Into<String>) -> Self {
        Self {
            title: Some(value.into()),
            content: None,
        }
    }

    pub fn content(value: impl Into<String>) -> Self {
        Self {
            title: None,
            content: Some(value.into()),
        }
    }
}

impl Note {
    /// Builds a new note with a fresh id and `created_at == updated_at == at`.
    ///
    /// A blank `title` falls back to [`UNTITLED_NOTE_TITLE`].
    pub fn new(title: impl Into<String>, content: impl Into<String>, at: Timestamp) -> Self {
        let title = title.into();
        let title = if title.trim().is_empty() {
            UNTITLED_NOTE_TITLE.to_string()
        } else {
            title
        };
        Self {
            id: RecordId::generate(),
            title,
            content: content.into(),
            created_at: at,
            updated_at: at,
        }
    }
}

impl Record for Note {
    type Patch = NotePatch;

    const KIND: &'static str = "note";

    fn id(&self) -> &RecordId {
        &self.id
    }

    fn created_at(&self) -> Timestamp {
        self.created_at
    }

    fn updated_at(&self) -> Timestamp {
        self.updated_at
    }

    fn apply_patch(&mut self, patch: NotePatch, updated_at: Timestamp) {
        if let Some(title) = patch.title {
            self.title = title;
        }
        if let Some(content) = patch.content {
            self.content = content;
        }
        self.updated_at = updated_at;
    }

    fn repair_timestamps(&mut self) -> bool {
        if self.updated_at < self.created_at {
            self.updated_at = self.created_at;
            return true;
        }
        false
    }
}

//! Note domain model.
//!
//! # Responsibility
//! - Define the canonical note record and its create/edit payloads.
//! - Validate record-level invariants before persistence.
//!
//! # Invariants
//! - `id` is stable and never reused for another note.
//! - `owner` is assigned once at creation and is not part of any edit payload.
//! - `updated_at` is never earlier than `created_at`.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::{SystemTime, UNIX_EPOCH};
use uuid::Uuid;

/// Opaque stable identifier of a note.
pub type NoteId = String;

/// Title stored when a note is created without one.
pub const DEFAULT_NOTE_TITLE: &str = "untitled";

/// Canonical persisted note record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    pub id: NoteId,
    pub title: String,
    pub body: String,
    /// Order and duplicates are preserved exactly as given.
    pub tags: Vec<String>,
    /// Unix epoch milliseconds.
    pub created_at: i64,
    /// Unix epoch milliseconds. Refreshed on every successful edit.
    pub updated_at: i64,
    pub owner: String,
}

impl Note {
    /// Builds a fresh record with a generated id and `created_at == updated_at`.
    ///
    /// A missing `title` falls back to [`DEFAULT_NOTE_TITLE`].
    pub fn new(new_note: NewNote, owner: impl Into<String>) -> Self {
        let now = now_epoch_ms();
        Self {
            id: new_note_id(),
            title: new_note
                .title
                .unwrap_or_else(|| DEFAULT_NOTE_TITLE.to_string()),
            body: new_note.body,
            tags: new_note.tags,
            created_at: now,
            updated_at: now,
            owner: owner.into(),
        }
    }

    /// Validates record invariants.
    pub fn validate(&self) -> Result<(), NoteValidationError> {
        if self.id.trim().is_empty() {
            return Err(NoteValidationError::EmptyId);
        }
        if self.owner.trim().is_empty() {
            return Err(NoteValidationError::EmptyOwner);
        }
        if self.body.trim().is_empty() {
            return Err(NoteValidationError::EmptyBody);
        }
        if self.updated_at < self.created_at {
            return Err(NoteValidationError::UpdatedBeforeCreated {
                created_at: self.created_at,
                updated_at: self.updated_at,
            });
        }
        Ok(())
    }
}

/// Create payload. `owner` is supplied separately by the identity layer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewNote {
    #[serde(default)]
    pub title: Option<String>,
    pub body: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// Full-replacement edit payload. Every mutable field is required.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoteEdit {
    pub title: String,
    pub body: String,
    pub tags: Vec<String>,
}

/// Edit payload as decoded from an untrusted request, before completeness checks.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditNotePayload {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub body: Option<String>,
    #[serde(default)]
    pub tags: Option<Vec<String>>,
}

impl TryFrom<EditNotePayload> for NoteEdit {
    type Error = NoteValidationError;

    /// Rejects payloads with any missing field; edits never fall back to
    /// partial-update or defaulting semantics.
    fn try_from(payload: EditNotePayload) -> Result<Self, Self::Error> {
        let title = payload
            .title
            .ok_or(NoteValidationError::MissingField("title"))?;
        let body = payload
            .body
            .ok_or(NoteValidationError::MissingField("body"))?;
        let tags = payload
            .tags
            .ok_or(NoteValidationError::MissingField("tags"))?;
        Ok(Self { title, body, tags })
    }
}

/// Validation failures for note records and payloads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NoteValidationError {
    EmptyId,
    EmptyOwner,
    EmptyBody,
    MissingField(&'static str),
    UpdatedBeforeCreated { created_at: i64, updated_at: i64 },
}

impl Display for NoteValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyId => write!(f, "note id cannot be empty"),
            Self::EmptyOwner => write!(f, "note owner cannot be empty"),
            Self::EmptyBody => write!(f, "note body cannot be empty"),
            Self::MissingField(field) => write!(f, "missing required field `{field}`"),
            Self::UpdatedBeforeCreated {
                created_at,
                updated_at,
            } => write!(
                f,
                "updated_at ({updated_at}) must not be earlier than created_at ({created_at})"
            ),
        }
    }
}

impl Error for NoteValidationError {}

/// Generates a fresh random note identifier.
pub fn new_note_id() -> NoteId {
    Uuid::new_v4().to_string()
}

/// Current wall-clock time in Unix epoch milliseconds.
pub fn now_epoch_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| i64::try_from(elapsed.as_millis()).unwrap_or(i64::MAX))
        .unwrap_or(0)
}

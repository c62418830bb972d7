//! Note persistence-and-authorization service.
//!
//! # Responsibility
//! - Provide create/list/get/edit/delete use-case APIs over a repository.
//! - Own the ownership check (`verify_owner`) that callers run before any
//!   owner-scoped read, edit or delete.
//! - Translate repository outcomes into the three caller-facing error kinds.
//!
//! # Invariants
//! - `owner` is set once by `create` and no edit path can change it.
//! - `get_by_id`, `edit_by_id` and `delete_by_id` locate rows by id only;
//!   authorization is a separate pre-step.
//! - Every operation either succeeds fully or fails with one error.

use crate::model::note::{now_epoch_ms, NewNote, Note, NoteEdit, NoteId, NoteValidationError};
use crate::repo::note_repo::{NoteRepository, RepoError};
use log::{error, info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

const MSG_CREATE_FAILED: &str = "note could not be added";
const MSG_NOT_FOUND: &str = "note not found";
const MSG_EDIT_NOT_FOUND: &str = "failed to update note: id not found";
const MSG_DELETE_NOT_FOUND: &str = "failed to delete note: id not found";
const MSG_UNAUTHORIZED: &str = "you are not allowed to access this resource";

pub type NoteStoreResult<T> = Result<T, NoteStoreError>;

/// Caller-facing error for note store operations.
#[derive(Debug)]
pub enum NoteStoreError {
    /// Input was rejected, or storage could not complete a create.
    ValidationFailure(String),
    /// No note matches the given id.
    NotFound(String),
    /// The note exists but belongs to a different owner.
    Unauthorized(String),
    /// Storage transport failure outside the create path.
    Storage(RepoError),
}

impl NoteStoreError {
    /// Transport status a request layer is expected to map this error to.
    pub fn status_code(&self) -> u16 {
        match self {
            Self::ValidationFailure(_) => 400,
            Self::Unauthorized(_) => 403,
            Self::NotFound(_) => 404,
            Self::Storage(_) => 500,
        }
    }

    /// Stable machine-readable error kind.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::ValidationFailure(_) => "validation_failure",
            Self::NotFound(_) => "not_found",
            Self::Unauthorized(_) => "unauthorized",
            Self::Storage(_) => "storage",
        }
    }
}

impl Display for NoteStoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ValidationFailure(message)
            | Self::NotFound(message)
            | Self::Unauthorized(message) => write!(f, "{message}"),
            Self::Storage(err) => write!(f, "note storage failure: {err}"),
        }
    }
}

impl Error for NoteStoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Storage(err) => Some(err),
            _ => None,
        }
    }
}

impl From<NoteValidationError> for NoteStoreError {
    fn from(value: NoteValidationError) -> Self {
        Self::ValidationFailure(value.to_string())
    }
}

/// Note store facade over a repository implementation.
pub struct NoteStore<R: NoteRepository> {
    repo: R,
}

impl<R: NoteRepository> NoteStore<R> {
    /// Creates a store using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Creates one note owned by `owner` and returns its new id.
    ///
    /// A missing title is stored as `"untitled"`; `created_at == updated_at`.
    ///
    /// # Errors
    /// - `ValidationFailure` when `body` or `owner` is blank, or when the
    ///   insert cannot complete for any reason.
    pub fn create(&self, new_note: NewNote, owner: &str) -> NoteStoreResult<NoteId> {
        if owner.trim().is_empty() {
            return Err(NoteValidationError::EmptyOwner.into());
        }
        if new_note.body.trim().is_empty() {
            return Err(NoteValidationError::EmptyBody.into());
        }

        let note = Note::new(new_note, owner);
        match self.repo.insert_note(&note) {
            Ok(Some(id)) => {
                info!("event=note_create module=service status=ok note_id={id} owner={owner}");
                Ok(id)
            }
            Ok(None) => {
                error!(
                    "event=note_create module=service status=error owner={owner} error_code=no_id_returned"
                );
                Err(NoteStoreError::ValidationFailure(MSG_CREATE_FAILED.to_string()))
            }
            Err(err) => {
                error!(
                    "event=note_create module=service status=error owner={owner} error_code=insert_failed error={err}"
                );
                Err(NoteStoreError::ValidationFailure(MSG_CREATE_FAILED.to_string()))
            }
        }
    }

    /// Lists every note owned by `owner`, in insertion order.
    ///
    /// An owner without notes yields an empty list.
    pub fn list(&self, owner: &str) -> NoteStoreResult<Vec<Note>> {
        let notes = self
            .repo
            .list_notes_by_owner(owner)
            .map_err(storage_error("note_list"))?;
        info!(
            "event=note_list module=service status=ok owner={owner} count={}",
            notes.len()
        );
        Ok(notes)
    }

    /// Gets one full note by id without any ownership filter.
    ///
    /// Callers exposing the result to a principal must run
    /// [`NoteStore::verify_owner`] first.
    pub fn get_by_id(&self, id: &str) -> NoteStoreResult<Note> {
        self.repo
            .get_note(id)
            .map_err(storage_error("note_get"))?
            .ok_or_else(|| NoteStoreError::NotFound(MSG_NOT_FOUND.to_string()))
    }

    /// Checks that note `id` exists and belongs to `owner`.
    ///
    /// # Errors
    /// - `NotFound` when no note has this id.
    /// - `Unauthorized` when the note belongs to someone else.
    pub fn verify_owner(&self, id: &str, owner: &str) -> NoteStoreResult<()> {
        let note = self.get_by_id(id)?;
        if note.owner != owner {
            warn!("event=note_verify_owner module=service status=denied note_id={id} owner={owner}");
            return Err(NoteStoreError::Unauthorized(MSG_UNAUTHORIZED.to_string()));
        }
        Ok(())
    }

    /// Replaces title, body and tags of note `id` and refreshes `updated_at`.
    ///
    /// The row is located by id only; `owner` and `created_at` never change.
    ///
    /// # Errors
    /// - `ValidationFailure` when the new body is blank.
    /// - `NotFound` when no note has this id.
    pub fn edit_by_id(&self, id: &str, edit: NoteEdit) -> NoteStoreResult<()> {
        if edit.body.trim().is_empty() {
            return Err(NoteValidationError::EmptyBody.into());
        }

        match self.repo.update_note(id, &edit, now_epoch_ms()) {
            Ok(()) => {
                info!("event=note_edit module=service status=ok note_id={id}");
                Ok(())
            }
            Err(RepoError::NotFound(_)) => {
                Err(NoteStoreError::NotFound(MSG_EDIT_NOT_FOUND.to_string()))
            }
            Err(err) => Err(storage_error("note_edit")(err)),
        }
    }

    /// Permanently removes note `id`.
    ///
    /// # Errors
    /// - `NotFound` when no note has this id.
    pub fn delete_by_id(&self, id: &str) -> NoteStoreResult<()> {
        match self.repo.delete_note(id) {
            Ok(()) => {
                info!("event=note_delete module=service status=ok note_id={id}");
                Ok(())
            }
            Err(RepoError::NotFound(_)) => {
                Err(NoteStoreError::NotFound(MSG_DELETE_NOT_FOUND.to_string()))
            }
            Err(err) => Err(storage_error("note_delete")(err)),
        }
    }
}

fn storage_error(event: &'static str) -> impl Fn(RepoError) -> NoteStoreError {
    move |err| {
        error!("event={event} module=service status=error error={err}");
        NoteStoreError::Storage(err)
    }
}

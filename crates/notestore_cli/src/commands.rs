//! Command handlers.
//!
//! # Responsibility
//! - Compose store operations the way a request layer does: the ownership
//!   check always runs before owner-scoped reads, edits and deletes.
//! - Print results as JSON on stdout.

use crate::cli::{AddArgs, EditArgs, IdArgs};
use notestore_core::{
    EditNotePayload, NewNote, NoteEdit, NoteRepository, NoteStore, NoteStoreError,
};
use serde_json::json;

/// Failure surfaced to `main`, carrying the process exit code.
#[derive(Debug)]
pub enum CommandError {
    Store(NoteStoreError),
    Usage(String),
}

impl CommandError {
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::Usage(_) => 2,
            Self::Store(NoteStoreError::ValidationFailure(_)) => 3,
            Self::Store(NoteStoreError::Unauthorized(_)) => 4,
            Self::Store(NoteStoreError::NotFound(_)) => 5,
            Self::Store(NoteStoreError::Storage(_)) => 1,
        }
    }
}

impl std::fmt::Display for CommandError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Store(err) => write!(f, "{} ({}): {err}", err.kind(), err.status_code()),
            Self::Usage(message) => write!(f, "{message}"),
        }
    }
}

impl From<NoteStoreError> for CommandError {
    fn from(value: NoteStoreError) -> Self {
        Self::Store(value)
    }
}

pub type CommandResult = Result<(), CommandError>;

pub fn add<R: NoteRepository>(store: &NoteStore<R>, owner: &str, args: AddArgs) -> CommandResult {
    let id = store.create(
        NewNote {
            title: args.title,
            body: args.body,
            tags: args.tags,
        },
        owner,
    )?;
    println!("{}", json!({ "noteId": id }));
    Ok(())
}

pub fn list<R: NoteRepository>(store: &NoteStore<R>, owner: &str) -> CommandResult {
    let notes = store.list(owner)?;
    println!("{}", json!({ "notes": notes }));
    Ok(())
}

pub fn show<R: NoteRepository>(store: &NoteStore<R>, owner: &str, args: IdArgs) -> CommandResult {
    store.verify_owner(&args.id, owner)?;
    let note = store.get_by_id(&args.id)?;
    println!("{}", json!({ "note": note }));
    Ok(())
}

pub fn edit<R: NoteRepository>(store: &NoteStore<R>, owner: &str, args: EditArgs) -> CommandResult {
    let payload = EditNotePayload {
        title: args.title,
        body: args.body,
        tags: replacement_tags(args.tags, args.clear_tags),
    };
    let edit = NoteEdit::try_from(payload).map_err(NoteStoreError::from)?;

    store.verify_owner(&args.id, owner)?;
    store.edit_by_id(&args.id, edit)?;
    println!("{}", json!({ "noteId": args.id, "updated": true }));
    Ok(())
}

pub fn delete<R: NoteRepository>(
    store: &NoteStore<R>,
    owner: &str,
    args: IdArgs,
) -> CommandResult {
    store.verify_owner(&args.id, owner)?;
    store.delete_by_id(&args.id)?;
    println!("{}", json!({ "noteId": args.id, "deleted": true }));
    Ok(())
}

/// `None` when neither `--tag` nor `--clear-tags` was given.
fn replacement_tags(tags: Vec<String>, clear: bool) -> Option<Vec<String>> {
    if clear {
        Some(Vec::new())
    } else if tags.is_empty() {
        None
    } else {
        Some(tags)
    }
}

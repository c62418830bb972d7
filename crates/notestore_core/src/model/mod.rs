//! Domain model for owner-scoped text notes.
//!
//! # Responsibility
//! - Define canonical data structures used by the note store.
//!
//! # Invariants
//! - Every note is identified by a stable `NoteId`.
//! - Deletion is a hard delete; a missing note and a deleted note are
//!   indistinguishable.

pub mod note;

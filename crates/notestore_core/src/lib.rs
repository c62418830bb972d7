//! Owner-scoped note persistence for NoteStore.
//! This crate is the single source of truth for note and ownership invariants.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use config::{ConfigError, StoreConfig};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::note::{
    EditNotePayload, NewNote, Note, NoteEdit, NoteId, NoteValidationError, DEFAULT_NOTE_TITLE,
};
pub use repo::note_repo::{
    NoteRepository, PooledNoteRepository, RepoError, RepoResult, SqliteNoteRepository,
};
pub use service::note_store::{NoteStore, NoteStoreError, NoteStoreResult};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::{core_version, ping};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}

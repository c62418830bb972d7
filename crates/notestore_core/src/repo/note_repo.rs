//! Note repository contracts and SQLite implementations.
//!
//! # Responsibility
//! - Provide CRUD persistence APIs over the `notes` table.
//! - Keep SQL details inside the persistence boundary.
//!
//! # Invariants
//! - Write paths call `Note::validate()` before SQL mutations.
//! - Rows are located by `id` only; ownership is checked by the service layer.
//! - Owner listings come back in insertion order (`rowid ASC`).
//! - An edit always moves `updated_at` strictly forward.

use crate::db::{DbError, DbPool};
use crate::model::note::{Note, NoteEdit, NoteId, NoteValidationError};
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};

const NOTE_SELECT_SQL: &str = "SELECT
    id,
    title,
    body,
    tags,
    created_at,
    updated_at,
    owner
FROM notes";

const NOTE_COLUMNS: [&str; 7] = [
    "id",
    "title",
    "body",
    "tags",
    "created_at",
    "updated_at",
    "owner",
];

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for note persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    Validation(NoteValidationError),
    Db(DbError),
    NotFound(NoteId),
    InvalidData(String),
    MissingRequiredTable(&'static str),
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "note not found: {id}"),
            Self::InvalidData(message) => write!(f, "invalid persisted note data: {message}"),
            Self::MissingRequiredTable(table) => write!(f, "missing required table `{table}`"),
            Self::MissingRequiredColumn { table, column } => {
                write!(f, "missing required column `{table}.{column}`")
            }
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<NoteValidationError> for RepoError {
    fn from(value: NoteValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

impl From<r2d2::Error> for RepoError {
    fn from(value: r2d2::Error) -> Self {
        Self::Db(DbError::Pool(value))
    }
}

/// Repository interface for note CRUD operations.
pub trait NoteRepository {
    /// Inserts a complete record. Returns the id echoed back by storage, or
    /// `None` when the insert produced no row.
    fn insert_note(&self, note: &Note) -> RepoResult<Option<NoteId>>;
    /// Lists notes owned by `owner` in insertion order.
    fn list_notes_by_owner(&self, owner: &str) -> RepoResult<Vec<Note>>;
    /// Gets one note by id, regardless of owner.
    fn get_note(&self, id: &str) -> RepoResult<Option<Note>>;
    /// Replaces title/body/tags and refreshes `updated_at`.
    fn update_note(&self, id: &str, edit: &NoteEdit, now_ms: i64) -> RepoResult<()>;
    /// Hard-deletes one note by id.
    fn delete_note(&self, id: &str) -> RepoResult<()>;
}

/// SQLite-backed note repository over a borrowed connection.
pub struct SqliteNoteRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteNoteRepository<'conn> {
    /// Constructs a repository from a migrated/ready connection.
    ///
    /// # Errors
    /// - `MissingRequiredTable` / `MissingRequiredColumn` when the schema is
    ///   not the one this crate migrates to.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_note_connection_ready(conn)?;
        Ok(Self { conn })
    }

    fn new_unchecked(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl NoteRepository for SqliteNoteRepository<'_> {
    fn insert_note(&self, note: &Note) -> RepoResult<Option<NoteId>> {
        note.validate()?;
        let tags = encode_tags(&note.tags)?;

        let inserted = self
            .conn
            .query_row(
                "INSERT INTO notes (
                    id,
                    title,
                    body,
                    tags,
                    created_at,
                    updated_at,
                    owner
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
                RETURNING id;",
                params![
                    note.id.as_str(),
                    note.title.as_str(),
                    note.body.as_str(),
                    tags,
                    note.created_at,
                    note.updated_at,
                    note.owner.as_str(),
                ],
                |row| row.get::<_, String>(0),
            )
            .optional()?;

        Ok(inserted.filter(|id| !id.is_empty()))
    }

    fn list_notes_by_owner(&self, owner: &str) -> RepoResult<Vec<Note>> {
        let mut stmt = self.conn.prepare(&format!(
            "{NOTE_SELECT_SQL}
             WHERE owner = ?1
             ORDER BY rowid ASC;"
        ))?;

        let mut rows = stmt.query([owner])?;
        let mut notes = Vec::new();
        while let Some(row) = rows.next()? {
            notes.push(parse_note_row(row)?);
        }

        Ok(notes)
    }

    fn get_note(&self, id: &str) -> RepoResult<Option<Note>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{NOTE_SELECT_SQL} WHERE id = ?1;"))?;

        let mut rows = stmt.query([id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_note_row(row)?));
        }

        Ok(None)
    }

    fn update_note(&self, id: &str, edit: &NoteEdit, now_ms: i64) -> RepoResult<()> {
        let tags = encode_tags(&edit.tags)?;

        // Same-millisecond edits still advance updated_at by one.
        let changed = self.conn.execute(
            "UPDATE notes
             SET
                title = ?1,
                body = ?2,
                tags = ?3,
                updated_at = MAX(?4, updated_at + 1)
             WHERE id = ?5;",
            params![
                edit.title.as_str(),
                edit.body.as_str(),
                tags,
                now_ms,
                id
            ],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound(id.to_string()));
        }

        Ok(())
    }

    fn delete_note(&self, id: &str) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM notes WHERE id = ?1;", [id])?;

        if changed == 0 {
            return Err(RepoError::NotFound(id.to_string()));
        }

        Ok(())
    }
}

/// Note repository over a shared connection pool.
///
/// Each call checks one connection out of the pool for the duration of a
/// single statement. The type is `Send + Sync`, so a store built on it can be
/// shared across threads.
#[derive(Clone)]
pub struct PooledNoteRepository {
    pool: DbPool,
}

impl PooledNoteRepository {
    /// Wraps a pool built by [`crate::db::open_pool`].
    pub fn try_new(pool: DbPool) -> RepoResult<Self> {
        let conn = pool.get()?;
        ensure_note_connection_ready(&conn)?;
        drop(conn);
        Ok(Self { pool })
    }

    fn with_repo<T>(
        &self,
        op: impl FnOnce(&SqliteNoteRepository<'_>) -> RepoResult<T>,
    ) -> RepoResult<T> {
        let conn = self.pool.get()?;
        op(&SqliteNoteRepository::new_unchecked(&conn))
    }
}

impl NoteRepository for PooledNoteRepository {
    fn insert_note(&self, note: &Note) -> RepoResult<Option<NoteId>> {
        self.with_repo(|repo| repo.insert_note(note))
    }

    fn list_notes_by_owner(&self, owner: &str) -> RepoResult<Vec<Note>> {
        self.with_repo(|repo| repo.list_notes_by_owner(owner))
    }

    fn get_note(&self, id: &str) -> RepoResult<Option<Note>> {
        self.with_repo(|repo| repo.get_note(id))
    }

    fn update_note(&self, id: &str, edit: &NoteEdit, now_ms: i64) -> RepoResult<()> {
        self.with_repo(|repo| repo.update_note(id, edit, now_ms))
    }

    fn delete_note(&self, id: &str) -> RepoResult<()> {
        self.with_repo(|repo| repo.delete_note(id))
    }
}

fn parse_note_row(row: &Row<'_>) -> RepoResult<Note> {
    let id: String = row.get("id")?;
    let tags_text: String = row.get("tags")?;
    let tags = serde_json::from_str::<Vec<String>>(&tags_text).map_err(|err| {
        RepoError::InvalidData(format!("invalid tags value for note `{id}`: {err}"))
    })?;

    Ok(Note {
        id,
        title: row.get("title")?,
        body: row.get("body")?,
        tags,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
        owner: row.get("owner")?,
    })
}

fn encode_tags(tags: &[String]) -> RepoResult<String> {
    serde_json::to_string(tags)
        .map_err(|err| RepoError::InvalidData(format!("tags could not be encoded: {err}")))
}

fn ensure_note_connection_ready(conn: &Connection) -> RepoResult<()> {
    if !table_exists(conn, "notes")? {
        return Err(RepoError::MissingRequiredTable("notes"));
    }

    for column in NOTE_COLUMNS {
        if !table_has_column(conn, "notes", column)? {
            return Err(RepoError::MissingRequiredColumn {
                table: "notes",
                column,
            });
        }
    }

    Ok(())
}

fn table_exists(conn: &Connection, table: &str) -> RepoResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [table],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

fn table_has_column(conn: &Connection, table: &str, column: &str) -> RepoResult<bool> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({table});"))?;
    let mut rows = stmt.query([])?;
    while let Some(row) = rows.next()? {
        let current: String = row.get(1)?;
        if current == column {
            return Ok(true);
        }
    }
    Ok(false)
}

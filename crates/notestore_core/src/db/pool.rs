//! Shared SQLite connection pool.
//!
//! # Responsibility
//! - Own the process-wide set of store connections as an explicit handle.
//! - Hand out one connection per unit of work; release happens on drop.
//!
//! # Invariants
//! - Every pooled connection is configured like `open_db` connections.
//! - Migrations run once, before the pool is returned to callers.

use super::migrations::apply_migrations;
use super::open::configure_connection;
use super::{DbError, DbResult};
use log::{error, info};
use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;
use std::path::Path;
use std::time::Instant;

/// Pool of configured, migrated SQLite connections.
pub type DbPool = Pool<SqliteConnectionManager>;

/// Builds a connection pool over a SQLite database file.
///
/// `max_size` is clamped to at least one connection.
///
/// # Errors
/// - Returns `DbError::Pool` when no connection can be established.
/// - Returns migration errors unchanged (including unsupported versions).
pub fn open_pool(path: impl AsRef<Path>, max_size: u32) -> DbResult<DbPool> {
    let started_at = Instant::now();
    let max_size = max_size.max(1);
    info!("event=db_pool_open module=db status=start max_size={max_size}");

    let result = build_pool(path.as_ref(), max_size);
    match &result {
        Ok(_) => info!(
            "event=db_pool_open module=db status=ok max_size={} duration_ms={}",
            max_size,
            started_at.elapsed().as_millis()
        ),
        Err(err) => error!(
            "event=db_pool_open module=db status=error max_size={} duration_ms={} error={}",
            max_size,
            started_at.elapsed().as_millis(),
            err
        ),
    }
    result
}

fn build_pool(path: &Path, max_size: u32) -> DbResult<DbPool> {
    let manager = SqliteConnectionManager::file(path).with_init(|conn| configure_connection(conn));
    let pool = Pool::builder()
        .max_size(max_size)
        .build(manager)
        .map_err(DbError::Pool)?;

    let mut conn = pool.get()?;
    apply_migrations(&mut conn)?;
    Ok(pool)
}

//! Connection bootstrap for slot storage.
//!
//! # Responsibility
//! - Open file or in-memory connections.
//! - Apply pragmas and migrations before handing out a usable connection.
//!
//! # Invariants
//! - Returned connections have all migrations applied.
//! - Bootstrap outcome is logged as a `db_open` event, success or failure.

use std::path::Path;
use std::time::{Duration, Instant};

use log::{error, info};
use rusqlite::Connection;

use super::migrations::apply_migrations;
use super::DbResult;

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Opens the database file at `path` and prepares it for slot storage.
pub fn open_db(path: impl AsRef<Path>) -> DbResult<Connection> {
    bootstrap("file", || Connection::open(path.as_ref()))
}

/// Opens a fresh in-memory database prepared for slot storage.
///
/// Used by tests and smoke tooling; contents vanish with the connection.
pub fn open_db_in_memory() -> DbResult<Connection> {
    bootstrap("memory", Connection::open_in_memory)
}

fn bootstrap(
    mode: &str,
    open: impl FnOnce() -> rusqlite::Result<Connection>,
) -> DbResult<Connection> {
    let started_at = Instant::now();

    let outcome = open().map_err(Into::into).and_then(|mut conn| {
        conn.busy_timeout(BUSY_TIMEOUT)?;
        apply_migrations(&mut conn)?;
        Ok(conn)
    });

    match &outcome {
        Ok(_) => info!(
            "event=db_open module=db status=ok mode={mode} duration_ms={}",
            started_at.elapsed().as_millis()
        ),
        Err(err) => error!(
            "event=db_open module=db status=error mode={mode} duration_ms={} error={err}",
            started_at.elapsed().as_millis()
        ),
    }

    outcome
}

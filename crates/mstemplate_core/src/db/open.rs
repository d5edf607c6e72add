//! SQLite connection opening.
//!
//! Every connection handed out here has the busy timeout set and the
//! schema migrated to the latest version.

use super::migrations::apply_migrations;
use super::DbResult;
use log::{error, info};
use rusqlite::Connection;
use std::path::Path;
use std::time::{Duration, Instant};

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, Copy)]
enum Target<'a> {
    File(&'a Path),
    Memory,
}

impl Target<'_> {
    fn label(self) -> &'static str {
        match self {
            Target::File(_) => "file",
            Target::Memory => "memory",
        }
    }

    fn connect(self) -> rusqlite::Result<Connection> {
        match self {
            Target::File(path) => Connection::open(path),
            Target::Memory => Connection::open_in_memory(),
        }
    }
}

/// Opens (or creates) the database file at `path`.
///
/// Logs one `db_open` event with the outcome and elapsed time.
pub fn open_db(path: impl AsRef<Path>) -> DbResult<Connection> {
    open(Target::File(path.as_ref()))
}

/// Opens a private in-memory database, mostly for tests and demos.
pub fn open_db_in_memory() -> DbResult<Connection> {
    open(Target::Memory)
}

fn open(target: Target<'_>) -> DbResult<Connection> {
    let started_at = Instant::now();
    let result = target
        .connect()
        .map_err(Into::into)
        .and_then(|mut conn| prepare(&mut conn).map(|()| conn));
    let elapsed_ms = started_at.elapsed().as_millis();

    match &result {
        Ok(_) => info!(
            "event=db_open module=db status=ok mode={} duration_ms={}",
            target.label(),
            elapsed_ms
        ),
        Err(err) => error!(
            "event=db_open module=db status=error mode={} duration_ms={} error={}",
            target.label(),
            elapsed_ms,
            err
        ),
    }
    result
}

fn prepare(conn: &mut Connection) -> DbResult<()> {
    conn.busy_timeout(BUSY_TIMEOUT)?;
    apply_migrations(conn)
}

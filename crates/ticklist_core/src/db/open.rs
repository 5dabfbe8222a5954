//! Connection bootstrap utilities for SQLite.
//!
//! # Responsibility
//! - Open file or in-memory SQLite connections.
//! - Configure connection pragmas required by core behavior.
//! - Create the `slots` table before returning a usable connection.
//!
//! # Invariants
//! - Returned connections have `foreign_keys=ON`.
//! - Returned connections have the slot schema in place.
//!
//! # See also
//! - docs/architecture/data-model.md

use super::DbResult;
use log::{error, info};
use rusqlite::Connection;
use std::path::Path;
use std::time::{Duration, Instant};

/// Single keyed cell per stored payload. `updated_at` is epoch
/// milliseconds, touched on every save.
const SLOT_SCHEMA_SQL: &str = "CREATE TABLE IF NOT EXISTS slots (
    key TEXT PRIMARY KEY NOT NULL,
    value TEXT NOT NULL,
    updated_at INTEGER NOT NULL DEFAULT (strftime('%s', 'now') * 1000)
);";

/// Opens a SQLite database file and prepares the slot schema.
///
/// # Side effects
/// - Performs connection bootstrap (pragmas + schema).
/// - Emits `db_open` logging events with duration and status.
pub fn open_db(path: impl AsRef<Path>) -> DbResult<Connection> {
    finish_open("file", Connection::open(path))
}

/// Opens an in-memory SQLite database and prepares the slot schema.
///
/// Used by tests and by hosts that want session-only storage.
pub fn open_db_in_memory() -> DbResult<Connection> {
    finish_open("memory", Connection::open_in_memory())
}

fn finish_open(mode: &str, opened: rusqlite::Result<Connection>) -> DbResult<Connection> {
    let started_at = Instant::now();
    info!("event=db_open module=db status=start mode={mode}");

    let conn = match opened {
        Ok(conn) => conn,
        Err(err) => {
            error!(
                "event=db_open module=db status=error mode={mode} duration_ms={} error_code=db_open_failed error={err}",
                started_at.elapsed().as_millis()
            );
            return Err(err.into());
        }
    };

    match bootstrap_connection(&conn) {
        Ok(()) => {
            info!(
                "event=db_open module=db status=ok mode={mode} duration_ms={}",
                started_at.elapsed().as_millis()
            );
            Ok(conn)
        }
        Err(err) => {
            error!(
                "event=db_open module=db status=error mode={mode} duration_ms={} error_code=db_bootstrap_failed error={err}",
                started_at.elapsed().as_millis()
            );
            Err(err)
        }
    }
}

fn bootstrap_connection(conn: &Connection) -> DbResult<()> {
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    conn.busy_timeout(Duration::from_secs(5))?;
    conn.execute_batch(SLOT_SCHEMA_SQL)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::open_db_in_memory;

    #[test]
    fn bootstrap_creates_queryable_slots_table() {
        let conn = open_db_in_memory().unwrap();
        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM slots;", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 0);
    }

    #[test]
    fn bootstrap_is_idempotent_on_reuse() {
        let conn = open_db_in_memory().unwrap();
        conn.execute_batch(super::SLOT_SCHEMA_SQL).unwrap();
        conn.execute(
            "INSERT INTO slots (key, value) VALUES ('probe', '[]');",
            [],
        )
        .unwrap();
        let value: String = conn
            .query_row("SELECT value FROM slots WHERE key = 'probe';", [], |row| {
                row.get(0)
            })
            .unwrap();
        assert_eq!(value, "[]");
    }
}

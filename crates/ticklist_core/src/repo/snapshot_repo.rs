//! Snapshot persistence port and SQLite implementation.
//!
//! # Responsibility
//! - Provide the keyed load/save contract over single-slot storage.
//! - Keep SQL details inside the core persistence boundary.
//!
//! # Invariants
//! - `save` overwrites the full slot value atomically; there is no partial
//!   update of a stored payload.
//! - Constructing a SQLite adapter validates the `slots` schema instead of
//!   failing later on first use.
//!
//! # See also
//! - docs/architecture/data-model.md

use crate::db::DbError;
use rusqlite::{params, Connection};
use std::collections::HashSet;
use std::error::Error;
use std::fmt::{Display, Formatter};

const SLOTS_TABLE: &str = "slots";
const REQUIRED_SLOT_COLUMNS: &[&str] = &["key", "value", "updated_at"];

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for slot persistence operations.
#[derive(Debug)]
pub enum RepoError {
    Db(DbError),
    MissingRequiredTable(&'static str),
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::MissingRequiredTable(table) => {
                write!(f, "connection is missing required table `{table}`")
            }
            Self::MissingRequiredColumn { table, column } => {
                write!(f, "table `{table}` is missing required column `{column}`")
            }
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::MissingRequiredTable(_) => None,
            Self::MissingRequiredColumn { .. } => None,
        }
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

/// Persistence port for snapshot payloads.
///
/// The store depends only on this trait; hosts embedding the core can
/// bridge it to whatever keyed storage they own. Implementations move
/// opaque strings and must not inspect payload contents.
pub trait SnapshotRepository {
    /// Reads the payload stored under `key`, `None` when the slot is empty.
    fn load(&self, key: &str) -> RepoResult<Option<String>>;

    /// Overwrites the slot under `key` with `payload`.
    fn save(&self, key: &str, payload: &str) -> RepoResult<()>;
}

/// SQLite-backed slot repository.
pub struct SqliteSnapshotRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteSnapshotRepository<'conn> {
    /// Wraps a bootstrapped connection after validating the slot schema.
    ///
    /// # Errors
    /// - [`RepoError::MissingRequiredTable`] when `slots` does not exist.
    /// - [`RepoError::MissingRequiredColumn`] when the table predates the
    ///   expected shape.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        validate_slot_schema(conn)?;
        Ok(Self { conn })
    }
}

impl SnapshotRepository for SqliteSnapshotRepository<'_> {
    fn load(&self, key: &str) -> RepoResult<Option<String>> {
        let mut stmt = self
            .conn
            .prepare("SELECT value FROM slots WHERE key = ?1;")?;
        let mut rows = stmt.query([key])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(row.get(0)?));
        }
        Ok(None)
    }

    fn save(&self, key: &str, payload: &str) -> RepoResult<()> {
        self.conn.execute(
            "INSERT INTO slots (key, value, updated_at)
             VALUES (?1, ?2, (strftime('%s', 'now') * 1000))
             ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = (strftime('%s', 'now') * 1000);",
            params![key, payload],
        )?;
        Ok(())
    }
}

fn validate_slot_schema(conn: &Connection) -> RepoResult<()> {
    let table_count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = ?1;",
        [SLOTS_TABLE],
        |row| row.get(0),
    )?;
    if table_count == 0 {
        return Err(RepoError::MissingRequiredTable(SLOTS_TABLE));
    }

    let mut stmt = conn.prepare("SELECT name FROM pragma_table_info(?1);")?;
    let present: HashSet<String> = stmt
        .query_map([SLOTS_TABLE], |row| row.get::<_, String>(0))?
        .collect::<Result<_, _>>()?;
    for &column in REQUIRED_SLOT_COLUMNS {
        if !present.contains(column) {
            return Err(RepoError::MissingRequiredColumn {
                table: SLOTS_TABLE,
                column,
            });
        }
    }

    Ok(())
}

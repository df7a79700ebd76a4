//! Entity stores for the catalog.
//!
//! # Responsibility
//! - Define one store contract per entity kind and its SQLite implementation.
//! - Keep SQL details and relationship bookkeeping inside this boundary.
//! - Provide the transaction scope services use to make multi-step writes
//!   atomic.
//!
//! # Invariants
//! - Stores never validate business rules; they persist what they are given.
//! - Reflected book lists are loaded by explicit queries on every read.
//! - Deletes are idempotent at this layer.

use crate::db::migrations::latest_version;
use crate::db::DbError;
use crate::model::EntityKind;
use rusqlite::{Connection, Transaction, TransactionBehavior};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod author_repo;
pub mod book_repo;
pub mod owner_repo;

pub type RepoResult<T> = Result<T, RepoError>;

/// Store-level error.
#[derive(Debug)]
pub enum RepoError {
    Db(DbError),
    /// Exact-replace update targeted an id with no row.
    NotFound { kind: EntityKind, id: i64 },
    /// Persisted data cannot be converted to the read model.
    InvalidData(String),
    /// Connection schema is not at the expected migrated version.
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    MissingRequiredTable(&'static str),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound { kind, id } => write!(f, "{kind} not found: {id}"),
            Self::InvalidData(message) => write!(f, "invalid catalog data: {message}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "catalog store requires schema version {expected_version}, got {actual_version}"
            ),
            Self::MissingRequiredTable(table) => {
                write!(f, "catalog store requires table `{table}`")
            }
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            _ => None,
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

/// Runs a unit of work atomically against the store's connection.
///
/// Work started while a transaction is already open joins it; otherwise an
/// immediate transaction is begun, committed on `Ok` and rolled back on `Err`.
pub trait TransactionScope {
    fn atomically<T, E, F>(&self, op: F) -> Result<T, E>
    where
        F: FnOnce() -> Result<T, E>,
        E: From<RepoError>;
}

pub(crate) fn run_atomically<T, E, F>(conn: &Connection, op: F) -> Result<T, E>
where
    F: FnOnce() -> Result<T, E>,
    E: From<RepoError>,
{
    if !conn.is_autocommit() {
        return op();
    }

    let tx = Transaction::new_unchecked(conn, TransactionBehavior::Immediate)
        .map_err(RepoError::from)?;
    // Dropping `tx` without commit rolls back.
    let value = op()?;
    tx.commit().map_err(RepoError::from)?;
    Ok(value)
}

const REQUIRED_TABLES: [&str; 5] = [
    "authors",
    "categories",
    "publishers",
    "books",
    "book_authors",
];

pub(crate) fn ensure_catalog_connection_ready(conn: &Connection) -> RepoResult<()> {
    let expected_version = latest_version();
    let actual_version: u32 = conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?;
    if actual_version != expected_version {
        return Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version,
        });
    }

    for table in REQUIRED_TABLES {
        let exists: i64 = conn.query_row(
            "SELECT EXISTS(
                SELECT 1
                FROM sqlite_master
                WHERE type = 'table' AND name = ?1
            );",
            [table],
            |row| row.get(0),
        )?;
        if exists != 1 {
            return Err(RepoError::MissingRequiredTable(table));
        }
    }

    Ok(())
}

/// Collects a single integer column, e.g. book ids linked to a parent row.
pub(crate) fn query_ids(conn: &Connection, sql: &str, key: i64) -> RepoResult<Vec<i64>> {
    let mut stmt = conn.prepare(sql)?;
    let mut rows = stmt.query([key])?;
    let mut ids = Vec::new();
    while let Some(row) = rows.next()? {
        ids.push(row.get(0)?);
    }
    Ok(ids)
}

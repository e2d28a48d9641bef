//! Repository contracts and SQLite implementations.
//!
//! # Responsibility
//! - One repository per entity table, each behind a trait so services can
//!   be wired to SQLite or to test fakes.
//! - Keep SQL and row parsing inside the persistence boundary.
//!
//! # Invariants
//! - Write paths call the payload `validate()` before any SQL mutation.
//! - Update/delete on an absent id return `RepoError::NotFound`.
//! - Repositories check existence only for their own table; cross-entity
//!   reference checks belong to services.
//! - Read paths reject malformed persisted rows instead of masking them.

use crate::db::DbError;
use crate::model::id::RecordId;
use crate::model::validation::ValidationError;
use rusqlite::Connection;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod area_repo;
pub mod department_repo;
pub mod employee_repo;
pub mod manager_repo;

/// SQL expression for "now" in epoch milliseconds; matches column defaults.
pub(crate) const NOW_EPOCH_MS_SQL: &str =
    "CAST((julianday('now') - 2440587.5) * 86400000 AS INTEGER)";

/// Upper bound on ids bound into one `IN (...)` lookup.
pub(crate) const MAX_IDS_PER_QUERY: usize = 500;

pub type RepoResult<T> = Result<T, RepoError>;

/// Persistence error shared by all entity repositories.
#[derive(Debug)]
pub enum RepoError {
    Validation(ValidationError),
    Db(DbError),
    NotFound(RecordId),
    /// Persisted row cannot be converted to a valid record.
    InvalidData(String),
    /// Connection was not migrated to a schema containing this table.
    MissingRequiredTable(&'static str),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "record not found: {id}"),
            Self::InvalidData(message) => write!(f, "invalid persisted data: {message}"),
            Self::MissingRequiredTable(table) => {
                write!(f, "repository requires table `{table}`")
            }
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::NotFound(_) | Self::InvalidData(_) | Self::MissingRequiredTable(_) => None,
        }
    }
}

impl From<ValidationError> for RepoError {
    fn from(value: ValidationError) -> Self {
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

/// Fails fast when a connection lacks one of `tables`.
pub(crate) fn ensure_tables(conn: &Connection, tables: &[&'static str]) -> RepoResult<()> {
    for &table in tables {
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

/// Parses a persisted id column value.
pub(crate) fn parse_stored_id(value: &str, column: &str) -> RepoResult<RecordId> {
    RecordId::parse(value)
        .map_err(|_| RepoError::InvalidData(format!("invalid id value `{value}` in {column}")))
}

/// Maps `changed == 0` from an UPDATE/DELETE to `NotFound`.
pub(crate) fn expect_changed(changed: usize, id: RecordId) -> RepoResult<()> {
    if changed == 0 {
        return Err(RepoError::NotFound(id));
    }
    Ok(())
}

/// `?, ?, ?` for an `IN (...)` list of `count` ids.
pub(crate) fn id_placeholders(count: usize) -> String {
    vec!["?"; count].join(", ")
}

//! Repository Module
//!
//! Free async functions over SQLite. Single-statement functions accept any
//! executor (`&SqlitePool` or `&mut *tx`); multi-statement functions take a
//! `&mut SqliteConnection` so callers decide the transaction boundary.

pub mod dining_table;
pub mod menu_item;
pub mod order;
pub mod user;

use thiserror::Error;

/// SQLite extended result codes that mean "try again later"
const SQLITE_BUSY_CODES: &[&str] = &["5", "6", "261", "517", "262"];

/// Repository error types
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Duplicate: {0}")]
    Duplicate(String),

    #[error("Foreign key violation: {0}")]
    ForeignKey(String),

    #[error("Database error: {0}")]
    Database(sqlx::Error),
}

impl RepoError {
    /// Whether the failure is lock contention or a connectivity problem
    pub fn is_transient(&self) -> bool {
        match self {
            RepoError::Database(sqlx::Error::PoolTimedOut)
            | RepoError::Database(sqlx::Error::PoolClosed)
            | RepoError::Database(sqlx::Error::Io(_)) => true,
            RepoError::Database(sqlx::Error::Database(db)) => db
                .code()
                .is_some_and(|code| SQLITE_BUSY_CODES.contains(&code.as_ref())),
            _ => false,
        }
    }
}

impl From<sqlx::Error> for RepoError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db) = &err {
            if db.is_unique_violation() {
                return RepoError::Duplicate(db.message().to_string());
            }
            if db.is_foreign_key_violation() {
                return RepoError::ForeignKey(db.message().to_string());
            }
        }
        RepoError::Database(err)
    }
}

/// Result type for repository operations
pub type RepoResult<T> = Result<T, RepoError>;

//! Repository Module
//!
//! Flat per-entity modules of async functions over SQLite executors.
//! Functions take `impl sqlx::Executor` so callers can pass either the
//! pool or an open transaction; multi-statement operations take
//! `&mut SqliteConnection` and are meant to run inside a transaction.

// Catalog (read-only from the engine's perspective)
pub mod product;
pub mod voucher;

// Identity & loyalty ledger
pub mod customer;

// Location
pub mod dining_table;

// Orders
pub mod order;

use thiserror::Error;

/// Repository error types
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Duplicate: {0}")]
    Duplicate(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Validation error: {0}")]
    Validation(String),
}

impl From<sqlx::Error> for RepoError {
    fn from(err: sqlx::Error) -> Self {
        RepoError::Database(err.to_string())
    }
}

/// Result type for repository operations
pub type RepoResult<T> = Result<T, RepoError>;

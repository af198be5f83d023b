//! Custom error types for the common library
//!
//! This module defines the infrastructure-level error types used
//! throughout the marketplace service.

use mongodb::error::{Error as MongoError, ErrorKind, WriteFailure};
use thiserror::Error;

/// Custom error type for document-store operations
#[derive(Error, Debug)]
pub enum DatabaseError {
    /// Error occurred while connecting to the store
    #[error("Database connection error: {0}")]
    Connection(#[source] MongoError),

    /// Error occurred while executing a query or update
    #[error("Database query error: {0}")]
    Query(#[source] MongoError),

    /// A write violated a unique index
    #[error("Duplicate key for unique index")]
    DuplicateKey,

    /// Configuration error
    #[error("Database configuration error: {0}")]
    Configuration(String),
}

impl From<MongoError> for DatabaseError {
    fn from(err: MongoError) -> Self {
        if is_duplicate_key_error(&err) {
            DatabaseError::DuplicateKey
        } else {
            DatabaseError::Query(err)
        }
    }
}

/// Whether the driver error is a unique-index violation (server code 11000)
pub fn is_duplicate_key_error(err: &MongoError) -> bool {
    matches!(
        err.kind.as_ref(),
        ErrorKind::Write(WriteFailure::WriteError(write_error)) if write_error.code == 11000
    )
}

/// Type alias for Result with DatabaseError
pub type DatabaseResult<T> = Result<T, DatabaseError>;

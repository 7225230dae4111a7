//! Error handling for bookkeeper-store
//!
//! Maps rusqlite failures into the core error taxonomy. The variant depends
//! on the phase the failure happened in, not on the SQLite error code.

use bookkeeper_core::errors::BookkeeperError;

/// Result type alias using BookkeeperError
pub type Result<T> = std::result::Result<T, BookkeeperError>;

/// The location could not be opened or a connection pragma failed
pub fn persistence(operation: &str, err: rusqlite::Error) -> BookkeeperError {
    BookkeeperError::Persistence {
        message: format!("{}: {}", operation, err),
    }
}

/// The store rejected the table definition
pub fn schema(table: &str, err: rusqlite::Error) -> BookkeeperError {
    BookkeeperError::Schema {
        table: table.to_string(),
        message: err.to_string(),
    }
}

/// The store rejected an insert, update or delete
pub fn constraint(table: &str, err: rusqlite::Error) -> BookkeeperError {
    BookkeeperError::Constraint {
        table: table.to_string(),
        message: err.to_string(),
    }
}

/// The store rejected a select
pub fn query(table: &str, err: rusqlite::Error) -> BookkeeperError {
    BookkeeperError::Query {
        table: table.to_string(),
        message: err.to_string(),
    }
}

//! Bookkeeper Store - SQLite persistence for typed entities
//!
//! Provides:
//! - Connection management with configurable pragmas
//! - Table schema derivation from an entity's field descriptor
//! - A generic repository with create-if-absent, insert, fetch, filtered
//!   listing, update, delete and delete-all

pub mod db;
pub mod errors;
pub mod repo;

// Re-export key types
pub use db::{ConnectionOptions, JournalMode};
pub use errors::Result;
pub use repo::SqliteRepository;

//! Bookkeeper Core - entity contract and repository abstractions
//!
//! This crate provides:
//! - The `Entity` contract: a statically declared field descriptor plus
//!   keyword-style construction from a `Record`
//! - Semantic field types and store-independent `Value`s
//! - The abstract `Repository<T>` contract and its equality `Filter`
//! - An in-memory repository with the same semantics as the SQLite one
//! - Bookkeeping domain models (categories, expenses, budgets)
//! - Error and structured logging facilities shared by the other crates

pub mod errors;
pub mod logging_facility;
pub mod memory_repo;
pub mod model;
pub mod repository;

// Re-export commonly used types
pub use errors::{BookkeeperError, ExError, ExErrorKind, Result};
pub use memory_repo::MemoryRepository;
pub use model::{Budget, Category, Entity, Expense, FieldDef, FieldType, Pk, Record, Value};
pub use repository::{Filter, Repository};

// Paths used by the logging macros
#[doc(hidden)]
pub mod __private {
    pub use bookkeeper_core_types::schema;
    pub use tracing;
}

//! Repository layer mapping entities onto SQLite tables
//!
//! - `schema`: descriptor validation and statement templates
//! - `hydration`: value conversion and row reading
//! - `sqlite_repo`: the repository itself

pub mod hydration;
pub mod schema;
pub mod sqlite_repo;

pub use schema::TableSchema;
pub use sqlite_repo::SqliteRepository;

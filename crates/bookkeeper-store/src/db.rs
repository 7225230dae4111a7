//! Database connection management
//!
//! Every repository call opens its own connection through [`open`], which
//! also applies the configured [`ConnectionOptions`].

use crate::errors::{persistence, Result};
use rusqlite::Connection;
use std::path::Path;
use std::time::Duration;

/// SQLite journal mode applied to each connection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JournalMode {
    /// Leave SQLite's rollback journal default untouched
    #[default]
    Delete,
    /// Write-ahead log; persists in the database file once set
    Wal,
}

/// Per-connection settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionOptions {
    pub foreign_keys: bool,
    pub busy_timeout: Duration,
    pub journal_mode: JournalMode,
}

impl Default for ConnectionOptions {
    fn default() -> Self {
        Self {
            foreign_keys: true,
            busy_timeout: Duration::from_secs(5),
            journal_mode: JournalMode::Delete,
        }
    }
}

impl ConnectionOptions {
    pub fn with_journal_mode(mut self, journal_mode: JournalMode) -> Self {
        self.journal_mode = journal_mode;
        self
    }

    pub fn with_busy_timeout(mut self, busy_timeout: Duration) -> Self {
        self.busy_timeout = busy_timeout;
        self
    }

    pub fn with_foreign_keys(mut self, foreign_keys: bool) -> Self {
        self.foreign_keys = foreign_keys;
        self
    }
}

/// Open a SQLite database at the given path and configure it
pub fn open<P: AsRef<Path>>(path: P, options: &ConnectionOptions) -> Result<Connection> {
    let conn = Connection::open(path).map_err(|e| persistence("open", e))?;
    configure(&conn, options)?;
    Ok(conn)
}

/// Apply `options` to an open connection
pub fn configure(conn: &Connection, options: &ConnectionOptions) -> Result<()> {
    conn.busy_timeout(options.busy_timeout)
        .map_err(|e| persistence("busy_timeout", e))?;

    conn.pragma_update(None, "foreign_keys", options.foreign_keys)
        .map_err(|e| persistence("foreign_keys", e))?;

    if options.journal_mode == JournalMode::Wal {
        // journal_mode answers with the mode now in effect
        conn.pragma_update_and_check(None, "journal_mode", "WAL", |row| {
            row.get::<_, String>(0)
        })
        .map_err(|e| persistence("journal_mode", e))?;
    }

    Ok(())
}

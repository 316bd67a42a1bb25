use std::path::Path;

use rusqlite::Connection;
use tracing::debug;

use super::error::StoreError;
use super::migrations::run_migrations;

/// Handle to the track database. Owned by the UI thread; not shared.
pub struct Library {
    pub(super) conn: Connection,
}

impl Library {
    /// Open (or create) the database at `path` and bring its schema up to date.
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(path)?;
        run_migrations(&conn)?;
        debug!(path = %path.display(), "opened library");

        Ok(Self { conn })
    }

    /// A throwaway library that lives only as long as the handle.
    #[cfg(test)]
    pub fn open_in_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory()?;
        run_migrations(&conn)?;
        Ok(Self { conn })
    }

    /// Run raw SQL against the database, for tests that need to shape it.
    #[cfg(test)]
    pub fn execute_batch(&self, sql: &str) -> Result<(), StoreError> {
        self.conn.execute_batch(sql)?;
        Ok(())
    }
}

use rusqlite::Connection;

use super::error::StoreError;

const SCHEMA_VERSION: i32 = 1;

pub(super) fn run_migrations(conn: &Connection) -> Result<(), StoreError> {
    let version: i32 = conn.query_row("PRAGMA user_version", [], |row| row.get(0))?;

    if version < 1 {
        conn.execute_batch(
            "BEGIN;
            CREATE TABLE IF NOT EXISTS tracks (
                id TEXT PRIMARY KEY,
                title TEXT NOT NULL,
                artist TEXT NOT NULL,
                duration_us INTEGER NOT NULL,
                path TEXT UNIQUE NOT NULL,
                date_added TEXT NOT NULL
            );
            CREATE INDEX IF NOT EXISTS idx_tracks_date_added ON tracks(date_added);
            COMMIT;",
        )?;
    }

    if version < SCHEMA_VERSION {
        conn.pragma_update(None, "user_version", SCHEMA_VERSION)?;
    }

    Ok(())
}

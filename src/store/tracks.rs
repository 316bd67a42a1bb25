use std::path::PathBuf;
use std::time::Duration;

use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::params;
use uuid::Uuid;

use crate::library::Track;

use super::connection::Library;
use super::error::StoreError;

/// Column values as read from SQLite, before validation.
struct TrackRow {
    id: String,
    title: String,
    artist: String,
    duration_us: i64,
    path: String,
    date_added: String,
}

impl TrackRow {
    fn into_track(self) -> Result<Track, StoreError> {
        let id = Uuid::parse_str(&self.id)
            .map_err(|e| StoreError::Corrupt(format!("id {:?}: {e}", self.id)))?;
        let date_added = DateTime::parse_from_rfc3339(&self.date_added)
            .map_err(|e| StoreError::Corrupt(format!("date_added {:?}: {e}", self.date_added)))?
            .with_timezone(&Utc);

        Ok(Track {
            id,
            title: self.title,
            artist: self.artist,
            duration: Duration::from_micros(self.duration_us.max(0) as u64),
            path: PathBuf::from(self.path),
            date_added,
        })
    }
}

impl Library {
    /// Insert `track`. Returns `false` when a track for the same file already exists.
    pub fn insert(&self, track: &Track) -> Result<bool, StoreError> {
        let duration_us = i64::try_from(track.duration.as_micros()).unwrap_or(i64::MAX);
        let changed = self.conn.execute(
            "INSERT OR IGNORE INTO tracks (id, title, artist, duration_us, path, date_added)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                track.id.to_string(),
                track.title,
                track.artist,
                duration_us,
                track.path.to_string_lossy().into_owned(),
                track
                    .date_added
                    .to_rfc3339_opts(SecondsFormat::Micros, true),
            ],
        )?;
        Ok(changed == 1)
    }

    /// Delete the track with `id`. Returns `false` if there was no such track.
    pub fn delete(&self, id: Uuid) -> Result<bool, StoreError> {
        let changed = self
            .conn
            .execute("DELETE FROM tracks WHERE id = ?1", params![id.to_string()])?;
        Ok(changed > 0)
    }

    /// All tracks, oldest import first.
    pub fn query_all(&self) -> Result<Vec<Track>, StoreError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, title, artist, duration_us, path, date_added
             FROM tracks
             ORDER BY date_added, title COLLATE NOCASE",
        )?;

        let rows = stmt.query_map([], |row| {
            Ok(TrackRow {
                id: row.get(0)?,
                title: row.get(1)?,
                artist: row.get(2)?,
                duration_us: row.get(3)?,
                path: row.get(4)?,
                date_added: row.get(5)?,
            })
        })?;

        let mut tracks = Vec::new();
        for row in rows {
            tracks.push(row?.into_track()?);
        }
        Ok(tracks)
    }
}

use std::path::PathBuf;
use std::time::Duration;

use chrono::{DateTime, SubsecRound, Utc};
use uuid::Uuid;

/// A library record. Immutable once created; the store owns the persisted copy.
#[derive(Debug, Clone, PartialEq)]
pub struct Track {
    pub id: Uuid,
    pub title: String,
    pub artist: String,
    pub duration: Duration,
    pub path: PathBuf,
    pub date_added: DateTime<Utc>,
}

impl Track {
    /// Create a new record with a fresh id, stamped with the current time.
    pub fn new(
        title: impl Into<String>,
        artist: impl Into<String>,
        duration: Duration,
        path: impl Into<PathBuf>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            artist: artist.into(),
            duration,
            path: path.into(),
            // The store keeps microsecond precision.
            date_added: Utc::now().trunc_subsecs(6),
        }
    }
}

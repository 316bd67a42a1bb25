//! Error types for playback.

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

/// A track could not be opened for playback.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("cannot open {}: {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot decode {}: {reason}", path.display())]
    Decode { path: PathBuf, reason: String },

    /// The audio output itself is unavailable.
    #[error("audio output unavailable: {0}")]
    Output(String),
}

#[derive(Debug, Error)]
#[error("seek to {target:?} failed: {reason}")]
pub struct SeekError {
    pub target: Duration,
    pub reason: String,
}

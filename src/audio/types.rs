//! Session state and the small types shared across the audio subsystem.

use std::time::Duration;

use crate::library::Track;

/// Identifies one opened voice; never reused within a driver.
pub type VoiceId = u64;

/// Notifications sent by the engine from its own thread.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineEvent {
    /// The voice played to the end of its media.
    Finished(VoiceId),
}

/// Where the transport is, derived from the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportState {
    /// Nothing loaded.
    Empty,
    Playing,
    Paused,
    /// The loaded track reached its end; time is back at zero.
    Finished,
}

/// What is loaded, whether it plays, and where it is.
///
/// Only the transport driver writes these fields; everyone else reads.
#[derive(Debug, Clone)]
pub struct SessionState {
    pub(super) current_track: Option<Track>,
    pub(super) is_playing: bool,
    pub(super) current_time: Duration,
    pub(super) duration: Duration,
    pub(super) volume: f32,
}

impl Default for SessionState {
    fn default() -> Self {
        Self {
            current_track: None,
            is_playing: false,
            current_time: Duration::ZERO,
            duration: Duration::ZERO,
            volume: 1.0,
        }
    }
}

impl SessionState {
    pub fn current_track(&self) -> Option<&Track> {
        self.current_track.as_ref()
    }

    pub fn is_playing(&self) -> bool {
        self.is_playing
    }

    pub fn current_time(&self) -> Duration {
        self.current_time
    }

    /// Length reported by the engine for the loaded track.
    pub fn duration(&self) -> Duration {
        self.duration
    }

    pub fn volume(&self) -> f32 {
        self.volume
    }
}

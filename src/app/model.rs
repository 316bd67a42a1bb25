//! Application model: the library view, selection, import prompt and the
//! transient status line.
//!
//! `App` is driven from the UI thread and forwards transport gestures to the
//! `TransportDriver` it is handed.

use std::path::PathBuf;
use std::time::{Duration, Instant};

use tracing::{info, warn};

use crate::audio::{OutputEngine, TransportDriver};
use crate::config::LibrarySettings;
use crate::library::{self, Track, track_label};
use crate::store::{Library, StoreError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    Info,
    Error,
}

/// A message shown until `expires_at`.
#[derive(Debug, Clone)]
pub struct Status {
    pub kind: StatusKind,
    pub text: String,
    pub expires_at: Instant,
}

/// The main application model.
pub struct App {
    pub library: Library,
    pub tracks: Vec<Track>,
    pub selected: usize,
    /// Path being typed while the import prompt is open.
    pub prompt: Option<String>,
    pub status: Option<Status>,
    status_timeout: Duration,
}

impl App {
    /// Create an `App` over `library`, loading its current tracks.
    pub fn new(library: Library, status_timeout: Duration) -> Result<Self, StoreError> {
        let tracks = library.query_all()?;
        Ok(Self {
            library,
            tracks,
            selected: 0,
            prompt: None,
            status: None,
            status_timeout,
        })
    }

    /// Re-read the library and keep the selection in range.
    pub fn reload(&mut self) -> Result<(), StoreError> {
        self.tracks = self.library.query_all()?;
        if self.selected >= self.tracks.len() {
            self.selected = self.tracks.len().saturating_sub(1);
        }
        Ok(())
    }

    /// Return true if the library contains any tracks.
    pub fn has_tracks(&self) -> bool {
        !self.tracks.is_empty()
    }

    pub fn selected_track(&self) -> Option<&Track> {
        self.tracks.get(self.selected)
    }

    /// Move selection to the next track, wrapping to the first.
    pub fn next(&mut self) {
        if self.has_tracks() {
            self.selected = (self.selected + 1) % self.tracks.len();
        }
    }

    /// Move selection to the previous track, wrapping to the last.
    pub fn prev(&mut self) {
        if self.has_tracks() {
            self.selected = match self.selected {
                0 => self.tracks.len() - 1,
                i => i - 1,
            };
        }
    }

    pub fn select_first(&mut self) {
        self.selected = 0;
    }

    pub fn select_last(&mut self) {
        self.selected = self.tracks.len().saturating_sub(1);
    }

    pub fn set_status(&mut self, kind: StatusKind, text: impl Into<String>) {
        self.status = Some(Status {
            kind,
            text: text.into(),
            expires_at: Instant::now() + self.status_timeout,
        });
    }

    /// Drop the status message once its time is up.
    pub fn expire_status(&mut self, now: Instant) {
        if self.status.as_ref().is_some_and(|s| now >= s.expires_at) {
            self.status = None;
        }
    }

    /// Load the selected track into the driver.
    pub fn play_selected<E: OutputEngine>(&mut self, driver: &mut TransportDriver<E>) {
        let Some(track) = self.selected_track().cloned() else {
            return;
        };
        let label = track_label(&track);
        if let Err(err) = driver.load(track) {
            self.set_status(StatusKind::Error, format!("Can't play {label}: {err}"));
        }
    }

    pub fn toggle_playback<E: OutputEngine>(&mut self, driver: &mut TransportDriver<E>) {
        if let Err(err) = driver.toggle_play_pause() {
            self.set_status(StatusKind::Error, format!("Playback failed: {err}"));
        }
    }

    /// Seek relative to the current time, clamped into `[0, duration]`.
    pub fn seek_by<E: OutputEngine>(&mut self, driver: &mut TransportDriver<E>, delta_secs: i64) {
        let session = driver.session();
        if session.current_track().is_none() {
            return;
        }

        let current = session.current_time().as_secs_f64();
        let mut target = (current + delta_secs as f64).max(0.0);
        let duration = session.duration();
        if !duration.is_zero() {
            target = target.min(duration.as_secs_f64());
        }
        driver.seek(Duration::from_secs_f64(target));
    }

    pub fn nudge_volume<E: OutputEngine>(&mut self, driver: &mut TransportDriver<E>, delta: f32) {
        let volume = driver.session().volume() + delta;
        driver.set_volume(volume);
    }

    /// Remove the selected track from the library.
    ///
    /// If it is the loaded track, playback is stopped and the session cleared
    /// before the record goes away.
    pub fn delete_selected<E: OutputEngine>(&mut self, driver: &mut TransportDriver<E>) {
        let Some(track) = self.selected_track().cloned() else {
            return;
        };

        if driver.session().current_track().map(|t| t.id) == Some(track.id) {
            driver.pause();
            driver.eject();
        }

        match self.library.delete(track.id) {
            Ok(_) => {
                info!(track = %track_label(&track), "removed from library");
                self.set_status(StatusKind::Info, format!("Removed {}", track_label(&track)));
            }
            Err(err) => {
                warn!(error = %err, "delete failed");
                self.set_status(StatusKind::Error, format!("Can't remove track: {err}"));
                return;
            }
        }

        if let Err(err) = self.reload() {
            self.set_status(StatusKind::Error, format!("Can't read library: {err}"));
        }
    }

    /// Pick and import `inputs`, then refresh the list.
    pub fn import_paths(&mut self, inputs: &[PathBuf], settings: &LibrarySettings) {
        let picked = match library::pick(inputs, settings) {
            Ok(p) => p,
            Err(err) => {
                warn!(error = %err, "import selection failed");
                self.set_status(StatusKind::Error, format!("Import failed: {err}"));
                return;
            }
        };

        let report = match library::import(&picked, &self.library) {
            Ok(r) => r,
            Err(err) => {
                warn!(error = %err, "import failed");
                // Tracks stored before the failure stay; show them.
                if let Err(reload_err) = self.reload() {
                    warn!(error = %reload_err, "reload after failed import");
                }
                self.set_status(StatusKind::Error, format!("Import failed: {err}"));
                return;
            }
        };

        if let Err(err) = self.reload() {
            self.set_status(StatusKind::Error, format!("Can't read library: {err}"));
            return;
        }

        let mut text = format!("Added {} track(s)", report.added);
        if report.duplicates > 0 {
            text.push_str(&format!(", {} already in library", report.duplicates));
        }
        if report.probe_failures > 0 {
            text.push_str(&format!(", {} without duration", report.probe_failures));
        }
        self.set_status(StatusKind::Info, text);
    }

    pub fn open_prompt(&mut self) {
        self.prompt = Some(String::new());
    }

    pub fn close_prompt(&mut self) {
        self.prompt = None;
    }

    pub fn push_prompt_char(&mut self, c: char) {
        if let Some(p) = self.prompt.as_mut() {
            p.push(c);
        }
    }

    pub fn pop_prompt_char(&mut self) {
        if let Some(p) = self.prompt.as_mut() {
            p.pop();
        }
    }

    /// Close the prompt and import the path that was typed into it.
    pub fn submit_prompt(&mut self, settings: &LibrarySettings) {
        let Some(input) = self.prompt.take() else {
            return;
        };
        let Some(path) = prompt_path(&input) else {
            return;
        };
        self.import_paths(&[path], settings);
    }
}

/// Turn prompt input into a path: trims, strips matching quotes that terminals
/// add on drag-and-drop, and expands a leading `~/`.
pub(super) fn prompt_path(input: &str) -> Option<PathBuf> {
    let mut s = input.trim();
    for q in ['\'', '"'] {
        if s.len() >= 2 && s.starts_with(q) && s.ends_with(q) {
            s = &s[1..s.len() - 1];
        }
    }
    if s.is_empty() {
        return None;
    }

    if let Some(rest) = s.strip_prefix("~/") {
        if let Some(home) = std::env::var_os("HOME") {
            return Some(PathBuf::from(home).join(rest));
        }
    }
    Some(PathBuf::from(s))
}

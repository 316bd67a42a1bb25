use std::sync::mpsc::{self, Receiver, Sender};
use std::time::{Duration, Instant};

use tracing::{debug, info, warn};

use crate::library::{Track, track_label};

use super::engine::{OutputEngine, Voice};
use super::error::LoadError;
use super::sampler::Sampler;
use super::types::{EngineEvent, SessionState, TransportState, VoiceId};

/// Binds the session to a single engine voice and the position sampler.
///
/// Every method must be called from the thread that owns the driver. Engine
/// notifications are queued and only applied by [`TransportDriver::pump`].
pub struct TransportDriver<E: OutputEngine> {
    engine: E,
    session: SessionState,
    voice: Option<E::Voice>,
    /// The voice whose end-of-media notification is still expected.
    armed: Option<VoiceId>,
    finished: bool,
    next_voice: VoiceId,
    sampler: Sampler,
    events_tx: Sender<EngineEvent>,
    events_rx: Receiver<EngineEvent>,
}

impl<E: OutputEngine> TransportDriver<E> {
    pub fn new(engine: E, volume: f32, sample_interval: Duration) -> Self {
        let (events_tx, events_rx) = mpsc::channel();
        let mut driver = Self {
            engine,
            session: SessionState::default(),
            voice: None,
            armed: None,
            finished: false,
            next_voice: 0,
            sampler: Sampler::new(sample_interval),
            events_tx,
            events_rx,
        };
        driver.set_volume(volume);
        driver
    }

    pub fn session(&self) -> &SessionState {
        &self.session
    }

    pub fn state(&self) -> TransportState {
        match (&self.session.current_track, self.session.is_playing) {
            (None, _) => TransportState::Empty,
            (Some(_), true) => TransportState::Playing,
            (Some(_), false) if self.finished => TransportState::Finished,
            (Some(_), false) => TransportState::Paused,
        }
    }

    /// Replace whatever is loaded with `track` and start it from the beginning.
    ///
    /// The previous voice is released first. On failure the session is left
    /// empty and not playing.
    pub fn load(&mut self, track: Track) -> Result<(), LoadError> {
        self.release();

        let voice = match self.open_voice(&track) {
            Ok(voice) => voice,
            Err(err) => {
                warn!(track = %track_label(&track), error = %err, "load failed");
                self.clear_session();
                return Err(err);
            }
        };

        voice.set_volume(self.session.volume);
        voice.play();
        info!(track = %track_label(&track), path = %track.path.display(), "playing");

        self.session.duration = voice.duration().unwrap_or(track.duration);
        self.session.current_time = Duration::ZERO;
        self.session.current_track = Some(track);
        self.session.is_playing = true;
        self.voice = Some(voice);
        self.sampler.start(Instant::now());
        Ok(())
    }

    pub fn pause(&mut self) {
        if !self.session.is_playing {
            return;
        }
        let Some(voice) = self.voice.as_ref() else {
            return;
        };

        voice.pause();
        // Freeze on the exact cursor rather than the last tick.
        self.sample();
        self.session.is_playing = false;
        self.sampler.stop();
        debug!(at = ?self.session.current_time, "paused");
    }

    /// Continue from the current position. A finished track is reopened and,
    /// unless a seek moved the cursor, starts over from zero.
    pub fn resume(&mut self) -> Result<(), LoadError> {
        if self.session.is_playing {
            return Ok(());
        }
        if self.finished {
            return self.restart();
        }
        let Some(voice) = self.voice.as_ref() else {
            return Ok(());
        };

        voice.play();
        self.session.is_playing = true;
        self.sampler.start(Instant::now());
        debug!(at = ?self.session.current_time, "resumed");
        Ok(())
    }

    pub fn toggle_play_pause(&mut self) -> Result<(), LoadError> {
        if self.session.is_playing {
            self.pause();
            Ok(())
        } else {
            self.resume()
        }
    }

    /// Move the playback cursor to `to`. The caller clamps `to` into the
    /// track; the session shows the new time immediately.
    pub fn seek(&mut self, to: Duration) {
        let Some(voice) = self.voice.as_ref() else {
            return;
        };

        // A finished voice has drained its source; `restart` applies the time.
        if !self.finished {
            if let Err(err) = voice.seek(to) {
                warn!(error = %err, "seek failed");
            }
        }
        self.session.current_time = to;
    }

    /// Set the volume, clamped into `[0, 1]`. Non-finite values are ignored.
    pub fn set_volume(&mut self, volume: f32) {
        if !volume.is_finite() {
            return;
        }
        let volume = volume.clamp(0.0, 1.0);
        self.session.volume = volume;
        if let Some(voice) = self.voice.as_ref() {
            voice.set_volume(volume);
        }
    }

    /// Stop playback and forget the loaded track.
    pub fn eject(&mut self) {
        self.pause();
        if let Some(track) = self.session.current_track.as_ref() {
            info!(track = %track_label(track), "ejected");
        }
        self.clear_session();
    }

    /// Apply engine notifications queued since the last call.
    pub fn pump(&mut self) {
        while let Ok(event) = self.events_rx.try_recv() {
            match event {
                EngineEvent::Finished(id) => self.on_finished(id),
            }
        }
    }

    /// Sample the engine if the sampler is due at `now`.
    pub fn tick(&mut self, now: Instant) {
        if self.sampler.due(now) {
            self.sample();
        }
    }

    /// How long the caller may wait before the next `tick`; `None` when idle.
    pub fn next_tick_in(&self, now: Instant) -> Option<Duration> {
        self.sampler.time_until_due(now)
    }

    fn open_voice(&mut self, track: &Track) -> Result<E::Voice, LoadError> {
        let id = self.next_voice;
        self.next_voice += 1;

        let voice = self
            .engine
            .open(&track.path, id, self.events_tx.clone())?;
        self.armed = Some(id);
        self.finished = false;
        Ok(voice)
    }

    fn restart(&mut self) -> Result<(), LoadError> {
        let Some(track) = self.session.current_track.clone() else {
            return Ok(());
        };
        let resume_at = self.session.current_time;

        self.load(track)?;
        if !resume_at.is_zero() {
            self.seek(resume_at);
        }
        Ok(())
    }

    fn on_finished(&mut self, id: VoiceId) {
        if self.armed != Some(id) {
            debug!(voice = id, "ignoring finish from released voice");
            return;
        }

        self.armed = None;
        self.finished = true;
        self.session.is_playing = false;
        self.session.current_time = Duration::ZERO;
        self.sampler.stop();
        debug!(voice = id, "track finished");
    }

    fn sample(&mut self) {
        let Some(voice) = self.voice.as_ref() else {
            return;
        };

        if let Some(total) = voice.duration() {
            self.session.duration = total;
        }
        let position = voice.position();
        self.session.current_time = if self.session.duration.is_zero() {
            position
        } else {
            position.min(self.session.duration)
        };
    }

    fn release(&mut self) {
        self.sampler.stop();
        self.armed = None;
        if let Some(voice) = self.voice.take() {
            voice.stop();
        }
    }

    fn clear_session(&mut self) {
        self.release();
        self.finished = false;
        self.session.current_track = None;
        self.session.is_playing = false;
        self.session.current_time = Duration::ZERO;
        self.session.duration = Duration::ZERO;
    }
}

impl<E: OutputEngine> Drop for TransportDriver<E> {
    fn drop(&mut self) {
        self.release();
    }
}

//! The output engine seam and its `rodio` implementation.
//!
//! An engine opens one file at a time as a paused [`Voice`]. When the voice
//! plays to the end of its media the engine sends [`EngineEvent::Finished`]
//! from its own thread; it never touches session state itself.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::sync::Arc;
use std::sync::mpsc::Sender;
use std::thread;
use std::time::Duration;

use rodio::{Decoder, OutputStream, OutputStreamBuilder, Sink, Source};
use tracing::debug;

use super::error::{LoadError, SeekError};
use super::types::{EngineEvent, VoiceId};

/// Opens audio files for playback.
pub trait OutputEngine {
    type Voice: Voice;

    /// Open `path` as a paused voice. The engine must send
    /// `EngineEvent::Finished(id)` on `events` when the voice reaches its end.
    fn open(
        &mut self,
        path: &Path,
        id: VoiceId,
        events: Sender<EngineEvent>,
    ) -> Result<Self::Voice, LoadError>;
}

/// A single opened track.
pub trait Voice {
    fn play(&self);
    fn pause(&self);
    /// Stop for good and release the output. A stopped voice is not reused.
    fn stop(&self);
    fn seek(&self, to: Duration) -> Result<(), SeekError>;
    fn set_volume(&self, volume: f32);
    /// Playback cursor.
    fn position(&self) -> Duration;
    /// Total length, when the decoder can tell.
    fn duration(&self) -> Option<Duration>;
}

/// Engine backed by the default `rodio` output device.
pub struct RodioEngine {
    stream: OutputStream,
}

impl RodioEngine {
    pub fn new() -> Result<Self, LoadError> {
        let mut stream = OutputStreamBuilder::open_default_stream()
            .map_err(|e| LoadError::Output(e.to_string()))?;
        // rodio logs to stderr when OutputStream is dropped; the TUI owns the terminal.
        stream.log_on_drop(false);
        Ok(Self { stream })
    }
}

impl OutputEngine for RodioEngine {
    type Voice = RodioVoice;

    fn open(
        &mut self,
        path: &Path,
        id: VoiceId,
        events: Sender<EngineEvent>,
    ) -> Result<RodioVoice, LoadError> {
        let file = File::open(path).map_err(|source| LoadError::Open {
            path: path.to_path_buf(),
            source,
        })?;

        let source = Decoder::new(BufReader::new(file)).map_err(|e| LoadError::Decode {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        let total = source.total_duration();

        let sink = Sink::connect_new(self.stream.mixer());
        sink.pause();
        sink.append(source);
        let sink = Arc::new(sink);

        // `sleep_until_end` also returns once the sink is stopped; the driver
        // drops notifications for voices it has already released.
        let watcher = Arc::clone(&sink);
        thread::Builder::new()
            .name(format!("cadenza-voice-{id}"))
            .spawn(move || {
                watcher.sleep_until_end();
                debug!(voice = id, "voice drained");
                let _ = events.send(EngineEvent::Finished(id));
            })
            .map_err(|e| LoadError::Output(e.to_string()))?;

        Ok(RodioVoice { sink, total })
    }
}

pub struct RodioVoice {
    sink: Arc<Sink>,
    total: Option<Duration>,
}

impl Voice for RodioVoice {
    fn play(&self) {
        self.sink.play();
    }

    fn pause(&self) {
        self.sink.pause();
    }

    fn stop(&self) {
        self.sink.stop();
    }

    fn seek(&self, to: Duration) -> Result<(), SeekError> {
        self.sink.try_seek(to).map_err(|e| SeekError {
            target: to,
            reason: e.to_string(),
        })
    }

    fn set_volume(&self, volume: f32) {
        self.sink.set_volume(volume);
    }

    fn position(&self) -> Duration {
        self.sink.get_pos()
    }

    fn duration(&self) -> Option<Duration> {
        self.total
    }
}

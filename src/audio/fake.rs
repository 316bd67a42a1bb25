//! Scripted engine for driving `TransportDriver` in tests.

use std::cell::RefCell;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::sync::mpsc::Sender;
use std::time::Duration;

use super::*;

/// Observable state of one fake voice.
#[derive(Debug, Default)]
pub(crate) struct VoiceProbe {
    pub playing: bool,
    pub stopped: bool,
    pub position: Duration,
    pub volume: f32,
    pub seeks: Vec<Duration>,
}

pub(crate) struct FakeVoice {
    probe: Rc<RefCell<VoiceProbe>>,
    total: Option<Duration>,
}

impl Voice for FakeVoice {
    fn play(&self) {
        self.probe.borrow_mut().playing = true;
    }

    fn pause(&self) {
        self.probe.borrow_mut().playing = false;
    }

    fn stop(&self) {
        let mut p = self.probe.borrow_mut();
        p.playing = false;
        p.stopped = true;
    }

    fn seek(&self, to: Duration) -> Result<(), SeekError> {
        let mut p = self.probe.borrow_mut();
        p.seeks.push(to);
        p.position = to;
        Ok(())
    }

    fn set_volume(&self, volume: f32) {
        self.probe.borrow_mut().volume = volume;
    }

    fn position(&self) -> Duration {
        self.probe.borrow().position
    }

    fn duration(&self) -> Option<Duration> {
        self.total
    }
}

pub(crate) struct Opened {
    pub path: PathBuf,
    pub id: VoiceId,
    pub events: Sender<EngineEvent>,
    pub probe: Rc<RefCell<VoiceProbe>>,
}

impl Opened {
    /// Report natural end-of-media for this voice.
    pub fn finish(&self) {
        self.events.send(EngineEvent::Finished(self.id)).unwrap();
    }
}

pub(crate) type OpenLog = Rc<RefCell<Vec<Opened>>>;

/// Engine that "decodes" any path except those containing `missing`.
pub(crate) struct FakeEngine {
    total: Option<Duration>,
    log: OpenLog,
}

impl OutputEngine for FakeEngine {
    type Voice = FakeVoice;

    fn open(
        &mut self,
        path: &Path,
        id: VoiceId,
        events: Sender<EngineEvent>,
    ) -> Result<FakeVoice, LoadError> {
        if path.to_string_lossy().contains("missing") {
            return Err(LoadError::Open {
                path: path.to_path_buf(),
                source: std::io::Error::from(std::io::ErrorKind::NotFound),
            });
        }

        let probe = Rc::new(RefCell::new(VoiceProbe::default()));
        self.log.borrow_mut().push(Opened {
            path: path.to_path_buf(),
            id,
            events,
            probe: Rc::clone(&probe),
        });
        Ok(FakeVoice {
            probe,
            total: self.total,
        })
    }
}

pub(crate) fn driver_with(total: Option<Duration>) -> (TransportDriver<FakeEngine>, OpenLog) {
    let log: OpenLog = Rc::default();
    let engine = FakeEngine {
        total,
        log: Rc::clone(&log),
    };
    let driver = TransportDriver::new(engine, 1.0, Sampler::DEFAULT_INTERVAL);
    (driver, log)
}

pub(crate) fn driver() -> (TransportDriver<FakeEngine>, OpenLog) {
    driver_with(Some(Duration::from_secs(180)))
}

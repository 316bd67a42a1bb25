use std::time::{Duration, Instant};

/// Fixed-interval timer polled by the thread that owns the session.
///
/// It only runs while playback is active; the event loop asks it how long it
/// may block and calls [`Sampler::due`] once per iteration.
#[derive(Debug, Clone)]
pub struct Sampler {
    interval: Duration,
    next_due: Option<Instant>,
}

impl Sampler {
    /// About 30 samples per second.
    pub const DEFAULT_INTERVAL: Duration = Duration::from_millis(33);

    pub fn new(interval: Duration) -> Self {
        Self {
            interval: interval.max(Duration::from_millis(1)),
            next_due: None,
        }
    }

    pub fn start(&mut self, now: Instant) {
        self.next_due = Some(now + self.interval);
    }

    pub fn stop(&mut self) {
        self.next_due = None;
    }

    #[cfg(test)]
    pub fn is_running(&self) -> bool {
        self.next_due.is_some()
    }

    /// Returns `true` when a sample is due at `now` and schedules the next one.
    /// Ticks missed while the loop was busy collapse into a single sample.
    pub fn due(&mut self, now: Instant) -> bool {
        match self.next_due {
            Some(at) if now >= at => {
                let mut next = at + self.interval;
                if next <= now {
                    next = now + self.interval;
                }
                self.next_due = Some(next);
                true
            }
            _ => false,
        }
    }

    /// Time left until the next sample, or `None` when stopped.
    pub fn time_until_due(&self, now: Instant) -> Option<Duration> {
        self.next_due.map(|at| at.saturating_duration_since(now))
    }
}

impl Default for Sampler {
    fn default() -> Self {
        Self::new(Self::DEFAULT_INTERVAL)
    }
}

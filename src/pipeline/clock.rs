use std::time::Duration;

/// Source of the fixed waits in the pipeline: metadata backoff and playback frame holds.
pub trait Clock {
    /// Suspend the caller for `duration`.
    fn sleep(&mut self, duration: Duration);
}

impl<C: Clock + ?Sized> Clock for &mut C {
    fn sleep(&mut self, duration: Duration) {
        (**self).sleep(duration);
    }
}

/// Wall-clock waits via [`std::thread::sleep`].
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn sleep(&mut self, duration: Duration) {
        std::thread::sleep(duration);
    }
}

/// A clock that never blocks and records each requested wait.
#[derive(Clone, Debug, Default)]
pub struct RecordingClock {
    waits: Vec<Duration>,
}

impl RecordingClock {
    /// Create an empty recording clock.
    pub fn new() -> Self {
        Self::default()
    }

    /// Every wait requested so far, in order.
    pub fn waits(&self) -> &[Duration] {
        &self.waits
    }

    /// Sum of all requested waits.
    pub fn total(&self) -> Duration {
        self.waits.iter().sum()
    }
}

impl Clock for RecordingClock {
    fn sleep(&mut self, duration: Duration) {
        self.waits.push(duration);
    }
}

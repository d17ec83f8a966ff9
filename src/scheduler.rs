//! Frame dispatch and fixed-cadence clocks.
//!
//! The scheduler replaces "request the next frame, keep the cancel handle"
//! with a generation counter: every [`FrameScheduler::start`] issues a new
//! [`FrameHandle`], and [`FrameScheduler::stop`] invalidates all of them at
//! once. A tick carrying a stale handle is dropped.

/// Token identifying one activation of a [`FrameScheduler`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameHandle(u64);

#[derive(Debug, Clone, Default)]
pub struct FrameScheduler {
    generation: u64,
    running: bool,
}

impl FrameScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Begins a new activation, invalidating any earlier handle.
    pub fn start(&mut self) -> FrameHandle {
        self.generation += 1;
        self.running = true;
        FrameHandle(self.generation)
    }

    pub fn stop(&mut self) {
        if self.running {
            self.generation += 1;
            self.running = false;
        }
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn is_live(&self, handle: FrameHandle) -> bool {
        self.running && handle.0 == self.generation
    }
}

/// Remembers when a fixed-period activity last fired.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Cadence {
    last: Option<f64>,
}

impl Cadence {
    pub fn new() -> Self {
        Self::default()
    }

    /// Milliseconds since the last rebase. The first call records `now` and
    /// reports zero.
    pub fn elapsed(&mut self, now: f64) -> f64 {
        let last = *self.last.get_or_insert(now);
        now - last
    }

    pub fn rebase(&mut self, now: f64) {
        self.last = Some(now);
    }

    /// Returns the elapsed time and rebases when at least `period_ms` passed.
    pub fn poll(&mut self, now: f64, period_ms: f64) -> Option<f64> {
        let elapsed = self.elapsed(now);
        if elapsed >= period_ms {
            self.rebase(now);
            Some(elapsed)
        } else {
            None
        }
    }

    pub fn clear(&mut self) {
        self.last = None;
    }

    pub fn last(&self) -> Option<f64> {
        self.last
    }
}

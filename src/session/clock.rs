use std::time::{Duration, Instant};

/// Accumulates typing time, skipping gaps longer than `idle_gap`.
#[derive(Clone, Debug)]
pub struct ActiveClock {
    idle_gap: Duration,
    active: Duration,
    last_activity: Option<Instant>,
}

impl ActiveClock {
    pub fn new(idle_gap: Duration) -> Self {
        Self {
            idle_gap,
            active: Duration::ZERO,
            last_activity: None,
        }
    }

    pub fn record_activity(&mut self, now: Instant) {
        if let Some(last) = self.last_activity {
            let gap = now.saturating_duration_since(last);
            if gap <= self.idle_gap {
                self.active += gap;
            }
        }
        self.last_activity = Some(now);
    }

    /// The next activity starts a fresh interval.
    pub fn pause(&mut self) {
        self.last_activity = None;
    }

    pub fn reset(&mut self) {
        self.active = Duration::ZERO;
        self.last_activity = None;
    }

    pub fn active(&self) -> Duration {
        self.active
    }
}

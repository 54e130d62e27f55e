use std::time::{Duration, Instant};

/// Periodic position refresh, driven by the coordinator loop.
///
/// Starting an already-running timer restarts it; there is never more than
/// one pending tick.
#[derive(Debug)]
pub struct PositionTimer {
    interval: Duration,
    next_due: Option<Instant>,
}

impl PositionTimer {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            next_due: None,
        }
    }

    pub fn start(&mut self, now: Instant) {
        self.next_due = Some(now + self.interval);
    }

    pub fn stop(&mut self) {
        self.next_due = None;
    }

    pub fn is_active(&self) -> bool {
        self.next_due.is_some()
    }

    /// Returns true and schedules the next tick when a tick is due at `now`.
    pub fn fire_if_due(&mut self, now: Instant) -> bool {
        match self.next_due {
            Some(due) if now >= due => {
                self.next_due = Some(now + self.interval);
                true
            }
            _ => false,
        }
    }

    /// Time left until the next tick, if the timer is running.
    pub fn remaining(&self, now: Instant) -> Option<Duration> {
        self.next_due.map(|due| due.saturating_duration_since(now))
    }
}

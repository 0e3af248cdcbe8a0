use std::time::{Duration, Instant};

/// A cancellable repeating deadline. There is only ever one deadline, so
/// starting again replaces the old schedule instead of running beside it.
pub struct RepeatingTimer {
    interval: Duration,
    next_due: Option<Instant>,
}

impl RepeatingTimer {
    pub fn new(interval: Duration) -> Self {
        RepeatingTimer { interval, next_due: None }
    }

    /// Arms the timer, dropping any previous schedule.
    pub fn restart(&mut self, now: Instant) {
        self.cancel();
        self.next_due = Some(now + self.interval);
    }

    pub fn cancel(&mut self) {
        self.next_due = None;
    }

    pub fn is_active(&self) -> bool {
        self.next_due.is_some()
    }

    /// How long the caller may sleep before the next deadline.
    pub fn time_until_due(&self, now: Instant) -> Option<Duration> {
        self.next_due.map(|due| due.saturating_duration_since(now))
    }

    /// Consumes one deadline if it has passed. A late caller gets one tick,
    /// not a burst of catch-up ticks.
    pub fn poll(&mut self, now: Instant) -> bool {
        match self.next_due {
            Some(due) if now >= due => {
                let mut next = due + self.interval;
                if next <= now {
                    next = now + self.interval;
                }
                self.next_due = Some(next);
                true
            }
            _ => false,
        }
    }
}

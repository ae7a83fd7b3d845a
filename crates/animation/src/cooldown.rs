use std::time::Duration;

/// Single-slot cancellable deadline.
///
/// Times are offsets on the caller's monotonic clock. Arming while a deadline
/// is pending replaces it; nothing queues.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CooldownTimer {
    delay: Duration,
    deadline: Option<Duration>,
}

impl CooldownTimer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            deadline: None,
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Pending deadline, if armed.
    pub fn deadline(&self) -> Option<Duration> {
        self.deadline
    }

    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    /// Cancel any pending deadline and start a fresh one at `now + delay`.
    pub fn arm(&mut self, now: Duration) {
        self.deadline = Some(now + self.delay);
    }

    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    /// Returns true exactly once when `now` has reached the deadline.
    pub fn fire_if_due(&mut self, now: Duration) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }
}

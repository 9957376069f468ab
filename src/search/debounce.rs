use std::time::Duration;
use tokio::time::Instant;

/// Holds back the latest input until `delay` has passed without another one.
///
/// Timestamps are passed in rather than read, so the engine can drive it from
/// the tokio clock and tests can drive it from fixed instants.
#[derive(Debug, Clone)]
pub struct Debouncer {
    delay: Duration,
    pending: Option<(String, Instant)>,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
        }
    }

    /// Replace any pending value and restart the quiet period.
    pub fn input(&mut self, value: String, now: Instant) {
        self.pending = Some((value, now + self.delay));
    }

    pub fn cancel(&mut self) {
        self.pending = None;
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.pending.as_ref().map(|(_, at)| *at)
    }

    /// Take the pending value if its quiet period is over. Fires once.
    pub fn poll(&mut self, now: Instant) -> Option<String> {
        match self.pending.as_ref() {
            Some((_, at)) if now >= *at => self.pending.take().map(|(value, _)| value),
            _ => None,
        }
    }
}

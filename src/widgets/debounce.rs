//! Delay-then-commit debouncing

use std::time::Duration;

use tokio::time::Instant;

/// Holds the latest pushed value until no new value arrived for `delay`.
///
/// Pushing again only moves the deadline; nothing already started is aborted.
#[derive(Debug, Clone)]
pub struct Debouncer<V> {
    delay: Duration,
    pending: Option<(V, Instant)>,
}

impl<V> Debouncer<V> {
    pub fn new(delay: Duration) -> Self {
        Self { delay, pending: None }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Record a value and restart the quiet period
    pub fn push(&mut self, value: V, now: Instant) {
        self.pending = Some((value, now + self.delay));
    }

    /// Deadline of the pending value, if any
    pub fn deadline(&self) -> Option<Instant> {
        self.pending.as_ref().map(|(_, deadline)| *deadline)
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Take the pending value once its quiet period has elapsed
    pub fn poll(&mut self, now: Instant) -> Option<V> {
        match self.pending {
            Some((_, deadline)) if now >= deadline => self.pending.take().map(|(value, _)| value),
            _ => None,
        }
    }

    /// Drop the pending value without committing it
    pub fn cancel(&mut self) {
        self.pending = None;
    }
}

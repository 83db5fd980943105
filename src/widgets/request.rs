//! Generation counter guarding against stale responses

/// Identifies one issued request
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Ticket(u64);

impl Ticket {
    pub fn generation(&self) -> u64 {
        self.0
    }
}

/// Issues monotonically increasing tickets; only the latest one may apply its result
#[derive(Debug, Clone, Default)]
pub struct RequestTracker {
    latest: u64,
    live: bool,
}

impl RequestTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn issue(&mut self) -> Ticket {
        self.latest += 1;
        self.live = true;
        Ticket(self.latest)
    }

    pub fn is_current(&self, ticket: Ticket) -> bool {
        self.live && ticket.0 == self.latest
    }

    /// Mark the current ticket as completed so a duplicate completion is rejected
    pub fn complete(&mut self, ticket: Ticket) -> bool {
        if self.is_current(ticket) {
            self.live = false;
            true
        } else {
            false
        }
    }

    /// Make every outstanding ticket stale (unmount, reset)
    pub fn invalidate(&mut self) {
        self.latest += 1;
        self.live = false;
    }

    pub fn in_flight(&self) -> bool {
        self.live
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_latest_ticket_applies() {
        let mut tracker = RequestTracker::new();
        let first = tracker.issue();
        let second = tracker.issue();

        assert!(!tracker.is_current(first));
        assert!(tracker.complete(second));
        assert!(!tracker.complete(second));
        assert!(!tracker.in_flight());
    }

    #[test]
    fn test_invalidate() {
        let mut tracker = RequestTracker::new();
        let ticket = tracker.issue();
        tracker.invalidate();
        assert!(!tracker.complete(ticket));
        assert!(tracker.issue().generation() > ticket.generation());
    }
}

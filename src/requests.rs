//! Request sequencing
//!
//! Backend calls can settle out of order. Each call takes a [`RequestTicket`] before it is
//! issued, and its response is only allowed to change state while that ticket is still the
//! newest one handed out.

/// Proof that a request was issued, used to check it is still current when it settles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RequestTicket(u64);

impl RequestTicket {
    /// Sequence number of the request.
    pub fn sequence(self) -> u64 {
        self.0
    }
}

/// Hands out tickets and remembers which one is current.
#[derive(Debug, Default)]
pub struct RequestSequencer {
    latest: u64,
    current: Option<u64>,
}

impl RequestSequencer {
    /// Create a sequencer with nothing in flight.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue a ticket for a new request, superseding all earlier ones.
    pub fn issue(&mut self) -> RequestTicket {
        self.latest = self.latest.wrapping_add(1);
        self.current = Some(self.latest);

        RequestTicket(self.latest)
    }

    /// Whether responses for `ticket` may still be applied.
    pub fn is_current(&self, ticket: RequestTicket) -> bool {
        self.current == Some(ticket.0)
    }

    /// Settle `ticket`. Returns `false`, and changes nothing, if it was superseded.
    pub fn settle(&mut self, ticket: RequestTicket) -> bool {
        if self.is_current(ticket) {
            self.current = None;
            true
        } else {
            false
        }
    }

    /// Supersede every outstanding ticket.
    pub fn invalidate(&mut self) {
        self.current = None;
    }

    /// Whether a request is outstanding.
    pub fn in_flight(&self) -> bool {
        self.current.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn newest_ticket_is_current() {
        let mut sequencer = RequestSequencer::new();

        let first = sequencer.issue();
        let second = sequencer.issue();

        assert!(!sequencer.is_current(first));
        assert!(sequencer.is_current(second));
        assert!(second > first);
    }

    #[test]
    fn stale_ticket_cannot_settle() {
        let mut sequencer = RequestSequencer::new();

        let first = sequencer.issue();
        let second = sequencer.issue();

        assert!(!sequencer.settle(first));
        assert!(sequencer.in_flight());
        assert!(sequencer.settle(second));
        assert!(!sequencer.in_flight());
    }

    #[test]
    fn ticket_settles_once() {
        let mut sequencer = RequestSequencer::new();
        let ticket = sequencer.issue();

        assert!(sequencer.settle(ticket));
        assert!(!sequencer.settle(ticket));
    }

    #[test]
    fn invalidate_supersedes_outstanding_tickets() {
        let mut sequencer = RequestSequencer::new();
        let ticket = sequencer.issue();

        sequencer.invalidate();

        assert!(!sequencer.is_current(ticket));
        assert!(!sequencer.settle(ticket));
    }
}

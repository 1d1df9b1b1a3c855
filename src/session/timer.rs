use std::time::{Duration, Instant};

/// Handle for one scheduled callback. Never reused within a queue.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Ticket(u64);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TimerKind {
    AutoAdvance,
    ClearShake,
}

#[derive(Clone, Debug)]
struct Pending {
    ticket: Ticket,
    kind: TimerKind,
    due: Instant,
}

/// Delayed callbacks keyed by ticket. Nothing fires on its own; the owner
/// calls `pop_due` with the current time.
#[derive(Clone, Debug, Default)]
pub struct TimerQueue {
    next_id: u64,
    pending: Vec<Pending>,
}

impl TimerQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule(&mut self, kind: TimerKind, now: Instant, delay: Duration) -> Ticket {
        let ticket = Ticket(self.next_id);
        self.next_id += 1;
        self.pending.push(Pending {
            ticket,
            kind,
            due: now + delay,
        });
        ticket
    }

    /// Returns false if the ticket already fired or was cancelled.
    pub fn cancel(&mut self, ticket: Ticket) -> bool {
        let before = self.pending.len();
        self.pending.retain(|p| p.ticket != ticket);
        self.pending.len() != before
    }

    pub fn is_pending(&self, ticket: Ticket) -> bool {
        self.pending.iter().any(|p| p.ticket == ticket)
    }

    pub fn clear(&mut self) {
        self.pending.clear();
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn next_due(&self) -> Option<Instant> {
        self.pending.iter().map(|p| p.due).min()
    }

    /// Removes and returns every timer due at `now`, earliest first.
    pub fn pop_due(&mut self, now: Instant) -> Vec<(Ticket, TimerKind)> {
        let mut due: Vec<Pending> = Vec::new();
        self.pending.retain(|p| {
            if p.due <= now {
                due.push(p.clone());
                false
            } else {
                true
            }
        });
        due.sort_by_key(|p| (p.due, p.ticket.0));
        due.into_iter().map(|p| (p.ticket, p.kind)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn test_fires_only_when_due() {
        let t0 = Instant::now();
        let mut queue = TimerQueue::new();
        let ticket = queue.schedule(TimerKind::AutoAdvance, t0, ms(1500));
        assert!(queue.pop_due(t0 + ms(1499)).is_empty());
        assert_eq!(
            queue.pop_due(t0 + ms(1500)),
            vec![(ticket, TimerKind::AutoAdvance)]
        );
        assert!(queue.is_empty());
    }

    #[test]
    fn test_cancelled_ticket_never_fires() {
        let t0 = Instant::now();
        let mut queue = TimerQueue::new();
        let ticket = queue.schedule(TimerKind::AutoAdvance, t0, ms(100));
        assert!(queue.cancel(ticket));
        assert!(!queue.cancel(ticket));
        assert!(queue.pop_due(t0 + ms(1000)).is_empty());
    }

    #[test]
    fn test_due_order_and_unique_tickets() {
        let t0 = Instant::now();
        let mut queue = TimerQueue::new();
        let late = queue.schedule(TimerKind::AutoAdvance, t0, ms(500));
        let early = queue.schedule(TimerKind::ClearShake, t0, ms(400));
        assert_ne!(late, early);
        assert_eq!(queue.next_due(), Some(t0 + ms(400)));
        let fired = queue.pop_due(t0 + ms(600));
        assert_eq!(
            fired,
            vec![
                (early, TimerKind::ClearShake),
                (late, TimerKind::AutoAdvance)
            ]
        );
    }

    #[test]
    fn test_clear_drops_everything() {
        let t0 = Instant::now();
        let mut queue = TimerQueue::new();
        let ticket = queue.schedule(TimerKind::ClearShake, t0, ms(10));
        queue.clear();
        assert!(!queue.is_pending(ticket));
        assert_eq!(queue.len(), 0);
    }
}

//! One-shot timers for the single-threaded event loop
//!
//! A [`TimerQueue`] hands out [`Timer`] guards. A timer stays registered for
//! exactly as long as its guard lives; dropping the guard cancels it, so a
//! torn-down owner can never observe its own timer firing.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::{Rc, Weak};
use std::time::{Duration, Instant};

use crate::platform::clock::Clock;

/// Identifier of a scheduled timer
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimerId(u64);

#[derive(Debug, Default)]
struct TimerTable {
    next_id: u64,
    deadlines: BTreeMap<TimerId, Instant>,
}

/// Registry of pending one-shot timers, shared by everything on the event loop
#[derive(Debug, Clone)]
pub struct TimerQueue {
    clock: Rc<dyn Clock>,
    table: Rc<RefCell<TimerTable>>,
}

impl TimerQueue {
    pub fn new(clock: Rc<dyn Clock>) -> Self {
        Self {
            clock,
            table: Rc::new(RefCell::new(TimerTable::default())),
        }
    }

    pub fn now(&self) -> Instant {
        self.clock.now()
    }

    /// Schedules a timer firing `delay` from now
    pub fn schedule(&self, delay: Duration) -> Timer {
        let deadline = self.now() + delay;
        let mut table = self.table.borrow_mut();
        let id = TimerId(table.next_id);
        table.next_id += 1;
        table.deadlines.insert(id, deadline);
        tracing::trace!(?id, ?delay, "timer scheduled");

        Timer {
            id,
            deadline,
            table: Rc::downgrade(&self.table),
        }
    }

    /// Number of timers still registered
    pub fn pending(&self) -> usize {
        self.table.borrow().deadlines.len()
    }

    /// Earliest deadline among registered timers
    pub fn next_deadline(&self) -> Option<Instant> {
        self.table.borrow().deadlines.values().min().copied()
    }

    /// Time left until the earliest deadline, zero if already due
    pub fn time_until_next(&self) -> Option<Duration> {
        let now = self.now();
        self.next_deadline()
            .map(|deadline| deadline.saturating_duration_since(now))
    }
}

/// Guard for a scheduled timer
///
/// Cancels the timer when dropped.
#[derive(Debug)]
pub struct Timer {
    id: TimerId,
    deadline: Instant,
    table: Weak<RefCell<TimerTable>>,
}

impl Timer {
    pub fn id(&self) -> TimerId {
        self.id
    }

    pub fn deadline(&self) -> Instant {
        self.deadline
    }

    pub fn is_due(&self, now: Instant) -> bool {
        now >= self.deadline
    }
}

impl Drop for Timer {
    fn drop(&mut self) {
        if let Some(table) = self.table.upgrade() {
            table.borrow_mut().deadlines.remove(&self.id);
            tracing::trace!(id = ?self.id, "timer released");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::clock::ManualClock;

    fn queue() -> (ManualClock, TimerQueue) {
        let clock = ManualClock::new();
        let queue = TimerQueue::new(Rc::new(clock.clone()));
        (clock, queue)
    }

    #[test]
    fn timer_becomes_due_after_delay() {
        let (clock, queue) = queue();
        let timer = queue.schedule(Duration::from_millis(2000));

        assert!(!timer.is_due(queue.now()));
        clock.advance(Duration::from_millis(1999));
        assert!(!timer.is_due(queue.now()));
        clock.advance(Duration::from_millis(1));
        assert!(timer.is_due(queue.now()));
    }

    #[test]
    fn dropping_guard_cancels_timer() {
        let (_clock, queue) = queue();
        let first = queue.schedule(Duration::from_secs(1));
        let second = queue.schedule(Duration::from_secs(2));
        assert_eq!(queue.pending(), 2);
        assert_ne!(first.id(), second.id());

        drop(first);
        assert_eq!(queue.pending(), 1);
        assert_eq!(queue.next_deadline(), Some(second.deadline()));

        drop(second);
        assert_eq!(queue.pending(), 0);
        assert_eq!(queue.next_deadline(), None);
    }

    #[test]
    fn time_until_next_saturates_at_zero() {
        let (clock, queue) = queue();
        let _timer = queue.schedule(Duration::from_millis(500));
        assert_eq!(queue.time_until_next(), Some(Duration::from_millis(500)));

        clock.advance(Duration::from_secs(3));
        assert_eq!(queue.time_until_next(), Some(Duration::ZERO));
    }

    #[test]
    fn guard_outliving_queue_drops_cleanly() {
        let (_clock, queue) = queue();
        let timer = queue.schedule(Duration::from_secs(1));
        drop(queue);
        drop(timer);
    }
}

use std::cmp::Ordering;
use std::fmt;

use crate::scheduler::Scheduler;
use crate::units::Nanosecs;

identifier!(EventId, u64);

/// The callable payload of an event. It receives the scheduler itself so it
/// can read the clock, schedule follow-up events, cancel, or request a stop.
pub(crate) type EventFn = Box<dyn FnOnce(&mut Scheduler) + 'static>;

/// Lifecycle of a scheduled event, as seen through its [`EventId`] handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventState {
    /// Queued; will execute unless cancelled first.
    Pending,
    /// Currently executing.
    Running,
    /// Cancelled while still queued; the queue entry is discarded when it
    /// reaches the front (lazy deletion).
    Cancelled,
    /// No longer live: executed, discarded after cancellation, or dropped by
    /// `destroy()`. Terminal.
    Expired,
}

/// A queued event. Owned exclusively by the event queue; callers only ever
/// hold the [`EventId`].
pub(crate) struct QueuedEvent {
    pub(crate) time: Nanosecs,
    pub(crate) id: EventId,
    pub(crate) callable: EventFn,
}

impl fmt::Debug for QueuedEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QueuedEvent")
            .field("time", &self.time)
            .field("id", &self.id)
            .finish_non_exhaustive()
    }
}

impl PartialEq for QueuedEvent {
    fn eq(&self, other: &Self) -> bool {
        self.time == other.time && self.id == other.id
    }
}

impl Eq for QueuedEvent {}

/// Ordering: smallest `(time, id)` first. `BinaryHeap` is a max-heap, so the
/// natural ordering is reversed here to make it behave as a min-heap. IDs are
/// assigned at push time in strictly increasing order, so among events with
/// equal fire-times this is push order (FIFO) — the property that makes runs
/// replayable for a fixed sequence of schedule calls.
impl Ord for QueuedEvent {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .time
            .cmp(&self.time)
            .then_with(|| other.id.cmp(&self.id))
    }
}

impl PartialOrd for QueuedEvent {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(time: i64, id: u64) -> QueuedEvent {
        QueuedEvent {
            time: Nanosecs::new(time),
            id: EventId::new(id),
            callable: Box::new(|_| {}),
        }
    }

    #[test]
    fn earlier_time_sorts_greater() {
        // Reversed ordering: the earlier event must pop first from a max-heap.
        assert!(event(10, 1) > event(20, 0));
    }

    #[test]
    fn equal_times_tie_break_on_id() {
        assert!(event(10, 0) > event(10, 1));
    }

    #[test]
    fn equal_keys_compare_equal() {
        assert_eq!(event(10, 3), event(10, 3));
        assert_eq!(event(10, 3).cmp(&event(10, 3)), Ordering::Equal);
    }
}

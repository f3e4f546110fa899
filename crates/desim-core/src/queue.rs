use std::collections::BinaryHeap;

use crate::event::{EventFn, EventId, QueuedEvent};
use crate::units::Nanosecs;

/// Priority queue of events, keyed by `(fire_time, id)` ascending.
///
/// The queue mints [`EventId`]s at push time from a strictly increasing
/// counter, so the ID doubles as the FIFO tie-break sequence number.
///
/// Correctness properties:
///
/// - The minimum-keyed element is always the next event to fire.
/// - IDs are unique and strictly increasing in push order.
#[derive(Debug)]
pub(crate) struct EventQueue {
    heap: BinaryHeap<QueuedEvent>,
    next_id: u64,
}

impl EventQueue {
    pub(crate) fn new() -> Self {
        Self {
            heap: BinaryHeap::new(),
            next_id: 0,
        }
    }

    /// O(log n) insertion. Assigns and returns the event's ID.
    pub(crate) fn push(&mut self, time: Nanosecs, callable: EventFn) -> EventId {
        let id = EventId::new(self.next_id);
        self.next_id += 1;
        self.heap.push(QueuedEvent { time, id, callable });
        id
    }

    /// O(log n) removal of the minimum-keyed event, or `None` if empty.
    pub(crate) fn pop_min(&mut self) -> Option<QueuedEvent> {
        self.heap.pop()
    }

    /// Fire-time of the minimum-keyed event, without removing it.
    pub(crate) fn peek_min_time(&self) -> Option<Nanosecs> {
        self.heap.peek().map(|e| e.time)
    }

    pub(crate) fn len(&self) -> usize {
        self.heap.len()
    }

    /// Drops all queued events, callables included. The ID counter is not
    /// reset; IDs stay unique for the life of the queue.
    pub(crate) fn clear(&mut self) {
        self.heap.clear();
    }
}

//! The scheduler: a virtual clock, an event queue, and the run loop that
//! drives them. One instance per simulation, owned by the driving scenario
//! code and threaded into event callables by `run()` — there is no global
//! simulator state.

use std::fmt;

use rustc_hash::FxHashMap;

use crate::event::{EventFn, EventId, EventState};
use crate::queue::EventQueue;
use crate::units::Nanosecs;

/// State of the run loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    /// No run has started (or `destroy()` reset the scheduler).
    Idle,
    /// Inside `run()`.
    Running,
    /// `run()` has returned. Terminal until `destroy()`.
    Stopped,
}

/// Why `run()` returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// No events left to execute.
    QueueExhausted,
    /// The next event's fire-time lies beyond the stop time. Unexecuted
    /// events stay queued until `destroy()`.
    StopTimeReached,
    /// `stop()` was requested.
    Stopped,
}

/// A deterministic discrete-event scheduler.
///
/// Executes events in non-decreasing fire-time order, FIFO among equal
/// fire-times. Single-threaded and run-to-completion: an executing event is
/// never preempted, and deferred work is expressed by scheduling further
/// events rather than by blocking. Timeouts are likewise plain events: the
/// caller schedules a cleanup event at `now() + timeout` and cancels it if
/// the awaited condition completes first.
pub struct Scheduler {
    clock: Nanosecs,
    queue: EventQueue,
    // Holds Pending and Cancelled entries only. Entries are removed when
    // their event is dequeued, so the table does not grow with the number of
    // executed events; an absent entry means the handle has expired.
    states: FxHashMap<EventId, EventState>,
    run_state: RunState,
    stop_time: Option<Nanosecs>,
    stop_requested: bool,
    current: Option<EventId>,
}

impl Scheduler {
    /// Creates an idle scheduler with the clock at zero.
    pub fn new() -> Self {
        Self {
            clock: Nanosecs::ZERO,
            queue: EventQueue::new(),
            states: FxHashMap::default(),
            run_state: RunState::Idle,
            stop_time: None,
            stop_requested: false,
            current: None,
        }
    }

    /// The current virtual time. Advances only when the run loop dequeues an
    /// event; never decreases within a run.
    pub fn now(&self) -> Nanosecs {
        self.clock
    }

    /// Number of queued events, cancelled-but-not-yet-discarded included.
    pub fn pending_events(&self) -> usize {
        self.queue.len()
    }

    /// State of the run loop.
    pub fn run_state(&self) -> RunState {
        self.run_state
    }

    /// Schedules `f` to execute `delay` after the current time and returns
    /// its handle. Fails with [`Error::NegativeDelay`] without touching the
    /// queue if `delay` is negative; the caller must clamp its own values.
    /// A delay that would overflow the clock saturates to the far future
    /// instead of wrapping to a fire-time in the past.
    ///
    /// May be called before `run()` to establish the initial workload, or
    /// from inside an executing event — the latter is how periodic work
    /// reschedules itself.
    pub fn schedule(
        &mut self,
        delay: impl Into<Nanosecs>,
        f: impl FnOnce(&mut Scheduler) + 'static,
    ) -> Result<EventId, Error> {
        let delay = delay.into();
        if delay.is_negative() {
            return Err(Error::NegativeDelay { delay });
        }
        Ok(self.push_at(self.clock.saturating_add(delay), Box::new(f)))
    }

    /// Schedules `f` at the absolute virtual time `at`. Fails with
    /// [`Error::PastTime`] if `at` is before the current time.
    pub fn schedule_at(
        &mut self,
        at: impl Into<Nanosecs>,
        f: impl FnOnce(&mut Scheduler) + 'static,
    ) -> Result<EventId, Error> {
        let at = at.into();
        if at < self.clock {
            return Err(Error::PastTime {
                at,
                now: self.clock,
            });
        }
        Ok(self.push_at(at, Box::new(f)))
    }

    fn push_at(&mut self, at: Nanosecs, callable: EventFn) -> EventId {
        let id = self.queue.push(at, callable);
        self.states.insert(id, EventState::Pending);
        id
    }

    /// Cancels a pending event. Lazy: the event is only marked, and its queue
    /// entry is discarded unexecuted when it reaches the front of the queue.
    /// Idempotent — cancelling a running, expired, or already-cancelled event
    /// is a no-op.
    pub fn cancel(&mut self, handle: EventId) {
        if let Some(state) = self.states.get_mut(&handle) {
            if *state == EventState::Pending {
                *state = EventState::Cancelled;
            }
        }
    }

    /// The lifecycle state of the event behind `handle`.
    pub fn event_state(&self, handle: EventId) -> EventState {
        if self.current == Some(handle) {
            return EventState::Running;
        }
        self.states
            .get(&handle)
            .copied()
            .unwrap_or(EventState::Expired)
    }

    /// `true` while the event is queued and not cancelled. The corpus idiom
    /// `if (event.IsRunning()) Cancel(event)` maps onto this guard.
    pub fn is_pending(&self, handle: EventId) -> bool {
        self.event_state(handle) == EventState::Pending
    }

    /// Requests an immediate stop: the run loop exits as soon as the
    /// currently executing event (if any) returns.
    pub fn stop(&mut self) {
        self.stop_requested = true;
    }

    /// Sets the virtual time at which the run loop stops. Events with
    /// fire-times beyond `at` are left queued. A later call overwrites an
    /// earlier one; fails with [`Error::PastTime`] if `at` is before now.
    pub fn stop_at(&mut self, at: impl Into<Nanosecs>) -> Result<(), Error> {
        let at = at.into();
        if at < self.clock {
            return Err(Error::PastTime {
                at,
                now: self.clock,
            });
        }
        self.stop_time = Some(at);
        Ok(())
    }

    /// Executes queued events in `(fire_time, id)` order until the queue is
    /// exhausted, the stop time fences off the remaining events, or `stop()`
    /// is requested. The clock is advanced to each event's fire-time before
    /// its callable runs; when the stop time is the reason for returning, the
    /// clock parks there.
    ///
    /// A panic inside an event callable unwinds through this call. It is
    /// deliberately not caught: skipping a failed event would silently
    /// desynchronize the remaining schedule from its causal dependencies.
    /// `destroy()` is the recovery path for a scheduler abandoned mid-run.
    ///
    /// # Panics
    ///
    /// Panics if called from inside an event callable.
    pub fn run(&mut self) -> RunOutcome {
        assert!(
            self.run_state != RunState::Running,
            "run() called from inside an event callable"
        );
        self.run_state = RunState::Running;
        let outcome = loop {
            if self.stop_requested {
                break RunOutcome::Stopped;
            }
            let Some(next_time) = self.queue.peek_min_time() else {
                break RunOutcome::QueueExhausted;
            };
            if let Some(stop) = self.stop_time {
                if next_time > stop {
                    self.clock = stop;
                    break RunOutcome::StopTimeReached;
                }
            }
            let event = self.queue.pop_min().expect("peeked a minimum above");
            if self.states.remove(&event.id) == Some(EventState::Cancelled) {
                // Lazy deletion: pay the skip cost here instead of a
                // mid-heap removal at cancellation time.
                continue;
            }
            debug_assert!(event.time >= self.clock, "clock must not go backwards");
            self.clock = event.time;
            self.current = Some(event.id);
            (event.callable)(self);
            self.current = None;
        };
        self.run_state = RunState::Stopped;
        outcome
    }

    /// Drops every queued event together with its callable, clears the stop
    /// protocol, resets the clock to zero, and returns to [`RunState::Idle`].
    /// This is the only release path for events still queued when a run
    /// stopped early. Safe to call at any point between runs; event IDs are
    /// not reused afterwards, so stale handles simply report
    /// [`EventState::Expired`].
    pub fn destroy(&mut self) {
        self.queue.clear();
        self.states.clear();
        self.clock = Nanosecs::ZERO;
        self.stop_time = None;
        self.stop_requested = false;
        // A panicking callable never returns through run(), leaving this set.
        self.current = None;
        self.run_state = RunState::Idle;
    }
}

impl Default for Scheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Scheduler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Scheduler")
            .field("clock", &self.clock)
            .field("pending_events", &self.queue.len())
            .field("run_state", &self.run_state)
            .field("stop_time", &self.stop_time)
            .finish_non_exhaustive()
    }
}

/// Scheduling error. Reported synchronously; the scheduler never adjusts a
/// caller's times on its behalf.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// A relative delay was negative.
    #[error("cannot schedule with negative delay ({delay})")]
    NegativeDelay {
        /// The offending delay.
        delay: Nanosecs,
    },

    /// An absolute time was already in the past.
    #[error("time {at} is in the past (now = {now})")]
    PastTime {
        /// The requested time.
        at: Nanosecs,
        /// The current virtual time.
        now: Nanosecs,
    },
}

#![warn(unreachable_pub, missing_debug_implementations)]

//! The core `desim` library. This crate defines the deterministic
//! discrete-event [`Scheduler`]: a virtual clock, a time-ordered queue of
//! cancellable events, and a run loop with a stop protocol. Everything else
//! in a simulation (device models, applications, routing protocols) is an
//! *event producer* that schedules callbacks against the scheduler and never
//! reads time from anywhere else.

#[macro_use]
mod ident;

mod event;
mod queue;
mod scheduler;

pub mod units;

#[cfg(test)]
pub(crate) mod testing;

pub use event::{EventId, EventState};
pub use scheduler::{Error, RunOutcome, RunState, Scheduler};

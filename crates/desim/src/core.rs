//! Core desim data structures and routines. The most common entry point is
//! [`Scheduler`]: schedule events against it, then drive them with
//! [`Scheduler::run`].

pub use desim_core::*;

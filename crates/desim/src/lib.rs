//! `desim` is a deterministic discrete-event simulation kernel. It maintains a
//! virtual clock and a time-ordered queue of cancellable events, and executes
//! them in a single-threaded, run-to-completion loop with a stop protocol.
//! Two runs with the same sequence of schedule calls produce the same
//! execution order, which is what makes simulation traces comparable across
//! runs.

#![warn(unreachable_pub, missing_docs)]

pub mod core;

use std::cell::RefCell;
use std::rc::Rc;

use crate::units::Nanosecs;

/// Shared execution trace for scheduler tests. Clones record into the same
/// underlying list, so one clone can be moved into each event callable.
#[derive(Debug, Clone, Default)]
pub(crate) struct Recorder {
    entries: Rc<RefCell<Vec<(Nanosecs, &'static str)>>>,
}

impl Recorder {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn record(&self, at: Nanosecs, label: &'static str) {
        self.entries.borrow_mut().push((at, label));
    }

    pub(crate) fn labels(&self) -> Vec<&'static str> {
        self.entries.borrow().iter().map(|&(_, label)| label).collect()
    }

    pub(crate) fn times(&self) -> Vec<Nanosecs> {
        self.entries.borrow().iter().map(|&(at, _)| at).collect()
    }

    /// One `"<time> <label>"` line per executed event, in execution order.
    pub(crate) fn trace(&self) -> String {
        self.entries
            .borrow()
            .iter()
            .map(|&(at, label)| format!("{at} {label}"))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

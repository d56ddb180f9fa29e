//! Global execution gate — the two process-wide mode flags.
//!
//! Both flags start `false` and change only through the setters below (and
//! the pipeline taking the suppression). All accesses are `SeqCst`, so a
//! suppression requested on one thread is seen by the next message on any
//! other.

use std::sync::atomic::{AtomicBool, Ordering};

#[derive(Debug, Default)]
pub struct ExecutionGate {
    learn_mode: AtomicBool,
    suppress_next: AtomicBool,
}

impl ExecutionGate {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_learn_mode(&self, enabled: bool) {
        self.learn_mode.store(enabled, Ordering::SeqCst);
    }

    #[must_use]
    pub fn is_learning(&self) -> bool {
        self.learn_mode.load(Ordering::SeqCst)
    }

    /// Skip dispatch of the next incoming MIDI message, whatever it is.
    pub fn suppress_next_execution(&self) {
        self.suppress_next.store(true, Ordering::SeqCst);
    }

    #[must_use]
    pub fn is_suppressing(&self) -> bool {
        self.suppress_next.load(Ordering::SeqCst)
    }

    /// Clear the suppression flag and return its previous value.
    pub fn take_suppression(&self) -> bool {
        self.suppress_next.swap(false, Ordering::SeqCst)
    }
}

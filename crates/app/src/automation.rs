//! Shared automation record — the only state a worker shares with the
//! rest of the process.
//!
//! The descriptor is immutable. The `active` gate is an atomic flag that
//! the dispatcher, the engine, and the owning worker all write. Worker
//! state and the last found region are single-slot `watch` cells: written
//! by the owning worker only, readable from anywhere without going stale.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};

use tokio::sync::watch;

use midiauto_domain::automation::{AutomationDescriptor, TriggerKind};
use midiauto_domain::geometry::Rect;
use midiauto_domain::id::AutomationId;

/// Lifecycle of an automation's worker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkerState {
    Idle,
    Searching,
    Matched,
    NotFound,
    Terminated,
}

impl fmt::Display for WorkerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Idle => "idle",
            Self::Searching => "searching",
            Self::Matched => "matched",
            Self::NotFound => "not_found",
            Self::Terminated => "terminated",
        })
    }
}

/// A configured automation shared between its worker and the dispatcher.
#[derive(Debug)]
pub struct Automation {
    descriptor: AutomationDescriptor,
    active: AtomicBool,
    state: watch::Sender<WorkerState>,
    last_found: watch::Sender<Option<Rect>>,
}

impl Automation {
    #[must_use]
    pub fn new(descriptor: AutomationDescriptor) -> Self {
        let active = AtomicBool::new(descriptor.active);
        let (state, _) = watch::channel(WorkerState::Idle);
        let (last_found, _) = watch::channel(descriptor.last_found);
        Self {
            descriptor,
            active,
            state,
            last_found,
        }
    }

    #[must_use]
    pub fn id(&self) -> AutomationId {
        self.descriptor.id
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.descriptor.name
    }

    #[must_use]
    pub fn trigger(&self) -> TriggerKind {
        self.descriptor.trigger
    }

    #[must_use]
    pub fn descriptor(&self) -> &AutomationDescriptor {
        &self.descriptor
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::SeqCst)
    }

    /// Arm or disarm the automation. Safe from any thread.
    pub fn set_active(&self, active: bool) {
        self.active.store(active, Ordering::SeqCst);
    }

    /// Clear the flag if it is set. Returns `false` when it was already
    /// cleared.
    pub fn disarm(&self) -> bool {
        self.active
            .compare_exchange(true, false, Ordering::SeqCst, Ordering::SeqCst)
            .is_ok()
    }

    #[must_use]
    pub fn state(&self) -> WorkerState {
        *self.state.borrow()
    }

    /// Watch state transitions, e.g. to wait for termination.
    #[must_use]
    pub fn subscribe_state(&self) -> watch::Receiver<WorkerState> {
        self.state.subscribe()
    }

    /// Region of the most recent match (or the one carried over from
    /// configuration).
    #[must_use]
    pub fn last_found(&self) -> Option<Rect> {
        *self.last_found.borrow()
    }

    pub(crate) fn set_state(&self, state: WorkerState) {
        self.state.send_replace(state);
    }

    pub(crate) fn record_match(&self, region: Rect) {
        self.last_found.send_replace(Some(region));
    }
}

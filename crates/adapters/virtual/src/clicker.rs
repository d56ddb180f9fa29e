//! Recording clicker — logs clicks instead of moving a real pointer.

use std::collections::VecDeque;
use std::sync::{Mutex, PoisonError};

use midiauto_app::ports::ClickExecutor;
use midiauto_domain::automation::ClickType;
use midiauto_domain::geometry::Rect;

/// A click as it would have been injected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Click {
    pub x: i32,
    pub y: i32,
    pub kind: ClickType,
}

/// Clicks kept by [`RecordingClicker::new`].
pub const DEFAULT_HISTORY: usize = 256;

/// Keeps the most recent clicks; older ones are dropped.
#[derive(Debug)]
pub struct RecordingClicker {
    history: usize,
    clicks: Mutex<VecDeque<Click>>,
}

impl Default for RecordingClicker {
    fn default() -> Self {
        Self::with_history(DEFAULT_HISTORY)
    }
}

impl RecordingClicker {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A clicker retaining at most `history` clicks (at least one).
    #[must_use]
    pub fn with_history(history: usize) -> Self {
        let history = history.max(1);
        Self {
            history,
            clicks: Mutex::new(VecDeque::with_capacity(history)),
        }
    }

    /// The retained clicks, oldest first.
    #[must_use]
    pub fn clicks(&self) -> Vec<Click> {
        self.clicks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .copied()
            .collect()
    }
}

impl ClickExecutor for RecordingClicker {
    fn click(&self, region: Rect, kind: ClickType) {
        let (x, y) = region.center();
        tracing::info!(x, y, %kind, %region, "click");
        let mut clicks = self.clicks.lock().unwrap_or_else(PoisonError::into_inner);
        if clicks.len() == self.history {
            clicks.pop_front();
        }
        clicks.push_back(Click { x, y, kind });
    }
}

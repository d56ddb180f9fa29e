//! Click executor port — pointer input injection.

use std::sync::Arc;

use midiauto_domain::automation::ClickType;
use midiauto_domain::geometry::Rect;

/// Performs pointer clicks on screen regions.
///
/// Fire-and-forget and synchronous from the caller's point of view.
pub trait ClickExecutor: Send + Sync {
    /// Click inside `region` (adapters usually aim at its centre).
    fn click(&self, region: Rect, kind: ClickType);
}

impl<T: ClickExecutor + ?Sized> ClickExecutor for Arc<T> {
    fn click(&self, region: Rect, kind: ClickType) {
        (**self).click(region, kind);
    }
}

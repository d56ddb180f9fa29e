//! Match service port — visual template matching on the screen.
//!
//! The engine never looks at pixels itself. A worker subscribes once per
//! template and then asks the subscription, cycle after cycle, whether the
//! template appears inside a search region.

use std::fmt;
use std::future::Future;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use midiauto_domain::error::MatchError;
use midiauto_domain::geometry::Rect;

/// Where on the screen to look.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SearchRegion {
    #[default]
    FullScreen,
    /// Narrowed to a previously found match.
    Fixed(Rect),
}

impl fmt::Display for SearchRegion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FullScreen => f.write_str("full screen"),
            Self::Fixed(rect) => rect.fmt(f),
        }
    }
}

/// Result of a single observation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchOutcome {
    Found(Rect),
    /// The template did not appear before the timeout.
    NotFound,
}

/// Tuning shared by every observation of a subscription.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MatchSettings {
    /// Screen scans per second.
    pub scan_rate: f64,
    /// Minimum similarity score, in `(0, 1]`, for a region to count as a match.
    pub min_similarity: f64,
}

/// A visual template-matching capability.
pub trait MatchService: Send + Sync {
    type Subscription: MatchSubscription;

    /// Start observing `template`.
    ///
    /// # Errors
    ///
    /// Returns a [`MatchError`] when the template cannot be loaded or the
    /// service is unavailable.
    fn subscribe(
        &self,
        template: &Path,
        settings: MatchSettings,
    ) -> Result<Self::Subscription, MatchError>;
}

/// A live observation of one template.
///
/// Dropping the future returned by [`observe_once`](Self::observe_once)
/// aborts the wait. [`release`](Self::release) must stop the underlying
/// observer so no callback fires afterwards.
pub trait MatchSubscription: Send + 'static {
    /// Wait up to `timeout` for the template to appear inside `region`.
    fn observe_once(
        &mut self,
        region: SearchRegion,
        timeout: Duration,
    ) -> impl Future<Output = Result<MatchOutcome, MatchError>> + Send;

    /// Stop observing. Idempotent.
    fn release(&mut self);
}

impl<T: MatchService + ?Sized> MatchService for Arc<T> {
    type Subscription = T::Subscription;

    fn subscribe(
        &self,
        template: &Path,
        settings: MatchSettings,
    ) -> Result<Self::Subscription, MatchError> {
        (**self).subscribe(template, settings)
    }
}

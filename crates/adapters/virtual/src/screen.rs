//! Virtual screen — a map of visible templates standing in for pixels.
//!
//! A template is "on screen" when it has been [`show`](VirtualScreen::show)n
//! and not hidden since. Template files are never read, so any path works.

use std::collections::HashMap;
use std::future::Future;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::time::Instant;

use midiauto_app::ports::{
    MatchOutcome, MatchService, MatchSettings, MatchSubscription, SearchRegion,
};
use midiauto_domain::error::MatchError;
use midiauto_domain::geometry::Rect;

#[derive(Debug, Default)]
struct Inner {
    visible: Mutex<HashMap<PathBuf, Rect>>,
    live_subscriptions: AtomicUsize,
    observations: AtomicUsize,
}

/// Simulated screen shared between the engine and whoever drives it.
#[derive(Debug, Clone, Default)]
pub struct VirtualScreen {
    inner: Arc<Inner>,
}

impl VirtualScreen {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `template` visible at `region`, replacing any earlier position.
    pub fn show(&self, template: impl Into<PathBuf>, region: Rect) {
        let template = template.into();
        tracing::debug!(template = %template.display(), %region, "template shown");
        self.lock_visible().insert(template, region);
    }

    pub fn hide(&self, template: impl AsRef<Path>) {
        let template = template.as_ref();
        if self.lock_visible().remove(template).is_some() {
            tracing::debug!(template = %template.display(), "template hidden");
        }
    }

    /// Where `template` currently is, if visible inside `region`.
    #[must_use]
    pub fn locate(&self, template: &Path, region: SearchRegion) -> Option<Rect> {
        let found = self.lock_visible().get(template).copied()?;
        match region {
            SearchRegion::FullScreen => Some(found),
            SearchRegion::Fixed(bounds) if bounds.contains(&found) => Some(found),
            SearchRegion::Fixed(_) => None,
        }
    }

    /// Subscriptions not yet released.
    #[must_use]
    pub fn live_subscriptions(&self) -> usize {
        self.inner.live_subscriptions.load(Ordering::SeqCst)
    }

    /// Total observations started, across all subscriptions.
    #[must_use]
    pub fn observations(&self) -> usize {
        self.inner.observations.load(Ordering::SeqCst)
    }

    fn lock_visible(&self) -> MutexGuard<'_, HashMap<PathBuf, Rect>> {
        self.inner
            .visible
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl MatchService for VirtualScreen {
    type Subscription = VirtualSubscription;

    fn subscribe(
        &self,
        template: &Path,
        settings: MatchSettings,
    ) -> Result<VirtualSubscription, MatchError> {
        self.inner.live_subscriptions.fetch_add(1, Ordering::SeqCst);
        tracing::debug!(template = %template.display(), "virtual subscription opened");
        Ok(VirtualSubscription {
            screen: self.clone(),
            template: template.to_path_buf(),
            scan_period: scan_period(settings.scan_rate),
            released: false,
        })
    }
}

/// One template under observation.
#[derive(Debug)]
pub struct VirtualSubscription {
    screen: VirtualScreen,
    template: PathBuf,
    scan_period: Duration,
    released: bool,
}

impl MatchSubscription for VirtualSubscription {
    fn observe_once(
        &mut self,
        region: SearchRegion,
        timeout: Duration,
    ) -> impl Future<Output = Result<MatchOutcome, MatchError>> + Send {
        self.screen.inner.observations.fetch_add(1, Ordering::SeqCst);
        let screen = self.screen.clone();
        let template = self.template.clone();
        let period = self.scan_period;
        let released = self.released;

        async move {
            if released {
                return Err(MatchError::Service(
                    format!("subscription for {} already released", template.display()).into(),
                ));
            }
            let deadline = Instant::now() + timeout;
            loop {
                if let Some(found) = screen.locate(&template, region) {
                    return Ok(MatchOutcome::Found(found));
                }
                let now = Instant::now();
                if now >= deadline {
                    return Ok(MatchOutcome::NotFound);
                }
                tokio::time::sleep_until(deadline.min(now + period)).await;
            }
        }
    }

    fn release(&mut self) {
        if self.released {
            return;
        }
        self.released = true;
        self.screen
            .inner
            .live_subscriptions
            .fetch_sub(1, Ordering::SeqCst);
        tracing::debug!(template = %self.template.display(), "virtual subscription released");
    }
}

impl Drop for VirtualSubscription {
    fn drop(&mut self) {
        self.release();
    }
}

fn scan_period(scan_rate: f64) -> Duration {
    if scan_rate.is_finite() && scan_rate > 0.0 {
        Duration::from_secs_f64(1.0 / scan_rate)
    } else {
        Duration::from_secs(1)
    }
}

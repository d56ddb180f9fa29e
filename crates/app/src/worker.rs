//! Automation worker — one task per automation.
//!
//! The worker wakes up every poll interval and, while its automation is
//! active, runs one trigger cycle: narrow the search region if possible,
//! wait for the template to appear, wait the configured min-delay, re-check
//! the `active` gate, and click.
//!
//! A watchdog task terminates the worker once its timeout elapses. The
//! termination is forceful: an in-flight match wait is dropped, not
//! awaited.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::Instant;

use midiauto_domain::error::MatchError;
use midiauto_domain::event::{EngineEvent, EngineEventKind};
use midiauto_domain::geometry::Rect;

use crate::automation::{Automation, WorkerState};
use crate::ports::{
    ClickExecutor, EventPublisher, MatchOutcome, MatchService, MatchSettings, MatchSubscription,
    SearchRegion,
};
use crate::stop::{StopReason, StopSignal};

/// Timing shared by all workers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WorkerSettings {
    /// Sleep between two checks of the `active` gate.
    pub poll_interval: Duration,
    /// Upper bound of a single match wait.
    pub match_timeout: Duration,
    pub min_similarity: f64,
}

/// Why a worker ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkerExit {
    Stopped,
    TimedOut { elapsed: Duration },
}

/// What a single trigger cycle did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleOutcome {
    /// The automation has no image; nothing to do.
    Skipped,
    /// The match was clicked.
    Ran,
    NotFound,
    /// A match was found but the automation was deactivated before the click.
    Deactivated,
    /// The match service reported an error.
    Failed,
    /// A stop request interrupted a wait.
    Interrupted,
}

/// Handle to a running worker.
#[derive(Debug)]
pub struct WorkerHandle {
    automation: Arc<Automation>,
    stop: StopSignal,
    task: JoinHandle<WorkerExit>,
}

impl WorkerHandle {
    #[must_use]
    pub fn automation(&self) -> &Arc<Automation> {
        &self.automation
    }

    /// Ask the worker to stop. Does not wait.
    pub fn stop(&self) {
        self.stop.stop(StopReason::Shutdown);
    }

    /// Wait for the worker to exit.
    ///
    /// A worker that panicked is reported as stopped.
    pub async fn join(self) -> WorkerExit {
        match self.task.await {
            Ok(exit) => exit,
            Err(err) => {
                tracing::error!(%err, automation = %self.automation.name(), "worker task failed");
                self.automation.set_state(WorkerState::Terminated);
                WorkerExit::Stopped
            }
        }
    }
}

/// The per-automation scheduling loop.
pub struct AutomationWorker<M: MatchService, C, P> {
    automation: Arc<Automation>,
    match_service: Arc<M>,
    subscription: Option<M::Subscription>,
    region: SearchRegion,
    clicker: Arc<C>,
    publisher: P,
    settings: WorkerSettings,
    stop: StopSignal,
}

impl<M, C, P> AutomationWorker<M, C, P>
where
    M: MatchService + 'static,
    C: ClickExecutor + 'static,
    P: EventPublisher + 'static,
{
    #[must_use]
    pub fn new(
        automation: Arc<Automation>,
        match_service: Arc<M>,
        clicker: Arc<C>,
        publisher: P,
        settings: WorkerSettings,
    ) -> Self {
        Self {
            automation,
            match_service,
            subscription: None,
            region: SearchRegion::FullScreen,
            clicker,
            publisher,
            settings,
            stop: StopSignal::new(),
        }
    }

    /// Spawn the worker (and its watchdog, if the automation has a timeout)
    /// on the current tokio runtime.
    #[must_use]
    pub fn spawn(self) -> WorkerHandle {
        let automation = Arc::clone(&self.automation);
        let stop = self.stop.clone();

        let timeout_ms = automation.descriptor().timeout_ms;
        if timeout_ms > 0 {
            tokio::spawn(watchdog(
                stop.clone(),
                Duration::from_millis(timeout_ms),
                Instant::now(),
            ));
        }

        let task = tokio::spawn(self.run());
        WorkerHandle {
            automation,
            stop,
            task,
        }
    }

    async fn run(mut self) -> WorkerExit {
        tracing::info!(
            automation = %self.automation.name(),
            trigger = %self.automation.trigger(),
            "automation worker started"
        );

        let reason = loop {
            tokio::select! {
                biased;
                reason = self.stop.stopped() => break reason,
                () = tokio::time::sleep(self.settings.poll_interval) => {}
            }
            if self.automation.is_active() {
                self.trigger_cycle().await;
            }
        };

        if let Some(mut subscription) = self.subscription.take() {
            subscription.release();
        }
        self.automation.set_state(WorkerState::Terminated);

        match reason {
            StopReason::Shutdown => {
                tracing::info!(automation = %self.automation.name(), "automation worker stopped");
                WorkerExit::Stopped
            }
            StopReason::TimedOut { elapsed } => {
                tracing::info!(
                    automation = %self.automation.name(),
                    elapsed_ms = elapsed.as_millis(),
                    "automation timed out"
                );
                self.publisher
                    .publish(EngineEvent::new(EngineEventKind::AutomationTimedOut {
                        automation_id: self.automation.id(),
                        name: self.automation.name().to_string(),
                        elapsed_ms: u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX),
                    }));
                WorkerExit::TimedOut { elapsed }
            }
        }
    }

    /// Run one search-and-click cycle.
    pub async fn trigger_cycle(&mut self) -> CycleOutcome {
        let outcome = self.search_and_run().await;
        if !self.stop.is_stopped() {
            self.automation.set_state(WorkerState::Idle);
        }
        outcome
    }

    async fn search_and_run(&mut self) -> CycleOutcome {
        let Some(template) = self.automation.descriptor().image.resolve() else {
            return CycleOutcome::Skipped;
        };

        self.narrow_search_region();

        if self.subscription.is_none() {
            match self.subscribe(&template) {
                Ok(subscription) => self.subscription = Some(subscription),
                Err(err) => {
                    tracing::warn!(
                        %err,
                        automation = %self.automation.name(),
                        template = %template.display(),
                        "failed to observe template"
                    );
                    return CycleOutcome::Failed;
                }
            }
        }
        let Some(subscription) = self.subscription.as_mut() else {
            return CycleOutcome::Failed;
        };

        self.automation.set_state(WorkerState::Searching);
        tracing::debug!(
            automation = %self.automation.name(),
            template = %template.display(),
            region = %self.region,
            scan_rate = self.automation.descriptor().scan_rate,
            "searching for match"
        );

        let result = tokio::select! {
            biased;
            _ = self.stop.stopped() => None,
            result = subscription.observe_once(self.region, self.settings.match_timeout) => Some(result),
        };

        match result {
            None => {
                tracing::debug!(automation = %self.automation.name(), "match wait interrupted");
                CycleOutcome::Interrupted
            }
            Some(Ok(MatchOutcome::Found(region))) => {
                tracing::info!(
                    automation = %self.automation.name(),
                    %region,
                    "found match on screen"
                );
                self.automation.set_state(WorkerState::Matched);
                self.automation.record_match(region);
                self.run_automation(region).await
            }
            Some(Ok(MatchOutcome::NotFound)) => {
                tracing::info!(
                    automation = %self.automation.name(),
                    template = %template.display(),
                    "could not find match on screen"
                );
                self.automation.set_state(WorkerState::NotFound);
                CycleOutcome::NotFound
            }
            Some(Err(err)) => {
                tracing::warn!(
                    %err,
                    automation = %self.automation.name(),
                    "match service failed"
                );
                self.automation.set_state(WorkerState::NotFound);
                CycleOutcome::Failed
            }
        }
    }

    /// Restrict the search to the last match, once, for non-movable targets.
    fn narrow_search_region(&mut self) {
        if self.region != SearchRegion::FullScreen || self.automation.descriptor().movable {
            return;
        }
        if let Some(last) = self.automation.last_found() {
            tracing::debug!(automation = %self.automation.name(), region = %last, "search region fixed");
            self.region = SearchRegion::Fixed(last);
        }
    }

    fn subscribe(&self, template: &Path) -> Result<M::Subscription, MatchError> {
        self.match_service.subscribe(
            template,
            MatchSettings {
                scan_rate: self.automation.descriptor().scan_rate,
                min_similarity: self.settings.min_similarity,
            },
        )
    }

    async fn run_automation(&mut self, region: Rect) -> CycleOutcome {
        let delay = Duration::from_millis(self.automation.descriptor().min_delay_ms);
        if !delay.is_zero() {
            tokio::select! {
                biased;
                _ = self.stop.stopped() => {
                    tracing::warn!(automation = %self.automation.name(), "delay before click interrupted");
                    return CycleOutcome::Interrupted;
                }
                () = tokio::time::sleep(delay) => {}
            }
        }

        // The gate may have been closed while waiting for the match. One-shot
        // triggers disarm here, so a re-arm landing during the click survives.
        let armed = !self.stop.is_stopped()
            && if self.automation.trigger().deactivates_after_run() {
                self.automation.disarm()
            } else {
                self.automation.is_active()
            };
        if !armed {
            tracing::debug!(
                automation = %self.automation.name(),
                "automation deactivated before click, skipping"
            );
            return CycleOutcome::Deactivated;
        }

        let click = self.automation.descriptor().click;
        self.clicker.click(region, click);
        self.publisher
            .publish(EngineEvent::new(EngineEventKind::AutomationFired {
                automation_id: self.automation.id(),
                name: self.automation.name().to_string(),
                region,
            }));
        CycleOutcome::Ran
    }

    /// Current search region. Only ever goes from full screen to fixed.
    #[must_use]
    pub fn search_region(&self) -> SearchRegion {
        self.region
    }
}

/// Stop the worker once `timeout` has elapsed since `started`, unless it
/// stops first.
async fn watchdog(stop: StopSignal, timeout: Duration, started: Instant) {
    tokio::select! {
        _ = stop.stopped() => {}
        () = tokio::time::sleep_until(started + timeout) => {
            stop.stop(StopReason::TimedOut { elapsed: started.elapsed() });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use midiauto_domain::automation::{AutomationDescriptor, ClickType, TriggerKind};
    use midiauto_domain::midi::MidiSignature;
    use std::collections::VecDeque;
    use std::future::Future;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    // ── Scripted match service ─────────────────────────────────────

    #[derive(Debug, Clone, Copy)]
    enum Step {
        Found(Rect),
        NotFound,
        Fail,
        Hang,
    }

    #[derive(Default)]
    struct Shared {
        script: Mutex<VecDeque<Step>>,
        observed: Mutex<Vec<SearchRegion>>,
        subscribed: AtomicUsize,
        live: AtomicUsize,
    }

    #[derive(Clone, Default)]
    struct ScriptedMatchService {
        shared: Arc<Shared>,
    }

    impl ScriptedMatchService {
        fn with(steps: Vec<Step>) -> Self {
            let service = Self::default();
            service.shared.script.lock().unwrap().extend(steps);
            service
        }

        fn observed(&self) -> Vec<SearchRegion> {
            self.shared.observed.lock().unwrap().clone()
        }

        fn live(&self) -> usize {
            self.shared.live.load(Ordering::SeqCst)
        }
    }

    struct ScriptedSubscription {
        shared: Arc<Shared>,
        released: bool,
    }

    impl MatchService for ScriptedMatchService {
        type Subscription = ScriptedSubscription;

        fn subscribe(
            &self,
            _template: &Path,
            _settings: MatchSettings,
        ) -> Result<ScriptedSubscription, MatchError> {
            self.shared.subscribed.fetch_add(1, Ordering::SeqCst);
            self.shared.live.fetch_add(1, Ordering::SeqCst);
            Ok(ScriptedSubscription {
                shared: Arc::clone(&self.shared),
                released: false,
            })
        }
    }

    impl MatchSubscription for ScriptedSubscription {
        fn observe_once(
            &mut self,
            region: SearchRegion,
            _timeout: Duration,
        ) -> impl Future<Output = Result<MatchOutcome, MatchError>> + Send {
            self.shared.observed.lock().unwrap().push(region);
            let step = self
                .shared
                .script
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or(Step::NotFound);
            async move {
                match step {
                    Step::Found(rect) => Ok(MatchOutcome::Found(rect)),
                    Step::NotFound => Ok(MatchOutcome::NotFound),
                    Step::Fail => Err(MatchError::Service(Box::new(std::io::Error::other(
                        "screen capture failed",
                    )))),
                    Step::Hang => std::future::pending().await,
                }
            }
        }

        fn release(&mut self) {
            if !self.released {
                self.released = true;
                self.shared.live.fetch_sub(1, Ordering::SeqCst);
            }
        }
    }

    // ── Recording clicker & spy publisher ──────────────────────────

    #[derive(Default)]
    struct RecordingClicker {
        clicks: Mutex<Vec<(Rect, ClickType)>>,
        rearm: Mutex<Option<Arc<Automation>>>,
    }

    impl RecordingClicker {
        fn clicks(&self) -> Vec<(Rect, ClickType)> {
            self.clicks.lock().unwrap().clone()
        }

        /// Arm `automation` from inside every click.
        fn rearm_on_click(&self, automation: Arc<Automation>) {
            *self.rearm.lock().unwrap() = Some(automation);
        }
    }

    impl ClickExecutor for RecordingClicker {
        fn click(&self, region: Rect, kind: ClickType) {
            self.clicks.lock().unwrap().push((region, kind));
            if let Some(automation) = self.rearm.lock().unwrap().as_ref() {
                automation.set_active(true);
            }
        }
    }

    #[derive(Default)]
    struct SpyPublisher {
        events: Mutex<Vec<EngineEvent>>,
    }

    impl EventPublisher for SpyPublisher {
        fn publish(&self, event: EngineEvent) {
            self.events.lock().unwrap().push(event);
        }
    }

    // ── Helpers ────────────────────────────────────────────────────

    const TARGET: Rect = Rect::new(100, 200, 40, 20);

    fn settings() -> WorkerSettings {
        WorkerSettings {
            poll_interval: Duration::from_millis(100),
            match_timeout: Duration::from_secs(10),
            min_similarity: 0.7,
        }
    }

    fn descriptor(trigger: TriggerKind) -> AutomationDescriptor {
        let mut builder = AutomationDescriptor::builder()
            .name("Play")
            .image("play.png")
            .trigger(trigger)
            .active(true);
        if trigger == TriggerKind::OnMidi {
            builder = builder.midi_signature("90_3C_7F".parse::<MidiSignature>().unwrap());
        }
        builder.build().unwrap()
    }

    type TestWorker = AutomationWorker<ScriptedMatchService, RecordingClicker, Arc<SpyPublisher>>;

    struct Fixture {
        automation: Arc<Automation>,
        service: ScriptedMatchService,
        clicker: Arc<RecordingClicker>,
        publisher: Arc<SpyPublisher>,
    }

    impl Fixture {
        fn new(descriptor: AutomationDescriptor, steps: Vec<Step>) -> Self {
            Self {
                automation: Arc::new(Automation::new(descriptor)),
                service: ScriptedMatchService::with(steps),
                clicker: Arc::new(RecordingClicker::default()),
                publisher: Arc::new(SpyPublisher::default()),
            }
        }

        fn worker(&self) -> TestWorker {
            AutomationWorker::new(
                Arc::clone(&self.automation),
                Arc::new(self.service.clone()),
                Arc::clone(&self.clicker),
                Arc::clone(&self.publisher),
                settings(),
            )
        }
    }

    // ── Trigger policies ───────────────────────────────────────────

    #[tokio::test]
    async fn should_click_and_deactivate_when_once_automation_finds_match() {
        let fx = Fixture::new(descriptor(TriggerKind::Once), vec![Step::Found(TARGET)]);
        let mut worker = fx.worker();

        let outcome = worker.trigger_cycle().await;

        assert_eq!(outcome, CycleOutcome::Ran);
        assert_eq!(fx.clicker.clicks(), vec![(TARGET, ClickType::Left)]);
        assert!(!fx.automation.is_active());
    }

    #[tokio::test]
    async fn should_deactivate_after_run_for_every_once_family_trigger() {
        for trigger in [TriggerKind::OncePerChange, TriggerKind::OnMidi] {
            let fx = Fixture::new(descriptor(trigger), vec![Step::Found(TARGET)]);
            let outcome = fx.worker().trigger_cycle().await;
            assert_eq!(outcome, CycleOutcome::Ran);
            assert!(!fx.automation.is_active(), "{trigger} stayed active");
        }
    }

    #[tokio::test]
    async fn should_keep_rearm_that_lands_during_click() {
        let fx = Fixture::new(descriptor(TriggerKind::OnMidi), vec![Step::Found(TARGET)]);
        fx.clicker.rearm_on_click(Arc::clone(&fx.automation));

        let outcome = fx.worker().trigger_cycle().await;

        assert_eq!(outcome, CycleOutcome::Ran);
        assert_eq!(fx.clicker.clicks().len(), 1);
        assert!(fx.automation.is_active());
    }

    #[tokio::test]
    async fn should_stay_active_when_always_automation_runs() {
        let fx = Fixture::new(descriptor(TriggerKind::Always), vec![Step::Found(TARGET)]);
        let outcome = fx.worker().trigger_cycle().await;
        assert_eq!(outcome, CycleOutcome::Ran);
        assert!(fx.automation.is_active());
    }

    #[tokio::test]
    async fn should_use_configured_click_type() {
        let mut d = descriptor(TriggerKind::Once);
        d.click = ClickType::Double;
        let fx = Fixture::new(d, vec![Step::Found(TARGET)]);
        fx.worker().trigger_cycle().await;
        assert_eq!(fx.clicker.clicks(), vec![(TARGET, ClickType::Double)]);
    }

    #[tokio::test]
    async fn should_publish_fired_event_when_clicked() {
        let fx = Fixture::new(descriptor(TriggerKind::Once), vec![Step::Found(TARGET)]);
        fx.worker().trigger_cycle().await;
        let events = fx.publisher.events.lock().unwrap();
        assert_eq!(events.len(), 1);
        assert!(matches!(
            events[0].kind,
            EngineEventKind::AutomationFired { region, .. } if region == TARGET
        ));
    }

    #[tokio::test]
    async fn should_skip_without_searching_when_image_is_none() {
        let mut d = descriptor(TriggerKind::Always);
        d.image = midiauto_domain::automation::ImageSource::None;
        let fx = Fixture::new(d, vec![Step::Found(TARGET)]);
        let mut worker = fx.worker();

        assert_eq!(worker.trigger_cycle().await, CycleOutcome::Skipped);
        assert_eq!(worker.trigger_cycle().await, CycleOutcome::Skipped);

        assert!(fx.clicker.clicks().is_empty());
        assert_eq!(fx.service.shared.subscribed.load(Ordering::SeqCst), 0);
        assert!(fx.automation.is_active());
    }

    #[tokio::test]
    async fn should_keep_active_and_last_found_when_not_found() {
        let fx = Fixture::new(descriptor(TriggerKind::Once), vec![Step::NotFound]);
        let outcome = fx.worker().trigger_cycle().await;
        assert_eq!(outcome, CycleOutcome::NotFound);
        assert!(fx.automation.is_active());
        assert_eq!(fx.automation.last_found(), None);
        assert!(fx.clicker.clicks().is_empty());
    }

    #[tokio::test]
    async fn should_recover_after_match_service_failure() {
        let fx = Fixture::new(
            descriptor(TriggerKind::Once),
            vec![Step::Fail, Step::Found(TARGET)],
        );
        let mut worker = fx.worker();

        assert_eq!(worker.trigger_cycle().await, CycleOutcome::Failed);
        assert!(fx.automation.is_active());
        assert_eq!(worker.trigger_cycle().await, CycleOutcome::Ran);
        assert_eq!(fx.clicker.clicks().len(), 1);
    }

    #[tokio::test]
    async fn should_return_to_idle_after_cycle() {
        let fx = Fixture::new(descriptor(TriggerKind::Always), vec![Step::Found(TARGET)]);
        fx.worker().trigger_cycle().await;
        assert_eq!(fx.automation.state(), WorkerState::Idle);
    }

    // ── Search region caching ──────────────────────────────────────

    #[tokio::test]
    async fn should_narrow_search_region_after_first_match() {
        let fx = Fixture::new(
            descriptor(TriggerKind::Always),
            vec![Step::Found(TARGET), Step::NotFound, Step::NotFound],
        );
        let mut worker = fx.worker();

        worker.trigger_cycle().await;
        worker.trigger_cycle().await;
        worker.trigger_cycle().await;

        assert_eq!(
            fx.service.observed(),
            vec![
                SearchRegion::FullScreen,
                SearchRegion::Fixed(TARGET),
                SearchRegion::Fixed(TARGET),
            ]
        );
        assert_eq!(worker.search_region(), SearchRegion::Fixed(TARGET));
    }

    #[tokio::test]
    async fn should_not_move_fixed_region_when_later_match_differs() {
        let elsewhere = Rect::new(0, 0, 5, 5);
        let fx = Fixture::new(
            descriptor(TriggerKind::Always),
            vec![Step::Found(TARGET), Step::Found(elsewhere), Step::NotFound],
        );
        let mut worker = fx.worker();

        worker.trigger_cycle().await;
        worker.trigger_cycle().await;
        worker.trigger_cycle().await;

        assert_eq!(fx.automation.last_found(), Some(elsewhere));
        assert_eq!(fx.service.observed()[2], SearchRegion::Fixed(TARGET));
    }

    #[tokio::test]
    async fn should_always_search_full_screen_when_movable() {
        let mut d = descriptor(TriggerKind::Always);
        d.movable = true;
        let fx = Fixture::new(d, vec![Step::Found(TARGET), Step::Found(TARGET)]);
        let mut worker = fx.worker();

        worker.trigger_cycle().await;
        worker.trigger_cycle().await;

        assert_eq!(
            fx.service.observed(),
            vec![SearchRegion::FullScreen, SearchRegion::FullScreen]
        );
    }

    #[tokio::test]
    async fn should_narrow_immediately_when_last_found_is_configured() {
        let mut d = descriptor(TriggerKind::Always);
        d.last_found = Some(TARGET);
        let fx = Fixture::new(d, vec![Step::NotFound]);
        fx.worker().trigger_cycle().await;
        assert_eq!(fx.service.observed(), vec![SearchRegion::Fixed(TARGET)]);
    }

    #[tokio::test]
    async fn should_subscribe_once_across_cycles() {
        let fx = Fixture::new(descriptor(TriggerKind::Always), vec![]);
        let mut worker = fx.worker();
        worker.trigger_cycle().await;
        worker.trigger_cycle().await;
        assert_eq!(fx.service.shared.subscribed.load(Ordering::SeqCst), 1);
    }

    // ── Races & cancellation ───────────────────────────────────────

    #[tokio::test(start_paused = true)]
    async fn should_not_click_when_deactivated_during_min_delay() {
        let mut d = descriptor(TriggerKind::OnMidi);
        d.min_delay_ms = 100;
        let fx = Fixture::new(d, vec![Step::Found(TARGET)]);
        let mut worker = fx.worker();
        let automation = Arc::clone(&fx.automation);

        let (outcome, ()) = tokio::join!(worker.trigger_cycle(), async move {
            tokio::time::sleep(Duration::from_millis(50)).await;
            automation.set_active(false);
        });

        assert_eq!(outcome, CycleOutcome::Deactivated);
        assert!(fx.clicker.clicks().is_empty());
        assert_eq!(fx.automation.last_found(), Some(TARGET));
    }

    #[tokio::test(start_paused = true)]
    async fn should_wait_min_delay_before_clicking() {
        let mut d = descriptor(TriggerKind::Once);
        d.min_delay_ms = 300;
        let fx = Fixture::new(d, vec![Step::Found(TARGET)]);
        let mut worker = fx.worker();

        let started = Instant::now();
        worker.trigger_cycle().await;

        assert!(started.elapsed() >= Duration::from_millis(300));
        assert_eq!(fx.clicker.clicks().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn should_terminate_when_timeout_elapses() {
        let mut d = descriptor(TriggerKind::Always);
        d.timeout_ms = 200;
        let fx = Fixture::new(d, vec![Step::Hang]);
        let handle = fx.worker().spawn();

        tokio::time::sleep(Duration::from_millis(250)).await;

        assert_eq!(fx.automation.state(), WorkerState::Terminated);
        assert!(matches!(handle.join().await, WorkerExit::TimedOut { .. }));
        assert_eq!(fx.service.live(), 0);

        let attempts = fx.service.observed().len();
        tokio::time::sleep(Duration::from_millis(500)).await;
        assert_eq!(fx.service.observed().len(), attempts);

        let events = fx.publisher.events.lock().unwrap();
        assert!(matches!(
            events.last().map(|e| &e.kind),
            Some(EngineEventKind::AutomationTimedOut { .. })
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn should_interrupt_match_wait_when_stopped() {
        let fx = Fixture::new(descriptor(TriggerKind::Always), vec![Step::Hang]);
        let handle = fx.worker().spawn();

        tokio::time::sleep(Duration::from_millis(150)).await;
        assert_eq!(fx.automation.state(), WorkerState::Searching);
        assert_eq!(fx.service.live(), 1);

        handle.stop();
        assert_eq!(handle.join().await, WorkerExit::Stopped);
        assert_eq!(fx.automation.state(), WorkerState::Terminated);
        assert_eq!(fx.service.live(), 0);
        assert!(fx.clicker.clicks().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn should_not_search_while_inactive() {
        let mut d = descriptor(TriggerKind::Once);
        d.active = false;
        let fx = Fixture::new(d, vec![Step::Found(TARGET)]);
        let handle = fx.worker().spawn();

        tokio::time::sleep(Duration::from_millis(1_000)).await;
        assert!(fx.service.observed().is_empty());

        fx.automation.set_active(true);
        tokio::time::sleep(Duration::from_millis(150)).await;
        assert_eq!(fx.clicker.clicks().len(), 1);
        assert!(!fx.automation.is_active());

        handle.stop();
        handle.join().await;
    }
}

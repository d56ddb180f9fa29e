//! Automation engine — owns the workers and exposes the control surface.
//!
//! [`AutomationEngine::start`] validates every descriptor, spawns one
//! worker per automation, and builds the dispatcher and execution gate.
//! All control operations are synchronous and safe to call from any
//! thread; only [`AutomationEngine::shutdown`] waits.

use std::sync::Arc;
use std::time::Duration;

use midiauto_domain::automation::AutomationDescriptor;
use midiauto_domain::error::{MidiAutoError, NotFoundError, ValidationError};
use midiauto_domain::id::AutomationId;
use midiauto_domain::midi::MidiSignature;

use crate::automation::Automation;
use crate::dispatcher::TriggerDispatcher;
use crate::gate::ExecutionGate;
use crate::pipeline::MidiPipeline;
use crate::ports::{ClickExecutor, EventPublisher, MatchService, MidiExecutor};
use crate::worker::{AutomationWorker, WorkerExit, WorkerHandle, WorkerSettings};

/// Engine-wide tuning.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EngineSettings {
    /// How often a worker checks its `active` gate.
    pub poll_interval: Duration,
    /// Upper bound of a single match wait.
    pub match_timeout: Duration,
    /// Minimum similarity for a template match, in `(0, 1]`.
    pub min_similarity: f64,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_millis(100),
            match_timeout: Duration::from_secs(10),
            min_similarity: 0.7,
        }
    }
}

impl EngineSettings {
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidSimilarity`] when `min_similarity`
    /// is outside `(0, 1]`.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !(self.min_similarity > 0.0 && self.min_similarity <= 1.0) {
            return Err(ValidationError::InvalidSimilarity(self.min_similarity));
        }
        Ok(())
    }

    fn worker(self) -> WorkerSettings {
        WorkerSettings {
            poll_interval: self.poll_interval,
            match_timeout: self.match_timeout,
            min_similarity: self.min_similarity,
        }
    }
}

pub struct AutomationEngine<P> {
    workers: Vec<WorkerHandle>,
    dispatcher: TriggerDispatcher,
    gate: Arc<ExecutionGate>,
    publisher: P,
}

impl<P> AutomationEngine<P>
where
    P: EventPublisher + Clone + 'static,
{
    /// Validate the descriptors and spawn their workers on the current
    /// tokio runtime.
    ///
    /// # Errors
    ///
    /// Returns a validation error for invalid settings or descriptors;
    /// nothing is spawned in that case.
    pub fn start<M, C>(
        descriptors: Vec<AutomationDescriptor>,
        settings: EngineSettings,
        match_service: Arc<M>,
        clicker: Arc<C>,
        publisher: P,
    ) -> Result<Self, MidiAutoError>
    where
        M: MatchService + 'static,
        C: ClickExecutor + 'static,
    {
        settings.validate()?;
        for descriptor in &descriptors {
            descriptor.validate()?;
        }

        let automations: Arc<[Arc<Automation>]> = descriptors
            .into_iter()
            .map(|descriptor| Arc::new(Automation::new(descriptor)))
            .collect();

        let workers = automations
            .iter()
            .map(|automation| {
                AutomationWorker::new(
                    Arc::clone(automation),
                    Arc::clone(&match_service),
                    Arc::clone(&clicker),
                    publisher.clone(),
                    settings.worker(),
                )
                .spawn()
            })
            .collect();

        tracing::info!(automations = automations.len(), "automation engine started");

        Ok(Self {
            workers,
            dispatcher: TriggerDispatcher::new(automations),
            gate: Arc::new(ExecutionGate::new()),
            publisher,
        })
    }

    #[must_use]
    pub fn automations(&self) -> &[Arc<Automation>] {
        self.dispatcher.automations()
    }

    #[must_use]
    pub fn automation(&self, id: AutomationId) -> Option<&Arc<Automation>> {
        self.automations().iter().find(|a| a.id() == id)
    }

    #[must_use]
    pub fn dispatcher(&self) -> &TriggerDispatcher {
        &self.dispatcher
    }

    #[must_use]
    pub fn gate(&self) -> &Arc<ExecutionGate> {
        &self.gate
    }

    /// Arm or disarm a single automation.
    ///
    /// # Errors
    ///
    /// Returns [`NotFoundError`] if no automation has this id.
    #[tracing::instrument(skip(self))]
    pub fn set_descriptor_active(&self, id: AutomationId, active: bool) -> Result<(), NotFoundError> {
        let automation = self.automation(id).ok_or_else(|| NotFoundError {
            entity: "Automation",
            id: id.to_string(),
        })?;
        automation.set_active(active);
        Ok(())
    }

    /// Arm every `once_per_change` automation. Returns how many were armed.
    pub fn activate_once_per_change_automations(&self) -> usize {
        self.dispatcher.activate_once_per_change_automations()
    }

    /// Arm the `on_midi` automations bound to `signature`. Returns how many
    /// were armed.
    pub fn activate_by_midi_signature(&self, signature: &MidiSignature) -> usize {
        self.dispatcher.activate_by_midi_signature(signature)
    }

    #[tracing::instrument(skip(self))]
    pub fn set_learn_mode(&self, enabled: bool) {
        self.gate.set_learn_mode(enabled);
    }

    #[tracing::instrument(skip(self))]
    pub fn suppress_next_execution(&self) {
        self.gate.suppress_next_execution();
    }

    /// Build a MIDI pipeline feeding this engine's dispatcher.
    #[must_use]
    pub fn pipeline<E: MidiExecutor>(&self, executor: E) -> MidiPipeline<E, P> {
        MidiPipeline::new(
            self.dispatcher.clone(),
            Arc::clone(&self.gate),
            executor,
            self.publisher.clone(),
        )
    }

    /// Stop every worker and wait for all of them to exit.
    pub async fn shutdown(self) -> Vec<(AutomationId, WorkerExit)> {
        for worker in &self.workers {
            worker.stop();
        }
        let mut exits = Vec::with_capacity(self.workers.len());
        for worker in self.workers {
            let id = worker.automation().id();
            exits.push((id, worker.join().await));
        }
        tracing::info!("automation engine stopped");
        exits
    }
}

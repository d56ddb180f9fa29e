//! MIDI interpretation pipeline — turns raw transport messages into
//! dispatches.
//!
//! Each message is decoded into a [`MidiSignature`], checked against the
//! [`ExecutionGate`], and then handed to the [`TriggerDispatcher`] and the
//! global-command executor. The suppression flag is consumed by every
//! message, whichever branch it takes.

use std::sync::Arc;

use midiauto_domain::event::{EngineEvent, EngineEventKind};
use midiauto_domain::midi::{MidiSignature, RawMidiEvent};

use crate::dispatcher::TriggerDispatcher;
use crate::gate::ExecutionGate;
use crate::ports::{EventPublisher, MidiExecutor, MidiReceiver};

/// What the pipeline did with one message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineOutcome {
    /// Forwarded to the dispatcher and the executor.
    Dispatched,
    /// Captured by learn mode.
    Learned,
    /// Dropped because a suppression was pending.
    Suppressed,
    /// Not a supported channel message.
    Unknown,
}

pub struct MidiPipeline<E, P> {
    dispatcher: TriggerDispatcher,
    gate: Arc<ExecutionGate>,
    executor: E,
    publisher: P,
}

impl<E, P> MidiPipeline<E, P>
where
    E: MidiExecutor,
    P: EventPublisher,
{
    #[must_use]
    pub fn new(
        dispatcher: TriggerDispatcher,
        gate: Arc<ExecutionGate>,
        executor: E,
        publisher: P,
    ) -> Self {
        Self {
            dispatcher,
            gate,
            executor,
            publisher,
        }
    }

    /// Process one raw message. Never fails: errors are logged.
    pub fn handle(&self, event: &RawMidiEvent<'_>) -> PipelineOutcome {
        let suppressed = self.gate.take_suppression();
        let signature = MidiSignature::encode(event);
        tracing::trace!(
            %signature,
            timestamp_micros = event.timestamp_micros,
            "midi message received"
        );

        if signature.is_unknown() {
            tracing::debug!(bytes = ?event.bytes, "ignoring unsupported midi message");
            return PipelineOutcome::Unknown;
        }

        if self.gate.is_learning() {
            tracing::info!(%signature, "learned midi signature");
            self.publisher
                .publish(EngineEvent::new(EngineEventKind::MidiSignatureLearned {
                    signature,
                }));
            return PipelineOutcome::Learned;
        }

        if suppressed {
            tracing::debug!(%signature, "midi execution suppressed");
            return PipelineOutcome::Suppressed;
        }

        self.dispatcher.activate_by_midi_signature(&signature);
        if let Err(err) = self.executor.execute(&signature) {
            tracing::warn!(%err, %signature, "midi command failed");
        }
        PipelineOutcome::Dispatched
    }
}

impl<E, P> MidiReceiver for MidiPipeline<E, P>
where
    E: MidiExecutor,
    P: EventPublisher,
{
    fn receive(&self, bytes: &[u8], timestamp_micros: u64) {
        self.handle(&RawMidiEvent::new(bytes, timestamp_micros));
    }
}

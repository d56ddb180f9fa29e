//! Global command executor — runs the non-screen action bound to a MIDI
//! signature (stepping backwards or forwards through the loaded content).
//!
//! The actual navigation belongs to whoever owns the content, so the
//! executor announces the command as an [`EngineEventKind::CommandTriggered`]
//! event and lets subscribers act on it.

use midiauto_domain::command::CommandBindings;
use midiauto_domain::error::ExecutionError;
use midiauto_domain::event::{EngineEvent, EngineEventKind};
use midiauto_domain::midi::MidiSignature;

use crate::ports::{EventPublisher, MidiExecutor};

pub struct CommandExecutor<P> {
    bindings: CommandBindings,
    publisher: P,
}

impl<P: EventPublisher> CommandExecutor<P> {
    #[must_use]
    pub fn new(bindings: CommandBindings, publisher: P) -> Self {
        Self {
            bindings,
            publisher,
        }
    }
}

impl<P: EventPublisher> MidiExecutor for CommandExecutor<P> {
    fn execute(&self, signature: &MidiSignature) -> Result<(), ExecutionError> {
        let Some(command) = self.bindings.lookup(signature) else {
            return Ok(());
        };
        tracing::info!(%command, %signature, "global command triggered");
        self.publisher
            .publish(EngineEvent::new(EngineEventKind::CommandTriggered {
                command,
                signature: signature.clone(),
            }));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use midiauto_domain::command::GlobalCommand;
    use std::sync::{Arc, Mutex};

    #[derive(Default)]
    struct SpyPublisher {
        events: Mutex<Vec<EngineEvent>>,
    }

    impl EventPublisher for SpyPublisher {
        fn publish(&self, event: EngineEvent) {
            self.events.lock().unwrap().push(event);
        }
    }

    fn executor() -> (CommandExecutor<Arc<SpyPublisher>>, Arc<SpyPublisher>) {
        let publisher = Arc::new(SpyPublisher::default());
        let bindings = CommandBindings {
            previous: Some("B0_10_7F".parse().unwrap()),
            next: Some("B0_11_7F".parse().unwrap()),
        };
        (
            CommandExecutor::new(bindings, Arc::clone(&publisher)),
            publisher,
        )
    }

    #[test]
    fn should_publish_command_when_signature_is_bound() {
        let (executor, publisher) = executor();

        executor.execute(&"B0_11_7F".parse().unwrap()).unwrap();

        let events = publisher.events.lock().unwrap();
        assert_eq!(events.len(), 1);
        assert!(matches!(
            events[0].kind,
            EngineEventKind::CommandTriggered {
                command: GlobalCommand::Next,
                ..
            }
        ));
    }

    #[test]
    fn should_do_nothing_when_signature_is_unbound() {
        let (executor, publisher) = executor();

        executor.execute(&"90_3C_7F".parse().unwrap()).unwrap();

        assert!(publisher.events.lock().unwrap().is_empty());
    }

    #[test]
    fn should_do_nothing_when_no_bindings() {
        let publisher = Arc::new(SpyPublisher::default());
        let executor = CommandExecutor::new(CommandBindings::default(), Arc::clone(&publisher));

        executor.execute(&"B0_10_7F".parse().unwrap()).unwrap();

        assert!(publisher.events.lock().unwrap().is_empty());
    }
}

//! MIDI ports — the transport side feeding raw messages in, and the
//! executor side handling global MIDI-triggered commands.

use std::sync::Arc;

use midiauto_domain::error::ExecutionError;
use midiauto_domain::midi::MidiSignature;

/// Receives raw MIDI messages from a transport.
///
/// Implementations must do bounded work: transports call this from their
/// own callback thread, once per message, without backpressure.
pub trait MidiReceiver: Send + Sync {
    fn receive(&self, bytes: &[u8], timestamp_micros: u64);
}

impl<T: MidiReceiver + ?Sized> MidiReceiver for Arc<T> {
    fn receive(&self, bytes: &[u8], timestamp_micros: u64) {
        (**self).receive(bytes, timestamp_micros);
    }
}

/// Executes the global (non-screen) action bound to a signature, if any.
pub trait MidiExecutor: Send + Sync {
    /// # Errors
    ///
    /// Returns an [`ExecutionError`] when the bound action fails. Callers
    /// log it and carry on.
    fn execute(&self, signature: &MidiSignature) -> Result<(), ExecutionError>;
}

impl<T: MidiExecutor + ?Sized> MidiExecutor for Arc<T> {
    fn execute(&self, signature: &MidiSignature) -> Result<(), ExecutionError> {
        (**self).execute(signature)
    }
}

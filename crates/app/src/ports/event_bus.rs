//! Event bus port — publish engine events to interested listeners.

use midiauto_domain::event::EngineEvent;

/// Publishes engine events to subscribers.
///
/// Publishing never blocks and never fails from the caller's point of
/// view: it is called from workers and from MIDI transport callbacks.
pub trait EventPublisher: Send + Sync {
    /// Publish an event to all current subscribers.
    fn publish(&self, event: EngineEvent);
}

impl<T: EventPublisher + ?Sized> EventPublisher for std::sync::Arc<T> {
    fn publish(&self, event: EngineEvent) {
        (**self).publish(event);
    }
}

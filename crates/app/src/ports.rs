//! Port definitions — traits that adapters implement.
//!
//! Ports are the boundaries between the engine and the outside world:
//! the visual match service, the pointer, MIDI transports, and whoever
//! listens to engine events. They are defined here (in `app`) so that both
//! the engine and the adapter crates can depend on them.

pub mod click;
pub mod event_bus;
pub mod match_service;
pub mod midi;

pub use click::ClickExecutor;
pub use event_bus::EventPublisher;
pub use match_service::{MatchOutcome, MatchService, MatchSettings, MatchSubscription, SearchRegion};
pub use midi::{MidiExecutor, MidiReceiver};

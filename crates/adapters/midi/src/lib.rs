//! # midiauto-adapter-midi
//!
//! MIDI transports feeding the engine's [`MidiReceiver`] port.
//!
//! ## Provided transports
//!
//! | Transport | Source | Notes |
//! |-----------|--------|-------|
//! | [`pump_lines`] | Any async line reader (stdin, file, pipe) | One message per line, hex bytes such as `90 3C 7F` |
//! | `MidirInput` | Hardware MIDI input port | Feature `midir`; picks the first port whose name contains the configured device |
//!
//! Transports do no interpretation: they forward raw bytes and a
//! microsecond timestamp, and the pipeline decides what they mean.
//!
//! ## Dependency rule
//!
//! Depends on `midiauto-app` (port traits) and `midiauto-domain` only.
//!
//! [`MidiReceiver`]: midiauto_app::ports::MidiReceiver

pub mod error;
mod hex;
mod lines;
#[cfg(feature = "midir")]
mod device;

#[cfg(feature = "midir")]
pub use device::{MidirInput, input_port_names};
pub use error::MidiAdapterError;
pub use hex::parse_hex_message;
pub use lines::pump_lines;

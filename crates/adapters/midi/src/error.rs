//! MIDI adapter error types.

use midiauto_domain::error::MidiAutoError;

/// Errors specific to the MIDI transports.
#[derive(Debug, thiserror::Error)]
pub enum MidiAdapterError {
    /// A text line held no bytes.
    #[error("empty MIDI message")]
    EmptyMessage,

    /// A text line was not a sequence of hex bytes.
    #[error("invalid hex MIDI message {0:?}")]
    InvalidHex(String),

    /// Reading the text source failed.
    #[error("failed to read MIDI source")]
    Io(#[source] std::io::Error),

    /// The platform MIDI backend could not be initialised.
    #[cfg(feature = "midir")]
    #[error("failed to initialise MIDI input")]
    Init(#[source] midir::InitError),

    /// No input port matched the configured device name.
    #[error("MIDI input device {0:?} not found")]
    DeviceNotFound(String),

    /// The input port was found but could not be opened.
    #[error("failed to connect MIDI input {port:?}: {reason}")]
    Connect { port: String, reason: String },
}

impl MidiAdapterError {
    /// Convert into a [`MidiAutoError::Transport`] for propagation across
    /// port boundaries.
    #[must_use]
    pub fn into_domain(self) -> MidiAutoError {
        MidiAutoError::Transport(Box::new(self))
    }
}

impl From<MidiAdapterError> for MidiAutoError {
    fn from(err: MidiAdapterError) -> Self {
        err.into_domain()
    }
}

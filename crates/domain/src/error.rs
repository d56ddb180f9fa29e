//! Common error types used across the workspace.
//!
//! Each layer defines its own typed errors and converts into
//! [`MidiAutoError`] via `#[from]` at the port boundaries.

/// Top-level error for the midiauto core.
#[derive(Debug, thiserror::Error)]
pub enum MidiAutoError {
    #[error("validation error")]
    Validation(#[from] ValidationError),

    #[error("not found")]
    NotFound(#[from] NotFoundError),

    #[error("match service error")]
    Match(#[from] MatchError),

    #[error("execution error")]
    Execution(#[from] ExecutionError),

    /// A MIDI transport (device, text source) failed.
    #[error("midi transport error")]
    Transport(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// Invariant violations detected while building an automation descriptor.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("name must not be empty")]
    EmptyName,

    #[error("automation triggered by MIDI requires a MIDI signature")]
    MissingMidiSignature,

    #[error("the UNKNOWN signature can never trigger an automation")]
    UnknownMidiSignature,

    #[error("scan rate must be positive, got {0}")]
    InvalidScanRate(f64),

    #[error("minimum similarity must be within (0, 1], got {0}")]
    InvalidSimilarity(f64),
}

/// A lookup by identifier found nothing.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{entity} {id} not found")]
pub struct NotFoundError {
    pub entity: &'static str,
    pub id: String,
}

/// Failures reported by the visual match service.
///
/// A match timeout is *not* an error: it is reported as a regular
/// not-found outcome.
#[derive(Debug, thiserror::Error)]
pub enum MatchError {
    #[error("match service failure")]
    Service(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// Failures while executing a global MIDI-triggered command.
#[derive(Debug, thiserror::Error)]
pub enum ExecutionError {
    #[error("command {0} is not available")]
    Unavailable(String),
}

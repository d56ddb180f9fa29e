//! Engine events — immutable records of what the engine did.
//!
//! Events are fire-and-forget notifications for logging and for the
//! configuration layer (e.g. capturing learned signatures).

use serde::{Deserialize, Serialize};

use crate::command::GlobalCommand;
use crate::geometry::Rect;
use crate::id::AutomationId;
use crate::midi::MidiSignature;
use crate::time::{Timestamp, now};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineEvent {
    pub timestamp: Timestamp,
    pub kind: EngineEventKind,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EngineEventKind {
    /// An automation clicked on a match.
    AutomationFired {
        automation_id: AutomationId,
        name: String,
        region: Rect,
    },
    /// An automation's worker ran past its timeout and was terminated.
    AutomationTimedOut {
        automation_id: AutomationId,
        name: String,
        elapsed_ms: u64,
    },
    /// A signature was received while learn mode was on.
    MidiSignatureLearned { signature: MidiSignature },
    /// A global command was triggered by MIDI.
    CommandTriggered {
        command: GlobalCommand,
        signature: MidiSignature,
    },
}

impl EngineEvent {
    /// Create an event stamped with the current time.
    #[must_use]
    pub fn new(kind: EngineEventKind) -> Self {
        Self {
            timestamp: now(),
            kind,
        }
    }
}

impl std::fmt::Display for EngineEventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AutomationFired { name, region, .. } => {
                write!(f, "automation_fired({name} at {region})")
            }
            Self::AutomationTimedOut {
                name, elapsed_ms, ..
            } => write!(f, "automation_timed_out({name} after {elapsed_ms}ms)"),
            Self::MidiSignatureLearned { signature } => {
                write!(f, "midi_signature_learned({signature})")
            }
            Self::CommandTriggered { command, signature } => {
                write!(f, "command_triggered({command} by {signature})")
            }
        }
    }
}

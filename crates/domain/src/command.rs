//! Global MIDI commands — controller messages bound to actions that do not
//! involve the screen, such as stepping through the loaded set list.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::midi::MidiSignature;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GlobalCommand {
    Previous,
    Next,
}

impl fmt::Display for GlobalCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Previous => "previous",
            Self::Next => "next",
        })
    }
}

/// Signatures bound to the global commands.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CommandBindings {
    pub previous: Option<MidiSignature>,
    pub next: Option<MidiSignature>,
}

impl CommandBindings {
    /// The command bound to `signature`, if any.
    ///
    /// `UNKNOWN` is never bound.
    #[must_use]
    pub fn lookup(&self, signature: &MidiSignature) -> Option<GlobalCommand> {
        if signature.is_unknown() {
            return None;
        }
        if self.previous.as_ref() == Some(signature) {
            Some(GlobalCommand::Previous)
        } else if self.next.as_ref() == Some(signature) {
            Some(GlobalCommand::Next)
        } else {
            None
        }
    }
}

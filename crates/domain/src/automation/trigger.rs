//! Trigger kinds — the policy governing when an automation may fire.

use std::fmt;

use serde::{Deserialize, Serialize};

/// When and how often an automation fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TriggerKind {
    /// Fire on every cycle in which the image is found. Never deactivates.
    Always,
    /// Fire once, then stay inactive until reactivated externally.
    Once,
    /// Fire once per "content changed" broadcast.
    OncePerChange,
    /// Fire once per matching MIDI signature.
    OnMidi,
}

impl TriggerKind {
    /// Whether a successful run flips the automation back to inactive.
    #[must_use]
    pub fn deactivates_after_run(self) -> bool {
        !matches!(self, Self::Always)
    }

    /// Default activation state when the configuration does not say.
    ///
    /// MIDI-driven automations wait for their signature; everything else
    /// is armed as soon as it is loaded.
    #[must_use]
    pub fn initially_active(self) -> bool {
        !matches!(self, Self::OnMidi)
    }
}

impl fmt::Display for TriggerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Always => "always",
            Self::Once => "once",
            Self::OncePerChange => "once_per_change",
            Self::OnMidi => "on_midi",
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_keep_always_active_after_run() {
        assert!(!TriggerKind::Always.deactivates_after_run());
    }

    #[test]
    fn should_deactivate_once_family_after_run() {
        assert!(TriggerKind::Once.deactivates_after_run());
        assert!(TriggerKind::OncePerChange.deactivates_after_run());
        assert!(TriggerKind::OnMidi.deactivates_after_run());
    }

    #[test]
    fn should_start_midi_automations_inactive() {
        assert!(!TriggerKind::OnMidi.initially_active());
        assert!(TriggerKind::OncePerChange.initially_active());
    }

    #[test]
    fn should_deserialize_snake_case_names() {
        let kind: TriggerKind = serde_json::from_str("\"once_per_change\"").unwrap();
        assert_eq!(kind, TriggerKind::OncePerChange);
    }

    #[test]
    fn should_display_same_name_as_serialized() {
        for kind in [
            TriggerKind::Always,
            TriggerKind::Once,
            TriggerKind::OncePerChange,
            TriggerKind::OnMidi,
        ] {
            let json = serde_json::to_string(&kind).unwrap();
            assert_eq!(json, format!("\"{kind}\""));
        }
    }
}

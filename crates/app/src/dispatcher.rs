//! Trigger dispatcher — arms automations in response to outside signals.
//!
//! Both operations fan out over every registered automation and only ever
//! set `active` to `true`, so calling them repeatedly is harmless.

use std::sync::Arc;

use midiauto_domain::automation::TriggerKind;
use midiauto_domain::midi::MidiSignature;

use crate::automation::Automation;

#[derive(Debug, Clone)]
pub struct TriggerDispatcher {
    automations: Arc<[Arc<Automation>]>,
}

impl TriggerDispatcher {
    #[must_use]
    pub fn new(automations: Arc<[Arc<Automation>]>) -> Self {
        Self { automations }
    }

    #[must_use]
    pub fn automations(&self) -> &[Arc<Automation>] {
        &self.automations
    }

    /// Re-arm every `once_per_change` automation. Returns how many were armed.
    pub fn activate_once_per_change_automations(&self) -> usize {
        let mut armed = 0;
        for automation in self
            .automations
            .iter()
            .filter(|a| a.trigger() == TriggerKind::OncePerChange)
        {
            automation.set_active(true);
            armed += 1;
        }
        if armed > 0 {
            tracing::info!(count = armed, "activated once-per-change automations");
        }
        armed
    }

    /// Arm every `on_midi` automation bound to `signature`. `UNKNOWN`
    /// matches nothing. Returns how many were armed.
    pub fn activate_by_midi_signature(&self, signature: &MidiSignature) -> usize {
        if signature.is_unknown() {
            return 0;
        }
        let mut armed = 0;
        for automation in self
            .automations
            .iter()
            .filter(|a| a.descriptor().responds_to(signature))
        {
            tracing::info!(automation = %automation.name(), %signature, "automation activated by midi");
            automation.set_active(true);
            armed += 1;
        }
        armed
    }
}

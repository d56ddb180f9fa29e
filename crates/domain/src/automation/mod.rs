//! Automation descriptors — one configured "find this image, then click it"
//! rule.
//!
//! A descriptor is the immutable configuration of an automation plus its
//! initial runtime state. The [`TriggerKind`] decides how often it fires,
//! the [`ClickType`] what happens on the match, and the optional
//! [`MidiSignature`] which controller message arms it.

mod click;
mod image;
mod trigger;

pub use click::ClickType;
pub use image::ImageSource;
pub use trigger::TriggerKind;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::geometry::Rect;
use crate::id::AutomationId;
use crate::midi::MidiSignature;

/// Default number of screen scans per second while waiting for a match.
pub const DEFAULT_SCAN_RATE: f64 = 3.0;

/// Configuration and initial state of a single automation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "DescriptorRecord")]
pub struct AutomationDescriptor {
    pub id: AutomationId,
    pub name: String,
    pub image: ImageSource,
    pub trigger: TriggerKind,
    pub click: ClickType,
    /// Movable targets are always searched on the full screen.
    pub movable: bool,
    /// Delay inserted between the match and the click.
    pub min_delay_ms: u64,
    /// Lifetime of the worker; `0` means no timeout.
    pub timeout_ms: u64,
    pub midi_signature: Option<MidiSignature>,
    pub scan_rate: f64,
    /// Whether the automation is armed when its worker starts.
    pub active: bool,
    /// Region of the last match, carried over from a previous session.
    pub last_found: Option<Rect>,
}

impl AutomationDescriptor {
    /// Create a builder for constructing an [`AutomationDescriptor`].
    #[must_use]
    pub fn builder() -> AutomationDescriptorBuilder {
        AutomationDescriptorBuilder::default()
    }

    /// Check domain invariants.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] when:
    /// - `name` is empty
    /// - an `OnMidi` automation has no signature, or the `UNKNOWN` one
    /// - `scan_rate` is not a positive number
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::EmptyName);
        }
        if self.trigger == TriggerKind::OnMidi {
            match &self.midi_signature {
                None => return Err(ValidationError::MissingMidiSignature),
                Some(sig) if sig.is_unknown() => {
                    return Err(ValidationError::UnknownMidiSignature);
                }
                Some(_) => {}
            }
        }
        if !(self.scan_rate.is_finite() && self.scan_rate > 0.0) {
            return Err(ValidationError::InvalidScanRate(self.scan_rate));
        }
        Ok(())
    }

    /// Whether this automation should be armed by the given signature.
    #[must_use]
    pub fn responds_to(&self, signature: &MidiSignature) -> bool {
        self.trigger == TriggerKind::OnMidi
            && !signature.is_unknown()
            && self.midi_signature.as_ref() == Some(signature)
    }
}

/// Step-by-step builder for [`AutomationDescriptor`].
#[derive(Debug, Default)]
pub struct AutomationDescriptorBuilder {
    id: Option<AutomationId>,
    name: Option<String>,
    image: ImageSource,
    trigger: Option<TriggerKind>,
    click: ClickType,
    movable: bool,
    min_delay_ms: u64,
    timeout_ms: u64,
    midi_signature: Option<MidiSignature>,
    scan_rate: Option<f64>,
    active: Option<bool>,
    last_found: Option<Rect>,
}

impl AutomationDescriptorBuilder {
    #[must_use]
    pub fn id(mut self, id: AutomationId) -> Self {
        self.id = Some(id);
        self
    }

    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn image(mut self, image: impl Into<ImageSource>) -> Self {
        self.image = image.into();
        self
    }

    #[must_use]
    pub fn trigger(mut self, trigger: TriggerKind) -> Self {
        self.trigger = Some(trigger);
        self
    }

    #[must_use]
    pub fn click(mut self, click: ClickType) -> Self {
        self.click = click;
        self
    }

    #[must_use]
    pub fn movable(mut self, movable: bool) -> Self {
        self.movable = movable;
        self
    }

    #[must_use]
    pub fn min_delay_ms(mut self, ms: u64) -> Self {
        self.min_delay_ms = ms;
        self
    }

    #[must_use]
    pub fn timeout_ms(mut self, ms: u64) -> Self {
        self.timeout_ms = ms;
        self
    }

    #[must_use]
    pub fn midi_signature(mut self, signature: MidiSignature) -> Self {
        self.midi_signature = Some(signature);
        self
    }

    #[must_use]
    pub fn scan_rate(mut self, rate: f64) -> Self {
        self.scan_rate = Some(rate);
        self
    }

    #[must_use]
    pub fn active(mut self, active: bool) -> Self {
        self.active = Some(active);
        self
    }

    #[must_use]
    pub fn last_found(mut self, region: Rect) -> Self {
        self.last_found = Some(region);
        self
    }

    /// Consume the builder, validate, and return an [`AutomationDescriptor`].
    ///
    /// Unless set explicitly, `active` follows
    /// [`TriggerKind::initially_active`].
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] if invariants fail.
    pub fn build(self) -> Result<AutomationDescriptor, ValidationError> {
        let trigger = self.trigger.unwrap_or(TriggerKind::Always);
        let descriptor = AutomationDescriptor {
            id: self.id.unwrap_or_default(),
            name: self.name.unwrap_or_default(),
            image: self.image,
            trigger,
            click: self.click,
            movable: self.movable,
            min_delay_ms: self.min_delay_ms,
            timeout_ms: self.timeout_ms,
            midi_signature: self.midi_signature,
            scan_rate: self.scan_rate.unwrap_or(DEFAULT_SCAN_RATE),
            active: self.active.unwrap_or_else(|| trigger.initially_active()),
            last_found: self.last_found,
        };
        descriptor.validate()?;
        Ok(descriptor)
    }
}

/// Serialized shape of a descriptor; every field but `name` is optional.
#[derive(Debug, Deserialize)]
struct DescriptorRecord {
    id: Option<AutomationId>,
    name: String,
    #[serde(default)]
    image: ImageSource,
    #[serde(default)]
    trigger: Option<TriggerKind>,
    #[serde(default)]
    click: ClickType,
    #[serde(default)]
    movable: bool,
    #[serde(default)]
    min_delay_ms: u64,
    #[serde(default)]
    timeout_ms: u64,
    midi_signature: Option<MidiSignature>,
    scan_rate: Option<f64>,
    active: Option<bool>,
    last_found: Option<Rect>,
}

impl TryFrom<DescriptorRecord> for AutomationDescriptor {
    type Error = ValidationError;

    fn try_from(record: DescriptorRecord) -> Result<Self, Self::Error> {
        let mut builder = AutomationDescriptor::builder()
            .name(record.name)
            .image(record.image)
            .click(record.click)
            .movable(record.movable)
            .min_delay_ms(record.min_delay_ms)
            .timeout_ms(record.timeout_ms);
        builder.id = record.id;
        builder.trigger = record.trigger;
        builder.midi_signature = record.midi_signature;
        builder.scan_rate = record.scan_rate;
        builder.active = record.active;
        builder.last_found = record.last_found;
        builder.build()
    }
}

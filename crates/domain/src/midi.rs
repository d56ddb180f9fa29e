//! MIDI signatures — canonical, comparable names for MIDI event shapes.
//!
//! A signature is what the configuration stores to bind a controller
//! button to an automation, so encoding must be stable across restarts:
//! the same bytes always produce the same string.
//!
//! Only channel-voice messages are supported. Anything else (system
//! messages, running status, truncated or oversized messages) encodes to
//! [`MidiSignature::UNKNOWN`], which never matches a configured signature.

use std::fmt;
use std::fmt::Write as _;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

const NOTE_OFF: u8 = 0x80;
const NOTE_ON: u8 = 0x90;

/// A raw MIDI message as delivered by a transport.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawMidiEvent<'a> {
    pub bytes: &'a [u8],
    /// Transport timestamp in microseconds. Does not affect the signature.
    pub timestamp_micros: u64,
}

impl<'a> RawMidiEvent<'a> {
    #[must_use]
    pub fn new(bytes: &'a [u8], timestamp_micros: u64) -> Self {
        Self {
            bytes,
            timestamp_micros,
        }
    }
}

/// Canonical signature of a MIDI message, e.g. `90_3C_7F`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct MidiSignature(String);

impl MidiSignature {
    /// Marker for unrecognised or unsupported messages.
    pub const UNKNOWN: &'static str = "UNKNOWN";

    #[must_use]
    pub fn unknown() -> Self {
        Self(Self::UNKNOWN.to_string())
    }

    #[must_use]
    pub fn is_unknown(&self) -> bool {
        self.0 == Self::UNKNOWN
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Encode a raw MIDI message.
    ///
    /// Never fails: malformed input yields [`MidiSignature::UNKNOWN`].
    /// A Note-On with velocity zero is interpreted as the Note-Off it
    /// stands for.
    #[must_use]
    pub fn encode(event: &RawMidiEvent<'_>) -> Self {
        Self::encode_bytes(event.bytes)
    }

    fn encode_bytes(bytes: &[u8]) -> Self {
        let Some((&status, data)) = bytes.split_first() else {
            return Self::unknown();
        };
        let Some(expected) = data_len(status) else {
            return Self::unknown();
        };
        if data.len() != expected || data.iter().any(|b| *b >= 0x80) {
            return Self::unknown();
        }

        let status = if status & 0xF0 == NOTE_ON && data[1] == 0 {
            NOTE_OFF | (status & 0x0F)
        } else {
            status
        };

        let mut text = format!("{status:02X}");
        for byte in data {
            // Writing into a String cannot fail.
            let _ = write!(text, "_{byte:02X}");
        }
        Self(text)
    }
}

/// Number of data bytes following a channel-voice status byte.
fn data_len(status: u8) -> Option<usize> {
    match status & 0xF0 {
        0x80 | 0x90 | 0xA0 | 0xB0 | 0xE0 => Some(2),
        0xC0 | 0xD0 => Some(1),
        _ => None,
    }
}

impl fmt::Display for MidiSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A configured signature string could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseSignatureError {
    #[error("invalid hex byte {0:?} in MIDI signature")]
    InvalidByte(String),

    #[error("{0:?} is not a supported MIDI message")]
    Unsupported(String),
}

impl FromStr for MidiSignature {
    type Err = ParseSignatureError;

    /// Parse a signature from configuration.
    ///
    /// The bytes are re-encoded so that configured signatures compare equal
    /// to what the codec produces (`90_3c_7f` parses as `90_3C_7F`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed == Self::UNKNOWN {
            return Ok(Self::unknown());
        }
        let bytes = trimmed
            .split('_')
            .map(|part| {
                if part.len() == 2 {
                    u8::from_str_radix(part, 16)
                        .map_err(|_| ParseSignatureError::InvalidByte(part.to_string()))
                } else {
                    Err(ParseSignatureError::InvalidByte(part.to_string()))
                }
            })
            .collect::<Result<Vec<u8>, _>>()?;

        let signature = Self::encode_bytes(&bytes);
        if signature.is_unknown() {
            return Err(ParseSignatureError::Unsupported(trimmed.to_string()));
        }
        Ok(signature)
    }
}

impl TryFrom<String> for MidiSignature {
    type Error = ParseSignatureError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<MidiSignature> for String {
    fn from(signature: MidiSignature) -> Self {
        signature.0
    }
}

//! Hex text encoding of raw MIDI messages, e.g. `90 3C 7F`.

use crate::error::MidiAdapterError;

/// Parse one message written as hex bytes.
///
/// Bytes may be separated by spaces, `_`, `,` or nothing at all, so
/// `90 3C 7F`, `90_3C_7F` (a signature) and `903c7f` are equivalent.
///
/// # Errors
///
/// Returns [`MidiAdapterError::EmptyMessage`] for a blank line and
/// [`MidiAdapterError::InvalidHex`] for anything that is not whole hex bytes.
pub fn parse_hex_message(line: &str) -> Result<Vec<u8>, MidiAdapterError> {
    let digits: String = line
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '_' && *c != ',')
        .collect();
    if digits.is_empty() {
        return Err(MidiAdapterError::EmptyMessage);
    }
    if digits.len() % 2 != 0 || !digits.is_ascii() {
        return Err(MidiAdapterError::InvalidHex(line.trim().to_string()));
    }

    (0..digits.len())
        .step_by(2)
        .map(|i| {
            u8::from_str_radix(&digits[i..i + 2], 16)
                .map_err(|_| MidiAdapterError::InvalidHex(line.trim().to_string()))
        })
        .collect()
}

//! Line-oriented text source: one hex-encoded message per line.
//!
//! Blank lines and lines starting with `#` are skipped. Malformed lines are
//! logged and skipped; only a read failure ends the pump.

use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::time::Instant;

use midiauto_app::ports::MidiReceiver;

use crate::error::MidiAdapterError;
use crate::hex::parse_hex_message;

/// Forward every message read from `reader` to `receiver` until end of
/// input. Timestamps are microseconds since the pump started.
///
/// Returns the number of messages delivered.
///
/// # Errors
///
/// Returns [`MidiAdapterError::Io`] if reading fails.
pub async fn pump_lines<R, M>(reader: R, receiver: &M) -> Result<usize, MidiAdapterError>
where
    R: AsyncBufRead + Unpin,
    M: MidiReceiver + ?Sized,
{
    let started = Instant::now();
    let mut lines = reader.lines();
    let mut delivered = 0;

    while let Some(line) = lines.next_line().await.map_err(MidiAdapterError::Io)? {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        match parse_hex_message(line) {
            Ok(bytes) => {
                let timestamp = u64::try_from(started.elapsed().as_micros()).unwrap_or(u64::MAX);
                receiver.receive(&bytes, timestamp);
                delivered += 1;
            }
            Err(err) => tracing::warn!(%err, "skipping malformed midi line"),
        }
    }

    tracing::debug!(delivered, "midi line source ended");
    Ok(delivered)
}

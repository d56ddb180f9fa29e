//! Wall-clock timestamps attached to engine events.

use chrono::{DateTime, Utc};

/// UTC timestamp carried by every [`EngineEvent`](crate::event::EngineEvent).
pub type Timestamp = DateTime<Utc>;

/// Return the current UTC time.
#[must_use]
pub fn now() -> Timestamp {
    Utc::now()
}

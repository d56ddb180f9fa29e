//! # midiauto-adapter-virtual
//!
//! Virtual/demo screen and pointer for testing and demonstration.
//!
//! ## Provided adapters
//!
//! | Adapter | Port | Behaviour |
//! |---------|------|-----------|
//! | [`VirtualScreen`] | `MatchService` | Templates are shown/hidden at runtime; observations poll at the subscription's scan rate |
//! | [`RecordingClicker`] | `ClickExecutor` | Logs every click and keeps the most recent ones for inspection |
//!
//! ## Dependency rule
//!
//! Depends on `midiauto-app` (port traits) and `midiauto-domain` only.

mod clicker;
mod screen;

pub use clicker::{Click, DEFAULT_HISTORY, RecordingClicker};
pub use screen::{VirtualScreen, VirtualSubscription};

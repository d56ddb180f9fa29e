//! # midiauto-app
//!
//! Application layer — the trigger & dispatch engine and its **port
//! definitions** (traits).
//!
//! ## Responsibilities
//! - Define **port traits** that adapters must implement (driven/outbound ports):
//!   - `MatchService` / `MatchSubscription` — visual template matching
//!   - `ClickExecutor` — pointer clicks
//!   - `MidiExecutor` — global MIDI-triggered commands
//!   - `EventPublisher` — engine event notifications
//! - Define the **driving/inbound port** `MidiReceiver`, implemented by the
//!   MIDI pipeline and called by transports
//! - Run one **automation worker** per descriptor, with its watchdog
//! - Arm automations through the **trigger dispatcher**, gated by the
//!   **execution gate** (learn mode, single-shot suppression)
//! - Provide **in-process infrastructure** (event bus) that doesn't need IO
//!
//! ## Dependency rule
//! Depends on `midiauto-domain` only (plus `tokio` for tasks, timers and
//! channels). Never imports adapter crates. Adapters depend on *this*
//! crate, not the reverse.

pub mod automation;
pub mod command_executor;
pub mod dispatcher;
pub mod engine;
pub mod event_bus;
pub mod gate;
pub mod pipeline;
pub mod ports;
pub mod stop;
pub mod worker;

//! # midiauto-domain
//!
//! Pure domain model for the midiauto control-surface engine.
//!
//! ## Responsibilities
//! - Foundational types: typed identifiers, error conventions, timestamps, geometry
//! - Define **MIDI signatures** and the codec that derives them from raw bytes
//! - Define **Automation descriptors** (image, trigger kind, click type, timing)
//! - Define **Global commands** bound to MIDI signatures
//! - Define **Engine events** (what fired, what timed out, what was learned)
//! - Contain all invariant enforcement and domain logic
//!
//! ## Dependency rule
//! This crate has **no internal dependencies**.
//! It must never import anything from `app`, adapters, or external IO crates.
//! All IO boundaries are expressed as traits in the `app` crate (ports).

pub mod error;
pub mod geometry;
pub mod id;
pub mod time;

pub mod automation;
pub mod command;
pub mod event;
pub mod midi;

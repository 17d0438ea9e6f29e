//! Countdown state machine.
//!
//! - [`phase`]: phases, thresholds, classification
//! - [`format`]: display text
//! - [`engine`]: the ticking engine

pub mod engine;
pub mod format;
pub mod phase;

pub use engine::CountdownEngine;
pub use phase::{Phase, Thresholds};

//! `swanclock`: a countdown that can only be restarted with the right code.
//!
//! A [`countdown::CountdownEngine`] ticks down from a configurable start
//! duration through attention and warning phases to zero. While it is in
//! the attention or warning phase, a console line matching the reference
//! code (`4 8 15 16 23 42`) passes the [`gate::DispatchGate`] and the
//! [`driver::Driver`] restarts the countdown. Reaching zero, or an
//! interrupt, ends the run with a scripted farewell.

pub mod cli;
pub mod config;
pub mod countdown;
pub mod display;
pub mod driver;
pub mod error;
pub mod farewell;
pub mod gate;
pub mod numeric;
pub mod observability;

//! Platform abstraction layer
//!
//! Handles device input that arrives off the simulation thread:
//! - Tilt sampling and smoothing
//! - Handoff to the step function

pub mod input;

pub use input::{TiltFilter, TiltMailbox, TiltSampler, TiltSource};

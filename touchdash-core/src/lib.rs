//! Board-agnostic core logic for the touchdash panel firmware
//!
//! This crate contains the bridge between the touch controller, the display
//! controller and the retained-mode renderer, none of which depend on
//! specific hardware:
//!
//! - Hardware abstraction traits (touch controller, pixel sink, GUI runtime)
//! - Touch-to-display coordinate mapping
//! - Display flush adapter and completion handshake
//! - GUI tick/timer pump
//! - Dashboard state and serial line ingestion
//! - Startup supervision
//! - Configuration types and parser

#![no_std]
#![deny(unsafe_code)]

#[cfg(test)]
extern crate std;

pub mod config;
pub mod context;
pub mod dashboard;
pub mod input;
pub mod output;
pub mod pump;
pub mod startup;
pub mod traits;

pub use context::{SerialPoll, UiContext};

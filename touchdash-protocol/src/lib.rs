//! Dashboard Serial Line Protocol
//!
//! This crate defines the text protocol a vehicle controller uses to push
//! telemetry to the touch panel. The protocol is deliberately primitive:
//! fire-and-forget ASCII lines with no escaping, checksum or acknowledgment.
//!
//! # Protocol Overview
//!
//! ```text
//! speed:99,range:130,mode:Sport,status:ARMED\n
//! └──┬──┘ └───┬───┘ └───┬────┘ └─────┬────┘
//!  field    field     field        field     (any order, any subset)
//! ```
//!
//! Each field is `key:value`. Numeric keys carry decimal integers, text keys
//! carry a short trimmed string. Keys absent from a line leave the panel's
//! state untouched, so a sender may update a single value per line.

#![no_std]
#![deny(unsafe_code)]

#[cfg(test)]
extern crate std;

pub mod keys;
pub mod line;
pub mod update;

pub use keys::{FieldKey, FieldKind};
pub use line::{Line, LineAssembler, LineError, DEFAULT_MAX_LINE, LINE_CAPACITY};
pub use update::{DashboardUpdate, Field, Text, TEXT_CAPACITY};

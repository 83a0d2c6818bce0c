//! Configuration types and parser
//!
//! Board-agnostic configuration structures, parsed from the `panel.toml`
//! embedded in the firmware image.

pub mod toml;
pub mod types;

pub use self::toml::{parse_config, ParseError, ParseErrorKind};
pub use types::*;

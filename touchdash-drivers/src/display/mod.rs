//! TFT display controllers

pub mod st7796;

pub use st7796::{St7796, St7796Config};

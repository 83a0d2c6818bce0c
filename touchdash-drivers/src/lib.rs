//! Hardware driver implementations
//!
//! This crate provides concrete implementations of the traits defined
//! in touchdash-core for the panel's controllers:
//!
//! - Touch controllers (GT911)
//! - Display controllers (ST7796)

#![no_std]
#![deny(unsafe_code)]

#[cfg(test)]
extern crate std;

pub mod display;
pub mod touch;

//! touchdash Hardware Abstraction Layer
//!
//! This crate defines the bus traits the touch and display drivers are
//! written against. Chip-specific HALs (RP2040 today) implement them, so the
//! drivers and the core bridge logic stay portable and host-testable.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  touchdash-firmware                     │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  touchdash-drivers (GT911, ST7796)      │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  touchdash-hal (this crate - traits)    │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  touchdash-hal-rp2040                   │
//! └─────────────────────────────────────────┘
//! ```
//!
//! # Traits
//!
//! - [`gpio::OutputPin`] - Control lines (reset, data/command, backlight)
//! - [`i2c::I2cBus`] - Touch controller bus, with 16-bit register helpers
//! - [`spi::SpiBus`] - Write-only display bus
//! - [`uart::UartRx`] - Non-blocking serial receive
//! - [`clock::Clock`] - Monotonic millisecond clock

#![no_std]
#![deny(unsafe_code)]

pub mod clock;
pub mod gpio;
pub mod i2c;
pub mod spi;
pub mod uart;

// Re-export key traits at crate root for convenience
pub use clock::Clock;
pub use gpio::{ActiveLevel, OutputPin};
pub use i2c::I2cBus;
pub use spi::SpiBus;
pub use uart::UartRx;

//! RP2040 bindings for the touchdash HAL
//!
//! Wraps embassy-rp peripherals so they implement the `touchdash-hal`
//! traits the drivers and the bridge core are written against:
//!
//! - Blocking I2C, SPI and GPIO output adapters
//! - Non-blocking receive over a buffered UART
//! - Millisecond clock over the embassy time driver
//! - Config-driven GPIO allocation

#![no_std]

pub mod bus;
pub mod clock;
pub mod pins;

pub use bus::{GpioOutput, I2cAdapter, SpiAdapter, UartAdapter};
pub use clock::InstantClock;
pub use pins::{BusPeripherals, PinBank, PinError};

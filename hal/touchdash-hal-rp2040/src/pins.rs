//! Config-driven GPIO allocation
//!
//! The bus pins are fixed by the board wiring and handed out typed, as the
//! peripheral constructors require. Every other GPIO goes into a
//! [`PinBank`] and is taken by number from the panel config.

use embassy_rp::gpio::{AnyPin, Level, Output};
use embassy_rp::peripherals::{
    I2C0, PIN_0, PIN_1, PIN_10, PIN_11, PIN_4, PIN_5, SPI1, UART0,
};
use embassy_rp::{Peri, Peripherals};
use touchdash_core::config::{PinConfig, MAX_GPIO};
use touchdash_hal::ActiveLevel;

use crate::bus::GpioOutput;

const GPIO_COUNT: usize = MAX_GPIO as usize;

/// GPIOs wired to the serial, touch and display buses
///
/// UART0 TX/RX on 0/1, I2C0 SDA/SCL on 4/5, SPI1 SCK/MOSI on 10/11.
pub const BUS_PINS: [u8; 6] = [0, 1, 4, 5, 10, 11];

/// Error when requesting a pin
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PinError {
    /// Pin number out of range (0-29 valid)
    InvalidPin(u8),
    /// Pin already taken
    AlreadyTaken(u8),
    /// Pin belongs to a bus
    Reserved(u8),
}

/// Check a pin number against the board wiring
pub fn check_pin(pin: u8) -> Result<(), PinError> {
    if usize::from(pin) >= GPIO_COUNT {
        return Err(PinError::InvalidPin(pin));
    }
    if BUS_PINS.contains(&pin) {
        return Err(PinError::Reserved(pin));
    }
    Ok(())
}

/// Peripherals the firmware builds its buses from
pub struct BusPeripherals {
    pub uart0: Peri<'static, UART0>,
    pub uart0_tx: Peri<'static, PIN_0>,
    pub uart0_rx: Peri<'static, PIN_1>,
    pub i2c0: Peri<'static, I2C0>,
    pub i2c0_sda: Peri<'static, PIN_4>,
    pub i2c0_scl: Peri<'static, PIN_5>,
    pub spi1: Peri<'static, SPI1>,
    pub spi1_clk: Peri<'static, PIN_10>,
    pub spi1_mosi: Peri<'static, PIN_11>,
}

/// Free GPIOs, taken by number
pub struct PinBank {
    pins: [Option<Peri<'static, AnyPin>>; GPIO_COUNT],
}

impl PinBank {
    /// Split the peripherals into the bus set and a bank of free pins
    pub fn from_peripherals(p: Peripherals) -> (Self, BusPeripherals) {
        let mut pins: [Option<Peri<'static, AnyPin>>; GPIO_COUNT] = [const { None }; GPIO_COUNT];
        pins[2] = Some(p.PIN_2.into());
        pins[3] = Some(p.PIN_3.into());
        pins[6] = Some(p.PIN_6.into());
        pins[7] = Some(p.PIN_7.into());
        pins[8] = Some(p.PIN_8.into());
        pins[9] = Some(p.PIN_9.into());
        pins[12] = Some(p.PIN_12.into());
        pins[13] = Some(p.PIN_13.into());
        pins[14] = Some(p.PIN_14.into());
        pins[15] = Some(p.PIN_15.into());
        pins[16] = Some(p.PIN_16.into());
        pins[17] = Some(p.PIN_17.into());
        pins[18] = Some(p.PIN_18.into());
        pins[19] = Some(p.PIN_19.into());
        pins[20] = Some(p.PIN_20.into());
        pins[21] = Some(p.PIN_21.into());
        pins[22] = Some(p.PIN_22.into());
        pins[23] = Some(p.PIN_23.into());
        pins[24] = Some(p.PIN_24.into());
        pins[25] = Some(p.PIN_25.into());
        pins[26] = Some(p.PIN_26.into());
        pins[27] = Some(p.PIN_27.into());
        pins[28] = Some(p.PIN_28.into());
        pins[29] = Some(p.PIN_29.into());

        let bus = BusPeripherals {
            uart0: p.UART0,
            uart0_tx: p.PIN_0,
            uart0_rx: p.PIN_1,
            i2c0: p.I2C0,
            i2c0_sda: p.PIN_4,
            i2c0_scl: p.PIN_5,
            spi1: p.SPI1,
            spi1_clk: p.PIN_10,
            spi1_mosi: p.PIN_11,
        };
        (Self { pins }, bus)
    }

    /// Take a pin by number
    pub fn take(&mut self, pin: u8) -> Result<Peri<'static, AnyPin>, PinError> {
        check_pin(pin)?;
        self.pins[usize::from(pin)]
            .take()
            .ok_or(PinError::AlreadyTaken(pin))
    }

    pub fn is_available(&self, pin: u8) -> bool {
        check_pin(pin).is_ok() && self.pins[usize::from(pin)].is_some()
    }

    /// Take a pin as an output driven to its inactive level
    pub fn take_output(&mut self, config: PinConfig) -> Result<ActiveLevel<GpioOutput>, PinError> {
        let pin = self.take(config.pin)?;
        let idle = if config.inverted { Level::High } else { Level::Low };
        let out = GpioOutput::new(Output::new(pin, idle));
        Ok(ActiveLevel::new(out, !config.inverted))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_pin() {
        assert_eq!(check_pin(9), Ok(()));
        assert_eq!(check_pin(29), Ok(()));
        assert_eq!(check_pin(30), Err(PinError::InvalidPin(30)));
        assert_eq!(check_pin(10), Err(PinError::Reserved(10)));
        assert_eq!(check_pin(1), Err(PinError::Reserved(1)));
    }
}

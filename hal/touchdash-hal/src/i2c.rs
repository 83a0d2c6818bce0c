//! I2C bus abstractions
//!
//! Capacitive touch controllers (GT911, FT6336, CST-series) sit on I2C and
//! most of them use 16-bit big-endian register addresses, so this trait
//! carries helpers for that addressing scheme.

/// Maximum payload accepted by [`I2cBus::write_reg16`]
pub const MAX_REG_WRITE: usize = 30;

/// I2C bus master
pub trait I2cBus {
    /// Error type for I2C operations
    type Error;

    /// Write data to a device at the given address
    ///
    /// # Arguments
    /// * `address` - 7-bit I2C address
    /// * `data` - Bytes to write
    fn write(&mut self, address: u8, data: &[u8]) -> Result<(), Self::Error>;

    /// Write then read in a single transaction (repeated start)
    ///
    /// # Arguments
    /// * `address` - 7-bit I2C address
    /// * `write_data` - Bytes to write (typically register address)
    /// * `read_buf` - Buffer to read into
    fn write_read(
        &mut self,
        address: u8,
        write_data: &[u8],
        read_buf: &mut [u8],
    ) -> Result<(), Self::Error>;

    /// Read a block starting at a 16-bit register address
    fn read_reg16(&mut self, address: u8, reg: u16, buf: &mut [u8]) -> Result<(), Self::Error> {
        self.write_read(address, &reg.to_be_bytes(), buf)
    }

    /// Write a block starting at a 16-bit register address
    ///
    /// Payloads longer than [`MAX_REG_WRITE`] are truncated.
    fn write_reg16(&mut self, address: u8, reg: u16, data: &[u8]) -> Result<(), Self::Error> {
        let mut frame = [0u8; 2 + MAX_REG_WRITE];
        let len = data.len().min(MAX_REG_WRITE);
        frame[..2].copy_from_slice(&reg.to_be_bytes());
        frame[2..2 + len].copy_from_slice(&data[..len]);
        self.write(address, &frame[..2 + len])
    }
}

/// I2C configuration
#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct I2cConfig {
    /// Clock frequency in Hz
    pub frequency: u32,
}

impl Default for I2cConfig {
    fn default() -> Self {
        Self::FAST
    }
}

impl I2cConfig {
    /// Standard mode (100 kHz)
    pub const STANDARD: Self = Self { frequency: 100_000 };

    /// Fast mode (400 kHz), what GT911 boards are usually wired for
    pub const FAST: Self = Self { frequency: 400_000 };
}

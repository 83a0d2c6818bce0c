//! Bus adapters over embedded-hal / embedded-io implementations

use embassy_rp::gpio::{Level, Output};
use touchdash_hal::i2c::I2cConfig;
use touchdash_hal::spi::{Mode, SpiConfig};
use touchdash_hal::uart::UartConfig;
use touchdash_hal::{I2cBus, OutputPin, SpiBus, UartRx};

/// Blocking I2C master
pub struct I2cAdapter<T>(T);

impl<T: embedded_hal::i2c::I2c> I2cAdapter<T> {
    pub fn new(inner: T) -> Self {
        Self(inner)
    }
}

impl<T: embedded_hal::i2c::I2c> I2cBus for I2cAdapter<T> {
    type Error = T::Error;

    fn write(&mut self, address: u8, data: &[u8]) -> Result<(), Self::Error> {
        self.0.write(address, data)
    }

    fn write_read(
        &mut self,
        address: u8,
        write_data: &[u8],
        read_buf: &mut [u8],
    ) -> Result<(), Self::Error> {
        self.0.write_read(address, write_data, read_buf)
    }
}

/// Blocking write-only SPI
pub struct SpiAdapter<T>(T);

impl<T: embedded_hal::spi::SpiBus<u8>> SpiAdapter<T> {
    pub fn new(inner: T) -> Self {
        Self(inner)
    }
}

impl<T: embedded_hal::spi::SpiBus<u8>> SpiBus for SpiAdapter<T> {
    type Error = T::Error;

    fn write(&mut self, data: &[u8]) -> Result<(), Self::Error> {
        self.0.write(data)
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        self.0.flush()
    }
}

/// Push-pull GPIO output
///
/// The level is tracked here because embedded-hal's stateful read needs
/// `&mut self`.
pub struct GpioOutput {
    pin: Output<'static>,
    high: bool,
}

impl GpioOutput {
    pub fn new(pin: Output<'static>) -> Self {
        let high = pin.is_set_high();
        Self { pin, high }
    }
}

impl OutputPin for GpioOutput {
    fn set_high(&mut self) {
        self.pin.set_level(Level::High);
        self.high = true;
    }

    fn set_low(&mut self) {
        self.pin.set_level(Level::Low);
        self.high = false;
    }

    fn is_set_high(&self) -> bool {
        self.high
    }
}

/// Non-blocking UART receiver
///
/// Reads only when the driver reports buffered data, so `read_available`
/// never waits on the line.
pub struct UartAdapter<T>(T);

impl<T: embedded_io::Read + embedded_io::ReadReady> UartAdapter<T> {
    pub fn new(inner: T) -> Self {
        Self(inner)
    }
}

impl<T: embedded_io::Read + embedded_io::ReadReady> UartRx for UartAdapter<T> {
    type Error = T::Error;

    fn read_available(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        if buf.is_empty() || !self.0.read_ready()? {
            return Ok(0);
        }
        self.0.read(buf)
    }
}

/// embassy-rp SPI settings for `config`
pub fn spi_config(config: &SpiConfig) -> embassy_rp::spi::Config {
    use embassy_rp::spi::{Phase, Polarity};

    let mut out = embassy_rp::spi::Config::default();
    out.frequency = config.frequency;
    let (polarity, phase) = match config.mode {
        Mode::Mode0 => (Polarity::IdleLow, Phase::CaptureOnFirstTransition),
        Mode::Mode3 => (Polarity::IdleHigh, Phase::CaptureOnSecondTransition),
    };
    out.polarity = polarity;
    out.phase = phase;
    out
}

/// embassy-rp I2C settings for `config`
pub fn i2c_config(config: &I2cConfig) -> embassy_rp::i2c::Config {
    let mut out = embassy_rp::i2c::Config::default();
    out.frequency = config.frequency;
    out
}

/// embassy-rp UART settings for `config`
pub fn uart_config(config: &UartConfig) -> embassy_rp::uart::Config {
    let mut out = embassy_rp::uart::Config::default();
    out.baudrate = config.baudrate;
    out
}

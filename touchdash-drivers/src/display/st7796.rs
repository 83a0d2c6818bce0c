//! ST7796 TFT controller (4-wire SPI)
//!
//! Commands are sent with D/C low, parameters and pixel data with D/C high.
//! Pixels are RGB565, most significant byte first.

use embedded_hal::delay::DelayNs;
use touchdash_core::output::Area;
use touchdash_core::traits::{DisplayError, PixelSink};
use touchdash_hal::{ActiveLevel, OutputPin, SpiBus};

/// ST7796 command opcodes
pub mod cmd {
    /// Software reset
    pub const SWRESET: u8 = 0x01;
    /// Sleep out
    pub const SLPOUT: u8 = 0x11;
    /// Display inversion on
    pub const INVON: u8 = 0x21;
    /// Display on
    pub const DISPON: u8 = 0x29;
    /// Column address set
    pub const CASET: u8 = 0x2A;
    /// Row address set
    pub const RASET: u8 = 0x2B;
    /// Memory write
    pub const RAMWR: u8 = 0x2C;
    /// Memory data access control
    pub const MADCTL: u8 = 0x36;
    /// Interface pixel format
    pub const COLMOD: u8 = 0x3A;
    /// Display inversion control
    pub const DIC: u8 = 0xB4;
    /// Display function control
    pub const DFC: u8 = 0xB6;
    /// Power control 2
    pub const PWR2: u8 = 0xC1;
    /// Power control 3
    pub const PWR3: u8 = 0xC2;
    /// VCOM control
    pub const VCMPCTL: u8 = 0xC5;
    /// Positive gamma
    pub const PGC: u8 = 0xE0;
    /// Negative gamma
    pub const NGC: u8 = 0xE1;
    /// Display output ctrl adjust
    pub const DOCA: u8 = 0xE8;
    /// Command set control
    pub const CSCON: u8 = 0xF0;
}

/// MADCTL bits
pub mod madctl {
    /// Row address order
    pub const MY: u8 = 0x80;
    /// Column address order
    pub const MX: u8 = 0x40;
    /// Row/column exchange
    pub const MV: u8 = 0x20;
    /// BGR color order
    pub const BGR: u8 = 0x08;
}

/// 16 bits per pixel
const COLMOD_RGB565: u8 = 0x55;

/// Pixels converted per SPI write
const PIXEL_CHUNK: usize = 64;

/// Bring-up sequence after reset and sleep-out: (command, parameters)
const INIT_SEQUENCE: &[(u8, &[u8])] = &[
    (cmd::CSCON, &[0xC3]),
    (cmd::CSCON, &[0x96]),
    (cmd::COLMOD, &[COLMOD_RGB565]),
    (cmd::DIC, &[0x01]),
    (cmd::DFC, &[0x80, 0x02, 0x3B]),
    (cmd::DOCA, &[0x40, 0x8A, 0x00, 0x00, 0x29, 0x19, 0xA5, 0x33]),
    (cmd::PWR2, &[0x06]),
    (cmd::PWR3, &[0xA7]),
    (cmd::VCMPCTL, &[0x18]),
    (
        cmd::PGC,
        &[0xF0, 0x09, 0x0B, 0x06, 0x04, 0x15, 0x2F, 0x54, 0x42, 0x3C, 0x17, 0x14, 0x18, 0x1B],
    ),
    (
        cmd::NGC,
        &[0xE0, 0x09, 0x0B, 0x06, 0x04, 0x03, 0x2B, 0x43, 0x42, 0x3B, 0x16, 0x14, 0x17, 0x1B],
    ),
    (cmd::CSCON, &[0x3C]),
    (cmd::CSCON, &[0x69]),
];

/// ST7796 panel configuration
#[derive(Debug, Clone, Copy)]
pub struct St7796Config {
    /// Width after MADCTL is applied
    pub width: u16,
    /// Height after MADCTL is applied
    pub height: u16,
    /// MADCTL value
    pub madctl: u8,
    /// Panel needs inverted colors
    pub invert: bool,
}

impl Default for St7796Config {
    /// 480x320 landscape, BGR panel
    fn default() -> Self {
        Self {
            width: 480,
            height: 320,
            madctl: madctl::MV | madctl::BGR,
            invert: true,
        }
    }
}

/// ST7796 driver
///
/// The controller is the only device on its bus, so chip select is asserted
/// once at init and left asserted.
pub struct St7796<B, P> {
    spi: B,
    dc: P,
    cs: ActiveLevel<P>,
    reset: ActiveLevel<P>,
    config: St7796Config,
    initialized: bool,
}

impl<B: SpiBus, P: OutputPin> St7796<B, P> {
    pub fn new(
        spi: B,
        dc: P,
        cs: ActiveLevel<P>,
        reset: ActiveLevel<P>,
        config: St7796Config,
    ) -> Self {
        Self {
            spi,
            dc,
            cs,
            reset,
            config,
            initialized: false,
        }
    }

    /// Reset and configure the controller, then turn the display on
    pub fn init<D: DelayNs>(&mut self, delay: &mut D) -> Result<(), DisplayError> {
        self.initialized = false;

        self.reset.assert();
        delay.delay_ms(10);
        self.reset.deassert();
        delay.delay_ms(120);

        self.cs.assert();
        self.command(cmd::SWRESET, &[])?;
        delay.delay_ms(120);
        self.command(cmd::SLPOUT, &[])?;
        delay.delay_ms(120);

        for &(op, params) in INIT_SEQUENCE {
            self.command(op, params)?;
        }
        self.command(cmd::MADCTL, &[self.config.madctl])?;
        if self.config.invert {
            self.command(cmd::INVON, &[])?;
        }

        self.command(cmd::DISPON, &[])?;
        delay.delay_ms(20);

        self.initialized = true;
        Ok(())
    }

    pub fn config(&self) -> &St7796Config {
        &self.config
    }

    fn command(&mut self, op: u8, params: &[u8]) -> Result<(), DisplayError> {
        self.dc.set_low();
        self.spi.write(&[op]).map_err(|_| DisplayError::Communication)?;
        self.dc.set_high();
        if !params.is_empty() {
            self.spi
                .write(params)
                .map_err(|_| DisplayError::Communication)?;
        }
        Ok(())
    }
}

impl<B: SpiBus, P: OutputPin> PixelSink for St7796<B, P> {
    fn set_window(&mut self, area: &Area) -> Result<(), DisplayError> {
        if !self.initialized {
            return Err(DisplayError::NotInitialized);
        }
        if area.x2 >= self.config.width || area.y2 >= self.config.height {
            return Err(DisplayError::InvalidCoordinates);
        }

        let [x1h, x1l] = area.x1.to_be_bytes();
        let [x2h, x2l] = area.x2.to_be_bytes();
        let [y1h, y1l] = area.y1.to_be_bytes();
        let [y2h, y2l] = area.y2.to_be_bytes();
        self.command(cmd::CASET, &[x1h, x1l, x2h, x2l])?;
        self.command(cmd::RASET, &[y1h, y1l, y2h, y2l])?;
        // D/C stays high: the data that follows goes to RAM
        self.command(cmd::RAMWR, &[])
    }

    fn write_pixels(&mut self, pixels: &[u16]) -> Result<(), DisplayError> {
        if !self.initialized {
            return Err(DisplayError::NotInitialized);
        }

        let mut bytes = [0u8; PIXEL_CHUNK * 2];
        for chunk in pixels.chunks(PIXEL_CHUNK) {
            for (dst, px) in bytes.chunks_exact_mut(2).zip(chunk) {
                dst.copy_from_slice(&px.to_be_bytes());
            }
            self.spi
                .write(&bytes[..chunk.len() * 2])
                .map_err(|_| DisplayError::Communication)?;
        }
        self.spi.flush().map_err(|_| DisplayError::Communication)
    }

    fn size(&self) -> (u16, u16) {
        (self.config.width, self.config.height)
    }
}

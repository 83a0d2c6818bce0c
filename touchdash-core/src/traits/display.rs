//! Display controller trait

use crate::output::Area;

/// Errors that can occur while driving the display controller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DisplayError {
    /// Communication error with display
    Communication,
    /// Window outside the panel
    InvalidCoordinates,
    /// Display not initialized
    NotInitialized,
}

/// Addressable-window pixel sink
///
/// Matches how SPI TFT controllers accept data: select a window, then
/// stream RGB565 pixels that fill it in row-major order.
pub trait PixelSink {
    /// Set the addressable window (inclusive bounds)
    fn set_window(&mut self, area: &Area) -> Result<(), DisplayError>;

    /// Stream pixels into the current window
    ///
    /// May be called several times per window; pixels continue where the
    /// previous call stopped.
    fn write_pixels(&mut self, pixels: &[u16]) -> Result<(), DisplayError>;

    /// Panel size in pixels as (width, height)
    fn size(&self) -> (u16, u16);
}

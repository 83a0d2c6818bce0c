//! UART receive abstractions
//!
//! The dashboard link is receive-only and polled from the control loop, so
//! the receiver must never block when nothing has arrived.

/// UART receiver
pub trait UartRx {
    /// Error type for receive operations
    type Error;

    /// Read whatever bytes are already buffered
    ///
    /// Returns `Ok(0)` immediately when no data is available.
    fn read_available(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error>;
}

/// UART configuration
#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct UartConfig {
    /// Baud rate in bits per second
    pub baudrate: u32,
}

impl Default for UartConfig {
    fn default() -> Self {
        Self { baudrate: 115_200 }
    }
}

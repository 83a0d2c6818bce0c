//! Configuration type definitions
//!
//! These types represent the panel configuration. Configuration is embedded
//! in the firmware image as TOML and parsed at startup.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use touchdash_protocol::LINE_CAPACITY;

use super::toml::ParseError;
use crate::dashboard::{MalformedPolicy, SerialIngestor};
use crate::input::{Orientation, TouchMapper};
use crate::pump::DEFAULT_LOOP_DELAY_MS;
use crate::startup::FailurePolicy;

/// Number of GPIO pins a pin string may name
pub const MAX_GPIO: u8 = 30;

/// Configuration errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Text could not be parsed
    Parse(ParseError),
    /// Display width or height is zero
    ZeroDimension,
    /// Draw buffer is empty or taller than the display
    DrawBufferLines,
    /// A period that must be positive is zero
    ZeroPeriod,
    /// Line limit is zero or beyond the assembler capacity
    LineLimit,
    /// Baud rate is zero
    ZeroBaudrate,
    /// Two control signals share a pin
    PinConflict(u8),
}

impl From<ParseError> for ConfigError {
    fn from(e: ParseError) -> Self {
        ConfigError::Parse(e)
    }
}

/// Pin configuration with optional inversion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PinConfig {
    /// GPIO pin number
    pub pin: u8,
    /// Pin is active-low
    pub inverted: bool,
}

impl PinConfig {
    pub const fn new(pin: u8) -> Self {
        Self {
            pin,
            inverted: false,
        }
    }

    /// Active-low pin
    pub const fn inverted(pin: u8) -> Self {
        Self {
            pin,
            inverted: true,
        }
    }
}

/// Display panel configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DisplayConfig {
    /// Width in pixels
    pub width: u16,
    /// Height in pixels
    pub height: u16,
    /// Draw buffer height in display rows
    pub draw_buffer_lines: u16,
    /// Renderer refresh period (ms)
    pub refresh_ms: u32,
    /// Cycle solid colors at boot
    pub self_test: bool,
    /// Time each self-test color is held (ms)
    pub self_test_ms: u32,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            width: 480,
            height: 320,
            // A tenth of the screen
            draw_buffer_lines: 32,
            refresh_ms: 30,
            self_test: false,
            self_test_ms: 1000,
        }
    }
}

impl DisplayConfig {
    /// Draw buffer size in pixels
    pub fn draw_buffer_len(&self) -> usize {
        usize::from(self.width) * usize::from(self.draw_buffer_lines)
    }
}

/// Touch controller configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TouchConfig {
    /// Controller-to-display orientation
    pub orientation: Orientation,
    /// Input read period (ms)
    pub poll_ms: u32,
    /// 7-bit I2C address
    pub address: u8,
}

impl Default for TouchConfig {
    fn default() -> Self {
        Self {
            orientation: Orientation::default(),
            poll_ms: 30,
            address: 0x5D,
        }
    }
}

/// Serial link configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SerialConfig {
    pub baudrate: u32,
    /// Longest accepted line in bytes
    pub max_line: u16,
    /// How malformed numbers are applied
    pub malformed: MalformedPolicy,
}

impl Default for SerialConfig {
    fn default() -> Self {
        Self {
            baudrate: 115_200,
            max_line: 128,
            malformed: MalformedPolicy::Reject,
        }
    }
}

/// Control loop configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PumpConfig {
    /// Sleep between loop iterations (ms)
    pub loop_delay_ms: u32,
}

impl Default for PumpConfig {
    fn default() -> Self {
        Self {
            loop_delay_ms: DEFAULT_LOOP_DELAY_MS,
        }
    }
}

/// Startup failure handling
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct StartupConfig {
    /// Retries per stage; 0 halts on the first failure
    pub attempts: u8,
    /// Wait between retries (ms)
    pub retry_delay_ms: u32,
}

impl Default for StartupConfig {
    fn default() -> Self {
        Self {
            attempts: 3,
            retry_delay_ms: 500,
        }
    }
}

impl StartupConfig {
    pub fn failure_policy(&self) -> FailurePolicy {
        if self.attempts == 0 {
            FailurePolicy::Halt
        } else {
            FailurePolicy::Retry {
                attempts: self.attempts,
                delay_ms: self.retry_delay_ms,
            }
        }
    }
}

/// Control pin assignment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PinsConfig {
    pub display_cs: PinConfig,
    pub display_dc: PinConfig,
    pub display_reset: PinConfig,
    pub backlight: PinConfig,
    pub touch_reset: PinConfig,
}

impl Default for PinsConfig {
    fn default() -> Self {
        Self {
            display_cs: PinConfig::inverted(9),
            display_dc: PinConfig::new(8),
            display_reset: PinConfig::inverted(12),
            backlight: PinConfig::new(13),
            touch_reset: PinConfig::inverted(14),
        }
    }
}

impl PinsConfig {
    /// All assigned pins
    pub fn all(&self) -> [PinConfig; 5] {
        [
            self.display_cs,
            self.display_dc,
            self.display_reset,
            self.backlight,
            self.touch_reset,
        ]
    }
}

/// Complete panel configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PanelConfig {
    pub display: DisplayConfig,
    pub touch: TouchConfig,
    pub serial: SerialConfig,
    pub pump: PumpConfig,
    pub startup: StartupConfig,
    pub pins: PinsConfig,
}

impl PanelConfig {
    /// Check cross-field constraints
    pub fn validate(&self) -> Result<(), ConfigError> {
        let d = &self.display;
        if d.width == 0 || d.height == 0 {
            return Err(ConfigError::ZeroDimension);
        }
        if d.draw_buffer_lines == 0 || d.draw_buffer_lines > d.height {
            return Err(ConfigError::DrawBufferLines);
        }
        if d.refresh_ms == 0 || self.touch.poll_ms == 0 {
            return Err(ConfigError::ZeroPeriod);
        }
        if self.serial.baudrate == 0 {
            return Err(ConfigError::ZeroBaudrate);
        }
        if self.serial.max_line == 0 || usize::from(self.serial.max_line) > LINE_CAPACITY {
            return Err(ConfigError::LineLimit);
        }

        let pins = self.pins.all();
        for (i, a) in pins.iter().enumerate() {
            if pins[i + 1..].iter().any(|b| b.pin == a.pin) {
                return Err(ConfigError::PinConflict(a.pin));
            }
        }

        Ok(())
    }

    /// Touch mapper for this panel
    pub fn touch_mapper(&self) -> TouchMapper {
        TouchMapper::new(
            self.touch.orientation,
            self.display.width,
            self.display.height,
        )
    }

    /// Serial ingestor for this panel
    pub fn serial_ingestor(&self) -> SerialIngestor {
        SerialIngestor::new(self.serial.malformed, usize::from(self.serial.max_line))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::Rotation;

    #[test]
    fn test_defaults_validate() {
        let config = PanelConfig::default();
        assert_eq!(config.validate(), Ok(()));
        assert_eq!(config.display.draw_buffer_len(), 480 * 32);
        assert_eq!(config.touch.orientation.rotation, Rotation::Deg90);
        assert_eq!(config.pump.loop_delay_ms, 5);
    }

    #[test]
    fn test_draw_buffer_bounds() {
        let mut config = PanelConfig::default();
        config.display.draw_buffer_lines = 0;
        assert_eq!(config.validate(), Err(ConfigError::DrawBufferLines));

        config.display.draw_buffer_lines = 321;
        assert_eq!(config.validate(), Err(ConfigError::DrawBufferLines));

        config.display.draw_buffer_lines = 320;
        assert_eq!(config.validate(), Ok(()));
    }

    #[test]
    fn test_line_limit() {
        let mut config = PanelConfig::default();
        config.serial.max_line = 257;
        assert_eq!(config.validate(), Err(ConfigError::LineLimit));
    }

    #[test]
    fn test_pin_conflict() {
        let mut config = PanelConfig::default();
        config.pins.backlight = PinConfig::new(8);
        assert_eq!(config.validate(), Err(ConfigError::PinConflict(8)));
    }

    #[test]
    fn test_failure_policy() {
        let mut startup = StartupConfig::default();
        assert_eq!(
            startup.failure_policy(),
            FailurePolicy::Retry {
                attempts: 3,
                delay_ms: 500
            }
        );

        startup.attempts = 0;
        assert_eq!(startup.failure_policy(), FailurePolicy::Halt);
    }
}

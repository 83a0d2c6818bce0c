//! Minimal TOML parser for panel configuration
//!
//! Handles only the subset needed for `panel.toml`. The build script checks
//! the file with a complete TOML parser before it is embedded.
//!
//! Supported features:
//! - [section] headers
//! - key = value pairs (string, integer, boolean)
//! - Decimal and `0x` hexadecimal integers, with `_` separators
//! - Comments (# ...)
//!
//! NOT supported:
//! - Arrays and tables
//! - Multi-line strings
//! - Dotted keys

use super::types::{ConfigError, PanelConfig, PinConfig, MAX_GPIO};
use crate::dashboard::MalformedPolicy;
use crate::input::Rotation;

/// What went wrong on a line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ParseErrorKind {
    /// Malformed section header
    InvalidSection,
    /// Section name not recognized
    UnknownSection,
    /// Key not recognized in its section
    UnknownKey,
    /// Line is neither a header nor `key = value`
    MissingValue,
    /// Value has the wrong type or is out of range
    InvalidValue,
    /// Pin string is not `gpioN` / `!gpioN`
    InvalidPin,
}

/// Parse error with its 1-based line number
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ParseError {
    pub line: u16,
    pub kind: ParseErrorKind,
}

/// Current parsing context
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Root,
    Display,
    Touch,
    Serial,
    Loop,
    Startup,
    Pins,
}

/// Parse and validate a configuration
pub fn parse_config(input: &str) -> Result<PanelConfig, ConfigError> {
    let config = parse_str(input)?;
    config.validate()?;
    Ok(config)
}

/// Parse a configuration without validating it
///
/// Keys not present keep their defaults.
pub fn parse_str(input: &str) -> Result<PanelConfig, ParseError> {
    let mut config = PanelConfig::default();
    let mut section = Section::Root;

    for (index, raw) in input.lines().enumerate() {
        let line_no = u16::try_from(index + 1).unwrap_or(u16::MAX);
        let at = |kind| ParseError {
            line: line_no,
            kind,
        };

        let line = strip_comment(raw).trim();
        if line.is_empty() {
            continue;
        }

        if line.starts_with('[') {
            if !line.ends_with(']') || line.len() < 3 {
                return Err(at(ParseErrorKind::InvalidSection));
            }
            section = parse_section_header(&line[1..line.len() - 1]).map_err(at)?;
            continue;
        }

        let (key, value) = parse_key_value(line).ok_or(at(ParseErrorKind::MissingValue))?;
        apply_value(&mut config, section, key, value).map_err(at)?;
    }

    Ok(config)
}

fn parse_section_header(header: &str) -> Result<Section, ParseErrorKind> {
    match header.trim() {
        "display" => Ok(Section::Display),
        "touch" => Ok(Section::Touch),
        "serial" => Ok(Section::Serial),
        "loop" => Ok(Section::Loop),
        "startup" => Ok(Section::Startup),
        "pins" => Ok(Section::Pins),
        "" => Err(ParseErrorKind::InvalidSection),
        _ => Err(ParseErrorKind::UnknownSection),
    }
}

fn apply_value(
    config: &mut PanelConfig,
    section: Section,
    key: &str,
    value: &str,
) -> Result<(), ParseErrorKind> {
    match section {
        Section::Display => {
            let d = &mut config.display;
            match key {
                "width" => d.width = parse_int(value)?,
                "height" => d.height = parse_int(value)?,
                "draw_buffer_lines" => d.draw_buffer_lines = parse_int(value)?,
                "refresh_ms" => d.refresh_ms = parse_int(value)?,
                "self_test" => d.self_test = parse_bool(value)?,
                "self_test_ms" => d.self_test_ms = parse_int(value)?,
                _ => return Err(ParseErrorKind::UnknownKey),
            }
        }
        Section::Touch => {
            let t = &mut config.touch;
            match key {
                "rotation" => {
                    t.orientation.rotation = Rotation::from_degrees(parse_int(value)?)
                        .ok_or(ParseErrorKind::InvalidValue)?
                }
                "flip_x" => t.orientation.flip_x = parse_bool(value)?,
                "flip_y" => t.orientation.flip_y = parse_bool(value)?,
                "poll_ms" => t.poll_ms = parse_int(value)?,
                "address" => {
                    let address: u8 = parse_int(value)?;
                    if address > 0x7F {
                        return Err(ParseErrorKind::InvalidValue);
                    }
                    t.address = address;
                }
                _ => return Err(ParseErrorKind::UnknownKey),
            }
        }
        Section::Serial => {
            let s = &mut config.serial;
            match key {
                "baudrate" => s.baudrate = parse_int(value)?,
                "max_line" => s.max_line = parse_int(value)?,
                "malformed" => {
                    s.malformed = MalformedPolicy::from_name(parse_string(value)?)
                        .ok_or(ParseErrorKind::InvalidValue)?
                }
                _ => return Err(ParseErrorKind::UnknownKey),
            }
        }
        Section::Loop => match key {
            "delay_ms" => config.pump.loop_delay_ms = parse_int(value)?,
            _ => return Err(ParseErrorKind::UnknownKey),
        },
        Section::Startup => {
            let s = &mut config.startup;
            match key {
                "attempts" => s.attempts = parse_int(value)?,
                "retry_delay_ms" => s.retry_delay_ms = parse_int(value)?,
                _ => return Err(ParseErrorKind::UnknownKey),
            }
        }
        Section::Pins => {
            let p = &mut config.pins;
            let slot = match key {
                "display_cs" => &mut p.display_cs,
                "display_dc" => &mut p.display_dc,
                "display_reset" => &mut p.display_reset,
                "backlight" => &mut p.backlight,
                "touch_reset" => &mut p.touch_reset,
                _ => return Err(ParseErrorKind::UnknownKey),
            };
            *slot = parse_pin(value)?;
        }
        Section::Root => return Err(ParseErrorKind::UnknownKey),
    }
    Ok(())
}

/// Drop a trailing `# comment` that is not inside a string
fn strip_comment(line: &str) -> &str {
    let mut in_string = false;
    for (i, c) in line.char_indices() {
        match c {
            '"' => in_string = !in_string,
            '#' if !in_string => return &line[..i],
            _ => {}
        }
    }
    line
}

/// Parse "key = value" line
fn parse_key_value(line: &str) -> Option<(&str, &str)> {
    let (key, value) = line.split_once('=')?;
    let key = key.trim();
    let value = value.trim();
    if key.is_empty() || value.is_empty() {
        return None;
    }
    Some((key, value))
}

/// Parse a string value (removes quotes)
fn parse_string(value: &str) -> Result<&str, ParseErrorKind> {
    if value.len() >= 2 && value.starts_with('"') && value.ends_with('"') {
        Ok(&value[1..value.len() - 1])
    } else {
        Err(ParseErrorKind::InvalidValue)
    }
}

/// Parse a non-negative integer and narrow it to the target type
fn parse_int<T: TryFrom<u32>>(value: &str) -> Result<T, ParseErrorKind> {
    let (digits, radix) = match value.strip_prefix("0x") {
        Some(hex) => (hex, 16),
        None => (value, 10),
    };
    if digits.is_empty() || digits.starts_with('_') || digits.ends_with('_') {
        return Err(ParseErrorKind::InvalidValue);
    }

    let mut acc: u32 = 0;
    for c in digits.chars() {
        if c == '_' {
            continue;
        }
        let d = c.to_digit(radix).ok_or(ParseErrorKind::InvalidValue)?;
        acc = acc
            .checked_mul(radix)
            .and_then(|v| v.checked_add(d))
            .ok_or(ParseErrorKind::InvalidValue)?;
    }

    T::try_from(acc).map_err(|_| ParseErrorKind::InvalidValue)
}

/// Parse a boolean value
fn parse_bool(value: &str) -> Result<bool, ParseErrorKind> {
    match value {
        "true" => Ok(true),
        "false" => Ok(false),
        _ => Err(ParseErrorKind::InvalidValue),
    }
}

/// Parse a pin string like "gpio8" or "!gpio12"
fn parse_pin(value: &str) -> Result<PinConfig, ParseErrorKind> {
    let value = parse_string(value).map_err(|_| ParseErrorKind::InvalidPin)?;
    let (inverted, name) = match value.strip_prefix('!') {
        Some(rest) => (true, rest),
        None => (false, value),
    };

    let number = name
        .strip_prefix("gpio")
        .ok_or(ParseErrorKind::InvalidPin)?;
    let pin: u8 = number.parse().map_err(|_| ParseErrorKind::InvalidPin)?;
    if pin >= MAX_GPIO {
        return Err(ParseErrorKind::InvalidPin);
    }

    Ok(PinConfig { pin, inverted })
}

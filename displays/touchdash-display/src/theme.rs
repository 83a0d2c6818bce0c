//! Color theme

use embedded_graphics::pixelcolor::raw::RawU16;
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;

fn rgb565(raw: u16) -> Rgb565 {
    Rgb565::from(RawU16::new(raw))
}

/// Dashboard colors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Theme {
    pub background: Rgb565,
    pub surface: Rgb565,
    pub highlight: Rgb565,
    pub border: Rgb565,
    pub header: Rgb565,
    pub accent: Rgb565,
    pub text_primary: Rgb565,
    pub text_secondary: Rgb565,
}

impl Default for Theme {
    /// Dark theme
    fn default() -> Self {
        Self {
            background: Rgb565::BLACK,
            surface: rgb565(0x18E3),
            highlight: rgb565(0x2965),
            border: rgb565(0x31A6),
            header: rgb565(0x3D7F),
            accent: rgb565(0xFBE0),
            text_primary: Rgb565::WHITE,
            text_secondary: rgb565(0xCE79),
        }
    }
}

/// Solid colors cycled by the panel self-test
pub const SELF_TEST_COLORS: [Rgb565; 6] = [
    Rgb565::RED,
    Rgb565::GREEN,
    Rgb565::BLUE,
    Rgb565::YELLOW,
    Rgb565::CYAN,
    Rgb565::MAGENTA,
];

/// Raw RGB565 value as sent to the panel
pub fn raw(color: Rgb565) -> u16 {
    RawU16::from(color).into_inner()
}

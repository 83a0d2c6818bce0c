//! Dashboard screen
//!
//! A header bar with the ride mode and controller status, above a 4x2 grid
//! of numeric tiles. The tile under a pressed pointer is highlighted.

use core::fmt::Write;

use embedded_graphics::mono_font::ascii::{FONT_10X20, FONT_6X10};
use embedded_graphics::mono_font::MonoTextStyle;
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{PrimitiveStyle, PrimitiveStyleBuilder, Rectangle};
use embedded_graphics::text::{Alignment, Baseline, Text, TextStyleBuilder};
use heapless::String;
use touchdash_core::dashboard::DashboardState;
use touchdash_core::input::PointerEvent;
use touchdash_core::output::Area;
use touchdash_protocol::FieldKey;

use crate::scene::Scene;
use crate::theme::Theme;

/// Header bar height in pixels
pub const HEADER_HEIGHT: u16 = 48;

const GRID_COLS: u16 = 4;
const GRID_ROWS: u16 = 2;
const TILE_GAP: u16 = 4;
const TEXT_INSET: i32 = 6;

struct Tile {
    key: FieldKey,
    label: &'static str,
    unit: &'static str,
}

const TILES: [Tile; 8] = [
    Tile { key: FieldKey::Speed, label: "SPEED", unit: "km/h" },
    Tile { key: FieldKey::Range, label: "RANGE", unit: "km" },
    Tile { key: FieldKey::AvgWh, label: "AVG", unit: "Wh/km" },
    Tile { key: FieldKey::Trip, label: "TRIP", unit: "km" },
    Tile { key: FieldKey::Odo, label: "ODO", unit: "km" },
    Tile { key: FieldKey::AvgKmh, label: "AVG SPEED", unit: "km/h" },
    Tile { key: FieldKey::Motor, label: "MOTOR", unit: "C" },
    Tile { key: FieldKey::Battery, label: "BATTERY", unit: "C" },
];

/// Dashboard scene
pub struct DashboardScreen {
    width: u16,
    height: u16,
    theme: Theme,
    state: DashboardState,
    pressed: Option<usize>,
}

impl DashboardScreen {
    pub fn new(width: u16, height: u16, theme: Theme) -> Self {
        Self {
            width,
            height,
            theme,
            state: DashboardState::default(),
            pressed: None,
        }
    }

    /// Values currently displayed
    pub fn state(&self) -> &DashboardState {
        &self.state
    }

    /// Key of the tile under a pressed pointer
    pub fn pressed_tile(&self) -> Option<FieldKey> {
        self.pressed.map(|i| TILES[i].key)
    }

    pub fn screen_area(&self) -> Area {
        Area {
            x1: 0,
            y1: 0,
            x2: self.width.saturating_sub(1),
            y2: self.height.saturating_sub(1),
        }
    }

    /// Screen area of the tile at `index` (row-major)
    pub fn tile_area(&self, index: usize) -> Area {
        let col = index as u16 % GRID_COLS;
        let row = index as u16 / GRID_COLS;
        let col_w = self.width / GRID_COLS;
        let row_h = self.height.saturating_sub(HEADER_HEIGHT) / GRID_ROWS;
        let w = col_w.saturating_sub(TILE_GAP).max(1);
        let h = row_h.saturating_sub(TILE_GAP).max(1);

        let x1 = col * col_w + TILE_GAP / 2;
        let y1 = HEADER_HEIGHT + row * row_h + TILE_GAP / 2;
        Area {
            x1,
            y1,
            x2: x1 + w - 1,
            y2: y1 + h - 1,
        }
    }

    fn tile_at(&self, x: i32, y: i32) -> Option<usize> {
        (0..TILES.len()).find(|&i| self.tile_area(i).contains(x, y))
    }

    fn draw_header<D>(&self, target: &mut D) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = Rgb565>,
    {
        let t = &self.theme;
        Rectangle::new(Point::zero(), Size::new(u32::from(self.width), u32::from(HEADER_HEIGHT)))
            .into_styled(PrimitiveStyle::with_fill(t.header))
            .draw(target)?;

        let mid = i32::from(HEADER_HEIGHT) / 2;
        let left = TextStyleBuilder::new()
            .alignment(Alignment::Left)
            .baseline(Baseline::Middle)
            .build();
        let right = TextStyleBuilder::new()
            .alignment(Alignment::Right)
            .baseline(Baseline::Middle)
            .build();

        Text::with_text_style(
            &self.state.mode,
            Point::new(TEXT_INSET * 2, mid),
            MonoTextStyle::new(&FONT_10X20, t.text_primary),
            left,
        )
        .draw(target)?;
        Text::with_text_style(
            &self.state.status,
            Point::new(i32::from(self.width) - TEXT_INSET * 2, mid),
            MonoTextStyle::new(&FONT_10X20, t.accent),
            right,
        )
        .draw(target)?;
        Ok(())
    }

    fn draw_tile<D>(&self, target: &mut D, index: usize) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = Rgb565>,
    {
        let t = &self.theme;
        let tile = &TILES[index];
        let rect = rectangle(&self.tile_area(index));
        let fill = if self.pressed == Some(index) {
            t.highlight
        } else {
            t.surface
        };

        rect.into_styled(
            PrimitiveStyleBuilder::new()
                .fill_color(fill)
                .stroke_color(t.border)
                .stroke_width(1)
                .build(),
        )
        .draw(target)?;

        let small = MonoTextStyle::new(&FONT_6X10, t.text_secondary);
        let top_left = rect.top_left + Point::new(TEXT_INSET, TEXT_INSET);
        Text::with_baseline(tile.label, top_left, small, Baseline::Top).draw(target)?;

        if let Some(bottom_right) = rect.bottom_right() {
            let unit_style = TextStyleBuilder::new()
                .alignment(Alignment::Right)
                .baseline(Baseline::Bottom)
                .build();
            Text::with_text_style(
                tile.unit,
                bottom_right - Point::new(TEXT_INSET, TEXT_INSET),
                small,
                unit_style,
            )
            .draw(target)?;
        }

        let mut value: String<12> = String::new();
        let _ = write!(value, "{}", self.state.integer(tile.key).unwrap_or(0));
        let centered = TextStyleBuilder::new()
            .alignment(Alignment::Center)
            .baseline(Baseline::Middle)
            .build();
        Text::with_text_style(
            &value,
            rect.center(),
            MonoTextStyle::new(&FONT_10X20, t.text_primary),
            centered,
        )
        .draw(target)?;
        Ok(())
    }
}

impl Scene for DashboardScreen {
    fn draw<D>(&self, target: &mut D) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = Rgb565>,
    {
        let clip = target.bounding_box();
        target.fill_solid(&clip, self.theme.background)?;

        let header = Rectangle::new(
            Point::zero(),
            Size::new(u32::from(self.width), u32::from(HEADER_HEIGHT)),
        );
        if overlaps(&clip, &header) {
            self.draw_header(target)?;
        }

        for index in 0..TILES.len() {
            if overlaps(&clip, &rectangle(&self.tile_area(index))) {
                self.draw_tile(target, index)?;
            }
        }
        Ok(())
    }

    fn on_pointer(&mut self, event: &PointerEvent) -> Option<Area> {
        let pressed = if event.is_pressed() {
            self.tile_at(event.x, event.y)
        } else {
            None
        };
        if pressed == self.pressed {
            return None;
        }

        let changed = match (self.pressed, pressed) {
            (Some(a), Some(b)) => self.tile_area(a).union(&self.tile_area(b)),
            (Some(i), None) | (None, Some(i)) => self.tile_area(i),
            (None, None) => return None,
        };
        self.pressed = pressed;
        Some(changed)
    }

    fn on_state(&mut self, state: &DashboardState) -> Option<Area> {
        self.state.clone_from(state);
        Some(self.screen_area())
    }
}

fn rectangle(area: &Area) -> Rectangle {
    Rectangle::new(
        Point::new(i32::from(area.x1), i32::from(area.y1)),
        Size::new(area.width(), area.height()),
    )
}

fn overlaps(a: &Rectangle, b: &Rectangle) -> bool {
    a.intersection(b).bottom_right().is_some()
}

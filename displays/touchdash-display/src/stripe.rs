//! Draw target over a draw-buffer stripe

use core::convert::Infallible;

use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;
use touchdash_core::output::Area;

/// `DrawTarget` that writes into the pixels of one screen area
///
/// Coordinates are absolute screen coordinates; anything outside the area is
/// clipped.
pub struct StripeCanvas<'a> {
    buf: &'a mut [u16],
    area: Area,
}

impl<'a> StripeCanvas<'a> {
    /// Wrap `buf` as the pixels of `area`
    ///
    /// Returns `None` if the buffer is too small for the area.
    pub fn new(buf: &'a mut [u16], area: Area) -> Option<Self> {
        let len = area.pixel_count();
        if buf.len() < len {
            return None;
        }
        Some(Self {
            buf: &mut buf[..len],
            area,
        })
    }

    pub fn area(&self) -> Area {
        self.area
    }

    fn index(&self, point: Point) -> Option<usize> {
        if !self.area.contains(point.x, point.y) {
            return None;
        }
        let dx = (point.x - i32::from(self.area.x1)) as usize;
        let dy = (point.y - i32::from(self.area.y1)) as usize;
        Some(dy * self.area.width() as usize + dx)
    }
}

impl Dimensions for StripeCanvas<'_> {
    fn bounding_box(&self) -> Rectangle {
        Rectangle::new(
            Point::new(i32::from(self.area.x1), i32::from(self.area.y1)),
            Size::new(self.area.width(), self.area.height()),
        )
    }
}

impl DrawTarget for StripeCanvas<'_> {
    type Color = Rgb565;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(point, color) in pixels {
            if let Some(i) = self.index(point) {
                self.buf[i] = color.into_storage();
            }
        }
        Ok(())
    }

    fn fill_solid(&mut self, area: &Rectangle, color: Self::Color) -> Result<(), Self::Error> {
        let clipped = area.intersection(&self.bounding_box());
        let Some(bottom_right) = clipped.bottom_right() else {
            return Ok(());
        };

        let raw = color.into_storage();
        let width = clipped.size.width as usize;
        for y in clipped.top_left.y..=bottom_right.y {
            if let Some(start) = self.index(Point::new(clipped.top_left.x, y)) {
                self.buf[start..start + width].fill(raw);
            }
        }
        Ok(())
    }

    fn clear(&mut self, color: Self::Color) -> Result<(), Self::Error> {
        self.buf.fill(color.into_storage());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_graphics::primitives::PrimitiveStyle;

    const RED: u16 = 0xF800;

    #[test]
    fn test_buffer_too_small() {
        let mut buf = [0u16; 9];
        let area = Area::new(0, 0, 4, 1).unwrap();
        assert!(StripeCanvas::new(&mut buf, area).is_none());
    }

    #[test]
    fn test_pixels_clipped_to_area() {
        let mut buf = [0u16; 10];
        let area = Area::new(10, 20, 14, 21).unwrap();
        let mut canvas = StripeCanvas::new(&mut buf, area).unwrap();

        let pixels = [
            Pixel(Point::new(10, 20), Rgb565::RED),
            Pixel(Point::new(14, 21), Rgb565::RED),
            Pixel(Point::new(9, 20), Rgb565::RED),
            Pixel(Point::new(10, 22), Rgb565::RED),
        ];
        canvas.draw_iter(pixels).unwrap();

        assert_eq!(buf[0], RED);
        assert_eq!(buf[9], RED);
        assert_eq!(buf.iter().filter(|&&p| p == RED).count(), 2);
    }

    #[test]
    fn test_fill_clipped_rectangle() {
        let mut buf = [0u16; 8];
        let area = Area::new(0, 4, 3, 5).unwrap();
        let mut canvas = StripeCanvas::new(&mut buf, area).unwrap();

        // Covers x 2..=5, y 0..=4: only (2,4) and (3,4) fall in the stripe
        Rectangle::new(Point::new(2, 0), Size::new(4, 5))
            .into_styled(PrimitiveStyle::with_fill(Rgb565::RED))
            .draw(&mut canvas)
            .unwrap();

        assert_eq!(buf, [0, 0, RED, RED, 0, 0, 0, 0]);
    }

    #[test]
    fn test_fill_outside_is_noop() {
        let mut buf = [0u16; 4];
        let area = Area::new(0, 0, 3, 0).unwrap();
        let mut canvas = StripeCanvas::new(&mut buf, area).unwrap();

        canvas
            .fill_solid(&Rectangle::new(Point::new(0, 5), Size::new(4, 4)), Rgb565::RED)
            .unwrap();

        assert_eq!(buf, [0; 4]);
    }

    #[test]
    fn test_clear() {
        let mut buf = [0u16; 4];
        let area = Area::new(0, 0, 1, 1).unwrap();
        let mut canvas = StripeCanvas::new(&mut buf, area).unwrap();
        canvas.clear(Rgb565::RED).unwrap();
        assert_eq!(buf, [RED; 4]);
    }
}

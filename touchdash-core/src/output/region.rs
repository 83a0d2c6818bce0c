//! Screen areas and dirty regions

/// Rectangle with inclusive bounds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Area {
    pub x1: u16,
    pub y1: u16,
    pub x2: u16,
    pub y2: u16,
}

impl Area {
    /// Create an area, or `None` if the corners are inverted
    pub fn new(x1: u16, y1: u16, x2: u16, y2: u16) -> Option<Self> {
        if x1 > x2 || y1 > y2 {
            return None;
        }
        Some(Self { x1, y1, x2, y2 })
    }

    /// Create an area from its top-left corner and size
    pub fn from_size(x: u16, y: u16, width: u16, height: u16) -> Option<Self> {
        if width == 0 || height == 0 {
            return None;
        }
        let x2 = x.checked_add(width - 1)?;
        let y2 = y.checked_add(height - 1)?;
        Some(Self { x1: x, y1: y, x2, y2 })
    }

    /// Whole screen of the given size
    pub fn screen(width: u16, height: u16) -> Option<Self> {
        Self::from_size(0, 0, width, height)
    }

    pub fn width(&self) -> u32 {
        u32::from(self.x2) - u32::from(self.x1) + 1
    }

    pub fn height(&self) -> u32 {
        u32::from(self.y2) - u32::from(self.y1) + 1
    }

    /// Number of pixels covered
    pub fn pixel_count(&self) -> usize {
        self.width() as usize * self.height() as usize
    }

    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= i32::from(self.x1)
            && x <= i32::from(self.x2)
            && y >= i32::from(self.y1)
            && y <= i32::from(self.y2)
    }

    /// Overlap of two areas
    pub fn intersect(&self, other: &Area) -> Option<Area> {
        Area::new(
            self.x1.max(other.x1),
            self.y1.max(other.y1),
            self.x2.min(other.x2),
            self.y2.min(other.y2),
        )
    }

    /// Smallest area covering both
    pub fn union(&self, other: &Area) -> Area {
        Area {
            x1: self.x1.min(other.x1),
            y1: self.y1.min(other.y1),
            x2: self.x2.max(other.x2),
            y2: self.y2.max(other.y2),
        }
    }

    /// Rows `first..first + rows` of this area, clipped to its bottom
    pub fn rows(&self, first: u16, rows: u16) -> Option<Area> {
        if rows == 0 {
            return None;
        }
        let y1 = self.y1.checked_add(first)?;
        if y1 > self.y2 {
            return None;
        }
        let y2 = y1.saturating_add(rows - 1).min(self.y2);
        Some(Area {
            x1: self.x1,
            y1,
            x2: self.x2,
            y2,
        })
    }
}

/// A rendered area and its pixels
///
/// Borrows the renderer's draw buffer for one flush call. Pixels are RGB565
/// in row-major order.
#[derive(Debug, Clone, Copy)]
pub struct DirtyRegion<'a> {
    pub area: Area,
    pub pixels: &'a [u16],
}

impl<'a> DirtyRegion<'a> {
    pub fn new(area: Area, pixels: &'a [u16]) -> Self {
        Self { area, pixels }
    }

    /// Buffer holds at least one pixel per covered position
    pub fn is_complete(&self) -> bool {
        self.pixels.len() >= self.area.pixel_count()
    }
}

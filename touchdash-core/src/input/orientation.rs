//! Panel orientation
//!
//! The touch controller reports in its native frame. The display may be
//! mounted rotated and/or mirrored relative to it, so the mapping is a
//! rotation followed by optional per-axis flips in display space.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Rotation from the controller frame into the display frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Rotation {
    /// (x, y) -> (x, y)
    Deg0,
    /// (x, y) -> (W - y, x)
    #[default]
    Deg90,
    /// (x, y) -> (W - x, H - y)
    Deg180,
    /// (x, y) -> (y, H - x)
    Deg270,
}

impl Rotation {
    /// Parse a rotation given in degrees
    pub fn from_degrees(degrees: u16) -> Option<Self> {
        match degrees {
            0 => Some(Self::Deg0),
            90 => Some(Self::Deg90),
            180 => Some(Self::Deg180),
            270 => Some(Self::Deg270),
            _ => None,
        }
    }

    /// Rotation in degrees
    pub fn degrees(self) -> u16 {
        match self {
            Self::Deg0 => 0,
            Self::Deg90 => 90,
            Self::Deg180 => 180,
            Self::Deg270 => 270,
        }
    }
}

/// Full orientation: rotation, then mirroring
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Orientation {
    pub rotation: Rotation,
    /// Mirror horizontally after rotation
    pub flip_x: bool,
    /// Mirror vertically after rotation
    pub flip_y: bool,
}

impl Orientation {
    /// Orientation with only a rotation
    pub const fn rotated(rotation: Rotation) -> Self {
        Self {
            rotation,
            flip_x: false,
            flip_y: false,
        }
    }

    /// Apply the orientation to a raw point
    ///
    /// # Arguments
    /// - `x`, `y`: Raw controller coordinates
    /// - `width`, `height`: Display size in pixels
    ///
    /// Out-of-range input is not clamped: results may fall outside the
    /// display or be negative.
    pub fn apply(&self, x: i32, y: i32, width: i32, height: i32) -> (i32, i32) {
        let (mut dx, mut dy) = match self.rotation {
            Rotation::Deg0 => (x, y),
            Rotation::Deg90 => (width - y, x),
            Rotation::Deg180 => (width - x, height - y),
            Rotation::Deg270 => (y, height - x),
        };

        if self.flip_x {
            dx = width - dx;
        }
        if self.flip_y {
            dy = height - dy;
        }

        (dx, dy)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const W: i32 = 480;
    const H: i32 = 320;

    #[test]
    fn test_default_is_quarter_turn() {
        let o = Orientation::default();
        assert_eq!(o.rotation, Rotation::Deg90);
        assert!(!o.flip_x);
        assert!(!o.flip_y);
    }

    #[test]
    fn test_rotations() {
        let p = (100, 50);
        let cases = [
            (Rotation::Deg0, (100, 50)),
            (Rotation::Deg90, (430, 100)),
            (Rotation::Deg180, (380, 270)),
            (Rotation::Deg270, (50, 220)),
        ];
        for (rotation, expected) in cases {
            let o = Orientation::rotated(rotation);
            assert_eq!(o.apply(p.0, p.1, W, H), expected, "{:?}", rotation);
        }
    }

    #[test]
    fn test_flips_after_rotation() {
        let o = Orientation {
            rotation: Rotation::Deg90,
            flip_x: true,
            flip_y: false,
        };
        // Rotated to (430, 100), then mirrored horizontally
        assert_eq!(o.apply(100, 50, W, H), (50, 100));

        let o = Orientation {
            rotation: Rotation::Deg0,
            flip_x: true,
            flip_y: true,
        };
        assert_eq!(o.apply(100, 50, W, H), (380, 270));
    }

    #[test]
    fn test_no_clamping() {
        let o = Orientation::default();
        // Raw y beyond the display width produces a negative x
        assert_eq!(o.apply(10, 500, W, H), (-20, 10));
    }

    #[test]
    fn test_degrees_roundtrip() {
        for deg in [0, 90, 180, 270] {
            let r = Rotation::from_degrees(deg).unwrap();
            assert_eq!(r.degrees(), deg);
        }
        assert_eq!(Rotation::from_degrees(45), None);
    }
}

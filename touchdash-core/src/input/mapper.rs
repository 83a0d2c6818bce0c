//! Touch-to-display coordinate mapping

use super::orientation::Orientation;
use crate::traits::TouchReport;

/// Pointer state as seen by the renderer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PointerState {
    Pressed,
    #[default]
    Released,
}

/// Single-touch sample in controller coordinates
///
/// Multi-touch reports are reduced to their first point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TouchSample {
    pub raw_x: u16,
    pub raw_y: u16,
    pub track_id: u8,
    pub pressed: bool,
}

impl TouchSample {
    /// Reduce a controller report to its first point
    pub fn from_report(report: &TouchReport) -> Self {
        match report.first() {
            Some(point) => Self {
                raw_x: point.x,
                raw_y: point.y,
                track_id: point.track_id,
                pressed: true,
            },
            None => Self::default(),
        }
    }
}

/// Pointer sample in display coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PointerEvent {
    pub x: i32,
    pub y: i32,
    pub state: PointerState,
}

impl PointerEvent {
    /// Pressed event at (x, y)
    pub const fn pressed(x: i32, y: i32) -> Self {
        Self {
            x,
            y,
            state: PointerState::Pressed,
        }
    }

    /// Released event at (x, y)
    pub const fn released(x: i32, y: i32) -> Self {
        Self {
            x,
            y,
            state: PointerState::Released,
        }
    }

    pub fn is_pressed(&self) -> bool {
        self.state == PointerState::Pressed
    }
}

/// Maps touch samples into display space
///
/// Remembers the last pressed position so that releases are reported where
/// the finger left the panel.
#[derive(Debug, Clone)]
pub struct TouchMapper {
    orientation: Orientation,
    width: i32,
    height: i32,
    last_x: i32,
    last_y: i32,
}

impl TouchMapper {
    /// Create a mapper for a display of the given size
    pub fn new(orientation: Orientation, width: u16, height: u16) -> Self {
        Self {
            orientation,
            width: i32::from(width),
            height: i32::from(height),
            last_x: 0,
            last_y: 0,
        }
    }

    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    /// Last pressed position in display coordinates
    pub fn last_position(&self) -> (i32, i32) {
        (self.last_x, self.last_y)
    }

    /// Map a raw point without touching the remembered position
    pub fn map_point(&self, raw_x: u16, raw_y: u16) -> (i32, i32) {
        self.orientation.apply(
            i32::from(raw_x),
            i32::from(raw_y),
            self.width,
            self.height,
        )
    }

    /// Map a sample into a pointer event
    ///
    /// Released samples ignore their coordinate fields.
    pub fn map(&mut self, sample: &TouchSample) -> PointerEvent {
        if !sample.pressed {
            return self.release();
        }

        let (x, y) = self.map_point(sample.raw_x, sample.raw_y);
        self.last_x = x;
        self.last_y = y;
        PointerEvent::pressed(x, y)
    }

    /// Released event at the last known position
    pub fn release(&self) -> PointerEvent {
        PointerEvent::released(self.last_x, self.last_y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::Rotation;
    use crate::traits::RawPoint;
    use proptest::prelude::*;

    const W: u16 = 480;
    const H: u16 = 320;

    fn mapper() -> TouchMapper {
        TouchMapper::new(Orientation::default(), W, H)
    }

    #[test]
    fn test_default_mapping() {
        let mut m = mapper();
        let sample = TouchSample {
            raw_x: 100,
            raw_y: 50,
            track_id: 0,
            pressed: true,
        };
        assert_eq!(m.map(&sample), PointerEvent::pressed(430, 100));
    }

    #[test]
    fn test_release_keeps_last_position() {
        let mut m = mapper();
        let press = TouchSample {
            raw_x: 10,
            raw_y: 20,
            track_id: 0,
            pressed: true,
        };
        m.map(&press);

        // Stale coordinates on a released sample are ignored
        let release = TouchSample {
            raw_x: 300,
            raw_y: 300,
            track_id: 0,
            pressed: false,
        };
        let event = m.map(&release);
        assert_eq!(event, PointerEvent::released(460, 10));
    }

    #[test]
    fn test_sample_from_report() {
        let mut report = TouchReport::single(7, 8, 3);
        report.count = 2;
        report
            .points
            .push(RawPoint {
                x: 99,
                y: 99,
                track_id: 4,
            })
            .unwrap();

        let sample = TouchSample::from_report(&report);
        assert!(sample.pressed);
        assert_eq!((sample.raw_x, sample.raw_y, sample.track_id), (7, 8, 3));

        assert!(!TouchSample::from_report(&TouchReport::released()).pressed);
    }

    #[test]
    fn test_count_without_points_is_released() {
        let report = TouchReport {
            count: 1,
            points: heapless::Vec::new(),
        };
        assert!(!TouchSample::from_report(&report).pressed);
    }

    #[test]
    fn test_configured_rotation() {
        let m = TouchMapper::new(Orientation::rotated(Rotation::Deg0), W, H);
        assert_eq!(m.map_point(12, 34), (12, 34));
    }

    proptest! {
        #[test]
        fn default_mapping_is_quarter_turn(x in 0u16..=H, y in 0u16..=W) {
            let mut m = mapper();
            let event = m.map(&TouchSample { raw_x: x, raw_y: y, track_id: 0, pressed: true });
            prop_assert_eq!(event.x, i32::from(W) - i32::from(y));
            prop_assert_eq!(event.y, i32::from(x));
            prop_assert!(event.is_pressed());
        }

        #[test]
        fn released_sample_is_never_pressed(x: u16, y: u16, track_id: u8) {
            let mut m = mapper();
            let event = m.map(&TouchSample { raw_x: x, raw_y: y, track_id, pressed: false });
            prop_assert_eq!(event.state, PointerState::Released);
        }
    }
}

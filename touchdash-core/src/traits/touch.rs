//! Touch controller trait

use heapless::Vec;

/// Maximum points a controller report can carry (GT911 tracks five)
pub const MAX_TOUCH_POINTS: usize = 5;

/// Errors that can occur while reading the touch controller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TouchError {
    /// Controller did not acknowledge or the bus failed
    Bus,
    /// Controller returned a report that makes no sense
    InvalidData,
    /// Controller has not been initialized
    NotInitialized,
}

/// One raw touch point in controller coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RawPoint {
    pub x: u16,
    pub y: u16,
    pub track_id: u8,
}

/// Result of one controller poll
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TouchReport {
    /// Number of touches the controller reported
    pub count: u8,
    /// Reported points, in controller order
    pub points: Vec<RawPoint, MAX_TOUCH_POINTS>,
}

impl TouchReport {
    /// Report with no touches
    pub fn released() -> Self {
        Self::default()
    }

    /// Report with a single touch
    pub fn single(x: u16, y: u16, track_id: u8) -> Self {
        let mut points = Vec::new();
        // Capacity is at least one
        let _ = points.push(RawPoint { x, y, track_id });
        Self { count: 1, points }
    }

    /// First reported point, if any touch is active
    pub fn first(&self) -> Option<&RawPoint> {
        if self.count == 0 {
            None
        } else {
            self.points.first()
        }
    }
}

/// Trait for polled touch controllers
///
/// Implementations perform one bus transaction per call and return the
/// controller's current view of the panel.
pub trait TouchController {
    /// Read the current touch state
    fn read_touch(&mut self) -> Result<TouchReport, TouchError>;
}

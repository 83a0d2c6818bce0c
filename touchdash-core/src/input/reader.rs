//! Renderer input callback over a touch controller

use super::mapper::{PointerEvent, TouchMapper, TouchSample};
use crate::traits::{PointerInput, TouchController, TouchError};

/// Touch read counters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ReaderStats {
    /// Successful controller reads
    pub reads: u32,
    /// Failed controller reads
    pub failures: u32,
    /// Failures since the last successful read
    pub consecutive_failures: u16,
    /// Most recent failure
    pub last_error: Option<TouchError>,
}

/// Polls the touch controller and maps the result for the renderer
///
/// A failed read is reported as a release at the last known position, so a
/// controller that stops answering mid-press never leaves the pointer held.
pub struct PointerReader<T> {
    touch: T,
    mapper: TouchMapper,
    stats: ReaderStats,
}

impl<T: TouchController> PointerReader<T> {
    pub fn new(touch: T, mapper: TouchMapper) -> Self {
        Self {
            touch,
            mapper,
            stats: ReaderStats::default(),
        }
    }

    pub fn stats(&self) -> &ReaderStats {
        &self.stats
    }

    pub fn mapper(&self) -> &TouchMapper {
        &self.mapper
    }

    pub fn controller_mut(&mut self) -> &mut T {
        &mut self.touch
    }

    pub fn into_inner(self) -> T {
        self.touch
    }

    /// Poll the controller once
    pub fn poll(&mut self) -> PointerEvent {
        match self.touch.read_touch() {
            Ok(report) => {
                self.stats.reads = self.stats.reads.wrapping_add(1);
                self.stats.consecutive_failures = 0;
                self.mapper.map(&TouchSample::from_report(&report))
            }
            Err(e) => {
                self.stats.failures = self.stats.failures.wrapping_add(1);
                self.stats.consecutive_failures =
                    self.stats.consecutive_failures.saturating_add(1);
                self.stats.last_error = Some(e);
                self.mapper.release()
            }
        }
    }
}

impl<T: TouchController> PointerInput for PointerReader<T> {
    fn read_pointer(&mut self) -> PointerEvent {
        self.poll()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::{Orientation, PointerState};
    use crate::traits::TouchReport;
    use std::collections::VecDeque;

    struct ScriptedTouch {
        script: VecDeque<Result<TouchReport, TouchError>>,
    }

    impl ScriptedTouch {
        fn new(items: impl IntoIterator<Item = Result<TouchReport, TouchError>>) -> Self {
            Self {
                script: items.into_iter().collect(),
            }
        }
    }

    impl TouchController for ScriptedTouch {
        fn read_touch(&mut self) -> Result<TouchReport, TouchError> {
            self.script.pop_front().unwrap_or(Ok(TouchReport::released()))
        }
    }

    fn reader(
        items: impl IntoIterator<Item = Result<TouchReport, TouchError>>,
    ) -> PointerReader<ScriptedTouch> {
        PointerReader::new(
            ScriptedTouch::new(items),
            TouchMapper::new(Orientation::default(), 480, 320),
        )
    }

    #[test]
    fn test_press_then_release() {
        let mut r = reader([Ok(TouchReport::single(100, 50, 0)), Ok(TouchReport::released())]);

        let e = r.read_pointer();
        assert_eq!(e.state, PointerState::Pressed);
        assert_eq!((e.x, e.y), (430, 100));

        let e = r.read_pointer();
        assert_eq!(e.state, PointerState::Released);
        assert_eq!((e.x, e.y), (430, 100));
        assert_eq!(r.stats().reads, 2);
    }

    #[test]
    fn test_error_after_press_releases() {
        let mut r = reader([Ok(TouchReport::single(100, 50, 0)), Err(TouchError::Bus)]);

        assert!(r.read_pointer().is_pressed());
        let e = r.read_pointer();
        assert_eq!(e, PointerEvent::released(430, 100));

        let stats = r.stats();
        assert_eq!(stats.failures, 1);
        assert_eq!(stats.consecutive_failures, 1);
        assert_eq!(stats.last_error, Some(TouchError::Bus));
    }

    #[test]
    fn test_consecutive_failures_reset_on_success() {
        let mut r = reader([
            Err(TouchError::Bus),
            Err(TouchError::InvalidData),
            Ok(TouchReport::released()),
        ]);

        r.read_pointer();
        r.read_pointer();
        assert_eq!(r.stats().consecutive_failures, 2);

        r.read_pointer();
        assert_eq!(r.stats().consecutive_failures, 0);
        assert_eq!(r.stats().failures, 2);
        assert_eq!(r.stats().last_error, Some(TouchError::InvalidData));
    }
}

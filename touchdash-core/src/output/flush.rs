//! Flush adapter: renderer output callback over a pixel sink

use super::region::DirtyRegion;
use super::signal::FlushSignal;
use crate::traits::{DisplayError, FlushTarget, PixelSink};

/// Reasons a flush did not reach the panel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FlushError {
    /// Buffer holds fewer pixels than the area covers
    ShortBuffer { expected: usize, actual: usize },
    /// Area extends beyond the panel
    OutOfBounds,
    /// Display bus error
    Display(DisplayError),
}

impl From<DisplayError> for FlushError {
    fn from(e: DisplayError) -> Self {
        FlushError::Display(e)
    }
}

/// Flush counters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FlushStats {
    /// Flush calls received
    pub flushes: u32,
    /// Pixels streamed to the sink
    pub pixels: u32,
    /// Flush calls that failed
    pub errors: u32,
    /// Most recent failure
    pub last_error: Option<FlushError>,
}

/// Streams rendered regions to a [`PixelSink`]
///
/// The adapter holds no pixel data; the region's buffer is borrowed for the
/// duration of the call only.
pub struct FlushAdapter<S> {
    sink: S,
    stats: FlushStats,
}

impl<S: PixelSink> FlushAdapter<S> {
    pub fn new(sink: S) -> Self {
        Self {
            sink,
            stats: FlushStats::default(),
        }
    }

    pub fn stats(&self) -> &FlushStats {
        &self.stats
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    pub fn into_inner(self) -> S {
        self.sink
    }

    /// Send a region to the sink without touching any completion signal
    ///
    /// Returns the number of pixels streamed.
    pub fn push(&mut self, region: &DirtyRegion<'_>) -> Result<usize, FlushError> {
        let area = &region.area;
        let expected = area.pixel_count();
        if region.pixels.len() < expected {
            return Err(FlushError::ShortBuffer {
                expected,
                actual: region.pixels.len(),
            });
        }

        let (width, height) = self.sink.size();
        if area.x2 >= width || area.y2 >= height {
            return Err(FlushError::OutOfBounds);
        }

        self.sink.set_window(area)?;
        self.sink.write_pixels(&region.pixels[..expected])?;
        Ok(expected)
    }
}

impl<S: PixelSink> FlushTarget for FlushAdapter<S> {
    fn flush(&mut self, region: &DirtyRegion<'_>, signal: &mut FlushSignal) {
        self.stats.flushes = self.stats.flushes.wrapping_add(1);

        match self.push(region) {
            Ok(pixels) => {
                self.stats.pixels = self.stats.pixels.wrapping_add(pixels as u32);
            }
            Err(e) => {
                self.stats.errors = self.stats.errors.wrapping_add(1);
                self.stats.last_error = Some(e);
            }
        }

        // Always, or the renderer waits forever
        signal.flush_ready();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::Area;
    use proptest::prelude::*;
    use std::vec::Vec;

    #[derive(Default)]
    struct RecordingSink {
        windows: Vec<Area>,
        pixels: Vec<u16>,
        fail_writes: bool,
    }

    impl PixelSink for RecordingSink {
        fn set_window(&mut self, area: &Area) -> Result<(), DisplayError> {
            self.windows.push(*area);
            Ok(())
        }

        fn write_pixels(&mut self, pixels: &[u16]) -> Result<(), DisplayError> {
            if self.fail_writes {
                return Err(DisplayError::Communication);
            }
            self.pixels.extend_from_slice(pixels);
            Ok(())
        }

        fn size(&self) -> (u16, u16) {
            (480, 320)
        }
    }

    fn flush(adapter: &mut FlushAdapter<RecordingSink>, area: Area, pixels: &[u16]) -> FlushSignal {
        let mut signal = FlushSignal::new();
        signal.arm();
        adapter.flush(&DirtyRegion::new(area, pixels), &mut signal);
        signal
    }

    #[test]
    fn test_streams_window_then_pixels() {
        let mut adapter = FlushAdapter::new(RecordingSink::default());
        let area = Area::new(2, 3, 4, 4).unwrap();
        let pixels: Vec<u16> = (0..6).collect();

        let signal = flush(&mut adapter, area, &pixels);

        assert!(signal.is_ready());
        assert_eq!(signal.completions(), 1);
        assert_eq!(adapter.sink().windows, [area]);
        assert_eq!(adapter.sink().pixels, pixels);
        assert_eq!(adapter.stats().pixels, 6);
        assert_eq!(adapter.stats().errors, 0);
    }

    #[test]
    fn test_oversized_buffer_is_truncated() {
        let mut adapter = FlushAdapter::new(RecordingSink::default());
        let area = Area::new(0, 0, 1, 0).unwrap();

        flush(&mut adapter, area, &[1, 2, 3, 4]);

        assert_eq!(adapter.sink().pixels, [1, 2]);
    }

    #[test]
    fn test_short_buffer_still_signals() {
        let mut adapter = FlushAdapter::new(RecordingSink::default());
        let area = Area::new(0, 0, 9, 9).unwrap();

        let signal = flush(&mut adapter, area, &[0; 10]);

        assert!(signal.is_ready());
        assert!(adapter.sink().windows.is_empty());
        assert_eq!(
            adapter.stats().last_error,
            Some(FlushError::ShortBuffer {
                expected: 100,
                actual: 10
            })
        );
    }

    #[test]
    fn test_out_of_bounds_still_signals() {
        let mut adapter = FlushAdapter::new(RecordingSink::default());
        let area = Area::new(470, 0, 480, 0).unwrap();

        let signal = flush(&mut adapter, area, &[0; 11]);

        assert!(signal.is_ready());
        assert_eq!(adapter.stats().last_error, Some(FlushError::OutOfBounds));
    }

    #[test]
    fn test_bus_error_still_signals() {
        let mut adapter = FlushAdapter::new(RecordingSink {
            fail_writes: true,
            ..Default::default()
        });
        let area = Area::new(0, 0, 0, 0).unwrap();

        let signal = flush(&mut adapter, area, &[0xFFFF]);

        assert!(signal.is_ready());
        assert_eq!(signal.completions(), 1);
        assert_eq!(adapter.stats().errors, 1);
        assert_eq!(
            adapter.stats().last_error,
            Some(FlushError::Display(DisplayError::Communication))
        );
    }

    proptest! {
        #[test]
        fn pixel_writes_match_area(x1 in 0u16..480, y1 in 0u16..320, w in 1u16..64, h in 1u16..32) {
            let x2 = (x1 + w - 1).min(479);
            let y2 = (y1 + h - 1).min(319);
            let area = Area::new(x1, y1, x2, y2).unwrap();
            let expected = usize::from(x2 - x1 + 1) * usize::from(y2 - y1 + 1);
            let pixels = std::vec![0x1234u16; expected + 7];

            let mut adapter = FlushAdapter::new(RecordingSink::default());
            let signal = flush(&mut adapter, area, &pixels);

            prop_assert_eq!(adapter.sink().pixels.len(), expected);
            prop_assert_eq!(signal.completions(), 1);
            prop_assert!(signal.is_ready());
        }
    }
}

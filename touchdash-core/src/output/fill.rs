//! Solid fills

use super::region::Area;
use crate::traits::{DisplayError, PixelSink};

/// Pixels per write when filling
const FILL_CHUNK: usize = 64;

/// Fill an area with one RGB565 color
pub fn fill_solid<S: PixelSink>(sink: &mut S, area: &Area, color: u16) -> Result<(), DisplayError> {
    let chunk = [color; FILL_CHUNK];
    let mut remaining = area.pixel_count();

    sink.set_window(area)?;
    while remaining > 0 {
        let n = remaining.min(FILL_CHUNK);
        sink.write_pixels(&chunk[..n])?;
        remaining -= n;
    }
    Ok(())
}

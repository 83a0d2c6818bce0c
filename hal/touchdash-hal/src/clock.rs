//! Monotonic time source

/// Monotonic millisecond clock
///
/// The value wraps at `u32::MAX`; consumers compute deltas with
/// `wrapping_sub`.
pub trait Clock {
    /// Milliseconds since an arbitrary fixed origin
    fn now_ms(&mut self) -> u32;
}

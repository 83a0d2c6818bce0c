//! Renderer-facing traits
//!
//! The renderer (GUI runtime) is driven from the control loop through
//! [`GuiRuntime`]. While it runs it calls back into the bridge for input
//! ([`PointerInput`]) and output ([`FlushTarget`]).

use crate::dashboard::DashboardState;
use crate::input::PointerEvent;
use crate::output::{DirtyRegion, FlushSignal};

/// Input callback: current pointer state in display coordinates
pub trait PointerInput {
    /// Read the pointer
    ///
    /// Must not fail: read errors are reported as a released pointer.
    fn read_pointer(&mut self) -> PointerEvent;
}

/// Output callback: push a rendered region to the panel
pub trait FlushTarget {
    /// Flush `region` to the display
    ///
    /// Implementations must call [`FlushSignal::flush_ready`] exactly once
    /// before returning, on every path. A missing call leaves the renderer
    /// waiting for completion forever.
    fn flush(&mut self, region: &DirtyRegion<'_>, signal: &mut FlushSignal);
}

/// What one scheduler run did
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RenderReport {
    /// Pointer callbacks made
    pub pointer_reads: u16,
    /// Flush callbacks made
    pub flushes: u16,
    /// Pixels handed to the flush callback
    pub pixels: u32,
    /// Renderer is waiting on a flush completion
    pub stalled: bool,
}

/// Retained-mode GUI runtime
pub trait GuiRuntime {
    /// Advance the runtime's internal clock
    fn tick_inc(&mut self, elapsed_ms: u32);

    /// Run whatever timers are due
    ///
    /// May read input and flush any number of regions.
    fn timer_handler<I, F>(&mut self, input: &mut I, output: &mut F) -> RenderReport
    where
        I: PointerInput,
        F: FlushTarget;
}

/// Presentation of the dashboard state
pub trait DashboardView {
    /// Replace the displayed values with `state` and schedule a redraw
    fn show(&mut self, state: &DashboardState);
}

//! Hardware and GUI abstraction traits
//!
//! These traits define the interface between the bridge logic and the
//! hardware drivers on one side and the renderer on the other.

pub mod display;
pub mod gui;
pub mod touch;

pub use display::{DisplayError, PixelSink};
pub use gui::{DashboardView, FlushTarget, GuiRuntime, PointerInput, RenderReport};
pub use touch::{RawPoint, TouchController, TouchError, TouchReport, MAX_TOUCH_POINTS};

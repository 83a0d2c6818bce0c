//! Scene trait

use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use touchdash_core::dashboard::DashboardState;
use touchdash_core::input::PointerEvent;
use touchdash_core::output::Area;

/// Something the scheduler can render
///
/// Event handlers return the screen area that needs redrawing, if any.
pub trait Scene {
    /// Draw the scene
    ///
    /// The target may cover only part of the screen; implementations may
    /// skip anything outside `target.bounding_box()`.
    fn draw<D>(&self, target: &mut D) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = Rgb565>;

    /// Handle a pointer sample
    fn on_pointer(&mut self, event: &PointerEvent) -> Option<Area>;

    /// Take new dashboard values
    fn on_state(&mut self, state: &DashboardState) -> Option<Area>;
}

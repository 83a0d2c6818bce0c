//! Render scheduler
//!
//! Implements [`GuiRuntime`] for a [`Scene`]. The scheduler keeps its own
//! millisecond clock, advanced by `tick_inc`. Each `timer_handler` call
//! runs the two periodic jobs that are due:
//!
//! - input: read the pointer and hand the event to the scene
//! - refresh: redraw the invalidated area stripe by stripe and flush each
//!   stripe through the output callback
//!
//! A stripe is flushed only after the previous flush signalled completion.
//! When a flush returns without signalling, the scheduler stalls and keeps
//! the unrendered rows invalid until [`RenderScheduler::flush_ready`] is
//! called.

use touchdash_core::config::PanelConfig;
use touchdash_core::dashboard::DashboardState;
use touchdash_core::output::{Area, DirtyRegion, FlushSignal};
use touchdash_core::traits::{DashboardView, FlushTarget, GuiRuntime, PointerInput, RenderReport};

use crate::scene::Scene;
use crate::stripe::StripeCanvas;

/// Scheduler timing and geometry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SchedulerConfig {
    pub width: u16,
    pub height: u16,
    /// Minimum time between frames (ms)
    pub refresh_ms: u32,
    /// Pointer read period (ms)
    pub input_ms: u32,
}

impl SchedulerConfig {
    pub fn from_panel(config: &PanelConfig) -> Self {
        Self {
            width: config.display.width,
            height: config.display.height,
            refresh_ms: config.display.refresh_ms,
            input_ms: config.touch.poll_ms,
        }
    }
}

/// Scheduler counters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SchedulerStats {
    /// Frames completed
    pub frames: u32,
    /// Handler calls that found a flush still in flight
    pub stalls: u32,
}

/// Retained-mode runtime rendering a [`Scene`] through a draw buffer
pub struct RenderScheduler<'b, S> {
    scene: S,
    buffer: &'b mut [u16],
    config: SchedulerConfig,
    now_ms: u32,
    last_refresh: Option<u32>,
    last_input: Option<u32>,
    invalid: Option<Area>,
    in_frame: bool,
    signal: FlushSignal,
    stats: SchedulerStats,
}

impl<'b, S: Scene> RenderScheduler<'b, S> {
    /// Create a scheduler drawing into `buffer`
    ///
    /// The whole screen starts invalid. Returns `None` if the buffer cannot
    /// hold a single row or the screen has no pixels.
    pub fn new(scene: S, buffer: &'b mut [u16], config: SchedulerConfig) -> Option<Self> {
        let screen = Area::screen(config.width, config.height)?;
        if buffer.len() < usize::from(config.width) {
            return None;
        }
        Some(Self {
            scene,
            buffer,
            config,
            now_ms: 0,
            last_refresh: None,
            last_input: None,
            invalid: Some(screen),
            in_frame: false,
            signal: FlushSignal::new(),
            stats: SchedulerStats::default(),
        })
    }

    pub fn scene(&self) -> &S {
        &self.scene
    }

    pub fn scene_mut(&mut self) -> &mut S {
        &mut self.scene
    }

    pub fn stats(&self) -> &SchedulerStats {
        &self.stats
    }

    pub fn config(&self) -> &SchedulerConfig {
        &self.config
    }

    /// Area waiting to be redrawn
    pub fn invalid_area(&self) -> Option<Area> {
        self.invalid
    }

    /// A flush is in flight
    pub fn is_stalled(&self) -> bool {
        !self.signal.is_ready()
    }

    /// Completion for a flush that finished after its callback returned
    pub fn flush_ready(&mut self) {
        self.signal.flush_ready();
    }

    /// Schedule `area` for redraw
    pub fn invalidate(&mut self, area: Area) {
        let Some(screen) = Area::screen(self.config.width, self.config.height) else {
            return;
        };
        let Some(area) = area.intersect(&screen) else {
            return;
        };
        self.invalid = Some(match self.invalid {
            Some(current) => current.union(&area),
            None => area,
        });
    }

    fn due(&self, last: Option<u32>, period: u32) -> bool {
        last.map_or(true, |t| self.now_ms.wrapping_sub(t) >= period)
    }

    fn poll_input<I: PointerInput>(&mut self, input: &mut I, report: &mut RenderReport) {
        if !self.due(self.last_input, self.config.input_ms) {
            return;
        }
        self.last_input = Some(self.now_ms);

        let event = input.read_pointer();
        report.pointer_reads += 1;
        if let Some(area) = self.scene.on_pointer(&event) {
            self.invalidate(area);
        }
    }

    fn refresh<F: FlushTarget>(&mut self, output: &mut F, report: &mut RenderReport) {
        let Some(area) = self.invalid else {
            return;
        };
        if !self.in_frame {
            if !self.due(self.last_refresh, self.config.refresh_ms) {
                return;
            }
            self.last_refresh = Some(self.now_ms);
            self.in_frame = true;
        }

        let stripe_rows = (self.buffer.len() / area.width() as usize).min(usize::from(u16::MAX)) as u16;
        let mut row = 0u16;
        while let Some(stripe) = area.rows(row, stripe_rows) {
            let n = stripe.pixel_count();
            if let Some(mut canvas) = StripeCanvas::new(&mut self.buffer[..n], stripe) {
                // StripeCanvas never fails
                let _ = self.scene.draw(&mut canvas);
            }

            self.signal.arm();
            output.flush(&DirtyRegion::new(stripe, &self.buffer[..n]), &mut self.signal);
            report.flushes += 1;
            report.pixels += n as u32;

            row = row.saturating_add(stripe_rows);
            if !self.signal.is_ready() {
                self.invalid = area.rows(row, u16::MAX);
                if self.invalid.is_none() {
                    self.finish_frame();
                }
                report.stalled = true;
                return;
            }
        }

        self.invalid = None;
        self.finish_frame();
    }

    fn finish_frame(&mut self) {
        self.in_frame = false;
        self.stats.frames = self.stats.frames.wrapping_add(1);
    }
}

impl<S: Scene> GuiRuntime for RenderScheduler<'_, S> {
    fn tick_inc(&mut self, elapsed_ms: u32) {
        self.now_ms = self.now_ms.wrapping_add(elapsed_ms);
    }

    fn timer_handler<I, F>(&mut self, input: &mut I, output: &mut F) -> RenderReport
    where
        I: PointerInput,
        F: FlushTarget,
    {
        let mut report = RenderReport::default();
        if !self.signal.is_ready() {
            self.stats.stalls = self.stats.stalls.wrapping_add(1);
            report.stalled = true;
            return report;
        }

        self.poll_input(input, &mut report);
        self.refresh(output, &mut report);
        report
    }
}

impl<S: Scene> DashboardView for RenderScheduler<'_, S> {
    fn show(&mut self, state: &DashboardState) {
        if let Some(area) = self.scene.on_state(state) {
            self.invalidate(area);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_graphics::pixelcolor::Rgb565;
    use embedded_graphics::prelude::*;
    use touchdash_core::input::PointerEvent;
    use std::vec;
    use std::vec::Vec;

    const W: u16 = 480;
    const H: u16 = 320;
    const CORNER: Area = Area {
        x1: 0,
        y1: 0,
        x2: 9,
        y2: 9,
    };

    /// Solid fill; red while `speed` is non-zero
    #[derive(Default)]
    struct SolidScene {
        red: bool,
        pressed: bool,
    }

    impl Scene for SolidScene {
        fn draw<D>(&self, target: &mut D) -> Result<(), D::Error>
        where
            D: DrawTarget<Color = Rgb565>,
        {
            let color = if self.red { Rgb565::RED } else { Rgb565::BLACK };
            target.clear(color)
        }

        fn on_pointer(&mut self, event: &PointerEvent) -> Option<Area> {
            if event.is_pressed() == self.pressed {
                return None;
            }
            self.pressed = event.is_pressed();
            Some(CORNER)
        }

        fn on_state(&mut self, state: &DashboardState) -> Option<Area> {
            self.red = state.speed != 0;
            Area::screen(W, H)
        }
    }

    struct Pointer(PointerEvent);

    impl PointerInput for Pointer {
        fn read_pointer(&mut self) -> PointerEvent {
            self.0
        }
    }

    #[derive(Default)]
    struct Capture {
        areas: Vec<Area>,
        pixels: Vec<u16>,
        /// Leave completion to the test
        deferred: bool,
    }

    impl FlushTarget for Capture {
        fn flush(&mut self, region: &DirtyRegion<'_>, signal: &mut FlushSignal) {
            self.areas.push(region.area);
            self.pixels.extend_from_slice(region.pixels);
            if !self.deferred {
                signal.flush_ready();
            }
        }
    }

    fn config() -> SchedulerConfig {
        SchedulerConfig {
            width: W,
            height: H,
            refresh_ms: 30,
            input_ms: 30,
        }
    }

    fn idle() -> Pointer {
        Pointer(PointerEvent::default())
    }

    #[test]
    fn test_buffer_must_hold_a_row() {
        let mut buf = vec![0u16; usize::from(W) - 1];
        assert!(RenderScheduler::new(SolidScene::default(), &mut buf, config()).is_none());
    }

    #[test]
    fn test_first_frame_in_stripes() {
        let mut buf = vec![0u16; usize::from(W) * 32];
        let mut sched = RenderScheduler::new(SolidScene::default(), &mut buf, config()).unwrap();
        let mut out = Capture::default();

        let report = sched.timer_handler(&mut idle(), &mut out);
        assert_eq!(report.flushes, 10);
        assert_eq!(report.pixels, 480 * 320);
        assert!(!report.stalled);
        assert_eq!(out.areas[0], Area::new(0, 0, 479, 31).unwrap());
        assert_eq!(out.areas[9], Area::new(0, 288, 479, 319).unwrap());
        assert_eq!(sched.stats().frames, 1);
        assert_eq!(sched.invalid_area(), None);
    }

    #[test]
    fn test_nothing_invalid_no_flush() {
        let mut buf = vec![0u16; usize::from(W) * 32];
        let mut sched = RenderScheduler::new(SolidScene::default(), &mut buf, config()).unwrap();
        let mut out = Capture::default();
        sched.timer_handler(&mut idle(), &mut out);

        sched.tick_inc(100);
        let report = sched.timer_handler(&mut idle(), &mut out);
        assert_eq!(report.flushes, 0);
        assert_eq!(report.pointer_reads, 1);
    }

    #[test]
    fn test_refresh_period() {
        let mut buf = vec![0u16; usize::from(W) * 32];
        let mut sched = RenderScheduler::new(SolidScene::default(), &mut buf, config()).unwrap();
        let mut out = Capture::default();
        sched.timer_handler(&mut idle(), &mut out);

        sched.show(&DashboardState {
            speed: 7,
            ..Default::default()
        });
        sched.tick_inc(10);
        assert_eq!(sched.timer_handler(&mut idle(), &mut out).flushes, 0);

        out.pixels.clear();
        sched.tick_inc(20);
        assert_eq!(sched.timer_handler(&mut idle(), &mut out).flushes, 10);
        assert!(out.pixels.iter().all(|&p| p == Rgb565::RED.into_storage()));
    }

    #[test]
    fn test_pointer_redraws_only_its_area() {
        let mut buf = vec![0u16; usize::from(W) * 32];
        let mut sched = RenderScheduler::new(SolidScene::default(), &mut buf, config()).unwrap();
        let mut out = Capture::default();
        sched.timer_handler(&mut idle(), &mut out);

        out.areas.clear();
        sched.tick_inc(30);
        let mut pointer = Pointer(PointerEvent::pressed(5, 5));
        let report = sched.timer_handler(&mut pointer, &mut out);
        assert_eq!(report.flushes, 1);
        assert_eq!(out.areas, vec![CORNER]);
        assert!(sched.scene().pressed);
    }

    #[test]
    fn test_stalls_until_flush_ready() {
        let mut buf = vec![0u16; usize::from(W) * 32];
        let mut sched = RenderScheduler::new(SolidScene::default(), &mut buf, config()).unwrap();
        let mut out = Capture {
            deferred: true,
            ..Default::default()
        };

        let report = sched.timer_handler(&mut idle(), &mut out);
        assert_eq!(report.flushes, 1);
        assert!(report.stalled);
        assert_eq!(sched.invalid_area(), Area::new(0, 32, 479, 319));

        // Still waiting: no input, no output
        sched.tick_inc(5);
        let report = sched.timer_handler(&mut idle(), &mut out);
        assert_eq!((report.flushes, report.pointer_reads), (0, 0));
        assert!(report.stalled);
        assert_eq!(sched.stats().stalls, 1);

        sched.flush_ready();
        out.deferred = false;
        // Resumes the frame without waiting for the refresh period
        let report = sched.timer_handler(&mut idle(), &mut out);
        assert_eq!(report.flushes, 9);
        assert_eq!(out.areas.len(), 10);
        assert_eq!(sched.stats().frames, 1);
    }

    #[test]
    fn test_invalidate_clips_to_screen() {
        let mut buf = vec![0u16; usize::from(W) * 32];
        let mut sched = RenderScheduler::new(SolidScene::default(), &mut buf, config()).unwrap();
        let mut out = Capture::default();
        sched.timer_handler(&mut idle(), &mut out);

        sched.invalidate(Area::new(470, 310, 600, 400).unwrap());
        assert_eq!(sched.invalid_area(), Area::new(470, 310, 479, 319));
        sched.invalidate(Area::new(500, 0, 600, 10).unwrap());
        assert_eq!(sched.invalid_area(), Area::new(470, 310, 479, 319));
    }
}

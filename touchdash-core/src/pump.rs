//! GUI tick/timer pump
//!
//! One iteration feeds the elapsed wall-clock time to the renderer and then
//! runs its timers once. The cooperative sleep between iterations belongs to
//! the caller's executor.

use touchdash_hal::Clock;

use crate::traits::{FlushTarget, GuiRuntime, PointerInput, RenderReport};

/// Default sleep between iterations (ms)
pub const DEFAULT_LOOP_DELAY_MS: u32 = 5;

/// Drives a [`GuiRuntime`] from a monotonic clock
#[derive(Debug, Clone, Default)]
pub struct TickPump {
    last_ms: Option<u32>,
    last_delta_ms: u32,
    iterations: u32,
}

impl TickPump {
    pub const fn new() -> Self {
        Self {
            last_ms: None,
            last_delta_ms: 0,
            iterations: 0,
        }
    }

    /// Milliseconds since the previous call
    ///
    /// The first call returns 0. Clock wraparound yields the correct small
    /// delta.
    pub fn elapsed(&mut self, now_ms: u32) -> u32 {
        let delta = match self.last_ms {
            Some(last) => now_ms.wrapping_sub(last),
            None => 0,
        };
        self.last_ms = Some(now_ms);
        self.last_delta_ms = delta;
        delta
    }

    /// Run one pump iteration
    ///
    /// The renderer may read input and flush any number of regions during
    /// the call.
    pub fn iterate<C, G, I, F>(
        &mut self,
        clock: &mut C,
        gui: &mut G,
        input: &mut I,
        output: &mut F,
    ) -> RenderReport
    where
        C: Clock,
        G: GuiRuntime,
        I: PointerInput,
        F: FlushTarget,
    {
        let delta = self.elapsed(clock.now_ms());
        gui.tick_inc(delta);
        self.iterations = self.iterations.wrapping_add(1);
        gui.timer_handler(input, output)
    }

    /// Delta fed on the most recent iteration
    pub fn last_delta_ms(&self) -> u32 {
        self.last_delta_ms
    }

    pub fn iterations(&self) -> u32 {
        self.iterations
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::PointerEvent;
    use crate::output::{Area, DirtyRegion, FlushSignal};
    use std::vec::Vec;

    struct FakeClock {
        times: Vec<u32>,
        index: usize,
    }

    impl Clock for FakeClock {
        fn now_ms(&mut self) -> u32 {
            let t = self.times[self.index];
            self.index += 1;
            t
        }
    }

    /// Records ticks and performs a fixed number of flushes per run
    #[derive(Default)]
    struct FakeGui {
        ticks: Vec<u32>,
        flushes_per_run: u16,
    }

    impl GuiRuntime for FakeGui {
        fn tick_inc(&mut self, elapsed_ms: u32) {
            self.ticks.push(elapsed_ms);
        }

        fn timer_handler<I, F>(&mut self, input: &mut I, output: &mut F) -> RenderReport
        where
            I: PointerInput,
            F: FlushTarget,
        {
            input.read_pointer();
            let pixels = [0u16; 1];
            let area = Area::new(0, 0, 0, 0).unwrap();
            let mut signal = FlushSignal::new();
            for _ in 0..self.flushes_per_run {
                signal.arm();
                output.flush(&DirtyRegion::new(area, &pixels), &mut signal);
            }
            RenderReport {
                pointer_reads: 1,
                flushes: self.flushes_per_run,
                pixels: u32::from(self.flushes_per_run),
                stalled: false,
            }
        }
    }

    struct Idle;

    impl PointerInput for Idle {
        fn read_pointer(&mut self) -> PointerEvent {
            PointerEvent::default()
        }
    }

    #[derive(Default)]
    struct CountingTarget {
        calls: u32,
    }

    impl FlushTarget for CountingTarget {
        fn flush(&mut self, _region: &DirtyRegion<'_>, signal: &mut FlushSignal) {
            self.calls += 1;
            signal.flush_ready();
        }
    }

    #[test]
    fn test_first_delta_is_zero() {
        let mut pump = TickPump::new();
        assert_eq!(pump.elapsed(1_000), 0);
        assert_eq!(pump.elapsed(1_005), 5);
        assert_eq!(pump.elapsed(1_017), 12);
    }

    #[test]
    fn test_wraparound() {
        let mut pump = TickPump::new();
        pump.elapsed(u32::MAX - 2);
        assert_eq!(pump.elapsed(4), 7);
    }

    #[test]
    fn test_iterate_feeds_deltas() {
        let mut pump = TickPump::new();
        let mut clock = FakeClock {
            times: std::vec![100, 105, 111],
            index: 0,
        };
        let mut gui = FakeGui::default();

        for _ in 0..3 {
            pump.iterate(&mut clock, &mut gui, &mut Idle, &mut CountingTarget::default());
        }

        assert_eq!(gui.ticks, [0, 5, 6]);
        assert_eq!(pump.iterations(), 3);
        assert_eq!(pump.last_delta_ms(), 6);
    }

    #[test]
    fn test_flush_fan_out_not_limited() {
        let mut pump = TickPump::new();
        let mut clock = FakeClock {
            times: std::vec![0],
            index: 0,
        };
        let mut gui = FakeGui {
            flushes_per_run: 40,
            ..Default::default()
        };
        let mut target = CountingTarget::default();

        let report = pump.iterate(&mut clock, &mut gui, &mut Idle, &mut target);

        assert_eq!(target.calls, 40);
        assert_eq!(report.flushes, 40);
    }
}

//! UI control loop
//!
//! One cooperative loop: pump the renderer (which polls touch and flushes
//! the panel), drain the serial link, then sleep for the loop delay.

use defmt::*;
use embassy_rp::uart::{BufferedUartRx, BufferedUartTx};
use embassy_time::Timer;
use touchdash_core::UiContext;
use touchdash_display::{DashboardScreen, RenderScheduler};
use touchdash_hal_rp2040::{InstantClock, UartAdapter};

use crate::board::{Display, HeldPins, Touch};

/// Loop iterations between statistics reports
const STATS_INTERVAL: u32 = 2000;

pub type Ui = UiContext<Touch, Display, RenderScheduler<'static, DashboardScreen>>;

/// UI task - owns the whole UI pipeline
#[embassy_executor::task]
pub async fn ui_task(
    mut ui: Ui,
    rx: BufferedUartRx,
    _tx: BufferedUartTx,
    _held: HeldPins,
    loop_delay_ms: u32,
) {
    info!("UI task started");

    let mut clock = InstantClock::new();
    let mut serial = UartAdapter::new(rx);

    loop {
        let report = ui.run_once(&mut clock);
        if report.flushes > 0 {
            trace!("Rendered {} stripes, {} px", report.flushes, report.pixels);
        }

        match ui.poll_serial(&mut serial) {
            Ok(poll) => {
                if poll.dropped > 0 {
                    warn!("Serial: {} lines dropped", poll.dropped);
                }
                if let Some(last) = poll.last {
                    if last.malformed > 0 || last.unknown > 0 {
                        debug!(
                            "Serial line: {} applied, {} malformed, {} unknown",
                            last.applied, last.malformed, last.unknown
                        );
                    }
                }
            }
            Err(e) => warn!("UART read error: {:?}", e),
        }

        if ui.pump().iterations() % STATS_INTERVAL == 0 {
            log_stats(&ui);
        }

        Timer::after_millis(u64::from(loop_delay_ms)).await;
    }
}

fn log_stats(ui: &Ui) {
    let touch = ui.pointer().stats();
    let flush = ui.output().stats();
    let render = ui.gui().stats();
    let serial = ui.ingestor().stats();
    info!(
        "touch {} reads / {} failures, flush {} / {} errors, {} frames / {} stalls, {} lines",
        touch.reads, touch.failures, flush.flushes, flush.errors, render.frames, render.stalls, serial.lines
    );
    if let Some(e) = touch.last_error {
        debug!("Last touch error: {:?}", e);
    }
    if let Some(e) = flush.last_error {
        debug!("Last flush error: {:?}", e);
    }
}

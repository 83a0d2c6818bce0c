//! UI context
//!
//! Owns everything the control loop touches: the pointer reader, the flush
//! adapter, the renderer, the dashboard state and the serial ingestor. The
//! loop calls [`UiContext::run_once`] and [`UiContext::poll_serial`] and
//! sleeps in between.

use touchdash_hal::{Clock, UartRx};

use crate::dashboard::{DashboardState, IngestReport, SerialIngestor};
use crate::input::PointerReader;
use crate::output::FlushAdapter;
use crate::pump::TickPump;
use crate::traits::{DashboardView, GuiRuntime, PixelSink, RenderReport, TouchController};

/// Bytes drained from the UART per read
const SERIAL_CHUNK: usize = 64;

/// Result of draining the serial receiver
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SerialPoll {
    /// Bytes consumed
    pub bytes: usize,
    /// Lines applied
    pub lines: u16,
    /// Lines dropped by the assembler
    pub dropped: u16,
    /// Report for the last applied line
    pub last: Option<IngestReport>,
}

/// Single owner of the UI pipeline
pub struct UiContext<T, S, G> {
    pointer: PointerReader<T>,
    output: FlushAdapter<S>,
    gui: G,
    dashboard: DashboardState,
    ingestor: SerialIngestor,
    pump: TickPump,
}

impl<T, S, G> UiContext<T, S, G>
where
    T: TouchController,
    S: PixelSink,
    G: GuiRuntime + DashboardView,
{
    /// Assemble the context and show the initial dashboard
    pub fn new(
        pointer: PointerReader<T>,
        output: FlushAdapter<S>,
        mut gui: G,
        ingestor: SerialIngestor,
    ) -> Self {
        let dashboard = DashboardState::new();
        gui.show(&dashboard);
        Self {
            pointer,
            output,
            gui,
            dashboard,
            ingestor,
            pump: TickPump::new(),
        }
    }

    /// One pump iteration: advance the renderer clock and run its timers
    pub fn run_once<C: Clock>(&mut self, clock: &mut C) -> RenderReport {
        self.pump
            .iterate(clock, &mut self.gui, &mut self.pointer, &mut self.output)
    }

    /// Apply one line to the dashboard and re-render
    ///
    /// The view is refreshed even when the line changed nothing.
    pub fn ingest_line(&mut self, line: &str) -> IngestReport {
        let report = self.ingestor.apply_line(&mut self.dashboard, line);
        self.gui.show(&self.dashboard);
        report
    }

    /// Drain whatever the UART has buffered
    ///
    /// Never waits for data. Each completed line is ingested immediately.
    pub fn poll_serial<U: UartRx>(&mut self, uart: &mut U) -> Result<SerialPoll, U::Error> {
        let mut poll = SerialPoll::default();
        let mut buf = [0u8; SERIAL_CHUNK];

        loop {
            let n = uart.read_available(&mut buf)?;
            if n == 0 {
                break;
            }
            poll.bytes += n;

            for &byte in &buf[..n] {
                match self.ingestor.feed(byte) {
                    Ok(Some(line)) => {
                        poll.last = Some(self.ingest_line(&line));
                        poll.lines = poll.lines.saturating_add(1);
                    }
                    Ok(None) => {}
                    Err(_) => poll.dropped = poll.dropped.saturating_add(1),
                }
            }

            if n < buf.len() {
                break;
            }
        }

        Ok(poll)
    }

    pub fn dashboard(&self) -> &DashboardState {
        &self.dashboard
    }

    pub fn pointer(&self) -> &PointerReader<T> {
        &self.pointer
    }

    pub fn output(&self) -> &FlushAdapter<S> {
        &self.output
    }

    pub fn output_mut(&mut self) -> &mut FlushAdapter<S> {
        &mut self.output
    }

    pub fn gui(&self) -> &G {
        &self.gui
    }

    pub fn ingestor(&self) -> &SerialIngestor {
        &self.ingestor
    }

    pub fn pump(&self) -> &TickPump {
        &self.pump
    }
}

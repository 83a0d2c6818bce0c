//! touchdash - Touch Panel Dashboard Firmware
//!
//! Firmware binary for RP2040 boards driving a 480x320 ST7796 panel with a
//! GT911 capacitive touch controller. Dashboard values arrive as
//! `key:value` lines on UART0.

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::Spawner;
use embassy_rp::bind_interrupts;
use embassy_rp::peripherals::UART0;
use embassy_rp::uart::{BufferedInterruptHandler, Uart};
use static_cell::{ConstStaticCell, StaticCell};
use {defmt_rtt as _, panic_probe as _};

use touchdash_core::config::{parse_config, PanelConfig};
use touchdash_core::input::PointerReader;
use touchdash_core::output::FlushAdapter;
use touchdash_core::startup::{StartupError, StartupSupervisor};
use touchdash_core::UiContext;
use touchdash_display::{DashboardScreen, RenderScheduler, SchedulerConfig, Theme};
use touchdash_hal::uart::UartConfig;
use touchdash_hal_rp2040::bus::uart_config;
use touchdash_hal_rp2040::PinBank;

use crate::board::{halt, ControlPins, Panel};

mod board;
mod tasks;

/// Embedded panel configuration (compiled into firmware)
/// Edit panel.toml and rebuild to customize
const EMBEDDED_CONFIG: &str = include_str!("../panel.toml");

/// Largest draw buffer the firmware reserves (pixels)
///
/// 64 lines of a 480-pixel-wide panel, 60 KiB of RGB565.
const MAX_DRAW_BUFFER: usize = 480 * 64;

bind_interrupts!(struct Irqs {
    UART0_IRQ => BufferedInterruptHandler<UART0>;
});

// Static cells for UART buffers (must live forever)
static TX_BUF: StaticCell<[u8; 16]> = StaticCell::new();
static RX_BUF: StaticCell<[u8; 256]> = StaticCell::new();

static DRAW_BUFFER: ConstStaticCell<[u16; MAX_DRAW_BUFFER]> =
    ConstStaticCell::new([0; MAX_DRAW_BUFFER]);

/// Main entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("touchdash firmware starting...");

    let p = embassy_rp::init(Default::default());

    let config = match parse_config(EMBEDDED_CONFIG) {
        Ok(config) => config,
        Err(e) => halt(StartupError::from(e)),
    };
    log_config(&config);

    let mut supervisor = StartupSupervisor::new(config.startup.failure_policy());

    let (mut bank, bus) = PinBank::from_peripherals(p);
    let pins = match ControlPins::take(&mut bank, &config.pins) {
        Ok(pins) => pins,
        Err(e) => halt(e),
    };

    let (mut panel, mut held, serial) = Panel::new(bus, pins, &config);
    if let Err(e) = panel.init(&mut supervisor, &mut held.touch_reset) {
        halt(e);
    }
    if let Err(e) = panel.bring_up_check(&config.display).await {
        halt(e);
    }
    held.backlight.assert();

    // Serial link (receive only; TX is kept so the UART stays enabled)
    let tx_buf = TX_BUF.init([0u8; 16]);
    let rx_buf = RX_BUF.init([0u8; 256]);
    let uart_cfg = uart_config(&UartConfig {
        baudrate: config.serial.baudrate,
    });
    let uart = Uart::new_blocking(serial.uart0, serial.tx, serial.rx, uart_cfg);
    let (tx, rx) = uart.into_buffered(Irqs, tx_buf, rx_buf).split();
    info!("UART0 at {} baud", config.serial.baudrate);

    let ui = match build_ui(panel, &config) {
        Ok(ui) => ui,
        Err(e) => halt(e),
    };

    if let Err(e) = spawner.spawn(tasks::ui_task(
        ui,
        rx,
        tx,
        held,
        config.pump.loop_delay_ms,
    )) {
        error!("Failed to spawn UI task: {:?}", e);
    }
}

/// Assemble the UI context around the initialized panel
fn build_ui(panel: Panel, config: &PanelConfig) -> Result<tasks::Ui, StartupError> {
    let len = config.display.draw_buffer_len();
    if len > MAX_DRAW_BUFFER {
        error!(
            "Draw buffer of {} px exceeds the {} px reserved",
            len, MAX_DRAW_BUFFER
        );
        return Err(StartupError::Allocation);
    }
    let buffer = DRAW_BUFFER.take();

    let scene = DashboardScreen::new(
        config.display.width,
        config.display.height,
        Theme::default(),
    );
    let scheduler = RenderScheduler::new(
        scene,
        &mut buffer[..len],
        SchedulerConfig::from_panel(config),
    )
    .ok_or(StartupError::Allocation)?;

    let pointer = PointerReader::new(panel.touch, config.touch_mapper());
    let output = FlushAdapter::new(panel.display);
    Ok(UiContext::new(pointer, output, scheduler, config.serial_ingestor()))
}

fn log_config(config: &PanelConfig) {
    let d = &config.display;
    info!(
        "Panel {}x{}, draw buffer {} lines, refresh {} ms",
        d.width, d.height, d.draw_buffer_lines, d.refresh_ms
    );
    info!(
        "Touch rotation {} deg, poll {} ms",
        config.touch.orientation.rotation.degrees(),
        config.touch.poll_ms
    );
    info!("Malformed serial fields: {:?}", config.serial.malformed);
}

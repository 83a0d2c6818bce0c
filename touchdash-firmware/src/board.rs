//! Board bring-up
//!
//! Bus wiring is fixed: UART0 RX on GPIO1, I2C0 SDA/SCL on GPIO4/5, SPI1
//! SCK/MOSI on GPIO10/11. Control pins come from `[pins]` in panel.toml.

use defmt::*;
use embassy_rp::i2c::{self, I2c};
use embassy_rp::peripherals::{I2C0, SPI1};
use embassy_rp::spi::{self, Spi};
use embassy_time::{Delay, Duration, Timer};
use touchdash_core::config::{ConfigError, DisplayConfig, PanelConfig, PinsConfig};
use touchdash_core::output::{fill_solid, Area};
use touchdash_core::startup::{StartupError, StartupSupervisor};
use touchdash_display::theme::{raw, SELF_TEST_COLORS};
use touchdash_drivers::display::{St7796, St7796Config};
use touchdash_drivers::touch::Gt911;
use touchdash_hal::i2c::I2cConfig;
use touchdash_hal::spi::SpiConfig;
use touchdash_hal::ActiveLevel;
use touchdash_hal_rp2040::bus::{i2c_config, spi_config};
use touchdash_hal_rp2040::{BusPeripherals, GpioOutput, I2cAdapter, PinBank, PinError, SpiAdapter};

pub type DisplayBus = SpiAdapter<Spi<'static, SPI1, spi::Blocking>>;
pub type TouchBus = I2cAdapter<I2c<'static, I2C0, i2c::Blocking>>;
pub type Display = St7796<DisplayBus, GpioOutput>;
pub type Touch = Gt911<TouchBus>;

/// Lines that must stay driven while the firmware runs
pub struct HeldPins {
    pub backlight: ActiveLevel<GpioOutput>,
    pub touch_reset: ActiveLevel<GpioOutput>,
}

/// Control pins taken from the bank
pub struct ControlPins {
    pub display_cs: ActiveLevel<GpioOutput>,
    pub display_dc: GpioOutput,
    pub display_reset: ActiveLevel<GpioOutput>,
    pub held: HeldPins,
}

impl ControlPins {
    pub fn take(bank: &mut PinBank, pins: &PinsConfig) -> Result<Self, StartupError> {
        Ok(Self {
            display_cs: bank.take_output(pins.display_cs).map_err(pin_error)?,
            // D/C polarity is fixed by the controller
            display_dc: bank.take_output(pins.display_dc).map_err(pin_error)?.into_inner(),
            display_reset: bank.take_output(pins.display_reset).map_err(pin_error)?,
            held: HeldPins {
                backlight: bank.take_output(pins.backlight).map_err(pin_error)?,
                touch_reset: bank.take_output(pins.touch_reset).map_err(pin_error)?,
            },
        })
    }
}

fn pin_error(e: PinError) -> StartupError {
    error!("Pin assignment rejected: {:?}", e);
    let (PinError::InvalidPin(pin) | PinError::AlreadyTaken(pin) | PinError::Reserved(pin)) = e;
    StartupError::Config(ConfigError::PinConflict(pin))
}

/// Display and touch drivers, not yet initialized
pub struct Panel {
    pub display: Display,
    pub touch: Touch,
}

impl Panel {
    /// Build both drivers on the fixed buses
    ///
    /// Returns the UART peripherals the buses do not use.
    pub fn new(
        bus: BusPeripherals,
        pins: ControlPins,
        config: &PanelConfig,
    ) -> (Self, HeldPins, SerialPeripherals) {
        let spi = Spi::new_blocking_txonly(
            bus.spi1,
            bus.spi1_clk,
            bus.spi1_mosi,
            spi_config(&SpiConfig::default()),
        );
        let i2c = I2c::new_blocking(
            bus.i2c0,
            bus.i2c0_scl,
            bus.i2c0_sda,
            i2c_config(&I2cConfig::FAST),
        );

        let panel = St7796Config {
            width: config.display.width,
            height: config.display.height,
            ..St7796Config::default()
        };
        let display = St7796::new(
            SpiAdapter::new(spi),
            pins.display_dc,
            pins.display_cs,
            pins.display_reset,
            panel,
        );
        let touch = Gt911::new(I2cAdapter::new(i2c), config.touch.address);

        let serial = SerialPeripherals {
            uart0: bus.uart0,
            tx: bus.uart0_tx,
            rx: bus.uart0_rx,
        };
        (Self { display, touch }, pins.held, serial)
    }

    /// Initialize the display, then the touch controller
    ///
    /// Each stage is retried on its own according to the startup policy.
    pub fn init(
        &mut self,
        supervisor: &mut StartupSupervisor,
        touch_reset: &mut ActiveLevel<GpioOutput>,
    ) -> Result<(), StartupError> {
        let display = &mut self.display;
        supervisor.run(
            || {
                display.init(&mut Delay)?;
                Ok(())
            },
            retry_wait,
        )?;
        info!("Display ready");

        let touch = &mut self.touch;
        supervisor.run(
            || {
                touch.init(touch_reset, &mut Delay)?;
                Ok(())
            },
            retry_wait,
        )?;
        info!("Touch controller ready at {=u8:#x}", self.touch.address());
        Ok(())
    }

    /// Cycle the solid-color check (if enabled), then clear to black
    pub async fn bring_up_check(&mut self, config: &DisplayConfig) -> Result<(), StartupError> {
        let screen = Area::screen(config.width, config.height)
            .ok_or(StartupError::Config(ConfigError::ZeroDimension))?;

        if config.self_test {
            info!("Panel self-test: {} colors", SELF_TEST_COLORS.len());
            for color in SELF_TEST_COLORS {
                fill_solid(&mut self.display, &screen, raw(color))?;
                Timer::after_millis(u64::from(config.self_test_ms)).await;
            }
        }

        fill_solid(&mut self.display, &screen, 0x0000)?;
        Ok(())
    }
}

/// UART0 and its pins
pub struct SerialPeripherals {
    pub uart0: embassy_rp::Peri<'static, embassy_rp::peripherals::UART0>,
    pub tx: embassy_rp::Peri<'static, embassy_rp::peripherals::PIN_0>,
    pub rx: embassy_rp::Peri<'static, embassy_rp::peripherals::PIN_1>,
}

fn retry_wait(ms: u32) {
    warn!("Startup stage failed, retrying in {} ms", ms);
    embassy_time::block_for(Duration::from_millis(u64::from(ms)));
}

/// Log the failure and stop
pub fn halt(error: StartupError) -> ! {
    error!("Startup failed at {:?}: {:?}", error.stage(), error);
    loop {
        cortex_m::asm::wfi();
    }
}

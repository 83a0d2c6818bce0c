//! GT911 capacitive touch controller (I2C)
//!
//! # Register Protocol
//!
//! Registers use 16-bit big-endian addresses. A poll reads the status
//! register, then the point records, then writes 0 to the status register
//! so the controller can latch the next frame:
//!
//! ```text
//! STATUS  0x814E  bit 7: buffer ready, bits 3..0: touch count
//! POINT1  0x814F  track id, x (LE u16), y (LE u16), size (LE u16), reserved
//! POINT2  0x8157  ... 8 bytes per point, up to five points
//! ```
//!
//! When the buffer is not ready the controller has nothing new; the previous
//! report still describes the panel.

use embedded_hal::delay::DelayNs;
use touchdash_core::traits::{
    RawPoint, TouchController, TouchError, TouchReport, MAX_TOUCH_POINTS,
};
use touchdash_hal::{ActiveLevel, I2cBus, OutputPin};

/// Default 7-bit address
pub const ADDRESS: u8 = 0x5D;

/// Alternate address selected by the INT level during reset
pub const ALT_ADDRESS: u8 = 0x14;

/// GT911 register addresses
pub mod reg {
    /// Command register
    pub const COMMAND: u16 = 0x8040;
    /// Product ID, 4 ASCII bytes
    pub const PRODUCT_ID: u16 = 0x8140;
    /// Buffer status and touch count
    pub const STATUS: u16 = 0x814E;
    /// First point record
    pub const POINT1: u16 = 0x814F;
}

const STATUS_READY: u8 = 0x80;
const STATUS_COUNT_MASK: u8 = 0x0F;
const POINT_SIZE: usize = 8;

/// Product ID reported by a GT911
const PRODUCT_GT911: &[u8; 3] = b"911";

/// Reset pulse width (ms)
const RESET_PULSE_MS: u32 = 10;

/// Time from reset release until the controller answers (ms)
const BOOT_MS: u32 = 50;

/// GT911 driver
pub struct Gt911<B> {
    bus: B,
    address: u8,
    last: TouchReport,
    initialized: bool,
}

impl<B: I2cBus> Gt911<B> {
    /// Create a driver for the controller at `address`
    pub fn new(bus: B, address: u8) -> Self {
        Self {
            bus,
            address,
            last: TouchReport::released(),
            initialized: false,
        }
    }

    pub fn address(&self) -> u8 {
        self.address
    }

    /// Reset the controller and check that it identifies as a GT911
    ///
    /// # Arguments
    /// - `reset`: Controller reset line
    /// - `delay`: Blocking delay provider
    pub fn init<R, D>(
        &mut self,
        reset: &mut ActiveLevel<R>,
        delay: &mut D,
    ) -> Result<(), TouchError>
    where
        R: OutputPin,
        D: DelayNs,
    {
        reset.assert();
        delay.delay_ms(RESET_PULSE_MS);
        reset.deassert();
        delay.delay_ms(BOOT_MS);

        let id = self.product_id()?;
        if &id[..3] != PRODUCT_GT911 {
            return Err(TouchError::InvalidData);
        }

        // Drop whatever was latched before reset
        self.clear_status()?;
        self.last = TouchReport::released();
        self.initialized = true;
        Ok(())
    }

    /// Read the 4-byte product ID
    pub fn product_id(&mut self) -> Result<[u8; 4], TouchError> {
        let mut id = [0u8; 4];
        self.bus
            .read_reg16(self.address, reg::PRODUCT_ID, &mut id)
            .map_err(|_| TouchError::Bus)?;
        Ok(id)
    }

    fn clear_status(&mut self) -> Result<(), TouchError> {
        self.bus
            .write_reg16(self.address, reg::STATUS, &[0])
            .map_err(|_| TouchError::Bus)
    }

    fn read_report(&mut self) -> Result<TouchReport, TouchError> {
        let mut status = [0u8; 1];
        self.bus
            .read_reg16(self.address, reg::STATUS, &mut status)
            .map_err(|_| TouchError::Bus)?;

        if status[0] & STATUS_READY == 0 {
            return Ok(self.last.clone());
        }

        let count = status[0] & STATUS_COUNT_MASK;
        if usize::from(count) > MAX_TOUCH_POINTS {
            self.clear_status()?;
            return Err(TouchError::InvalidData);
        }

        let mut raw = [0u8; POINT_SIZE * MAX_TOUCH_POINTS];
        let len = usize::from(count) * POINT_SIZE;
        if len > 0 {
            self.bus
                .read_reg16(self.address, reg::POINT1, &mut raw[..len])
                .map_err(|_| TouchError::Bus)?;
        }
        self.clear_status()?;

        let mut report = TouchReport {
            count,
            points: heapless::Vec::new(),
        };
        for record in raw[..len].chunks_exact(POINT_SIZE) {
            // At most MAX_TOUCH_POINTS records
            let _ = report.points.push(decode_point(record));
        }

        self.last = report.clone();
        Ok(report)
    }
}

impl<B: I2cBus> TouchController for Gt911<B> {
    fn read_touch(&mut self) -> Result<TouchReport, TouchError> {
        if !self.initialized {
            return Err(TouchError::NotInitialized);
        }
        self.read_report()
    }
}

fn decode_point(record: &[u8]) -> RawPoint {
    RawPoint {
        track_id: record[0],
        x: u16::from_le_bytes([record[1], record[2]]),
        y: u16::from_le_bytes([record[3], record[4]]),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;
    use std::vec::Vec;

    /// Register-file model of the controller
    #[derive(Default)]
    struct FakeGt911 {
        regs: BTreeMap<u16, u8>,
        writes: Vec<(u16, Vec<u8>)>,
        fail: bool,
    }

    impl FakeGt911 {
        fn with_product() -> Self {
            let mut f = Self::default();
            for (i, b) in b"911\0".iter().enumerate() {
                f.regs.insert(reg::PRODUCT_ID + i as u16, *b);
            }
            f
        }

        fn set_points(&mut self, points: &[(u8, u16, u16)]) {
            self.regs.insert(reg::STATUS, STATUS_READY | points.len() as u8);
            for (i, &(id, x, y)) in points.iter().enumerate() {
                let base = reg::POINT1 + (i * POINT_SIZE) as u16;
                let bytes = [id, x as u8, (x >> 8) as u8, y as u8, (y >> 8) as u8, 0, 0, 0];
                for (j, b) in bytes.iter().enumerate() {
                    self.regs.insert(base + j as u16, *b);
                }
            }
        }
    }

    impl I2cBus for &mut FakeGt911 {
        type Error = ();

        fn write(&mut self, address: u8, data: &[u8]) -> Result<(), ()> {
            assert_eq!(address, ADDRESS);
            if self.fail {
                return Err(());
            }
            let reg = u16::from_be_bytes([data[0], data[1]]);
            for (i, b) in data[2..].iter().enumerate() {
                self.regs.insert(reg + i as u16, *b);
            }
            self.writes.push((reg, data[2..].to_vec()));
            Ok(())
        }

        fn write_read(&mut self, address: u8, write: &[u8], read: &mut [u8]) -> Result<(), ()> {
            assert_eq!(address, ADDRESS);
            if self.fail {
                return Err(());
            }
            let reg = u16::from_be_bytes([write[0], write[1]]);
            for (i, b) in read.iter_mut().enumerate() {
                *b = self.regs.get(&(reg + i as u16)).copied().unwrap_or(0);
            }
            Ok(())
        }
    }

    struct Pin(bool);

    impl OutputPin for Pin {
        fn set_high(&mut self) {
            self.0 = true;
        }
        fn set_low(&mut self) {
            self.0 = false;
        }
        fn is_set_high(&self) -> bool {
            self.0
        }
    }

    struct NoDelay;

    impl DelayNs for NoDelay {
        fn delay_ns(&mut self, _ns: u32) {}
    }

    fn ready(fake: &mut FakeGt911) -> Gt911<&mut FakeGt911> {
        let mut touch = Gt911::new(fake, ADDRESS);
        let mut reset = ActiveLevel::low(Pin(true));
        touch.init(&mut reset, &mut NoDelay).unwrap();
        assert!(!reset.is_asserted());
        touch
    }

    #[test]
    fn test_not_initialized() {
        let mut fake = FakeGt911::with_product();
        let mut touch = Gt911::new(&mut fake, ADDRESS);
        assert_eq!(touch.read_touch(), Err(TouchError::NotInitialized));
    }

    #[test]
    fn test_wrong_product() {
        let mut fake = FakeGt911::default();
        let mut touch = Gt911::new(&mut fake, ADDRESS);
        let mut reset = ActiveLevel::low(Pin(true));
        assert_eq!(
            touch.init(&mut reset, &mut NoDelay),
            Err(TouchError::InvalidData)
        );
    }

    #[test]
    fn test_single_point() {
        let mut fake = FakeGt911::with_product();
        let mut touch = ready(&mut fake);
        touch.bus.set_points(&[(2, 300, 0x1A4)]);

        let report = touch.read_touch().unwrap();
        assert_eq!(report.count, 1);
        assert_eq!(
            report.points[0],
            RawPoint {
                x: 300,
                y: 0x1A4,
                track_id: 2
            }
        );
    }

    #[test]
    fn test_status_cleared_after_read() {
        let mut fake = FakeGt911::with_product();
        {
            let mut touch = ready(&mut fake);
            touch.bus.set_points(&[(0, 1, 1), (1, 2, 2)]);
            assert_eq!(touch.read_touch().unwrap().points.len(), 2);
        }
        assert_eq!(fake.regs[&reg::STATUS], 0);
        assert_eq!(fake.writes.last(), Some(&(reg::STATUS, std::vec![0])));
    }

    #[test]
    fn test_not_ready_repeats_last_report() {
        let mut fake = FakeGt911::with_product();
        let mut touch = ready(&mut fake);
        touch.bus.set_points(&[(0, 10, 20)]);

        let first = touch.read_touch().unwrap();
        // Status now cleared: nothing new latched
        let second = touch.read_touch().unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_too_many_points() {
        let mut fake = FakeGt911::with_product();
        let mut touch = ready(&mut fake);
        touch.bus.regs.insert(reg::STATUS, STATUS_READY | 0x0A);
        assert_eq!(touch.read_touch(), Err(TouchError::InvalidData));
    }

    #[test]
    fn test_bus_error() {
        let mut fake = FakeGt911::with_product();
        let mut touch = ready(&mut fake);
        touch.bus.fail = true;
        assert_eq!(touch.read_touch(), Err(TouchError::Bus));
    }
}

//! GPIO control line abstraction
//!
//! The panel only needs outputs: touch controller reset, display reset,
//! display data/command select and the backlight enable.

/// Digital output pin
///
/// Implementations should handle the actual hardware register manipulation
/// for the specific chip.
pub trait OutputPin {
    /// Set the pin high (logic 1)
    fn set_high(&mut self);

    /// Set the pin low (logic 0)
    fn set_low(&mut self);

    /// Set the pin to a specific state
    fn set_state(&mut self, high: bool) {
        if high {
            self.set_high();
        } else {
            self.set_low();
        }
    }

    /// Check if the pin is currently set high
    fn is_set_high(&self) -> bool;
}

/// Output pin with configurable polarity
///
/// Reset lines are commonly active-low; wrapping them lets drivers talk in
/// terms of "asserted" rather than electrical levels.
#[derive(Debug)]
pub struct ActiveLevel<P> {
    pin: P,
    active_high: bool,
}

impl<P: OutputPin> ActiveLevel<P> {
    /// Wrap a pin with the given polarity
    pub fn new(pin: P, active_high: bool) -> Self {
        Self { pin, active_high }
    }

    /// Wrap an active-high pin
    pub fn high(pin: P) -> Self {
        Self {
            pin,
            active_high: true,
        }
    }

    /// Wrap an active-low pin
    pub fn low(pin: P) -> Self {
        Self {
            pin,
            active_high: false,
        }
    }

    /// Drive the line to its active level
    pub fn assert(&mut self) {
        self.pin.set_state(self.active_high);
    }

    /// Drive the line to its inactive level
    pub fn deassert(&mut self) {
        self.pin.set_state(!self.active_high);
    }

    /// Check if the line is currently at its active level
    pub fn is_asserted(&self) -> bool {
        self.pin.is_set_high() == self.active_high
    }

    /// Release the wrapped pin
    pub fn into_inner(self) -> P {
        self.pin
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct MockPin {
        high: bool,
    }

    impl OutputPin for MockPin {
        fn set_high(&mut self) {
            self.high = true;
        }

        fn set_low(&mut self) {
            self.high = false;
        }

        fn is_set_high(&self) -> bool {
            self.high
        }
    }

    #[test]
    fn test_active_low_assert() {
        let mut reset = ActiveLevel::low(MockPin { high: true });
        reset.assert();
        assert!(reset.is_asserted());
        assert!(!reset.into_inner().high);
    }

    #[test]
    fn test_active_high_deassert() {
        let mut enable = ActiveLevel::high(MockPin::default());
        enable.assert();
        assert!(enable.is_asserted());
        enable.deassert();
        assert!(!enable.is_asserted());
    }
}

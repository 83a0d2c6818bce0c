//! Flush completion handshake

/// Completion flag for an in-flight flush
///
/// Owned by the renderer. It is armed before each flush call and raised by
/// the flush target when the region has been consumed. The renderer does
/// not render again until the flag is raised.
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FlushSignal {
    pending: bool,
    completions: u32,
}

impl FlushSignal {
    /// Create an idle (ready) signal
    pub const fn new() -> Self {
        Self {
            pending: false,
            completions: 0,
        }
    }

    /// Mark a flush as in flight
    pub fn arm(&mut self) {
        self.pending = true;
    }

    /// Mark the in-flight flush as complete
    pub fn flush_ready(&mut self) {
        self.pending = false;
        self.completions = self.completions.wrapping_add(1);
    }

    /// No flush is in flight
    pub fn is_ready(&self) -> bool {
        !self.pending
    }

    /// Number of completions signalled so far
    pub fn completions(&self) -> u32 {
        self.completions
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_handshake() {
        let mut s = FlushSignal::new();
        assert!(s.is_ready());

        s.arm();
        assert!(!s.is_ready());

        s.flush_ready();
        assert!(s.is_ready());
        assert_eq!(s.completions(), 1);
    }
}

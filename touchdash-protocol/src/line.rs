//! Line assembly for the dashboard feed.
//!
//! Bytes arrive from the UART in arbitrary chunks. The assembler collects
//! them until a `\n` terminator and hands back the completed line with any
//! trailing `\r` removed.
//!
//! A line that grows past the configured limit is reported once as
//! [`LineError::LineTooLong`]; the rest of it is discarded up to the next
//! terminator so the following line starts clean.

use heapless::{String, Vec};

/// Hard upper bound on a line (bytes, terminator excluded)
pub const LINE_CAPACITY: usize = 256;

/// Default line limit; a full ten-field line is well under 128 bytes
pub const DEFAULT_MAX_LINE: usize = 128;

/// A completed line
pub type Line = String<LINE_CAPACITY>;

const LF: u8 = b'\n';
const CR: u8 = b'\r';

/// Errors reported while assembling lines
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LineError {
    /// Line exceeded the configured limit and is being discarded
    LineTooLong,
    /// Completed line is not valid UTF-8
    InvalidUtf8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AssembleState {
    /// Appending bytes to the current line
    Collecting,
    /// Dropping bytes until the next terminator
    Discarding,
}

/// Byte-at-a-time line assembler
#[derive(Debug, Clone)]
pub struct LineAssembler {
    state: AssembleState,
    buffer: Vec<u8, LINE_CAPACITY>,
    max_len: usize,
}

impl Default for LineAssembler {
    fn default() -> Self {
        Self::new()
    }
}

impl LineAssembler {
    /// Create an assembler with the default line limit
    pub fn new() -> Self {
        Self::with_max_len(DEFAULT_MAX_LINE)
    }

    /// Create an assembler with a custom line limit
    ///
    /// The limit is clamped to `1..=LINE_CAPACITY`.
    pub fn with_max_len(max_len: usize) -> Self {
        Self {
            state: AssembleState::Collecting,
            buffer: Vec::new(),
            max_len: max_len.clamp(1, LINE_CAPACITY),
        }
    }

    /// Configured line limit
    pub fn max_len(&self) -> usize {
        self.max_len
    }

    /// Number of bytes buffered for the line in progress
    pub fn pending(&self) -> usize {
        self.buffer.len()
    }

    /// Drop any partial line
    pub fn reset(&mut self) {
        self.state = AssembleState::Collecting;
        self.buffer.clear();
    }

    /// Feed a single byte
    ///
    /// Returns `Ok(Some(line))` when a terminator completes a line,
    /// `Ok(None)` when more bytes are needed, or `Err` when the current line
    /// has been rejected.
    pub fn feed(&mut self, byte: u8) -> Result<Option<Line>, LineError> {
        match (self.state, byte) {
            (AssembleState::Discarding, LF) => {
                // End of the oversized line; resync silently
                self.reset();
                Ok(None)
            }
            (AssembleState::Discarding, _) => Ok(None),
            (AssembleState::Collecting, LF) => self.complete(),
            (AssembleState::Collecting, _) => {
                if self.buffer.len() >= self.max_len {
                    self.buffer.clear();
                    self.state = AssembleState::Discarding;
                    return Err(LineError::LineTooLong);
                }
                // Capacity is guaranteed by the max_len check above
                let _ = self.buffer.push(byte);
                Ok(None)
            }
        }
    }

    fn complete(&mut self) -> Result<Option<Line>, LineError> {
        if self.buffer.last() == Some(&CR) {
            self.buffer.pop();
        }

        let result = match core::str::from_utf8(&self.buffer) {
            Ok(text) => {
                let mut line = Line::new();
                // Same capacity as the byte buffer
                let _ = line.push_str(text);
                Ok(Some(line))
            }
            Err(_) => Err(LineError::InvalidUtf8),
        };

        self.reset();
        result
    }
}

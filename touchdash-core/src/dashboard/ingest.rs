//! Serial line ingestion into the dashboard state
//!
//! Bytes are assembled into lines, each line is parsed into a sparse update
//! and the update is applied field by field. Keys absent from a line leave
//! the state untouched.

use touchdash_protocol::{
    DashboardUpdate, Field, FieldKey, FieldKind, Line, LineAssembler, LineError,
};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::state::DashboardState;

/// How a malformed numeric value is applied
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum MalformedPolicy {
    /// Keep the previous value
    #[default]
    Reject,
    /// Store zero
    Zero,
}

impl MalformedPolicy {
    /// Parse a policy name as written in configuration
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "reject" => Some(Self::Reject),
            "zero" => Some(Self::Zero),
            _ => None,
        }
    }
}

/// Outcome of applying one line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct IngestReport {
    /// Fields written to the state
    pub applied: u8,
    /// Fields present with unreadable values
    pub malformed: u8,
    /// Segments with unrecognized keys
    pub unknown: u8,
    /// Segments without a `key:value` shape
    pub stray: u8,
    malformed_mask: u16,
}

impl IngestReport {
    /// Returns true if `key` was sent with an unreadable value
    pub fn is_malformed(&self, key: FieldKey) -> bool {
        self.malformed_mask & key_bit(key) != 0
    }

    /// Returns true if the line changed nothing and reported nothing
    pub fn is_empty(&self) -> bool {
        self.applied == 0 && self.malformed == 0 && self.unknown == 0 && self.stray == 0
    }
}

/// Running ingestion counters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct IngestStats {
    /// Lines applied to the state
    pub lines: u32,
    pub fields_applied: u32,
    pub malformed_fields: u32,
    pub unknown_fields: u32,
    pub stray_segments: u32,
    /// Lines dropped for exceeding the length limit
    pub oversized_lines: u32,
    /// Lines dropped for invalid UTF-8
    pub invalid_lines: u32,
}

/// Turns serial bytes into dashboard state changes
#[derive(Debug, Clone)]
pub struct SerialIngestor {
    assembler: LineAssembler,
    policy: MalformedPolicy,
    stats: IngestStats,
}

impl Default for SerialIngestor {
    fn default() -> Self {
        Self::new(MalformedPolicy::default(), touchdash_protocol::DEFAULT_MAX_LINE)
    }
}

impl SerialIngestor {
    /// Create an ingestor
    ///
    /// # Arguments
    /// - `policy`: How malformed numbers are applied
    /// - `max_line`: Longest accepted line in bytes
    pub fn new(policy: MalformedPolicy, max_line: usize) -> Self {
        Self {
            assembler: LineAssembler::with_max_len(max_line),
            policy,
            stats: IngestStats::default(),
        }
    }

    pub fn policy(&self) -> MalformedPolicy {
        self.policy
    }

    pub fn stats(&self) -> &IngestStats {
        &self.stats
    }

    /// Feed one received byte
    ///
    /// Returns a completed line, if this byte terminated one. Dropped lines
    /// are counted and reported as errors.
    pub fn feed(&mut self, byte: u8) -> Result<Option<Line>, LineError> {
        let result = self.assembler.feed(byte);
        match result {
            Err(LineError::LineTooLong) => {
                self.stats.oversized_lines = self.stats.oversized_lines.wrapping_add(1);
            }
            Err(LineError::InvalidUtf8) => {
                self.stats.invalid_lines = self.stats.invalid_lines.wrapping_add(1);
            }
            Ok(_) => {}
        }
        result
    }

    /// Parse a line and apply it to `state`
    pub fn apply_line(&mut self, state: &mut DashboardState, line: &str) -> IngestReport {
        self.apply_update(state, &DashboardUpdate::parse(line))
    }

    /// Apply a parsed update to `state`
    pub fn apply_update(
        &mut self,
        state: &mut DashboardState,
        update: &DashboardUpdate,
    ) -> IngestReport {
        let mut report = IngestReport {
            unknown: update.unknown_fields,
            stray: update.stray_segments,
            ..Default::default()
        };

        for key in FieldKey::ALL {
            let written = match key.kind() {
                FieldKind::Integer => match update.integer(key) {
                    Some(Field::Present(value)) => state.set_integer(key, *value),
                    Some(Field::Malformed) => {
                        report.malformed += 1;
                        report.malformed_mask |= key_bit(key);
                        match self.policy {
                            MalformedPolicy::Zero => state.set_integer(key, 0),
                            MalformedPolicy::Reject => false,
                        }
                    }
                    _ => false,
                },
                FieldKind::Text => match update.text(key) {
                    Some(Field::Present(value)) => state.set_text(key, value),
                    Some(Field::Malformed) => {
                        report.malformed += 1;
                        report.malformed_mask |= key_bit(key);
                        false
                    }
                    _ => false,
                },
            };
            if written {
                report.applied += 1;
            }
        }

        self.record(&report);
        report
    }

    fn record(&mut self, report: &IngestReport) {
        let s = &mut self.stats;
        s.lines = s.lines.wrapping_add(1);
        s.fields_applied = s.fields_applied.wrapping_add(u32::from(report.applied));
        s.malformed_fields = s.malformed_fields.wrapping_add(u32::from(report.malformed));
        s.unknown_fields = s.unknown_fields.wrapping_add(u32::from(report.unknown));
        s.stray_segments = s.stray_segments.wrapping_add(u32::from(report.stray));
    }
}

fn key_bit(key: FieldKey) -> u16 {
    let index = FieldKey::ALL.iter().position(|&k| k == key).unwrap_or(0);
    1 << index
}

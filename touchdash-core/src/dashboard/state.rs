//! Dashboard state record

use touchdash_protocol::{FieldKey, Text};

/// Values shown on the dashboard
///
/// Flat record updated in place by the serial ingestor. No history is kept:
/// the last write to a field wins.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DashboardState {
    pub speed: i32,
    pub range: i32,
    pub avg_wh: i32,
    pub trip: i32,
    pub odo: i32,
    pub avg_kmh: i32,
    /// Motor temperature
    pub motor_temp: i32,
    /// Battery temperature
    pub battery_temp: i32,
    pub mode: Text,
    pub status: Text,
}

impl DashboardState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Integer value for a key (`None` for text keys)
    pub fn integer(&self, key: FieldKey) -> Option<i32> {
        match key {
            FieldKey::Speed => Some(self.speed),
            FieldKey::Range => Some(self.range),
            FieldKey::AvgWh => Some(self.avg_wh),
            FieldKey::Trip => Some(self.trip),
            FieldKey::Odo => Some(self.odo),
            FieldKey::AvgKmh => Some(self.avg_kmh),
            FieldKey::Motor => Some(self.motor_temp),
            FieldKey::Battery => Some(self.battery_temp),
            FieldKey::Mode | FieldKey::Status => None,
        }
    }

    /// Text value for a key (`None` for integer keys)
    pub fn text(&self, key: FieldKey) -> Option<&str> {
        match key {
            FieldKey::Mode => Some(self.mode.as_str()),
            FieldKey::Status => Some(self.status.as_str()),
            _ => None,
        }
    }

    /// Set an integer field
    ///
    /// Returns false if `key` is a text key.
    pub fn set_integer(&mut self, key: FieldKey, value: i32) -> bool {
        let slot = match key {
            FieldKey::Speed => &mut self.speed,
            FieldKey::Range => &mut self.range,
            FieldKey::AvgWh => &mut self.avg_wh,
            FieldKey::Trip => &mut self.trip,
            FieldKey::Odo => &mut self.odo,
            FieldKey::AvgKmh => &mut self.avg_kmh,
            FieldKey::Motor => &mut self.motor_temp,
            FieldKey::Battery => &mut self.battery_temp,
            FieldKey::Mode | FieldKey::Status => return false,
        };
        *slot = value;
        true
    }

    /// Set a text field
    ///
    /// Returns false if `key` is an integer key.
    pub fn set_text(&mut self, key: FieldKey, value: &Text) -> bool {
        let slot = match key {
            FieldKey::Mode => &mut self.mode,
            FieldKey::Status => &mut self.status,
            _ => return false,
        };
        slot.clone_from(value);
        true
    }
}

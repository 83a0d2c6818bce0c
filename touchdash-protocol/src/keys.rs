//! Field keys recognized on the dashboard feed

/// Value type carried by a field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FieldKind {
    /// Decimal integer
    Integer,
    /// Short trimmed string
    Text,
}

/// Recognized dashboard fields
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FieldKey {
    /// Vehicle speed (km/h)
    Speed,
    /// Remaining range (km)
    Range,
    /// Average consumption (Wh/km)
    AvgWh,
    /// Trip distance (km)
    Trip,
    /// Odometer (km)
    Odo,
    /// Average speed (km/h)
    AvgKmh,
    /// Motor temperature (°C)
    Motor,
    /// Battery temperature (°C)
    Battery,
    /// Ride mode label
    Mode,
    /// Controller status label
    Status,
}

// Wire format names
const KEY_SPEED: &str = "speed";
const KEY_RANGE: &str = "range";
const KEY_AVG_WH: &str = "avg_wh";
const KEY_TRIP: &str = "trip";
const KEY_ODO: &str = "odo";
const KEY_AVG_KMH: &str = "avg_kmh";
const KEY_MOTOR: &str = "motor";
const KEY_BATTERY: &str = "battery";
const KEY_MODE: &str = "mode";
const KEY_STATUS: &str = "status";

impl FieldKey {
    /// Every recognized key, in wire-table order
    pub const ALL: [FieldKey; 10] = [
        FieldKey::Speed,
        FieldKey::Range,
        FieldKey::AvgWh,
        FieldKey::Trip,
        FieldKey::Odo,
        FieldKey::AvgKmh,
        FieldKey::Motor,
        FieldKey::Battery,
        FieldKey::Mode,
        FieldKey::Status,
    ];

    /// Look up a key by its wire name (case-sensitive)
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            KEY_SPEED => Some(FieldKey::Speed),
            KEY_RANGE => Some(FieldKey::Range),
            KEY_AVG_WH => Some(FieldKey::AvgWh),
            KEY_TRIP => Some(FieldKey::Trip),
            KEY_ODO => Some(FieldKey::Odo),
            KEY_AVG_KMH => Some(FieldKey::AvgKmh),
            KEY_MOTOR => Some(FieldKey::Motor),
            KEY_BATTERY => Some(FieldKey::Battery),
            KEY_MODE => Some(FieldKey::Mode),
            KEY_STATUS => Some(FieldKey::Status),
            _ => None,
        }
    }

    /// Wire name of this key
    pub fn name(self) -> &'static str {
        match self {
            FieldKey::Speed => KEY_SPEED,
            FieldKey::Range => KEY_RANGE,
            FieldKey::AvgWh => KEY_AVG_WH,
            FieldKey::Trip => KEY_TRIP,
            FieldKey::Odo => KEY_ODO,
            FieldKey::AvgKmh => KEY_AVG_KMH,
            FieldKey::Motor => KEY_MOTOR,
            FieldKey::Battery => KEY_BATTERY,
            FieldKey::Mode => KEY_MODE,
            FieldKey::Status => KEY_STATUS,
        }
    }

    /// Value type this key carries
    pub fn kind(self) -> FieldKind {
        match self {
            FieldKey::Mode | FieldKey::Status => FieldKind::Text,
            _ => FieldKind::Integer,
        }
    }

    /// Returns true if this key carries an integer
    pub fn is_integer(self) -> bool {
        self.kind() == FieldKind::Integer
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_names_resolve() {
        for key in FieldKey::ALL {
            assert_eq!(FieldKey::from_name(key.name()), Some(key));
        }
    }

    #[test]
    fn test_text_keys() {
        assert_eq!(FieldKey::Mode.kind(), FieldKind::Text);
        assert_eq!(FieldKey::Status.kind(), FieldKind::Text);
        assert!(FieldKey::AvgKmh.is_integer());
    }

    #[test]
    fn test_unknown_key() {
        assert!(FieldKey::from_name("Speed").is_none());
        assert!(FieldKey::from_name("volts").is_none());
        assert!(FieldKey::from_name("").is_none());
    }
}

//! Sparse dashboard updates parsed from a single line
//!
//! A line is split on commas into `key:value` segments. Every recognized key
//! resolves to one of three outcomes so the receiver can tell "not sent"
//! apart from "sent but unreadable":
//!
//! - [`Field::Absent`] - key not present in the line
//! - [`Field::Present`] - key present with a valid value
//! - [`Field::Malformed`] - key present but the value did not parse
//!
//! When a key appears more than once, the first occurrence wins.

use heapless::String;

use crate::keys::{FieldKey, FieldKind};

/// Maximum length of a text field value (bytes)
pub const TEXT_CAPACITY: usize = 16;

/// Text field value
pub type Text = String<TEXT_CAPACITY>;

/// Parse outcome for one field
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Field<T> {
    /// Key not present in the line
    Absent,
    /// Key present with a valid value
    Present(T),
    /// Key present but the value could not be parsed
    Malformed,
}

impl<T> Default for Field<T> {
    fn default() -> Self {
        Field::Absent
    }
}

impl<T> Field<T> {
    /// Returns true if the key was not sent
    pub fn is_absent(&self) -> bool {
        matches!(self, Field::Absent)
    }

    /// Returns true if the key was sent with an unreadable value
    pub fn is_malformed(&self) -> bool {
        matches!(self, Field::Malformed)
    }

    /// Valid value, if any
    pub fn value(&self) -> Option<&T> {
        match self {
            Field::Present(v) => Some(v),
            _ => None,
        }
    }
}

/// All fields carried by one line
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DashboardUpdate {
    pub speed: Field<i32>,
    pub range: Field<i32>,
    pub avg_wh: Field<i32>,
    pub trip: Field<i32>,
    pub odo: Field<i32>,
    pub avg_kmh: Field<i32>,
    pub motor: Field<i32>,
    pub battery: Field<i32>,
    pub mode: Field<Text>,
    pub status: Field<Text>,
    /// Segments with a key that is not recognized
    pub unknown_fields: u8,
    /// Non-empty segments without a `:` separator
    pub stray_segments: u8,
}

impl DashboardUpdate {
    /// Parse a line into a sparse update
    ///
    /// Never fails: problems are recorded per field or in the counters.
    pub fn parse(line: &str) -> Self {
        let mut update = Self::default();

        for segment in line.trim().split(',') {
            let segment = segment.trim();
            if segment.is_empty() {
                continue;
            }

            let Some((name, value)) = segment.split_once(':') else {
                update.stray_segments = update.stray_segments.saturating_add(1);
                continue;
            };

            let Some(key) = FieldKey::from_name(name.trim()) else {
                update.unknown_fields = update.unknown_fields.saturating_add(1);
                continue;
            };

            match key.kind() {
                FieldKind::Integer => {
                    if let Some(field) = update.integer_mut(key) {
                        if field.is_absent() {
                            *field = parse_integer(value);
                        }
                    }
                }
                FieldKind::Text => {
                    if let Some(field) = update.text_mut(key) {
                        if field.is_absent() {
                            *field = Field::Present(truncate_text(value.trim()));
                        }
                    }
                }
            }
        }

        update
    }

    /// Integer field for a key (`None` for text keys)
    pub fn integer(&self, key: FieldKey) -> Option<&Field<i32>> {
        match key {
            FieldKey::Speed => Some(&self.speed),
            FieldKey::Range => Some(&self.range),
            FieldKey::AvgWh => Some(&self.avg_wh),
            FieldKey::Trip => Some(&self.trip),
            FieldKey::Odo => Some(&self.odo),
            FieldKey::AvgKmh => Some(&self.avg_kmh),
            FieldKey::Motor => Some(&self.motor),
            FieldKey::Battery => Some(&self.battery),
            FieldKey::Mode | FieldKey::Status => None,
        }
    }

    fn integer_mut(&mut self, key: FieldKey) -> Option<&mut Field<i32>> {
        match key {
            FieldKey::Speed => Some(&mut self.speed),
            FieldKey::Range => Some(&mut self.range),
            FieldKey::AvgWh => Some(&mut self.avg_wh),
            FieldKey::Trip => Some(&mut self.trip),
            FieldKey::Odo => Some(&mut self.odo),
            FieldKey::AvgKmh => Some(&mut self.avg_kmh),
            FieldKey::Motor => Some(&mut self.motor),
            FieldKey::Battery => Some(&mut self.battery),
            FieldKey::Mode | FieldKey::Status => None,
        }
    }

    /// Text field for a key (`None` for integer keys)
    pub fn text(&self, key: FieldKey) -> Option<&Field<Text>> {
        match key {
            FieldKey::Mode => Some(&self.mode),
            FieldKey::Status => Some(&self.status),
            _ => None,
        }
    }

    fn text_mut(&mut self, key: FieldKey) -> Option<&mut Field<Text>> {
        match key {
            FieldKey::Mode => Some(&mut self.mode),
            FieldKey::Status => Some(&mut self.status),
            _ => None,
        }
    }

    /// Returns true if the key was sent with an unreadable value
    pub fn is_malformed(&self, key: FieldKey) -> bool {
        match key.kind() {
            FieldKind::Integer => self.integer(key).is_some_and(Field::is_malformed),
            FieldKind::Text => self.text(key).is_some_and(Field::is_malformed),
        }
    }

    /// Returns true if the key was present in the line
    pub fn is_present(&self, key: FieldKey) -> bool {
        match key.kind() {
            FieldKind::Integer => self.integer(key).is_some_and(|f| !f.is_absent()),
            FieldKind::Text => self.text(key).is_some_and(|f| !f.is_absent()),
        }
    }

    /// Keys that were sent with unreadable values
    pub fn malformed_keys(&self) -> impl Iterator<Item = FieldKey> + '_ {
        FieldKey::ALL.into_iter().filter(|&k| self.is_malformed(k))
    }

    /// Number of recognized keys present in the line
    pub fn present_count(&self) -> usize {
        FieldKey::ALL
            .into_iter()
            .filter(|&k| self.is_present(k))
            .count()
    }
}

fn parse_integer(value: &str) -> Field<i32> {
    match value.trim().parse::<i32>() {
        Ok(v) => Field::Present(v),
        Err(_) => Field::Malformed,
    }
}

/// Truncate to [`TEXT_CAPACITY`] bytes without splitting a character
fn truncate_text(value: &str) -> Text {
    let mut end = value.len().min(TEXT_CAPACITY);
    while !value.is_char_boundary(end) {
        end -= 1;
    }
    let mut text = Text::new();
    // end <= TEXT_CAPACITY
    let _ = text.push_str(&value[..end]);
    text
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(s: &str) -> Text {
        let mut t = Text::new();
        t.push_str(s).unwrap();
        t
    }

    #[test]
    fn test_full_line() {
        let update = DashboardUpdate::parse("speed:99,range:130,mode:Sport,status:ARMED");
        assert_eq!(update.speed, Field::Present(99));
        assert_eq!(update.range, Field::Present(130));
        assert_eq!(update.mode, Field::Present(text("Sport")));
        assert_eq!(update.status, Field::Present(text("ARMED")));
        assert_eq!(update.present_count(), 4);
        assert!(update.odo.is_absent());
    }

    #[test]
    fn test_sparse_line_leaves_others_absent() {
        let update = DashboardUpdate::parse("speed:50,mode:Sport");
        assert_eq!(update.present_count(), 2);
        for key in FieldKey::ALL {
            if key != FieldKey::Speed && key != FieldKey::Mode {
                assert!(!update.is_present(key), "{:?} should be absent", key);
            }
        }
    }

    #[test]
    fn test_malformed_integer_is_reported() {
        let update = DashboardUpdate::parse("speed:abc,range:12");
        assert_eq!(update.speed, Field::Malformed);
        assert_eq!(update.range, Field::Present(12));
        let mut bad = update.malformed_keys();
        assert_eq!(bad.next(), Some(FieldKey::Speed));
        assert_eq!(bad.next(), None);
    }

    #[test]
    fn test_empty_integer_is_malformed() {
        let update = DashboardUpdate::parse("trip:");
        assert_eq!(update.trip, Field::Malformed);
    }

    #[test]
    fn test_whitespace_trimmed() {
        let update = DashboardUpdate::parse("  motor: 61 , mode:  Eco  ");
        assert_eq!(update.motor, Field::Present(61));
        assert_eq!(update.mode, Field::Present(text("Eco")));
    }

    #[test]
    fn test_negative_temperature() {
        let update = DashboardUpdate::parse("battery:-7");
        assert_eq!(update.battery, Field::Present(-7));
    }

    #[test]
    fn test_first_occurrence_wins() {
        let update = DashboardUpdate::parse("speed:10,speed:20");
        assert_eq!(update.speed, Field::Present(10));
    }

    #[test]
    fn test_unknown_and_stray_segments_counted() {
        let update = DashboardUpdate::parse("volts:52,garbage,,odo:1000");
        assert_eq!(update.unknown_fields, 1);
        assert_eq!(update.stray_segments, 1);
        assert_eq!(update.odo, Field::Present(1000));
    }

    #[test]
    fn test_text_truncated_on_char_boundary() {
        let update = DashboardUpdate::parse("status:ÜÜÜÜÜÜÜÜÜ");
        let status = update.status.value().unwrap();
        assert!(status.len() <= TEXT_CAPACITY);
        assert_eq!(status.chars().count(), 8);
    }

    #[test]
    fn test_value_containing_colon() {
        let update = DashboardUpdate::parse("status:ERR:42");
        assert_eq!(update.status, Field::Present(text("ERR:42")));
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn parse_never_panics(line in "\\PC{0,200}") {
            let _ = DashboardUpdate::parse(&line);
        }

        #[test]
        fn integers_survive_formatting(speed in any::<i32>(), odo in any::<i32>()) {
            let mut line = String::<64>::new();
            core::fmt::write(&mut line, format_args!("odo:{},speed:{}", odo, speed)).unwrap();
            let update = DashboardUpdate::parse(&line);
            prop_assert_eq!(update.speed, Field::Present(speed));
            prop_assert_eq!(update.odo, Field::Present(odo));
        }
    }
}

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::error::BookingError;

/// Opening hours shown next to the slot picker.
pub const CLINIC_HOURS: &str = "9:00 AM - 1:00 PM & 2:00 PM - 5:00 PM";

/// Half-hour appointment windows offered by the clinic, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TimeSlot {
    Nine,
    Ten,
    Eleven,
    Twelve,
    Two,
    Three,
    Four,
}

impl TimeSlot {
    pub const ALL: [TimeSlot; 7] = [
        TimeSlot::Nine,
        TimeSlot::Ten,
        TimeSlot::Eleven,
        TimeSlot::Twelve,
        TimeSlot::Two,
        TimeSlot::Three,
        TimeSlot::Four,
    ];

    /// The label exchanged with the webhook and shown to patients.
    pub fn label(self) -> &'static str {
        match self {
            TimeSlot::Nine => "9:00 AM - 9:30 AM",
            TimeSlot::Ten => "10:00 AM - 10:30 AM",
            TimeSlot::Eleven => "11:00 AM - 11:30 AM",
            TimeSlot::Twelve => "12:00 PM - 12:30 PM",
            TimeSlot::Two => "2:00 PM - 2:30 PM",
            TimeSlot::Three => "3:00 PM - 3:30 PM",
            TimeSlot::Four => "4:00 PM - 4:30 PM",
        }
    }

    pub fn labels() -> Vec<&'static str> {
        Self::ALL.iter().map(|slot| slot.label()).collect()
    }
}

impl fmt::Display for TimeSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for TimeSlot {
    type Err = BookingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::ALL
            .iter()
            .copied()
            .find(|slot| slot.label() == wanted)
            .ok_or_else(|| BookingError::InvalidValue {
                field: "timeSlot".to_string(),
                value: s.to_string(),
            })
    }
}

impl Serialize for TimeSlot {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

impl<'de> Deserialize<'de> for TimeSlot {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let label = String::deserialize(deserializer)?;
        label.parse().map_err(serde::de::Error::custom)
    }
}

use chrono::{Duration, NaiveTime, Timelike};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

const FORMAT: &str = "%H:%M";

/// Errors produced when building or parsing a `TimeSlot`
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TimeSlotError {
    #[error("time must be formatted as HH:MM, got {0:?}")]
    Format(String),

    #[error("invalid time {input:?}: {source}")]
    Parse {
        input: String,
        #[source]
        source: chrono::ParseError,
    },

    #[error("time out of range: {hour:02}:{minute:02}")]
    OutOfRange { hour: u32, minute: u32 },
}

/// A departure time of day, 24-hour clock, minute precision.
///
/// Ordering is chronological, which matches the lexicographic order of the
/// zero-padded `HH:MM` rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TimeSlot(NaiveTime);

impl TimeSlot {
    pub fn new(hour: u32, minute: u32) -> Result<Self, TimeSlotError> {
        NaiveTime::from_hms_opt(hour, minute, 0)
            .map(Self)
            .ok_or(TimeSlotError::OutOfRange { hour, minute })
    }

    pub fn hour(&self) -> u32 {
        self.0.hour()
    }

    pub fn minute(&self) -> u32 {
        self.0.minute()
    }

    pub fn minutes_since_midnight(&self) -> u32 {
        self.0.num_seconds_from_midnight() / 60
    }

    /// Add minutes, wrapping past midnight
    pub fn add_minutes(&self, minutes: u32) -> Self {
        let (time, _wrapped_secs) = self
            .0
            .overflowing_add_signed(Duration::minutes(i64::from(minutes)));
        Self(time)
    }
}

impl fmt::Display for TimeSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(FORMAT))
    }
}

impl FromStr for TimeSlot {
    type Err = TimeSlotError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // chrono accepts single-digit hours; the wire format is zero-padded
        let is_padded = s.len() == 5
            && s.as_bytes()[2] == b':'
            && s.bytes().enumerate().all(|(i, b)| i == 2 || b.is_ascii_digit());
        if !is_padded {
            return Err(TimeSlotError::Format(s.to_string()));
        }

        NaiveTime::parse_from_str(s, FORMAT)
            .map(Self)
            .map_err(|source| TimeSlotError::Parse {
                input: s.to_string(),
                source,
            })
    }
}

impl TryFrom<String> for TimeSlot {
    type Error = TimeSlotError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<TimeSlot> for String {
    fn from(slot: TimeSlot) -> Self {
        slot.to_string()
    }
}

impl From<TimeSlot> for NaiveTime {
    fn from(slot: TimeSlot) -> Self {
        slot.0
    }
}

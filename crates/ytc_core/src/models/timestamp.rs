//! Wall-clock timestamps in HH:MM:SS form.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error returned when a timestamp string cannot be parsed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid timestamp '{input}': expected HH:MM:SS")]
pub struct TimestampError {
    /// The input that failed to parse.
    pub input: String,
}

impl TimestampError {
    fn new(input: &str) -> Self {
        Self {
            input: input.to_string(),
        }
    }
}

/// A clip boundary as an offset into the source video.
///
/// Parsing is strict: exactly three numeric fields separated by colons,
/// with minutes and seconds below 60. Whether `start < end` holds is
/// deliberately not checked here; a reversed range is passed through to
/// the encoder, which produces its own diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Timestamp {
    hours: u32,
    minutes: u32,
    seconds: u32,
}

impl Timestamp {
    /// Create a timestamp from components.
    ///
    /// Returns `None` if minutes or seconds are 60 or more.
    pub fn new(hours: u32, minutes: u32, seconds: u32) -> Option<Self> {
        if minutes >= 60 || seconds >= 60 {
            return None;
        }
        Some(Self {
            hours,
            minutes,
            seconds,
        })
    }

    /// Total offset in whole seconds.
    pub fn total_seconds(&self) -> u64 {
        u64::from(self.hours) * 3600 + u64::from(self.minutes) * 60 + u64::from(self.seconds)
    }
}

impl FromStr for Timestamp {
    type Err = TimestampError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.split(':');
        let (h, m, sec) = match (parts.next(), parts.next(), parts.next(), parts.next()) {
            (Some(h), Some(m), Some(sec), None) => (h, m, sec),
            _ => return Err(TimestampError::new(s)),
        };

        let parse_field = |field: &str| -> Result<u32, TimestampError> {
            if field.is_empty() || !field.chars().all(|c| c.is_ascii_digit()) {
                return Err(TimestampError::new(s));
            }
            field.parse().map_err(|_| TimestampError::new(s))
        };

        let (hours, minutes, seconds) = (parse_field(h)?, parse_field(m)?, parse_field(sec)?);
        Timestamp::new(hours, minutes, seconds).ok_or_else(|| TimestampError::new(s))
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:02}:{:02}:{:02}",
            self.hours, self.minutes, self.seconds
        )
    }
}

impl TryFrom<String> for Timestamp {
    type Error = TimestampError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Timestamp> for String {
    fn from(value: Timestamp) -> Self {
        value.to_string()
    }
}

//! Wall-clock timestamps as submitted by the reservation form.
//!
//! The browser `datetime-local` input yields `YYYY-MM-DDTHH:MM` without an
//! offset. Values with seconds, fractional seconds, or an RFC 3339 offset are
//! accepted too; an offset is not applied, the local wall-clock reading is kept.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDateTime, Timelike};
use serde::{Deserialize, Deserializer, Serialize, Serializer, de};

const MINUTE_FORMAT: &str = "%Y-%m-%dT%H:%M";
const SECOND_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";
const FRACTION_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";

/// A parking start or end instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ParkingTime(pub NaiveDateTime);

impl ParkingTime {
    pub fn naive(&self) -> NaiveDateTime {
        self.0
    }
}

impl From<NaiveDateTime> for ParkingTime {
    fn from(value: NaiveDateTime) -> Self {
        Self(value)
    }
}

/// Error for text that is not a recognised timestamp.
#[derive(Debug, thiserror::Error)]
#[error("invalid date-time '{0}'")]
pub struct ParseParkingTimeError(String);

impl FromStr for ParkingTime {
    type Err = ParseParkingTimeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();

        if let Ok(with_offset) = DateTime::parse_from_rfc3339(s) {
            return Ok(Self(with_offset.naive_local()));
        }

        NaiveDateTime::parse_from_str(s, FRACTION_FORMAT)
            .or_else(|_| NaiveDateTime::parse_from_str(s, MINUTE_FORMAT))
            .map(Self)
            .map_err(|_| ParseParkingTimeError(s.to_string()))
    }
}

impl fmt::Display for ParkingTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let format = if self.0.nanosecond() != 0 {
            FRACTION_FORMAT
        } else if self.0.second() != 0 {
            SECOND_FORMAT
        } else {
            MINUTE_FORMAT
        };
        write!(f, "{}", self.0.format(format))
    }
}

impl Serialize for ParkingTime {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ParkingTime {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(de::Error::custom)
    }
}

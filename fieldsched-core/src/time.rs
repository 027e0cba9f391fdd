//! Wall-clock time of day.

use std::fmt;
use std::str::FromStr;

use chrono::{NaiveTime, Timelike};
use serde::{Deserialize, Serialize};

use crate::error::{ScheduleError, ScheduleResult};

/// Hour and minute on the wall clock. Seconds are always zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "TimeFields", into = "TimeFields")]
pub struct TimeOfDay(NaiveTime);

#[derive(Serialize, Deserialize)]
struct TimeFields {
    hour: u32,
    minute: u32,
}

impl TryFrom<TimeFields> for TimeOfDay {
    type Error = ScheduleError;

    fn try_from(fields: TimeFields) -> Result<Self, Self::Error> {
        TimeOfDay::new(fields.hour, fields.minute).ok_or_else(|| {
            ScheduleError::InvalidTime(format!("{:02}:{:02}", fields.hour, fields.minute))
        })
    }
}

impl From<TimeOfDay> for TimeFields {
    fn from(time: TimeOfDay) -> Self {
        TimeFields {
            hour: time.hour(),
            minute: time.minute(),
        }
    }
}

impl TimeOfDay {
    pub const MIDNIGHT: TimeOfDay = TimeOfDay(NaiveTime::MIN);

    pub fn new(hour: u32, minute: u32) -> Option<Self> {
        NaiveTime::from_hms_opt(hour, minute, 0).map(TimeOfDay)
    }

    pub fn hour(self) -> u32 {
        self.0.hour()
    }

    pub fn minute(self) -> u32 {
        self.0.minute()
    }

    /// Parse an optional `HH:mm` field. Missing or blank input means midnight.
    pub fn parse_or_midnight(input: Option<&str>) -> ScheduleResult<Self> {
        match input.map(str::trim) {
            None | Some("") => Ok(Self::MIDNIGHT),
            Some(s) => s.parse(),
        }
    }

    pub fn to_naive(self) -> NaiveTime {
        self.0
    }
}

impl FromStr for TimeOfDay {
    type Err = ScheduleError;

    /// Accepts `H:mm`, `HH:mm` and `HH:mm:ss`; seconds are dropped.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ScheduleError::InvalidTime(format!("'{}' (expected HH:mm)", s));
        let digits = |part: &str, min: usize, max: usize| {
            (min..=max).contains(&part.len()) && part.bytes().all(|b| b.is_ascii_digit())
        };

        let parts: Vec<&str> = s.trim().split(':').collect();
        let (hour, minute) = match parts.as_slice() {
            [h, m] => (*h, *m),
            [h, m, sec] if digits(*sec, 2, 2) => (*h, *m),
            _ => return Err(invalid()),
        };

        if !digits(hour, 1, 2) || !digits(minute, 2, 2) {
            return Err(invalid());
        }

        let hour: u32 = hour.parse().map_err(|_| invalid())?;
        let minute: u32 = minute.parse().map_err(|_| invalid())?;

        TimeOfDay::new(hour, minute).ok_or_else(invalid)
    }
}

impl From<NaiveTime> for TimeOfDay {
    fn from(time: NaiveTime) -> Self {
        TimeOfDay(time.with_second(0).and_then(|t| t.with_nanosecond(0)).unwrap_or(time))
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour(), self.minute())
    }
}

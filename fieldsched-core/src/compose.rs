//! Combining calendar dates with wall-clock times.
//!
//! One [`TimeConvention`] is picked per run and applied to every occurrence,
//! so a series never mixes UTC and local interpretations.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Duration, Local, NaiveDateTime, Offset, SecondsFormat, TimeZone, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::date::CalendarDate;
use crate::error::{ScheduleError, ScheduleResult};
use crate::time::TimeOfDay;

/// How a wall-clock `HH:mm` is turned into an instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum TimeConvention {
    /// The wall clock already is UTC.
    #[default]
    Utc,
    /// The wall clock is the machine's local timezone.
    LocalClock,
    /// The wall clock is a named IANA zone.
    Zone(Tz),
}

impl FromStr for TimeConvention {
    type Err = ScheduleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        match s.to_ascii_lowercase().as_str() {
            "utc" => Ok(TimeConvention::Utc),
            "local" => Ok(TimeConvention::LocalClock),
            _ => s
                .parse::<Tz>()
                .map(TimeConvention::Zone)
                .map_err(|_| ScheduleError::UnknownConvention(s.to_string())),
        }
    }
}

impl TryFrom<String> for TimeConvention {
    type Error = ScheduleError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<TimeConvention> for String {
    fn from(value: TimeConvention) -> Self {
        value.to_string()
    }
}

impl fmt::Display for TimeConvention {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimeConvention::Utc => write!(f, "utc"),
            TimeConvention::LocalClock => write!(f, "local"),
            TimeConvention::Zone(tz) => write!(f, "{}", tz.name()),
        }
    }
}

/// Compose a date and a time of day into an instant.
///
/// Wall times inside a DST gap are read with the offset in force just before
/// the gap, which moves them forward by the gap's length (02:30 in a one-hour
/// New York gap becomes 03:30, 02:15 in Lord Howe's half-hour gap becomes
/// 02:45). Ambiguous wall times (the repeated hour when clocks go back) take
/// the earlier instant.
pub fn compose_instant(
    date: CalendarDate,
    time: TimeOfDay,
    convention: TimeConvention,
) -> ScheduleResult<DateTime<Utc>> {
    let naive = date.to_naive().and_time(time.to_naive());

    match convention {
        TimeConvention::Utc => Ok(naive.and_utc()),
        TimeConvention::LocalClock => resolve_wall_clock(&Local, naive, convention),
        TimeConvention::Zone(tz) => resolve_wall_clock(&tz, naive, convention),
    }
}

fn resolve_wall_clock<Z: TimeZone>(
    zone: &Z,
    naive: NaiveDateTime,
    convention: TimeConvention,
) -> ScheduleResult<DateTime<Utc>> {
    if let Some(dt) = zone.from_local_datetime(&naive).earliest() {
        return Ok(dt.with_timezone(&Utc));
    }

    // Inside a gap: find the last wall time before it and borrow its offset.
    let offset = (1..=GAP_SEARCH_STEPS)
        .find_map(|step| {
            zone.from_local_datetime(&(naive - Duration::minutes(15 * step)))
                .latest()
        })
        .map(|before| before.offset().fix())
        .ok_or_else(|| {
            ScheduleError::InvalidTime(format!("{} does not exist in {}", naive, convention))
        })?;

    Ok((naive - Duration::seconds(i64::from(offset.local_minus_utc()))).and_utc())
}

/// Quarter-hour steps searched backwards for the start of a gap (one day).
const GAP_SEARCH_STEPS: i64 = 96;

/// Split an instant back into the date and time of day it shows under `convention`.
pub fn decompose_instant(
    instant: DateTime<Utc>,
    convention: TimeConvention,
) -> (CalendarDate, TimeOfDay) {
    let naive = match convention {
        TimeConvention::Utc => instant.naive_utc(),
        TimeConvention::LocalClock => instant.with_timezone(&Local).naive_local(),
        TimeConvention::Zone(tz) => instant.with_timezone(&tz).naive_local(),
    };

    (naive.date().into(), naive.time().into())
}

/// Format an instant the way the appointment API expects: `2025-03-14T09:30:00.000Z`.
pub fn to_iso_string(instant: DateTime<Utc>) -> String {
    instant.to_rfc3339_opts(SecondsFormat::Millis, true)
}

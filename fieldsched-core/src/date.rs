//! Timezone-free calendar dates.
//!
//! Appointment forms hand us dates in whatever shape the browser or the
//! operator produced: `2025-03-14`, `14/03/2025`, `03/14/2025`, or a full
//! timestamp. Everything is normalized into a [`CalendarDate`] before any
//! recurrence arithmetic happens.

use std::fmt;

use chrono::{DateTime, Datelike, Days, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::error::{ScheduleError, ScheduleResult};

/// A calendar day with no timezone attached.
///
/// Always a real day: every constructor, deserialization included, goes
/// through [`NaiveDate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "DateFields", into = "DateFields")]
pub struct CalendarDate(NaiveDate);

/// Serialized shape of a [`CalendarDate`].
#[derive(Serialize, Deserialize)]
struct DateFields {
    year: i32,
    month: u32,
    day: u32,
}

impl TryFrom<DateFields> for CalendarDate {
    type Error = ScheduleError;

    fn try_from(fields: DateFields) -> Result<Self, Self::Error> {
        CalendarDate::new(fields.year, fields.month, fields.day).ok_or_else(|| {
            ScheduleError::InvalidDate(format!(
                "{:04}-{:02}-{:02}",
                fields.year, fields.month, fields.day
            ))
        })
    }
}

impl From<CalendarDate> for DateFields {
    fn from(date: CalendarDate) -> Self {
        DateFields {
            year: date.year(),
            month: date.month(),
            day: date.day(),
        }
    }
}

/// How month arithmetic treats a day-of-month the target month doesn't have.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MonthOverflow {
    /// Spill the extra days into the following month (Jan 31 + 1 month = Mar 3).
    #[default]
    Roll,
    /// Snap to the last day of the target month (Jan 31 + 1 month = Feb 28).
    Clamp,
}

impl std::str::FromStr for MonthOverflow {
    type Err = ScheduleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "roll" => Ok(MonthOverflow::Roll),
            "clamp" => Ok(MonthOverflow::Clamp),
            other => Err(ScheduleError::Config(format!(
                "Unknown month overflow '{}' (expected roll or clamp)",
                other
            ))),
        }
    }
}

impl CalendarDate {
    /// Build a date, returning `None` if the triple isn't a real calendar day.
    pub fn new(year: i32, month: u32, day: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, day).map(Self::from)
    }

    pub fn year(self) -> i32 {
        self.0.year()
    }

    pub fn month(self) -> u32 {
        self.0.month()
    }

    pub fn day(self) -> u32 {
        self.0.day()
    }

    pub fn to_naive(self) -> NaiveDate {
        self.0
    }

    pub fn add_days(self, days: u64) -> Option<Self> {
        self.to_naive().checked_add_days(Days::new(days)).map(Self::from)
    }

    pub fn add_months(self, months: u32, overflow: MonthOverflow) -> Option<Self> {
        let total = i64::from(self.year()) * 12 + i64::from(self.month()) - 1 + i64::from(months);
        let year = i32::try_from(total.div_euclid(12)).ok()?;
        let month = total.rem_euclid(12) as u32 + 1;
        let first = NaiveDate::from_ymd_opt(year, month, 1)?;

        let date = match overflow {
            MonthOverflow::Roll => first.checked_add_days(Days::new(u64::from(self.day() - 1)))?,
            MonthOverflow::Clamp => first.with_day(self.day().min(days_in_month(first)?))?,
        };

        Some(date.into())
    }
}

fn days_in_month(first: NaiveDate) -> Option<u32> {
    let next = first.checked_add_months(chrono::Months::new(1))?;
    Some(next.pred_opt()?.day())
}

impl From<NaiveDate> for CalendarDate {
    fn from(date: NaiveDate) -> Self {
        CalendarDate(date)
    }
}

impl From<CalendarDate> for NaiveDate {
    fn from(date: CalendarDate) -> Self {
        date.0
    }
}

impl fmt::Display for CalendarDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d"))
    }
}

/// Parse a date-only string.
///
/// Two shapes are recognized:
/// - `YYYY-MM-DD`
/// - `XX/YY/ZZZZ`: day-first when the first group is above 12, month-first otherwise
///
/// `03/04/2025` is therefore always March 4th. Returns `None` for anything
/// else, including well-shaped strings that name an impossible day.
pub fn parse_calendar_date(input: &str) -> Option<CalendarDate> {
    let input = input.trim();

    if let Some(date) = parse_iso(input) {
        return Some(date);
    }

    let groups: Vec<&str> = input.split('/').collect();
    let [first, second, year] = groups.as_slice() else {
        return None;
    };
    if !is_digits(first, 1..=2) || !is_digits(second, 1..=2) || !is_digits(year, 4..=4) {
        return None;
    }

    let first: u32 = first.parse().ok()?;
    let second: u32 = second.parse().ok()?;
    let year: i32 = year.parse().ok()?;

    let (month, day) = if first > 12 {
        (second, first)
    } else {
        (first, second)
    };

    CalendarDate::new(year, month, day)
}

fn parse_iso(input: &str) -> Option<CalendarDate> {
    let groups: Vec<&str> = input.split('-').collect();
    let [year, month, day] = groups.as_slice() else {
        return None;
    };
    if !is_digits(year, 4..=4) || !is_digits(month, 2..=2) || !is_digits(day, 2..=2) {
        return None;
    }

    CalendarDate::new(year.parse().ok()?, month.parse().ok()?, day.parse().ok()?)
}

fn is_digits(s: &str, len: std::ops::RangeInclusive<usize>) -> bool {
    len.contains(&s.len()) && s.bytes().all(|b| b.is_ascii_digit())
}

/// Resolve a date string, falling back to timestamp formats when the
/// date-only shapes don't match.
///
/// The fallback accepts RFC 3339 (`2025-03-14T09:00:00+02:00`, date taken in
/// the stated offset) and bare `YYYY-MM-DDTHH:MM[:SS]`.
pub fn resolve_calendar_date(input: &str) -> ScheduleResult<CalendarDate> {
    if let Some(date) = parse_calendar_date(input) {
        return Ok(date);
    }

    let trimmed = input.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(dt.date_naive().into());
    }

    for format in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Ok(dt.date().into());
        }
    }

    Err(ScheduleError::InvalidDate(format!(
        "'{}' (expected YYYY-MM-DD, DD/MM/YYYY or MM/DD/YYYY)",
        input
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(year: i32, month: u32, day: u32) -> CalendarDate {
        CalendarDate::new(year, month, day).unwrap()
    }

    // --- parse_calendar_date ---

    #[test]
    fn parses_iso() {
        assert_eq!(parse_calendar_date("2025-03-14"), Some(date(2025, 3, 14)));
        assert_eq!(parse_calendar_date("  2025-03-14 "), Some(date(2025, 3, 14)));
    }

    #[test]
    fn slash_day_first_when_first_group_above_twelve() {
        assert_eq!(parse_calendar_date("14/03/2025"), Some(date(2025, 3, 14)));
        assert_eq!(parse_calendar_date("31/1/2025"), Some(date(2025, 1, 31)));
    }

    #[test]
    fn slash_month_first_otherwise() {
        assert_eq!(parse_calendar_date("03/14/2025"), Some(date(2025, 3, 14)));
        // Ambiguous: read month-first.
        assert_eq!(parse_calendar_date("03/04/2025"), Some(date(2025, 3, 4)));
        assert_eq!(parse_calendar_date("3/4/2025"), Some(date(2025, 3, 4)));
    }

    #[test]
    fn rejects_unknown_shapes() {
        assert_eq!(parse_calendar_date("not-a-date"), None);
        assert_eq!(parse_calendar_date(""), None);
        assert_eq!(parse_calendar_date("2025/03/14"), None);
        assert_eq!(parse_calendar_date("25-03-14"), None);
        assert_eq!(parse_calendar_date("2025-3-14"), None);
        assert_eq!(parse_calendar_date("14/03/25"), None);
    }

    #[test]
    fn rejects_impossible_days() {
        assert_eq!(parse_calendar_date("2025-02-30"), None);
        assert_eq!(parse_calendar_date("31/31/2025"), None);
        assert_eq!(parse_calendar_date("13/13/2025"), None);
    }

    // --- resolve_calendar_date ---

    #[test]
    fn resolve_falls_back_to_timestamps() {
        assert_eq!(
            resolve_calendar_date("2025-03-14T23:30:00-05:00").unwrap(),
            date(2025, 3, 14)
        );
        assert_eq!(
            resolve_calendar_date("2025-03-14T08:00").unwrap(),
            date(2025, 3, 14)
        );
    }

    #[test]
    fn resolve_reports_invalid_date() {
        let err = resolve_calendar_date("next tuesday").unwrap_err();
        assert!(matches!(err, ScheduleError::InvalidDate(_)));
    }

    // --- arithmetic ---

    #[test]
    fn add_days_crosses_year() {
        assert_eq!(date(2025, 12, 29).add_days(7), Some(date(2026, 1, 5)));
    }

    #[test]
    fn add_months_roll_spills_into_next_month() {
        assert_eq!(
            date(2025, 1, 31).add_months(1, MonthOverflow::Roll),
            Some(date(2025, 3, 3))
        );
        assert_eq!(
            date(2024, 1, 31).add_months(1, MonthOverflow::Roll),
            Some(date(2024, 3, 2))
        );
        assert_eq!(
            date(2025, 3, 31).add_months(1, MonthOverflow::Roll),
            Some(date(2025, 5, 1))
        );
    }

    #[test]
    fn add_months_clamp_snaps_to_month_end() {
        assert_eq!(
            date(2025, 1, 31).add_months(1, MonthOverflow::Clamp),
            Some(date(2025, 2, 28))
        );
        assert_eq!(
            date(2025, 3, 31).add_months(1, MonthOverflow::Clamp),
            Some(date(2025, 4, 30))
        );
    }

    #[test]
    fn add_months_crosses_year() {
        assert_eq!(
            date(2025, 11, 15).add_months(2, MonthOverflow::Roll),
            Some(date(2026, 1, 15))
        );
    }

    #[test]
    fn display_is_iso() {
        assert_eq!(date(2025, 3, 4).to_string(), "2025-03-04");
    }

    // --- serde ---

    #[test]
    fn deserializes_real_days_only() {
        let parsed: CalendarDate =
            serde_json::from_value(serde_json::json!({"year": 2024, "month": 2, "day": 29})).unwrap();
        assert_eq!(parsed, date(2024, 2, 29));

        for fields in [
            serde_json::json!({"year": 2025, "month": 2, "day": 30}),
            serde_json::json!({"year": 2025, "month": 1, "day": 0}),
            serde_json::json!({"year": 2025, "month": 13, "day": 1}),
        ] {
            let err = serde_json::from_value::<CalendarDate>(fields.clone()).unwrap_err();
            assert!(err.to_string().contains("Invalid date"), "accepted {}", fields);
        }
    }

    #[test]
    fn serializes_as_fields() {
        assert_eq!(
            serde_json::to_value(date(2025, 3, 14)).unwrap(),
            serde_json::json!({"year": 2025, "month": 3, "day": 14})
        );
    }

    #[test]
    fn month_overflow_from_str() {
        assert_eq!("Clamp".parse::<MonthOverflow>().unwrap(), MonthOverflow::Clamp);
        assert!("wrap".parse::<MonthOverflow>().is_err());
    }
}

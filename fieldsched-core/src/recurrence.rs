//! Recurring appointment expansion.
//!
//! A [`RecurrenceRule`] expands into an ordered list of [`Occurrence`]s, each
//! of which becomes one independent create request. The anchor date is always
//! the first occurrence. Expansion is capped so malformed input (an until
//! date before the anchor, an until date decades out) still terminates.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::compose::{TimeConvention, compose_instant};
use crate::date::{CalendarDate, MonthOverflow, resolve_calendar_date};
use crate::error::{ScheduleError, ScheduleResult};
use crate::time::TimeOfDay;

/// Upper bound on the occurrences a single rule can produce.
pub const MAX_OCCURRENCES: usize = 200;

/// Occurrences produced by [`Termination::Forever`].
pub const FOREVER_OCCURRENCES: usize = 52;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Frequency {
    #[default]
    Weekly,
    BiWeekly,
    Monthly,
    Bimonthly,
}

impl Frequency {
    fn step(self) -> Step {
        match self {
            Frequency::Weekly => Step::Days(7),
            Frequency::BiWeekly => Step::Days(14),
            Frequency::Monthly => Step::Months(1),
            Frequency::Bimonthly => Step::Months(2),
        }
    }
}

impl FromStr for Frequency {
    type Err = ScheduleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace(['-', '_'], "").as_str() {
            "weekly" => Ok(Frequency::Weekly),
            "biweekly" | "fortnightly" => Ok(Frequency::BiWeekly),
            "monthly" => Ok(Frequency::Monthly),
            "bimonthly" => Ok(Frequency::Bimonthly),
            _ => Err(ScheduleError::InvalidRule(format!(
                "unknown frequency '{}' (expected weekly, biweekly, monthly or bimonthly)",
                s
            ))),
        }
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Frequency::Weekly => "weekly",
            Frequency::BiWeekly => "biweekly",
            Frequency::Monthly => "monthly",
            Frequency::Bimonthly => "bimonthly",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy)]
enum Step {
    Days(u64),
    Months(u32),
}

impl Step {
    fn advance(self, date: CalendarDate, overflow: MonthOverflow) -> Option<CalendarDate> {
        match self {
            Step::Days(days) => date.add_days(days),
            Step::Months(months) => date.add_months(months, overflow),
        }
    }
}

/// When expansion stops.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Termination {
    /// Expand up to and including this date.
    Until(CalendarDate),
    /// Emit this many occurrences, anchor included.
    Count(u32),
    /// 52 weekly occurrences, whatever the rule's frequency says.
    Forever,
}

/// A fully parsed recurrence, built once at submission time and never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecurrenceRule {
    pub frequency: Frequency,
    pub anchor_date: CalendarDate,
    pub time_of_day_start: TimeOfDay,
    pub time_of_day_end: TimeOfDay,
    pub termination: Termination,
    #[serde(default)]
    pub month_overflow: MonthOverflow,
}

/// Raw recurrence fields as they arrive from a form or the command line.
#[derive(Debug, Clone, Default)]
pub struct RuleInput {
    pub date: String,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub frequency: Frequency,
    pub until: Option<String>,
    pub count: Option<u32>,
    pub forever: bool,
    pub month_overflow: MonthOverflow,
}

impl TryFrom<RuleInput> for RecurrenceRule {
    type Error = ScheduleError;

    fn try_from(input: RuleInput) -> Result<Self, Self::Error> {
        let anchor_date = resolve_calendar_date(&input.date)?;
        let time_of_day_start = TimeOfDay::parse_or_midnight(input.start_time.as_deref())?;
        let time_of_day_end = TimeOfDay::parse_or_midnight(input.end_time.as_deref())?;

        let termination = if input.forever {
            Termination::Forever
        } else if let Some(until) = input.until.as_deref() {
            Termination::Until(resolve_calendar_date(until)?)
        } else if let Some(count) = input.count {
            Termination::Count(count)
        } else {
            Termination::Count(MAX_OCCURRENCES as u32)
        };

        Ok(RecurrenceRule {
            frequency: input.frequency,
            anchor_date,
            time_of_day_start,
            time_of_day_end,
            termination,
            month_overflow: input.month_overflow,
        })
    }
}

/// One concrete appointment slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Occurrence {
    pub date: CalendarDate,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

/// Expand a rule into its calendar dates, ascending and without duplicates.
pub fn expand_dates(rule: &RecurrenceRule) -> Vec<CalendarDate> {
    let (step, limit, until) = match rule.termination {
        Termination::Forever => (Step::Days(7), FOREVER_OCCURRENCES, None),
        Termination::Count(n) => (
            rule.frequency.step(),
            (n as usize).clamp(1, MAX_OCCURRENCES),
            None,
        ),
        Termination::Until(date) => (rule.frequency.step(), MAX_OCCURRENCES, Some(date)),
    };

    let mut dates = vec![rule.anchor_date];
    let mut current = rule.anchor_date;

    while dates.len() < limit {
        let Some(next) = step.advance(current, rule.month_overflow) else {
            break;
        };
        if next <= current || until.is_some_and(|until| next > until) {
            break;
        }
        dates.push(next);
        current = next;
    }

    dates
}

/// Expand a rule into start/end instants under one time convention.
///
/// The generator doesn't check that end comes after start; see
/// [`crate::appointment::validate_time_window`].
pub fn generate_occurrences(
    rule: &RecurrenceRule,
    convention: TimeConvention,
) -> ScheduleResult<Vec<Occurrence>> {
    expand_dates(rule)
        .into_iter()
        .map(|date| {
            Ok(Occurrence {
                date,
                start: compose_instant(date, rule.time_of_day_start, convention)?,
                end: compose_instant(date, rule.time_of_day_end, convention)?,
            })
        })
        .collect()
}

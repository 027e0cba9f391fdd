//! Core types for fieldsched.
//!
//! This crate expands a recurring appointment into concrete occurrences and
//! carries them to the appointment API:
//! - `date` and `time` parse the loose form inputs into calendar values
//! - `compose` turns a date + time-of-day into an instant under one convention
//! - `recurrence` is the occurrence generator
//! - `appointment` and `submit` build and send one create request per occurrence

pub mod appointment;
pub mod compose;
pub mod config;
pub mod date;
pub mod error;
pub mod recurrence;
pub mod submit;
pub mod time;

pub use appointment::{AppointmentPayload, AppointmentTemplate};
pub use compose::TimeConvention;
pub use date::{CalendarDate, MonthOverflow};
pub use error::{ScheduleError, ScheduleResult};
pub use recurrence::{Frequency, Occurrence, RecurrenceRule, RuleInput, Termination};
pub use time::TimeOfDay;

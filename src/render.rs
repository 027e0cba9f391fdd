//! Terminal rendering for fieldsched types.
//!
//! Extension traits that add colored output to fieldsched-core types using owo_colors.

use fieldsched_core::TimeConvention;
use fieldsched_core::compose::decompose_instant;
use fieldsched_core::recurrence::Occurrence;
use fieldsched_core::submit::{SubmissionOutcome, SubmissionReport};
use owo_colors::OwoColorize;

/// Extension trait for TUI rendering with colors.
pub trait Render {
    fn render(&self) -> String;
}

/// An occurrence as seen on the wall clock of `convention`.
pub fn render_occurrence(number: usize, occurrence: &Occurrence, convention: TimeConvention) -> String {
    let (start_date, start_time) = decompose_instant(occurrence.start, convention);
    let (end_date, end_time) = decompose_instant(occurrence.end, convention);

    let window = if start_date == end_date {
        format!("{} - {}", start_time, end_time)
    } else {
        format!("{} - {} {}", start_time, end_date, end_time)
    };

    format!(
        "{:>4}  {} {}  {}",
        number.dimmed(),
        start_date,
        start_date.to_naive().format("%a").dimmed(),
        window
    )
}

impl Render for SubmissionOutcome {
    fn render(&self) -> String {
        match &self.result {
            Ok(id) => format!("{} {} {}", "+".green(), self.start, id.dimmed()),
            Err(e) => format!("{} {} {}", "!".red(), self.start, e.to_string().red()),
        }
    }
}

impl Render for SubmissionReport {
    fn render(&self) -> String {
        let summary = self.summary();
        let mut lines = vec![if self.failed() == 0 {
            summary.green().to_string()
        } else if self.created() == 0 {
            summary.red().to_string()
        } else {
            summary.yellow().to_string()
        }];

        for (outcome, _) in self.failures() {
            lines.push(format!("   {}", outcome.render()));
        }

        lines.join("\n")
    }
}

/// Simple pluralization helper
pub fn pluralize(word: &str, count: usize) -> String {
    if count == 1 {
        word.to_string()
    } else {
        format!("{}s", word)
    }
}

pub mod config;
pub mod create;
pub mod preview;

use anyhow::{Context, Result};
use clap::Args;
use fieldsched_core::config::SchedConfig;
use fieldsched_core::{
    AppointmentTemplate, Frequency, MonthOverflow, RecurrenceRule, RuleInput, TimeConvention,
};

/// Recurrence flags shared by `preview` and `create`.
#[derive(Args, Debug, Clone)]
pub struct RuleArgs {
    /// First date of the series (YYYY-MM-DD, DD/MM/YYYY or MM/DD/YYYY)
    #[arg(short, long)]
    pub date: String,

    /// Start time (HH:mm, defaults to 00:00)
    #[arg(short, long)]
    pub start: Option<String>,

    /// End time (HH:mm, defaults to 00:00)
    #[arg(short, long)]
    pub end: Option<String>,

    /// weekly, biweekly, monthly or bimonthly
    #[arg(short, long, default_value = "weekly")]
    pub frequency: Frequency,

    /// Last date to include
    #[arg(short, long, conflicts_with_all = ["count", "forever"])]
    pub until: Option<String>,

    /// Number of occurrences, first date included
    #[arg(short = 'n', long, conflicts_with = "forever")]
    pub count: Option<u32>,

    /// 52 weekly occurrences (ignores --frequency)
    #[arg(long)]
    pub forever: bool,

    /// utc, local, or an IANA zone (defaults to `time_convention` from config)
    #[arg(long)]
    pub convention: Option<TimeConvention>,

    /// roll or clamp (defaults to `month_overflow` from config)
    #[arg(long)]
    pub month_overflow: Option<MonthOverflow>,
}

impl RuleArgs {
    pub fn rule(&self, config: &SchedConfig) -> Result<RecurrenceRule> {
        let input = RuleInput {
            date: self.date.clone(),
            start_time: self.start.clone(),
            end_time: self.end.clone(),
            frequency: self.frequency,
            until: self.until.clone(),
            count: self.count,
            forever: self.forever,
            month_overflow: self.month_overflow.unwrap_or(config.month_overflow),
        };

        RecurrenceRule::try_from(input).context("Could not build recurrence")
    }

    pub fn convention(&self, config: &SchedConfig) -> TimeConvention {
        self.convention.unwrap_or(config.time_convention)
    }
}

/// Appointment fields copied into every occurrence.
#[derive(Args, Debug, Clone)]
pub struct AppointmentArgs {
    #[arg(long)]
    pub address: Option<String>,

    /// Company id (defaults to `company_id` from config)
    #[arg(long)]
    pub company: Option<String>,

    #[arg(long)]
    pub customer: Option<String>,

    #[arg(long)]
    pub team: Option<String>,

    #[arg(long)]
    pub professional: Option<String>,

    #[arg(long, default_value = "Scheduled")]
    pub status: String,

    /// Appointment type
    #[arg(long = "type")]
    pub appointment_type: Option<String>,

    #[arg(long)]
    pub notes: Option<String>,
}

impl AppointmentArgs {
    pub fn template(self, title: String, config: &SchedConfig) -> AppointmentTemplate {
        AppointmentTemplate {
            title,
            address: self.address,
            company_id: self.company.or_else(|| config.company_id.clone()),
            customer_id: self.customer,
            team_id: self.team,
            professional_id: self.professional,
            status: self.status,
            appointment_type: self.appointment_type,
            notes: self.notes,
        }
    }
}

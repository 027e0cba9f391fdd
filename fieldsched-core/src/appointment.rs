//! Appointment create-request bodies.
//!
//! Every occurrence of a series is sent as its own create request: the
//! template fields are copied unchanged and only `start`/`end` differ.

use serde::{Deserialize, Serialize};

use crate::compose::to_iso_string;
use crate::error::{ScheduleError, ScheduleResult};
use crate::recurrence::Occurrence;

fn default_status() -> String {
    "Scheduled".to_string()
}

/// The non-recurring fields shared by every occurrence of a series.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppointmentTemplate {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub team_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub professional_id: Option<String>,
    #[serde(default = "default_status")]
    pub status: String,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub appointment_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl AppointmentTemplate {
    pub fn new(title: impl Into<String>) -> Self {
        AppointmentTemplate {
            title: title.into(),
            address: None,
            company_id: None,
            customer_id: None,
            team_id: None,
            professional_id: None,
            status: default_status(),
            appointment_type: None,
            notes: None,
        }
    }

    pub fn payload_for(&self, occurrence: &Occurrence) -> AppointmentPayload {
        AppointmentPayload {
            template: self.clone(),
            start: to_iso_string(occurrence.start),
            end: to_iso_string(occurrence.end),
        }
    }

    /// One payload per occurrence, in occurrence order.
    pub fn payloads(&self, occurrences: &[Occurrence]) -> Vec<AppointmentPayload> {
        occurrences.iter().map(|o| self.payload_for(o)).collect()
    }
}

/// JSON body of a single create-appointment request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppointmentPayload {
    #[serde(flatten)]
    pub template: AppointmentTemplate,
    pub start: String,
    pub end: String,
}

/// Check that the series' first occurrence ends after it starts.
///
/// Only the first occurrence is checked: every occurrence shares the same
/// time-of-day window, so the rest would agree unless a DST shift lands
/// between them.
pub fn validate_time_window(occurrences: &[Occurrence]) -> ScheduleResult<()> {
    let Some(first) = occurrences.first() else {
        return Ok(());
    };

    if first.end <= first.start {
        return Err(ScheduleError::InvalidTimeWindow {
            start: to_iso_string(first.start),
            end: to_iso_string(first.end),
        });
    }

    Ok(())
}

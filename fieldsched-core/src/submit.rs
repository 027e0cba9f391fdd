//! Sending a series to the appointment API.
//!
//! There is no batch endpoint, so each occurrence is its own request. A
//! failed request is logged and counted; it never stops the rest of the
//! series and nothing already created is rolled back.

use std::future::Future;

use futures::stream::{self, Stream, StreamExt};

use crate::appointment::AppointmentPayload;
use crate::error::{ScheduleError, ScheduleResult};

/// Something that can create one appointment and hand back its id.
pub trait AppointmentSink {
    fn create(
        &self,
        payload: &AppointmentPayload,
    ) -> impl Future<Output = ScheduleResult<String>> + Send;
}

/// Result of one create request.
#[derive(Debug)]
pub struct SubmissionOutcome {
    /// Position of the occurrence in the series (0-based).
    pub index: usize,
    pub start: String,
    pub result: ScheduleResult<String>,
}

/// Submit payloads with at most `concurrency` requests in flight.
///
/// Outcomes are yielded in series order regardless of completion order.
/// `concurrency` of 1 (or 0) sends strictly one after another.
pub fn submit_series<'a, S: AppointmentSink + Sync>(
    sink: &'a S,
    payloads: &'a [AppointmentPayload],
    concurrency: usize,
) -> impl Stream<Item = SubmissionOutcome> + 'a {
    stream::iter(payloads.iter().enumerate())
        .map(move |(index, payload)| async move {
            let result = sink.create(payload).await;
            match &result {
                Ok(id) => log::debug!("created occurrence {} at {} as {}", index + 1, payload.start, id),
                Err(e) => log::warn!("occurrence {} at {} failed: {}", index + 1, payload.start, e),
            }
            SubmissionOutcome {
                index,
                start: payload.start.clone(),
                result,
            }
        })
        .buffered(concurrency.max(1))
}

/// Aggregate of a submitted series.
#[derive(Debug, Default)]
pub struct SubmissionReport {
    outcomes: Vec<SubmissionOutcome>,
}

impl SubmissionReport {
    pub async fn collect(outcomes: impl Stream<Item = SubmissionOutcome>) -> Self {
        SubmissionReport {
            outcomes: outcomes.collect().await,
        }
    }

    pub fn push(&mut self, outcome: SubmissionOutcome) {
        self.outcomes.push(outcome);
    }

    pub fn outcomes(&self) -> &[SubmissionOutcome] {
        &self.outcomes
    }

    pub fn total(&self) -> usize {
        self.outcomes.len()
    }

    pub fn created(&self) -> usize {
        self.outcomes.iter().filter(|o| o.result.is_ok()).count()
    }

    pub fn failed(&self) -> usize {
        self.total() - self.created()
    }

    pub fn failures(&self) -> impl Iterator<Item = (&SubmissionOutcome, &ScheduleError)> {
        self.outcomes
            .iter()
            .filter_map(|o| o.result.as_ref().err().map(|e| (o, e)))
    }

    pub fn summary(&self) -> String {
        format!(
            "Created {} of {} recurring appointments",
            self.created(),
            self.total()
        )
    }
}

use anyhow::{Context, Result};
use fieldsched_core::appointment::validate_time_window;
use fieldsched_core::config::SchedConfig;
use fieldsched_core::recurrence::generate_occurrences;
use fieldsched_core::submit::{SubmissionReport, submit_series};
use futures::StreamExt;
use owo_colors::OwoColorize;

use super::{AppointmentArgs, RuleArgs};
use crate::api::ApiClient;
use crate::render::{self, Render};
use crate::utils::tui;

pub async fn run(
    title: String,
    rule_args: &RuleArgs,
    appointment: AppointmentArgs,
    concurrency: Option<usize>,
    dry_run: bool,
    config: &SchedConfig,
) -> Result<()> {
    let rule = rule_args.rule(config)?;
    let convention = rule_args.convention(config);
    let occurrences = generate_occurrences(&rule, convention)?;
    validate_time_window(&occurrences)?;

    let company = appointment.company.clone();
    let template = appointment.template(title, config);
    let payloads = template.payloads(&occurrences);

    if dry_run {
        for payload in &payloads {
            println!(
                "{}",
                serde_json::to_string(payload).context("Failed to serialize payload")?
            );
        }
        return Ok(());
    }

    let client = ApiClient::from_config(config, company.as_deref())?;
    log::info!(
        "creating {} occurrences of '{}' at {}",
        payloads.len(),
        template.title,
        client.endpoint()
    );

    let progress = tui::create_progress(
        payloads.len() as u64,
        format!(
            "Creating {} {}",
            payloads.len(),
            render::pluralize("appointment", payloads.len())
        ),
    );

    let mut outcomes = std::pin::pin!(submit_series(
        &client,
        &payloads,
        concurrency.unwrap_or(config.concurrency),
    ));
    let mut report = SubmissionReport::default();
    while let Some(outcome) = outcomes.next().await {
        progress.inc(1);
        report.push(outcome);
    }
    progress.finish_and_clear();

    println!("{}", report.render());

    if report.total() > 0 && report.created() == 0 {
        anyhow::bail!("No appointments were created");
    }

    if report.failed() > 0 {
        println!(
            "{}",
            "Failed occurrences were not retried; created ones were kept.".dimmed()
        );
    }

    Ok(())
}

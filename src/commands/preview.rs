use anyhow::Result;
use fieldsched_core::config::SchedConfig;
use fieldsched_core::recurrence::generate_occurrences;
use owo_colors::OwoColorize;

use super::RuleArgs;
use crate::render::{pluralize, render_occurrence};

pub fn run(args: &RuleArgs, config: &SchedConfig) -> Result<()> {
    let rule = args.rule(config)?;
    let convention = args.convention(config);
    let occurrences = generate_occurrences(&rule, convention)?;

    println!(
        "{}",
        format!("Recurrence ({}, times in {})", rule.frequency, convention).bold()
    );
    for (i, occurrence) in occurrences.iter().enumerate() {
        println!("{}", render_occurrence(i + 1, occurrence, convention));
    }

    println!(
        "\n{} {}",
        occurrences.len(),
        pluralize("occurrence", occurrences.len())
    );

    Ok(())
}

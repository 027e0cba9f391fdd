mod api;
mod commands;
mod render;
mod utils;

use anyhow::Result;
use clap::{Parser, Subcommand};
use fieldsched_core::config::SchedConfig;

use commands::{AppointmentArgs, RuleArgs};

#[derive(Parser)]
#[command(name = "fieldsched")]
#[command(about = "Expand recurring appointments and create them through the appointment API")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the occurrences a recurrence expands to, without creating anything
    Preview {
        #[command(flatten)]
        rule: RuleArgs,
    },
    /// Create one appointment per occurrence
    Create {
        /// Appointment title
        title: String,

        #[command(flatten)]
        rule: RuleArgs,

        #[command(flatten)]
        appointment: AppointmentArgs,

        /// Requests in flight at once (defaults to `concurrency` from config)
        #[arg(long)]
        concurrency: Option<usize>,

        /// Print the request bodies instead of sending them
        #[arg(long)]
        dry_run: bool,
    },
    /// Show configuration paths and effective values
    Config {
        #[command(subcommand)]
        action: Option<ConfigAction>,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Write a commented default config file (if none exists)
    Init,
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Preview { rule } => {
            let config = load_config()?;
            commands::preview::run(&rule, &config)
        }
        Commands::Create {
            title,
            rule,
            appointment,
            concurrency,
            dry_run,
        } => {
            let config = load_config()?;
            commands::create::run(title, &rule, appointment, concurrency, dry_run, &config).await
        }
        Commands::Config { action } => match action {
            Some(ConfigAction::Init) => commands::config::init(),
            None => commands::config::run(),
        },
    }
}

fn load_config() -> Result<SchedConfig> {
    let config = SchedConfig::load()?;
    log::debug!("loaded config: api_url={}, convention={}", config.api_url, config.time_convention);
    Ok(config)
}

use anyhow::Result;
use fieldsched_core::config::SchedConfig;
use owo_colors::OwoColorize;

pub fn run() -> Result<()> {
    let config_path = SchedConfig::config_path()?;
    let config = SchedConfig::load()?;

    println!("{}", "Paths".bold());
    println!("  Config:       {}", config_path.display());
    if !config_path.exists() {
        println!("  {}", "(not created yet, run `fieldsched config init`)".dimmed());
    }

    println!("\n{}", "Effective settings".bold());
    println!("  Endpoint:     {}", config.appointment_endpoint());
    println!(
        "  Token:        {}",
        if config.api_token.is_some() { "set" } else { "not set" }
    );
    println!("  Times in:     {}", config.time_convention);
    println!("  Month ends:   {:?}", config.month_overflow);
    println!("  Concurrency:  {}", config.concurrency);
    println!("  Timeout:      {}s", config.request_timeout_secs);

    Ok(())
}

pub fn init() -> Result<()> {
    let config_path = SchedConfig::config_path()?;

    if config_path.exists() {
        println!("Config already exists at {}", config_path.display());
        return Ok(());
    }

    SchedConfig::create_default_config(&config_path)?;
    println!("{}", format!("Created {}", config_path.display()).green());

    Ok(())
}

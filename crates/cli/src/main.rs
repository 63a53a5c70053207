mod cli;
mod commands;

use anyhow::{bail, Result};
use clap::Parser;
use serde::Serialize;

use surge_core::config::load_dotenv;
use surge_core::Config;

use crate::cli::{CliArgs, Command};

fn main() -> Result<()> {
    load_dotenv();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_target(false)
        .init();

    let args = CliArgs::parse();
    let config = Config::from_env();
    config.log_summary();

    match &args.command {
        Command::Forecast(forecast) => print_json(&commands::forecast(forecast, &config)?),
        Command::Batch(batch) => print_json(&commands::batch(batch, &config)?),
        Command::Check(check) => print_json(&commands::check(check)?),
        Command::Validate(validate) => {
            let report = commands::validate(validate, &config)?;
            for line in &report.lines {
                println!("{}", line);
            }
            if report.invalid > 0 {
                bail!("{} invalid threshold profile(s)", report.invalid);
            }
            Ok(())
        }
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

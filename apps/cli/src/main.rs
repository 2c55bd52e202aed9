//! ferrum-forms - validate and convert questionnaire date/time inputs
//!
//! Exits non-zero when an input is rejected or cannot be converted.

mod commands;
mod config;
mod logging;

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use chrono::{Datelike, Local};
use clap::{Parser, Subcommand};
use ferrum_form_datetime::Period;

use crate::commands::Report;
use crate::config::Config;

#[derive(Parser)]
#[command(name = "ferrum-forms")]
#[command(about = "Validate and convert FHIR questionnaire date/time inputs")]
#[command(version)]
struct Cli {
    /// Path to a TOML config file (defaults to ./ferrum-forms.toml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a DD/MM/YYYY, MM/YYYY or YYYY date input
    ValidateDate {
        input: String,
        /// Treat the input as a stored value that could not be read
        #[arg(long)]
        parse_failed: bool,
    },
    /// Validate an HH:MM time input
    ValidateTime {
        input: String,
        /// AM or PM
        #[arg(short, long, value_parser = parse_period)]
        period: Option<Period>,
    },
    /// Convert a display date to a FHIR date
    ToFhirDate { input: String },
    /// Convert a FHIR date to a display date
    ToDisplayDate { fhir_date: String },
    /// Compose a FHIR dateTime from a display date and a time input
    ToFhirDatetime {
        date: String,
        time: String,
        /// AM or PM; not needed for hours 13-23
        #[arg(short, long, value_parser = parse_period)]
        period: Option<Period>,
        /// Offset to write, overriding input.utc_offset (e.g. +10:00)
        #[arg(long)]
        utc_offset: Option<String>,
    },
    /// Show the time and period of a FHIR dateTime
    ToDisplayTime { fhir_date_time: String },
    /// Suggest complete dates for a partial input such as 3/24 or Mar 2024
    Suggest {
        input: String,
        /// Year two-digit years are resolved against (defaults to this year)
        #[arg(long)]
        year: Option<i32>,
    },
}

fn parse_period(value: &str) -> Result<Period, String> {
    Period::parse(value).ok_or_else(|| format!("expected AM or PM, got '{value}'"))
}

fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    let mut config = Config::load(cli.config.as_deref()).context("Failed to load configuration")?;
    if let Commands::ToFhirDatetime {
        utc_offset: Some(offset),
        ..
    } = &cli.command
    {
        config.input.utc_offset = offset.clone();
    }

    config
        .validate()
        .map_err(|e| anyhow::anyhow!("Invalid configuration: {e}"))?;

    logging::init_logging(&config.logging).context("Failed to initialize logging")?;

    let report = run(cli.command, &config)?;
    if cli.json {
        let json = serde_json::to_string_pretty(&report).context("Failed to serialize report")?;
        println!("{json}");
    } else {
        println!("{}", report.to_text());
    }

    if report.is_ok() {
        Ok(ExitCode::SUCCESS)
    } else {
        tracing::debug!(input = %report.input, "input rejected");
        Ok(ExitCode::FAILURE)
    }
}

fn run(command: Commands, config: &Config) -> anyhow::Result<Report> {
    let report = match command {
        Commands::ValidateDate {
            input,
            parse_failed,
        } => commands::validate_date(&input, parse_failed),
        Commands::ValidateTime { input, period } => commands::validate_time(&input, period),
        Commands::ToFhirDate { input } => commands::to_fhir_date(&input),
        Commands::ToDisplayDate { fhir_date } => commands::to_display_date(&fhir_date),
        Commands::ToFhirDatetime {
            date, time, period, ..
        } => {
            let offset = config.utc_offset()?;
            commands::to_fhir_date_time(&date, &time, period, offset)
        }
        Commands::ToDisplayTime { fhir_date_time } => commands::to_display_time(&fhir_date_time),
        Commands::Suggest { input, year } => {
            commands::suggest(&input, year.unwrap_or_else(|| Local::now().year()))
        }
    };
    Ok(report)
}

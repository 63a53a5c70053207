use std::path::PathBuf;

use chrono::{DateTime, FixedOffset, NaiveDate, TimeZone, Utc};
use clap::{Args, Parser, Subcommand};

use surge_forecast::ThresholdParams;

/// Escalation forecasting for issue event counts.
///
/// Reads hourly event counts, forecasts fourteen daily thresholds and
/// checks observed counts against them.
#[derive(Parser, Debug)]
#[command(name = "surge", version, about = "Issue escalation forecasting")]
pub struct CliArgs {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Forecast one issue from a `{"intervals": [..], "data": [..]}` document.
    Forecast(ForecastArgs),
    /// Forecast many issues from `[{"issue_id": .., "intervals": .., "data": ..}]`.
    Batch(BatchArgs),
    /// Compare an observed daily count with a stored forecast.
    Check(CheckArgs),
    /// Load and validate every threshold profile.
    Validate(ValidateArgs),
}

/// Where thresholds come from: a named profile plus optional knob overrides.
#[derive(Args, Debug, Clone, Default)]
pub struct ProfileArgs {
    /// Threshold profile id (default: SURGE_THRESHOLD_PROFILE or "standard")
    #[arg(long)]
    pub profile: Option<String>,

    /// Directory of ThresholdConfig YAML files (default: SURGE_RULES_DIR)
    #[arg(long)]
    pub rules_dir: Option<PathBuf>,

    /// Override the profile's standard-deviation multiplier
    #[arg(long)]
    pub std_multiplier: Option<f64>,

    #[arg(long)]
    pub min_spike_multiplier: Option<f64>,

    #[arg(long)]
    pub max_spike_multiplier: Option<f64>,

    #[arg(long)]
    pub min_bursty_multiplier: Option<f64>,

    #[arg(long)]
    pub max_bursty_multiplier: Option<f64>,
}

impl ProfileArgs {
    /// Apply any knob flags on top of the profile's values.
    pub fn apply_overrides(&self, params: ThresholdParams) -> ThresholdParams {
        ThresholdParams {
            std_multiplier: self.std_multiplier.unwrap_or(params.std_multiplier),
            min_spike_multiplier: self.min_spike_multiplier.unwrap_or(params.min_spike_multiplier),
            max_spike_multiplier: self.max_spike_multiplier.unwrap_or(params.max_spike_multiplier),
            min_bursty_multiplier: self
                .min_bursty_multiplier
                .unwrap_or(params.min_bursty_multiplier),
            max_bursty_multiplier: self
                .max_bursty_multiplier
                .unwrap_or(params.max_bursty_multiplier),
        }
    }
}

#[derive(Args, Debug)]
pub struct ForecastArgs {
    /// History JSON file, or `-` for stdin
    #[arg(long, default_value = "-")]
    pub input: PathBuf,

    /// First forecast day: RFC 3339 timestamp or YYYY-MM-DD (midnight UTC)
    #[arg(long, value_parser = parse_anchor)]
    pub start: DateTime<FixedOffset>,

    /// Also print the fitted model and the parameters used
    #[arg(long)]
    pub explain: bool,

    #[command(flatten)]
    pub thresholds: ProfileArgs,
}

#[derive(Args, Debug)]
pub struct BatchArgs {
    /// Batch JSON file, or `-` for stdin
    #[arg(long, default_value = "-")]
    pub input: PathBuf,

    /// First forecast day: RFC 3339 timestamp or YYYY-MM-DD (midnight UTC)
    #[arg(long, value_parser = parse_anchor)]
    pub start: DateTime<FixedOffset>,

    /// Worker threads (default: SURGE_PARALLELISM, 0 = one per core)
    #[arg(long)]
    pub parallelism: Option<usize>,

    #[command(flatten)]
    pub thresholds: ProfileArgs,
}

#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Forecast JSON written by `surge forecast`
    #[arg(long)]
    pub forecast: PathBuf,

    /// Day to check (YYYY-MM-DD)
    #[arg(long, value_parser = parse_date)]
    pub date: NaiveDate,

    /// Events observed on that day
    #[arg(long)]
    pub count: u64,
}

#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Directory of ThresholdConfig YAML files (default: SURGE_RULES_DIR)
    #[arg(long)]
    pub rules_dir: Option<PathBuf>,
}

/// Parse `--start`: a full RFC 3339 timestamp keeps its offset, a bare date is midnight UTC.
pub fn parse_anchor(value: &str) -> Result<DateTime<FixedOffset>, String> {
    if let Ok(anchor) = DateTime::parse_from_rfc3339(value) {
        return Ok(anchor);
    }
    let date = parse_date(value)?;
    let midnight = date.and_hms_opt(0, 0, 0).ok_or_else(|| format!("invalid date '{}'", value))?;
    Ok(Utc.from_utc_datetime(&midnight).into())
}

pub fn parse_date(value: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|e| format!("expected YYYY-MM-DD or RFC 3339, got '{}': {}", value, e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_date_is_midnight_utc() {
        let anchor = parse_anchor("2024-02-29").unwrap();
        assert_eq!(anchor.to_rfc3339(), "2024-02-29T00:00:00+00:00");
    }

    #[test]
    fn rfc3339_keeps_offset() {
        let anchor = parse_anchor("2024-02-29T23:30:00-08:00").unwrap();
        assert_eq!(anchor.offset().local_minus_utc(), -8 * 3600);
        assert_eq!(anchor.date_naive(), NaiveDate::from_ymd_opt(2024, 2, 29).unwrap());
    }

    #[test]
    fn garbage_anchor_is_rejected() {
        assert!(parse_anchor("yesterday").is_err());
        assert!(parse_anchor("2023-02-29").is_err());
    }

    #[test]
    fn forecast_command_parses_overrides() {
        let args = CliArgs::try_parse_from([
            "surge",
            "forecast",
            "--input",
            "history.json",
            "--start",
            "2024-01-01",
            "--profile",
            "sensitive",
            "--std-multiplier",
            "4",
        ])
        .unwrap();
        let Command::Forecast(forecast) = args.command else {
            panic!("expected forecast subcommand");
        };
        assert_eq!(forecast.input, PathBuf::from("history.json"));
        assert_eq!(forecast.thresholds.profile.as_deref(), Some("sensitive"));

        let params = forecast.thresholds.apply_overrides(ThresholdParams::STANDARD);
        assert_eq!(params.std_multiplier, 4.0);
        assert_eq!(params.min_spike_multiplier, 5.0);
    }

    #[test]
    fn check_requires_count() {
        let result = CliArgs::try_parse_from([
            "surge", "check", "--forecast", "f.json", "--date", "2024-01-01",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn missing_start_is_rejected() {
        assert!(CliArgs::try_parse_from(["surge", "forecast", "--input", "-"]).is_err());
    }
}

use std::fs;
use std::io::{self, Read};
use std::path::Path;

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::info;

use surge_core::{Config, ForecastPoint, GroupCount, IssueSeries};
use surge_forecast::{
    check_escalation, forecast_batch, forecast_samples, EscalationCheck, ForecastModel,
    ThresholdParams, MIN_FULL_HISTORY,
};
use surge_rules::{validate_threshold_config, LoadStatus, ProfileLoader};

use crate::cli::{BatchArgs, CheckArgs, ForecastArgs, ProfileArgs, ValidateArgs};

/// A stored forecast: the plain array, or the object printed with `--explain`.
#[derive(Deserialize)]
#[serde(untagged)]
enum ForecastFile {
    Points(Vec<ForecastPoint>),
    Explained { forecast: Vec<ForecastPoint> },
}

impl ForecastFile {
    fn into_points(self) -> Vec<ForecastPoint> {
        match self {
            ForecastFile::Points(points) | ForecastFile::Explained { forecast: points } => points,
        }
    }
}

#[derive(Serialize)]
struct Explanation<'a> {
    profile: &'a str,
    params: ThresholdParams,
    samples: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    model: Option<ForecastModel>,
    forecast: Vec<ForecastPoint>,
}

// ── forecast ────────────────────────────────────────────────

pub fn forecast(args: &ForecastArgs, config: &Config) -> Result<Value> {
    let history: GroupCount = read_json(&args.input)?;
    let (profile, params) = resolve_params(&args.thresholds, config)?;

    let samples = history.samples().context("failed to parse history")?;
    let points = forecast_samples(&samples, args.start, &params).context("forecast failed")?;
    info!(profile = %profile, samples = samples.len(), "forecast generated");

    if !args.explain {
        return Ok(serde_json::to_value(points)?);
    }

    let model = if samples.len() >= MIN_FULL_HISTORY {
        Some(ForecastModel::fit(&samples, &params)?)
    } else {
        None
    };
    Ok(serde_json::to_value(Explanation {
        profile: &profile,
        params,
        samples: samples.len(),
        model,
        forecast: points,
    })?)
}

// ── batch ───────────────────────────────────────────────────

pub fn batch(args: &BatchArgs, config: &Config) -> Result<Value> {
    let series: Vec<IssueSeries> = read_json(&args.input)?;
    let (_, params) = resolve_params(&args.thresholds, config)?;
    let parallelism = args.parallelism.unwrap_or(config.parallelism);

    let forecasts = forecast_batch(&series, args.start, &params, parallelism)
        .context("batch forecast failed")?;
    Ok(serde_json::to_value(forecasts)?)
}

// ── check ───────────────────────────────────────────────────

pub fn check(args: &CheckArgs) -> Result<EscalationCheck> {
    let file: ForecastFile = read_json(&args.forecast)?;
    Ok(check_escalation(&file.into_points(), args.date, args.count))
}

// ── validate ────────────────────────────────────────────────

/// Outcome of `surge validate`: a printable report and whether anything failed.
pub struct ValidationReport {
    pub lines: Vec<String>,
    pub invalid: usize,
}

pub fn validate(args: &ValidateArgs, config: &Config) -> Result<ValidationReport> {
    let rules_dir = args.rules_dir.clone().unwrap_or_else(|| config.rules_dir.clone());
    let mut loader = ProfileLoader::new(&rules_dir);
    let results = loader
        .load_all()
        .with_context(|| format!("failed to scan {}", loader.rules_dir().display()))?;

    let mut lines = Vec::new();
    let mut invalid = 0;

    for result in &results {
        match &result.status {
            LoadStatus::Failed { error } => {
                invalid += 1;
                lines.push(format!("✗ {}: {}", result.path.display(), error));
            }
            LoadStatus::Skipped { reason } => {
                lines.push(format!("- {}: skipped ({})", result.path.display(), reason));
            }
            LoadStatus::Loaded { .. } => {}
        }
    }

    for rule in loader.profiles() {
        let outcome = validate_threshold_config(rule);
        let id = &rule.metadata.id;
        if outcome.valid {
            lines.push(format!("✓ {}", id));
        } else {
            invalid += 1;
            lines.push(format!("✗ {}", id));
        }
        for error in &outcome.errors {
            match &error.suggestion {
                Some(hint) => lines.push(format!(
                    "    error   {}: {} ({})",
                    error.path, error.message, hint
                )),
                None => lines.push(format!("    error   {}: {}", error.path, error.message)),
            }
        }
        for warning in &outcome.warnings {
            lines.push(format!("    warning {}: {}", warning.path, warning.message));
        }
    }

    Ok(ValidationReport { lines, invalid })
}

// ── helpers ─────────────────────────────────────────────────

/// Load the requested profile and layer the knob flags over it.
fn resolve_params(args: &ProfileArgs, config: &Config) -> Result<(String, ThresholdParams)> {
    let rules_dir = args.rules_dir.clone().unwrap_or_else(|| config.rules_dir.clone());
    let profile = args
        .profile
        .clone()
        .unwrap_or_else(|| config.threshold_profile.clone());

    let mut loader = ProfileLoader::new(&rules_dir);
    loader
        .load_all()
        .with_context(|| format!("failed to load profiles from {}", rules_dir.display()))?;
    let compiled = loader.compiled(&profile)?;

    let params = args.apply_overrides(ThresholdParams::from(&compiled));
    if let Err(e) = params.validate() {
        bail!("profile '{}' with overrides is unusable: {}", profile, e);
    }
    Ok((profile, params))
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let contents = if path == Path::new("-") {
        let mut buf = String::new();
        io::stdin()
            .read_to_string(&mut buf)
            .context("failed to read stdin")?;
        buf
    } else {
        fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?
    };
    serde_json::from_str(&contents).with_context(|| format!("failed to parse {}", path.display()))
}

use chrono::{DateTime, FixedOffset};
use tracing::debug;

use surge_core::{ForecastPoint, GroupCount, HistorySample};

use crate::error::Result;
use crate::model::{horizon, ForecastModel};
use crate::params::ThresholdParams;

/// Days covered by every non-empty forecast.
pub const FORECAST_HORIZON_DAYS: usize = 14;

/// Hourly samples needed for the statistical path (one full week).
pub const MIN_FULL_HISTORY: usize = 24 * 7;

/// Multiplier on the peak hour applied to every day while history is sparse.
pub const SPARSE_HISTORY_MULTIPLIER: u64 = 10;

/// Compute daily escalation thresholds for one issue.
///
/// Timestamps are parsed first, so a malformed record fails even when the
/// count list is empty. An empty history then yields an empty forecast for
/// any `params`; otherwise `params` are validated before they are used.
pub fn generate_forecast(
    history: &GroupCount,
    anchor: DateTime<FixedOffset>,
    params: &ThresholdParams,
) -> Result<Vec<ForecastPoint>> {
    let samples = history.samples()?;
    forecast_samples(&samples, anchor, params)
}

/// [`generate_forecast`] over already-parsed samples.
pub fn forecast_samples(
    samples: &[HistorySample],
    anchor: DateTime<FixedOffset>,
    params: &ThresholdParams,
) -> Result<Vec<ForecastPoint>> {
    if samples.is_empty() {
        debug!("no history, empty forecast");
        return Ok(Vec::new());
    }

    params.validate()?;

    if samples.len() < MIN_FULL_HISTORY {
        let peak = samples.iter().map(|s| s.count).max().unwrap_or_default();
        let ceiling = peak.saturating_mul(SPARSE_HISTORY_MULTIPLIER);
        debug!(samples = samples.len(), peak, ceiling, "sparse history, flat ceiling");
        return Ok(horizon(anchor)
            .map(|date| ForecastPoint {
                forecasted_date: date,
                forecasted_value: ceiling,
            })
            .collect());
    }

    let model = ForecastModel::fit(samples, params)?;
    Ok(model.project(anchor))
}

//! Comparing an observed daily count with a stored forecast.

use chrono::NaiveDate;
use serde::Serialize;

use surge_core::ForecastPoint;

/// Outcome of checking one day's observed count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum EscalationCheck {
    /// Observed count is strictly above the day's threshold.
    Escalating { limit: u64, observed: u64 },
    WithinForecast { limit: u64, observed: u64 },
    /// The forecast has no entry for the date.
    NoForecast,
}

impl EscalationCheck {
    pub fn is_escalating(&self) -> bool {
        matches!(self, EscalationCheck::Escalating { .. })
    }
}

/// Threshold stored for `date`, if the forecast covers it.
pub fn forecast_for_date(points: &[ForecastPoint], date: NaiveDate) -> Option<u64> {
    points
        .iter()
        .find(|p| p.forecasted_date == date)
        .map(|p| p.forecasted_value)
}

pub fn check_escalation(
    points: &[ForecastPoint],
    date: NaiveDate,
    observed: u64,
) -> EscalationCheck {
    match forecast_for_date(points, date) {
        Some(limit) if observed > limit => EscalationCheck::Escalating { limit, observed },
        Some(limit) => EscalationCheck::WithinForecast { limit, observed },
        None => EscalationCheck::NoForecast,
    }
}

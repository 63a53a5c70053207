use chrono::{DateTime, Datelike, FixedOffset, NaiveDate, Weekday};
use serde::Serialize;
use tracing::debug;

use surge_core::{ForecastPoint, HistorySample};

use crate::engine::FORECAST_HORIZON_DAYS;
use crate::error::{ForecastError, Result};
use crate::params::ThresholdParams;
use crate::stats::SeriesStats;

/// Scale of the bursty multiplier at zero variance.
const BURSTY_SCALE: f64 = 5.0;
/// Exponential decay rate of the bursty multiplier in the coefficient of variation.
const BURSTY_DECAY: f64 = 0.65;

/// Count totals of samples falling on one weekday.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct WeekdayTotal {
    sum: u128,
    samples: u64,
}

/// Statistics fitted from a full week (or more) of hourly counts.
///
/// Everything except the weekday-weighted average is flat across the
/// horizon, so the model is fitted once and projected per output day.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForecastModel {
    pub stats: SeriesStats,
    /// `stddev / mean`.
    pub cv: f64,
    /// `clamp(5 * e^(-0.65 * cv), min_bursty, max_bursty)`.
    pub bursty_multiplier: f64,
    /// `max * bursty_multiplier` (limit_v1).
    pub burst_limit: f64,
    /// `clamp((mean + k * stddev) / mean, min_spike, max_spike)`.
    pub spike_multiplier: f64,
    /// `spike_multiplier * mean`.
    pub baseline: f64,
    #[serde(skip)]
    total: WeekdayTotal,
    /// Indexed by `Weekday::num_days_from_monday`.
    #[serde(skip)]
    by_weekday: [WeekdayTotal; 7],
}

impl ForecastModel {
    /// Fit the model. `params` must already be validated.
    ///
    /// Fails with [`ForecastError::DegenerateSeries`] when the mean count is
    /// zero (including an empty slice).
    pub fn fit(samples: &[HistorySample], params: &ThresholdParams) -> Result<Self> {
        let counts: Vec<u64> = samples.iter().map(|s| s.count).collect();
        let stats = SeriesStats::from_counts(&counts)
            .ok_or(ForecastError::DegenerateSeries { samples: 0 })?;
        let cv = stats
            .coefficient_of_variation()
            .ok_or(ForecastError::DegenerateSeries {
                samples: stats.samples,
            })?;

        let bursty_multiplier = params.clamp_bursty(BURSTY_SCALE * (-BURSTY_DECAY * cv).exp());
        let burst_limit = stats.max as f64 * bursty_multiplier;

        let spike_ratio = (stats.mean + params.std_multiplier * stats.stddev) / stats.mean;
        let spike_multiplier = params.clamp_spike(spike_ratio);
        let baseline = spike_multiplier * stats.mean;

        let mut total = WeekdayTotal::default();
        let mut by_weekday = [WeekdayTotal::default(); 7];
        for sample in samples {
            let slot = &mut by_weekday[sample.timestamp.weekday().num_days_from_monday() as usize];
            slot.sum += sample.count as u128;
            slot.samples += 1;
            total.sum += sample.count as u128;
            total.samples += 1;
        }

        debug!(
            samples = stats.samples,
            mean = stats.mean,
            stddev = stats.stddev,
            max = stats.max,
            cv,
            bursty_multiplier,
            spike_multiplier,
            "fitted forecast model"
        );

        Ok(Self {
            stats,
            cv,
            bursty_multiplier,
            burst_limit,
            spike_multiplier,
            baseline,
            total,
            by_weekday,
        })
    }

    /// Average hourly count with samples on `weekday` weighted 2 and all others 1.
    pub fn weighted_average(&self, weekday: Weekday) -> f64 {
        let same = self.by_weekday[weekday.num_days_from_monday() as usize];
        // Weight 2 = every sample once plus the matching weekday once more.
        let numerator = self.total.sum + same.sum;
        let denominator = self.total.samples + same.samples;
        numerator as f64 / denominator as f64
    }

    /// Spike ceiling for a day (limit_v2): weighted average plus baseline.
    pub fn spike_limit(&self, weekday: Weekday) -> f64 {
        self.weighted_average(weekday) + self.baseline
    }

    /// Final threshold for one day, truncated toward zero.
    pub fn limit_for(&self, date: NaiveDate) -> u64 {
        self.burst_limit.max(self.spike_limit(date.weekday())) as u64
    }

    /// Project the fourteen daily thresholds starting at the anchor's local date.
    pub fn project(&self, anchor: DateTime<FixedOffset>) -> Vec<ForecastPoint> {
        horizon(anchor)
            .map(|date| ForecastPoint {
                forecasted_date: date,
                forecasted_value: self.limit_for(date),
            })
            .collect()
    }
}

/// The horizon's calendar dates, in the anchor's own offset.
pub(crate) fn horizon(anchor: DateTime<FixedOffset>) -> impl Iterator<Item = NaiveDate> {
    anchor.date_naive().iter_days().take(FORECAST_HORIZON_DAYS)
}

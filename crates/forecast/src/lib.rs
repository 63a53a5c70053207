//! Issue-escalation forecasting.
//!
//! Turns a trailing week of hourly event counts into fourteen daily
//! thresholds. An issue whose daily event count rises above the threshold
//! for that day is escalating.
//!
//! ```text
//! samples < 168:   every day = 10 * max
//! otherwise:
//!   cv        = stddev / mean
//!   bursty    = clamp(5 * e^(-0.65 * cv), min_bursty, max_bursty)
//!   limit_v1  = max * bursty
//!   spike     = clamp((mean + k * stddev) / mean, min_spike, max_spike)
//!   limit_v2  = weekday_weighted_mean(day) + spike * mean
//!   day       = trunc(max(limit_v1, limit_v2))
//! ```

pub mod batch;
pub mod engine;
pub mod error;
pub mod escalation;
pub mod model;
pub mod params;
pub mod stats;

pub use batch::{forecast_batch, IssueForecast};
pub use engine::{
    forecast_samples, generate_forecast, FORECAST_HORIZON_DAYS, MIN_FULL_HISTORY,
    SPARSE_HISTORY_MULTIPLIER,
};
pub use error::ForecastError;
pub use escalation::{check_escalation, forecast_for_date, EscalationCheck};
pub use model::ForecastModel;
pub use params::ThresholdParams;
pub use stats::SeriesStats;

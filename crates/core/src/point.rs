use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Forecasted escalation threshold for one calendar day.
///
/// Serializes as `{"forecasted_date": "YYYY-MM-DD", "forecasted_value": n}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ForecastPoint {
    pub forecasted_date: NaiveDate,
    pub forecasted_value: u64,
}

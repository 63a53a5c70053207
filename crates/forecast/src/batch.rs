use std::time::Instant;

use chrono::{DateTime, FixedOffset};
use rayon::prelude::*;
use serde::Serialize;
use tracing::{debug, info, warn};

use surge_core::{ForecastPoint, IssueSeries};

use crate::engine::generate_forecast;
use crate::error::{ForecastError, Result};
use crate::params::ThresholdParams;

/// Forecast outcome for one issue of a batch.
#[derive(Debug)]
pub struct IssueForecast {
    pub issue_id: String,
    pub result: std::result::Result<Vec<ForecastPoint>, ForecastError>,
}

/// Serialized shape of [`IssueForecast`]: points on success, message on failure.
#[derive(Serialize)]
struct IssueForecastRecord<'a> {
    issue_id: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    forecast: Option<&'a [ForecastPoint]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl Serialize for IssueForecast {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let record = match &self.result {
            Ok(points) => IssueForecastRecord {
                issue_id: &self.issue_id,
                forecast: Some(points),
                error: None,
            },
            Err(e) => IssueForecastRecord {
                issue_id: &self.issue_id,
                forecast: None,
                error: Some(e.to_string()),
            },
        };
        record.serialize(serializer)
    }
}

/// Forecast many issues in parallel against one anchor.
///
/// `params` are checked once up front; a bad parameter set fails the whole
/// batch. After that each issue succeeds or fails on its own and results
/// come back in input order. `parallelism == 0` uses rayon's global pool,
/// any other value builds a dedicated pool of that many threads.
pub fn forecast_batch(
    series: &[IssueSeries],
    anchor: DateTime<FixedOffset>,
    params: &ThresholdParams,
    parallelism: usize,
) -> Result<Vec<IssueForecast>> {
    params.validate()?;

    let start = Instant::now();
    let run = || -> Vec<IssueForecast> {
        series
            .par_iter()
            .map(|issue| {
                let result = generate_forecast(&issue.counts, anchor, params);
                if let Err(e) = &result {
                    warn!(issue_id = %issue.issue_id, error = %e, "forecast failed");
                }
                IssueForecast {
                    issue_id: issue.issue_id.clone(),
                    result,
                }
            })
            .collect()
    };

    let forecasts = if parallelism > 0 {
        debug!(threads = parallelism, "building dedicated forecast pool");
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(parallelism)
            .build()?;
        pool.install(run)
    } else {
        run()
    };

    let failed = forecasts.iter().filter(|f| f.result.is_err()).count();
    info!(
        issues = forecasts.len(),
        failed,
        elapsed_ms = start.elapsed().as_millis() as u64,
        "forecast batch complete"
    );
    Ok(forecasts)
}

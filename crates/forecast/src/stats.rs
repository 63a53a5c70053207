use serde::{Deserialize, Serialize};

/// Summary statistics of an hourly count series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SeriesStats {
    pub samples: usize,
    pub mean: f64,
    /// Unbiased sample standard deviation (n - 1 denominator).
    pub stddev: f64,
    pub max: u64,
}

impl SeriesStats {
    /// Compute statistics for a non-empty series; `None` when empty.
    pub fn from_counts(counts: &[u64]) -> Option<Self> {
        let max = counts.iter().copied().max()?;
        let n = counts.len();

        let total: u128 = counts.iter().map(|&c| c as u128).sum();
        let mean = total as f64 / n as f64;

        let stddev = if n < 2 {
            0.0
        } else {
            let sum_sq = counts
                .iter()
                .map(|&c| (c as f64 - mean).powi(2))
                .sum::<f64>();
            (sum_sq / (n - 1) as f64).sqrt()
        };

        Some(Self {
            samples: n,
            mean,
            stddev,
            max,
        })
    }

    /// Coefficient of variation, `stddev / mean`. `None` when the mean is zero.
    pub fn coefficient_of_variation(&self) -> Option<f64> {
        if self.mean <= f64::EPSILON {
            return None;
        }
        Some(self.stddev / self.mean)
    }
}

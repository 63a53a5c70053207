use serde::{Deserialize, Serialize};

use surge_rules::CompiledThresholdConfig;

use crate::error::{ForecastError, Result};

/// Tuning knobs for the spike and bursty ceilings.
///
/// Values are taken as given; [`validate`](Self::validate) only rejects
/// pairs that cannot be clamped into (inverted or non-finite bounds).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ThresholdParams {
    /// Standard deviations above the mean that define the spike ceiling.
    pub std_multiplier: f64,
    pub min_spike_multiplier: f64,
    pub max_spike_multiplier: f64,
    pub min_bursty_multiplier: f64,
    pub max_bursty_multiplier: f64,
}

impl ThresholdParams {
    /// Calibrated defaults: 5 standard deviations, spike in [5, 8], bursty in [2, 5].
    pub const STANDARD: ThresholdParams = ThresholdParams {
        std_multiplier: 5.0,
        min_spike_multiplier: 5.0,
        max_spike_multiplier: 8.0,
        min_bursty_multiplier: 2.0,
        max_bursty_multiplier: 5.0,
    };

    /// Check the caller contract before any clamp runs.
    pub fn validate(&self) -> Result<()> {
        let fields = [
            ("std_multiplier", self.std_multiplier),
            ("min_spike_multiplier", self.min_spike_multiplier),
            ("max_spike_multiplier", self.max_spike_multiplier),
            ("min_bursty_multiplier", self.min_bursty_multiplier),
            ("max_bursty_multiplier", self.max_bursty_multiplier),
        ];
        if let Some((name, value)) = fields.iter().find(|(_, v)| !v.is_finite()) {
            return Err(ForecastError::Configuration(format!(
                "{} must be finite, got {}",
                name, value
            )));
        }

        check_pair("spike", self.min_spike_multiplier, self.max_spike_multiplier)?;
        check_pair("bursty", self.min_bursty_multiplier, self.max_bursty_multiplier)
    }

    /// Clamp a raw spike multiplier into its policy range.
    /// Call after [`validate`](Self::validate).
    pub(crate) fn clamp_spike(&self, raw: f64) -> f64 {
        raw.clamp(self.min_spike_multiplier, self.max_spike_multiplier)
    }

    /// Clamp a raw bursty multiplier into its policy range.
    /// Call after [`validate`](Self::validate).
    pub(crate) fn clamp_bursty(&self, raw: f64) -> f64 {
        raw.clamp(self.min_bursty_multiplier, self.max_bursty_multiplier)
    }
}

fn check_pair(name: &str, min: f64, max: f64) -> Result<()> {
    if min > max {
        return Err(ForecastError::Configuration(format!(
            "min_{name}_multiplier ({min}) exceeds max_{name}_multiplier ({max})"
        )));
    }
    Ok(())
}

impl Default for ThresholdParams {
    fn default() -> Self {
        Self::STANDARD
    }
}

impl From<&CompiledThresholdConfig> for ThresholdParams {
    fn from(config: &CompiledThresholdConfig) -> Self {
        Self {
            std_multiplier: config.std_multiplier,
            min_spike_multiplier: config.spike_multiplier.min,
            max_spike_multiplier: config.spike_multiplier.max,
            min_bursty_multiplier: config.bursty_multiplier.min,
            max_bursty_multiplier: config.bursty_multiplier.max,
        }
    }
}

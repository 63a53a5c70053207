//! ThresholdConfig rule kind: standard-deviation multiplier and the clamp
//! bounds for the spike and bursty multipliers used by escalation forecasting.

use serde::{Deserialize, Serialize};

use surge_core::config::DEFAULT_THRESHOLD_PROFILE;

use crate::schema::{CommonMetadata, API_VERSION};

/// `kind` value of a threshold profile document.
pub const THRESHOLD_CONFIG_KIND: &str = "ThresholdConfig";

// ── YAML-level types ────────────────────────────────────────────────

/// Top-level ThresholdConfig rule document.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ThresholdConfigRule {
    #[serde(rename = "apiVersion")]
    pub api_version: String,
    pub kind: String,
    pub metadata: CommonMetadata,
    #[serde(default)]
    pub spec: ThresholdConfigSpec,
}

/// Specification section of a ThresholdConfig rule.
///
/// Every field is optional in YAML; omitted fields take the standard values.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ThresholdConfigSpec {
    /// Standard deviations above the mean that define the spike ceiling.
    #[serde(default = "default_std_multiplier")]
    pub std_multiplier: f64,
    /// Clamp range for the spike multiplier.
    #[serde(default = "default_spike_multiplier")]
    pub spike_multiplier: MultiplierBounds,
    /// Clamp range for the variance-driven bursty multiplier.
    #[serde(default = "default_bursty_multiplier")]
    pub bursty_multiplier: MultiplierBounds,
}

/// Inclusive clamp range; `min <= max` is checked by validation.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct MultiplierBounds {
    pub min: f64,
    pub max: f64,
}

fn default_std_multiplier() -> f64 {
    5.0
}

fn default_spike_multiplier() -> MultiplierBounds {
    MultiplierBounds { min: 5.0, max: 8.0 }
}

fn default_bursty_multiplier() -> MultiplierBounds {
    MultiplierBounds { min: 2.0, max: 5.0 }
}

impl Default for ThresholdConfigSpec {
    fn default() -> Self {
        Self {
            std_multiplier: default_std_multiplier(),
            spike_multiplier: default_spike_multiplier(),
            bursty_multiplier: default_bursty_multiplier(),
        }
    }
}

// ── Compiled type ───────────────────────────────────────────────────

/// Compiled threshold config; the YAML spec is already fully typed.
pub type CompiledThresholdConfig = ThresholdConfigSpec;

impl ThresholdConfigRule {
    /// The built-in profile served when no file overrides it.
    pub fn standard() -> Self {
        Self {
            api_version: API_VERSION.to_string(),
            kind: THRESHOLD_CONFIG_KIND.to_string(),
            metadata: CommonMetadata {
                id: DEFAULT_THRESHOLD_PROFILE.to_string(),
                name: "Standard escalation thresholds".to_string(),
                description: None,
                tags: None,
                enabled: true,
                extends: None,
            },
            spec: ThresholdConfigSpec::default(),
        }
    }

    /// Compile the YAML config.
    pub fn compile(&self) -> CompiledThresholdConfig {
        self.spec.clone()
    }
}

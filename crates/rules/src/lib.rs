//! Threshold profiles for the escalation forecaster.
//!
//! This crate provides:
//! - the `ThresholdConfig` YAML rule kind with serde deserialization
//! - a filesystem loader resolving `extends` inheritance between profiles
//! - structured validation with errors and advisory warnings

pub mod loader;
pub mod schema;
pub mod threshold_config;
pub mod validation;

pub use loader::{LoadResult, LoadStatus, ProfileLoader, RuleError};
pub use threshold_config::{
    CompiledThresholdConfig, MultiplierBounds, ThresholdConfigRule, ThresholdConfigSpec,
};
pub use validation::{validate_threshold_config, ValidationResult};

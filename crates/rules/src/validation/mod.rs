//! Threshold profile validation with structured errors and suggestions.
//!
//! Returns a [`ValidationResult`] with errors (profile unusable) and
//! warnings (advisory: legal but probably not what the author meant).

pub mod fuzzy;

use serde::{Deserialize, Serialize};

use crate::schema::API_VERSION;
use crate::threshold_config::{MultiplierBounds, ThresholdConfigRule, THRESHOLD_CONFIG_KIND};

use self::fuzzy::{fuzzy_match, is_kebab_case};

/// The bursty multiplier is `5 * e^(-0.65 * cv)` with `cv >= 0`, so it never
/// exceeds this before clamping.
const BURSTY_RAW_CEILING: f64 = 5.0;

// ── Result types ────────────────────────────────────────────────────

/// Overall validation outcome.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationResult {
    pub valid: bool,
    pub errors: Vec<ValidationError>,
    pub warnings: Vec<ValidationWarning>,
}

/// A blocking validation error.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationError {
    /// JSON-path-like location, e.g. `"spec.spike_multiplier"`.
    pub path: String,
    pub message: String,
    /// Optional "Did you mean …?" suggestion.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
}

/// A non-blocking advisory warning.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationWarning {
    pub path: String,
    pub message: String,
}

impl ValidationResult {
    pub(crate) fn new() -> Self {
        Self {
            valid: true,
            errors: Vec::new(),
            warnings: Vec::new(),
        }
    }

    pub(crate) fn error(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.valid = false;
        self.errors.push(ValidationError {
            path: path.into(),
            message: message.into(),
            suggestion: None,
        });
    }

    pub(crate) fn error_with_suggestion(
        &mut self,
        path: impl Into<String>,
        message: impl Into<String>,
        suggestion: impl Into<String>,
    ) {
        self.valid = false;
        self.errors.push(ValidationError {
            path: path.into(),
            message: message.into(),
            suggestion: Some(suggestion.into()),
        });
    }

    pub(crate) fn warn(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.warnings.push(ValidationWarning {
            path: path.into(),
            message: message.into(),
        });
    }
}

// ── Public API ──────────────────────────────────────────────────────

/// Validate a parsed [`ThresholdConfigRule`].
pub fn validate_threshold_config(rule: &ThresholdConfigRule) -> ValidationResult {
    let mut result = ValidationResult::new();
    validate_metadata(rule, &mut result);

    let spec = &rule.spec;
    if !spec.std_multiplier.is_finite() || spec.std_multiplier < 0.0 {
        result.error(
            "spec.std_multiplier",
            format!(
                "std_multiplier must be a finite non-negative number, got {}",
                spec.std_multiplier
            ),
        );
    } else if spec.std_multiplier == 0.0 {
        result.warn(
            "spec.std_multiplier",
            "std_multiplier of 0 pins the spike multiplier to its minimum",
        );
    }

    validate_bounds("spec.spike_multiplier", &spec.spike_multiplier, &mut result);
    validate_bounds("spec.bursty_multiplier", &spec.bursty_multiplier, &mut result);

    if spec.bursty_multiplier.max > BURSTY_RAW_CEILING {
        result.warn(
            "spec.bursty_multiplier.max",
            format!(
                "bursty multiplier never exceeds {} before clamping; max {} only acts through min",
                BURSTY_RAW_CEILING, spec.bursty_multiplier.max
            ),
        );
    }

    result
}

fn validate_metadata(rule: &ThresholdConfigRule, result: &mut ValidationResult) {
    if rule.api_version != API_VERSION {
        result.error(
            "apiVersion",
            format!("apiVersion must be '{}', got '{}'", API_VERSION, rule.api_version),
        );
    }
    if rule.kind != THRESHOLD_CONFIG_KIND {
        let message = format!("kind must be '{}', got '{}'", THRESHOLD_CONFIG_KIND, rule.kind);
        match fuzzy_match(&rule.kind, &[THRESHOLD_CONFIG_KIND]) {
            Some(s) => {
                result.error_with_suggestion("kind", message, format!("Did you mean '{}'?", s))
            }
            None => result.error("kind", message),
        }
    }

    let meta = &rule.metadata;
    if !is_kebab_case(&meta.id) {
        result.error(
            "metadata.id",
            format!(
                "id must be kebab-case (lowercase alphanumeric + hyphens), got '{}'",
                meta.id
            ),
        );
    }
    if meta.name.trim().is_empty() {
        result.error("metadata.name", "name must not be empty");
    }
    if meta.extends.as_deref() == Some(meta.id.as_str()) {
        result.error("metadata.extends", format!("profile '{}' extends itself", meta.id));
    }
}

fn validate_bounds(path: &str, bounds: &MultiplierBounds, result: &mut ValidationResult) {
    let mut well_formed = true;
    for (field, value) in [("min", bounds.min), ("max", bounds.max)] {
        if !value.is_finite() || value < 0.0 {
            well_formed = false;
            result.error(
                format!("{}.{}", path, field),
                format!("{} must be a finite non-negative number, got {}", field, value),
            );
        }
    }
    if !well_formed {
        return;
    }

    if bounds.min > bounds.max {
        result.error(
            path,
            format!("min ({}) must not exceed max ({})", bounds.min, bounds.max),
        );
    } else if bounds.min == bounds.max {
        result.warn(
            path,
            format!("min equals max ({}); the multiplier is a constant", bounds.min),
        );
    }
}

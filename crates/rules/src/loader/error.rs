//! Error types and load result structures for the profile loader.

use std::path::PathBuf;

/// Errors that can occur while loading or looking up threshold profiles.
#[derive(Debug, thiserror::Error)]
pub enum RuleError {
    /// Filesystem I/O error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parse/deserialization error.
    #[error("YAML parse error: {0}")]
    Parse(#[from] serde_yaml::Error),

    /// Profile validation error (e.g. missing id, broken extends chain).
    #[error("Validation error: {0}")]
    Validation(String),

    /// No loaded profile has the requested id.
    #[error("unknown threshold profile '{id}'{}", did_you_mean(.suggestion))]
    UnknownProfile {
        id: String,
        suggestion: Option<String>,
    },

    /// The profile exists but has `enabled: false`.
    #[error("threshold profile '{0}' is disabled")]
    Disabled(String),
}

fn did_you_mean(suggestion: &Option<String>) -> String {
    match suggestion {
        Some(s) => format!(" (did you mean '{}'?)", s),
        None => String::new(),
    }
}

/// Result alias for profile operations.
pub type Result<T> = std::result::Result<T, RuleError>;

/// Outcome of loading a single profile file.
#[derive(Debug)]
pub struct LoadResult {
    /// Path to the file that was loaded.
    pub path: PathBuf,
    /// Status of the load attempt.
    pub status: LoadStatus,
}

/// Status of a single file load attempt.
#[derive(Debug)]
pub enum LoadStatus {
    /// Profile was successfully loaded.
    Loaded { profile_id: String },
    /// File was skipped (dotfile, non-YAML, other rule kind).
    Skipped { reason: String },
    /// Parse or validation error occurred.
    Failed { error: String },
}

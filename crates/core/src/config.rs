use std::env;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Load .env file (silently ignores if missing).
pub fn load_dotenv() {
    dotenvy::dotenv().ok();
}

fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_opt(key: &str) -> Option<String> {
    env::var(key).ok().filter(|s| !s.is_empty())
}

/// Read a profiled env var: tries {PROFILE}_{KEY} first, falls back to {KEY}.
fn profiled_env_opt(profile: &str, key: &str) -> Option<String> {
    if !profile.is_empty() {
        let prefixed = format!("{}_{}", profile, key);
        if let Some(v) = env_opt(&prefixed) {
            return Some(v);
        }
    }
    env_opt(key)
}

fn profiled_env_or(profile: &str, key: &str, default: &str) -> String {
    profiled_env_opt(profile, key).unwrap_or_else(|| default.to_string())
}

fn profiled_env_usize(profile: &str, key: &str, default: usize) -> usize {
    profiled_env_opt(profile, key)
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

/// Profile id used when `SURGE_THRESHOLD_PROFILE` is unset. Resolves to the
/// built-in defaults even when no profile file with that id exists.
pub const DEFAULT_THRESHOLD_PROFILE: &str = "standard";

// ── Top-level config ──────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Active env profile name (empty = default).
    pub profile: String,
    /// Directory scanned for `ThresholdConfig` YAML documents.
    pub rules_dir: PathBuf,
    /// Threshold profile id applied when the caller does not pick one.
    pub threshold_profile: String,
    /// Worker threads for batch forecasting (0 = rayon default).
    pub parallelism: usize,
}

impl Config {
    /// Build config from environment variables (call `load_dotenv()` first).
    /// Profile is read from `SURGE_PROFILE`. When set (e.g. `PROD`), every key
    /// is first looked up as `{PROFILE}_{KEY}`, falling back to `{KEY}`.
    pub fn from_env() -> Self {
        let profile = env_or("SURGE_PROFILE", "").to_uppercase();
        Self::for_profile(&profile)
    }

    /// Build config for a specific named profile (empty string = default).
    pub fn for_profile(profile: &str) -> Self {
        let p = profile.to_uppercase();
        let p = p.as_str();
        Self {
            profile: p.to_string(),
            rules_dir: PathBuf::from(profiled_env_or(p, "SURGE_RULES_DIR", "data/thresholds")),
            threshold_profile: profiled_env_or(
                p,
                "SURGE_THRESHOLD_PROFILE",
                DEFAULT_THRESHOLD_PROFILE,
            ),
            parallelism: profiled_env_usize(p, "SURGE_PARALLELISM", 0),
        }
    }

    pub fn profile_label(&self) -> &str {
        if self.profile.is_empty() { "default" } else { &self.profile }
    }

    /// Print a summary for startup logs.
    pub fn log_summary(&self) {
        tracing::info!("Config loaded (profile: {}):", self.profile_label());
        tracing::info!("  rules_dir:          {}", self.rules_dir.display());
        tracing::info!("  threshold_profile:  {}", self.threshold_profile);
        tracing::info!("  parallelism:        {}", self.parallelism);
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            profile: String::new(),
            rules_dir: PathBuf::from("data/thresholds"),
            threshold_profile: DEFAULT_THRESHOLD_PROFILE.to_string(),
            parallelism: 0,
        }
    }
}

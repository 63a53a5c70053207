//! Core [`ProfileLoader`] struct: filesystem-backed threshold profile loading.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use surge_core::config::DEFAULT_THRESHOLD_PROFILE;

use crate::threshold_config::{CompiledThresholdConfig, ThresholdConfigRule, THRESHOLD_CONFIG_KIND};
use crate::validation::fuzzy::fuzzy_match;

use super::error::{LoadResult, LoadStatus, Result, RuleError};
use super::extends::resolve_extends;

/// Filesystem-backed threshold profile loader.
///
/// Scans a directory (recursively) for `*.yml` / `*.yaml` files, keeps the
/// `ThresholdConfig` documents, resolves their `extends` chains and maintains
/// an in-memory map keyed by profile id. The `standard` profile is always
/// available; a file with that id replaces the built-in one.
pub struct ProfileLoader {
    /// Root directory containing profile YAML files.
    rules_dir: PathBuf,
    /// Resolved profiles keyed by `metadata.id`.
    profiles: HashMap<String, ThresholdConfigRule>,
}

/// A parsed-but-unresolved document and where it came from.
struct RawProfile {
    path: PathBuf,
    value: serde_yaml::Value,
}

impl ProfileLoader {
    /// Create a loader for the given directory. Nothing is read until [`load_all`](Self::load_all).
    pub fn new(rules_dir: impl Into<PathBuf>) -> Self {
        let mut profiles = HashMap::new();
        profiles.insert(DEFAULT_THRESHOLD_PROFILE.to_string(), ThresholdConfigRule::standard());
        Self {
            rules_dir: rules_dir.into(),
            profiles,
        }
    }

    /// Recursively scan the rules directory and (re)load every profile.
    ///
    /// Dotfiles, non-YAML files and documents of other kinds are skipped.
    /// Parse errors and broken `extends` chains are reported per-file but do
    /// not abort the scan. A missing directory leaves only the built-in profile.
    pub fn load_all(&mut self) -> Result<Vec<LoadResult>> {
        let mut results = Vec::new();
        let mut raw: HashMap<String, RawProfile> = HashMap::new();

        if self.rules_dir.is_dir() {
            scan_dir_recursive(&self.rules_dir, &mut raw, &mut results)?;
        } else {
            warn!(
                path = %self.rules_dir.display(),
                "rules directory not found, using built-in profile only"
            );
        }

        let mut values: HashMap<String, serde_yaml::Value> = raw
            .iter()
            .map(|(id, profile)| (id.clone(), profile.value.clone()))
            .collect();
        if !values.contains_key(DEFAULT_THRESHOLD_PROFILE) {
            values.insert(
                DEFAULT_THRESHOLD_PROFILE.to_string(),
                serde_yaml::to_value(ThresholdConfigRule::standard())?,
            );
        }
        let resolved = resolve_extends(&values);

        let mut profiles = HashMap::new();
        profiles.insert(DEFAULT_THRESHOLD_PROFILE.to_string(), ThresholdConfigRule::standard());

        let mut ordered: Vec<(String, RawProfile)> = raw.into_iter().collect();
        ordered.sort_by(|a, b| a.1.path.cmp(&b.1.path));

        for (id, source) in ordered {
            let outcome = match resolved.get(&id) {
                Some(Ok(value)) => serde_yaml::from_value::<ThresholdConfigRule>(value.clone())
                    .map_err(|e| format!("failed to parse profile '{}': {}", id, e)),
                Some(Err(e)) => Err(e.clone()),
                None => Err(format!("profile '{}' was not resolved", id)),
            };

            match outcome {
                Ok(rule) => {
                    info!(
                        profile_id = %id,
                        path = %source.path.display(),
                        "loaded threshold profile"
                    );
                    profiles.insert(id.clone(), rule);
                    results.push(LoadResult {
                        path: source.path,
                        status: LoadStatus::Loaded { profile_id: id },
                    });
                }
                Err(error) => {
                    warn!(
                        profile_id = %id,
                        path = %source.path.display(),
                        error = %error,
                        "failed to load threshold profile"
                    );
                    results.push(LoadResult {
                        path: source.path,
                        status: LoadStatus::Failed { error },
                    });
                }
            }
        }

        self.profiles = profiles;
        Ok(results)
    }

    /// Directory scanned by [`load_all`](Self::load_all).
    pub fn rules_dir(&self) -> &Path {
        &self.rules_dir
    }

    /// Look up a resolved profile by id.
    pub fn profile(&self, id: &str) -> Option<&ThresholdConfigRule> {
        self.profiles.get(id)
    }

    /// All resolved profiles, ordered by id.
    pub fn profiles(&self) -> Vec<&ThresholdConfigRule> {
        let mut all: Vec<&ThresholdConfigRule> = self.profiles.values().collect();
        all.sort_by(|a, b| a.metadata.id.cmp(&b.metadata.id));
        all
    }

    /// Ids of all resolved profiles, sorted.
    pub fn profile_ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.profiles.keys().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }

    /// Compiled knobs of an enabled profile.
    pub fn compiled(&self, id: &str) -> Result<CompiledThresholdConfig> {
        match self.profiles.get(id) {
            Some(rule) if rule.metadata.enabled => Ok(rule.compile()),
            Some(_) => Err(RuleError::Disabled(id.to_string())),
            None => {
                let ids = self.profile_ids();
                Err(RuleError::UnknownProfile {
                    id: id.to_string(),
                    suggestion: fuzzy_match(id, &ids).map(str::to_string),
                })
            }
        }
    }
}

/// Recursively scan a directory for YAML profile documents.
fn scan_dir_recursive(
    dir: &Path,
    raw: &mut HashMap<String, RawProfile>,
    results: &mut Vec<LoadResult>,
) -> Result<()> {
    let mut entries = fs::read_dir(dir)?
        .map(|entry| entry.map(|e| e.path()))
        .collect::<std::io::Result<Vec<_>>>()?;
    entries.sort();

    for path in entries {
        // Skip dotfiles/dotdirs
        if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
            if name.starts_with('.') {
                if path.is_file() {
                    results.push(LoadResult {
                        path,
                        status: LoadStatus::Skipped {
                            reason: "dotfile".to_string(),
                        },
                    });
                }
                continue;
            }
        }

        if path.is_dir() {
            scan_dir_recursive(&path, raw, results)?;
            continue;
        }

        let is_yaml = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e == "yml" || e == "yaml")
            .unwrap_or(false);

        if !is_yaml {
            results.push(LoadResult {
                path,
                status: LoadStatus::Skipped {
                    reason: "not a YAML file".to_string(),
                },
            });
            continue;
        }

        match read_raw(&path) {
            Ok(Some((id, value))) => {
                if let Some(existing) = raw.get(&id) {
                    let error = format!(
                        "duplicate profile id '{}' (already defined in {})",
                        id,
                        existing.path.display()
                    );
                    warn!(
                        path = %path.display(),
                        error = %error,
                        "failed to load threshold profile"
                    );
                    results.push(LoadResult {
                        path,
                        status: LoadStatus::Failed { error },
                    });
                } else {
                    raw.insert(id, RawProfile { path, value });
                }
            }
            Ok(None) => {
                debug!(path = %path.display(), "skipping non-threshold document");
                results.push(LoadResult {
                    path,
                    status: LoadStatus::Skipped {
                        reason: format!("not a {} document", THRESHOLD_CONFIG_KIND),
                    },
                });
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "failed to read threshold profile");
                results.push(LoadResult {
                    path,
                    status: LoadStatus::Failed {
                        error: e.to_string(),
                    },
                });
            }
        }
    }

    Ok(())
}

/// First pass: parse a file as raw YAML and read `kind` and `metadata.id`.
///
/// Returns `None` for documents of another kind.
fn read_raw(path: &Path) -> Result<Option<(String, serde_yaml::Value)>> {
    let contents = fs::read_to_string(path)?;
    let value: serde_yaml::Value = serde_yaml::from_str(&contents)?;

    if value.get("kind").and_then(|k| k.as_str()) != Some(THRESHOLD_CONFIG_KIND) {
        return Ok(None);
    }

    let id = value
        .get("metadata")
        .and_then(|meta| meta.get("id"))
        .and_then(|id| id.as_str())
        .unwrap_or_default();
    if id.is_empty() {
        return Err(RuleError::Validation(
            "profile metadata.id must not be empty".to_string(),
        ));
    }

    Ok(Some((id.to_string(), value)))
}

//! Deep-merge and `extends` inheritance resolution for YAML profiles.

use std::collections::{HashMap, HashSet};

/// Maximum inheritance chain depth to prevent infinite loops.
const MAX_EXTENDS_DEPTH: usize = 5;

/// Deep-merge two YAML `Value` maps: child fields win, arrays replace entirely.
///
/// For map values: recursively merge. For all other types (scalars, arrays):
/// child value replaces parent.
pub fn deep_merge(parent: &serde_yaml::Value, child: &serde_yaml::Value) -> serde_yaml::Value {
    match (parent, child) {
        (serde_yaml::Value::Mapping(pm), serde_yaml::Value::Mapping(cm)) => {
            let mut merged = pm.clone();
            for (key, child_val) in cm {
                if let Some(parent_val) = pm.get(key) {
                    merged.insert(key.clone(), deep_merge(parent_val, child_val));
                } else {
                    merged.insert(key.clone(), child_val.clone());
                }
            }
            serde_yaml::Value::Mapping(merged)
        }
        // For scalars, arrays, etc.: child wins.
        (_, child) => child.clone(),
    }
}

/// Resolve `extends` chains: for each document with an `extends` field,
/// find the parent and deep-merge the YAML values.
///
/// Each id resolves independently, so a broken chain only fails the
/// documents that depend on it.
pub fn resolve_extends(
    raw_values: &HashMap<String, serde_yaml::Value>,
) -> HashMap<String, std::result::Result<serde_yaml::Value, String>> {
    let mut resolved: HashMap<String, serde_yaml::Value> = HashMap::new();

    raw_values
        .keys()
        .map(|id| {
            let mut in_progress = HashSet::new();
            let outcome = resolve_single(id, raw_values, &mut resolved, &mut in_progress, 0);
            (id.clone(), outcome)
        })
        .collect()
}

/// Read `metadata.extends` from a raw document.
fn parent_of(raw: &serde_yaml::Value) -> Option<&str> {
    raw.get("metadata")
        .and_then(|meta| meta.get("extends"))
        .and_then(|v| v.as_str())
}

fn resolve_single(
    id: &str,
    raw_values: &HashMap<String, serde_yaml::Value>,
    resolved: &mut HashMap<String, serde_yaml::Value>,
    in_progress: &mut HashSet<String>,
    depth: usize,
) -> std::result::Result<serde_yaml::Value, String> {
    if let Some(val) = resolved.get(id) {
        return Ok(val.clone());
    }

    if in_progress.contains(id) {
        return Err(format!("circular extends chain detected for profile '{}'", id));
    }

    if depth > MAX_EXTENDS_DEPTH {
        return Err(format!(
            "extends chain exceeds maximum depth ({}) for profile '{}'",
            MAX_EXTENDS_DEPTH, id
        ));
    }

    let raw = raw_values
        .get(id)
        .ok_or_else(|| format!("profile '{}' not found for extends resolution", id))?;

    let result = match parent_of(raw) {
        Some(parent_id) => {
            in_progress.insert(id.to_string());
            let parent_val =
                resolve_single(parent_id, raw_values, resolved, in_progress, depth + 1)?;
            in_progress.remove(id);
            deep_merge(&parent_val, raw)
        }
        None => raw.clone(),
    };

    resolved.insert(id.to_string(), result.clone());
    Ok(result)
}

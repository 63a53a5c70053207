//! Tests for the profile loader module.

use std::collections::HashMap;
use std::fs;

use tempfile::TempDir;

use super::*;
use crate::threshold_config::{MultiplierBounds, ThresholdConfigSpec};

const BASE_YAML: &str = r#"
apiVersion: v1
kind: ThresholdConfig
metadata:
  id: base
  name: Base
  tags: [team-a]
spec:
  std_multiplier: 4
  spike_multiplier:
    min: 4
    max: 7
"#;

const CHILD_YAML: &str = r#"
apiVersion: v1
kind: ThresholdConfig
metadata:
  id: child
  name: Child
  extends: base
spec:
  spike_multiplier:
    max: 9
"#;

fn temp_loader() -> (TempDir, ProfileLoader) {
    let dir = TempDir::new().expect("create tempdir");
    let loader = ProfileLoader::new(dir.path());
    (dir, loader)
}

fn count(results: &[LoadResult], pred: fn(&LoadStatus) -> bool) -> usize {
    results.iter().filter(|r| pred(&r.status)).count()
}

#[test]
fn standard_is_available_before_loading() {
    let (_dir, loader) = temp_loader();
    assert_eq!(loader.compiled("standard").unwrap(), ThresholdConfigSpec::default());
}

#[test]
fn load_all_skips_dotfiles_non_yaml_and_other_kinds() {
    let (dir, mut loader) = temp_loader();
    fs::write(dir.path().join("base.yml"), BASE_YAML).unwrap();
    fs::write(dir.path().join(".hidden.yml"), BASE_YAML).unwrap();
    fs::write(dir.path().join("readme.txt"), "not a profile").unwrap();
    fs::write(
        dir.path().join("trend.yaml"),
        "apiVersion: v1\nkind: TrendConfig\nmetadata:\n  id: trend\n  name: Trend\n",
    )
    .unwrap();

    let results = loader.load_all().unwrap();

    assert_eq!(count(&results, |s| matches!(s, LoadStatus::Loaded { .. })), 1);
    assert_eq!(count(&results, |s| matches!(s, LoadStatus::Skipped { .. })), 3);
    assert_eq!(loader.profile_ids(), vec!["base", "standard"]);

    let base = loader.compiled("base").unwrap();
    assert_eq!(base.std_multiplier, 4.0);
    assert_eq!(base.bursty_multiplier, MultiplierBounds { min: 2.0, max: 5.0 });
}

#[test]
fn extends_deep_merges_parent() {
    let (dir, mut loader) = temp_loader();
    fs::write(dir.path().join("base.yml"), BASE_YAML).unwrap();
    fs::create_dir(dir.path().join("teams")).unwrap();
    fs::write(dir.path().join("teams").join("child.yml"), CHILD_YAML).unwrap();

    let results = loader.load_all().unwrap();
    assert_eq!(count(&results, |s| matches!(s, LoadStatus::Loaded { .. })), 2);

    let child = loader.profile("child").unwrap();
    assert_eq!(child.metadata.name, "Child");
    assert_eq!(child.metadata.tags.as_deref(), Some(&["team-a".to_string()][..]));
    assert_eq!(child.spec.std_multiplier, 4.0);
    assert_eq!(child.spec.spike_multiplier, MultiplierBounds { min: 4.0, max: 9.0 });
}

#[test]
fn extends_builtin_standard_without_file() {
    let (dir, mut loader) = temp_loader();
    let yaml = r#"
apiVersion: v1
kind: ThresholdConfig
metadata:
  id: calmer
  name: Calmer
  extends: standard
spec:
  std_multiplier: 6
"#;
    fs::write(dir.path().join("calmer.yml"), yaml).unwrap();
    loader.load_all().unwrap();

    let calmer = loader.compiled("calmer").unwrap();
    assert_eq!(calmer.std_multiplier, 6.0);
    assert_eq!(calmer.spike_multiplier, MultiplierBounds { min: 5.0, max: 8.0 });
}

#[test]
fn broken_chain_fails_only_dependents() {
    let (dir, mut loader) = temp_loader();
    fs::write(dir.path().join("base.yml"), BASE_YAML).unwrap();
    let orphan = CHILD_YAML
        .replace("extends: base", "extends: missing")
        .replace("id: child", "id: orphan");
    fs::write(dir.path().join("orphan.yml"), orphan).unwrap();

    let results = loader.load_all().unwrap();
    assert_eq!(count(&results, |s| matches!(s, LoadStatus::Loaded { .. })), 1);
    let failed: Vec<_> = results
        .iter()
        .filter_map(|r| match &r.status {
            LoadStatus::Failed { error } => Some(error.as_str()),
            _ => None,
        })
        .collect();
    assert_eq!(failed.len(), 1);
    assert!(failed[0].contains("'missing' not found"), "{}", failed[0]);
    assert!(loader.profile("orphan").is_none());
}

#[test]
fn circular_extends_is_reported() {
    let (dir, mut loader) = temp_loader();
    let a = CHILD_YAML.replace("id: child", "id: a").replace("extends: base", "extends: b");
    let b = CHILD_YAML.replace("id: child", "id: b").replace("extends: base", "extends: a");
    fs::write(dir.path().join("a.yml"), a).unwrap();
    fs::write(dir.path().join("b.yml"), b).unwrap();

    let results = loader.load_all().unwrap();
    assert_eq!(count(&results, |s| matches!(s, LoadStatus::Failed { .. })), 2);
    for r in &results {
        if let LoadStatus::Failed { error } = &r.status {
            assert!(error.contains("circular"), "{}", error);
        }
    }
}

#[test]
fn duplicate_ids_keep_first_file() {
    let (dir, mut loader) = temp_loader();
    fs::write(dir.path().join("a-base.yml"), BASE_YAML).unwrap();
    let shadow = BASE_YAML.replace("std_multiplier: 4", "std_multiplier: 9");
    fs::write(dir.path().join("b-base.yml"), shadow).unwrap();

    let results = loader.load_all().unwrap();
    assert_eq!(count(&results, |s| matches!(s, LoadStatus::Failed { .. })), 1);
    assert_eq!(loader.compiled("base").unwrap().std_multiplier, 4.0);
}

#[test]
fn unknown_profile_suggests_close_id() {
    let (dir, mut loader) = temp_loader();
    fs::write(dir.path().join("base.yml"), BASE_YAML).unwrap();
    loader.load_all().unwrap();

    match loader.compiled("bsae") {
        Err(RuleError::UnknownProfile { id, suggestion }) => {
            assert_eq!(id, "bsae");
            assert_eq!(suggestion.as_deref(), Some("base"));
        }
        other => panic!("expected UnknownProfile, got {:?}", other),
    }
}

#[test]
fn disabled_profile_cannot_be_compiled() {
    let (dir, mut loader) = temp_loader();
    let disabled = BASE_YAML.replace("name: Base", "name: Base\n  enabled: false");
    fs::write(dir.path().join("base.yml"), disabled).unwrap();
    loader.load_all().unwrap();

    assert!(loader.profile("base").is_some());
    assert!(matches!(loader.compiled("base"), Err(RuleError::Disabled(_))));
}

#[test]
fn invalid_yaml_is_reported_per_file() {
    let (dir, mut loader) = temp_loader();
    fs::write(dir.path().join("base.yml"), BASE_YAML).unwrap();
    fs::write(dir.path().join("broken.yml"), "kind: [unclosed").unwrap();

    let results = loader.load_all().unwrap();
    assert_eq!(count(&results, |s| matches!(s, LoadStatus::Loaded { .. })), 1);
    assert_eq!(count(&results, |s| matches!(s, LoadStatus::Failed { .. })), 1);
}

#[test]
fn rules_dir_is_the_scanned_directory() {
    let (dir, mut loader) = temp_loader();
    assert_eq!(loader.rules_dir(), dir.path());
    loader.load_all().unwrap();
    assert_eq!(loader.rules_dir(), dir.path());
}

#[test]
fn missing_directory_keeps_builtin_profile() {
    let mut loader = ProfileLoader::new("/definitely/not/here");
    let results = loader.load_all().unwrap();
    assert!(results.is_empty());
    assert_eq!(loader.profile_ids(), vec!["standard"]);
}

#[test]
fn deep_merge_replaces_scalars_and_merges_maps() {
    let parent: serde_yaml::Value =
        serde_yaml::from_str("a: 1\nnested:\n  x: 1\n  y: 2\nlist: [1, 2]").unwrap();
    let child: serde_yaml::Value =
        serde_yaml::from_str("a: 2\nnested:\n  y: 3\nlist: [9]").unwrap();
    let merged = deep_merge(&parent, &child);
    let expected: serde_yaml::Value =
        serde_yaml::from_str("a: 2\nnested:\n  x: 1\n  y: 3\nlist: [9]").unwrap();
    assert_eq!(merged, expected);
}

#[test]
fn resolve_extends_reports_each_id() {
    let mut raw = HashMap::new();
    raw.insert("base".to_string(), serde_yaml::from_str::<serde_yaml::Value>(BASE_YAML).unwrap());
    raw.insert("child".to_string(), serde_yaml::from_str::<serde_yaml::Value>(CHILD_YAML).unwrap());
    let resolved = resolve_extends(&raw);
    assert!(resolved["base"].is_ok());
    let child = resolved["child"].as_ref().unwrap();
    assert_eq!(child["spec"]["spike_multiplier"]["min"].as_f64(), Some(4.0));
}

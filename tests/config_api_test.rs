//! Integration tests for config loading through the public API.

use drainage::config::{
    apply_env_overrides_with, load_config, load_resolved, validate, ConfigPaths, DrainageConfig,
    InitiationMethod,
};
use drainage::DrainageError;
use std::collections::HashMap;
use std::fs;
use tempfile::TempDir;

fn project(files: &[(&str, &str)]) -> (TempDir, ConfigPaths) {
    let temp = TempDir::new().unwrap();
    let dir = temp.path().join(".drainage");
    fs::create_dir_all(&dir).unwrap();
    for (name, content) in files {
        fs::write(dir.join(name), content).unwrap();
    }
    let paths = ConfigPaths {
        user_global: None,
        ..ConfigPaths::discover(temp.path())
    };
    (temp, paths)
}

#[test]
fn full_config_round_trips_through_yaml() {
    let (_temp, paths) = project(&[(
        "config.yml",
        r#"
toolbox:
  executable: /usr/bin/saga_cmd
  timeout_secs: 600
  keep_temporary: true
  env:
    SAGA_TLB: /usr/lib/saga
defaults:
  min_slope: 0.1
  catchment_method: dinf
  threshold: 5000
channels:
  initiation: equals
  max_divergence_cells: 5
  min_segment_length: 20
output:
  directory: results
  mode: quiet
"#,
    )]);

    let config = load_config(&paths).unwrap();
    validate(&config).unwrap();

    assert_eq!(config.toolbox.timeout_secs, Some(600));
    assert_eq!(config.toolbox.env["SAGA_TLB"], "/usr/lib/saga");
    assert_eq!(config.defaults.catchment_method.map(|m| m.index()), Some(3));
    assert_eq!(config.channels.initiation, InitiationMethod::Equals);
    assert_eq!(config.channels.initiation.index(), 1);
    assert_eq!(config.channels.min_segment_length, 20);
}

#[test]
fn local_file_overrides_nested_keys_only() {
    let (_temp, paths) = project(&[
        (
            "config.yml",
            "channels:\n  max_divergence_cells: 4\n  min_segment_length: 30\n",
        ),
        ("config.local.yml", "channels:\n  min_segment_length: 8\n"),
    ]);

    let config = load_config(&paths).unwrap();
    assert_eq!(config.channels.max_divergence_cells, 4);
    assert_eq!(config.channels.min_segment_length, 8);
}

#[test]
fn unknown_keys_are_rejected() {
    let (_temp, paths) = project(&[("config.yml", "defaults:\n  treshold: 10\n")]);
    let err = load_config(&paths).unwrap_err();
    assert!(matches!(err, DrainageError::ConfigParseError { .. }));
    assert!(err.to_string().contains("treshold"));
}

#[test]
fn unknown_catchment_method_is_rejected() {
    let (_temp, paths) = project(&[("config.yml", "defaults:\n  catchment_method: steepest\n")]);
    assert!(load_config(&paths).is_err());
}

#[test]
fn resolved_config_is_validated() {
    let (_temp, paths) = project(&[("config.yml", "defaults:\n  threshold: -3\n")]);
    let err = load_resolved(&paths).unwrap_err();
    assert!(matches!(err, DrainageError::ConfigValidationError { .. }));
    assert!(err.is_usage_error());
}

#[test]
fn env_overrides_apply_last() {
    let (_temp, paths) = project(&[("config.yml", "toolbox:\n  executable: saga_cmd\n")]);
    let mut config = load_config(&paths).unwrap();
    let vars: HashMap<&str, &str> = [("DRAINAGE_SAGA_CMD", "/opt/saga/saga_cmd")]
        .into_iter()
        .collect();

    apply_env_overrides_with(&mut config, |k| vars.get(k).map(|v| v.to_string()));
    assert_eq!(config.toolbox.executable, "/opt/saga/saga_cmd");
}

#[test]
fn defaults_match_channel_constants() {
    let config = DrainageConfig::default();
    assert_eq!(config.channels.initiation.index(), 2);
    assert_eq!(config.channels.max_divergence_cells, 10);
    assert_eq!(config.channels.min_segment_length, 10);
    assert_eq!(config.toolbox.executable, "saga_cmd");
}

//! Integration tests for `alertgate config` command.
//!
//! Tests config validation and display functionality with real TOML files.

use std::fs;
use tempfile::TempDir;

use alertgate_core::config::AlertgateConfig;

#[tokio::test]
async fn test_config_validate_valid_toml() {
    // Given: A valid config file
    let temp_dir = TempDir::new().expect("should create temp dir");
    let config_path = temp_dir.path().join("alertgate.toml");

    let valid_config = r#"
[general]
log_level = "info"
log_format = "json"

[stream]
accepted_categories = ["neb", "storage"]
element_type = "metric"
host_status = [0, 1, 2]
service_status = [0, 1, 2, 3]
hard_only = 1
"#;

    fs::write(&config_path, valid_config).expect("should write config");

    // When: Loading the config
    let result = AlertgateConfig::load(&config_path).await;

    // Then: Should succeed
    assert!(result.is_ok(), "valid config should load successfully");
}

#[tokio::test]
async fn test_config_validate_malformed_toml() {
    // Given: A malformed TOML file
    let temp_dir = TempDir::new().expect("should create temp dir");
    let config_path = temp_dir.path().join("bad.toml");

    let malformed_config = r#"
[stream
element_type = "metric"
"#;

    fs::write(&config_path, malformed_config).expect("should write bad config");

    // When: Loading the config
    let result = AlertgateConfig::load(&config_path).await;

    // Then: Should fail
    assert!(result.is_err(), "malformed TOML should fail to load");
}

#[tokio::test]
async fn test_config_validate_missing_file() {
    // Given: A nonexistent file path
    let config_path = std::path::PathBuf::from("/nonexistent/alertgate.toml");

    // When: Loading the config
    let result = AlertgateConfig::load(&config_path).await;

    // Then: Should fail
    assert!(result.is_err(), "missing file should fail to load");
}

#[tokio::test]
async fn test_config_validate_empty_file() {
    // Given: An empty config file
    let temp_dir = TempDir::new().expect("should create temp dir");
    let config_path = temp_dir.path().join("empty.toml");

    fs::write(&config_path, "").expect("should write empty file");

    // When: Loading the config
    let result = AlertgateConfig::load(&config_path).await;

    // Then: Should succeed with defaults
    assert!(result.is_ok(), "empty config should use defaults");
    let config = result.expect("config should load");
    assert_eq!(config.stream.element_type, "metric");
    assert_eq!(config.stream.hard_only, 1, "hard-only filtering is the default");
    assert!(config.stream.skip_anon_events);
}

#[tokio::test]
async fn test_config_show_full_config() {
    // Given: A full config file
    let temp_dir = TempDir::new().expect("should create temp dir");
    let config_path = temp_dir.path().join("alertgate.toml");

    let full_config = r#"
[general]
log_level = "debug"
log_format = "pretty"

[stream]
accepted_categories = ["neb", "storage", "bam"]
element_type = "host_status"
host_status = [0, 2]
service_status = [1, 2]
hard_only = 0
acknowledged = 1
in_downtime = 1
skip_anon_events = false
max_buffer_size = 100
max_buffer_age = 60
"#;

    fs::write(&config_path, full_config).expect("should write config");

    // When: Loading the config
    let result = AlertgateConfig::load(&config_path).await;

    // Then: Should succeed and contain all sections
    assert!(result.is_ok(), "full config should load: {:?}", result.err());
    let config = result.expect("config should load");

    assert_eq!(config.general.log_level, "debug");
    assert_eq!(config.general.log_format, "pretty");
    assert_eq!(config.stream.accepted_categories.len(), 3);
    assert_eq!(config.stream.element_type, "host_status");
    assert_eq!(config.stream.host_status, vec![0, 2]);
    assert_eq!(config.stream.service_status, vec![1, 2]);
    assert_eq!(config.stream.hard_only, 0);
    assert_eq!(config.stream.acknowledged, 1);
    assert_eq!(config.stream.in_downtime, 1);
    assert!(!config.stream.skip_anon_events);
    assert_eq!(config.stream.max_buffer_size, 100);
    assert_eq!(config.stream.max_buffer_age, 60);
}

#[tokio::test]
async fn test_config_rejects_unknown_category() {
    // Given: A config naming a category outside the taxonomy
    let temp_dir = TempDir::new().expect("should create temp dir");
    let config_path = temp_dir.path().join("alertgate.toml");

    let config = r#"
[stream]
accepted_categories = ["neb", "nonsense"]
"#;

    fs::write(&config_path, config).expect("should write config");

    // When: Loading the config
    let result = AlertgateConfig::load(&config_path).await;

    // Then: Validation should fail and name the bad category
    let err = result.expect_err("unknown category should fail validation");
    assert!(
        err.to_string().contains("nonsense"),
        "error should name the category: {}",
        err
    );
}

#[tokio::test]
async fn test_config_rejects_unresolvable_element_type() {
    // Given: An element type that belongs to none of the accepted categories
    let temp_dir = TempDir::new().expect("should create temp dir");
    let config_path = temp_dir.path().join("alertgate.toml");

    let config = r#"
[stream]
accepted_categories = ["storage"]
element_type = "host_status"
"#;

    fs::write(&config_path, config).expect("should write config");

    // When: Loading the config
    let result = AlertgateConfig::load(&config_path).await;

    // Then: Validation should fail at startup, not at runtime
    let err = result.expect_err("unresolvable element type should fail validation");
    assert!(
        err.to_string().contains("host_status"),
        "error should name the element type: {}",
        err
    );
}

#[tokio::test]
async fn test_config_rejects_out_of_range_threshold() {
    // Given: A threshold outside 0..=1
    let temp_dir = TempDir::new().expect("should create temp dir");
    let config_path = temp_dir.path().join("alertgate.toml");

    let config = r#"
[stream]
hard_only = 7
"#;

    fs::write(&config_path, config).expect("should write config");

    // When: Loading the config
    let result = AlertgateConfig::load(&config_path).await;

    // Then: Should fail
    let err = result.expect_err("threshold 7 should fail validation");
    assert!(err.to_string().contains("hard_only"), "error: {}", err);
}

#[tokio::test]
async fn test_config_boundary_values() {
    // Given: A config with boundary buffer values
    let temp_dir = TempDir::new().expect("should create temp dir");
    let config_path = temp_dir.path().join("boundary.toml");

    let boundary_config = r#"
[stream]
max_buffer_size = 1
max_buffer_age = 1
"#;

    fs::write(&config_path, boundary_config).expect("should write config");

    // When: Loading the config
    let result = AlertgateConfig::load(&config_path).await;

    // Then: Should accept boundary values
    assert!(result.is_ok(), "boundary values should be accepted");
    let config = result.expect("config should load");
    assert_eq!(config.stream.max_buffer_size, 1);
    assert_eq!(config.stream.max_buffer_age, 1);
}

#[tokio::test]
async fn test_config_ignores_unknown_keys() {
    // Given: A config with keys this version does not know
    let temp_dir = TempDir::new().expect("should create temp dir");
    let config_path = temp_dir.path().join("future.toml");

    let future_config = r#"
[stream]
element_type = "metric"
some_future_knob = "whatever"

[unknown_section]
x = 1
"#;

    fs::write(&config_path, future_config).expect("should write config");

    // When: Loading the config
    let result = AlertgateConfig::load(&config_path).await;

    // Then: Unknown keys are ignored, known keys still apply
    assert!(result.is_ok(), "unknown keys should be ignored: {:?}", result.err());
    let config = result.expect("config should load");
    assert_eq!(config.stream.element_type, "metric");
}

#[tokio::test]
async fn test_config_unicode_values() {
    // Given: A config with unicode in a free-form field
    let temp_dir = TempDir::new().expect("should create temp dir");
    let config_path = temp_dir.path().join("unicode.toml");

    // element_type must still resolve, so unicode goes in an ignored key
    let unicode_config = r#"
[general]
log_level = "info"

[stream]
element_type = "metric"
comment = "운영 환경 설정"
"#;

    fs::write(&config_path, unicode_config).expect("should write unicode config");

    // When: Loading the config
    let result = AlertgateConfig::load(&config_path).await;

    // Then: Should load fine
    assert!(result.is_ok(), "unicode config should load: {:?}", result.err());
}

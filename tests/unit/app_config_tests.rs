/*!
 * Tests for application configuration functionality
 */

use segalign::app_config::{Config, LogLevel, SegmentationConfig};
use segalign::resource::{CopyOptions, CreateOptions, VariantOptions};

use crate::common::{self, loc};

/// Test default configuration values
#[test]
fn test_default_config_withNoParameters_shouldHaveCorrectDefaults() {
    let config = Config::default();

    assert_eq!(config.source_locale, "en");
    assert_eq!(config.target_locales, vec!["fr"]);
    assert_eq!(config.log_level, LogLevel::Info);
    assert_eq!(config.alignment.variant_options, VariantOptions::MODIFY_SOURCE_AND_ASSOCIATED_TARGETS);
    assert_eq!(config.alignment.copy_options, CopyOptions::COPY_TO_NONE);
    assert_eq!(config.targets.creation_options, CreateOptions::COPY_SEGMENTS);
    assert!(!config.targets.overwrite_existing);
    assert!(!config.segmentation.include_trailing_whitespace);
}

/// Test configuration validation
#[test]
fn test_config_validation_withVariousConfigs_shouldValidateCorrectly() {
    let mut config = Config::default();
    assert!(config.validate().is_ok());

    config.source_locale = "not a locale".to_string();
    assert!(config.validate().is_err());
    config.source_locale = "en".to_string();

    config.target_locales.clear();
    assert!(config.validate().is_err());

    config.target_locales = vec!["fr".to_string(), "en".to_string()];
    assert!(config.validate().is_err());

    config.target_locales = vec!["fr-CA".to_string(), "de".to_string()];
    assert!(config.validate().is_ok());
    assert_eq!(config.target_locales().unwrap(), vec![loc("fr-CA"), loc("de")]);

    config.segmentation.exception_pattern = Some("(".to_string());
    assert!(config.validate().is_err());
    config.segmentation.exception_pattern = None;
    assert!(config.validate().is_ok());
}

/// Test that option flags are read from their JSON names
#[test]
fn test_config_deserialize_withFlagNames_shouldParseOptions() {
    let json = r#"{
        "alignment": {
            "variant_options": "MODIFY_SOURCE | MODIFY_TARGET",
            "copy_options": "COPY_TO_ALL"
        },
        "targets": { "creation_options": "COPY_ALL", "overwrite_existing": true }
    }"#;
    let config: Config = serde_json::from_str(json).unwrap();

    assert_eq!(
        config.alignment.variant_options,
        VariantOptions::MODIFY_SOURCE | VariantOptions::MODIFY_TARGET
    );
    assert_eq!(config.alignment.copy_options, CopyOptions::COPY_TO_ALL);
    assert_eq!(config.targets.creation_options, CreateOptions::COPY_ALL);
    assert!(config.targets.overwrite_existing);
    assert_eq!(config.segmentation, SegmentationConfig::default());
}

/// Test saving and loading a configuration file
#[test]
fn test_config_saveThenLoad_shouldMatch() {
    let dir = common::create_temp_dir().unwrap();
    let path = dir.path().join("conf.json");
    let mut config = Config::default();
    config.target_locales = vec!["ja".to_string()];
    config.log_level = LogLevel::Trace;

    config.save(&path).unwrap();
    let loaded = Config::load(&path).unwrap();

    assert_eq!(loaded, config);
}

/// Test that a malformed file is reported
#[test]
fn test_config_load_withMalformedJson_shouldFail() {
    let dir = common::create_temp_dir().unwrap();
    let path = common::create_test_file(dir.path(), "bad.json", "{ not json").unwrap();
    assert!(Config::load(&path).is_err());
    assert!(Config::load(dir.path().join("missing.json")).is_err());
}

/*!
 * Tests for application configuration
 */

use anyhow::Result;
use std::path::Path;
use tabtrans::app_config::{ColumnPair, Config, LogLevel};
use tabtrans::language_utils::source_language_for_path;

use crate::common;

/// Test that the default configuration matches the corpus layout
#[test]
fn test_default_config_shouldHaveResponseColumnPairs() {
    let config = Config::default();
    assert_eq!(
        config.column_pairs,
        vec![
            ColumnPair::new("initial_response", "gtrans_initial_response"),
            ColumnPair::new("final_response", "gtrans_final_response"),
        ]
    );
    assert_eq!(config.target_language, "en");
    assert_eq!(config.translation.fallback_source_language, "en");
    assert_eq!(config.translation.max_split_depth, 1);
    assert_eq!(config.discovery.checkpoint_marker, "checkpoint");
    assert_eq!(config.language_directories.len(), 5);
}

/// Test that a partial JSON file is completed with defaults
#[test]
fn test_load_withPartialJson_shouldFillDefaults() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_test_file(
        temp_dir.path(),
        "conf.json",
        r#"{ "workers": 3, "log_level": "debug", "translation": { "max_retries": 5 } }"#,
    )?;

    let config = Config::load(&path)?;

    assert_eq!(config.workers, 3);
    assert_eq!(config.log_level, LogLevel::Debug);
    assert_eq!(config.translation.max_retries, 5);
    assert_eq!(config.translation.retry_backoff_ms, 1500);
    assert_eq!(config.column_pairs.len(), 2);
    Ok(())
}

/// Test that a missing config file is created with defaults
#[test]
fn test_load_or_create_withMissingFile_shouldWriteDefault() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = temp_dir.path().join("conf.json");

    let config = Config::load_or_create(&path)?;

    assert!(path.exists());
    let reloaded = Config::load(&path)?;
    assert_eq!(reloaded.column_pairs, config.column_pairs);
    Ok(())
}

/// Test that invalid values are rejected
#[test]
fn test_validate_withInvalidValues_shouldFail() {
    let mut config = Config::default();
    config.column_pairs.clear();
    assert!(config.validate().is_err());

    let mut config = Config::default();
    config.column_pairs = vec![ColumnPair::new("text", "text")];
    assert!(config.validate().is_err());

    let mut config = Config::default();
    config.language_directories.insert("klingon".to_string(), "tlhx".to_string());
    assert!(config.validate().is_err());

    let mut config = Config::default();
    config.provider.endpoint = "::not a url".to_string();
    assert!(config.validate().is_err());
}

/// Test that malformed JSON surfaces as an error
#[test]
fn test_load_withMalformedJson_shouldFail() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_test_file(temp_dir.path(), "conf.json", "{ workers: ")?;
    assert!(Config::load(&path).is_err());
    Ok(())
}

/// Test that user-written directory keys match regardless of case
#[test]
fn test_load_withCapitalizedDirectoryKey_shouldResolveFiles() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_test_file(
        temp_dir.path(),
        "conf.json",
        r#"{ "language_directories": { "Hindi": "hi", "Bengali": "bn" } }"#,
    )?;

    let config = Config::load(&path)?;
    config.validate()?;

    let (_, code) = source_language_for_path(Path::new("corpus/hindi/a.csv"), &config.language_directories);
    assert_eq!(code, Some("hi"));
    let (_, code) = source_language_for_path(Path::new("corpus/Bengali/a.csv"), &config.language_directories);
    assert_eq!(code, Some("bn"));
    Ok(())
}

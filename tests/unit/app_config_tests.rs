/*!
 * Tests for application configuration
 */

use anyhow::Result;
use edlforge::app_config::{Config, ExportConfig, LogLevel};
use edlforge::timecode::TcFormat;
use edlforge::validation::{FailPolicy, ReportFormat};
use crate::common;

/// Test default configuration values
#[test]
fn test_default_config_shouldHaveDocumentedDefaults() {
    let config = Config::default();

    assert_eq!(config.preflight.default_fps, 25.0);
    assert_eq!(config.preflight.supported_fps, vec![23.976, 24.0, 25.0, 29.97, 30.0, 50.0, 59.94, 60.0]);
    assert_eq!(config.preflight.fps_tolerance, 0.01);
    assert_eq!(config.preflight.max_reel_length, 32);
    assert_eq!(config.preflight.default_tc_format, TcFormat::Ndf);
    assert_eq!(config.preflight.policy, FailPolicy::FailFast);
    assert_eq!(config.export.report_format, ReportFormat::Text);
    assert_eq!(config.log_level, LogLevel::Info);
}

/// Test config validation rejects unusable engine settings
#[test]
fn test_validate_withInvalidPreflightSettings_shouldFail() {
    let mut config = Config::default();
    config.preflight.default_fps = -1.0;
    assert!(config.validate().is_err());

    let mut config = Config::default();
    config.preflight.fps_tolerance = f64::NAN;
    assert!(config.validate().is_err());

    let mut config = Config::default();
    config.export.title = Some("Two\nLines".to_string());
    assert!(config.validate().is_err());
}

/// Test config serialization uses the documented JSON spelling
#[test]
fn test_serialize_shouldUseLowercaseEnums() -> Result<()> {
    let mut config = Config::default();
    config.preflight.policy = FailPolicy::Lenient;
    config.preflight.default_tc_format = TcFormat::Df;
    config.export.report_format = ReportFormat::Json;

    let json = serde_json::to_value(&config)?;

    assert_eq!(json["preflight"]["policy"], "lenient");
    assert_eq!(json["preflight"]["default_tc_format"], "DF");
    assert_eq!(json["export"]["report_format"], "json");
    assert_eq!(json["log_level"], "info");
    Ok(())
}

/// Test loading a partial config file from disk
#[test]
fn test_fromFile_withPartialConfig_shouldFillDefaults() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_test_file(
        temp_dir.path(),
        "conf.json",
        r#"{"preflight": {"default_fps": 24}, "export": {"write_report": false}}"#,
    )?;

    let config = Config::from_file(&path)?;

    assert_eq!(config.preflight.default_fps, 24.0);
    assert_eq!(config.preflight.max_reel_length, 32);
    assert!(!config.export.write_report);
    assert_eq!(config.export, ExportConfig { write_report: false, ..Default::default() });
    Ok(())
}

/// Test loading a broken config file reports the path
#[test]
fn test_fromFile_withInvalidJson_shouldFail() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_test_file(temp_dir.path(), "conf.json", "{ not json")?;

    let err = Config::from_file(&path).unwrap_err();
    assert!(err.to_string().contains("Failed to parse config file"));
    Ok(())
}

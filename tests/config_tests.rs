// SPDX-License-Identifier: MPL-2.0

//! Integration tests for configuration module

use byebye_scanner::Config;
use byebye_scanner::app::ScanMode;
use std::time::Duration;

#[test]
fn test_config_default() {
    let config = Config::default();

    assert_eq!(config.default_mode, ScanMode::Qr);
    assert_eq!(config.indicator_period(), Duration::from_millis(2000));
    assert_eq!(config.indicator_fps, 30);
    assert_eq!(config.permission_timeout(), Duration::from_secs(30));
}

#[test]
fn test_missing_file_gives_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let config = Config::load_from(&dir.path().join("nope.json")).unwrap();
    assert_eq!(config, Config::default());
}

#[test]
fn test_save_and_load() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("config.json");

    let config = Config {
        default_mode: ScanMode::Barcode,
        indicator_period_ms: 1500,
        indicator_fps: 60,
        permission_timeout_ms: 5000,
    };
    config.save_to(&path).unwrap();

    assert_eq!(Config::load(Some(&path)).unwrap(), config);
}

#[test]
fn test_partial_file_fills_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.json");
    std::fs::write(&path, r#"{ "default_mode": "barcode" }"#).unwrap();

    let config = Config::load_from(&path).unwrap();
    assert_eq!(config.default_mode, ScanMode::Barcode);
    assert_eq!(config.indicator_fps, Config::default().indicator_fps);
}

#[test]
fn test_out_of_range_values_are_clamped() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.json");
    std::fs::write(
        &path,
        r#"{ "indicator_period_ms": 0, "indicator_fps": 0, "permission_timeout_ms": 1 }"#,
    )
    .unwrap();

    let config = Config::load_from(&path).unwrap();
    assert!(config.indicator_period_ms >= 100);
    assert_eq!(config.indicator_fps, 1);
    assert_eq!(config.frame_interval(), Duration::from_secs(1));
    assert!(config.permission_timeout_ms >= 100);

    let fast = Config {
        indicator_fps: 10_000,
        ..Config::default()
    }
    .sanitized();
    assert_eq!(fast.indicator_fps, 120);
}

#[test]
fn test_invalid_json_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.json");
    std::fs::write(&path, "{ default_mode: ").unwrap();

    let err = Config::load_from(&path).unwrap_err();
    assert!(err.to_string().starts_with("Configuration error"));
}

#[test]
fn test_unknown_mode_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.json");
    std::fs::write(&path, r#"{ "default_mode": "aztec" }"#).unwrap();

    assert!(Config::load_from(&path).is_err());
}

//! Configuration loading tests: defaults, TOML file and `ACS712_*` overrides.

use acs712_daq::config::MonitorConfig;
use acs712_daq::error::DaqError;
use serial_test::serial;
use std::fs;
use std::path::PathBuf;
use tempfile::tempdir;

fn clear_env() {
    for (key, _) in std::env::vars() {
        if key.starts_with("ACS712_") {
            std::env::remove_var(key);
        }
    }
}

#[test]
#[serial]
fn test_missing_file_gives_defaults() {
    clear_env();
    let dir = tempdir().unwrap();
    let config = MonitorConfig::load_from(dir.path().join("absent.toml")).unwrap();

    assert_eq!(config, MonitorConfig::default());
    assert!(config.validate().is_ok());
}

#[test]
#[serial]
fn test_file_overrides_defaults() {
    clear_env();
    let dir = tempdir().unwrap();
    let path = dir.path().join("acs712.toml");
    fs::write(
        &path,
        r#"
[device]
base_path = "/sys/bus/iio/devices/iio:device1"

[sensor]
channel = 4
sensitivity_mv_per_amp = 100.0

[reporting]
interval_ms = 250
"#,
    )
    .unwrap();

    let config = MonitorConfig::load_from(&path).unwrap();
    assert_eq!(
        config.device.base_path,
        PathBuf::from("/sys/bus/iio/devices/iio:device1")
    );
    assert_eq!(config.sensor.channel, 4);
    assert_eq!(config.sensor.sensitivity_mv_per_amp, 100.0);
    // Untouched keys keep their defaults
    assert_eq!(config.sensor.zero_current_voltage_mv, 2500.0);
    assert_eq!(config.reporting.interval_ms, 250);
    assert_eq!(config.reporting.precision, 3);
    assert_eq!(
        config.raw_path(),
        PathBuf::from("/sys/bus/iio/devices/iio:device1/in_voltage4_raw")
    );
}

#[test]
#[serial]
fn test_environment_overrides_file() {
    clear_env();
    let dir = tempdir().unwrap();
    let path = dir.path().join("acs712.toml");
    fs::write(&path, "[sensor]\nchannel = 4\n").unwrap();

    std::env::set_var("ACS712_SENSOR__CHANNEL", "7");
    std::env::set_var("ACS712_DEVICE__MOCK_RAW", "2600");
    let result = MonitorConfig::load_from(&path);
    clear_env();

    let config = result.unwrap();
    assert_eq!(config.sensor.channel, 7);
    assert_eq!(config.device.mock_raw, Some(2600));
}

#[test]
#[serial]
fn test_wrong_type_is_config_error() {
    clear_env();
    let dir = tempdir().unwrap();
    let path = dir.path().join("acs712.toml");
    fs::write(&path, "[sensor]\nchannel = \"thirteen\"\n").unwrap();

    let err = MonitorConfig::load_from(&path).unwrap_err();
    assert!(matches!(err, DaqError::Config(_)));
}

#[test]
#[serial]
fn test_zero_sensitivity_from_file_fails_validation() {
    clear_env();
    let dir = tempdir().unwrap();
    let path = dir.path().join("acs712.toml");
    fs::write(&path, "[sensor]\nsensitivity_mv_per_amp = 0.0\n").unwrap();

    let config = MonitorConfig::load_from(&path).unwrap();
    let err = config.validate().unwrap_err();
    assert!(matches!(err, DaqError::Configuration(_)));
}

#[test]
#[serial]
fn test_rendered_config_loads_back() {
    clear_env();
    let dir = tempdir().unwrap();
    let path = dir.path().join("acs712.toml");

    let mut config = MonitorConfig::default();
    config.sensor.channel = 2;
    config.reporting.precision = 4;
    fs::write(&path, config.to_toml_string().unwrap()).unwrap();

    assert_eq!(MonitorConfig::load_from(&path).unwrap(), config);
}

//! Configuration System using Figment
//!
//! Strongly-typed configuration for the current reader. Values are layered:
//! 1. Built-in defaults (the reference ACS712-05B setup on channel 13)
//! 2. `config/acs712.toml` or the file given with `--config` (optional)
//! 3. Environment variables prefixed with `ACS712_`, using `__` between
//!    section and key, e.g. `ACS712_SENSOR__CHANNEL=3`
//!
//! Command-line overrides are applied on top by the binary.
//!
//! # Example
//! ```no_run
//! use acs712_daq::config::MonitorConfig;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = MonitorConfig::load()?;
//! config.validate()?;
//! println!("Reading {}", config.raw_path().display());
//! # Ok(())
//! # }
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::error::{AppResult, DaqError};
use crate::hardware::sysfs::raw_attribute_path;

/// Default configuration file, relative to the working directory.
pub const DEFAULT_CONFIG_PATH: &str = "config/acs712.toml";

/// Environment variable prefix.
pub const ENV_PREFIX: &str = "ACS712_";

const VALID_LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];
const VALID_LOG_FORMATS: [&str; 3] = ["pretty", "compact", "json"];
const MAX_PRECISION: usize = 9;

/// Top-level configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MonitorConfig {
    /// Application settings
    #[serde(default)]
    pub application: ApplicationConfig,
    /// ADC device location
    #[serde(default)]
    pub device: DeviceConfig,
    /// Channel and calibration constants
    #[serde(default)]
    pub sensor: SensorConfig,
    /// Reporting cadence and formatting
    #[serde(default)]
    pub reporting: ReportingConfig,
}

/// Application-level configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApplicationConfig {
    /// Application name
    #[serde(default = "default_name")]
    pub name: String,
    /// Logging level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Log output format (pretty, compact, json)
    #[serde(default = "default_log_format")]
    pub log_format: String,
}

/// Where the raw samples come from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeviceConfig {
    /// IIO device directory holding the `in_voltage<N>_raw` attributes
    #[serde(default = "default_base_path")]
    pub base_path: PathBuf,
    /// Replace the device with a mock channel returning this raw value
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mock_raw: Option<i64>,
}

/// Sensor channel and calibration constants.
///
/// Immutable once the reporting loop starts. `sensitivity_mv_per_amp` must be
/// strictly positive; [`MonitorConfig::validate`] rejects anything else.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SensorConfig {
    /// ADC channel index
    #[serde(default = "default_channel")]
    pub channel: u32,
    /// Sensor output slope in mV/A
    #[serde(default = "default_sensitivity")]
    pub sensitivity_mv_per_amp: f64,
    /// ADC count to millivolt factor. The default of 1.0 assumes the driver
    /// already reports millivolts; real hardware usually needs its own value.
    #[serde(default = "default_adc_scale")]
    pub adc_scale_mv_per_unit: f64,
    /// Sensor output at zero current, in mV
    #[serde(default = "default_zero_current_voltage")]
    pub zero_current_voltage_mv: f64,
}

/// Reporting loop settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportingConfig {
    /// Pause between cycles in milliseconds
    #[serde(default = "default_interval_ms")]
    pub interval_ms: u64,
    /// Decimal places of the printed current
    #[serde(default = "default_precision")]
    pub precision: usize,
}

/// ACS712 variants and their nominal sensitivity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum SensorModel {
    /// ACS712ELCTR-05B, ±5 A
    #[value(name = "acs712-05b")]
    Amps5,
    /// ACS712ELCTR-20A, ±20 A
    #[value(name = "acs712-20a")]
    Amps20,
    /// ACS712ELCTR-30A, ±30 A
    #[value(name = "acs712-30a")]
    Amps30,
}

impl SensorModel {
    /// Nominal sensitivity in mV/A at 5 V supply.
    pub fn sensitivity_mv_per_amp(self) -> f64 {
        match self {
            SensorModel::Amps5 => 185.0,
            SensorModel::Amps20 => 100.0,
            SensorModel::Amps30 => 66.0,
        }
    }
}

// Default value functions
fn default_name() -> String {
    "ACS712 Current Reader".to_string()
}

fn default_log_level() -> String {
    "warn".to_string()
}

fn default_log_format() -> String {
    "compact".to_string()
}

fn default_base_path() -> PathBuf {
    PathBuf::from("/sys/bus/iio/devices/iio:device0")
}

fn default_channel() -> u32 {
    13
}

fn default_sensitivity() -> f64 {
    SensorModel::Amps5.sensitivity_mv_per_amp()
}

fn default_adc_scale() -> f64 {
    1.0
}

fn default_zero_current_voltage() -> f64 {
    2500.0
}

fn default_interval_ms() -> u64 {
    100
}

fn default_precision() -> usize {
    3
}

impl Default for ApplicationConfig {
    fn default() -> Self {
        Self {
            name: default_name(),
            log_level: default_log_level(),
            log_format: default_log_format(),
        }
    }
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            base_path: default_base_path(),
            mock_raw: None,
        }
    }
}

impl Default for SensorConfig {
    fn default() -> Self {
        Self {
            channel: default_channel(),
            sensitivity_mv_per_amp: default_sensitivity(),
            adc_scale_mv_per_unit: default_adc_scale(),
            zero_current_voltage_mv: default_zero_current_voltage(),
        }
    }
}

impl Default for ReportingConfig {
    fn default() -> Self {
        Self {
            interval_ms: default_interval_ms(),
            precision: default_precision(),
        }
    }
}

impl SensorConfig {
    /// Reference calibration with the nominal sensitivity of `model`.
    pub fn for_model(channel: u32, model: SensorModel) -> Self {
        Self {
            channel,
            sensitivity_mv_per_amp: model.sensitivity_mv_per_amp(),
            ..Self::default()
        }
    }

    fn validate(&self) -> Result<(), String> {
        if !self.sensitivity_mv_per_amp.is_finite() || self.sensitivity_mv_per_amp <= 0.0 {
            return Err(format!(
                "Invalid sensitivity_mv_per_amp {}. Must be a finite value > 0",
                self.sensitivity_mv_per_amp
            ));
        }
        if !self.adc_scale_mv_per_unit.is_finite() || self.adc_scale_mv_per_unit <= 0.0 {
            return Err(format!(
                "Invalid adc_scale_mv_per_unit {}. Must be a finite value > 0",
                self.adc_scale_mv_per_unit
            ));
        }
        if !self.zero_current_voltage_mv.is_finite() {
            return Err(format!(
                "Invalid zero_current_voltage_mv {}. Must be finite",
                self.zero_current_voltage_mv
            ));
        }
        Ok(())
    }
}

impl ReportingConfig {
    /// Pause between two cycles.
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }
}

impl MonitorConfig {
    /// Load configuration from `config/acs712.toml` and the environment.
    pub fn load() -> AppResult<Self> {
        Self::load_from(DEFAULT_CONFIG_PATH)
    }

    /// Load configuration from a specific file path.
    ///
    /// A missing file is not an error; the defaults and environment still apply.
    pub fn load_from<P: AsRef<Path>>(path: P) -> AppResult<Self> {
        Ok(Self::figment(path.as_ref()).extract()?)
    }

    fn figment(path: &Path) -> Figment {
        Figment::from(Serialized::defaults(MonitorConfig::default()))
            .merge(Toml::file(path))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    /// Validate configuration after loading and overrides.
    pub fn validate(&self) -> AppResult<()> {
        self.check().map_err(DaqError::Configuration)
    }

    fn check(&self) -> Result<(), String> {
        if !VALID_LOG_LEVELS.contains(&self.application.log_level.as_str()) {
            return Err(format!(
                "Invalid log_level '{}'. Must be one of: {}",
                self.application.log_level,
                VALID_LOG_LEVELS.join(", ")
            ));
        }

        if !VALID_LOG_FORMATS.contains(&self.application.log_format.as_str()) {
            return Err(format!(
                "Invalid log_format '{}'. Must be one of: {}",
                self.application.log_format,
                VALID_LOG_FORMATS.join(", ")
            ));
        }

        self.sensor.validate()?;

        if self.reporting.interval_ms == 0 {
            return Err("Invalid interval_ms 0. Must be > 0".to_string());
        }

        if self.reporting.precision > MAX_PRECISION {
            return Err(format!(
                "Invalid precision {}. Must be 0-{}",
                self.reporting.precision, MAX_PRECISION
            ));
        }

        Ok(())
    }

    /// Raw attribute path for the configured channel.
    pub fn raw_path(&self) -> PathBuf {
        raw_attribute_path(&self.device.base_path, self.sensor.channel)
    }

    /// Render the resolved configuration as TOML.
    pub fn to_toml_string(&self) -> AppResult<String> {
        toml::to_string_pretty(self).map_err(|e| DaqError::Configuration(e.to_string()))
    }
}

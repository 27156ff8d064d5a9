//! Raw sample to current conversion.
//!
//! The ACS712 outputs a voltage centered on a zero-current level that moves
//! linearly with the measured current:
//!
//! ```text
//! voltage_mv  = raw * adc_scale_mv_per_unit
//! current_a   = (voltage_mv - zero_current_voltage_mv) / sensitivity_mv_per_amp
//! ```
//!
//! The computation is done in `f64` with no extra rounding. A sensitivity of
//! zero yields a non-finite result; configuration validation rejects it before
//! any reading is taken.

use chrono::{DateTime, Utc};

use crate::config::SensorConfig;

/// Convert a raw ADC count to a current in amperes.
pub fn convert(raw_sample: i64, config: &SensorConfig) -> f64 {
    let voltage_mv = raw_sample as f64 * config.adc_scale_mv_per_unit;
    (voltage_mv - config.zero_current_voltage_mv) / config.sensitivity_mv_per_amp
}

/// One converted sample.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Reading {
    /// Unscaled ADC count
    pub raw_sample: i64,
    /// Current derived from `raw_sample`
    pub current_amps: f64,
    /// When the sample was converted
    pub timestamp: DateTime<Utc>,
}

impl Reading {
    /// Convert `raw_sample` and stamp it with the current time.
    pub fn from_raw(raw_sample: i64, config: &SensorConfig) -> Self {
        Self {
            raw_sample,
            current_amps: convert(raw_sample, config),
            timestamp: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-12;

    #[test]
    fn zero_current_at_mid_scale() {
        let config = SensorConfig::default();
        assert_eq!(convert(2500, &config), 0.0);
    }

    #[test]
    fn one_amp_either_direction() {
        let config = SensorConfig::default();
        assert!((convert(2685, &config) - 1.0).abs() < EPS);
        assert!((convert(2315, &config) + 1.0).abs() < EPS);
    }

    #[test]
    fn conversion_is_deterministic() {
        let config = SensorConfig::default();
        for raw in [-4096, 0, 1, 2499, 2500, 2501, 4095, i64::from(i32::MAX)] {
            assert_eq!(convert(raw, &config).to_bits(), convert(raw, &config).to_bits());
        }
    }

    #[test]
    fn matches_formula_with_custom_calibration() {
        let config = SensorConfig {
            channel: 0,
            sensitivity_mv_per_amp: 100.0,
            adc_scale_mv_per_unit: 1.2207,
            zero_current_voltage_mv: 2480.0,
        };
        let raw = 2100_i64;
        let expected = (raw as f64 * 1.2207 - 2480.0) / 100.0;
        assert_eq!(convert(raw, &config), expected);
    }

    #[test]
    fn zero_sensitivity_is_not_finite() {
        let config = SensorConfig {
            sensitivity_mv_per_amp: 0.0,
            ..SensorConfig::default()
        };
        assert!(convert(2685, &config).is_infinite());
        assert!(convert(2500, &config).is_nan());
    }

    #[test]
    fn reading_carries_raw_and_current() {
        let config = SensorConfig::default();
        let reading = Reading::from_raw(2685, &config);
        assert_eq!(reading.raw_sample, 2685);
        assert_eq!(reading.current_amps, convert(2685, &config));
    }
}

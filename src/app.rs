//! Top-level driver: resolved configuration in, reporting loop out.

use std::io::Write;

use tracing::info;

use crate::config::MonitorConfig;
use crate::error::AppResult;
use crate::hardware::{MockAdcChannel, RawSampleSource, SysfsAdcChannel};
use crate::reporting::ReportingLoop;

/// Pick the acquisition source described by `config`.
///
/// `device.mock_raw` takes precedence over the sysfs device.
pub fn build_source(config: &MonitorConfig) -> Box<dyn RawSampleSource> {
    match config.device.mock_raw {
        Some(raw) => Box::new(MockAdcChannel::constant(raw)),
        None => Box::new(SysfsAdcChannel::from_raw_path(
            config.sensor.channel,
            config.raw_path(),
        )),
    }
}

/// Validate `config` and report readings to `sink` until acquisition fails.
pub async fn run_with_sink<W: Write + Send>(config: &MonitorConfig, sink: W) -> AppResult<()> {
    config.validate()?;

    let source = build_source(config);
    info!(
        app = %config.application.name,
        source = %source.describe(),
        sensitivity_mv_per_amp = config.sensor.sensitivity_mv_per_amp,
        adc_scale_mv_per_unit = config.sensor.adc_scale_mv_per_unit,
        zero_current_voltage_mv = config.sensor.zero_current_voltage_mv,
        interval_ms = config.reporting.interval_ms,
        "starting current reader"
    );

    let mut reporter = ReportingLoop::new(source, config.sensor, &config.reporting, sink);
    reporter.run().await
}

/// Report readings to stdout until acquisition fails.
pub async fn run(config: &MonitorConfig) -> AppResult<()> {
    run_with_sink(config, std::io::stdout()).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DaqError;
    use std::path::PathBuf;

    #[tokio::test]
    async fn missing_device_fails_on_first_read() {
        let mut config = MonitorConfig::default();
        config.device.base_path = PathBuf::from("/nonexistent/iio:device0");

        let mut out = Vec::new();
        let err = run_with_sink(&config, &mut out).await.unwrap_err();
        match err {
            DaqError::Acquisition(acq) => assert!(acq.is_not_found()),
            other => panic!("unexpected error: {:?}", other),
        }
        assert!(out.is_empty());
    }

    #[tokio::test]
    async fn invalid_config_is_rejected_before_reading() {
        let mut config = MonitorConfig::default();
        config.sensor.sensitivity_mv_per_amp = 0.0;
        config.device.mock_raw = Some(2500);

        let err = run_with_sink(&config, Vec::new()).await.unwrap_err();
        assert!(matches!(err, DaqError::Configuration(_)));
    }

    #[test]
    fn mock_raw_selects_mock_source() {
        let mut config = MonitorConfig::default();
        config.device.base_path = PathBuf::from("/tmp/iio:device3");
        config.sensor.channel = 5;
        let described = build_source(&config).describe();
        assert!(described.contains(&config.raw_path().display().to_string()));
        assert!(described.contains("/tmp/iio:device3/in_voltage5_raw"));

        config.device.mock_raw = Some(2600);
        assert!(build_source(&config).describe().contains("constant 2600"));
    }
}

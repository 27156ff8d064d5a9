//! CLI entry point for the ACS712 current reader.
//!
//! Prints `Corrente lida: <value> A` to stdout every interval until the
//! process is killed or a read fails. A failure prints `Erro: <message>` to
//! stderr and exits with status 1. Invalid command-line arguments are
//! reported the same way; only `--help` and `--version` exit with status 0.
//!
//! # Usage
//!
//! ```bash
//! # Reference setup: iio:device0, channel 13, 185 mV/A
//! acs712-reader
//!
//! # 20 A variant on channel 2
//! acs712-reader --channel 2 --model acs712-20a
//!
//! # No hardware
//! acs712-reader --mock-raw 2685
//! ```

// Global allocator (Microsoft Rust Guidelines: M-MIMALLOC-APPS)
#[cfg(not(test))]
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

use std::path::PathBuf;
use std::process::ExitCode;

use acs712_daq::config::{MonitorConfig, SensorModel, DEFAULT_CONFIG_PATH};
use acs712_daq::{app, logging};
use anyhow::{anyhow, Result};
use clap::error::ErrorKind;
use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "acs712-reader", version)]
#[command(about = "Periodic current readout from an ACS712 on a Linux IIO ADC", long_about = None)]
struct Cli {
    /// Configuration file (TOML); ignored if missing
    #[arg(short, long, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// IIO device directory
    #[arg(long)]
    device_path: Option<PathBuf>,

    /// ADC channel index
    #[arg(long)]
    channel: Option<u32>,

    /// Sensor sensitivity in mV/A (takes precedence over --model)
    #[arg(long)]
    sensitivity: Option<f64>,

    /// Sensor variant, sets the nominal sensitivity
    #[arg(long, value_enum)]
    model: Option<SensorModel>,

    /// ADC count to millivolt factor
    #[arg(long)]
    adc_scale: Option<f64>,

    /// Sensor output at zero current in mV
    #[arg(long, allow_hyphen_values = true)]
    zero_voltage: Option<f64>,

    /// Pause between readings in milliseconds
    #[arg(long)]
    interval_ms: Option<u64>,

    /// Decimal places of the printed current
    #[arg(long)]
    precision: Option<usize>,

    /// Use a mock channel returning this raw value instead of the device
    #[arg(long, allow_hyphen_values = true)]
    mock_raw: Option<i64>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,

    /// Log format (pretty, compact, json)
    #[arg(long)]
    log_format: Option<String>,

    /// Print the resolved configuration as TOML and exit
    #[arg(long)]
    print_config: bool,
}

impl Cli {
    fn apply(&self, config: &mut MonitorConfig) {
        if let Some(path) = &self.device_path {
            config.device.base_path = path.clone();
        }
        if let Some(raw) = self.mock_raw {
            config.device.mock_raw = Some(raw);
        }
        if let Some(channel) = self.channel {
            config.sensor.channel = channel;
        }
        if let Some(model) = self.model {
            config.sensor.sensitivity_mv_per_amp = model.sensitivity_mv_per_amp();
        }
        if let Some(sensitivity) = self.sensitivity {
            config.sensor.sensitivity_mv_per_amp = sensitivity;
        }
        if let Some(scale) = self.adc_scale {
            config.sensor.adc_scale_mv_per_unit = scale;
        }
        if let Some(zero) = self.zero_voltage {
            config.sensor.zero_current_voltage_mv = zero;
        }
        if let Some(interval_ms) = self.interval_ms {
            config.reporting.interval_ms = interval_ms;
        }
        if let Some(precision) = self.precision {
            config.reporting.precision = precision;
        }
        if let Some(level) = &self.log_level {
            config.application.log_level = level.clone();
        }
        if let Some(format) = &self.log_format {
            config.application.log_format = format.clone();
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => return usage_error(err),
    };

    match try_main(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Erro: {err}");
            ExitCode::FAILURE
        }
    }
}

fn usage_error(err: clap::Error) -> ExitCode {
    match err.kind() {
        ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
            let _ = err.print();
            ExitCode::SUCCESS
        }
        _ => {
            let rendered = err.to_string();
            let message = rendered.lines().next().unwrap_or_default();
            eprintln!("Erro: {}", message.trim_start_matches("error: "));
            ExitCode::FAILURE
        }
    }
}

async fn try_main(cli: Cli) -> Result<()> {
    let mut config = MonitorConfig::load_from(&cli.config)?;
    cli.apply(&mut config);
    config.validate()?;

    if cli.print_config {
        print!("{}", config.to_toml_string()?);
        return Ok(());
    }

    logging::init_from_config(&config).map_err(|e| anyhow!(e))?;

    app::run(&config).await?;
    Ok(())
}

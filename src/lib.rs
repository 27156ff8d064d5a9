//! # ACS712 current reader
//!
//! Reads one analog channel of a Linux IIO ADC, converts the raw count to a
//! current for an ACS712 Hall-effect sensor and prints it at a fixed period.
//!
//! ## Crate Structure
//!
//! - **`config`**: Figment-based configuration (defaults, TOML file, `ACS712_*`
//!   environment) and startup validation.
//! - **`error`**: `AcquisitionError` for failed reads and the application-wide
//!   `DaqError`.
//! - **`hardware`**: the `RawSampleSource` capability with the sysfs and mock
//!   implementations.
//! - **`measurement`**: the pure raw → amperes conversion and `Reading`.
//! - **`reporting`**: the fixed-period acquire → convert → report loop.
//! - **`app`**: wires a resolved configuration into a running loop.
//! - **`logging`**: `tracing` subscriber setup (stderr only).

pub mod app;
pub mod config;
pub mod error;
pub mod hardware;
pub mod logging;
pub mod measurement;
pub mod reporting;

pub use config::{MonitorConfig, SensorConfig, SensorModel};
pub use error::{AcquisitionError, AppResult, DaqError};
pub use hardware::{MockAdcChannel, RawSampleSource, SysfsAdcChannel};
pub use measurement::{convert, Reading};
pub use reporting::{LoopState, Outcome, ReportingLoop};

//! ADC acquisition sources
//!
//! The reporting loop only sees the [`RawSampleSource`] capability: one
//! operation returning the instantaneous raw ADC count for a single channel.
//!
//! - [`SysfsAdcChannel`] - Linux IIO channel exposed as `in_voltage<N>_raw`
//! - [`MockAdcChannel`] - scripted or constant samples, no hardware needed
//!
//! # Example
//!
//! ```rust,ignore
//! use acs712_daq::hardware::{RawSampleSource, SysfsAdcChannel};
//!
//! let adc = SysfsAdcChannel::new("/sys/bus/iio/devices/iio:device0", 13);
//! let raw = adc.read_raw_sample().await?;
//! println!("Channel 13: {raw}");
//! ```

use async_trait::async_trait;

use crate::error::AcquisitionError;

pub mod mock;
pub mod sysfs;

pub use mock::MockAdcChannel;
pub use sysfs::SysfsAdcChannel;

/// Capability: single-channel raw ADC readout.
///
/// # Contract
/// - Every call performs a fresh acquisition; nothing is cached between calls
/// - Returns the unscaled integer count reported by the converter
/// - Failures are reported, never replaced by a default value
#[async_trait]
pub trait RawSampleSource: Send + Sync {
    /// Read the current raw sample.
    async fn read_raw_sample(&self) -> Result<i64, AcquisitionError>;

    /// Human-readable description of where samples come from, for logs.
    fn describe(&self) -> String;
}

#[async_trait]
impl<T: RawSampleSource + ?Sized> RawSampleSource for Box<T> {
    async fn read_raw_sample(&self) -> Result<i64, AcquisitionError> {
        (**self).read_raw_sample().await
    }

    fn describe(&self) -> String {
        (**self).describe()
    }
}

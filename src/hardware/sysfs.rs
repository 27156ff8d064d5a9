//! Linux IIO analog input read through sysfs.
//!
//! The kernel exposes each ADC channel as a text attribute,
//! `<device>/in_voltage<N>_raw`, holding one decimal integer. The attribute
//! is re-read on every access, so each sample opens the file, reads it and
//! drops the handle before returning.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::trace;

use crate::error::AcquisitionError;
use crate::hardware::RawSampleSource;

/// One IIO voltage channel.
#[derive(Debug, Clone)]
pub struct SysfsAdcChannel {
    channel: u32,
    raw_path: PathBuf,
}

impl SysfsAdcChannel {
    /// Channel `channel` of the IIO device at `base_path`.
    ///
    /// The attribute is not checked here; a missing channel surfaces on the
    /// first read.
    pub fn new(base_path: impl AsRef<Path>, channel: u32) -> Self {
        Self::from_raw_path(channel, raw_attribute_path(base_path.as_ref(), channel))
    }

    /// Channel `channel` read from an already resolved attribute path.
    pub fn from_raw_path(channel: u32, raw_path: impl Into<PathBuf>) -> Self {
        Self {
            channel,
            raw_path: raw_path.into(),
        }
    }

    /// Channel index.
    pub fn channel(&self) -> u32 {
        self.channel
    }

    /// Full path of the raw attribute.
    pub fn raw_path(&self) -> &Path {
        &self.raw_path
    }
}

/// `<base_path>/in_voltage<channel>_raw`
pub fn raw_attribute_path(base_path: &Path, channel: u32) -> PathBuf {
    base_path.join(format!("in_voltage{}_raw", channel))
}

/// Decode attribute bytes and parse the first token as an integer.
pub(crate) fn decode_raw_sample(path: &Path, bytes: Vec<u8>) -> Result<i64, AcquisitionError> {
    let content = String::from_utf8(bytes).map_err(|e| AcquisitionError::Parse {
        path: path.to_path_buf(),
        content: String::from_utf8_lossy(e.as_bytes()).trim().to_string(),
    })?;
    parse_raw_sample(path, &content)
}

/// Parse the first whitespace-separated token of `content` as an integer.
pub(crate) fn parse_raw_sample(path: &Path, content: &str) -> Result<i64, AcquisitionError> {
    let token = content
        .split_whitespace()
        .next()
        .ok_or_else(|| AcquisitionError::Empty {
            path: path.to_path_buf(),
        })?;

    token.parse::<i64>().map_err(|_| AcquisitionError::Parse {
        path: path.to_path_buf(),
        content: token.to_string(),
    })
}

#[async_trait]
impl RawSampleSource for SysfsAdcChannel {
    async fn read_raw_sample(&self) -> Result<i64, AcquisitionError> {
        let bytes = tokio::fs::read(&self.raw_path)
            .await
            .map_err(|source| AcquisitionError::Open {
                path: self.raw_path.clone(),
                source,
            })?;

        let raw = decode_raw_sample(&self.raw_path, bytes)?;
        trace!(channel = self.channel, raw, "read sysfs attribute");
        Ok(raw)
    }

    fn describe(&self) -> String {
        format!("iio channel {} ({})", self.channel, self.raw_path.display())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_iio_attribute_path() {
        let adc = SysfsAdcChannel::new("/sys/bus/iio/devices/iio:device0", 13);
        assert_eq!(adc.channel(), 13);
        assert_eq!(
            adc.raw_path(),
            Path::new("/sys/bus/iio/devices/iio:device0/in_voltage13_raw")
        );
    }

    #[test]
    fn resolved_path_is_kept() {
        let adc = SysfsAdcChannel::from_raw_path(4, "/tmp/iio/in_voltage4_raw");
        assert_eq!(adc.channel(), 4);
        assert_eq!(adc.raw_path(), Path::new("/tmp/iio/in_voltage4_raw"));
    }

    #[test]
    fn non_utf8_content_is_a_parse_error() {
        let err = decode_raw_sample(Path::new("raw"), vec![0xff, 0xfe, b'\n']).unwrap_err();
        assert!(matches!(err, AcquisitionError::Parse { .. }));
        assert!(err.is_malformed());
    }

    #[test]
    fn parses_attribute_with_trailing_newline() {
        let path = Path::new("raw");
        assert_eq!(parse_raw_sample(path, "2685\n").unwrap(), 2685);
        assert_eq!(parse_raw_sample(path, "  -12  \n").unwrap(), -12);
        assert_eq!(parse_raw_sample(path, "2500 17\n").unwrap(), 2500);
    }

    #[test]
    fn rejects_empty_and_non_numeric_content() {
        let path = Path::new("raw");
        assert!(matches!(
            parse_raw_sample(path, "\n"),
            Err(AcquisitionError::Empty { .. })
        ));
        assert!(matches!(
            parse_raw_sample(path, "12.5\n"),
            Err(AcquisitionError::Parse { .. })
        ));
        match parse_raw_sample(path, "abc") {
            Err(AcquisitionError::Parse { content, .. }) => assert_eq!(content, "abc"),
            other => panic!("unexpected result: {:?}", other),
        }
    }
}

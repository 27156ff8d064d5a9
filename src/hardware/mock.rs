//! Mock ADC channel
//!
//! Replays raw samples without touching device files. Used by the tests and
//! by `--mock-raw` for a hardware-free run.
//!
//! - [`MockAdcChannel::constant`] returns the same count forever
//! - [`MockAdcChannel::scripted`] returns queued results in order, then
//!   fails with [`AcquisitionError::Exhausted`]

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::error::AcquisitionError;
use crate::hardware::RawSampleSource;

enum Script {
    Constant(i64),
    Queue(VecDeque<Result<i64, AcquisitionError>>),
}

/// Simulated single-channel ADC.
///
/// # Example
///
/// ```rust,ignore
/// let adc = MockAdcChannel::scripted([2500, 2685]);
/// assert_eq!(adc.read_raw_sample().await?, 2500);
/// assert_eq!(adc.read_count(), 1);
/// ```
pub struct MockAdcChannel {
    script: Mutex<Script>,
    reads: AtomicUsize,
}

impl MockAdcChannel {
    /// Always return `raw`.
    pub fn constant(raw: i64) -> Self {
        Self::with_script(Script::Constant(raw))
    }

    /// Return each sample once, then fail.
    pub fn scripted(samples: impl IntoIterator<Item = i64>) -> Self {
        Self::from_results(samples.into_iter().map(Ok))
    }

    /// Return each result once (errors included), then fail.
    pub fn from_results(
        results: impl IntoIterator<Item = Result<i64, AcquisitionError>>,
    ) -> Self {
        Self::with_script(Script::Queue(results.into_iter().collect()))
    }

    fn with_script(script: Script) -> Self {
        Self {
            script: Mutex::new(script),
            reads: AtomicUsize::new(0),
        }
    }

    /// Number of read attempts so far, failed ones included.
    pub fn read_count(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RawSampleSource for MockAdcChannel {
    async fn read_raw_sample(&self) -> Result<i64, AcquisitionError> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        match &mut *self.script.lock() {
            Script::Constant(raw) => Ok(*raw),
            Script::Queue(queue) => queue.pop_front().unwrap_or(Err(AcquisitionError::Exhausted)),
        }
    }

    fn describe(&self) -> String {
        match &*self.script.lock() {
            Script::Constant(raw) => format!("mock channel (constant {raw})"),
            Script::Queue(queue) => format!("mock channel ({} scripted samples)", queue.len()),
        }
    }
}

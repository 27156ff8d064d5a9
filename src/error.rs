//! Error types for the current reader.
//!
//! Two layers, following the usual driver/application split:
//!
//! - **`AcquisitionError`**: raised by an acquisition source when the raw
//!   sample resource cannot be opened or does not hold an integer. This is the
//!   only error the reporting loop can hit at runtime, and it is never retried.
//! - **`DaqError`**: the application-level error. It wraps acquisition
//!   failures, configuration problems detected at startup and I/O failures on
//!   the output sink.
//!
//! By using `#[from]`, both acquisition and I/O errors convert into `DaqError`
//! with the `?` operator.

use std::path::PathBuf;
use thiserror::Error;

/// Convenience alias for results using the application error type.
pub type AppResult<T> = std::result::Result<T, DaqError>;

/// Failure to obtain one raw sample from the ADC.
#[derive(Error, Debug)]
pub enum AcquisitionError {
    /// The raw sample resource could not be opened or read.
    #[error("failed to open {}: {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The resource was readable but held no token at all.
    #[error("no sample available in {}", path.display())]
    Empty { path: PathBuf },

    /// The first token of the resource is not an integer.
    #[error("invalid raw sample '{content}' in {}", path.display())]
    Parse { path: PathBuf, content: String },

    /// A scripted source ran out of samples.
    #[error("mock ADC channel has no more samples")]
    Exhausted,
}

impl AcquisitionError {
    /// Check if this is a "resource not found" type error.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::Open { source, .. } if source.kind() == std::io::ErrorKind::NotFound
        )
    }

    /// Check if the resource content was malformed.
    pub fn is_malformed(&self) -> bool {
        matches!(self, Self::Empty { .. } | Self::Parse { .. })
    }
}

/// Primary error type for the application.
#[derive(Error, Debug)]
pub enum DaqError {
    #[error("Configuration error: {0}")]
    Config(#[from] figment::Error),

    #[error("Configuration validation error: {0}")]
    Configuration(String),

    #[error("{0}")]
    Acquisition(#[from] AcquisitionError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl DaqError {
    /// True when the error came from the acquisition source.
    pub fn is_acquisition(&self) -> bool {
        matches!(self, Self::Acquisition(_))
    }
}

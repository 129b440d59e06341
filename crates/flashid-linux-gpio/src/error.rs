//! Error types for the Linux GPIO chip-select line

use flashid_core::Error as CoreError;
use thiserror::Error;

/// Linux GPIO specific errors
#[derive(Debug, Error)]
pub enum LinuxGpioError {
    /// Failed to request the line
    #[error("Failed to request GPIO line {offset} on '{chip}': {source}")]
    LineRequestFailed {
        chip: String,
        offset: u32,
        #[source]
        source: gpiocdev::Error,
    },

    /// Failed to set the line value
    #[error("Failed to set GPIO line value: {0}")]
    SetValueFailed(#[source] gpiocdev::Error),

    /// Failed to reconfigure the line
    #[error("Failed to reconfigure GPIO line: {0}")]
    ReconfigureFailed(#[source] gpiocdev::Error),

    /// Level change on a line that is not an output
    #[error("GPIO line {0} is not configured as output")]
    NotOutput(u32),

    /// Invalid parameter
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),
}

impl From<LinuxGpioError> for CoreError {
    fn from(e: LinuxGpioError) -> Self {
        match e {
            LinuxGpioError::LineRequestFailed { .. } | LinuxGpioError::InvalidParameter(_) => {
                CoreError::ConnectionUnavailable(e.to_string())
            }
            _ => CoreError::ChipSelect(e.to_string()),
        }
    }
}

/// Result type for Linux GPIO operations
pub type Result<T> = std::result::Result<T, LinuxGpioError>;

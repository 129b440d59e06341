//! Error types for Linux SPI operations

use flashid_core::Error as CoreError;
use thiserror::Error;

/// Linux SPI specific errors
#[derive(Debug, Error)]
pub enum LinuxSpiError {
    /// Failed to open device
    #[error("Failed to open {path}: {source}")]
    OpenFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Failed to set SPI mode
    #[error("Failed to set SPI mode to {mode:#04x}: {source}")]
    SetModeFailed {
        mode: u8,
        #[source]
        source: std::io::Error,
    },

    /// Failed to set bits per word
    #[error("Failed to set bits per word to {bits}: {source}")]
    SetBitsPerWordFailed {
        bits: u8,
        #[source]
        source: std::io::Error,
    },

    /// Failed to set clock speed
    #[error("Failed to set clock speed to {speed} Hz: {source}")]
    SetSpeedFailed {
        speed: u32,
        #[source]
        source: std::io::Error,
    },

    /// Write to the device failed
    #[error("SPI write failed: {0}")]
    WriteFailed(#[source] std::io::Error),

    /// Read from the device failed
    #[error("SPI read failed: {0}")]
    ReadFailed(#[source] std::io::Error),
}

impl From<LinuxSpiError> for CoreError {
    fn from(e: LinuxSpiError) -> Self {
        match e {
            LinuxSpiError::OpenFailed { .. } => CoreError::ConnectionUnavailable(e.to_string()),
            LinuxSpiError::SetModeFailed { .. }
            | LinuxSpiError::SetBitsPerWordFailed { .. }
            | LinuxSpiError::SetSpeedFailed { .. } => CoreError::Configuration(e.to_string()),
            LinuxSpiError::WriteFailed(_) | LinuxSpiError::ReadFailed(_) => {
                CoreError::Transport(e.to_string())
            }
        }
    }
}

/// Result type for Linux SPI operations
pub type Result<T> = std::result::Result<T, LinuxSpiError>;

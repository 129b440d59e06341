//! Error types for flashid-core

use thiserror::Error;

/// Core error type
///
/// Backend crates carry their own detailed error enums and convert them
/// into one of these variants at the trait boundary.
#[derive(Debug, Error)]
pub enum Error {
    /// No hardware link could be established; nothing was sent on the bus
    #[error("no hardware connection available: {0}")]
    ConnectionUnavailable(String),

    /// Baud rate is zero or above the 50 MHz ceiling
    #[error("invalid baud rate {0} Hz (must be between 1 and 50000000)")]
    InvalidBaudRate(u32),

    /// SPI bus selector is not 0 or 1
    #[error("invalid SPI bus {0} (must be 0 or 1)")]
    InvalidBus(u8),

    /// The SPI link rejected the requested parameters
    #[error("SPI link rejected configuration: {0}")]
    Configuration(String),

    /// The transaction completed but the flash did not answer
    #[error("no response from the SPI flash")]
    EmptyResponse,

    /// The RDID answer was longer than 3 bytes
    #[error("malformed RDID response: expected 3 bytes, got {0}")]
    MalformedResponse(usize),

    /// Text could not be parsed as a 3-byte JEDEC ID
    #[error("invalid JEDEC ID '{0}' (expected 6 hex digits, e.g. 1F4300)")]
    InvalidJedecId(String),

    /// Transmit or receive failed in the transport
    #[error("SPI transport fault: {0}")]
    Transport(String),

    /// Driving the chip-select GPIO failed
    #[error("chip select fault: {0}")]
    ChipSelect(String),
}

/// Result type alias using the core Error type
pub type Result<T> = core::result::Result<T, Error>;

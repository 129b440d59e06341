//! Programmer trait definitions

use crate::error::Result;
use crate::spi::{LinkConfig, SpiBus};

/// GPIO line direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Line is sampled
    Input,
    /// Line is driven
    Output,
}

/// GPIO logic level
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    /// Logic low (chip select asserted)
    Low,
    /// Logic high (chip select idle)
    High,
}

/// SPI link used for a single identification transaction
///
/// The chip-select line is not part of this trait: the core drives it
/// through a [`GpioTransport`] around `transmit`/`receive`, so transports
/// must not toggle any hardware chip select of their own.
pub trait SpiTransport {
    /// Apply baud rate, clock polarity and clock phase
    ///
    /// Rejected parameters should be reported as
    /// [`Error::Configuration`](crate::Error::Configuration).
    fn configure(&mut self, config: &LinkConfig) -> Result<()>;

    /// Clock out `data`, discarding whatever is shifted in
    fn transmit(&mut self, data: &[u8]) -> Result<()>;

    /// Clock in up to `count` bytes
    ///
    /// Blocks until `count` bytes are available or the transport gives up.
    /// A short or empty vector means the device did not answer in time.
    fn receive(&mut self, count: usize) -> Result<Vec<u8>>;
}

/// A single GPIO line
pub trait GpioTransport {
    /// Set the line direction
    fn set_direction(&mut self, direction: Direction) -> Result<()>;

    /// Drive the line to `level` (line must be an output)
    fn set_level(&mut self, level: Level) -> Result<()>;
}

/// A live hardware link: SPI transport plus the chip-select line
pub struct Link {
    /// SPI transport for the selected bus
    pub spi: Box<dyn SpiTransport>,
    /// GPIO used as chip select
    pub cs: Box<dyn GpioTransport>,
}

impl Link {
    /// Bundle an SPI transport with its chip-select line
    pub fn new(spi: impl SpiTransport + 'static, cs: impl GpioTransport + 'static) -> Self {
        Self {
            spi: Box::new(spi),
            cs: Box::new(cs),
        }
    }
}

/// Source of hardware links
///
/// Discovery and connection bootstrapping live behind this trait. When no
/// hardware is reachable, `connect` must fail with
/// [`Error::ConnectionUnavailable`](crate::Error::ConnectionUnavailable)
/// without touching the bus.
pub trait ConnectionProvider {
    /// Open the SPI link for `bus` and claim GPIO `cs_pin` as chip select
    fn connect(&mut self, bus: SpiBus, cs_pin: u32) -> Result<Link>;
}

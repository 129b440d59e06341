//! SPI link configuration

use core::fmt;

use crate::error::{Error, Result};

/// Default SPI clock in Hz (1 MHz)
pub const DEFAULT_BAUD_RATE: u32 = 1_000_000;

/// Highest SPI clock accepted, in Hz (50 MHz)
pub const MAX_BAUD_RATE: u32 = 50_000_000;

/// SPI bus selector
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum SpiBus {
    /// First SPI controller
    #[default]
    Bus0,
    /// Second SPI controller
    Bus1,
}

impl SpiBus {
    /// Numeric index of the bus (0 or 1)
    pub const fn index(self) -> u8 {
        match self {
            Self::Bus0 => 0,
            Self::Bus1 => 1,
        }
    }
}

impl TryFrom<u8> for SpiBus {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self> {
        match value {
            0 => Ok(Self::Bus0),
            1 => Ok(Self::Bus1),
            other => Err(Error::InvalidBus(other)),
        }
    }
}

impl fmt::Display for SpiBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SPI{}", self.index())
    }
}

/// Parameters for one SPI identification transaction
///
/// Validated on construction and immutable afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LinkConfig {
    bus: SpiBus,
    baud_rate: u32,
    polarity: bool,
    phase: bool,
}

impl LinkConfig {
    /// Create a link configuration
    ///
    /// `polarity` is the idle clock level (CPOL), `phase` selects the
    /// sampling edge (CPHA). Fails with [`Error::InvalidBaudRate`] if the
    /// baud rate is zero or above [`MAX_BAUD_RATE`].
    pub fn new(bus: SpiBus, baud_rate: u32, polarity: bool, phase: bool) -> Result<Self> {
        if baud_rate == 0 || baud_rate > MAX_BAUD_RATE {
            return Err(Error::InvalidBaudRate(baud_rate));
        }
        Ok(Self {
            bus,
            baud_rate,
            polarity,
            phase,
        })
    }

    /// Bus the transaction runs on
    pub const fn bus(&self) -> SpiBus {
        self.bus
    }

    /// SPI clock in Hz
    pub const fn baud_rate(&self) -> u32 {
        self.baud_rate
    }

    /// Clock polarity (CPOL)
    pub const fn polarity(&self) -> bool {
        self.polarity
    }

    /// Clock phase (CPHA)
    pub const fn phase(&self) -> bool {
        self.phase
    }

    /// SPI mode number 0-3 (`CPOL << 1 | CPHA`)
    pub const fn mode(&self) -> u8 {
        ((self.polarity as u8) << 1) | (self.phase as u8)
    }
}

impl Default for LinkConfig {
    fn default() -> Self {
        Self {
            bus: SpiBus::Bus0,
            baud_rate: DEFAULT_BAUD_RATE,
            polarity: false,
            phase: false,
        }
    }
}

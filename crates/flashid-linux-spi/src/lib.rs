//! flashid-linux-spi - Linux spidev transport
//!
//! The Linux SPI driver exposes SPI controllers through character devices
//! at `/dev/spidevX.Y` where X is the bus number and Y is the chip select.
//! flashid disables the controller chip select and drives a GPIO instead,
//! so any `Y` node of the right bus works.
//!
//! # System Requirements
//!
//! - Linux kernel with spidev support enabled (`CONFIG_SPI_SPIDEV`)
//! - Read/write access to the `/dev/spidevX.Y` device
//! - A controller that honours `SPI_NO_CS`

pub mod device;
pub mod error;

pub use device::{default_device, LinuxSpi, SPI_NO_CS};
pub use error::{LinuxSpiError, Result};

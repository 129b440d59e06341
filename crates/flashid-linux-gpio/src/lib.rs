//! flashid-linux-gpio - Chip-select line over the Linux GPIO character device
//!
//! Uses the `gpiocdev` crate to request a single line from
//! `/dev/gpiochipN`. The line is requested as an input so that opening it
//! does not glitch whatever it is wired to; the core switches it to an
//! output idling high before the first transaction.

pub mod device;
pub mod error;

pub use device::{chip_path, LinuxGpioLine, DEFAULT_CHIP};
pub use error::{LinuxGpioError, Result};

//! Protocol implementations
//!
//! This module contains the SPI25 command sequences used for
//! identification.

mod spi25;

pub use spi25::*;

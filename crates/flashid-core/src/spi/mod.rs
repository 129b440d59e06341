//! SPI link parameters and opcodes

mod link;
pub mod opcodes;

pub use link::{LinkConfig, SpiBus, DEFAULT_BAUD_RATE, MAX_BAUD_RATE};

//! flashid-core - Core library for SPI flash identification
//!
//! This crate drives the JEDEC "Read Identification" (RDID, `0x9F`)
//! transaction against an SPI flash chip and decodes the 3-byte answer into
//! manufacturer, memory-type and device codes, optionally resolving them
//! against a chip database.
//!
//! The hardware itself is reached through the collaborator traits in
//! [`programmer`]: an SPI link, a GPIO used as chip select, and a
//! connection provider that hands both out.
//!
//! # Example
//!
//! ```ignore
//! use flashid_core::chip::ChipDatabase;
//! use flashid_core::probe::{probe, IdentifyRequest};
//! use flashid_core::programmer::ConnectionProvider;
//! use flashid_core::spi::{LinkConfig, SpiBus};
//!
//! fn identify<P: ConnectionProvider>(provider: &mut P) {
//!     let link = LinkConfig::new(SpiBus::Bus0, 1_000_000, false, false).unwrap();
//!     let request = IdentifyRequest::new(link, 5);
//!     if let Some(record) = probe(provider, &request, ChipDatabase::builtin()) {
//!         println!("{}", record);
//!     }
//! }
//! ```

#![warn(missing_docs)]
#![warn(rust_2018_idioms)]

pub mod chip;
pub mod error;
pub mod probe;
pub mod programmer;
pub mod protocol;
pub mod spi;

pub use error::{Error, Result};

//! Connection provider registry
//!
//! The CLI names a programmer with a string such as `dummy:id=EF4018` or
//! `linux_spi:dev=/dev/spidev0.0,gpiochip=1`; this crate parses it and
//! returns a boxed [`ConnectionProvider`](flashid_core::programmer::ConnectionProvider)
//! for the core to connect through. Programmers are compiled in through
//! cargo features.

#[cfg(feature = "linux-spi")]
mod linux;
mod registry;

#[cfg(feature = "linux-spi")]
pub use linux::LinuxProvider;
pub use registry::{
    available_programmers, open_provider, parse_programmer_params, programmer_names_short,
    ProgrammerInfo, ProgrammerParams,
};

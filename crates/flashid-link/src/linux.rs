//! spidev + GPIO chip-select provider

use flashid_core::error::Result;
use flashid_core::programmer::{ConnectionProvider, Link};
use flashid_core::spi::SpiBus;
use flashid_linux_gpio::{chip_path, LinuxGpioLine, DEFAULT_CHIP};
use flashid_linux_spi::{default_device, LinuxSpi};

/// Connection provider for Linux hosts
///
/// Opens the spidev node of the requested bus and claims the chip-select
/// pin from a GPIO chip on every `connect`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinuxProvider {
    device: Option<String>,
    gpiochip: String,
}

impl Default for LinuxProvider {
    fn default() -> Self {
        Self {
            device: None,
            gpiochip: DEFAULT_CHIP.to_string(),
        }
    }
}

impl LinuxProvider {
    /// Parse `linux_spi` programmer options
    ///
    /// - `dev=/dev/spidevX.Y`: spidev node (default `/dev/spidev<bus>.0`)
    /// - `gpiochip=<N|path>`: chip carrying the CS line (default `/dev/gpiochip0`)
    pub fn from_options(options: &[(&str, &str)]) -> std::result::Result<Self, String> {
        let mut provider = Self::default();

        for &(key, value) in options {
            match key {
                "dev" => provider.device = Some(value.to_string()),
                "gpiochip" => provider.gpiochip = chip_path(value).map_err(|e| e.to_string())?,
                _ => return Err(format!("Unknown linux_spi option: {}", key)),
            }
        }

        Ok(provider)
    }

    fn device_for(&self, bus: SpiBus) -> String {
        self.device.clone().unwrap_or_else(|| default_device(bus))
    }
}

impl ConnectionProvider for LinuxProvider {
    fn connect(&mut self, bus: SpiBus, cs_pin: u32) -> Result<Link> {
        let device = self.device_for(bus);
        let spi = LinuxSpi::open(&device)?;
        let cs = LinuxGpioLine::open(&self.gpiochip, cs_pin)?;

        log::info!(
            "linux_spi: Opened {} with CS on {} line {}",
            device,
            self.gpiochip,
            cs_pin
        );
        Ok(Link::new(spi, cs))
    }
}

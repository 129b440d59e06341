//! Linux SPI device implementation
//!
//! `LinuxSpi` implements [`SpiTransport`] on top of `/dev/spidevX.Y`.
//! The controller's own chip select is disabled (`SPI_NO_CS`) so that the
//! core can drive a GPIO around each transfer; plain `write` and `read`
//! then clock the bus without touching CS.

use crate::error::{LinuxSpiError, Result};

use flashid_core::error::Result as CoreResult;
use flashid_core::programmer::SpiTransport;
use flashid_core::spi::{LinkConfig, SpiBus};

use std::fs::{File, OpenOptions};
use std::io::{Read, Write};
use std::os::unix::io::AsRawFd;

/// Mode flag telling spidev to leave chip select alone
pub const SPI_NO_CS: u8 = 0x40;

/// Linux spidev ioctl constants
mod ioctl {
    use nix::ioctl_write_ptr;

    const SPI_IOC_MAGIC: u8 = b'k';

    const SPI_IOC_TYPE_MODE: u8 = 1;
    const SPI_IOC_TYPE_BITS_PER_WORD: u8 = 3;
    const SPI_IOC_TYPE_MAX_SPEED_HZ: u8 = 4;

    ioctl_write_ptr!(spi_ioc_wr_mode, SPI_IOC_MAGIC, SPI_IOC_TYPE_MODE, u8);
    ioctl_write_ptr!(
        spi_ioc_wr_bits_per_word,
        SPI_IOC_MAGIC,
        SPI_IOC_TYPE_BITS_PER_WORD,
        u8
    );
    ioctl_write_ptr!(
        spi_ioc_wr_max_speed_hz,
        SPI_IOC_MAGIC,
        SPI_IOC_TYPE_MAX_SPEED_HZ,
        u32
    );
}

/// Default spidev node for a bus (chip select 0 of that controller)
pub fn default_device(bus: SpiBus) -> String {
    format!("/dev/spidev{}.0", bus.index())
}

/// SPI transport using the spidev interface
pub struct LinuxSpi {
    file: File,
    path: String,
}

impl LinuxSpi {
    /// Open a spidev node
    ///
    /// The link is not configured until [`SpiTransport::configure`] runs.
    pub fn open(path: &str) -> Result<Self> {
        log::debug!("linux_spi: Opening device {}", path);

        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .open(path)
            .map_err(|e| LinuxSpiError::OpenFailed {
                path: path.to_string(),
                source: e,
            })?;

        Ok(Self {
            file,
            path: path.to_string(),
        })
    }

    /// Device path
    pub fn path(&self) -> &str {
        &self.path
    }

    fn apply(&mut self, config: &LinkConfig) -> Result<()> {
        let fd = self.file.as_raw_fd();

        let mode = config.mode() | SPI_NO_CS;
        unsafe {
            ioctl::spi_ioc_wr_mode(fd, &mode).map_err(|e| LinuxSpiError::SetModeFailed {
                mode,
                source: std::io::Error::from_raw_os_error(e as i32),
            })?;
        }

        let bits: u8 = 8;
        unsafe {
            ioctl::spi_ioc_wr_bits_per_word(fd, &bits).map_err(|e| {
                LinuxSpiError::SetBitsPerWordFailed {
                    bits,
                    source: std::io::Error::from_raw_os_error(e as i32),
                }
            })?;
        }

        let speed = config.baud_rate();
        unsafe {
            ioctl::spi_ioc_wr_max_speed_hz(fd, &speed).map_err(|e| {
                LinuxSpiError::SetSpeedFailed {
                    speed,
                    source: std::io::Error::from_raw_os_error(e as i32),
                }
            })?;
        }

        log::debug!(
            "linux_spi: {} set to mode {} at {} Hz",
            self.path,
            config.mode(),
            speed
        );
        Ok(())
    }
}

impl SpiTransport for LinuxSpi {
    fn configure(&mut self, config: &LinkConfig) -> CoreResult<()> {
        Ok(self.apply(config)?)
    }

    fn transmit(&mut self, data: &[u8]) -> CoreResult<()> {
        self.file
            .write_all(data)
            .map_err(LinuxSpiError::WriteFailed)?;
        Ok(())
    }

    fn receive(&mut self, count: usize) -> CoreResult<Vec<u8>> {
        let mut buf = vec![0u8; count];
        let n = self
            .file
            .read(&mut buf)
            .map_err(LinuxSpiError::ReadFailed)?;
        buf.truncate(n);
        Ok(buf)
    }
}

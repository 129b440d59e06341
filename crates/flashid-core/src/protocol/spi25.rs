//! SPI25 identification sequence
//!
//! The RDID exchange is driven with an explicit chip-select GPIO:
//!
//! 1. chip select: output, idle (high)
//! 2. configure the SPI link
//! 3. assert chip select (low)
//! 4. transmit `0x9F`
//! 5. receive 3 bytes
//! 6. deassert chip select (high), also on every error path
//!
//! There are no retries here; callers decide whether to try again.

use crate::chip::JedecId;
use crate::error::{Error, Result};
use crate::programmer::{ChipSelect, Direction, GpioTransport, Level, SpiTransport};
use crate::spi::{opcodes, LinkConfig};

/// Read the JEDEC ID from a flash chip
///
/// Returns [`Error::EmptyResponse`] when the flash answered with fewer
/// than 3 bytes, and [`Error::Configuration`] when the link rejected
/// `config` (nothing is transmitted in that case).
pub fn read_jedec_id<S, G>(spi: &mut S, cs: &mut G, config: &LinkConfig) -> Result<JedecId>
where
    S: SpiTransport + ?Sized,
    G: GpioTransport + ?Sized,
{
    cs.set_direction(Direction::Output)?;
    cs.set_level(Level::High)?;

    spi.configure(config).map_err(|e| match e {
        Error::Configuration(_) => e,
        other => Error::Configuration(other.to_string()),
    })?;
    log::debug!(
        "{} configured: {} Hz, mode {}",
        config.bus(),
        config.baud_rate(),
        config.mode()
    );

    log::info!("Sending RDID command...");
    let select = ChipSelect::assert(cs)?;
    spi.transmit(&[opcodes::RDID])?;
    let response = spi.receive(opcodes::RDID_RESPONSE_LEN)?;
    select.release()?;

    log::trace!("RDID response: {:02X?}", response);
    JedecId::from_response(&response)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spi::SpiBus;

    /// Transport that records calls as short strings
    #[derive(Default)]
    struct Scripted {
        log: Vec<String>,
        response: Vec<u8>,
        configure_error: Option<fn() -> Error>,
        transmit_fails: bool,
    }

    impl SpiTransport for Scripted {
        fn configure(&mut self, _config: &LinkConfig) -> Result<()> {
            self.log.push("configure".into());
            match self.configure_error {
                Some(make) => Err(make()),
                None => Ok(()),
            }
        }

        fn transmit(&mut self, data: &[u8]) -> Result<()> {
            self.log.push(format!("tx {:02X?}", data));
            if self.transmit_fails {
                return Err(Error::Transport("bus fault".into()));
            }
            Ok(())
        }

        fn receive(&mut self, count: usize) -> Result<Vec<u8>> {
            self.log.push(format!("rx {}", count));
            Ok(self.response.clone())
        }
    }

    #[derive(Default)]
    struct Pin {
        levels: Vec<Level>,
        direction: Option<Direction>,
    }

    impl GpioTransport for Pin {
        fn set_direction(&mut self, direction: Direction) -> Result<()> {
            self.direction = Some(direction);
            Ok(())
        }

        fn set_level(&mut self, level: Level) -> Result<()> {
            self.levels.push(level);
            Ok(())
        }
    }

    fn link() -> LinkConfig {
        LinkConfig::new(SpiBus::Bus0, 1_000_000, false, false).unwrap()
    }

    #[test]
    fn test_read_jedec_id() {
        let mut spi = Scripted {
            response: vec![0x1F, 0x43, 0x00],
            ..Default::default()
        };
        let mut cs = Pin::default();

        let id = read_jedec_id(&mut spi, &mut cs, &link()).unwrap();

        assert_eq!(id, JedecId::new(0x1F, 0x43, 0x00));
        assert_eq!(spi.log, ["configure", "tx [9F]", "rx 3"]);
        assert_eq!(cs.direction, Some(Direction::Output));
        assert_eq!(cs.levels, [Level::High, Level::Low, Level::High]);
    }

    #[test]
    fn test_partial_response_is_empty() {
        let mut spi = Scripted {
            response: vec![0x1F],
            ..Default::default()
        };
        let mut cs = Pin::default();

        let err = read_jedec_id(&mut spi, &mut cs, &link()).unwrap_err();
        assert!(matches!(err, Error::EmptyResponse));
        assert_eq!(cs.levels.last(), Some(&Level::High));
    }

    #[test]
    fn test_configure_error_is_relabelled() {
        let mut spi = Scripted {
            configure_error: Some(|| Error::Transport("ioctl failed".into())),
            ..Default::default()
        };
        let mut cs = Pin::default();

        let err = read_jedec_id(&mut spi, &mut cs, &link()).unwrap_err();
        assert!(matches!(err, Error::Configuration(ref msg) if msg.contains("ioctl failed")));
        assert_eq!(spi.log, ["configure"]);
        assert_eq!(cs.levels, [Level::High]);
    }

    #[test]
    fn test_transmit_error_releases_chip_select() {
        let mut spi = Scripted {
            transmit_fails: true,
            ..Default::default()
        };
        let mut cs = Pin::default();

        let err = read_jedec_id(&mut spi, &mut cs, &link()).unwrap_err();
        assert!(matches!(err, Error::Transport(_)));
        assert_eq!(spi.log, ["configure", "tx [9F]"]);
        assert_eq!(cs.levels, [Level::High, Level::Low, Level::High]);
    }

    mod timeline {
        use super::*;
        use std::cell::RefCell;

        thread_local! {
            static ENTRIES: RefCell<Vec<String>> = const { RefCell::new(Vec::new()) };
        }

        fn push(entry: String) {
            ENTRIES.with(|e| e.borrow_mut().push(entry));
        }

        struct Recorder;

        impl log::Log for Recorder {
            fn enabled(&self, metadata: &log::Metadata<'_>) -> bool {
                metadata.level() <= log::Level::Info
            }

            fn log(&self, record: &log::Record<'_>) {
                if self.enabled(record.metadata()) {
                    push(format!("log {}", record.args()));
                }
            }

            fn flush(&self) {}
        }

        static RECORDER: Recorder = Recorder;

        struct Wire;

        impl SpiTransport for Wire {
            fn configure(&mut self, _config: &LinkConfig) -> Result<()> {
                push("configure".into());
                Ok(())
            }

            fn transmit(&mut self, data: &[u8]) -> Result<()> {
                push(format!("tx {:02X?}", data));
                Ok(())
            }

            fn receive(&mut self, _count: usize) -> Result<Vec<u8>> {
                push("rx".into());
                Ok(vec![0x1F, 0x43, 0x00])
            }
        }

        impl GpioTransport for Wire {
            fn set_direction(&mut self, _direction: Direction) -> Result<()> {
                Ok(())
            }

            fn set_level(&mut self, level: Level) -> Result<()> {
                push(format!("cs {:?}", level));
                Ok(())
            }
        }

        #[test]
        fn test_announces_after_configure() {
            let _ = log::set_logger(&RECORDER);
            log::set_max_level(log::LevelFilter::Info);

            let mut spi = Wire;
            let mut cs = Wire;
            read_jedec_id(&mut spi, &mut cs, &link()).unwrap();

            let entries = ENTRIES.with(|e| e.borrow().clone());
            assert_eq!(
                entries,
                [
                    "cs High",
                    "configure",
                    "log Sending RDID command...",
                    "cs Low",
                    "tx [9F]",
                    "rx",
                    "cs High",
                ]
            );
        }
    }
}

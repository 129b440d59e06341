//! Top-level identification call
//!
//! [`identify`] connects and runs the RDID exchange, returning typed
//! errors. [`probe`] wraps it as the outermost boundary: every failure is
//! logged and turned into `None`, and a successful answer is resolved
//! against a [`ChipDatabase`] and reported.

use crate::chip::{ChipDatabase, IdentificationRecord, JedecId};
use crate::error::{Error, Result};
use crate::programmer::ConnectionProvider;
use crate::protocol::read_jedec_id;
use crate::spi::LinkConfig;

/// Log target used for the final identification report
pub const RESULT_TARGET: &str = "flashid::result";

/// Parameters of one identification call
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IdentifyRequest {
    /// SPI link parameters
    pub link: LinkConfig,
    /// GPIO used as chip select
    pub cs_pin: u32,
}

impl IdentifyRequest {
    /// Create a request
    pub const fn new(link: LinkConfig, cs_pin: u32) -> Self {
        Self { link, cs_pin }
    }
}

/// Connect through `provider` and read the JEDEC ID
pub fn identify<P>(provider: &mut P, request: &IdentifyRequest) -> Result<JedecId>
where
    P: ConnectionProvider + ?Sized,
{
    let mut link = provider.connect(request.link.bus(), request.cs_pin)?;
    read_jedec_id(link.spi.as_mut(), link.cs.as_mut(), &request.link)
}

/// Identify the flash and resolve it against `db`
///
/// Returns `None` after logging the reason if no ID could be read.
/// Database misses still return a record, with the names left empty.
pub fn probe<'db, P>(
    provider: &mut P,
    request: &IdentifyRequest,
    db: &'db ChipDatabase,
) -> Option<IdentificationRecord<'db>>
where
    P: ConnectionProvider + ?Sized,
{
    match identify(provider, request) {
        Ok(id) => {
            let record = db.resolve(id);
            report(&record);
            Some(record)
        }
        Err(Error::EmptyResponse) => {
            log::error!("Unable to get a response from the SPI flash");
            None
        }
        Err(e) => {
            log::error!("Identification failed: {}", e);
            None
        }
    }
}

fn report(record: &IdentificationRecord<'_>) {
    let id = record.id;
    log::info!(
        target: RESULT_TARGET,
        "SPI flash ID:\n   - Manufacturer: {:02X}\n   - Memory type: {:02X}\n   - Device ID: {:02X}",
        id.manufacturer,
        id.memory_type,
        id.device
    );

    match (record.manufacturer_name(), record.chip()) {
        (Some(vendor), Some(chip)) => log::info!(
            target: RESULT_TARGET,
            "Found {} {} ({} sectors, {} bytes)",
            vendor,
            chip.name,
            chip.features.sectors,
            chip.features.capacity()
        ),
        (Some(vendor), None) => log::info!(
            target: RESULT_TARGET,
            "Manufacturer {} found, chip {:04X} not in database",
            vendor,
            id.chip_key()
        ),
        _ => log::info!(
            target: RESULT_TARGET,
            "Manufacturer {:02X} not in database",
            id.manufacturer
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::programmer::Link;
    use crate::spi::SpiBus;

    struct NoHardware {
        attempts: usize,
    }

    impl ConnectionProvider for NoHardware {
        fn connect(&mut self, bus: SpiBus, _cs_pin: u32) -> Result<Link> {
            self.attempts += 1;
            Err(Error::ConnectionUnavailable(format!("nothing on {}", bus)))
        }
    }

    #[test]
    fn test_identify_propagates_connection_error() {
        let mut provider = NoHardware { attempts: 0 };
        let err = identify(&mut provider, &IdentifyRequest::default()).unwrap_err();
        assert!(matches!(err, Error::ConnectionUnavailable(_)));
        assert_eq!(provider.attempts, 1);
    }

    #[test]
    fn test_probe_without_hardware() {
        let mut provider = NoHardware { attempts: 0 };
        let request = IdentifyRequest::new(LinkConfig::default(), 7);
        assert!(probe(&mut provider, &request, ChipDatabase::builtin()).is_none());
    }
}

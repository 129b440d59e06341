//! Hardware identification command

use crate::cli::LinkArgs;
use flashid_core::chip::ChipDatabase;
use flashid_core::probe::probe;

/// Identify the flash behind `programmer`
///
/// Returns `Ok(false)` when no ID could be read; the reason has been logged.
pub fn run_identify(
    programmer: &str,
    link: &LinkArgs,
    db: &ChipDatabase,
) -> Result<bool, Box<dyn std::error::Error>> {
    let request = link.to_request()?;
    let mut provider = flashid_link::open_provider(programmer)?;

    log::debug!(
        "Identifying on {} (CS GPIO {}, {} Hz, mode {})",
        request.link.bus(),
        request.cs_pin,
        request.link.baud_rate(),
        request.link.mode()
    );

    match probe(provider.as_mut(), &request, db) {
        Some(record) => {
            super::print_record(&record);
            Ok(true)
        }
        None => Ok(false),
    }
}

#[cfg(all(test, feature = "dummy"))]
mod tests {
    use super::*;

    fn link() -> LinkArgs {
        LinkArgs {
            bus: 0,
            cs_pin: 5,
            baudrate: 1_000_000,
            polarity: 0,
            phase: 0,
        }
    }

    #[test]
    fn test_identify_dummy() {
        let db = ChipDatabase::builtin();
        assert!(run_identify("dummy", &link(), db).unwrap());
        assert!(run_identify("dummy:id=AABBCC", &link(), db).unwrap());
        assert!(!run_identify("dummy:empty=1", &link(), db).unwrap());
    }

    #[test]
    fn test_identify_rejected_link() {
        let db = ChipDatabase::builtin();
        assert!(!run_identify("dummy:max_baud=100000", &link(), db).unwrap());
        assert!(run_identify("nosuch", &link(), db).is_err());
    }
}

//! Offline ID lookup

use flashid_core::chip::{ChipDatabase, JedecId};

/// Resolve a JEDEC ID given as text
pub fn run_decode(text: &str, db: &ChipDatabase) -> Result<(), Box<dyn std::error::Error>> {
    let id: JedecId = text.parse()?;
    let record = db.resolve(id);
    log::debug!("Decoded {} as {}", text, record);
    super::print_record(&record);
    Ok(())
}

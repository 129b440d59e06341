//! Identification resolver

use core::fmt;

use super::database::ChipDatabase;
use super::types::{ChipRecord, JedecId, Manufacturer};

/// How far a JEDEC ID could be resolved
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution<'db> {
    /// Manufacturer code is not in the database
    Unknown,
    /// Manufacturer is known but the chip key is not
    ManufacturerOnly {
        /// Matching manufacturer
        manufacturer: &'db Manufacturer,
    },
    /// Both manufacturer and chip are known
    Identified {
        /// Matching manufacturer
        manufacturer: &'db Manufacturer,
        /// Matching chip
        chip: &'db ChipRecord,
    },
}

/// Result of resolving a JEDEC ID
///
/// Always carries the raw codes; names and features are borrowed from the
/// database when it has a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IdentificationRecord<'db> {
    /// The decoded RDID answer
    pub id: JedecId,
    /// Lookup outcome
    pub resolution: Resolution<'db>,
}

impl<'db> IdentificationRecord<'db> {
    /// Manufacturer name, if known
    pub fn manufacturer_name(&self) -> Option<&'db str> {
        match self.resolution {
            Resolution::Unknown => None,
            Resolution::ManufacturerOnly { manufacturer }
            | Resolution::Identified { manufacturer, .. } => Some(manufacturer.name.as_str()),
        }
    }

    /// Chip record, if known
    pub fn chip(&self) -> Option<&'db ChipRecord> {
        match self.resolution {
            Resolution::Identified { chip, .. } => Some(chip),
            _ => None,
        }
    }

    /// Chip name, if known
    pub fn chip_name(&self) -> Option<&'db str> {
        self.chip().map(|chip| chip.name.as_str())
    }

    /// Sector count, if the chip is known
    pub fn sectors(&self) -> Option<u32> {
        self.chip().map(|chip| chip.features.sectors)
    }

    /// Capacity in bytes, if the chip is known
    pub fn capacity(&self) -> Option<u64> {
        self.chip().map(|chip| chip.features.capacity())
    }

    /// Check if both manufacturer and chip were found
    pub fn is_identified(&self) -> bool {
        matches!(self.resolution, Resolution::Identified { .. })
    }
}

impl fmt::Display for IdentificationRecord<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.resolution {
            Resolution::Unknown => write!(f, "{} (unknown manufacturer)", self.id),
            Resolution::ManufacturerOnly { manufacturer } => {
                write!(f, "{} ({}, unknown chip)", self.id, manufacturer.name)
            }
            Resolution::Identified { manufacturer, chip } => {
                write!(f, "{} ({} {})", self.id, manufacturer.name, chip.name)
            }
        }
    }
}

/// Resolve a JEDEC ID against a chip database
///
/// The manufacturer byte selects the vendor; the memory-type and device
/// bytes, in that order, form the chip key. Misses are not errors.
pub fn resolve(db: &ChipDatabase, id: JedecId) -> IdentificationRecord<'_> {
    let resolution = match db.manufacturer(id.manufacturer) {
        None => Resolution::Unknown,
        Some(manufacturer) => match manufacturer.chip(id.chip_key()) {
            None => Resolution::ManufacturerOnly { manufacturer },
            Some(chip) => Resolution::Identified { manufacturer, chip },
        },
    };

    IdentificationRecord { id, resolution }
}

//! Chip database for lookup and runtime loading
//!
//! This module provides the `ChipDatabase` type: a two-level table from
//! manufacturer code to chip key to chip record. Besides the compiled-in
//! table it can be extended from RON vendor files at runtime.

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::Path;

use thiserror::Error;

use super::builtin;
use super::resolve::{resolve, IdentificationRecord};
use super::types::{ChipFeatures, ChipRecord, JedecId, Manufacturer, DEFAULT_SECTOR_SIZE};
use super::Features;

/// Error type for chip database operations
#[derive(Debug, Error)]
pub enum ChipDbError {
    /// I/O error reading files
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    /// RON parsing error
    #[error("Parse error: {0}")]
    Parse(#[from] ron::error::SpannedError),
    /// Validation error
    #[error("Validation error: {0}")]
    Validation(String),
}

// ============================================================================
// RON deserialization types (intermediate format)
// ============================================================================

/// Size specification with human-readable units (for RON parsing)
#[derive(Debug, Clone, Copy, serde::Deserialize)]
pub enum Size {
    /// Size in bytes
    B(u32),
    /// Size in kibibytes (1024 bytes)
    KiB(u32),
    /// Size in mebibytes (1024 * 1024 bytes)
    MiB(u32),
}

impl Size {
    /// Convert to bytes, `None` if the result does not fit in a `u32`
    pub fn to_bytes(self) -> Option<u32> {
        match self {
            Size::B(n) => Some(n),
            Size::KiB(n) => n.checked_mul(1024),
            Size::MiB(n) => n.checked_mul(1024 * 1024),
        }
    }
}

/// Feature flags for flash chips (RON format)
#[derive(Debug, Clone, Copy, Default, serde::Deserialize)]
#[serde(default)]
struct FeaturesDef {
    fast_read: bool,
    dual_io: bool,
    quad_io: bool,
    qpi: bool,
    four_byte_addr: bool,
    sfdp: bool,
    otp: bool,
    security_reg: bool,
    deep_power_down: bool,
    erase_4k: bool,
    erase_32k: bool,
    erase_64k: bool,
}

impl From<FeaturesDef> for Features {
    fn from(def: FeaturesDef) -> Self {
        [
            (def.fast_read, Features::FAST_READ),
            (def.dual_io, Features::DUAL_IO),
            (def.quad_io, Features::QUAD_IO),
            (def.qpi, Features::QPI),
            (def.four_byte_addr, Features::FOUR_BYTE_ADDR),
            (def.sfdp, Features::SFDP),
            (def.otp, Features::OTP),
            (def.security_reg, Features::SECURITY_REG),
            (def.deep_power_down, Features::DEEP_POWER_DOWN),
            (def.erase_4k, Features::ERASE_4K),
            (def.erase_32k, Features::ERASE_32K),
            (def.erase_64k, Features::ERASE_64K),
        ]
        .into_iter()
        .filter(|(set, _)| *set)
        .fold(Features::empty(), |acc, (_, flag)| acc | flag)
    }
}

/// Single chip definition in RON format
#[derive(Debug, Clone, serde::Deserialize)]
struct ChipDef {
    name: String,
    /// Memory type (high byte) and device id (low byte)
    device_id: u16,
    sectors: u32,
    #[serde(default = "default_sector_size")]
    sector_size: Size,
    #[serde(default)]
    features: FeaturesDef,
}

fn default_sector_size() -> Size {
    Size::B(DEFAULT_SECTOR_SIZE)
}

/// Vendor definition containing multiple chips
#[derive(Debug, Clone, serde::Deserialize)]
struct VendorDef {
    vendor: String,
    manufacturer_id: u8,
    chips: Vec<ChipDef>,
}

// ============================================================================
// Chip database
// ============================================================================

/// Two-level chip database
///
/// Maps a manufacturer code to a [`Manufacturer`], which in turn maps the
/// 2-byte memory-type/device key to a [`ChipRecord`]. Lookup misses are
/// normal: unknown and new chips exist.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChipDatabase {
    manufacturers: BTreeMap<u8, Manufacturer>,
}

impl ChipDatabase {
    /// Create an empty chip database
    pub fn new() -> Self {
        Self {
            manufacturers: BTreeMap::new(),
        }
    }

    /// The compiled-in database
    ///
    /// Built on first use and shared read-only for the rest of the process.
    pub fn builtin() -> &'static ChipDatabase {
        &builtin::BUILTIN
    }

    /// Get or create the entry for a manufacturer code
    ///
    /// An existing entry keeps its name.
    pub fn insert_manufacturer(&mut self, id: u8, name: impl Into<String>) -> &mut Manufacturer {
        self.manufacturers
            .entry(id)
            .or_insert_with(|| Manufacturer::new(name))
    }

    /// Load chip definitions from a single RON file
    pub fn load_file(&mut self, path: &Path) -> Result<usize, ChipDbError> {
        let content = fs::read_to_string(path)?;
        self.load_ron(&content)
    }

    /// Load chip definitions from a RON string
    ///
    /// Chips are merged into any existing entry for the same manufacturer;
    /// a chip with an already known key replaces the earlier record.
    pub fn load_ron(&mut self, content: &str) -> Result<usize, ChipDbError> {
        let vendor_def: VendorDef = ron::from_str(content)?;

        if vendor_def.vendor.trim().is_empty() {
            return Err(ChipDbError::Validation(format!(
                "manufacturer 0x{:02X} has an empty vendor name",
                vendor_def.manufacturer_id
            )));
        }
        let mut records = Vec::with_capacity(vendor_def.chips.len());
        for chip_def in vendor_def.chips {
            if chip_def.name.trim().is_empty() {
                return Err(ChipDbError::Validation(format!(
                    "chip 0x{:04X} of {} has an empty name",
                    chip_def.device_id, vendor_def.vendor
                )));
            }
            let sector_size = chip_def.sector_size.to_bytes().ok_or_else(|| {
                ChipDbError::Validation(format!(
                    "chip {} has a sector size above 4 GiB ({:?})",
                    chip_def.name, chip_def.sector_size
                ))
            })?;
            if chip_def.sectors == 0 || sector_size == 0 {
                return Err(ChipDbError::Validation(format!(
                    "chip {} has no sectors",
                    chip_def.name
                )));
            }
            let features = ChipFeatures::new(chip_def.sectors)
                .with_sector_size(sector_size)
                .with_flags(chip_def.features.into());
            records.push((chip_def.device_id, ChipRecord::new(chip_def.name, features)));
        }

        let count = records.len();
        let manufacturer =
            self.insert_manufacturer(vendor_def.manufacturer_id, vendor_def.vendor.clone());
        if manufacturer.name != vendor_def.vendor {
            log::debug!(
                "Vendor {} merged into existing manufacturer {} (0x{:02X})",
                vendor_def.vendor,
                manufacturer.name,
                vendor_def.manufacturer_id
            );
        }

        for (device_id, chip) in records {
            if let Some(old) = manufacturer.insert(device_id, chip) {
                log::warn!(
                    "Chip {:02X}{:04X} ({}) redefined, replacing earlier entry",
                    vendor_def.manufacturer_id,
                    device_id,
                    old.name
                );
            }
        }

        Ok(count)
    }

    /// Load all RON files from a directory, in file name order
    ///
    /// Either every file is merged or, on the first error, none is.
    pub fn load_dir(&mut self, dir: &Path) -> Result<usize, ChipDbError> {
        let mut paths = Vec::new();
        for entry in fs::read_dir(dir)? {
            let path = entry?.path();
            if path.extension().is_some_and(|ext| ext == "ron") {
                paths.push(path);
            }
        }
        paths.sort();

        let mut scratch = self.clone();
        let mut total = 0;
        for path in &paths {
            total += scratch.load_file(path)?;
        }

        *self = scratch;
        Ok(total)
    }

    /// Look up a manufacturer by its code
    pub fn manufacturer(&self, id: u8) -> Option<&Manufacturer> {
        self.manufacturers.get(&id)
    }

    /// Look up a chip by manufacturer code and chip key
    pub fn chip(&self, manufacturer: u8, key: u16) -> Option<&ChipRecord> {
        self.manufacturer(manufacturer)?.chip(key)
    }

    /// Resolve a JEDEC ID against this database
    pub fn resolve(&self, id: JedecId) -> IdentificationRecord<'_> {
        resolve(self, id)
    }

    /// Iterate over manufacturers in code order
    pub fn iter(&self) -> impl Iterator<Item = (u8, &Manufacturer)> {
        self.manufacturers.iter().map(|(&id, m)| (id, m))
    }

    /// Find manufacturers by name (case-insensitive partial match)
    pub fn find_by_vendor(&self, vendor: &str) -> Vec<(u8, &Manufacturer)> {
        let vendor_lower = vendor.to_lowercase();
        self.iter()
            .filter(|(_, m)| m.name.to_lowercase().contains(&vendor_lower))
            .collect()
    }

    /// Get the number of chips in the database
    pub fn len(&self) -> usize {
        self.manufacturers.values().map(Manufacturer::len).sum()
    }

    /// Get the number of manufacturers in the database
    pub fn manufacturer_count(&self) -> usize {
        self.manufacturers.len()
    }

    /// Check if the database is empty
    pub fn is_empty(&self) -> bool {
        self.manufacturers.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ATMEL_RON: &str = r#"
    (
        vendor: "ATMEL",
        manufacturer_id: 0x1F,
        chips: [
            (
                name: "AT25SF041",
                device_id: 0x4300,
                sectors: 128,
                features: (
                    fast_read: true,
                    erase_4k: true,
                ),
            ),
            (
                name: "AT25DF081A",
                device_id: 0x4501,
                sectors: 16,
                sector_size: KiB(64),
            ),
        ],
    )
    "#;

    #[test]
    fn test_load_ron() {
        let mut db = ChipDatabase::new();
        let count = db.load_ron(ATMEL_RON).unwrap();

        assert_eq!(count, 2);
        assert_eq!(db.len(), 2);
        assert_eq!(db.manufacturer_count(), 1);

        let chip = db.chip(0x1F, 0x4300).unwrap();
        assert_eq!(chip.name, "AT25SF041");
        assert_eq!(chip.features.sectors, 128);
        assert_eq!(chip.features.sector_size, 4096);
        assert!(chip.features.flags.contains(Features::FAST_READ));
        assert!(chip.features.flags.contains(Features::ERASE_4K));
        assert!(!chip.features.flags.contains(Features::QUAD_IO));

        let chip = db.chip(0x1F, 0x4501).unwrap();
        assert_eq!(chip.features.sector_size, 64 * 1024);
        assert_eq!(chip.features.capacity(), 1024 * 1024);
    }

    #[test]
    fn test_merge_and_replace() {
        let mut db = ChipDatabase::new();
        db.insert_manufacturer(0x1F, "ATMEL")
            .insert(0x4300, ChipRecord::new("OLD", ChipFeatures::new(1)));
        db.insert_manufacturer(0x1F, "Ignored")
            .insert(0x9999, ChipRecord::new("OTHER", ChipFeatures::new(2)));

        db.load_ron(ATMEL_RON).unwrap();

        let atmel = db.manufacturer(0x1F).unwrap();
        assert_eq!(atmel.name, "ATMEL");
        assert_eq!(atmel.len(), 3);
        assert_eq!(atmel.chip(0x4300).unwrap().name, "AT25SF041");
        assert_eq!(atmel.chip(0x9999).unwrap().name, "OTHER");
    }

    #[test]
    fn test_validation() {
        let mut db = ChipDatabase::new();
        let no_sectors = r#"(vendor: "X", manufacturer_id: 0x01, chips: [(name: "A", device_id: 1, sectors: 0)])"#;
        assert!(matches!(
            db.load_ron(no_sectors),
            Err(ChipDbError::Validation(_))
        ));
        let no_name = r#"(vendor: "X", manufacturer_id: 0x01, chips: [(name: " ", device_id: 1, sectors: 4)])"#;
        assert!(matches!(db.load_ron(no_name), Err(ChipDbError::Validation(_))));
        assert!(matches!(db.load_ron("(vendor: "), Err(ChipDbError::Parse(_))));
        assert!(db.is_empty());
    }

    #[test]
    fn test_find_by_vendor() {
        let db = ChipDatabase::builtin();
        let found = db.find_by_vendor("atm");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].0, 0x1F);
        assert!(db.find_by_vendor("nonexistent").is_empty());
    }

    #[test]
    fn test_size_conversion() {
        assert_eq!(Size::B(256).to_bytes(), Some(256));
        assert_eq!(Size::KiB(4).to_bytes(), Some(4096));
        assert_eq!(Size::KiB(64).to_bytes(), Some(65536));
        assert_eq!(Size::MiB(1).to_bytes(), Some(1048576));
        assert_eq!(Size::MiB(4096).to_bytes(), None);
        assert_eq!(Size::KiB(u32::MAX).to_bytes(), None);
    }

    #[test]
    fn test_oversized_sector_is_rejected() {
        let mut db = ChipDatabase::new();
        db.insert_manufacturer(0x01, "X");
        let huge = r#"(vendor: "X", manufacturer_id: 0x01, chips: [
            (name: "A", device_id: 1, sectors: 4),
            (name: "B", device_id: 2, sectors: 4, sector_size: MiB(4096)),
        ])"#;
        match db.load_ron(huge) {
            Err(ChipDbError::Validation(msg)) => assert!(msg.contains("chip B")),
            other => panic!("expected validation error, got {:?}", other),
        }
        assert!(db.manufacturer(0x01).unwrap().is_empty());
    }

    #[test]
    fn test_load_dir_is_all_or_nothing() {
        let dir = std::env::temp_dir().join(format!("flashid-chipdb-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("a_atmel.ron"), ATMEL_RON).unwrap();
        fs::write(dir.join("b_broken.ron"), "(vendor: ").unwrap();

        let mut db = ChipDatabase::new();
        let result = db.load_dir(&dir);
        assert!(matches!(result, Err(ChipDbError::Parse(_))));
        assert!(db.is_empty());

        fs::remove_file(dir.join("b_broken.ron")).unwrap();
        assert_eq!(db.load_dir(&dir).unwrap(), 2);
        assert_eq!(db.len(), 2);

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_error_messages() {
        let err = ChipDbError::Validation("chip A has no sectors".into());
        assert_eq!(err.to_string(), "Validation error: chip A has no sectors");
        let err = ChipDbError::from(io::Error::from(io::ErrorKind::NotFound));
        assert!(err.to_string().starts_with("I/O error: "));
    }
}

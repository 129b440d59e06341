//! Identification type definitions

use core::fmt;
use core::str::FromStr;
use std::collections::BTreeMap;

use super::features::Features;
use crate::error::{Error, Result};
use crate::spi::opcodes::RDID_RESPONSE_LEN;

/// Default sector size in bytes (4 KiB)
pub const DEFAULT_SECTOR_SIZE: u32 = 4096;

/// Decoded RDID answer
///
/// Holds the raw byte values; the hex text produced by `Display` is only
/// for presentation; lookups always use the bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct JedecId {
    /// Manufacturer code (byte 0)
    pub manufacturer: u8,
    /// Memory-type code (byte 1)
    pub memory_type: u8,
    /// Device-id code (byte 2)
    pub device: u8,
}

impl JedecId {
    /// Create an ID from its three codes
    pub const fn new(manufacturer: u8, memory_type: u8, device: u8) -> Self {
        Self {
            manufacturer,
            memory_type,
            device,
        }
    }

    /// Decode a raw RDID response
    ///
    /// Exactly 3 bytes are required. Fewer (including none) means the flash
    /// did not answer and yields [`Error::EmptyResponse`]; more is a
    /// protocol violation and yields [`Error::MalformedResponse`].
    pub fn from_response(bytes: &[u8]) -> Result<Self> {
        match *bytes {
            [manufacturer, memory_type, device] => {
                Ok(Self::new(manufacturer, memory_type, device))
            }
            _ if bytes.len() < RDID_RESPONSE_LEN => Err(Error::EmptyResponse),
            _ => Err(Error::MalformedResponse(bytes.len())),
        }
    }

    /// The 2-byte chip key: memory type (high byte) then device id
    pub const fn chip_key(&self) -> u16 {
        u16::from_be_bytes([self.memory_type, self.device])
    }

    /// Raw bytes in wire order
    pub const fn to_bytes(&self) -> [u8; 3] {
        [self.manufacturer, self.memory_type, self.device]
    }

    /// 6 uppercase hex characters, e.g. `1F4300`
    pub fn to_hex(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for JedecId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:02X}{:02X}{:02X}",
            self.manufacturer, self.memory_type, self.device
        )
    }
}

impl FromStr for JedecId {
    type Err = Error;

    /// Parse 6 hex digits, e.g. `1F4300`, `0x1f4300` or `1F 43 00`
    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        let body = trimmed
            .strip_prefix("0x")
            .or_else(|| trimmed.strip_prefix("0X"))
            .unwrap_or(trimmed);
        let digits: String = body
            .chars()
            .filter(|c| !matches!(c, ' ' | ':'))
            .collect();

        if digits.len() != 6 || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(Error::InvalidJedecId(s.to_string()));
        }
        let value =
            u32::from_str_radix(&digits, 16).map_err(|_| Error::InvalidJedecId(s.to_string()))?;
        let [_, manufacturer, memory_type, device] = value.to_be_bytes();
        Ok(Self::new(manufacturer, memory_type, device))
    }
}

/// Chip characteristics stored in the database
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChipFeatures {
    /// Number of erase sectors
    pub sectors: u32,
    /// Size of each sector in bytes
    pub sector_size: u32,
    /// Capability flags
    pub flags: Features,
}

impl ChipFeatures {
    /// Features with `sectors` sectors of [`DEFAULT_SECTOR_SIZE`] and no flags
    pub const fn new(sectors: u32) -> Self {
        Self {
            sectors,
            sector_size: DEFAULT_SECTOR_SIZE,
            flags: Features::empty(),
        }
    }

    /// Replace the capability flags
    pub const fn with_flags(mut self, flags: Features) -> Self {
        self.flags = flags;
        self
    }

    /// Replace the sector size
    pub const fn with_sector_size(mut self, sector_size: u32) -> Self {
        self.sector_size = sector_size;
        self
    }

    /// Total capacity in bytes
    pub const fn capacity(&self) -> u64 {
        self.sectors as u64 * self.sector_size as u64
    }
}

/// A known chip model
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChipRecord {
    /// Chip model name (e.g., "AT25SF041")
    pub name: String,
    /// Geometry and capabilities
    pub features: ChipFeatures,
}

impl ChipRecord {
    /// Create a chip record
    pub fn new(name: impl Into<String>, features: ChipFeatures) -> Self {
        Self {
            name: name.into(),
            features,
        }
    }
}

/// A manufacturer and the chips known for it, keyed by [`JedecId::chip_key`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Manufacturer {
    /// Vendor name (e.g., "ATMEL")
    pub name: String,
    chips: BTreeMap<u16, ChipRecord>,
}

impl Manufacturer {
    /// Create a manufacturer with no chips
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            chips: BTreeMap::new(),
        }
    }

    /// Add a chip, returning the record it replaced, if any
    pub fn insert(&mut self, key: u16, chip: ChipRecord) -> Option<ChipRecord> {
        self.chips.insert(key, chip)
    }

    /// Look up a chip by its 2-byte key
    pub fn chip(&self, key: u16) -> Option<&ChipRecord> {
        self.chips.get(&key)
    }

    /// Iterate over chips in key order
    pub fn chips(&self) -> impl Iterator<Item = (u16, &ChipRecord)> {
        self.chips.iter().map(|(&key, chip)| (key, chip))
    }

    /// Number of chips known for this manufacturer
    pub fn len(&self) -> usize {
        self.chips.len()
    }

    /// Check if no chips are known for this manufacturer
    pub fn is_empty(&self) -> bool {
        self.chips.is_empty()
    }
}

/// JEDEC manufacturer IDs
pub mod manufacturer {
    /// Atmel (now Adesto/Renesas)
    pub const ATMEL: u8 = 0x1F;
    /// EON
    pub const EON: u8 = 0x1C;
    /// GigaDevice
    pub const GIGADEVICE: u8 = 0xC8;
    /// Macronix
    pub const MACRONIX: u8 = 0xC2;
    /// SST (now Microchip)
    pub const SST: u8 = 0xBF;
    /// Winbond
    pub const WINBOND: u8 = 0xEF;
}

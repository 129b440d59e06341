//! Compiled-in chip table
//!
//! Entries follow the JEDEC IDs listed in flashrom's `flashchips.h`.
//! Sector counts are in 4 KiB sectors.

use once_cell::sync::Lazy;

use super::types::{manufacturer, ChipFeatures, ChipRecord};
use super::{ChipDatabase, Features};

struct StaticChip {
    device_id: u16,
    name: &'static str,
    sectors: u32,
    flags: Features,
}

struct StaticVendor {
    id: u8,
    name: &'static str,
    chips: &'static [StaticChip],
}

const fn chip(device_id: u16, name: &'static str, sectors: u32, flags: Features) -> StaticChip {
    StaticChip {
        device_id,
        name,
        sectors,
        flags,
    }
}

/// Plain 25-series part: fast read and 4K/64K erase
const BASIC: Features = Features::FAST_READ
    .union(Features::ERASE_4K)
    .union(Features::ERASE_64K);

/// Dual/quad capable part with SFDP
const QUAD: Features = BASIC
    .union(Features::ERASE_32K)
    .union(Features::DUAL_IO)
    .union(Features::QUAD_IO)
    .union(Features::SFDP);

static VENDORS: &[StaticVendor] = &[
    StaticVendor {
        id: manufacturer::EON,
        name: "EON",
        chips: &[
            chip(0x3016, "EN25Q32", 1024, QUAD),
            chip(0x3017, "EN25Q64", 2048, QUAD),
        ],
    },
    StaticVendor {
        id: manufacturer::ATMEL,
        name: "ATMEL",
        chips: &[
            chip(0x4300, "AT25SF041", 128, BASIC),
            chip(0x4401, "AT25DF041A", 128, BASIC),
            chip(0x4501, "AT25DF081A", 256, BASIC),
            chip(0x4602, "AT25DF161", 512, BASIC),
            chip(0x4701, "AT25DF321A", 1024, BASIC),
            chip(0x4800, "AT25DF641", 2048, BASIC),
        ],
    },
    StaticVendor {
        id: manufacturer::SST,
        name: "SST",
        chips: &[
            chip(0x2541, "SST25VF016B", 512, BASIC),
            chip(0x254A, "SST25VF032B", 1024, BASIC),
            chip(0x2643, "SST26VF064B", 2048, QUAD),
        ],
    },
    StaticVendor {
        id: manufacturer::MACRONIX,
        name: "Macronix",
        chips: &[
            chip(0x2013, "MX25L4005", 128, BASIC),
            chip(0x2014, "MX25L8005", 256, BASIC),
            chip(0x2015, "MX25L1605", 512, BASIC),
            chip(0x2016, "MX25L3205", 1024, BASIC),
            chip(0x2017, "MX25L6405", 2048, BASIC),
            chip(0x2018, "MX25L12805", 4096, BASIC),
        ],
    },
    StaticVendor {
        id: manufacturer::GIGADEVICE,
        name: "GigaDevice",
        chips: &[
            chip(0x4013, "GD25Q40", 128, QUAD),
            chip(0x4014, "GD25Q80", 256, QUAD),
            chip(0x4015, "GD25Q16", 512, QUAD),
            chip(0x4016, "GD25Q32", 1024, QUAD),
            chip(0x4017, "GD25Q64", 2048, QUAD),
            chip(0x4018, "GD25Q128", 4096, QUAD),
        ],
    },
    StaticVendor {
        id: manufacturer::WINBOND,
        name: "Winbond",
        chips: &[
            chip(0x3011, "W25X10", 32, BASIC),
            chip(0x3012, "W25X20", 64, BASIC),
            chip(0x3013, "W25X40", 128, BASIC),
            chip(0x3014, "W25X80", 256, BASIC),
            chip(0x4014, "W25Q80.V", 256, QUAD),
            chip(0x4015, "W25Q16.V", 512, QUAD),
            chip(0x4016, "W25Q32.V", 1024, QUAD),
            chip(0x4017, "W25Q64.V", 2048, QUAD),
            chip(0x4018, "W25Q128.V", 4096, QUAD),
            chip(0x4019, "W25Q256.V", 8192, QUAD.union(Features::FOUR_BYTE_ADDR)),
        ],
    },
];

pub(super) static BUILTIN: Lazy<ChipDatabase> = Lazy::new(|| {
    let mut db = ChipDatabase::new();
    for vendor in VENDORS {
        let entry = db.insert_manufacturer(vendor.id, vendor.name);
        for c in vendor.chips {
            let features = ChipFeatures::new(c.sectors).with_flags(c.flags);
            entry.insert(c.device_id, ChipRecord::new(c.name, features));
        }
    }
    log::debug!(
        "Built-in chip database: {} chips from {} manufacturers",
        db.len(),
        db.manufacturer_count()
    );
    db
});

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_atmel_entry() {
        let db = ChipDatabase::builtin();
        let atmel = db.manufacturer(0x1F).unwrap();
        assert_eq!(atmel.name, "ATMEL");
        let chip = atmel.chip(0x4300).unwrap();
        assert_eq!(chip.name, "AT25SF041");
        assert_eq!(chip.features.sectors, 128);
    }

    #[test]
    fn test_builtin_has_no_duplicate_keys() {
        let expected: usize = VENDORS.iter().map(|v| v.chips.len()).sum();
        assert_eq!(ChipDatabase::builtin().len(), expected);
        assert_eq!(ChipDatabase::builtin().manufacturer_count(), VENDORS.len());
    }

    #[test]
    fn test_builtin_is_shared() {
        assert!(core::ptr::eq(ChipDatabase::builtin(), ChipDatabase::builtin()));
    }
}

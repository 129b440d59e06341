//! JEDEC SPI flash opcodes used for identification

/// Read JEDEC ID (manufacturer + memory type + device ID)
pub const RDID: u8 = 0x9F;

/// Number of bytes returned by RDID
pub const RDID_RESPONSE_LEN: usize = 3;

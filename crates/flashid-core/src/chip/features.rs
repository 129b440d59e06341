//! Flash chip feature flags

use bitflags::bitflags;

bitflags! {
    /// Capability flags recorded for a flash chip
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Features: u32 {
        // Read capabilities
        /// Supports Fast Read (0x0B)
        const FAST_READ       = 1 << 0;
        /// Supports Dual I/O read commands
        const DUAL_IO         = 1 << 1;
        /// Supports Quad I/O read commands
        const QUAD_IO         = 1 << 2;
        /// Supports QPI mode (4-4-4)
        const QPI             = 1 << 3;

        /// Supports 4-byte address mode
        const FOUR_BYTE_ADDR  = 1 << 4;

        // Special features
        /// Supports SFDP (Serial Flash Discoverable Parameters)
        const SFDP            = 1 << 5;
        /// Has OTP (One-Time Programmable) area
        const OTP             = 1 << 6;
        /// Has security registers
        const SECURITY_REG    = 1 << 7;
        /// Supports deep power down
        const DEEP_POWER_DOWN = 1 << 8;

        // Erase granularity
        /// Has 4KB sector erase
        const ERASE_4K        = 1 << 9;
        /// Has 32KB block erase
        const ERASE_32K       = 1 << 10;
        /// Has 64KB block erase
        const ERASE_64K       = 1 << 11;
    }
}

impl Default for Features {
    fn default() -> Self {
        Features::empty()
    }
}

impl Features {
    /// Lower-case flag names, e.g. `["fast_read", "erase_4k"]`
    pub fn names(&self) -> Vec<String> {
        self.iter_names()
            .map(|(name, _)| name.to_ascii_lowercase())
            .collect()
    }
}

//! Hardware collaborator traits
//!
//! This module defines the traits a backend implements to let the core
//! drive an SPI link and a chip-select GPIO, plus the scoped chip-select
//! guard used by the RDID transaction.

mod chip_select;
mod traits;

pub use chip_select::ChipSelect;
pub use traits::*;

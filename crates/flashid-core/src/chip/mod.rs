//! Flash chip identification data
//!
//! This module provides the decoded RDID answer ([`JedecId`]), the
//! two-level chip database (manufacturer code, then memory-type/device
//! key) and the resolver that looks an ID up in it.

mod builtin;
mod database;
mod features;
mod resolve;
mod types;

pub use database::{ChipDatabase, ChipDbError, Size};
pub use features::Features;
pub use resolve::{resolve, IdentificationRecord, Resolution};
pub use types::*;

//! CLI argument parsing

use clap::{Parser, Subcommand};
use flashid_core::probe::IdentifyRequest;
use flashid_core::spi::{LinkConfig, SpiBus, DEFAULT_BAUD_RATE, MAX_BAUD_RATE};
use std::path::PathBuf;

/// Generate dynamic help text for the programmer argument
fn programmer_help() -> String {
    format!(
        "Programmer to use [available: {}]",
        flashid_link::programmer_names_short()
    )
}

#[derive(Parser)]
#[command(name = "flashid")]
#[command(author, version, about = "SPI flash identification", long_about = None)]
pub struct Cli {
    /// Verbosity level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Extra chip definitions: a .ron vendor file or a directory of them
    #[arg(long, global = true)]
    pub chip_db: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// SPI link options
#[derive(clap::Args, Debug, Clone, PartialEq, Eq)]
pub struct LinkArgs {
    /// SPI bus (0 or 1)
    #[arg(long, default_value_t = 0, value_parser = clap::value_parser!(u8).range(0..=1))]
    pub bus: u8,

    /// GPIO line used as chip select
    #[arg(long, default_value_t = 0)]
    pub cs_pin: u32,

    /// SPI clock in Hz
    #[arg(
        long,
        default_value_t = DEFAULT_BAUD_RATE,
        value_parser = clap::value_parser!(u32).range(1..=MAX_BAUD_RATE as i64)
    )]
    pub baudrate: u32,

    /// Clock polarity (0 or 1)
    #[arg(long, default_value_t = 0, value_parser = clap::value_parser!(u8).range(0..=1))]
    pub polarity: u8,

    /// Clock phase (0 or 1)
    #[arg(long, default_value_t = 0, value_parser = clap::value_parser!(u8).range(0..=1))]
    pub phase: u8,
}

impl LinkArgs {
    /// Build the identification request
    pub fn to_request(&self) -> flashid_core::Result<IdentifyRequest> {
        let bus = SpiBus::try_from(self.bus)?;
        let link = LinkConfig::new(bus, self.baudrate, self.polarity != 0, self.phase != 0)?;
        Ok(IdentifyRequest::new(link, self.cs_pin))
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Read the JEDEC ID of the attached flash
    Id {
        /// Programmer to use
        #[arg(short, long, help = programmer_help())]
        programmer: String,

        #[command(flatten)]
        link: LinkArgs,
    },

    /// Look up a JEDEC ID (e.g. 1F4300) in the chip database
    Decode {
        /// Six hex digits: manufacturer, memory type, device
        id: String,
    },

    /// List known flash chips
    ListChips {
        /// Filter by vendor name
        #[arg(long)]
        vendor: Option<String>,
    },

    /// List available programmers
    ListProgrammers,
}

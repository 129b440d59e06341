//! flashid - SPI flash identification
//!
//! Sends the JEDEC RDID command (`0x9F`) over an SPI link, with chip select
//! driven from a GPIO, and reports the manufacturer, memory type and device
//! bytes together with whatever the chip database knows about them.

mod cli;
mod commands;

use clap::Parser;
use cli::{Cli, Commands};
use flashid_core::chip::ChipDatabase;
use std::borrow::Cow;
use std::path::Path;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    match cli.verbose {
        0 => {}
        1 => log::set_max_level(log::LevelFilter::Debug),
        _ => log::set_max_level(log::LevelFilter::Trace),
    }

    let db = match load_chip_database(cli.chip_db.as_deref()) {
        Ok(db) => db,
        Err(e) => {
            eprintln!("Failed to load chip database: {}", e);
            std::process::exit(1);
        }
    };

    log::debug!(
        "Chip database: {} chips from {} manufacturers",
        db.len(),
        db.manufacturer_count()
    );

    match cli.command {
        Commands::Id { programmer, link } => {
            if !commands::run_identify(&programmer, &link, &db)? {
                std::process::exit(1);
            }
        }
        Commands::Decode { id } => commands::run_decode(&id, &db)?,
        Commands::ListChips { vendor } => commands::list_chips(&db, vendor.as_deref()),
        Commands::ListProgrammers => commands::list_programmers(),
    }

    Ok(())
}

/// Builtin chip table, extended with RON vendor files if a path was given
fn load_chip_database(
    path: Option<&Path>,
) -> Result<Cow<'static, ChipDatabase>, Box<dyn std::error::Error>> {
    let Some(path) = path else {
        return Ok(Cow::Borrowed(ChipDatabase::builtin()));
    };

    let mut db = ChipDatabase::builtin().clone();
    let count = if path.is_dir() {
        db.load_dir(path)?
    } else if path.is_file() {
        db.load_file(path)?
    } else {
        return Err(format!("Chip database path not found: {}", path.display()).into());
    };
    log::info!("Loaded {} chip definitions from {}", count, path.display());

    Ok(Cow::Owned(db))
}

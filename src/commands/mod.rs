//! CLI command implementations

mod decode;
mod identify;
mod list;

pub use decode::run_decode;
pub use identify::run_identify;
pub use list::{list_chips, list_programmers};

use flashid_core::chip::IdentificationRecord;

/// Print an identification result
fn print_record(record: &IdentificationRecord<'_>) {
    let id = record.id;
    println!("JEDEC ID:     {}", id);
    println!(
        "Manufacturer: {:02X} ({})",
        id.manufacturer,
        record.manufacturer_name().unwrap_or("unknown")
    );
    println!("Memory type:  {:02X}", id.memory_type);
    println!("Device ID:    {:02X}", id.device);

    match record.chip() {
        Some(chip) => {
            println!("Chip:         {}", chip.name);
            println!(
                "Size:         {} ({} x {} byte sectors)",
                format_size(chip.features.capacity()),
                chip.features.sectors,
                chip.features.sector_size
            );
            let features = chip.features.flags.names();
            if !features.is_empty() {
                println!("Features:     {}", features.join(", "));
            }
        }
        None => println!("Chip:         not in database"),
    }
}

fn format_size(bytes: u64) -> String {
    if bytes >= 1024 * 1024 {
        format!("{} MiB", bytes / (1024 * 1024))
    } else if bytes >= 1024 {
        format!("{} KiB", bytes / 1024)
    } else {
        format!("{} B", bytes)
    }
}

//! List commands implementation

use flashid_core::chip::ChipDatabase;

/// List all compiled-in programmers
pub fn list_programmers() {
    println!("Available programmers:");
    println!();
    for info in flashid_link::available_programmers() {
        if info.aliases.is_empty() {
            println!("  {:<10} - {}", info.name, info.description);
        } else {
            println!(
                "  {:<10} - {} (aliases: {})",
                info.name,
                info.description,
                info.aliases.join(", ")
            );
        }
    }
}

/// List chips in the database, optionally filtered by vendor
pub fn list_chips(db: &ChipDatabase, vendor_filter: Option<&str>) {
    let manufacturers = match vendor_filter {
        Some(vendor) => db.find_by_vendor(vendor),
        None => db.iter().collect(),
    };

    println!("{:<12} {:<20} {:>10} {:>9}", "Vendor", "Name", "Size", "JEDEC ID");
    println!("{}", "-".repeat(54));

    let mut count = 0;
    for (id, manufacturer) in manufacturers {
        for (key, chip) in manufacturer.chips() {
            println!(
                "{:<12} {:<20} {:>10} {:>9}",
                manufacturer.name,
                chip.name,
                super::format_size(chip.features.capacity()),
                format!("{:02X}{:04X}", id, key)
            );
            count += 1;
        }
    }

    println!();
    println!("{} chips", count);
}

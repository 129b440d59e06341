//! Programmer registry
//!
//! Opens connection providers by name. Each programmer is behind a cargo
//! feature; unknown or disabled names are reported as errors.

use flashid_core::programmer::ConnectionProvider;
use std::collections::HashMap;

/// Parsed programmer parameters
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgrammerParams {
    /// Programmer name
    pub name: String,
    /// Key-value parameters
    pub params: HashMap<String, String>,
}

impl ProgrammerParams {
    /// Parameters as borrowed `(key, value)` pairs
    pub fn options(&self) -> Vec<(&str, &str)> {
        self.params
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .collect()
    }
}

/// Parse a programmer string into name and parameters
///
/// Format: "name" or "name:key1=value1,key2=value2"
///
/// # Example
/// ```ignore
/// let params = parse_programmer_params("dummy:id=EF4018")?;
/// assert_eq!(params.name, "dummy");
/// assert_eq!(params.params.get("id"), Some(&"EF4018".to_string()));
/// ```
pub fn parse_programmer_params(s: &str) -> Result<ProgrammerParams, Box<dyn std::error::Error>> {
    let (name, opts_str) = s.split_once(':').unwrap_or((s, ""));
    if name.is_empty() {
        return Err("Programmer name is empty".into());
    }

    let mut params = HashMap::new();
    if !opts_str.is_empty() {
        for opt in opts_str.split(',') {
            if let Some((key, value)) = opt.split_once('=') {
                params.insert(key.to_string(), value.to_string());
            } else {
                return Err(
                    format!("Invalid parameter format: '{}' (expected key=value)", opt).into(),
                );
            }
        }
    }

    Ok(ProgrammerParams {
        name: name.to_string(),
        params,
    })
}

/// Open a connection provider
///
/// Nothing is touched on the hardware side yet; links are opened when the
/// core calls `connect`.
///
/// # Arguments
/// * `programmer` - Programmer specification (e.g., "dummy" or "linux_spi:gpiochip=1")
pub fn open_provider(
    programmer: &str,
) -> Result<Box<dyn ConnectionProvider>, Box<dyn std::error::Error>> {
    let params = parse_programmer_params(programmer)?;

    match params.name.as_str() {
        #[cfg(feature = "dummy")]
        "dummy" => open_dummy(&params),

        #[cfg(feature = "linux-spi")]
        "linux_spi" | "linux-spi" | "spidev" => open_linux_spi(&params),

        _ => Err(format!(
            "Unknown programmer: {} (available: {})",
            params.name,
            programmer_names_short()
        )
        .into()),
    }
}

#[cfg(feature = "dummy")]
fn open_dummy(
    params: &ProgrammerParams,
) -> Result<Box<dyn ConnectionProvider>, Box<dyn std::error::Error>> {
    let config = flashid_dummy::parse_options(&params.options())?;
    log::info!("Using dummy flash emulator");
    Ok(Box::new(flashid_dummy::DummyProvider::new(config)))
}

#[cfg(feature = "linux-spi")]
fn open_linux_spi(
    params: &ProgrammerParams,
) -> Result<Box<dyn ConnectionProvider>, Box<dyn std::error::Error>> {
    let provider = crate::linux::LinuxProvider::from_options(&params.options())?;
    Ok(Box::new(provider))
}

/// Information about a programmer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgrammerInfo {
    /// Primary name (used for matching)
    pub name: &'static str,
    /// Alternative names/aliases
    pub aliases: &'static [&'static str],
    /// Short description
    pub description: &'static str,
}

/// Get information about all available programmers (enabled at compile time)
#[allow(unused_mut, clippy::vec_init_then_push)]
pub fn available_programmers() -> Vec<ProgrammerInfo> {
    let mut programmers = Vec::new();

    #[cfg(feature = "dummy")]
    programmers.push(ProgrammerInfo {
        name: "dummy",
        aliases: &[],
        description: "Emulated flash (id=<hex>, empty=1, max_baud=<Hz>, fault=<transmit|receive>)",
    });

    #[cfg(feature = "linux-spi")]
    programmers.push(ProgrammerInfo {
        name: "linux_spi",
        aliases: &["linux-spi", "spidev"],
        description: "Linux spidev with GPIO chip select (dev=/dev/spidevX.Y, gpiochip=<N|path>)",
    });

    programmers
}

/// Generate a short list of programmer names for CLI help
pub fn programmer_names_short() -> String {
    let programmers = available_programmers();
    if programmers.is_empty() {
        return "none (recompile with features)".to_string();
    }
    let names: Vec<&str> = programmers.iter().map(|p| p.name).collect();
    names.join(", ")
}

//! flashid-dummy - Emulated SPI flash for testing
//!
//! This crate provides an SPI flash that answers RDID from memory, a
//! chip-select line for it, and a [`ConnectionProvider`] that hands both
//! out. Every call made by the core is appended to a shared [`Trace`] so
//! tests can check what happened on the emulated bus and in which order.

use std::cell::RefCell;
use std::rc::Rc;

use flashid_core::chip::JedecId;
use flashid_core::error::{Error, Result};
use flashid_core::programmer::{
    ConnectionProvider, Direction, GpioTransport, Level, Link, SpiTransport,
};
use flashid_core::spi::{opcodes, LinkConfig, SpiBus, MAX_BAUD_RATE};

/// Configuration for the dummy flash
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DummyConfig {
    /// Bytes clocked out after RDID; empty emulates an absent flash
    pub response: Vec<u8>,
    /// Fastest clock the emulated link accepts
    pub max_baud_rate: u32,
    /// Fail every transmit with a transport fault
    pub fail_transmit: bool,
    /// Fail every receive with a transport fault
    pub fail_receive: bool,
}

impl Default for DummyConfig {
    fn default() -> Self {
        Self {
            // Atmel AT25SF041
            response: vec![0x1F, 0x43, 0x00],
            max_baud_rate: MAX_BAUD_RATE,
            fail_transmit: false,
            fail_receive: false,
        }
    }
}

impl DummyConfig {
    /// Emulate a flash answering with `id`
    pub fn with_id(id: JedecId) -> Self {
        Self {
            response: id.to_bytes().to_vec(),
            ..Self::default()
        }
    }

    /// Emulate a bus with no flash attached
    pub fn empty() -> Self {
        Self {
            response: Vec::new(),
            ..Self::default()
        }
    }
}

/// Parse dummy programmer options
///
/// Supported keys:
/// - `id=<6 hex digits>`: RDID answer (default `1F4300`)
/// - `empty=1`: no flash attached
/// - `max_baud=<Hz>`: reject faster links at configure time
/// - `fault=transmit|receive`: make that transport call fail
pub fn parse_options(options: &[(&str, &str)]) -> std::result::Result<DummyConfig, String> {
    let mut config = DummyConfig::default();

    for &(key, value) in options {
        match key {
            "id" => {
                let id: JedecId = value.parse().map_err(|e: Error| e.to_string())?;
                config.response = id.to_bytes().to_vec();
            }
            "empty" => match value {
                "1" | "true" | "yes" => config.response.clear(),
                "0" | "false" | "no" => {}
                _ => return Err(format!("Invalid empty value: {}", value)),
            },
            "max_baud" => {
                config.max_baud_rate = value
                    .parse()
                    .map_err(|_| format!("Invalid max_baud value: {}", value))?;
            }
            "fault" => match value {
                "transmit" => config.fail_transmit = true,
                "receive" => config.fail_receive = true,
                _ => return Err(format!("Invalid fault value: {} (transmit|receive)", value)),
            },
            _ => return Err(format!("Unknown dummy option: {}", key)),
        }
    }

    Ok(config)
}

/// One call observed on the emulated hardware
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// Chip-select direction change
    Direction(Direction),
    /// Chip-select level change
    Level(Level),
    /// Link configuration
    Configure(LinkConfig),
    /// Bytes clocked out
    Transmit(Vec<u8>),
    /// Bytes requested
    Receive(usize),
}

#[derive(Debug)]
struct State {
    config: DummyConfig,
    events: Vec<Event>,
    connection: Option<(SpiBus, u32)>,
    cs_direction: Direction,
    cs_level: Level,
    configured: bool,
    pending: Vec<u8>,
}

impl State {
    fn new(config: DummyConfig) -> Self {
        Self {
            config,
            events: Vec::new(),
            connection: None,
            cs_direction: Direction::Input,
            cs_level: Level::High,
            configured: false,
            pending: Vec::new(),
        }
    }

    fn selected(&self) -> bool {
        self.cs_direction == Direction::Output && self.cs_level == Level::Low
    }
}

/// Read-only view of what happened on the emulated hardware
#[derive(Debug, Clone)]
pub struct Trace {
    state: Rc<RefCell<State>>,
}

impl Trace {
    /// All events in call order
    pub fn events(&self) -> Vec<Event> {
        self.state.borrow().events.clone()
    }

    /// Current chip-select level
    pub fn cs_level(&self) -> Level {
        self.state.borrow().cs_level
    }

    /// Bus and chip-select pin of the last connection, if any
    pub fn connection(&self) -> Option<(SpiBus, u32)> {
        self.state.borrow().connection
    }

    /// Number of events matching `filter`
    pub fn count(&self, filter: impl Fn(&Event) -> bool) -> usize {
        self.state.borrow().events.iter().filter(|e| filter(e)).count()
    }

    /// Forget recorded events
    pub fn clear(&self) {
        self.state.borrow_mut().events.clear();
    }
}

/// Emulated SPI flash
///
/// Answers RDID with the configured bytes while its chip select is an
/// asserted output and the link has been configured. Any other opcode is
/// ignored, so the following receive comes back empty.
pub struct DummyFlash {
    state: Rc<RefCell<State>>,
}

impl DummyFlash {
    /// Create a new dummy flash with the given configuration
    pub fn new(config: DummyConfig) -> Self {
        Self {
            state: Rc::new(RefCell::new(State::new(config))),
        }
    }

    /// Create a new dummy flash answering `1F4300`
    pub fn new_default() -> Self {
        Self::new(DummyConfig::default())
    }

    /// Chip-select line wired to this flash
    pub fn chip_select(&self) -> DummyChipSelect {
        DummyChipSelect {
            state: Rc::clone(&self.state),
        }
    }

    /// Trace handle for this flash
    pub fn trace(&self) -> Trace {
        Trace {
            state: Rc::clone(&self.state),
        }
    }
}

impl SpiTransport for DummyFlash {
    fn configure(&mut self, config: &LinkConfig) -> Result<()> {
        let mut state = self.state.borrow_mut();
        state.events.push(Event::Configure(*config));

        if config.baud_rate() > state.config.max_baud_rate {
            state.configured = false;
            return Err(Error::Configuration(format!(
                "{} Hz exceeds emulated limit of {} Hz",
                config.baud_rate(),
                state.config.max_baud_rate
            )));
        }
        state.configured = true;
        Ok(())
    }

    fn transmit(&mut self, data: &[u8]) -> Result<()> {
        let mut state = self.state.borrow_mut();
        state.events.push(Event::Transmit(data.to_vec()));

        if state.config.fail_transmit {
            return Err(Error::Transport("emulated transmit fault".into()));
        }

        state.pending.clear();
        if !state.configured || !state.selected() {
            log::trace!("dummy: ignoring {:02X?} (not selected)", data);
            return Ok(());
        }
        match data.first() {
            Some(&opcodes::RDID) => {
                let response = state.config.response.clone();
                state.pending = response;
            }
            other => log::trace!("dummy: unsupported opcode {:02X?}", other),
        }
        Ok(())
    }

    fn receive(&mut self, count: usize) -> Result<Vec<u8>> {
        let mut state = self.state.borrow_mut();
        state.events.push(Event::Receive(count));

        if state.config.fail_receive {
            return Err(Error::Transport("emulated receive fault".into()));
        }
        if !state.selected() {
            return Ok(Vec::new());
        }

        let take = count.min(state.pending.len());
        Ok(state.pending.drain(..take).collect())
    }
}

/// Chip-select line of a [`DummyFlash`]
pub struct DummyChipSelect {
    state: Rc<RefCell<State>>,
}

impl GpioTransport for DummyChipSelect {
    fn set_direction(&mut self, direction: Direction) -> Result<()> {
        let mut state = self.state.borrow_mut();
        state.events.push(Event::Direction(direction));
        state.cs_direction = direction;
        Ok(())
    }

    fn set_level(&mut self, level: Level) -> Result<()> {
        let mut state = self.state.borrow_mut();
        state.events.push(Event::Level(level));
        if state.cs_direction != Direction::Output {
            return Err(Error::ChipSelect("line is not an output".into()));
        }
        if level == Level::High {
            state.pending.clear();
        }
        state.cs_level = level;
        Ok(())
    }
}

/// Connection provider for the dummy flash
pub struct DummyProvider {
    flash: Option<DummyFlash>,
}

impl DummyProvider {
    /// Provider whose links all lead to one emulated flash
    pub fn new(config: DummyConfig) -> Self {
        Self {
            flash: Some(DummyFlash::new(config)),
        }
    }

    /// Provider with no hardware attached; every `connect` fails
    pub fn absent() -> Self {
        Self { flash: None }
    }

    /// Trace of the emulated flash, if there is one
    pub fn trace(&self) -> Option<Trace> {
        self.flash.as_ref().map(DummyFlash::trace)
    }
}

impl ConnectionProvider for DummyProvider {
    fn connect(&mut self, bus: SpiBus, cs_pin: u32) -> Result<Link> {
        let flash = self.flash.as_ref().ok_or_else(|| {
            Error::ConnectionUnavailable(format!("no dummy flash attached to {}", bus))
        })?;

        flash.state.borrow_mut().connection = Some((bus, cs_pin));
        log::debug!("dummy: connected to {} with CS on GPIO {}", bus, cs_pin);

        let spi = DummyFlash {
            state: Rc::clone(&flash.state),
        };
        let cs = flash.chip_select();
        Ok(Link::new(spi, cs))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flashid_core::protocol;

    #[test]
    fn test_read_jedec_id() {
        let mut flash = DummyFlash::new_default();
        let mut cs = flash.chip_select();
        let id = protocol::read_jedec_id(&mut flash, &mut cs, &LinkConfig::default()).unwrap();
        assert_eq!(id.to_hex(), "1F4300");
        assert_eq!(flash.trace().cs_level(), Level::High);
    }

    #[test]
    fn test_unselected_flash_stays_silent() {
        let mut flash = DummyFlash::new_default();
        flash.configure(&LinkConfig::default()).unwrap();
        flash.transmit(&[opcodes::RDID]).unwrap();
        assert!(flash.receive(3).unwrap().is_empty());
    }

    #[test]
    fn test_other_opcodes_are_ignored() {
        let mut flash = DummyFlash::new_default();
        let mut cs = flash.chip_select();
        flash.configure(&LinkConfig::default()).unwrap();
        cs.set_direction(Direction::Output).unwrap();
        cs.set_level(Level::Low).unwrap();
        flash.transmit(&[0x05]).unwrap();
        assert!(flash.receive(3).unwrap().is_empty());
    }

    #[test]
    fn test_level_needs_output() {
        let flash = DummyFlash::new_default();
        let mut cs = flash.chip_select();
        assert!(matches!(
            cs.set_level(Level::Low),
            Err(Error::ChipSelect(_))
        ));
    }

    #[test]
    fn test_parse_options() {
        let config = parse_options(&[("id", "EF4018"), ("max_baud", "2000000")]).unwrap();
        assert_eq!(config.response, [0xEF, 0x40, 0x18]);
        assert_eq!(config.max_baud_rate, 2_000_000);

        let config = parse_options(&[("empty", "1")]).unwrap();
        assert!(config.response.is_empty());

        let config = parse_options(&[("fault", "receive")]).unwrap();
        assert!(config.fail_receive);
        assert!(!config.fail_transmit);

        assert_eq!(parse_options(&[]).unwrap(), DummyConfig::default());
        assert!(parse_options(&[("id", "1F43")]).is_err());
        assert!(parse_options(&[("max_baud", "fast")]).is_err());
        assert!(parse_options(&[("colour", "blue")]).is_err());
    }

    #[test]
    fn test_absent_provider() {
        let mut provider = DummyProvider::absent();
        assert!(provider.trace().is_none());
        assert!(matches!(
            provider.connect(SpiBus::Bus0, 0),
            Err(Error::ConnectionUnavailable(_))
        ));
    }
}

//! End-to-end identification against the emulated flash.

use flashid_core::chip::{ChipDatabase, JedecId, Resolution};
use flashid_core::probe::{identify, probe, IdentifyRequest};
use flashid_core::programmer::{Direction, Level};
use flashid_core::spi::{LinkConfig, SpiBus};
use flashid_core::Error;
use flashid_dummy::{DummyConfig, DummyProvider, Event};

fn request() -> IdentifyRequest {
    let link = LinkConfig::new(SpiBus::Bus1, 1_000_000, false, false).unwrap();
    IdentifyRequest::new(link, 24)
}

fn is_level(level: Level) -> impl Fn(&Event) -> bool {
    move |e| *e == Event::Level(level)
}

#[test]
fn three_byte_answer_brackets_one_transfer() {
    let mut provider = DummyProvider::new(DummyConfig::default());
    let trace = provider.trace().unwrap();

    let id = identify(&mut provider, &request()).unwrap();
    assert_eq!(id, JedecId::new(0x1F, 0x43, 0x00));
    assert_eq!(trace.connection(), Some((SpiBus::Bus1, 24)));

    assert_eq!(
        trace.events(),
        [
            Event::Direction(Direction::Output),
            Event::Level(Level::High),
            Event::Configure(request().link),
            Event::Level(Level::Low),
            Event::Transmit(vec![0x9F]),
            Event::Receive(3),
            Event::Level(Level::High),
        ]
    );
    assert_eq!(trace.count(is_level(Level::Low)), 1);
    assert_eq!(trace.cs_level(), Level::High);
}

#[test]
fn empty_answer_is_reported_and_releases_cs() {
    let mut provider = DummyProvider::new(DummyConfig::empty());
    let trace = provider.trace().unwrap();

    let err = identify(&mut provider, &request()).unwrap_err();
    assert!(matches!(err, Error::EmptyResponse));
    assert_eq!(trace.cs_level(), Level::High);
    assert_eq!(trace.events().last(), Some(&Event::Level(Level::High)));
}

#[test]
fn rejected_configuration_skips_the_transfer() {
    let config = DummyConfig {
        max_baud_rate: 500_000,
        ..DummyConfig::default()
    };
    let mut provider = DummyProvider::new(config);
    let trace = provider.trace().unwrap();

    let err = identify(&mut provider, &request()).unwrap_err();
    assert!(matches!(err, Error::Configuration(_)));
    assert_eq!(trace.count(|e| matches!(e, Event::Transmit(_))), 0);
    assert_eq!(trace.count(|e| matches!(e, Event::Receive(_))), 0);
    assert_eq!(trace.count(is_level(Level::Low)), 0);
    assert_eq!(trace.cs_level(), Level::High);
}

#[test]
fn transport_fault_releases_cs() {
    let config = DummyConfig {
        fail_receive: true,
        ..DummyConfig::default()
    };
    let mut provider = DummyProvider::new(config);
    let trace = provider.trace().unwrap();

    let err = identify(&mut provider, &request()).unwrap_err();
    assert!(matches!(err, Error::Transport(_)));
    assert_eq!(trace.count(is_level(Level::Low)), 1);
    assert_eq!(trace.cs_level(), Level::High);

    assert!(probe(&mut provider, &request(), ChipDatabase::builtin()).is_none());
    assert_eq!(trace.cs_level(), Level::High);
}

#[test]
fn probe_resolves_against_builtin_database() {
    let mut provider = DummyProvider::new(DummyConfig::default());
    let record = probe(&mut provider, &request(), ChipDatabase::builtin()).unwrap();

    assert_eq!(record.manufacturer_name(), Some("ATMEL"));
    assert_eq!(record.chip_name(), Some("AT25SF041"));
    assert_eq!(record.sectors(), Some(128));
    assert_eq!(record.id.to_hex(), "1F4300");
}

#[test]
fn probe_keeps_raw_codes_on_miss() {
    let config = DummyConfig::with_id(JedecId::new(0xAA, 0xBB, 0xCC));
    let mut provider = DummyProvider::new(config);
    let record = probe(&mut provider, &request(), ChipDatabase::builtin()).unwrap();

    assert_eq!(record.resolution, Resolution::Unknown);
    assert_eq!(record.id.to_bytes(), [0xAA, 0xBB, 0xCC]);
    assert_eq!(record.chip_name(), None);
}

#[test]
fn probe_without_flash_returns_none() {
    let mut provider = DummyProvider::new(DummyConfig::empty());
    assert!(probe(&mut provider, &request(), ChipDatabase::builtin()).is_none());

    let mut provider = DummyProvider::absent();
    assert!(probe(&mut provider, &request(), ChipDatabase::builtin()).is_none());
}

#[test]
fn repeated_identification_is_stable() {
    let mut provider = DummyProvider::new(DummyConfig::default());
    let trace = provider.trace().unwrap();

    let first = identify(&mut provider, &request()).unwrap();
    trace.clear();
    let second = identify(&mut provider, &request()).unwrap();

    assert_eq!(first, second);
    assert_eq!(trace.count(is_level(Level::Low)), 1);
}

//! Single GPIO line implementing [`GpioTransport`]

use crate::error::{LinuxGpioError, Result};

use gpiocdev::line::{Offset, Value};
use gpiocdev::request::{Config, Request};

use flashid_core::error::Result as CoreResult;
use flashid_core::programmer::{Direction, GpioTransport, Level};

/// Default GPIO chip
pub const DEFAULT_CHIP: &str = "/dev/gpiochip0";

const CONSUMER: &str = "flashid-cs";

/// Resolve a `gpiochip` option to a device path
///
/// Accepts a full path (`/dev/gpiochip1`), a chip name (`gpiochip1`) or a
/// bare number (`1`).
pub fn chip_path(value: &str) -> Result<String> {
    if value.starts_with('/') {
        return Ok(value.to_string());
    }
    if value.starts_with("gpiochip") {
        return Ok(format!("/dev/{}", value));
    }
    value
        .parse::<u32>()
        .map(|n| format!("/dev/gpiochip{}", n))
        .map_err(|_| LinuxGpioError::InvalidParameter(format!("gpiochip={}", value)))
}

fn value_of(level: Level) -> Value {
    match level {
        Level::High => Value::Active,
        Level::Low => Value::Inactive,
    }
}

/// A GPIO line used as chip select
pub struct LinuxGpioLine {
    request: Request,
    offset: Offset,
    direction: Direction,
}

impl LinuxGpioLine {
    /// Request `offset` on `chip` as an input
    pub fn open(chip: &str, offset: Offset) -> Result<Self> {
        log::debug!("linux_gpio: Requesting line {} on {}", offset, chip);

        let mut config = Config::default();
        config.with_line(offset).as_input();

        let request = Request::from_config(config)
            .on_chip(chip)
            .with_consumer(CONSUMER)
            .request()
            .map_err(|source| LinuxGpioError::LineRequestFailed {
                chip: chip.to_string(),
                offset,
                source,
            })?;

        Ok(Self {
            request,
            offset,
            direction: Direction::Input,
        })
    }

    /// Line offset on its chip
    pub fn offset(&self) -> Offset {
        self.offset
    }

    fn reconfigure(&mut self, direction: Direction) -> Result<()> {
        let mut config = Config::default();
        match direction {
            Direction::Output => {
                config.with_line(self.offset).as_output(Value::Active);
            }
            Direction::Input => {
                config.with_line(self.offset).as_input();
            }
        }
        self.request
            .reconfigure(&config)
            .map_err(LinuxGpioError::ReconfigureFailed)?;
        self.direction = direction;
        Ok(())
    }

    fn drive(&mut self, level: Level) -> Result<()> {
        if self.direction != Direction::Output {
            return Err(LinuxGpioError::NotOutput(self.offset));
        }
        self.request
            .set_value(self.offset, value_of(level))
            .map_err(LinuxGpioError::SetValueFailed)?;
        Ok(())
    }
}

impl GpioTransport for LinuxGpioLine {
    fn set_direction(&mut self, direction: Direction) -> CoreResult<()> {
        if direction != self.direction {
            self.reconfigure(direction)?;
        }
        Ok(())
    }

    fn set_level(&mut self, level: Level) -> CoreResult<()> {
        Ok(self.drive(level)?)
    }
}

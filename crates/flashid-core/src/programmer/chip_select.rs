//! Scoped chip-select handling

use super::{GpioTransport, Level};
use crate::error::Result;

/// Asserted chip-select line
///
/// Created by [`ChipSelect::assert`], which drives the line low. The line
/// goes back to idle (high) either through [`ChipSelect::release`], which
/// reports failures, or when the guard is dropped on an early return.
pub struct ChipSelect<'a, G: GpioTransport + ?Sized> {
    line: &'a mut G,
    asserted: bool,
}

impl<'a, G: GpioTransport + ?Sized> ChipSelect<'a, G> {
    /// Drive chip select low
    ///
    /// If driving the line fails, an attempt is still made to return it
    /// to idle before the error is returned.
    pub fn assert(line: &'a mut G) -> Result<Self> {
        let mut guard = Self {
            line,
            asserted: true,
        };
        guard.line.set_level(Level::Low)?;
        Ok(guard)
    }

    /// Drive chip select high and report the outcome
    pub fn release(mut self) -> Result<()> {
        self.asserted = false;
        self.line.set_level(Level::High)
    }
}

impl<G: GpioTransport + ?Sized> Drop for ChipSelect<'_, G> {
    fn drop(&mut self) {
        if self.asserted {
            self.asserted = false;
            if let Err(e) = self.line.set_level(Level::High) {
                log::error!("Failed to release chip select: {}", e);
            }
        }
    }
}

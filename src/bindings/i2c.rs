// src/bindings/i2c.rs

//! `SciTransport` over an `embedded-hal` 1.0 I2C bus.

use crate::common::{
    hal_traits::{SciTimer, SciTransport},
    timing,
};
use alloc::vec::Vec;
use embedded_hal::i2c::{I2c, Operation};

/// Factory default address of the module.
pub const DEFAULT_ADDRESS: u8 = 0x21;

/// Owns an I2C bus plus a clock and talks to one module on it.
///
/// Chunks passed to [`SciTransport::send`] are held until the one flagged
/// `last` arrives; the whole packet then goes out as a single bus
/// transaction with one stop condition.
#[derive(Debug)]
pub struct I2cInterface<I2C, T> {
    i2c: I2C,
    timer: T,
    address: u8,
    /// Non-final chunks of the packet being sent.
    pending: Vec<u8>,
}

impl<I2C, T> I2cInterface<I2C, T>
where
    I2C: I2c,
    T: SciTimer,
{
    pub fn new(i2c: I2C, timer: T) -> Self {
        Self::with_address(i2c, timer, DEFAULT_ADDRESS)
    }

    pub fn with_address(i2c: I2C, timer: T, address: u8) -> Self {
        I2cInterface {
            i2c,
            timer,
            address,
            pending: Vec::new(),
        }
    }

    pub fn address(&self) -> u8 {
        self.address
    }

    pub fn release(self) -> (I2C, T) {
        (self.i2c, self.timer)
    }
}

impl<I2C, T> SciTimer for I2cInterface<I2C, T>
where
    T: SciTimer,
{
    type Instant = T::Instant;

    fn now(&self) -> Self::Instant {
        self.timer.now()
    }

    fn delay_ms(&mut self, ms: u32) {
        self.timer.delay_ms(ms)
    }
}

impl<I2C, T> SciTransport for I2cInterface<I2C, T>
where
    I2C: I2c,
{
    type Error = I2C::Error;

    fn send(&mut self, chunk: &[u8], last: bool) -> Result<(), Self::Error> {
        if !last {
            self.pending.extend_from_slice(chunk);
            return Ok(());
        }
        if self.pending.is_empty() {
            return self.i2c.write(self.address, chunk);
        }
        // Adjacent writes share one transaction: no restart, one stop.
        let pending = core::mem::take(&mut self.pending);
        self.i2c.transaction(
            self.address,
            &mut [Operation::Write(&pending), Operation::Write(chunk)],
        )
    }

    /// The module clocks out filler while it is busy, so a read always
    /// completes and never reports `WouldBlock`.
    fn receive(&mut self, buf: &mut [u8]) -> nb::Result<(), Self::Error> {
        for chunk in buf.chunks_mut(timing::I2C_MAX_TRANSFER) {
            self.i2c.read(self.address, chunk)?;
        }
        Ok(())
    }

    fn flush_receive(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }

    fn flush_send(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }

    fn address_changed(&mut self, address: u8) {
        self.pending.clear();
        self.address = address;
    }
}

// src/common/hal_traits.rs

use super::timing;
use core::fmt::Debug;
use core::ops::{Add, Sub};
use core::time::Duration;

/// A point in time from a monotonic clock.
pub trait SciInstant:
    Copy + Ord + Add<Duration, Output = Self> + Sub<Self, Output = Duration>
{
}

impl<T> SciInstant for T where
    T: Copy + Ord + Add<Duration, Output = T> + Sub<T, Output = Duration>
{
}

/// Abstraction for the clock and delay operations the driver needs.
pub trait SciTimer {
    type Instant: SciInstant;

    /// Reads the monotonic clock.
    fn now(&self) -> Self::Instant;

    /// Delay for at least the specified number of milliseconds.
    fn delay_ms(&mut self, ms: u32);
}

/// Byte transport to the module.
///
/// The transport only moves bytes in order. Framing, chunking and timeouts
/// are handled by the driver.
pub trait SciTransport {
    /// Associated error type for communication errors.
    type Error: Debug;

    /// Sends one chunk of an outbound packet.
    ///
    /// A packet longer than [`max_chunk_len`](Self::max_chunk_len) is handed
    /// over in several calls. `last` is `true` on the chunk that ends the bus
    /// transaction.
    fn send(&mut self, chunk: &[u8], last: bool) -> Result<(), Self::Error>;

    /// Fills `buf` completely.
    ///
    /// Returns `Err(nb::Error::WouldBlock)` if the binding's own wait expired
    /// before any byte was available. Implementations must not return
    /// `WouldBlock` after consuming part of a read.
    fn receive(&mut self, buf: &mut [u8]) -> nb::Result<(), Self::Error>;

    /// Discards any inbound bytes still pending.
    fn flush_receive(&mut self) -> Result<(), Self::Error>;

    /// Completes any outbound bytes still pending.
    fn flush_send(&mut self) -> Result<(), Self::Error>;

    /// Largest chunk `send` accepts in one call.
    fn max_chunk_len(&self) -> usize {
        timing::I2C_MAX_TRANSFER
    }

    /// Called after the module accepted a new bus address.
    fn address_changed(&mut self, _address: u8) {}
}

/// `SciTimer` backed by `std::time::Instant` and `std::thread::sleep`.
#[cfg(feature = "std")]
#[derive(Debug, Default, Clone, Copy)]
pub struct StdTimer;

#[cfg(feature = "std")]
impl SciTimer for StdTimer {
    type Instant = std::time::Instant;

    fn now(&self) -> Self::Instant {
        std::time::Instant::now()
    }

    fn delay_ms(&mut self, ms: u32) {
        std::thread::sleep(Duration::from_millis(u64::from(ms)));
    }
}

// src/driver/sync_driver/io_helpers.rs

use super::SciDriver;
use crate::common::{
    command::CommandId,
    error::SciError,
    hal_traits::{SciInstant, SciTimer, SciTransport},
    packet::HEADER_LEN,
    timing,
};
use arrayvec::ArrayVec;
use core::fmt::Debug;
use core::time::Duration;
use log::{trace, warn};
use nb::Result as NbResult;

/// Rounds up to whole milliseconds, saturating.
pub(super) fn duration_to_ms(duration: Duration) -> u32 {
    let ms = duration.as_millis() + u128::from(duration.subsec_nanos() % 1_000_000 != 0);
    u32::try_from(ms).unwrap_or(u32::MAX)
}

impl<IF> SciDriver<IF>
where
    IF: SciTransport + SciTimer,
    IF::Error: Debug,
    IF::Instant: SciInstant,
{
    /// Hands `packet` to the transport in chunks no larger than the transport
    /// accepts, flagging the final one, then flushes.
    pub(super) fn send_packet(&mut self, packet: &[u8]) -> Result<(), SciError<IF::Error>> {
        let max_chunk = self.interface.max_chunk_len().max(1);
        let mut chunks = packet.chunks(max_chunk).peekable();
        while let Some(chunk) = chunks.next() {
            let last = chunks.peek().is_none();
            self.interface.send(chunk, last).map_err(SciError::Io)?;
        }
        self.interface.flush_send().map_err(SciError::Io)
    }

    /// Fills `buf`, retrying while the transport has nothing yet.
    pub(super) fn read_exact_until(
        &mut self,
        deadline: IF::Instant,
        buf: &mut [u8],
    ) -> Result<(), SciError<IF::Error>> {
        if buf.is_empty() {
            return Ok(());
        }
        self.execute_blocking_io_until(deadline, |iface| iface.receive(buf))
    }

    /// Sends a reset naming `trigger` and waits for the module to settle.
    ///
    /// Never fails: the module does not answer a reset, and a send error
    /// here would only hide the error that caused the resync.
    pub(super) fn resync(&mut self, trigger: u8) {
        warn!("resynchronizing after command {:#04x}", trigger);
        let mut packet = ArrayVec::<u8, { HEADER_LEN + 1 }>::new();
        packet.push(CommandId::Reset.as_u8());
        packet.push(0x01);
        packet.push(0x00);
        packet.push(trigger);
        if let Err(e) = self.send_packet(&packet) {
            warn!("reset send failed: {:?}", e);
        }
        self.interface
            .delay_ms(duration_to_ms(self.config.reset_settle));
    }

    // --- Timeout Helper ---
    fn execute_blocking_io_until<FN, T>(
        &mut self,
        deadline: IF::Instant,
        mut f: FN,
    ) -> Result<T, SciError<IF::Error>>
    where
        FN: FnMut(&mut IF) -> NbResult<T, IF::Error>,
    {
        let backoff = duration_to_ms(timing::FRAME_READ_BACKOFF);
        loop {
            match f(&mut self.interface) {
                Ok(result) => return Ok(result),
                Err(nb::Error::WouldBlock) => {
                    if self.interface.now() >= deadline {
                        trace!("deadline passed mid-frame");
                        return Err(SciError::Timeout);
                    }
                    self.interface.delay_ms(backoff);
                }
                Err(nb::Error::Other(e)) => return Err(SciError::Io(e)),
            }
        }
    }
}

// --- Unit Tests ---
#[cfg(test)]
mod tests {
    use super::super::mock::{MockCommError, MockInterface};
    use super::*;
    use crate::common::config::SciConfig;

    fn driver_with(mock: MockInterface) -> SciDriver<MockInterface> {
        SciDriver::new(mock)
    }

    #[test]
    fn test_duration_to_ms() {
        assert_eq!(duration_to_ms(Duration::from_millis(50)), 50);
        assert_eq!(duration_to_ms(Duration::from_micros(1500)), 2);
        assert_eq!(duration_to_ms(Duration::ZERO), 0);
        assert_eq!(duration_to_ms(Duration::from_secs(u64::MAX)), u32::MAX);
    }

    #[test]
    fn test_send_packet_single_chunk() {
        let mut driver = driver_with(MockInterface::new());
        driver.send_packet(&[0x21, 0x00, 0x00]).unwrap();
        let mock = driver.release();
        assert_eq!(mock.chunks(), &[(3, true)]);
        assert_eq!(mock.written(), &[0x21, 0x00, 0x00]);
        assert_eq!(mock.flush_send_calls, 1);
    }

    #[test]
    fn test_send_packet_chunks_long_packets() {
        let packet: alloc::vec::Vec<u8> = (0..70u8).collect();
        let mut driver = driver_with(MockInterface::new());
        driver.send_packet(&packet).unwrap();
        let mock = driver.release();
        assert_eq!(mock.chunks(), &[(32, false), (32, false), (6, true)]);
        assert_eq!(mock.written(), packet.as_slice());
    }

    #[test]
    fn test_send_packet_exact_multiple() {
        let mut mock = MockInterface::new();
        mock.max_chunk = 4;
        let mut driver = driver_with(mock);
        driver.send_packet(&[1, 2, 3, 4, 5, 6, 7, 8]).unwrap();
        assert_eq!(driver.interface().chunks(), &[(4, false), (4, true)]);
    }

    #[test]
    fn test_send_packet_io_error() {
        let mut mock = MockInterface::new();
        mock.fail_send = true;
        let mut driver = driver_with(mock);
        assert!(matches!(
            driver.send_packet(&[0x21, 0, 0]),
            Err(SciError::Io(MockCommError))
        ));
    }

    #[test]
    fn test_read_exact_retries_until_data() {
        let mut mock = MockInterface::new();
        mock.stage_stalls(3);
        mock.stage_read_data(&[0x02, 0x00]);
        let mut driver = driver_with(mock);
        let deadline = driver.interface.now() + Duration::from_millis(100);
        let mut buf = [0u8; 2];
        driver.read_exact_until(deadline, &mut buf).unwrap();
        assert_eq!(buf, [0x02, 0x00]);
        assert_eq!(driver.interface().elapsed(), Duration::from_millis(3));
    }

    #[test]
    fn test_read_exact_times_out() {
        let mut driver = driver_with(MockInterface::new());
        let deadline = driver.interface.now() + Duration::from_millis(10);
        let mut buf = [0u8; 4];
        assert!(matches!(
            driver.read_exact_until(deadline, &mut buf),
            Err(SciError::Timeout)
        ));
        assert_eq!(driver.interface().elapsed(), Duration::from_millis(10));
    }

    #[test]
    fn test_read_exact_empty_buffer_skips_io() {
        let mut driver = driver_with(MockInterface::new());
        let deadline = driver.interface.now();
        driver.read_exact_until(deadline, &mut []).unwrap();
        assert_eq!(driver.interface().receive_calls, 0);
    }

    #[test]
    fn test_resync_packet_and_settle() {
        let mut driver = driver_with(MockInterface::new());
        driver.resync(0x05);
        let mock = driver.release();
        assert_eq!(mock.sent_packets(), [[0x14, 0x01, 0x00, 0x05]]);
        assert_eq!(mock.elapsed(), Duration::from_millis(1000));
    }

    #[test]
    fn test_resync_swallows_send_error() {
        let mut mock = MockInterface::new();
        mock.fail_send = true;
        let config = SciConfig::new().with_reset_settle(Duration::from_millis(5));
        let mut driver = SciDriver::with_config(mock, config);
        driver.resync(0x21);
        assert_eq!(driver.interface().elapsed(), Duration::from_millis(5));
        assert!(driver.interface().written().is_empty());
    }
}

// src/driver/sync_driver/transaction.rs

use super::io_helpers::duration_to_ms;
use super::{SciDriver, TransactionState};
use crate::common::{
    command::MAX_COMMAND_ID,
    error::SciError,
    hal_traits::{SciInstant, SciTimer, SciTransport},
    packet::{
        decode_response_header, encode_command_checked, ResponseHeader, ResponsePacket, Status,
        RESPONSE_HEADER_LEN,
    },
};
use alloc::vec::Vec;
use core::fmt::Debug;
use log::{debug, trace};

impl<IF> SciDriver<IF>
where
    IF: SciTransport + SciTimer,
    IF::Error: Debug,
    IF::Instant: SciInstant,
{
    /// Runs one request/response exchange.
    ///
    /// A FAILED response is returned as a packet; the per-command methods
    /// turn it into [`SciError::Module`]. Any framing problem after the
    /// request went out resynchronizes the module before returning.
    pub fn execute_transaction(
        &mut self,
        command_id: u8,
        args: &[u8],
    ) -> Result<ResponsePacket, SciError<IF::Error>> {
        let packet = match self.preflight(command_id, args) {
            Ok(packet) => packet,
            Err(e) => {
                debug!("command {:#04x} rejected: {}", command_id, e);
                self.set_state(TransactionState::Failed(e.code()));
                return Err(e);
            }
        };

        self.set_state(TransactionState::Sending);
        if let Err(e) = self.send_packet(&packet) {
            self.set_state(TransactionState::Failed(e.code()));
            return Err(e);
        }

        self.set_state(TransactionState::AwaitingStatusByte);
        match self.receive_response(command_id) {
            Ok(response) => {
                debug!(
                    "command {:#04x}: status {:#04x}, {} payload bytes",
                    command_id,
                    response.header.status,
                    response.payload.len()
                );
                match response.failure_code() {
                    None => self.set_state(TransactionState::PayloadReceived),
                    Some(code) => self.set_state(TransactionState::Failed(code)),
                }
                Ok(response)
            }
            Err(e) => {
                debug!("command {:#04x} failed: {}", command_id, e);
                self.resync(command_id);
                self.set_state(TransactionState::Failed(e.code()));
                Err(e)
            }
        }
    }

    /// Checks done before any I/O.
    fn preflight(&self, command_id: u8, args: &[u8]) -> Result<Vec<u8>, SciError<IF::Error>> {
        if command_id > MAX_COMMAND_ID {
            return Err(SciError::InvalidCommand(command_id));
        }
        encode_command_checked(command_id, args).map_err(SciError::widen)
    }

    fn receive_response(&mut self, command_id: u8) -> Result<ResponsePacket, SciError<IF::Error>> {
        let deadline = self.interface.now() + self.config.recv_timeout;
        let status = self.await_status_byte(deadline)?;

        let mut rest = [0u8; RESPONSE_HEADER_LEN - 1];
        self.read_exact_until(deadline, &mut rest[..1])?;
        if rest[0] != command_id {
            return Err(SciError::ResponsePacket {
                expected: command_id,
                received: rest[0],
            });
        }
        self.read_exact_until(deadline, &mut rest[1..])?;
        let header: ResponseHeader =
            decode_response_header([status.as_u8(), rest[0], rest[1], rest[2]]);
        self.set_state(TransactionState::HeaderReceived);

        let length = usize::from(header.length);
        if length > self.config.max_payload_len {
            return Err(SciError::OutOfMemory(length));
        }
        let mut payload = Vec::new();
        payload
            .try_reserve_exact(length)
            .map_err(|_| SciError::OutOfMemory(length))?;
        payload.resize(length, 0);
        self.read_exact_until(deadline, &mut payload)?;

        Ok(ResponsePacket { header, payload })
    }

    /// Polls single bytes until one is a status sentinel. Everything else is
    /// dropped.
    fn await_status_byte(&mut self, deadline: IF::Instant) -> Result<Status, SciError<IF::Error>> {
        let poll_ms = duration_to_ms(self.config.poll_interval);
        loop {
            let mut byte = [0u8; 1];
            match self.interface.receive(&mut byte) {
                Ok(()) => match Status::from_u8(byte[0]) {
                    Some(status) => {
                        trace!("status byte {}", status);
                        return Ok(status);
                    }
                    None => trace!("discarding {:#04x}", byte[0]),
                },
                Err(nb::Error::WouldBlock) => {}
                Err(nb::Error::Other(e)) => return Err(SciError::Io(e)),
            }
            if self.interface.now() >= deadline {
                return Err(SciError::Timeout);
            }
            self.interface.delay_ms(poll_ms);
        }
    }
}

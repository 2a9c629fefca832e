// src/driver/sync_driver/mock.rs

//! Scripted transport with a simulated clock, shared by the driver tests.

use crate::common::{
    hal_traits::{SciTimer, SciTransport},
    timing,
};
use alloc::vec::Vec;
use core::time::Duration;
use heapless::Deque;

// --- Mock Instant ---
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct MockInstant(pub u64);

impl core::ops::Add<Duration> for MockInstant {
    type Output = Self;
    fn add(self, rhs: Duration) -> Self {
        MockInstant(self.0.saturating_add(rhs.as_micros() as u64))
    }
}

impl core::ops::Sub<MockInstant> for MockInstant {
    type Output = Duration;
    fn sub(self, rhs: MockInstant) -> Duration {
        Duration::from_micros(self.0.saturating_sub(rhs.0))
    }
}

// --- Mock Comm Error ---
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct MockCommError;

/// One scripted inbound event.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Rx {
    Byte(u8),
    /// The next `receive` reports `WouldBlock` once.
    Stall,
}

pub struct MockInterface {
    pub current_time_us: u64,
    read_queue: Deque<Rx, 1024>,
    written: heapless::Vec<u8, 2048>,
    /// Length and `last` flag of every chunk handed to `send`.
    chunks: heapless::Vec<(usize, bool), 128>,
    pub max_chunk: usize,
    pub fail_send: bool,
    pub fail_receive: bool,
    pub receive_calls: usize,
    pub flush_receive_calls: usize,
    pub flush_send_calls: usize,
    pub address: Option<u8>,
}

impl MockInterface {
    pub fn new() -> Self {
        MockInterface {
            current_time_us: 0,
            read_queue: Deque::new(),
            written: heapless::Vec::new(),
            chunks: heapless::Vec::new(),
            max_chunk: timing::I2C_MAX_TRANSFER,
            fail_send: false,
            fail_receive: false,
            receive_calls: 0,
            flush_receive_calls: 0,
            flush_send_calls: 0,
            address: None,
        }
    }

    pub fn stage_read_data(&mut self, data: &[u8]) {
        for byte in data {
            self.read_queue.push_back(Rx::Byte(*byte)).unwrap();
        }
    }

    pub fn stage_stalls(&mut self, count: usize) {
        for _ in 0..count {
            self.read_queue.push_back(Rx::Stall).unwrap();
        }
    }

    /// Stages `[status, cmd, len_lo, len_hi, payload...]`.
    pub fn stage_response(&mut self, status: u8, cmd: u8, payload: &[u8]) {
        let [lo, hi] = (payload.len() as u16).to_le_bytes();
        self.stage_read_data(&[status, cmd, lo, hi]);
        self.stage_read_data(payload);
    }

    pub fn pending_reads(&self) -> usize {
        self.read_queue.len()
    }

    pub fn written(&self) -> &[u8] {
        &self.written
    }

    pub fn chunks(&self) -> &[(usize, bool)] {
        &self.chunks
    }

    /// Outbound bytes split at every chunk flagged `last`.
    pub fn sent_packets(&self) -> Vec<Vec<u8>> {
        let mut packets = Vec::new();
        let mut current = Vec::new();
        let mut offset = 0;
        for &(len, last) in self.chunks.iter() {
            current.extend_from_slice(&self.written[offset..offset + len]);
            offset += len;
            if last {
                packets.push(core::mem::take(&mut current));
            }
        }
        packets
    }

    /// Number of reset packets sent.
    pub fn resync_count(&self) -> usize {
        self.sent_packets()
            .iter()
            .filter(|p| p.first() == Some(&0x14))
            .count()
    }

    pub fn elapsed(&self) -> Duration {
        Duration::from_micros(self.current_time_us)
    }
}

impl SciTimer for MockInterface {
    type Instant = MockInstant;

    fn now(&self) -> Self::Instant {
        MockInstant(self.current_time_us)
    }

    fn delay_ms(&mut self, ms: u32) {
        self.current_time_us = self.current_time_us.saturating_add(u64::from(ms) * 1000);
    }
}

impl SciTransport for MockInterface {
    type Error = MockCommError;

    fn send(&mut self, chunk: &[u8], last: bool) -> Result<(), Self::Error> {
        if self.fail_send {
            return Err(MockCommError);
        }
        assert!(chunk.len() <= self.max_chunk, "chunk exceeds transport limit");
        self.written.extend_from_slice(chunk).map_err(|_| MockCommError)?;
        self.chunks.push((chunk.len(), last)).map_err(|_| MockCommError)?;
        Ok(())
    }

    fn receive(&mut self, buf: &mut [u8]) -> nb::Result<(), Self::Error> {
        self.receive_calls += 1;
        if self.fail_receive {
            return Err(nb::Error::Other(MockCommError));
        }
        if self.read_queue.front() == Some(&Rx::Stall) {
            self.read_queue.pop_front();
            return Err(nb::Error::WouldBlock);
        }
        // All or nothing: a short read leaves the queue untouched.
        let available = self
            .read_queue
            .iter()
            .take_while(|rx| matches!(rx, Rx::Byte(_)))
            .count();
        if available < buf.len() {
            return Err(nb::Error::WouldBlock);
        }
        for slot in buf.iter_mut() {
            if let Some(Rx::Byte(byte)) = self.read_queue.pop_front() {
                *slot = byte;
            }
        }
        Ok(())
    }

    fn flush_receive(&mut self) -> Result<(), Self::Error> {
        self.flush_receive_calls += 1;
        self.read_queue.clear();
        Ok(())
    }

    fn flush_send(&mut self) -> Result<(), Self::Error> {
        self.flush_send_calls += 1;
        Ok(())
    }

    fn max_chunk_len(&self) -> usize {
        self.max_chunk
    }

    fn address_changed(&mut self, address: u8) {
        self.address = Some(address);
    }
}

// src/common/config.rs

use super::timing;
use core::time::Duration;

/// Tunable timing and limits for a driver instance.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct SciConfig {
    /// Budget for one response, measured from receive-loop entry.
    pub recv_timeout: Duration,
    /// Sleep between status-byte polls.
    pub poll_interval: Duration,
    /// Delay after a reset command.
    pub reset_settle: Duration,
    /// Largest response payload the host will buffer. Longer ones fail as
    /// out of memory.
    pub max_payload_len: usize,
}

impl SciConfig {
    pub const fn new() -> Self {
        SciConfig {
            recv_timeout: timing::DEFAULT_RECV_TIMEOUT,
            poll_interval: timing::STATUS_POLL_INTERVAL,
            reset_settle: timing::RESET_SETTLE_TIME,
            max_payload_len: timing::MAX_PAYLOAD_LEN,
        }
    }

    pub const fn with_recv_timeout(mut self, timeout: Duration) -> Self {
        self.recv_timeout = timeout;
        self
    }

    pub const fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    pub const fn with_reset_settle(mut self, settle: Duration) -> Self {
        self.reset_settle = settle;
        self
    }

    pub const fn with_max_payload_len(mut self, len: usize) -> Self {
        self.max_payload_len = len;
        self
    }
}

impl Default for SciConfig {
    fn default() -> Self {
        Self::new()
    }
}

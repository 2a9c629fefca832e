// src/common/timing.rs

use core::time::Duration;

// Nominal values used by the module firmware. The driver copies the tunable
// ones into `SciConfig`; the rest are fixed by the protocol.

// === Receive loop ===

/// Default budget for one response, measured from receive-loop entry.
pub const DEFAULT_RECV_TIMEOUT: Duration = Duration::from_millis(2000);
/// Sleep between two status-byte polls while the module is not ready.
pub const STATUS_POLL_INTERVAL: Duration = Duration::from_millis(50);
/// Back-off between retries of a mid-frame read that reported `WouldBlock`.
pub const FRAME_READ_BACKOFF: Duration = Duration::from_millis(1);

// === Resynchronization ===

/// Time the module needs after a reset command before it accepts a new request.
pub const RESET_SETTLE_TIME: Duration = Duration::from_millis(1000);

// === Bus ===

/// Largest payload one I2C transfer may carry (the module's bus buffer size).
pub const I2C_MAX_TRANSFER: usize = 32;

// === Buffers ===

/// Default ceiling on a response payload: whatever the 16-bit length field allows.
pub const MAX_PAYLOAD_LEN: usize = u16::MAX as usize;

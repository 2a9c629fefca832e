// src/lib.rs

#![cfg_attr(not(any(test, feature = "std")), no_std)]

// Response payloads are sized at runtime, so alloc is always needed.
extern crate alloc;

pub mod bindings;
pub mod common;
pub mod driver;

// Re-export key types for convenience
pub use common::{
    CommandId, ErrorCode, Port, RefreshRate, ResponsePacket, SciConfig, SciError, SciTimer,
    SciTransport, Sku, Status,
};
pub use driver::{SciDriver, TransactionState};

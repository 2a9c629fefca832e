// src/common/mod.rs

// --- Declare all public modules within common ---
pub mod command;
pub mod config;
pub mod error;
pub mod hal_traits;
pub mod packet;
pub mod timing;
pub mod types;

// --- Re-export key types/traits/functions for easier access ---

// From command.rs
pub use command::{CommandId, MAX_COMMAND_ID};

// From config.rs
pub use config::SciConfig;

// From error.rs
pub use error::{ErrorCode, SciError};

// From hal_traits.rs
pub use hal_traits::{SciInstant, SciTimer, SciTransport}; // Core sync traits

// From packet.rs
pub use packet::{
    decode_response_header, encode_command_checked, ResponseHeader,
    ResponsePacket, Status, HEADER_LEN, RESPONSE_HEADER_LEN,
};

// From types.rs
pub use types::{
    Port, Port1Mode, Port23Mode, PortConfig, RefreshRate, RtcTime, SensorClass, Sku, Version,
};

// --- Feature-gated re-exports ---

#[cfg(feature = "std")]
pub use hal_traits::StdTimer;

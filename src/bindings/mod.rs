// src/bindings/mod.rs

// Transports for concrete buses. Each one is feature gated so the core
// driver builds without any HAL.

#[cfg(feature = "i2c")]
pub mod i2c;

#[cfg(feature = "i2c")]
pub use i2c::I2cInterface;

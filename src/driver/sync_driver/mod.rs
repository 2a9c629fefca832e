// src/driver/sync_driver/mod.rs

mod commands;
mod io_helpers;
mod transaction;

#[cfg(test)]
pub(crate) mod mock;

use crate::common::{
    command::CommandId,
    config::SciConfig,
    error::SciError,
    hal_traits::{SciInstant, SciTimer, SciTransport},
};
use core::fmt::Debug;
use core::time::Duration;
use log::{debug, trace};

/// Where the current (or last) transaction stands.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TransactionState {
    Idle,
    Sending,
    AwaitingStatusByte,
    HeaderReceived,
    PayloadReceived,
    /// Ended with this error code.
    Failed(u8),
}

/// Blocking host driver for the acquisition module.
///
/// Owns the transport for its whole life. Every operation takes `&mut self`,
/// so at most one request is ever outstanding.
#[derive(Debug)]
pub struct SciDriver<IF>
where
    IF: SciTransport + SciTimer,
    IF::Error: Debug,
    IF::Instant: SciInstant,
{
    interface: IF,
    config: SciConfig,
    state: TransactionState,
}

impl<IF> SciDriver<IF>
where
    IF: SciTransport + SciTimer,
    IF::Error: Debug,
    IF::Instant: SciInstant,
{
    pub fn new(interface: IF) -> Self {
        Self::with_config(interface, SciConfig::default())
    }

    pub fn with_config(interface: IF, config: SciConfig) -> Self {
        SciDriver {
            interface,
            config,
            state: TransactionState::Idle,
        }
    }

    /// Gives the transport back.
    pub fn release(self) -> IF {
        self.interface
    }

    pub fn interface(&self) -> &IF {
        &self.interface
    }

    pub fn interface_mut(&mut self) -> &mut IF {
        &mut self.interface
    }

    pub fn config(&self) -> &SciConfig {
        &self.config
    }

    pub fn state(&self) -> TransactionState {
        self.state
    }

    /// Brings the module to a known state: drops stale inbound bytes, then
    /// sends a reset and waits for it to settle.
    pub fn begin(&mut self) -> Result<(), SciError<IF::Error>> {
        debug!("initializing module");
        self.interface.flush_receive().map_err(SciError::Io)?;
        self.resync(CommandId::Reset.as_u8());
        Ok(())
    }

    /// Takes effect at the next transaction.
    pub fn set_recv_timeout(&mut self, timeout: Duration) {
        self.config.recv_timeout = timeout;
    }

    pub fn recv_timeout(&self) -> Duration {
        self.config.recv_timeout
    }

    fn set_state(&mut self, state: TransactionState) {
        trace!("transaction state {:?} -> {:?}", self.state, state);
        self.state = state;
    }
}

// src/common/command.rs

//! Command identifiers understood by the module.

use super::error::SciError;
use core::fmt;

/// Highest command id the module knows. Anything above is rejected before I/O.
pub const MAX_COMMAND_ID: u8 = 0x21;

/// One byte on the wire selecting what the module should do.
///
/// Several ids are used for both set and get: the module tells them apart by
/// whether the request carries arguments.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum CommandId {
    /// Port 1 mode and SKU (set with a SKU argument, get without).
    Port1Config = 0x00,
    Port2Config = 0x01,
    Port3Config = 0x02,
    /// I2C bus address of the module.
    Address = 0x03,
    /// RTC time.
    Time = 0x04,
    RecordOn = 0x05,
    RecordOff = 0x06,
    ScreenOn = 0x07,
    ScreenOff = 0x08,
    /// Attribute names, comma separated.
    Names = 0x09,
    Values = 0x0A,
    Units = 0x0B,
    Skus = 0x0C,
    /// `name:value unit` for every attribute, optionally timestamped.
    Information = 0x0D,
    ValueByKey = 0x0E,
    ValueByPortKey = 0x0F,
    ValueBySkuKey = 0x10,
    UnitByKey = 0x11,
    UnitByPortKey = 0x12,
    UnitBySkuKey = 0x13,
    /// Also used for resynchronization. The module never answers it.
    Reset = 0x14,
    AnalogSkus = 0x15,
    DigitalSkus = 0x16,
    I2cSkus = 0x17,
    UartSkus = 0x18,
    Timestamp = 0x19,
    RefreshRate = 0x20,
    Version = 0x21,
}

impl CommandId {
    #[inline]
    pub const fn as_u8(self) -> u8 {
        self as u8
    }

    /// Whether the module replies to this command.
    pub const fn expects_response(self) -> bool {
        !matches!(self, CommandId::Reset)
    }
}

impl From<CommandId> for u8 {
    fn from(id: CommandId) -> Self {
        id as u8
    }
}

impl TryFrom<u8> for CommandId {
    type Error = SciError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        use CommandId::*;
        Ok(match value {
            0x00 => Port1Config,
            0x01 => Port2Config,
            0x02 => Port3Config,
            0x03 => Address,
            0x04 => Time,
            0x05 => RecordOn,
            0x06 => RecordOff,
            0x07 => ScreenOn,
            0x08 => ScreenOff,
            0x09 => Names,
            0x0A => Values,
            0x0B => Units,
            0x0C => Skus,
            0x0D => Information,
            0x0E => ValueByKey,
            0x0F => ValueByPortKey,
            0x10 => ValueBySkuKey,
            0x11 => UnitByKey,
            0x12 => UnitByPortKey,
            0x13 => UnitBySkuKey,
            0x14 => Reset,
            0x15 => AnalogSkus,
            0x16 => DigitalSkus,
            0x17 => I2cSkus,
            0x18 => UartSkus,
            0x19 => Timestamp,
            0x20 => RefreshRate,
            0x21 => Version,
            other => return Err(SciError::InvalidCommand(other)),
        })
    }
}

impl fmt::Display for CommandId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}({:#04x})", self, self.as_u8())
    }
}

// src/driver/sync_driver/commands.rs

use super::SciDriver;
use crate::common::{
    command::CommandId,
    error::SciError,
    hal_traits::{SciInstant, SciTimer, SciTransport},
    types::{
        payload_to_string, Port, Port1Mode, Port23Mode, PortConfig, RefreshRate, RtcTime,
        SensorClass, Sku, Version, SKU_MAX_LEN,
    },
};
use alloc::string::String;
use alloc::vec::Vec;
use core::fmt::Debug;

/// Bus addresses the module can be switched to.
pub const SUPPORTED_I2C_ADDRESSES: [u8; 3] = [0x21, 0x22, 0x23];

impl<IF> SciDriver<IF>
where
    IF: SciTransport + SciTimer,
    IF::Error: Debug,
    IF::Instant: SciInstant,
{
    // --- Request helpers ---

    /// Runs a transaction and returns the payload of a SUCCESS response.
    fn request(&mut self, id: CommandId, args: &[u8]) -> Result<Vec<u8>, SciError<IF::Error>> {
        let response = self.execute_transaction(id.as_u8(), args)?;
        let response = response.into_result().map_err(SciError::widen)?;
        Ok(response.into_payload())
    }

    fn request_ack(&mut self, id: CommandId, args: &[u8]) -> Result<(), SciError<IF::Error>> {
        self.request(id, args).map(|_| ())
    }

    fn request_text(&mut self, id: CommandId, args: &[u8]) -> Result<String, SciError<IF::Error>> {
        self.request(id, args).map(|payload| payload_to_string(&payload))
    }

    fn request_byte(&mut self, id: CommandId) -> Result<u8, SciError<IF::Error>> {
        let payload = self.request(id, &[])?;
        payload.first().copied().ok_or(SciError::PayloadLength {
            expected: 1,
            got: 0,
        })
    }

    // --- Identification ---

    /// Firmware version, e.g. `0x0123` for V1.2.3.
    pub fn version(&mut self) -> Result<Version, SciError<IF::Error>> {
        let payload = self.request(CommandId::Version, &[])?;
        match payload.as_slice() {
            &[hi, lo] => Ok(Version(u16::from(hi) << 8 | u16::from(lo))),
            other => Err(SciError::PayloadLength {
                expected: 2,
                got: other.len(),
            }),
        }
    }

    // --- Port configuration ---

    /// Selects the sensor on port 1. `"Analog"` reads raw voltage, `"NULL"` clears it.
    pub fn set_port1(&mut self, sku: &str) -> Result<(), SciError<IF::Error>> {
        self.set_port(CommandId::Port1Config, sku)
    }

    pub fn set_port2(&mut self, sku: &str) -> Result<(), SciError<IF::Error>> {
        self.set_port(CommandId::Port2Config, sku)
    }

    pub fn set_port3(&mut self, sku: &str) -> Result<(), SciError<IF::Error>> {
        self.set_port(CommandId::Port3Config, sku)
    }

    pub fn port1(&mut self) -> Result<PortConfig<Port1Mode>, SciError<IF::Error>> {
        let payload = self.request(CommandId::Port1Config, &[])?;
        PortConfig::from_payload(&payload).map_err(SciError::widen)
    }

    pub fn port2(&mut self) -> Result<PortConfig<Port23Mode>, SciError<IF::Error>> {
        let payload = self.request(CommandId::Port2Config, &[])?;
        PortConfig::from_payload(&payload).map_err(SciError::widen)
    }

    pub fn port3(&mut self) -> Result<PortConfig<Port23Mode>, SciError<IF::Error>> {
        let payload = self.request(CommandId::Port3Config, &[])?;
        PortConfig::from_payload(&payload).map_err(SciError::widen)
    }

    fn set_port(&mut self, id: CommandId, sku: &str) -> Result<(), SciError<IF::Error>> {
        let sku = Sku::new(sku).map_err(SciError::widen)?;
        self.request_ack(id, sku.as_bytes())
    }

    // --- Bus address ---

    /// Moves the module to a new I2C address. On success the transport is
    /// told about it so later requests reach the module.
    pub fn set_i2c_address(&mut self, address: u8) -> Result<(), SciError<IF::Error>> {
        if !SUPPORTED_I2C_ADDRESSES.contains(&address) {
            return Err(SciError::InvalidAddress(address));
        }
        self.request_ack(CommandId::Address, &[address])?;
        self.interface.address_changed(address);
        Ok(())
    }

    pub fn i2c_address(&mut self) -> Result<u8, SciError<IF::Error>> {
        self.request_byte(CommandId::Address)
    }

    // --- RTC ---

    pub fn set_rtc(&mut self, time: &RtcTime) -> Result<(), SciError<IF::Error>> {
        self.request_ack(CommandId::Time, &time.to_bytes())
    }

    pub fn rtc(&mut self) -> Result<RtcTime, SciError<IF::Error>> {
        let payload = self.request(CommandId::Time, &[])?;
        RtcTime::from_payload(&payload).map_err(SciError::widen)
    }

    /// Current module time as text, `hour:minute:second`.
    pub fn timestamp(&mut self) -> Result<String, SciError<IF::Error>> {
        self.request_text(CommandId::Timestamp, &[])
    }

    // --- Recording and display ---

    /// Starts writing CSV data to the module's storage.
    pub fn enable_record(&mut self) -> Result<(), SciError<IF::Error>> {
        self.request_ack(CommandId::RecordOn, &[])
    }

    pub fn disable_record(&mut self) -> Result<(), SciError<IF::Error>> {
        self.request_ack(CommandId::RecordOff, &[])
    }

    pub fn display_on(&mut self) -> Result<(), SciError<IF::Error>> {
        self.request_ack(CommandId::ScreenOn, &[])
    }

    pub fn display_off(&mut self) -> Result<(), SciError<IF::Error>> {
        self.request_ack(CommandId::ScreenOff, &[])
    }

    // --- Sensor data by port ---

    /// Attribute names of the sensors on `port`, comma separated.
    pub fn keys(&mut self, port: Port) -> Result<String, SciError<IF::Error>> {
        self.request_text(CommandId::Names, &[port.mask()])
    }

    pub fn values(&mut self, port: Port) -> Result<String, SciError<IF::Error>> {
        self.request_text(CommandId::Values, &[port.mask()])
    }

    pub fn units(&mut self, port: Port) -> Result<String, SciError<IF::Error>> {
        self.request_text(CommandId::Units, &[port.mask()])
    }

    pub fn skus(&mut self, port: Port) -> Result<String, SciError<IF::Error>> {
        self.request_text(CommandId::Skus, &[port.mask()])
    }

    /// `name:value unit` for every attribute on `port`, prefixed with the
    /// module time when `timestamp` is set.
    pub fn information(&mut self, port: Port, timestamp: bool) -> Result<String, SciError<IF::Error>> {
        self.request_text(CommandId::Information, &[port.mask(), u8::from(timestamp)])
    }

    // --- Sensor data by key ---

    /// Value of `key` on any port. Several matches are comma separated.
    pub fn value(&mut self, key: &str) -> Result<String, SciError<IF::Error>> {
        self.request_text(CommandId::ValueByKey, key.as_bytes())
    }

    pub fn value_on(&mut self, port: Port, key: &str) -> Result<String, SciError<IF::Error>> {
        let args = port_key_args(port, None, key);
        self.request_text(CommandId::ValueByPortKey, &args)
    }

    pub fn value_of(&mut self, port: Port, sku: &str, key: &str) -> Result<String, SciError<IF::Error>> {
        let sku = Sku::new(sku).map_err(SciError::widen)?;
        let args = port_key_args(port, Some(&sku), key);
        self.request_text(CommandId::ValueBySkuKey, &args)
    }

    pub fn unit(&mut self, key: &str) -> Result<String, SciError<IF::Error>> {
        self.request_text(CommandId::UnitByKey, key.as_bytes())
    }

    pub fn unit_on(&mut self, port: Port, key: &str) -> Result<String, SciError<IF::Error>> {
        let args = port_key_args(port, None, key);
        self.request_text(CommandId::UnitByPortKey, &args)
    }

    pub fn unit_of(&mut self, port: Port, sku: &str, key: &str) -> Result<String, SciError<IF::Error>> {
        let sku = Sku::new(sku).map_err(SciError::widen)?;
        let args = port_key_args(port, Some(&sku), key);
        self.request_text(CommandId::UnitBySkuKey, &args)
    }

    // --- Supported sensors ---

    pub fn supported_skus(&mut self, class: SensorClass) -> Result<String, SciError<IF::Error>> {
        let id = match class {
            SensorClass::Analog => CommandId::AnalogSkus,
            SensorClass::Digital => CommandId::DigitalSkus,
            SensorClass::I2c => CommandId::I2cSkus,
            SensorClass::Uart => CommandId::UartSkus,
        };
        self.request_text(id, &[])
    }

    pub fn analog_skus(&mut self) -> Result<String, SciError<IF::Error>> {
        self.supported_skus(SensorClass::Analog)
    }

    pub fn digital_skus(&mut self) -> Result<String, SciError<IF::Error>> {
        self.supported_skus(SensorClass::Digital)
    }

    pub fn i2c_skus(&mut self) -> Result<String, SciError<IF::Error>> {
        self.supported_skus(SensorClass::I2c)
    }

    pub fn uart_skus(&mut self) -> Result<String, SciError<IF::Error>> {
        self.supported_skus(SensorClass::Uart)
    }

    // --- Refresh rate ---

    pub fn set_refresh_rate(&mut self, rate: RefreshRate) -> Result<(), SciError<IF::Error>> {
        self.request_ack(CommandId::RefreshRate, &[rate as u8])
    }

    pub fn refresh_rate(&mut self) -> Result<RefreshRate, SciError<IF::Error>> {
        let raw = self.request_byte(CommandId::RefreshRate)?;
        RefreshRate::try_from(raw).map_err(SciError::widen)
    }

    // --- Reset ---

    /// Resets the module's handling of `command`. No response is expected.
    pub fn reset(&mut self, command: CommandId) {
        self.resync(command.as_u8());
    }
}

/// `[port, sku(7, NUL padded)?, key...]`
fn port_key_args(port: Port, sku: Option<&Sku>, key: &str) -> Vec<u8> {
    let mut args = Vec::with_capacity(1 + SKU_MAX_LEN + key.len());
    args.push(port.mask());
    if let Some(sku) = sku {
        args.extend_from_slice(&sku.to_padded());
    }
    args.extend_from_slice(key.as_bytes());
    args
}

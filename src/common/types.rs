// src/common/types.rs

use super::error::SciError;
use alloc::string::String;
use arrayvec::ArrayString;
use core::fmt;
use core::time::Duration;

// --- Ports ---

/// Port selector for the per-port queries (names, values, units, SKUs, info).
///
/// The wire value is a bit mask, so `All` selects every port at once.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum Port {
    /// Analog / digital sensor port.
    One = 0x01,
    /// I2C / UART sensor port.
    Two = 0x02,
    /// I2C / UART sensor port.
    Three = 0x04,
    All = 0x07,
}

impl Port {
    #[inline]
    pub const fn mask(self) -> u8 {
        self as u8
    }
}

/// Mode reported for port 1.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Port1Mode {
    Analog,
    Digital,
    Unknown(u8),
}

impl From<u8> for Port1Mode {
    fn from(value: u8) -> Self {
        match value {
            0 => Port1Mode::Analog,
            1 => Port1Mode::Digital,
            other => Port1Mode::Unknown(other),
        }
    }
}

impl fmt::Display for Port1Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Port1Mode::Analog => "ANALOG",
            Port1Mode::Digital => "DIGITAL",
            Port1Mode::Unknown(_) => "UNKNOWN",
        })
    }
}

/// Mode reported for ports 2 and 3.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Port23Mode {
    I2c,
    Uart,
    Unknown(u8),
}

impl From<u8> for Port23Mode {
    fn from(value: u8) -> Self {
        match value {
            0 => Port23Mode::I2c,
            1 => Port23Mode::Uart,
            other => Port23Mode::Unknown(other),
        }
    }
}

impl fmt::Display for Port23Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Port23Mode::I2c => "I2C",
            Port23Mode::Uart => "UART",
            Port23Mode::Unknown(_) => "UNKNOWN",
        })
    }
}

/// Mode and SKU configured on one port.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortConfig<M> {
    pub mode: M,
    pub sku: String,
}

impl<M: From<u8>> PortConfig<M> {
    /// Decodes `[mode, sku...]`.
    pub fn from_payload(payload: &[u8]) -> Result<Self, SciError> {
        let (&mode, sku) = payload
            .split_first()
            .ok_or(SciError::PayloadLength { expected: 1, got: 0 })?;
        Ok(PortConfig {
            mode: M::from(mode),
            sku: payload_to_string(sku),
        })
    }
}

// --- SKU ---

/// Longest SKU the module accepts.
pub const SKU_MAX_LEN: usize = 7;

/// A sensor SKU such as `"SEN0334"`, or one of the special values `"NULL"`
/// and `"Analog"`.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct Sku(ArrayString<SKU_MAX_LEN>);

impl Sku {
    /// Clears the port configuration.
    pub const NULL: &'static str = "NULL";
    /// Raw analog voltage acquisition on port 1.
    pub const ANALOG: &'static str = "Analog";

    pub fn new(sku: &str) -> Result<Self, SciError> {
        ArrayString::from(sku)
            .map(Sku)
            .map_err(|_| SciError::InvalidArguments)
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }

    /// The SKU as the fixed 7-byte field used by the keyed queries, NUL padded.
    pub fn to_padded(&self) -> [u8; SKU_MAX_LEN] {
        let mut field = [0u8; SKU_MAX_LEN];
        field[..self.0.len()].copy_from_slice(self.0.as_bytes());
        field
    }
}

impl fmt::Display for Sku {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which family of supported SKUs to list.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SensorClass {
    Analog,
    Digital,
    I2c,
    Uart,
}

// --- Refresh rate ---

/// Data refresh period. If a sensor updates slower than the period, the
/// sensor's own rate wins.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum RefreshRate {
    /// Refresh as fast as the sensors deliver.
    Ms = 0,
    Sec1 = 1,
    Sec3 = 2,
    Sec5 = 3,
    Sec10 = 4,
    Sec30 = 5,
    Min1 = 6,
    Min5 = 7,
    Min10 = 8,
}

impl RefreshRate {
    pub const fn as_millis(self) -> u32 {
        match self {
            RefreshRate::Ms => 0,
            RefreshRate::Sec1 => 1_000,
            RefreshRate::Sec3 => 3_000,
            RefreshRate::Sec5 => 5_000,
            RefreshRate::Sec10 => 10_000,
            RefreshRate::Sec30 => 30_000,
            RefreshRate::Min1 => 60_000,
            RefreshRate::Min5 => 300_000,
            RefreshRate::Min10 => 600_000,
        }
    }

    pub const fn period(self) -> Duration {
        Duration::from_millis(self.as_millis() as u64)
    }
}

impl TryFrom<u8> for RefreshRate {
    type Error = SciError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Ok(match value {
            0 => RefreshRate::Ms,
            1 => RefreshRate::Sec1,
            2 => RefreshRate::Sec3,
            3 => RefreshRate::Sec5,
            4 => RefreshRate::Sec10,
            5 => RefreshRate::Sec30,
            6 => RefreshRate::Min1,
            7 => RefreshRate::Min5,
            8 => RefreshRate::Min10,
            other => return Err(SciError::UnexpectedValue(other)),
        })
    }
}

impl fmt::Display for RefreshRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            RefreshRate::Ms => "0s",
            RefreshRate::Sec1 => "1s",
            RefreshRate::Sec3 => "3s",
            RefreshRate::Sec5 => "5s",
            RefreshRate::Sec10 => "10s",
            RefreshRate::Sec30 => "30s",
            RefreshRate::Min1 => "1min",
            RefreshRate::Min5 => "5min",
            RefreshRate::Min10 => "10min",
        })
    }
}

// --- Version ---

/// Firmware version. `0x0123` reads as V1.2.3.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct Version(pub u16);

impl Version {
    pub const fn major(&self) -> u8 {
        (self.0 >> 8) as u8
    }

    pub const fn minor(&self) -> u8 {
        ((self.0 >> 4) & 0x0F) as u8
    }

    pub const fn patch(&self) -> u8 {
        (self.0 & 0x0F) as u8
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "V{}.{}.{}", self.major(), self.minor(), self.patch())
    }
}

// --- RTC ---

/// Calendar time kept by the module's real-time clock.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct RtcTime {
    pub year: u16,
    pub month: u8,
    pub day: u8,
    /// 0 = Sunday.
    pub weekday: u8,
    pub hour: u8,
    pub minute: u8,
    pub second: u8,
}

/// Size of the RTC field on the wire.
pub const RTC_WIRE_LEN: usize = 8;

impl RtcTime {
    /// Builds a time and fills in the weekday. Valid for 2000 through 2099.
    pub fn new(year: u16, month: u8, day: u8, hour: u8, minute: u8, second: u8) -> Self {
        RtcTime {
            year,
            month,
            day,
            weekday: Self::day_of_week(year, month, day),
            hour,
            minute,
            second,
        }
    }

    /// Day of the week, 0 = Sunday. 2000-01-01 was a Saturday.
    pub fn day_of_week(year: u16, month: u8, day: u8) -> u8 {
        let year = if year >= 2000 { year - 2000 } else { year };
        let mut days = u32::from(day);
        for m in 1..month {
            days += match m {
                2 => 28,
                4 | 6 | 9 | 11 => 30,
                _ => 31,
            };
        }
        if month > 2 && year % 4 == 0 {
            days += 1;
        }
        let year = u32::from(year);
        let days = days + 365 * year + (year + 3) / 4 - 1;
        ((days + 6) % 7) as u8
    }

    /// Wire layout: `[second, minute, hour, day, weekday, month, year_lo, year_hi]`.
    pub fn to_bytes(&self) -> [u8; RTC_WIRE_LEN] {
        let [year_lo, year_hi] = self.year.to_le_bytes();
        [
            self.second,
            self.minute,
            self.hour,
            self.day,
            self.weekday,
            self.month,
            year_lo,
            year_hi,
        ]
    }

    pub fn from_payload(payload: &[u8]) -> Result<Self, SciError> {
        let bytes: &[u8; RTC_WIRE_LEN] =
            payload.try_into().map_err(|_| SciError::PayloadLength {
                expected: RTC_WIRE_LEN,
                got: payload.len(),
            })?;
        Ok(RtcTime {
            second: bytes[0],
            minute: bytes[1],
            hour: bytes[2],
            day: bytes[3],
            weekday: bytes[4],
            month: bytes[5],
            year: u16::from(bytes[6]) | (u16::from(bytes[7]) << 8),
        })
    }
}

impl fmt::Display for RtcTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{:02}/{:02} {} {:02}:{:02}:{:02}",
            self.year, self.month, self.day, self.weekday, self.hour, self.minute, self.second
        )
    }
}

/// Module text is a C string: it ends at the first NUL. Non-UTF-8 bytes
/// are replaced.
pub(crate) fn payload_to_string(payload: &[u8]) -> String {
    let end = payload.iter().position(|&b| b == 0).unwrap_or(payload.len());
    String::from_utf8_lossy(&payload[..end]).into_owned()
}

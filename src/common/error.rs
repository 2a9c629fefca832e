// src/common/error.rs

use core::convert::Infallible;
use core::fmt;

/// Error codes of the SCI protocol.
///
/// The module sends one of these as `payload[0]` of a FAILED response, and the
/// host uses the same table to classify its own failures.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum ErrorCode {
    None = 0x00,
    InvalidCommand = 0x01,
    ResponsePacketError = 0x02,
    /// Host (bus controller) could not allocate the response buffer.
    MasterOutOfMemory = 0x03,
    ResponseTimeout = 0x04,
    /// Invalid command packet or unmatched command.
    InvalidCommandPacket = 0x05,
    SlaveFault = 0x06,
    InvalidArguments = 0x07,
    /// SKU is unknown or unsupported on that port.
    InvalidSku = 0x08,
    SlaveOutOfMemory = 0x09,
    InvalidAddress = 0x0A,
}

impl ErrorCode {
    /// Looks up a wire value. Returns `None` for bytes outside the table.
    pub const fn from_u8(value: u8) -> Option<Self> {
        Some(match value {
            0x00 => ErrorCode::None,
            0x01 => ErrorCode::InvalidCommand,
            0x02 => ErrorCode::ResponsePacketError,
            0x03 => ErrorCode::MasterOutOfMemory,
            0x04 => ErrorCode::ResponseTimeout,
            0x05 => ErrorCode::InvalidCommandPacket,
            0x06 => ErrorCode::SlaveFault,
            0x07 => ErrorCode::InvalidArguments,
            0x08 => ErrorCode::InvalidSku,
            0x09 => ErrorCode::SlaveOutOfMemory,
            0x0A => ErrorCode::InvalidAddress,
            _ => return None,
        })
    }

    #[inline]
    pub const fn as_u8(self) -> u8 {
        self as u8
    }
}

impl From<ErrorCode> for u8 {
    fn from(code: ErrorCode) -> Self {
        code as u8
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            ErrorCode::None => "no error",
            ErrorCode::InvalidCommand => "invalid command",
            ErrorCode::ResponsePacketError => "response packet error",
            ErrorCode::MasterOutOfMemory => "insufficient memory on the host",
            ErrorCode::ResponseTimeout => "response timeout",
            ErrorCode::InvalidCommandPacket => "invalid command packet or unmatched command",
            ErrorCode::SlaveFault => "peripheral fault",
            ErrorCode::InvalidArguments => "invalid arguments",
            ErrorCode::InvalidSku => "invalid or unsupported SKU",
            ErrorCode::SlaveOutOfMemory => "insufficient memory on the peripheral",
            ErrorCode::InvalidAddress => "invalid I2C address",
        };
        f.write_str(text)
    }
}

/// Everything that can go wrong in a transaction.
///
/// `E` is the transport's own error type. Validation helpers that cannot fail
/// on I/O use `SciError<Infallible>` and are widened with [`SciError::widen`].
#[derive(Debug, thiserror::Error)]
pub enum SciError<E = Infallible>
where
    E: fmt::Debug,
{
    /// Underlying I/O error from the transport.
    #[error("I/O error: {0:?}")]
    Io(E),

    /// Command id is above the highest known command. Nothing was sent.
    #[error("invalid command {0:#04x}")]
    InvalidCommand(u8),

    /// The echoed command id did not match the request.
    #[error("response packet error: expected command {expected:#04x}, got {received:#04x}")]
    ResponsePacket { expected: u8, received: u8 },

    /// A response decoded cleanly but its payload has the wrong size for the command.
    #[error("unexpected payload length: expected {expected}, got {got}")]
    PayloadLength { expected: usize, got: usize },

    /// A payload field holds a value the host does not know how to decode.
    #[error("unexpected value {0:#04x} in response payload")]
    UnexpectedValue(u8),

    /// The response buffer could not be allocated.
    #[error("out of memory: could not allocate {0} bytes")]
    OutOfMemory(usize),

    /// No recognized status byte (or no complete frame) before the deadline.
    #[error("response timed out")]
    Timeout,

    /// The argument list does not fit the 16-bit count field.
    #[error("command packet too long: {0} argument bytes")]
    CommandPacketTooLong(usize),

    /// Host-side argument validation failed. Nothing was sent.
    #[error("invalid arguments")]
    InvalidArguments,

    /// Requested bus address is not one the module supports. Nothing was sent.
    #[error("invalid I2C address {0:#04x}")]
    InvalidAddress(u8),

    /// The module answered FAILED; the raw code from `payload[0]`.
    #[error("module reported failure code {0:#04x}")]
    Module(u8),
}

impl<E: fmt::Debug> SciError<E> {
    /// The protocol error code for this error, as a wire byte.
    ///
    /// Module-reported codes are passed through untouched, even when they
    /// are outside the known table.
    pub fn code(&self) -> u8 {
        match self {
            SciError::Module(raw) => *raw,
            other => other.local_code().as_u8(),
        }
    }

    /// The protocol error code, if it is one of the known values.
    pub fn error_code(&self) -> Option<ErrorCode> {
        match self {
            SciError::Module(raw) => ErrorCode::from_u8(*raw),
            other => Some(other.local_code()),
        }
    }

    fn local_code(&self) -> ErrorCode {
        match self {
            SciError::Io(_) => ErrorCode::SlaveFault,
            SciError::InvalidCommand(_) => ErrorCode::InvalidCommand,
            SciError::ResponsePacket { .. }
            | SciError::PayloadLength { .. }
            | SciError::UnexpectedValue(_) => ErrorCode::ResponsePacketError,
            SciError::OutOfMemory(_) => ErrorCode::MasterOutOfMemory,
            SciError::Timeout => ErrorCode::ResponseTimeout,
            SciError::CommandPacketTooLong(_) => ErrorCode::InvalidCommandPacket,
            SciError::InvalidArguments => ErrorCode::InvalidArguments,
            SciError::InvalidAddress(_) => ErrorCode::InvalidAddress,
            SciError::Module(raw) => ErrorCode::from_u8(*raw).unwrap_or(ErrorCode::SlaveFault),
        }
    }
}

impl SciError<Infallible> {
    /// Converts a validation error into one carrying a transport error type.
    pub fn widen<E: fmt::Debug>(self) -> SciError<E> {
        match self {
            SciError::Io(never) => match never {},
            SciError::InvalidCommand(cmd) => SciError::InvalidCommand(cmd),
            SciError::ResponsePacket { expected, received } => {
                SciError::ResponsePacket { expected, received }
            }
            SciError::PayloadLength { expected, got } => SciError::PayloadLength { expected, got },
            SciError::UnexpectedValue(value) => SciError::UnexpectedValue(value),
            SciError::OutOfMemory(len) => SciError::OutOfMemory(len),
            SciError::Timeout => SciError::Timeout,
            SciError::CommandPacketTooLong(len) => SciError::CommandPacketTooLong(len),
            SciError::InvalidArguments => SciError::InvalidArguments,
            SciError::InvalidAddress(addr) => SciError::InvalidAddress(addr),
            SciError::Module(raw) => SciError::Module(raw),
        }
    }
}

// src/common/packet.rs

//! Command and response framing.
//!
//! Request:  `[cmd][argc_lo][argc_hi][args...]`
//! Response: `[status][cmd][len_lo][len_hi][payload...]`

use super::error::{ErrorCode, SciError};
use alloc::vec::Vec;
use core::fmt;

/// Size of the command packet header.
pub const HEADER_LEN: usize = 3;
/// Size of the response header including the status byte.
pub const RESPONSE_HEADER_LEN: usize = 4;
/// Largest argument list the 16-bit count can describe.
pub const MAX_ARGS_LEN: usize = u16::MAX as usize;

/// Response status byte. Any other value in the status position is line noise.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum Status {
    Success = 0x53,
    Failed = 0x63,
}

impl Status {
    pub const fn from_u8(value: u8) -> Option<Self> {
        match value {
            0x53 => Some(Status::Success),
            0x63 => Some(Status::Failed),
            _ => None,
        }
    }

    #[inline]
    pub const fn as_u8(self) -> u8 {
        self as u8
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Status::Success => f.write_str("SUCCESS"),
            Status::Failed => f.write_str("FAILED"),
        }
    }
}

/// Builds a command packet. The count field is emitted low byte first.
///
/// Callers guarantee `args.len() <= MAX_ARGS_LEN`.
pub(crate) fn encode_command(command_id: u8, args: &[u8]) -> Vec<u8> {
    let [count_lo, count_hi] = (args.len() as u16).to_le_bytes();
    let mut packet = Vec::with_capacity(HEADER_LEN + args.len());
    packet.push(command_id);
    packet.push(count_lo);
    packet.push(count_hi);
    packet.extend_from_slice(args);
    packet
}

/// Builds a command packet, rejecting argument lists the count field cannot hold.
pub fn encode_command_checked(command_id: u8, args: &[u8]) -> Result<Vec<u8>, SciError> {
    if args.len() > MAX_ARGS_LEN {
        return Err(SciError::CommandPacketTooLong(args.len()));
    }
    Ok(encode_command(command_id, args))
}

/// Fixed part of a response. `status` is raw and not validated here.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ResponseHeader {
    pub status: u8,
    pub command_id: u8,
    pub length: u16,
}

pub fn decode_response_header(bytes: [u8; RESPONSE_HEADER_LEN]) -> ResponseHeader {
    ResponseHeader {
        status: bytes[0],
        command_id: bytes[1],
        length: u16::from(bytes[2]) | (u16::from(bytes[3]) << 8),
    }
}

/// A complete response as read off the transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponsePacket {
    pub header: ResponseHeader,
    pub payload: Vec<u8>,
}

impl ResponsePacket {
    pub fn status(&self) -> Option<Status> {
        Status::from_u8(self.header.status)
    }

    pub fn is_success(&self) -> bool {
        self.status() == Some(Status::Success)
    }

    pub fn command_id(&self) -> u8 {
        self.header.command_id
    }

    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    pub fn into_payload(self) -> Vec<u8> {
        self.payload
    }

    /// The module's error code for a FAILED response, `None` otherwise.
    ///
    /// A FAILED response without payload has no code to report and is
    /// classified as a response packet error.
    pub fn failure_code(&self) -> Option<u8> {
        if self.is_success() {
            return None;
        }
        Some(
            self.payload
                .first()
                .copied()
                .unwrap_or(ErrorCode::ResponsePacketError.as_u8()),
        )
    }

    /// Turns a FAILED response into `Err`.
    pub fn into_result(self) -> Result<Self, SciError> {
        if self.is_success() {
            return Ok(self);
        }
        match self.payload.first() {
            Some(&code) => Err(SciError::Module(code)),
            None => Err(SciError::PayloadLength { expected: 1, got: 0 }),
        }
    }
}

// --- Unit Tests ---
#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    #[test]
    fn test_encode_without_args() {
        assert_eq!(encode_command(0x21, &[]), vec![0x21, 0x00, 0x00]);
    }

    #[test]
    fn test_encode_with_args() {
        let packet = encode_command(0x00, b"SEN0334");
        assert_eq!(&packet[..HEADER_LEN], &[0x00, 0x07, 0x00]);
        assert_eq!(&packet[HEADER_LEN..], b"SEN0334");
    }

    #[test]
    fn test_encode_count_is_little_endian() {
        let args = vec![0xAAu8; 0x0123];
        let packet = encode_command(0x0E, &args);
        assert_eq!(packet.len(), HEADER_LEN + 0x0123);
        assert_eq!(packet[1], 0x23);
        assert_eq!(packet[2], 0x01);
    }

    #[test]
    fn test_encode_checked_rejects_oversize() {
        let args = vec![0u8; MAX_ARGS_LEN + 1];
        assert!(matches!(
            encode_command_checked(0x0E, &args),
            Err(SciError::CommandPacketTooLong(len)) if len == MAX_ARGS_LEN + 1
        ));
        assert!(encode_command_checked(0x0E, &args[..MAX_ARGS_LEN]).is_ok());
    }

    #[test]
    fn test_encode_checked_count_matches_args() {
        let args = vec![0u8; MAX_ARGS_LEN];
        let packet = encode_command_checked(0x0E, &args).unwrap();
        assert_eq!(&packet[1..HEADER_LEN], &[0xFF, 0xFF]);
        assert_eq!(packet.len() - HEADER_LEN, MAX_ARGS_LEN);

        let packet = encode_command_checked(0x21, &[]).unwrap();
        assert_eq!(packet, [0x21, 0x00, 0x00]);
    }

    #[test]
    fn test_decode_header() {
        let header = decode_response_header([0x53, 0x21, 0x02, 0x00]);
        assert_eq!(header.status, Status::Success.as_u8());
        assert_eq!(header.command_id, 0x21);
        assert_eq!(header.length, 2);

        let header = decode_response_header([0x63, 0x00, 0x34, 0x12]);
        assert_eq!(header.length, 0x1234);

        // Status is extracted as-is
        let header = decode_response_header([0x00, 0x05, 0x00, 0x00]);
        assert_eq!(header.status, 0x00);
        assert_eq!(header.length, 0);
    }

    #[test]
    fn test_status_lookup() {
        assert_eq!(Status::from_u8(0x53), Some(Status::Success));
        assert_eq!(Status::from_u8(0x63), Some(Status::Failed));
        assert_eq!(Status::from_u8(0x00), None);
        assert_eq!(Status::from_u8(0xFF), None);
    }

    #[test]
    fn test_failed_response_code() {
        let packet = ResponsePacket {
            header: decode_response_header([0x63, 0x00, 0x01, 0x00]),
            payload: vec![0x08],
        };
        assert!(!packet.is_success());
        assert_eq!(packet.failure_code(), Some(0x08));
        assert!(matches!(packet.into_result(), Err(SciError::Module(0x08))));
    }

    #[test]
    fn test_failed_response_without_payload() {
        let packet = ResponsePacket {
            header: decode_response_header([0x63, 0x05, 0x00, 0x00]),
            payload: Vec::new(),
        };
        assert_eq!(packet.failure_code(), Some(ErrorCode::ResponsePacketError.as_u8()));
        let err = packet.into_result().unwrap_err();
        assert_eq!(err.error_code(), Some(ErrorCode::ResponsePacketError));
    }

    #[test]
    fn test_success_response() {
        let packet = ResponsePacket {
            header: decode_response_header([0x53, 0x21, 0x02, 0x00]),
            payload: vec![0x01, 0x23],
        };
        assert_eq!(packet.failure_code(), None);
        assert_eq!(packet.command_id(), 0x21);
        assert_eq!(packet.clone().into_result().unwrap().payload(), &[0x01, 0x23]);
        assert_eq!(packet.into_payload(), vec![0x01, 0x23]);
    }
}

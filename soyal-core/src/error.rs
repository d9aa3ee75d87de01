//! Error types for soyal-core

use crate::frame::FrameKind;

/// Result type alias for soyal operations
pub type Result<T> = std::result::Result<T, Error>;

/// Core protocol errors
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Frame is too short to be valid for its kind
    #[error("{kind} frame too short: expected at least {expected} bytes, got {actual} bytes")]
    FrameTooShort {
        kind: FrameKind,
        expected: usize,
        actual: usize,
    },
    
    /// XOR or SUM checksum verification failed
    #[error(
        "Checksum mismatch: expected XOR 0x{expected_xor:02X} SUM 0x{expected_sum:02X}, \
         received XOR 0x{received_xor:02X} SUM 0x{received_sum:02X}"
    )]
    ChecksumMismatch {
        expected_xor: u8,
        expected_sum: u8,
        received_xor: u8,
        received_sum: u8,
    },
    
    /// Length field disagrees with the number of bytes received
    #[error("Length field mismatch: header declares {declared} bytes, frame carries {actual}")]
    LengthMismatch {
        declared: u16,
        actual: usize,
    },
    
    /// A field lies beyond the end of the received frame
    #[error("Field at offset {offset} out of bounds for {len} byte section")]
    FieldOutOfBounds {
        offset: usize,
        len: usize,
    },
    
    /// Record decoders only understand Extended frame layouts
    #[error("Cannot decode record from {0} frame")]
    UnsupportedFrameKind(FrameKind),
    
    /// Payload does not fit the 16-bit length field
    #[error("Payload too large: {size} bytes (max: {max} bytes)")]
    PayloadTooLarge {
        size: usize,
        max: usize,
    },
    
    /// Unknown command code
    #[error("Unknown command code: 0x{0:02X}")]
    UnknownCommand(u8),
    
    /// Date/time components do not form a calendar value
    #[error("Malformed date: {0}")]
    MalformedDate(String),
    
    /// Device answered NACK
    #[error("Device rejected request: error {}", .command.action())]
    DeviceRejected {
        command: crate::command::Command,
    },
}

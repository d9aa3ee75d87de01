//! Extended protocol frame structure and encoding/decoding

use byteorder::{BigEndian, ByteOrder};
use bytes::{BufMut, Bytes, BytesMut};
use std::fmt;

use crate::{
    checksum::{self, Checksum},
    command::ResponseCode,
    constants::EXTENDED_HEADER,
    error::{Error, Result},
};

/// Frame variant, detected once per received buffer
///
/// Each variant carries its own offset table (0-indexed).
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum FrameKind {
    /// `FF 00 5A A5` header followed by a 2-byte length field
    Extended,
    
    /// Legacy short form without the extended header
    Standard,
}

impl FrameKind {
    /// Detect the variant from the first byte of a buffer
    pub fn detect(buf: &[u8]) -> Self {
        match buf.first() {
            Some(&0xFF) => Self::Extended,
            _ => Self::Standard,
        }
    }
    
    /// Offset of the first checksummed byte (the Node ID)
    pub const fn checked_start(self) -> usize {
        match self {
            Self::Extended => 6,
            Self::Standard => 2,
        }
    }
    
    /// Offset of the response/function code
    pub const fn code_offset(self) -> usize {
        match self {
            Self::Extended => 7,
            Self::Standard => 3,
        }
    }
    
    /// Smallest buffer that can be evaluated
    pub const fn min_len(self) -> usize {
        match self {
            Self::Extended => 8,
            Self::Standard => 4,
        }
    }
}

impl fmt::Display for FrameKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Extended => f.write_str("Extended"),
            Self::Standard => f.write_str("Standard"),
        }
    }
}

/// Outbound Extended frame
///
/// # Frame Structure
///
/// ```text
/// ┌─────────────┬──────────┬────────┬─────────┬───────────┬──────┬──────┐
/// │   Header    │  Length  │ NodeID │ Command │  Payload  │ XOR  │ SUM  │
/// │ FF 00 5A A5 │ 2 bytes  │ 1 byte │ 1 byte  │  N bytes  │  1   │  1   │
/// │             │ (BE u16) │        │         │           │      │      │
/// └─────────────┴──────────┴────────┴─────────┴───────────┴──────┴──────┘
/// ```
///
/// Length counts NodeID through SUM inclusive, i.e. `4 + N`.
///
/// # Examples
///
/// ```
/// use soyal_core::{Command, Frame};
///
/// let frame = Frame::new(0x01, Command::GetStatus);
/// assert_eq!(
///     &frame.encode()[..],
///     &[0xFF, 0x00, 0x5A, 0xA5, 0x00, 0x04, 0x01, 0x18, 0xE6, 0xFF]
/// );
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct Frame {
    /// Target terminal
    pub node_id: u8,
    
    /// Command code
    pub command: u8,
    
    /// Command-specific data
    pub payload: Bytes,
}

impl Frame {
    /// Header plus length field
    pub const HEADER_SIZE: usize = 6;
    
    /// XOR and SUM bytes
    pub const TRAILER_SIZE: usize = 2;
    
    /// Maximum payload size the length field can describe
    pub const MAX_PAYLOAD_SIZE: usize = u16::MAX as usize - 4;
    
    /// Create a frame with empty payload
    pub fn new(node_id: u8, command: impl Into<u8>) -> Self {
        Self {
            node_id,
            command: command.into(),
            payload: Bytes::new(),
        }
    }
    
    /// Create a frame with payload
    ///
    /// The payload must not exceed [`Frame::MAX_PAYLOAD_SIZE`]; use
    /// [`Frame::try_with_payload`] for sizes not known in advance.
    pub fn with_payload(node_id: u8, command: impl Into<u8>, payload: impl Into<Bytes>) -> Self {
        Self {
            node_id,
            command: command.into(),
            payload: payload.into(),
        }
    }
    
    /// Create a frame with payload, checking its size
    pub fn try_with_payload(
        node_id: u8,
        command: impl Into<u8>,
        payload: impl Into<Bytes>,
    ) -> Result<Self> {
        let frame = Self::with_payload(node_id, command, payload);
        if frame.payload.len() > Self::MAX_PAYLOAD_SIZE {
            return Err(Error::PayloadTooLarge {
                size: frame.payload.len(),
                max: Self::MAX_PAYLOAD_SIZE,
            });
        }
        Ok(frame)
    }
    
    /// Value of the length field
    ///
    /// Saturates at `0xFFFF` for payloads beyond [`Frame::MAX_PAYLOAD_SIZE`].
    pub fn length(&self) -> u16 {
        u16::try_from(4 + self.payload.len()).unwrap_or(u16::MAX)
    }
    
    /// Checksum pair over NodeID, Command and payload
    pub fn checksum(&self) -> Checksum {
        let mut region = Vec::with_capacity(2 + self.payload.len());
        region.push(self.node_id);
        region.push(self.command);
        region.extend_from_slice(&self.payload);
        checksum::calculate(&region)
    }
    
    /// Encode frame to bytes
    pub fn encode(&self) -> BytesMut {
        let total_size = Self::HEADER_SIZE + 2 + self.payload.len() + Self::TRAILER_SIZE;
        let mut buf = BytesMut::with_capacity(total_size);
        
        buf.put_slice(&EXTENDED_HEADER);
        // High byte first
        buf.put_u16(self.length());
        buf.put_u8(self.node_id);
        buf.put_u8(self.command);
        buf.put_slice(&self.payload);
        
        let checksum = checksum::calculate(&buf[Self::HEADER_SIZE..]);
        buf.put_u8(checksum.xor);
        buf.put_u8(checksum.sum);
        
        buf
    }
    
    /// Get total encoded size
    pub fn size(&self) -> usize {
        Self::HEADER_SIZE + 2 + self.payload.len() + Self::TRAILER_SIZE
    }
}

impl fmt::Debug for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let checksum = self.checksum();
        f.debug_struct("Frame")
            .field("node_id", &format!("0x{:02X}", self.node_id))
            .field("command", &format!("0x{:02X}", self.command))
            .field("length", &self.length())
            .field("xor", &format!("0x{:02X}", checksum.xor))
            .field("sum", &format!("0x{:02X}", checksum.sum))
            .field("payload", &format!("{:02X?}", &self.payload[..]))
            .finish()
    }
}

impl fmt::Display for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Frame[0x{:02X}](node={}, len={})",
            self.command,
            self.node_id,
            self.payload.len()
        )
    }
}

/// Validated inbound frame
///
/// Only constructed by [`Response::decode`], so every accessor reads from a
/// buffer whose checksums have been confirmed.
#[derive(Clone, PartialEq, Eq)]
pub struct Response {
    kind: FrameKind,
    code: u8,
    raw: Bytes,
}

impl Response {
    /// Validate a received buffer
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Buffer is shorter than the minimum for its kind
    /// - XOR or SUM verification fails
    /// - The Extended length field disagrees with the buffer size
    ///
    /// # Examples
    ///
    /// ```
    /// use bytes::BytesMut;
    /// use soyal_core::{FrameKind, Response};
    ///
    /// let buf = BytesMut::from(&[0xFF, 0x00, 0x5A, 0xA5, 0x00, 0x04, 0x01, 0x18, 0xE6, 0xFF][..]);
    /// let response = Response::decode(buf).unwrap();
    ///
    /// assert_eq!(response.kind(), FrameKind::Extended);
    /// assert_eq!(response.code(), 0x18);
    /// ```
    pub fn decode(buf: BytesMut) -> Result<Self> {
        let kind = FrameKind::detect(&buf);
        
        if buf.len() < kind.min_len() {
            return Err(Error::FrameTooShort {
                kind,
                expected: kind.min_len(),
                actual: buf.len(),
            });
        }
        
        let xor_at = buf.len() - Frame::TRAILER_SIZE;
        let received_xor = buf[xor_at];
        let received_sum = buf[xor_at + 1];
        
        let region = &buf[kind.checked_start()..xor_at];
        if !checksum::verify(region, received_xor, received_sum) {
            let expected = checksum::calculate(region);
            return Err(Error::ChecksumMismatch {
                expected_xor: expected.xor,
                expected_sum: expected.sum,
                received_xor,
                received_sum,
            });
        }
        
        if kind == FrameKind::Extended {
            let declared = BigEndian::read_u16(&buf[4..6]);
            let actual = buf.len() - Frame::HEADER_SIZE;
            if usize::from(declared) != actual {
                return Err(Error::LengthMismatch { declared, actual });
            }
        }
        
        let code = buf[kind.code_offset()];
        
        Ok(Self {
            kind,
            code,
            raw: buf.freeze(),
        })
    }
    
    pub fn kind(&self) -> FrameKind {
        self.kind
    }
    
    /// Raw response/function code
    pub fn code(&self) -> u8 {
        self.code
    }
    
    pub fn response_code(&self) -> ResponseCode {
        ResponseCode::from(self.code)
    }
    
    /// Function code of the response; same byte as [`Response::code`]
    pub fn function_code(&self) -> u8 {
        self.code
    }
    
    /// Node ID of the answering terminal
    pub fn node_id(&self) -> u8 {
        self.raw[self.kind.checked_start()]
    }
    
    /// Check bytes carried by the frame
    pub fn checksum(&self) -> Checksum {
        let xor_at = self.raw.len() - Frame::TRAILER_SIZE;
        Checksum {
            xor: self.raw[xor_at],
            sum: self.raw[xor_at + 1],
        }
    }
    
    /// Data bytes between the response code and the XOR byte
    pub fn payload(&self) -> &[u8] {
        let end = self.raw.len() - Frame::TRAILER_SIZE;
        let start = (self.kind.code_offset() + 1).min(end);
        &self.raw[start..end]
    }
    
    /// Byte at an absolute 0-indexed offset
    pub fn byte(&self, offset: usize) -> Result<u8> {
        self.raw.get(offset).copied().ok_or(Error::FieldOutOfBounds {
            offset,
            len: self.raw.len(),
        })
    }
    
    /// Byte at a payload-relative offset
    pub fn payload_byte(&self, offset: usize) -> Result<u8> {
        let payload = self.payload();
        payload.get(offset).copied().ok_or(Error::FieldOutOfBounds {
            offset,
            len: payload.len(),
        })
    }
    
    /// Two consecutive payload bytes as `(high, low)`
    pub fn payload_pair(&self, offset: usize) -> Result<(u8, u8)> {
        Ok((self.payload_byte(offset)?, self.payload_byte(offset + 1)?))
    }
    
    /// Complete received buffer
    pub fn as_bytes(&self) -> &[u8] {
        &self.raw
    }
    
    pub fn len(&self) -> usize {
        self.raw.len()
    }
    
    pub fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }
}

impl fmt::Debug for Response {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Response")
            .field("kind", &self.kind)
            .field("code", &format!("0x{:02X}", self.code))
            .field("checksum", &self.checksum())
            .field("payload", &format!("{:02X?}", self.payload()))
            .finish()
    }
}

impl fmt::Display for Response {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Response[{}](code=0x{:02X}, len={})",
            self.kind,
            self.code,
            self.payload().len()
        )
    }
}

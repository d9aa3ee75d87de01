//! AR-727 command catalog and response codes

use std::fmt;

use crate::error::{Error, Result};

/// Protocol command codes
///
/// The subset of the Extended protocol used by the AR-727 client.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Command {
    GetStatus = 0x18,
    SetTime = 0x23,
    GetTime = 0x24,
    GetOldestLog = 0x25,
    DeleteOldestLog = 0x37,
    SetCard = 0x84,
    ResetCards = 0x85,
    GetCard = 0x87,
    Reboot = 0xA6,
}

impl Command {
    /// Check if a NACK answer to this command fails the operation
    ///
    /// Card reads, log reads and reboot hand back whatever the device sent;
    /// an ACK to a log read means the log is empty.
    pub fn fails_on_nack(self) -> bool {
        matches!(
            self,
            Self::GetStatus
                | Self::GetTime
                | Self::SetCard
                | Self::ResetCards
                | Self::SetTime
                | Self::DeleteOldestLog
        )
    }
    
    /// Get command name
    pub fn name(self) -> &'static str {
        match self {
            Self::GetStatus => "CMD_GET_STATUS",
            Self::SetTime => "CMD_SET_TIME",
            Self::GetTime => "CMD_GET_TIME",
            Self::GetOldestLog => "CMD_GET_OLDEST_LOG",
            Self::DeleteOldestLog => "CMD_DELETE_OLDEST_LOG",
            Self::SetCard => "CMD_SET_CARD",
            Self::ResetCards => "CMD_RESET_CARDS",
            Self::GetCard => "CMD_GET_CARD",
            Self::Reboot => "CMD_REBOOT",
        }
    }
    
    /// Phrase describing the attempted action, used in rejection errors
    pub fn action(self) -> &'static str {
        match self {
            Self::GetStatus => "getting device status",
            Self::SetTime => "setting device time",
            Self::GetTime => "getting device time",
            Self::GetOldestLog => "reading event log",
            Self::DeleteOldestLog => "deleting event log",
            Self::SetCard => "setting card",
            Self::ResetCards => "resetting cards",
            Self::GetCard => "getting card",
            Self::Reboot => "rebooting device",
        }
    }
}

impl From<Command> for u8 {
    fn from(cmd: Command) -> u8 {
        cmd as u8
    }
}

impl TryFrom<u8> for Command {
    type Error = Error;
    
    fn try_from(value: u8) -> Result<Self> {
        match value {
            0x18 => Ok(Self::GetStatus),
            0x23 => Ok(Self::SetTime),
            0x24 => Ok(Self::GetTime),
            0x25 => Ok(Self::GetOldestLog),
            0x37 => Ok(Self::DeleteOldestLog),
            0x84 => Ok(Self::SetCard),
            0x85 => Ok(Self::ResetCards),
            0x87 => Ok(Self::GetCard),
            0xA6 => Ok(Self::Reboot),
            _ => Err(Error::UnknownCommand(value)),
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(0x{:02X})", self.name(), *self as u8)
    }
}

/// Response/function code of a validated frame
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum ResponseCode {
    /// Accepted, no data follows
    Ack,
    
    /// Device rejected the request
    Nack,
    
    /// Echoed function byte (or any other code)
    Code(u8),
}

impl ResponseCode {
    pub const ACK: u8 = 4;
    pub const NACK: u8 = 5;
    
    pub fn is_ack(self) -> bool {
        matches!(self, Self::Ack)
    }
    
    pub fn is_nack(self) -> bool {
        matches!(self, Self::Nack)
    }
}

impl From<u8> for ResponseCode {
    fn from(value: u8) -> Self {
        match value {
            Self::ACK => Self::Ack,
            Self::NACK => Self::Nack,
            other => Self::Code(other),
        }
    }
}

impl From<ResponseCode> for u8 {
    fn from(code: ResponseCode) -> u8 {
        match code {
            ResponseCode::Ack => ResponseCode::ACK,
            ResponseCode::Nack => ResponseCode::NACK,
            ResponseCode::Code(value) => value,
        }
    }
}

//! High-level error types

use soyal_core::Command;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Core protocol error: {0}")]
    Core(#[from] soyal_core::Error),
    
    #[error("Transport error: {0}")]
    Transport(#[from] soyal_transport::Error),
    
    #[error("Type error: {0}")]
    Types(#[from] soyal_types::Error),
    
    #[error("Device not connected")]
    NotConnected,
}

impl Error {
    /// Command the device answered with NACK, if that is what happened
    pub fn rejected_command(&self) -> Option<Command> {
        match self {
            Self::Core(soyal_core::Error::DeviceRejected { command }) => Some(*command),
            _ => None,
        }
    }
    
    /// Check if the received frame failed checksum validation
    pub fn is_checksum_mismatch(&self) -> bool {
        matches!(self, Self::Core(soyal_core::Error::ChecksumMismatch { .. }))
    }
}

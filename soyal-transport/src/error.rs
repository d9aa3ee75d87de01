//! Transport errors
//!
//! Any of these fails the in-flight exchange; nothing here is retried.

use std::io;
use std::time::Duration;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Not connected")]
    NotConnected,
    
    #[error("Already connected")]
    AlreadyConnected,
    
    #[error("Connection to {addr} timed out after {after:?}")]
    ConnectionTimeout {
        addr: String,
        after: Duration,
    },
    
    /// No frame arrived within the read timeout
    #[error("Read timed out after {0:?}")]
    ReadTimeout(Duration),
    
    #[error("Connection closed by remote")]
    ConnectionClosed,
    
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    
    #[error("Invalid address: {0}")]
    InvalidAddress(String),
}

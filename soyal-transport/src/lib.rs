//! Transport layer for the Soyal protocol
//!
//! Provides the byte stream a device session talks over. The transport owns
//! connect and read timeouts; the codec above it never waits on its own.

pub mod error;
pub mod tcp;

pub use error::{Error, Result};
pub use tcp::TcpTransport;

use std::time::Duration;

use async_trait::async_trait;
use bytes::BytesMut;

/// Transport trait for different communication methods
#[async_trait]
pub trait Transport: Send + Sync {
    /// Connect to device
    async fn connect(&mut self) -> Result<()>;
    
    /// Disconnect from device
    async fn disconnect(&mut self) -> Result<()>;
    
    /// Check if connected
    fn is_connected(&self) -> bool;
    
    /// Send raw bytes
    async fn send(&mut self, data: &[u8]) -> Result<()>;
    
    /// Receive one read's worth of bytes, bounded by the read timeout
    async fn receive(&mut self) -> Result<BytesMut>;
    
    /// Set connect and read timeout
    fn set_timeout(&mut self, timeout: Duration);
    
    /// Get remote address
    fn remote_addr(&self) -> String;
}

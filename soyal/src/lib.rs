//! # soyal
//!
//! Rust client for Soyal AR-727 access control terminals over TCP.
//!
//! ## Features
//!
//! - Bit-exact Extended frame codec with XOR/SUM validation
//! - Async/await API using Tokio
//! - Typed card and event log records
//! - Distinct errors for transport failures, corrupted frames and
//!   device rejections
//!
//! ## Quick Start
//!
//! ```no_run
//! use soyal::Device;
//!
//! #[tokio::main]
//! async fn main() -> soyal::Result<()> {
//!     // Connect to device
//!     let mut device = Device::new("192.168.1.127", 1621);
//!     device.connect().await?;
//!     
//!     // Drain the event log
//!     while let Some(log) = device.get_oldest_log().await? {
//!         println!("{}", log);
//!         device.delete_oldest_log().await?;
//!     }
//!     
//!     // Disconnect
//!     device.disconnect().await?;
//!     
//!     Ok(())
//! }
//! ```

pub mod device;
pub mod error;

// Re-exports
pub use device::Device;
pub use error::{Error, Result};

// Re-export protocol and record types
pub use soyal_core::{fields, Command, Frame, FrameKind, Response, ResponseCode};
pub use soyal_transport::{TcpTransport, Transport};
pub use soyal_types::{CardAddress, CardMode, CardRecord, LogRecord};

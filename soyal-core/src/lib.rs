//! # soyal-core
//!
//! Core protocol implementation for Soyal access control terminals.
//!
//! This crate provides the low-level protocol primitives:
//! - Extended frame structure and encoding/decoding
//! - XOR/SUM checksum calculation
//! - Command definitions and response codes
//! - Field decoding for card, clock and event log responses

pub mod checksum;
pub mod command;
pub mod constants;
pub mod error;
pub mod fields;
pub mod frame;

pub use checksum::Checksum;
pub use command::{Command, ResponseCode};
pub use error::{Error, Result};
pub use frame::{Frame, FrameKind, Response};

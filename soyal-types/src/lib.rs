//! Type definitions for soyal

pub mod card;
pub mod error;
pub mod log;

pub use card::{CardAddress, CardMode, CardRecord};
pub use error::{Error, Result};
pub use log::LogRecord;

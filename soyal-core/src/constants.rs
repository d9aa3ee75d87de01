//! Protocol constants

use std::time::Duration;

/// Fixed header of every Extended frame
pub const EXTENDED_HEADER: [u8; 4] = [0xFF, 0x00, 0x5A, 0xA5];

/// Default TCP port of the terminal's network module
pub const DEFAULT_PORT: u16 = 1621;

/// Default node id on the RS-485 line behind the network module
pub const DEFAULT_NODE_ID: u8 = 0x01;

/// Default connection and read timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Dates on the wire are offsets from this year
pub const BASE_YEAR: i32 = 2000;

/// Sub-code carried by the reboot command
pub const REBOOT_SUBCODE: u8 = 0xFD;

/// Card-write defaults
pub mod card {
    /// Number of records carried by one set-card request
    pub const RECORD_COUNT: u8 = 1;

    /// Access zone
    pub const ZONE: u8 = 0;

    /// Both group bytes: member of every group
    pub const GROUP: u8 = 0xFF;

    /// Expiry written with new cards (2099-12-31)
    pub const EXPIRY: [u8; 3] = [99, 12, 31];

    /// Access level
    pub const LEVEL: u8 = 0;

    /// UID written by disable-card
    pub const BLANK_UID: u16 = 0xFFFF;
}


//! Event log records

use std::fmt;

use chrono::NaiveDateTime;

/// One entry of the terminal's event log
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogRecord {
    /// When the event happened (terminal local time)
    pub time: NaiveDateTime,

    /// Function code of the response that carried the entry
    pub function_code: u8,

    /// User address, rendered like a UID
    pub address: String,

    pub uid1: String,
    pub uid2: String,

    /// Door number
    pub door: u8,

    /// Reader function key category (F1 = 1 .. F4 = 4)
    pub log_type: u8,
}

impl fmt::Display for LogRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Log[{}](func=0x{:02X}, addr={}, uid={}:{}, door={}, F{})",
            self.time, self.function_code, self.address, self.uid1, self.uid2, self.door, self.log_type
        )
    }
}

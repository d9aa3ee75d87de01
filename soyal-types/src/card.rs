//! Card records stored in the terminal's user table

use std::fmt;

use chrono::NaiveDate;

use crate::error::{Error, Result};

/// Slot in the terminal's card table
///
/// AR-727 terminals hold 16384 user records, addressed `0..=16383`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CardAddress(u16);

impl CardAddress {
    /// Highest addressable slot
    pub const MAX: u16 = 16383;

    /// Create a validated card address
    ///
    /// # Examples
    ///
    /// ```
    /// use soyal_types::CardAddress;
    ///
    /// assert!(CardAddress::new(16383).is_ok());
    /// assert!(CardAddress::new(16384).is_err());
    /// ```
    pub fn new(address: u16) -> Result<Self> {
        if address > Self::MAX {
            return Err(Error::AddressOutOfRange {
                address,
                max: Self::MAX,
            });
        }
        Ok(Self(address))
    }

    pub fn get(self) -> u16 {
        self.0
    }

    /// Address as `[high, low]`, the order the terminal expects on the wire
    pub fn to_be_bytes(self) -> [u8; 2] {
        self.0.to_be_bytes()
    }
}

impl TryFrom<u16> for CardAddress {
    type Error = Error;

    fn try_from(value: u16) -> Result<Self> {
        Self::new(value)
    }
}

impl From<CardAddress> for u16 {
    fn from(address: CardAddress) -> u16 {
        address.0
    }
}

impl fmt::Display for CardAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:05}", self.0)
    }
}

/// Status byte written by the set-card command
///
/// Firmware revisions disagree on the "enabled" pattern: older units use
/// `0b0100_0000` while current ones use `0b0101_1000`. Disabled is always 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CardMode(u8);

impl CardMode {
    /// Enabled pattern of older firmware (64)
    pub const ENABLED_V1: Self = Self(64);

    /// Enabled pattern of current firmware (88)
    pub const ENABLED_V2: Self = Self(88);

    /// Disabled card
    pub const DISABLED: Self = Self(0);

    pub const fn from_raw(raw: u8) -> Self {
        Self(raw)
    }

    pub const fn raw(self) -> u8 {
        self.0
    }

    /// The terminal treats any non-zero status as enabled
    pub const fn is_enabled(self) -> bool {
        self.0 > 0
    }
}

impl Default for CardMode {
    fn default() -> Self {
        Self::ENABLED_V2
    }
}

/// Card stored at one address
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardRecord {
    pub address: CardAddress,

    /// First UID, five decimal digits
    pub uid1: String,

    /// Second UID, five decimal digits
    pub uid2: String,

    pub enabled: bool,

    /// Expiry date, `None` when the stored date is not a calendar date
    pub expires: Option<NaiveDate>,
}

impl fmt::Display for CardRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Card[{}](uid={}:{}, {}",
            self.address,
            self.uid1,
            self.uid2,
            if self.enabled { "enabled" } else { "disabled" }
        )?;
        match self.expires {
            Some(date) => write!(f, ", expires {})", date),
            None => write!(f, ")"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_address_bounds() {
        assert_eq!(CardAddress::new(0).unwrap().get(), 0);
        assert_eq!(CardAddress::new(16383).unwrap().get(), 16383);
        assert!(matches!(
            CardAddress::new(16384),
            Err(Error::AddressOutOfRange { address: 16384, max: 16383 })
        ));
        assert!(CardAddress::try_from(u16::MAX).is_err());
    }

    #[test]
    fn test_address_bytes_high_first() {
        let address = CardAddress::new(0x0123).unwrap();
        assert_eq!(address.to_be_bytes(), [0x01, 0x23]);
    }

    #[test]
    fn test_card_mode() {
        assert_eq!(CardMode::default().raw(), 88);
        assert_eq!(CardMode::ENABLED_V1.raw(), 64);
        assert!(CardMode::from_raw(1).is_enabled());
        assert!(!CardMode::DISABLED.is_enabled());
    }

    #[test]
    fn test_card_display() {
        let card = CardRecord {
            address: CardAddress::new(12).unwrap(),
            uid1: "46865".into(),
            uid2: "64318".into(),
            enabled: true,
            expires: NaiveDate::from_ymd_opt(2099, 12, 31),
        };
        assert_eq!(
            card.to_string(),
            "Card[00012](uid=46865:64318, enabled, expires 2099-12-31)"
        );
    }
}

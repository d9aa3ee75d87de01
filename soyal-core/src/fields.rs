//! Typed field decoding for validated responses, and payload layouts for
//! outbound commands
//!
//! Offsets below are payload-relative: byte 0 is the first byte after the
//! response code, which is the protocol manual's 1-indexed position minus 9.
//! The record layouts are only defined for Extended frames; decoding a
//! record from a Standard frame fails with [`Error::UnsupportedFrameKind`].

use bytes::{BufMut, Bytes, BytesMut};
use chrono::{Datelike, NaiveDate, NaiveDateTime, Timelike};
use soyal_types::{CardAddress, CardMode, CardRecord, LogRecord};
use tracing::debug;

use crate::{
    constants::{card, BASE_YEAR},
    error::{Error, Result},
    frame::{FrameKind, Response},
};

/// Card record layout (response to get-card)
pub mod card_offsets {
    pub const UID1: usize = 5;
    pub const UID2: usize = 7;
    pub const STATUS: usize = 13;
    pub const EXPIRY_YEAR: usize = 17;
    pub const EXPIRY_MONTH: usize = 18;
    pub const EXPIRY_DAY: usize = 19;
}

/// Clock layout shared by get-time and log responses
pub mod clock_offsets {
    pub const SECOND: usize = 1;
    pub const MINUTE: usize = 2;
    pub const HOUR: usize = 3;
    pub const WEEKDAY: usize = 4;
    pub const DAY: usize = 5;
    pub const MONTH: usize = 6;
    pub const YEAR: usize = 7;
}

/// Event log layout (response to get-oldest-log)
pub mod log_offsets {
    pub const ADDRESS: usize = 9;
    pub const TYPE: usize = 11;
    pub const UID1: usize = 15;
    pub const DOOR: usize = 17;
    pub const UID2: usize = 19;
}

/// Render a UID byte pair as five decimal digits
///
/// The bytes are written out as a 4-digit hex string which is then read
/// back in base 16.
///
/// # Examples
///
/// ```
/// use soyal_core::fields::parse_uid;
///
/// assert_eq!(parse_uid(0xB7, 0x11), "46865");
/// assert_eq!(parse_uid(0x00, 0x2A), "00042");
/// ```
pub fn parse_uid(high: u8, low: u8) -> String {
    let digits = hex::encode([high, low]);
    // hex::encode only yields hex digits
    let value = u32::from_str_radix(&digits, 16).unwrap_or_default();
    format!("{:05}", value)
}

/// Card status byte: any non-zero value means enabled
pub fn card_enabled(status: u8) -> bool {
    status > 0
}

/// Reader function key category of a log entry
///
/// Raw thresholds 0, 32, 64, 96 map to F1..F4.
pub fn log_type(raw: u8) -> u8 {
    if raw > 0 { raw / 32 + 1 } else { 1 }
}

fn year_from_offset(offset: u8) -> i32 {
    BASE_YEAR + i32::from(offset % 100)
}

/// Expiry date from year/month/day offsets; `None` if not a calendar date
pub fn expiry_date(year: u8, month: u8, day: u8) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(
        year_from_offset(year),
        u32::from(month % 100),
        u32::from(day % 100),
    )
}

/// Timestamp from the terminal's clock fields
///
/// # Errors
///
/// [`Error::MalformedDate`] if the components do not form a valid timestamp.
pub fn clock(year: u8, month: u8, day: u8, hour: u8, minute: u8, second: u8) -> Result<NaiveDateTime> {
    let (year, month, day) = (year_from_offset(year), month % 100, day % 100);
    let (hour, minute, second) = (hour % 100, minute % 100, second % 100);
    
    NaiveDate::from_ymd_opt(year, u32::from(month), u32::from(day))
        .and_then(|date| date.and_hms_opt(u32::from(hour), u32::from(minute), u32::from(second)))
        .ok_or_else(|| {
            Error::MalformedDate(format!(
                "{:04}-{:02}-{:02} {:02}:{:02}:{:02}",
                year, month, day, hour, minute, second
            ))
        })
}

fn ensure_extended(response: &Response) -> Result<()> {
    match response.kind() {
        FrameKind::Extended => Ok(()),
        kind => Err(Error::UnsupportedFrameKind(kind)),
    }
}

/// Read the clock block of a get-time or log response
pub fn decode_clock(response: &Response) -> Result<NaiveDateTime> {
    use clock_offsets::*;
    
    ensure_extended(response)?;
    
    clock(
        response.payload_byte(YEAR)?,
        response.payload_byte(MONTH)?,
        response.payload_byte(DAY)?,
        response.payload_byte(HOUR)?,
        response.payload_byte(MINUTE)?,
        response.payload_byte(SECOND)?,
    )
}

/// Decode a get-card response
///
/// An expiry that is not a calendar date degrades to `None`.
pub fn decode_card(address: CardAddress, response: &Response) -> Result<CardRecord> {
    use card_offsets::*;
    
    ensure_extended(response)?;
    
    let (hi, lo) = response.payload_pair(UID1)?;
    let uid1 = parse_uid(hi, lo);
    let (hi, lo) = response.payload_pair(UID2)?;
    let uid2 = parse_uid(hi, lo);
    
    let enabled = card_enabled(response.payload_byte(STATUS)?);
    
    let (year, month, day) = (
        response.payload_byte(EXPIRY_YEAR)?,
        response.payload_byte(EXPIRY_MONTH)?,
        response.payload_byte(EXPIRY_DAY)?,
    );
    let expires = expiry_date(year, month, day);
    if expires.is_none() {
        debug!(%address, year, month, day, "Card expiry is not a calendar date");
    }
    
    Ok(CardRecord {
        address,
        uid1,
        uid2,
        enabled,
        expires,
    })
}

/// Decode a get-oldest-log response; ACK means the log is empty
pub fn decode_log(response: &Response) -> Result<Option<LogRecord>> {
    use log_offsets::*;
    
    if response.response_code().is_ack() {
        return Ok(None);
    }
    
    ensure_extended(response)?;
    
    let time = decode_clock(response)?;
    
    let (hi, lo) = response.payload_pair(ADDRESS)?;
    let address = parse_uid(hi, lo);
    let (hi, lo) = response.payload_pair(UID1)?;
    let uid1 = parse_uid(hi, lo);
    let (hi, lo) = response.payload_pair(UID2)?;
    let uid2 = parse_uid(hi, lo);
    
    Ok(Some(LogRecord {
        time,
        function_code: response.function_code(),
        address,
        uid1,
        uid2,
        door: response.payload_byte(DOOR)?,
        log_type: log_type(response.payload_byte(TYPE)?),
    }))
}

/// Payload of get-card: `[address_hi, address_lo, 0x01]`
pub fn card_query_payload(address: CardAddress) -> Bytes {
    let mut buf = BytesMut::with_capacity(3);
    buf.put_slice(&address.to_be_bytes());
    buf.put_u8(card::RECORD_COUNT);
    buf.freeze()
}

/// Payload of set-card: one 27-byte record
///
/// ```text
/// count | addr(2) | 0 x4 | uid1(2) | uid2(2) | pin 0 x4 | mode | zone |
/// group1 | group2 | yy mm dd | level | 0 x4
/// ```
pub fn card_write_payload(address: CardAddress, uid1: u16, uid2: u16, mode: CardMode) -> Bytes {
    let mut buf = BytesMut::with_capacity(27);
    buf.put_u8(card::RECORD_COUNT);
    buf.put_slice(&address.to_be_bytes());
    buf.put_bytes(0, 4);
    buf.put_u16(uid1);
    buf.put_u16(uid2);
    buf.put_bytes(0, 4);
    buf.put_u8(mode.raw());
    buf.put_u8(card::ZONE);
    buf.put_u8(card::GROUP);
    buf.put_u8(card::GROUP);
    buf.put_slice(&card::EXPIRY);
    buf.put_u8(card::LEVEL);
    buf.put_bytes(0, 4);
    buf.freeze()
}

/// Payload of reset-cards: `[start_hi, start_lo, end_hi, end_lo]`
///
/// `end` is a raw slot number; one past [`CardAddress::MAX`] is valid.
pub fn card_reset_payload(start: CardAddress, end: u16) -> Bytes {
    let mut buf = BytesMut::with_capacity(4);
    buf.put_slice(&start.to_be_bytes());
    buf.put_u16(end);
    buf.freeze()
}

/// Payload of set-time
///
/// `[second, minute, hour, weekday, day, month, year % 100]` with
/// weekday 1 = Sunday .. 7 = Saturday.
pub fn clock_payload(time: NaiveDateTime) -> Bytes {
    let mut buf = BytesMut::with_capacity(7);
    buf.put_u8(time.second() as u8);
    buf.put_u8(time.minute() as u8);
    buf.put_u8(time.hour() as u8);
    buf.put_u8(time.weekday().num_days_from_sunday() as u8 + 1);
    buf.put_u8(time.day() as u8);
    buf.put_u8(time.month() as u8);
    buf.put_u8(time.year().rem_euclid(100) as u8);
    buf.freeze()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{command::{Command, ResponseCode}, frame::Frame};
    use bytes::BytesMut;
    use pretty_assertions::assert_eq;
    
    fn response(code: u8, payload: Vec<u8>) -> Response {
        Response::decode(Frame::with_payload(0x01, code, payload).encode()).unwrap()
    }
    
    fn card_payload(uid1: [u8; 2], uid2: [u8; 2], status: u8, expiry: [u8; 3]) -> Vec<u8> {
        let mut payload = vec![0u8; 24];
        payload[5..7].copy_from_slice(&uid1);
        payload[7..9].copy_from_slice(&uid2);
        payload[13] = status;
        payload[17..20].copy_from_slice(&expiry);
        payload
    }
    
    fn log_payload(clock: [u8; 7], address: [u8; 2], raw_type: u8, uid1: [u8; 2], door: u8, uid2: [u8; 2]) -> Vec<u8> {
        let mut payload = vec![0u8; 24];
        payload[1..8].copy_from_slice(&clock);
        payload[9..11].copy_from_slice(&address);
        payload[11] = raw_type;
        payload[15..17].copy_from_slice(&uid1);
        payload[17] = door;
        payload[19..21].copy_from_slice(&uid2);
        payload
    }
    
    #[test]
    fn test_parse_uid() {
        assert_eq!(parse_uid(0xB7, 0x11), "46865");
        assert_eq!(parse_uid(0xFB, 0x3E), "64318");
        assert_eq!(parse_uid(0x00, 0x01), "00001");
        assert_eq!(parse_uid(0xFF, 0xFF), "65535");
    }
    
    #[test]
    fn test_log_type() {
        assert_eq!(log_type(0), 1);
        assert_eq!(log_type(31), 1);
        assert_eq!(log_type(32), 2);
        assert_eq!(log_type(64), 3);
        assert_eq!(log_type(96), 4);
    }
    
    #[test]
    fn test_card_enabled() {
        assert!(card_enabled(88));
        assert!(card_enabled(64));
        assert!(!card_enabled(0));
    }
    
    #[test]
    fn test_expiry_date() {
        assert_eq!(expiry_date(99, 12, 31), NaiveDate::from_ymd_opt(2099, 12, 31));
        assert_eq!(expiry_date(124, 2, 29), NaiveDate::from_ymd_opt(2024, 2, 29));
        assert_eq!(expiry_date(25, 0, 1), None);
        assert_eq!(expiry_date(25, 1, 0), None);
        assert_eq!(expiry_date(25, 13, 1), None);
        assert_eq!(expiry_date(25, 2, 30), None);
    }
    
    #[test]
    fn test_clock_malformed() {
        assert!(matches!(clock(25, 13, 1, 0, 0, 0), Err(Error::MalformedDate(_))));
        assert!(matches!(clock(25, 1, 1, 24, 0, 0), Err(Error::MalformedDate(_))));
    }
    
    #[test]
    fn test_decode_card() {
        let resp = response(0x03, card_payload([0xB7, 0x11], [0xFB, 0x3E], 88, [99, 12, 31]));
        let address = CardAddress::new(12).unwrap();
        let card = decode_card(address, &resp).unwrap();
        
        assert_eq!(card, CardRecord {
            address,
            uid1: "46865".into(),
            uid2: "64318".into(),
            enabled: true,
            expires: NaiveDate::from_ymd_opt(2099, 12, 31),
        });
    }
    
    #[test]
    fn test_decode_card_invalid_expiry_is_absent() {
        let address = CardAddress::new(1).unwrap();
        
        for expiry in [[25, 0, 10], [25, 6, 0], [25, 13, 10]] {
            let resp = response(0x03, card_payload([0, 1], [0, 2], 0, expiry));
            let card = decode_card(address, &resp).unwrap();
            
            assert!(!card.enabled);
            assert_eq!(card.expires, None);
        }
    }
    
    #[test]
    fn test_decode_card_truncated() {
        let resp = response(ResponseCode::NACK, vec![]);
        let result = decode_card(CardAddress::new(1).unwrap(), &resp);
        
        assert!(matches!(result, Err(Error::FieldOutOfBounds { .. })));
    }
    
    #[test]
    fn test_decode_clock() {
        // 2024-03-15 13:45:30, Friday (weekday 6)
        let resp = response(Command::GetTime.into(), vec![0x00, 30, 45, 13, 6, 15, 3, 24]);
        let time = decode_clock(&resp).unwrap();
        
        assert_eq!(time.to_string(), "2024-03-15 13:45:30");
    }
    
    #[test]
    fn test_decode_log() {
        let clock = [10, 20, 8, 2, 1, 7, 25];
        let resp = response(0x0B, log_payload(clock, [0x00, 0x0C], 64, [0xB7, 0x11], 2, [0xFB, 0x3E]));
        let log = decode_log(&resp).unwrap().unwrap();
        
        assert_eq!(log.time.to_string(), "2025-07-01 08:20:10");
        assert_eq!(log.function_code, 0x0B);
        assert_eq!(log.address, "00012");
        assert_eq!(log.uid1, "46865");
        assert_eq!(log.uid2, "64318");
        assert_eq!(log.door, 2);
        assert_eq!(log.log_type, 3);
    }
    
    #[test]
    fn test_decode_log_ack_is_empty() {
        let resp = response(ResponseCode::ACK, vec![]);
        assert_eq!(decode_log(&resp).unwrap(), None);
    }
    
    #[test]
    fn test_decode_log_malformed_time() {
        let clock = [0, 0, 0, 1, 0, 0, 25];
        let resp = response(0x0B, log_payload(clock, [0, 1], 0, [0, 1], 1, [0, 1]));
        
        assert!(matches!(decode_log(&resp), Err(Error::MalformedDate(_))));
    }
    
    #[test]
    fn test_card_query_payload() {
        let payload = card_query_payload(CardAddress::new(0x0123).unwrap());
        assert_eq!(&payload[..], &[0x01, 0x23, 0x01]);
    }
    
    #[test]
    fn test_card_write_payload() {
        let payload = card_write_payload(CardAddress::new(12).unwrap(), 0xB711, 0xFB3E, CardMode::ENABLED_V2);
        
        assert_eq!(
            &payload[..],
            &[
                1, 0x00, 0x0C, 0, 0, 0, 0, 0xB7, 0x11, 0xFB, 0x3E, 0, 0, 0, 0,
                88, 0, 0xFF, 0xFF, 99, 12, 31, 0, 0, 0, 0, 0,
            ]
        );
    }
    
    #[test]
    fn test_card_write_payload_disabled() {
        let payload = card_write_payload(CardAddress::new(1).unwrap(), 0xFFFF, 0xFFFF, CardMode::DISABLED);
        assert_eq!(payload[15], 0);
    }
    
    #[test]
    fn test_card_reset_payload() {
        let payload = card_reset_payload(CardAddress::new(10).unwrap(), 300);
        assert_eq!(&payload[..], &[0x00, 0x0A, 0x01, 0x2C]);
        
        let payload = card_reset_payload(CardAddress::new(16383).unwrap(), 16384);
        assert_eq!(&payload[..], &[0x3F, 0xFF, 0x40, 0x00]);
    }
    
    #[test]
    fn test_decoders_reject_standard_frames() {
        // Region [node=0x01, code=0x03, 0x00]: xor 0xFD, sum 0x01
        let resp = Response::decode(BytesMut::from(&[0x7E, 0x05, 0x01, 0x03, 0x00, 0xFD, 0x01][..])).unwrap();
        assert_eq!(resp.kind(), FrameKind::Standard);
        
        assert!(matches!(
            decode_card(CardAddress::new(1).unwrap(), &resp),
            Err(Error::UnsupportedFrameKind(FrameKind::Standard))
        ));
        assert!(matches!(decode_clock(&resp), Err(Error::UnsupportedFrameKind(FrameKind::Standard))));
        assert!(matches!(decode_log(&resp), Err(Error::UnsupportedFrameKind(FrameKind::Standard))));
    }
    
    #[test]
    fn test_decode_log_standard_ack_is_empty() {
        // Region [node=0x01, code=0x04]: xor 0xFA, sum 0xFF
        let resp = Response::decode(BytesMut::from(&[0x7E, 0x04, 0x01, 0x04, 0xFA, 0xFF][..])).unwrap();
        assert_eq!(decode_log(&resp).unwrap(), None);
    }
    
    #[test]
    fn test_clock_payload() {
        // Sunday
        let time = NaiveDate::from_ymd_opt(2024, 3, 17).unwrap().and_hms_opt(9, 5, 1).unwrap();
        assert_eq!(&clock_payload(time)[..], &[1, 5, 9, 1, 17, 3, 24]);
        
        // Saturday
        let time = NaiveDate::from_ymd_opt(2024, 3, 16).unwrap().and_hms_opt(23, 59, 58).unwrap();
        assert_eq!(&clock_payload(time)[..], &[58, 59, 23, 7, 16, 3, 24]);
    }
    
    #[test]
    fn test_clock_payload_round_trips_through_decoder() {
        let time = NaiveDate::from_ymd_opt(2031, 11, 5).unwrap().and_hms_opt(6, 7, 8).unwrap();
        let mut payload = vec![0x00];
        payload.extend_from_slice(&clock_payload(time));
        
        let resp = response(Command::GetTime.into(), payload);
        assert_eq!(decode_clock(&resp).unwrap(), time);
    }
}

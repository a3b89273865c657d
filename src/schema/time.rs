// Six-byte calendar timestamp field, fixed at UTC+8

use crate::error::{DecodeError, Result};
use chrono::{DateTime, FixedOffset, LocalResult, TimeZone};

/// Wire width of a time field
pub const TIME_FIELD_WIDTH: usize = 6;

/// The protocol's fixed UTC+8 offset; no other offset is ever used
pub fn beijing_offset() -> FixedOffset {
    FixedOffset::east_opt(8 * 3600).expect("UTC+8 is a valid fixed offset")
}

/// Decode six bytes as year-offset-from-2000, month, day, hour, minute,
/// second (raw byte values, not BCD) into a UTC+8 timestamp.
///
/// Out-of-range components (month 13, hour 25, ...) fail with
/// `InvalidCalendarValue` rather than wrapping.
pub fn decode_time(bytes: &[u8]) -> Result<DateTime<FixedOffset>> {
    if bytes.len() < TIME_FIELD_WIDTH {
        return Err(DecodeError::InsufficientBuffer {
            needed: TIME_FIELD_WIDTH,
            available: bytes.len(),
        });
    }
    let year = 2000 + i32::from(bytes[0]);
    let (month, day) = (u32::from(bytes[1]), u32::from(bytes[2]));
    let (hour, minute, second) = (
        u32::from(bytes[3]),
        u32::from(bytes[4]),
        u32::from(bytes[5]),
    );
    match beijing_offset().with_ymd_and_hms(year, month, day, hour, minute, second) {
        LocalResult::Single(dt) => Ok(dt),
        _ => Err(DecodeError::InvalidCalendarValue(format!(
            "{:04}-{:02}-{:02} {:02}:{:02}:{:02}",
            year, month, day, hour, minute, second
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    #[test]
    fn test_decode_time() {
        let dt = decode_time(&[0x01, 0x02, 0x03, 0x04, 0x05, 0x06]).unwrap();
        assert_eq!(dt.year(), 2001);
        assert_eq!(dt.month(), 2);
        assert_eq!(dt.day(), 3);
        assert_eq!(dt.hour(), 4);
        assert_eq!(dt.minute(), 5);
        assert_eq!(dt.second(), 6);
        assert_eq!(dt.offset().local_minus_utc(), 8 * 3600);
    }

    #[test]
    fn test_invalid_month_does_not_wrap() {
        let err = decode_time(&[0x01, 0x0D, 0x03, 0x04, 0x05, 0x06]).unwrap_err();
        assert!(matches!(err, DecodeError::InvalidCalendarValue(_)));
    }

    #[test]
    fn test_invalid_hour() {
        assert!(matches!(
            decode_time(&[0x01, 0x02, 0x03, 0x19, 0x05, 0x06]),
            Err(DecodeError::InvalidCalendarValue(_))
        ));
    }

    #[test]
    fn test_short_input() {
        assert_eq!(
            decode_time(&[0x01, 0x02]),
            Err(DecodeError::InsufficientBuffer {
                needed: 6,
                available: 2,
            })
        );
    }
}

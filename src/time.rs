//! UTCTime decoding and conversion to POSIX seconds.
//!
//! Reference: ITU-T X.690, Section 11.8; RFC 5280, Section 4.1.2.5.1

use core::fmt;

use nom::{IResult, Parser, number::complete::u8};

use crate::{Error, Token, UniversalTag, map_nom_error};

#[cfg(feature = "serde")]
use serde::{Serialize, Serializer};

/// Cumulative days before each month in a non-leap year.
const DAYS_BEFORE_MONTH: [i64; 12] = [0, 31, 59, 90, 120, 151, 181, 212, 243, 273, 304, 334];

const SECONDS_PER_DAY: i64 = 86_400;
const SECONDS_PER_YEAR: i64 = 365 * SECONDS_PER_DAY;

/// A validated UTCTime instant.
///
/// The two-digit year is mapped onto 1950-2049 per RFC 5280, so every value
/// of this type names one unambiguous UTC instant.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct UtcTime {
    pub(crate) year: u16,
    pub(crate) month: u8,
    pub(crate) day: u8,
    pub(crate) hour: u8,
    pub(crate) minute: u8,
    pub(crate) second: u8,
}

fn decimal_pair(input: &[u8]) -> IResult<&[u8], u8, Error> {
    let (input, (hi, lo)) = (u8, u8).parse(input)?;
    if !hi.is_ascii_digit() || !lo.is_ascii_digit() {
        return Err(nom::Err::Error(Error::Invalid));
    }
    Ok((input, (hi - b'0') * 10 + (lo - b'0')))
}

const fn is_leap_year(year: u16) -> bool {
    year % 4 == 0 && (year % 100 != 0 || year % 400 == 0)
}

impl UtcTime {
    /// Decode a UTCTime token of the form `YYMMDDHHMM[SS]Z`.
    ///
    /// Seconds default to zero when omitted. Any timezone designator other
    /// than `Z`, and any calendrically impossible date, is rejected.
    pub fn decode(token: &Token<'_>) -> Result<Self, Error> {
        if token.universal() != Some(UniversalTag::UtcTime) {
            return Err(Error::Invalid);
        }

        let (rest, (year, month, day, hour, minute)) = map_nom_error(
            (decimal_pair, decimal_pair, decimal_pair, decimal_pair, decimal_pair)
                .parse(token.data),
        )?;

        let (rest, second) = if rest.first() == Some(&b'Z') {
            (rest, 0)
        } else {
            map_nom_error(decimal_pair(rest))?
        };
        match rest {
            [b'Z'] => {}
            _ => return Err(Error::Invalid),
        }

        let year = if year < 50 { 2000 + u16::from(year) } else { 1900 + u16::from(year) };
        let time = UtcTime { year, month, day, hour, minute, second };
        if !time.is_valid() {
            return Err(Error::Invalid);
        }
        Ok(time)
    }

    fn is_valid(&self) -> bool {
        let days_in_month = match self.month {
            1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
            4 | 6 | 9 | 11 => 30,
            2 if is_leap_year(self.year) => 29,
            2 => 28,
            _ => return false,
        };
        (1..=days_in_month).contains(&self.day)
            && self.hour <= 23
            && self.minute <= 59
            && self.second <= 59
    }

    /// Seconds since 1970-01-01T00:00:00Z.
    ///
    /// Per-year and per-month accumulation with a corrective leap-day term;
    /// exact across the whole 1950-2049 UTCTime window, including the
    /// pre-1970 half (the leap-day division must floor, not truncate).
    pub fn unix_seconds(&self) -> i64 {
        let year = i64::from(self.year);
        let mut leap_days = (year - 1968).div_euclid(4) - (year - 1900).div_euclid(100)
            + (year - 1600).div_euclid(400);
        if is_leap_year(self.year) && self.month <= 2 {
            // The year's own leap day has not happened yet.
            leap_days -= 1;
        }

        (year - 1970) * SECONDS_PER_YEAR
            + (DAYS_BEFORE_MONTH[usize::from(self.month) - 1] + leap_days) * SECONDS_PER_DAY
            + i64::from(self.day - 1) * SECONDS_PER_DAY
            + i64::from(self.hour) * 3_600
            + i64::from(self.minute) * 60
            + i64::from(self.second)
    }

    /// Convert to a [`chrono::DateTime`] in UTC.
    #[cfg(feature = "chrono-conversions")]
    pub fn to_chrono(&self) -> Option<chrono::DateTime<chrono::Utc>> {
        chrono::DateTime::from_timestamp(self.unix_seconds(), 0)
    }
}

impl fmt::Display for UtcTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:04}-{:02}-{:02}T{:02}:{:02}:{:02}Z",
            self.year, self.month, self.day, self.hour, self.minute, self.second
        )
    }
}

impl fmt::Debug for UtcTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "UtcTime(\"{self}\")")
    }
}

#[cfg(feature = "serde")]
impl Serialize for UtcTime {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Class;

    fn time_token(data: &[u8]) -> Token<'_> {
        Token {
            class: Class::Universal,
            tag: UniversalTag::UtcTime as u32,
            primitive: true,
            data,
            end: data.len(),
        }
    }

    fn decode(text: &str) -> Result<UtcTime, Error> {
        UtcTime::decode(&time_token(text.as_bytes()))
    }

    #[test]
    fn test_decode_with_seconds() {
        let time = decode("991231235959Z").unwrap();
        assert_eq!(time.year, 1999);
        assert_eq!(time.month, 12);
        assert_eq!(time.day, 31);
        assert_eq!(time.unix_seconds(), 946_684_799);
    }

    #[test]
    fn test_decode_without_seconds() {
        let time = decode("9912312359Z").unwrap();
        assert_eq!(time.second, 0);
        assert_eq!(time.unix_seconds(), 946_684_740);
    }

    #[test]
    fn test_end_of_1998() {
        assert_eq!(decode("981231235959Z").unwrap().unix_seconds(), 915_148_799);
    }

    #[test]
    fn test_epoch() {
        assert_eq!(decode("700101000000Z").unwrap().unix_seconds(), 0);
    }

    #[test]
    fn test_century_split() {
        assert_eq!(decode("000101000000Z").unwrap().year, 2000);
        assert_eq!(decode("490101000000Z").unwrap().year, 2049);
        assert_eq!(decode("500101000000Z").unwrap().year, 1950);
        assert_eq!(decode("990101000000Z").unwrap().year, 1999);
    }

    #[test]
    fn test_leap_day_of_2000() {
        // 2000 is divisible by 400, so February 29 exists.
        let time = decode("000229000000Z").unwrap();
        assert_eq!(time.unix_seconds(), 951_782_400);
    }

    #[test]
    fn test_leap_day_of_common_year_rejected() {
        assert_eq!(decode("010229000000Z"), Err(Error::Invalid));
        assert_eq!(decode("990229000000Z"), Err(Error::Invalid));
    }

    #[test]
    fn test_pre_epoch_values() {
        // 1950-2049 window start; negative timestamps must stay exact.
        assert_eq!(decode("500101000000Z").unwrap().unix_seconds(), -631_152_000);
        assert_eq!(decode("690701000000Z").unwrap().unix_seconds(), -15_897_600);
        assert_eq!(decode("520229120000Z").unwrap().unix_seconds(), -562_939_200);
    }

    #[test]
    fn test_window_end() {
        assert_eq!(decode("491231235959Z").unwrap().unix_seconds(), 2_524_607_999);
    }

    #[test]
    fn test_field_range_validation() {
        assert_eq!(decode("990001000000Z"), Err(Error::Invalid)); // month 0
        assert_eq!(decode("991301000000Z"), Err(Error::Invalid)); // month 13
        assert_eq!(decode("990100000000Z"), Err(Error::Invalid)); // day 0
        assert_eq!(decode("990432000000Z"), Err(Error::Invalid)); // April 32
        assert_eq!(decode("990101240000Z"), Err(Error::Invalid)); // hour 24
        assert_eq!(decode("990101006000Z"), Err(Error::Invalid)); // minute 60
        assert_eq!(decode("990101000060Z"), Err(Error::Invalid)); // second 60
    }

    #[test]
    fn test_grammar_violations() {
        assert_eq!(decode("991231235959"), Err(Error::Invalid)); // missing Z
        assert_eq!(decode("991231235959+0100"), Err(Error::Invalid)); // offset
        assert_eq!(decode("9912312359590Z"), Err(Error::Invalid)); // stray digit
        assert_eq!(decode("991231235959ZZ"), Err(Error::Invalid)); // trailing byte
        assert_eq!(decode("99123123595 Z"), Err(Error::Invalid)); // space in field
        assert_eq!(decode(""), Err(Error::Invalid));
        assert_eq!(decode("9912312Z"), Err(Error::Invalid)); // truncated
    }

    #[test]
    fn test_wrong_tag_rejected() {
        let token = Token {
            class: Class::Universal,
            tag: UniversalTag::GeneralizedTime as u32,
            primitive: true,
            data: b"19991231235959Z",
            end: 15,
        };
        assert_eq!(UtcTime::decode(&token), Err(Error::Invalid));
    }

    #[test]
    fn test_display() {
        let time = decode("000229235900Z").unwrap();
        assert_eq!(time.to_string(), "2000-02-29T23:59:00Z");
    }

    #[cfg(feature = "chrono-conversions")]
    #[test]
    fn test_to_chrono() {
        let time = decode("991231235959Z").unwrap();
        let chrono_time = time.to_chrono().unwrap();
        assert_eq!(chrono_time.timestamp(), 946_684_799);
    }
}

//! The `UtcOffset` component.

use alloc::format;

use crate::{DateTimeError, DateTimeResult};

/// A signed, east-positive offset from UTC with second precision.
///
/// Offsets are bounded to ±18:00; when an offset is built from hour,
/// minute, and second parts, all nonzero parts must share a sign.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct UtcOffset {
    total_seconds: i32,
}

impl UtcOffset {
    /// The zero offset.
    pub const ZERO: Self = Self { total_seconds: 0 };

    pub(crate) const MAX_SECONDS: i32 = 18 * 3600;

    /// Creates an offset from a total number of seconds.
    pub fn from_total_seconds(total_seconds: i32) -> DateTimeResult<Self> {
        if total_seconds.abs() > Self::MAX_SECONDS {
            return Err(DateTimeError::illegal_argument()
                .with_message(format!("UtcOffset out of range: {total_seconds}s")));
        }
        Ok(Self { total_seconds })
    }

    /// Creates an offset from hour, minute, and second parts. Nonzero
    /// parts must share a sign.
    pub fn from_parts(hours: i32, minutes: i32, seconds: i32) -> DateTimeResult<Self> {
        let parts = [hours, minutes, seconds];
        let has_positive = parts.iter().any(|part| *part > 0);
        let has_negative = parts.iter().any(|part| *part < 0);
        if has_positive && has_negative {
            return Err(DateTimeError::illegal_argument()
                .with_message("UtcOffset parts must share a sign"));
        }
        if minutes.abs() > 59 || seconds.abs() > 59 {
            return Err(DateTimeError::illegal_argument()
                .with_message("UtcOffset minute and second parts must be within ±59"));
        }
        Self::from_total_seconds(hours * 3600 + minutes * 60 + seconds)
    }

    /// Creates an offset from whole hours.
    pub fn from_hours(hours: i32) -> DateTimeResult<Self> {
        Self::from_parts(hours, 0, 0)
    }

    /// The total number of seconds east of UTC.
    pub fn total_seconds(&self) -> i32 {
        self.total_seconds
    }

    /// The whole-hour part of the offset.
    pub fn whole_hours(&self) -> i32 {
        self.total_seconds / 3600
    }

    /// The minute part of the offset, `-59..=59`.
    pub fn minutes_of_hour(&self) -> i32 {
        self.total_seconds / 60 % 60
    }

    /// The second part of the offset, `-59..=59`.
    pub fn seconds_of_minute(&self) -> i32 {
        self.total_seconds % 60
    }

    /// Parses an offset from its ISO form: `Z`, `z`, `±HH`, `±HHMM`,
    /// `±HH:MM`, `±HHMMSS`, or `±HH:MM:SS`.
    pub fn parse(source: &str) -> DateTimeResult<Self> {
        parse_offset(source, false)
            .ok_or_else(|| invalid_offset(source))
    }

    /// Like [`UtcOffset::parse`] but additionally admits single-digit
    /// hours (`+1`, `-7`), the lenient grammar used for zone ids.
    pub(crate) fn parse_lenient(source: &str) -> DateTimeResult<Self> {
        parse_offset(source, true)
            .ok_or_else(|| invalid_offset(source))
    }
}

fn invalid_offset(source: &str) -> DateTimeError {
    DateTimeError::invalid_format()
        .with_message(format!("Invalid ID for UtcOffset: '{source}'"))
}

fn parse_offset(source: &str, lenient: bool) -> Option<UtcOffset> {
    let bytes = source.as_bytes();
    if bytes == b"Z" || bytes == b"z" {
        return Some(UtcOffset::ZERO);
    }
    let sign = match bytes.first()? {
        b'+' => 1,
        b'-' => -1,
        _ => return None,
    };
    let rest = &bytes[1..];

    let two_digits = |bytes: &[u8]| -> Option<i32> {
        if bytes.len() < 2 || !bytes[0].is_ascii_digit() || !bytes[1].is_ascii_digit() {
            return None;
        }
        Some(i32::from(bytes[0] - b'0') * 10 + i32::from(bytes[1] - b'0'))
    };

    let (hours, mut rest) = if let Some(hours) = two_digits(rest) {
        (hours, &rest[2..])
    } else if lenient && rest.len() == 1 && rest[0].is_ascii_digit() {
        (i32::from(rest[0] - b'0'), &rest[1..])
    } else {
        return None;
    };

    let mut minutes = 0;
    let mut seconds = 0;
    if !rest.is_empty() {
        let separated = rest[0] == b':';
        if separated {
            rest = &rest[1..];
        }
        minutes = two_digits(rest)?;
        rest = &rest[2..];
        if !rest.is_empty() {
            if separated {
                if rest[0] != b':' {
                    return None;
                }
                rest = &rest[1..];
            }
            seconds = two_digits(rest)?;
            rest = &rest[2..];
        }
        if !rest.is_empty() {
            return None;
        }
    }

    if hours > 18 || minutes > 59 || seconds > 59 {
        return None;
    }
    if hours == 18 && (minutes != 0 || seconds != 0) {
        return None;
    }
    Some(UtcOffset {
        total_seconds: sign * (hours * 3600 + minutes * 60 + seconds),
    })
}

impl core::fmt::Display for UtcOffset {
    /// Formats the canonical ISO form: `Z` for zero, otherwise
    /// `±HH:MM` with a second part when nonzero.
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        if self.total_seconds == 0 {
            return f.write_str("Z");
        }
        let sign = if self.total_seconds < 0 { '-' } else { '+' };
        let total = self.total_seconds.abs();
        write!(f, "{sign}{:02}:{:02}", total / 3600, total / 60 % 60)?;
        if total % 60 != 0 {
            write!(f, ":{:02}", total % 60)?;
        }
        Ok(())
    }
}

impl core::str::FromStr for UtcOffset {
    type Err = DateTimeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equivalent_forms_parse_alike() {
        let eight = UtcOffset::from_hours(8).unwrap();
        assert_eq!(UtcOffset::parse("+08").unwrap(), eight);
        assert_eq!(UtcOffset::parse("+0800").unwrap(), eight);
        assert_eq!(UtcOffset::parse("+08:00").unwrap(), eight);
        assert_eq!(UtcOffset::parse("Z").unwrap(), UtcOffset::ZERO);
        assert_eq!(UtcOffset::parse("z").unwrap(), UtcOffset::ZERO);
        assert_eq!(
            UtcOffset::parse("-05:30:15").unwrap().total_seconds(),
            -(5 * 3600 + 30 * 60 + 15)
        );
    }

    #[test]
    fn single_digit_hours_need_the_lenient_grammar() {
        assert!(UtcOffset::parse("-0").is_err());
        assert!(UtcOffset::parse("+1").is_err());
        assert_eq!(UtcOffset::parse_lenient("-0").unwrap(), UtcOffset::ZERO);
        assert_eq!(
            UtcOffset::parse_lenient("+1").unwrap(),
            UtcOffset::from_hours(1).unwrap()
        );
        assert_eq!(
            UtcOffset::parse_lenient("-7").unwrap(),
            UtcOffset::from_hours(-7).unwrap()
        );
    }

    #[test]
    fn rejects_out_of_range_and_malformed() {
        for source in [
            "", "+", "18:00", "+19", "+18:01", "+3:0", "+08:0", "+08:000", "+0860", "++08",
            "+08:30:60", "Z0",
        ] {
            assert!(UtcOffset::parse(source).is_err(), "accepted {source:?}");
        }
        assert!(UtcOffset::parse("+18:00").is_ok());
        assert!(UtcOffset::parse("-18").is_ok());
        assert!(UtcOffset::from_total_seconds(18 * 3600 + 1).is_err());
        assert!(UtcOffset::from_parts(1, -30, 0).is_err());
        assert!(UtcOffset::from_parts(-1, -30, 0).is_ok());
    }

    #[test]
    fn display_round_trips() {
        for seconds in [
            0,
            3600,
            -3600,
            5 * 3600 + 30 * 60,
            -(9 * 3600 + 30 * 60 + 15),
            18 * 3600,
            -18 * 3600,
            60,
            -1,
        ] {
            let offset = UtcOffset::from_total_seconds(seconds).unwrap();
            let formatted = alloc::string::ToString::to_string(&offset);
            assert_eq!(UtcOffset::parse(&formatted).unwrap(), offset, "{formatted}");
        }
    }
}

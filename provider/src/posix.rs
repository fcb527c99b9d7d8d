//! POSIX TZ string parsing.
//!
//! The footer of a TZif v2/v3 file carries a rule string of the form
//! `STD off [DST [off] [,start[/time],end[/time]]]` describing the
//! zone's behavior after its last explicit transition. The grammar is
//! documented in the [glibc manual][glibc-tz] and RFC 8536 §3.3.
//!
//! Offsets in the string are inverted: west of Greenwich is positive,
//! so `CET-1CEST` is one hour *east* of UTC.
//!
//! [glibc-tz]: https://sourceware.org/glibc/manual/2.40/html_node/Proleptic-TZ.html

use tinystr::TinyAsciiStr;

use crate::cursor::Cursor;
use crate::rules::{
    DateOfYear, MonthDayTime, RecurringRule, RecurringZoneRules, TimeOffsetResolver,
    TransitionDay, TransitionLocalTime, UtcOffsetSeconds, MAX_OFFSET_SECONDS,
};
use crate::{TzdbError, TzdbResult};

/// A parsed POSIX time zone string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PosixTimeZone {
    /// The standard-time designation, when it fits the inline buffer.
    pub std_abbreviation: Option<TinyAsciiStr<8>>,
    /// The standard offset, east-positive.
    pub std_offset: UtcOffsetSeconds,
    /// The alternate (daylight saving) half, absent for standard-only
    /// strings.
    pub dst: Option<PosixDst>,
}

/// The daylight saving half of a [`PosixTimeZone`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PosixDst {
    pub abbreviation: Option<TinyAsciiStr<8>>,
    /// The daylight offset, east-positive.
    pub offset: UtcOffsetSeconds,
    /// Transition into daylight saving time.
    pub start: MonthDayTime,
    /// Transition back to standard time.
    pub end: MonthDayTime,
}

impl PosixTimeZone {
    /// Parses a POSIX TZ string. A designation/offset pair without
    /// transition rules is treated as standard-only.
    pub fn parse(source: &str) -> TzdbResult<Self> {
        if source.contains('\0') || source.starts_with(':') {
            return Err(TzdbError::invalid_format("malformed POSIX TZ string"));
        }
        let mut cursor = Cursor::new(source.as_bytes());

        let std_abbreviation = parse_designation(&mut cursor)?;
        let std_offset = invert(parse_offset(&mut cursor, false)?);

        if cursor.is_empty() {
            return Ok(Self {
                std_abbreviation,
                std_offset,
                dst: None,
            });
        }

        let dst_abbreviation = parse_designation(&mut cursor)?;
        let dst_offset = match cursor.peek() {
            // Default daylight offset is one hour ahead of standard.
            Some(b',') | None => UtcOffsetSeconds(std_offset.0 + 3600),
            Some(_) => invert(parse_offset(&mut cursor, false)?),
        };

        if cursor.is_empty() {
            // A daylight designation without transition rules gives the
            // engine nothing recurring to apply.
            return Ok(Self {
                std_abbreviation,
                std_offset,
                dst: None,
            });
        }

        cursor.read_tag(b",")?;
        let start = parse_rule(&mut cursor)?;
        cursor.read_tag(b",")?;
        let end = parse_rule(&mut cursor)?;

        if !cursor.is_empty() {
            return Err(TzdbError::invalid_format(
                "trailing data after POSIX TZ rules",
            ));
        }

        Ok(Self {
            std_abbreviation,
            std_offset,
            dst: Some(PosixDst {
                abbreviation: dst_abbreviation,
                offset: dst_offset,
                start,
                end,
            }),
        })
    }

    /// The recurring rule pair this string describes, if it has a
    /// daylight saving half.
    pub fn recurring(&self) -> Option<RecurringZoneRules> {
        let dst = self.dst?;
        Some(RecurringZoneRules {
            rules: [
                RecurringRule {
                    transition: dst.start,
                    offset_before: self.std_offset,
                    offset_after: dst.offset,
                },
                RecurringRule {
                    transition: dst.end,
                    offset_before: dst.offset,
                    offset_after: self.std_offset,
                },
            ],
        })
    }
}

/// The POSIX string stores seconds that must be added to local time to
/// reach UTC; the engine wants the opposite.
fn invert(seconds: i32) -> UtcOffsetSeconds {
    UtcOffsetSeconds(-seconds)
}

fn parse_designation(cursor: &mut Cursor<'_>) -> TzdbResult<Option<TinyAsciiStr<8>>> {
    let name = if cursor.peek() == Some(b'<') {
        cursor.read_exact(1)?;
        let quoted = cursor.read_until(b'>');
        if quoted
            .iter()
            .any(|b| !(b.is_ascii_alphanumeric() || *b == b'+' || *b == b'-'))
        {
            return Err(TzdbError::invalid_format("invalid quoted designation"));
        }
        cursor.read_tag(b">")?;
        quoted
    } else {
        cursor.read_while(|b| b.is_ascii_alphabetic())
    };
    if name.is_empty() {
        return Err(TzdbError::invalid_format("empty time zone designation"));
    }
    // Designations carry no semantics; long ones are simply not kept.
    Ok(core::str::from_utf8(name)
        .ok()
        .and_then(|name| TinyAsciiStr::try_from_str(name).ok()))
}

/// Parses `[+|-]h[h...][:m[m][:s[s]]]`, returning total seconds with
/// the string's own sign convention. `extended` admits the
/// `-167..=167` hour range of transition times (TZif v3).
fn parse_offset(cursor: &mut Cursor<'_>, extended: bool) -> TzdbResult<i32> {
    let sign = match cursor.peek() {
        Some(b'-') => {
            cursor.read_exact(1)?;
            -1
        }
        Some(b'+') => {
            cursor.read_exact(1)?;
            1
        }
        _ => 1,
    };

    let hour: i32 = parse_int(cursor.read_while(|b| b.is_ascii_digit()))?;
    let mut minute = 0;
    let mut second = 0;
    if cursor.peek() == Some(b':') {
        cursor.read_exact(1)?;
        minute = parse_int(cursor.read_while(|b| b.is_ascii_digit()))?;
        if cursor.peek() == Some(b':') {
            cursor.read_exact(1)?;
            second = parse_int(cursor.read_while(|b| b.is_ascii_digit()))?;
        }
    }

    let hour_bound = if extended { 167 } else { 24 };
    if hour > hour_bound || !(0..60).contains(&minute) || !(0..60).contains(&second) {
        return Err(TzdbError::invalid_format("offset component out of range"));
    }
    let total = sign * (hour * 3600 + minute * 60 + second);
    if !extended && total.abs() > MAX_OFFSET_SECONDS {
        return Err(TzdbError::invalid_format("offset exceeds 18 hours"));
    }
    Ok(total)
}

fn parse_int(bytes: &[u8]) -> TzdbResult<i32> {
    if bytes.is_empty() || bytes.len() > 9 {
        return Err(TzdbError::invalid_format("expected a number"));
    }
    let mut value = 0i32;
    for byte in bytes {
        value = value * 10 + i32::from(byte - b'0');
    }
    Ok(value)
}

fn parse_rule(cursor: &mut Cursor<'_>) -> TzdbResult<MonthDayTime> {
    let date = match cursor.peek() {
        Some(b'J') => {
            cursor.read_exact(1)?;
            let day = parse_int(cursor.read_while(|b| b.is_ascii_digit()))?;
            if !(1..=365).contains(&day) {
                return Err(TzdbError::invalid_format("Julian day out of range"));
            }
            DateOfYear::JulianDayOfYear(day as u16)
        }
        Some(b'M') => {
            cursor.read_exact(1)?;
            let month = parse_int(cursor.read_until(b'.'))?;
            cursor.read_tag(b".")?;
            let week = parse_int(cursor.read_until(b'.'))?;
            cursor.read_tag(b".")?;
            let day_of_week = parse_int(cursor.read_while(|b| b.is_ascii_digit()))?;
            if !(1..=12).contains(&month) || !(1..=5).contains(&week) || !(0..=6).contains(&day_of_week)
            {
                return Err(TzdbError::invalid_format("month rule out of range"));
            }
            let day = if week == 5 {
                TransitionDay::Last {
                    day_of_week: day_of_week as u8,
                    bound: None,
                }
            } else {
                TransitionDay::Nth {
                    day_of_week: day_of_week as u8,
                    week: week as u8,
                }
            };
            DateOfYear::MonthDayOfYear {
                month: month as u8,
                day,
            }
        }
        Some(byte) if byte.is_ascii_digit() => {
            let day = parse_int(cursor.read_while(|b| b.is_ascii_digit()))?;
            if !(0..=365).contains(&day) {
                return Err(TzdbError::invalid_format("Julian day out of range"));
            }
            DateOfYear::JulianDayOfYear0(day as u16)
        }
        _ => return Err(TzdbError::invalid_format("malformed transition date")),
    };

    let time = if cursor.peek() == Some(b'/') {
        cursor.read_exact(1)?;
        let seconds = parse_offset(cursor, true)?;
        TransitionLocalTime::new(
            seconds / 3600,
            (seconds.abs() / 60 % 60) as u8,
            (seconds.abs() % 60) as u8,
        )
    } else {
        // Transitions default to 02:00:00 local time.
        TransitionLocalTime::new(2, 0, 0)
    };

    Ok(MonthDayTime {
        date,
        time,
        resolver: TimeOffsetResolver::WallClock,
    })
}

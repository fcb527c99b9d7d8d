//! The `LocalTime` component.

use alloc::format;
use alloc::string::String;

use crate::format::iso;
use crate::utils;
use crate::{DateTimeError, DateTimeResult};

/// A wall-clock time within a day, with nanosecond precision and no
/// date or zone attached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct LocalTime {
    hour: u8,
    minute: u8,
    second: u8,
    nanosecond: u32,
}

impl LocalTime {
    /// 00:00:00.
    pub const MIDNIGHT: Self = Self {
        hour: 0,
        minute: 0,
        second: 0,
        nanosecond: 0,
    };

    /// Creates a time from its components.
    pub fn new(hour: u8, minute: u8, second: u8, nanosecond: u32) -> DateTimeResult<Self> {
        if hour > 23 || minute > 59 || second > 59 || nanosecond > 999_999_999 {
            return Err(DateTimeError::illegal_argument().with_message(format!(
                "invalid time: {hour:02}:{minute:02}:{second:02}.{nanosecond:09}"
            )));
        }
        Ok(Self {
            hour,
            minute,
            second,
            nanosecond,
        })
    }

    pub fn hour(&self) -> u8 {
        self.hour
    }

    pub fn minute(&self) -> u8 {
        self.minute
    }

    pub fn second(&self) -> u8 {
        self.second
    }

    pub fn nanosecond(&self) -> u32 {
        self.nanosecond
    }

    /// Seconds since the start of the day, ignoring the nanosecond.
    pub fn to_second_of_day(&self) -> u32 {
        u32::from(self.hour) * 3600 + u32::from(self.minute) * 60 + u32::from(self.second)
    }

    /// Builds a time from seconds since the start of the day.
    pub fn from_second_of_day(second_of_day: u32) -> DateTimeResult<Self> {
        if second_of_day >= 86_400 {
            return Err(DateTimeError::illegal_argument()
                .with_message(format!("second of day out of range: {second_of_day}")));
        }
        Ok(Self {
            hour: (second_of_day / 3600) as u8,
            minute: (second_of_day / 60 % 60) as u8,
            second: (second_of_day % 60) as u8,
            nanosecond: 0,
        })
    }

    /// Nanoseconds since the start of the day.
    pub fn to_nanosecond_of_day(&self) -> u64 {
        u64::from(self.to_second_of_day()) * 1_000_000_000 + u64::from(self.nanosecond)
    }

    /// Builds a time from nanoseconds since the start of the day.
    pub fn from_nanosecond_of_day(nanosecond_of_day: u64) -> DateTimeResult<Self> {
        if nanosecond_of_day >= utils::NANOS_PER_DAY as u64 {
            return Err(DateTimeError::illegal_argument()
                .with_message(format!("nanosecond of day out of range: {nanosecond_of_day}")));
        }
        let mut time = Self::from_second_of_day((nanosecond_of_day / 1_000_000_000) as u32)?;
        time.nanosecond = (nanosecond_of_day % 1_000_000_000) as u32;
        Ok(time)
    }

    /// Parses a time from its ISO form, `HH:MM[:SS[.fraction]]`.
    pub fn parse(source: &str) -> DateTimeResult<Self> {
        iso::iso_time().parse(source)?.to_local_time()
    }

    pub(crate) fn format_into(&self, output: &mut String) {
        // Construction keeps every component in range for ISO output.
        if let Ok(formatted) = iso::iso_time().format(&crate::DateTimeComponents::from_time(self)) {
            output.push_str(&formatted);
        }
    }
}

impl core::fmt::Display for LocalTime {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let mut formatted = String::new();
        self.format_into(&mut formatted);
        f.write_str(&formatted)
    }
}

impl core::str::FromStr for LocalTime {
    type Err = DateTimeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;

    #[test]
    fn construction_bounds() {
        assert!(LocalTime::new(23, 59, 59, 999_999_999).is_ok());
        assert!(LocalTime::new(24, 0, 0, 0).is_err());
        assert!(LocalTime::new(0, 60, 0, 0).is_err());
        assert!(LocalTime::new(0, 0, 0, 1_000_000_000).is_err());
    }

    #[test]
    fn second_of_day_round_trips() {
        for second in [0u32, 1, 3599, 3600, 43_200, 86_399] {
            let time = LocalTime::from_second_of_day(second).unwrap();
            assert_eq!(time.to_second_of_day(), second);
        }
        assert!(LocalTime::from_second_of_day(86_400).is_err());

        let time = LocalTime::from_nanosecond_of_day(3_661_000_000_123).unwrap();
        assert_eq!(time, LocalTime::new(1, 1, 1, 123).unwrap());
        assert_eq!(time.to_nanosecond_of_day(), 3_661_000_000_123);
    }

    #[test]
    fn iso_strings() {
        assert_eq!(LocalTime::new(9, 5, 0, 0).unwrap().to_string(), "09:05");
        assert_eq!(
            LocalTime::new(9, 5, 7, 0).unwrap().to_string(),
            "09:05:07"
        );
        assert_eq!(
            LocalTime::new(9, 5, 7, 124_000).unwrap().to_string(),
            "09:05:07.000124"
        );
        assert_eq!(
            LocalTime::parse("23:59:59.123456789").unwrap(),
            LocalTime::new(23, 59, 59, 123_456_789).unwrap()
        );
        assert_eq!(
            LocalTime::parse("12:00").unwrap(),
            LocalTime::new(12, 0, 0, 0).unwrap()
        );
        assert!(LocalTime::parse("12").is_err());
        assert!(LocalTime::parse("25:00").is_err());
    }

    #[test]
    fn ordering_is_lexicographic() {
        let a = LocalTime::new(9, 30, 0, 0).unwrap();
        let b = LocalTime::new(9, 30, 0, 1).unwrap();
        let c = LocalTime::new(10, 0, 0, 0).unwrap();
        assert!(a < b && b < c);
    }
}

//! The `LocalDateTime` component.

use alloc::string::String;

use crate::format::iso;
use crate::utils;
use crate::{DateTimeError, DateTimeResult, DayOfWeek, LocalDate, LocalTime, Month};

/// A date paired with a wall-clock time, without a zone. Ordered
/// lexicographically by its components.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LocalDateTime {
    date: LocalDate,
    time: LocalTime,
}

impl LocalDateTime {
    /// Creates a date-time from numeric components.
    pub fn new(
        year: i32,
        month: u8,
        day: u8,
        hour: u8,
        minute: u8,
        second: u8,
        nanosecond: u32,
    ) -> DateTimeResult<Self> {
        Ok(Self {
            date: LocalDate::new(year, month, day)?,
            time: LocalTime::new(hour, minute, second, nanosecond)?,
        })
    }

    /// Combines a date and a time.
    pub fn from_parts(date: LocalDate, time: LocalTime) -> Self {
        Self { date, time }
    }

    pub fn date(&self) -> LocalDate {
        self.date
    }

    pub fn time(&self) -> LocalTime {
        self.time
    }

    pub fn year(&self) -> i32 {
        self.date.year()
    }

    pub fn month(&self) -> Month {
        self.date.month()
    }

    pub fn month_number(&self) -> u8 {
        self.date.month_number()
    }

    pub fn day_of_month(&self) -> u8 {
        self.date.day_of_month()
    }

    pub fn day_of_week(&self) -> DayOfWeek {
        self.date.day_of_week()
    }

    pub fn hour(&self) -> u8 {
        self.time.hour()
    }

    pub fn minute(&self) -> u8 {
        self.time.minute()
    }

    pub fn second(&self) -> u8 {
        self.time.second()
    }

    pub fn nanosecond(&self) -> u32 {
        self.time.nanosecond()
    }

    /// Seconds this date-time would denote as an epoch timestamp if it
    /// were UTC. This is the engine's "local seconds" representation.
    pub(crate) fn local_seconds(&self) -> i64 {
        self.date.to_epoch_day() * utils::SECONDS_PER_DAY + i64::from(self.time.to_second_of_day())
    }

    /// The inverse of [`LocalDateTime::local_seconds`], carrying a
    /// nanosecond along.
    pub(crate) fn from_local_seconds(seconds: i64, nanosecond: u32) -> DateTimeResult<Self> {
        let date = LocalDate::from_epoch_day(seconds.div_euclid(utils::SECONDS_PER_DAY))?;
        let mut time =
            LocalTime::from_second_of_day(seconds.rem_euclid(utils::SECONDS_PER_DAY) as u32)?;
        if nanosecond > 0 {
            time = LocalTime::new(time.hour(), time.minute(), time.second(), nanosecond)?;
        }
        Ok(Self { date, time })
    }

    /// Parses a date-time from its ISO form,
    /// `YYYY-MM-DD'T'HH:MM[:SS[.fraction]]` (a lowercase `t` is
    /// accepted).
    pub fn parse(source: &str) -> DateTimeResult<Self> {
        iso::iso_date_time().parse(source)?.to_local_date_time()
    }
}

impl core::fmt::Display for LocalDateTime {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let mut formatted = String::new();
        self.date.format_into(&mut formatted);
        formatted.push('T');
        self.time.format_into(&mut formatted);
        f.write_str(&formatted)
    }
}

impl core::str::FromStr for LocalDateTime {
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
    fn ordering_is_lexicographic() {
        let a = LocalDateTime::new(2019, 10, 27, 23, 59, 0, 0).unwrap();
        let b = LocalDateTime::new(2019, 10, 28, 0, 0, 0, 0).unwrap();
        let c = LocalDateTime::new(2019, 10, 28, 0, 0, 0, 1).unwrap();
        assert!(a < b && b < c);
    }

    #[test]
    fn local_seconds_round_trips() {
        for datetime in [
            LocalDateTime::new(1970, 1, 1, 0, 0, 0, 0).unwrap(),
            LocalDateTime::new(2020, 3, 29, 2, 30, 0, 500).unwrap(),
            LocalDateTime::new(1969, 12, 31, 23, 59, 59, 0).unwrap(),
            LocalDateTime::new(-9999, 6, 15, 12, 0, 0, 0).unwrap(),
        ] {
            let seconds = datetime.local_seconds();
            assert_eq!(
                LocalDateTime::from_local_seconds(seconds, datetime.nanosecond()).unwrap(),
                datetime
            );
        }
    }

    #[test]
    fn iso_strings() {
        let datetime = LocalDateTime::new(2019, 10, 28, 1, 59, 0, 0).unwrap();
        assert_eq!(datetime.to_string(), "2019-10-28T01:59");
        assert_eq!(LocalDateTime::parse("2019-10-28T01:59").unwrap(), datetime);
        assert_eq!(LocalDateTime::parse("2019-10-28t01:59").unwrap(), datetime);
        assert_eq!(
            LocalDateTime::parse("2020-12-09T09:16:56.000124")
                .unwrap()
                .nanosecond(),
            124_000
        );
        assert!(LocalDateTime::parse("2019-10-28 01:59").is_err());
    }
}

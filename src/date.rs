//! The `LocalDate` component and its calendar arithmetic.

use alloc::format;
use alloc::string::String;

use crate::format::iso;
use crate::period::DatePeriod;
use crate::unit::DateTimeUnit;
use crate::utils;
use crate::{DateTimeError, DateTimeResult, LocalDateTime, LocalTime};

/// A month of the proleptic gregorian calendar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum Month {
    January = 1,
    February = 2,
    March = 3,
    April = 4,
    May = 5,
    June = 6,
    July = 7,
    August = 8,
    September = 9,
    October = 10,
    November = 11,
    December = 12,
}

impl Month {
    /// The month number, 1..=12.
    pub fn number(&self) -> u8 {
        *self as u8
    }

    /// Looks a month up by number.
    pub fn from_number(number: u8) -> DateTimeResult<Self> {
        Ok(match number {
            1 => Self::January,
            2 => Self::February,
            3 => Self::March,
            4 => Self::April,
            5 => Self::May,
            6 => Self::June,
            7 => Self::July,
            8 => Self::August,
            9 => Self::September,
            10 => Self::October,
            11 => Self::November,
            12 => Self::December,
            _ => {
                return Err(DateTimeError::illegal_argument()
                    .with_message(format!("invalid month number: {number}")))
            }
        })
    }

    /// The number of days of this month in the given year.
    pub fn length(&self, year: i32) -> u8 {
        utils::days_in_month(year, self.number())
    }
}

/// A day of the week, ISO numbered (Monday = 1 .. Sunday = 7).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum DayOfWeek {
    Monday = 1,
    Tuesday = 2,
    Wednesday = 3,
    Thursday = 4,
    Friday = 5,
    Saturday = 6,
    Sunday = 7,
}

impl DayOfWeek {
    /// The ISO day number, 1..=7.
    pub fn iso_number(&self) -> u8 {
        *self as u8
    }

    /// Looks a day up by its ISO number.
    pub fn from_iso_number(number: u8) -> DateTimeResult<Self> {
        Ok(match number {
            1 => Self::Monday,
            2 => Self::Tuesday,
            3 => Self::Wednesday,
            4 => Self::Thursday,
            5 => Self::Friday,
            6 => Self::Saturday,
            7 => Self::Sunday,
            _ => {
                return Err(DateTimeError::illegal_argument()
                    .with_message(format!("invalid ISO day number: {number}")))
            }
        })
    }
}

/// A date of the proleptic gregorian calendar, within the year range
/// ±999,999,999.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LocalDate {
    year: i32,
    month: u8,
    day: u8,
}

impl LocalDate {
    pub(crate) const MIN_YEAR: i32 = -999_999_999;
    pub(crate) const MAX_YEAR: i32 = 999_999_999;

    /// The earliest representable date.
    pub const MIN: Self = Self {
        year: Self::MIN_YEAR,
        month: 1,
        day: 1,
    };

    /// The latest representable date.
    pub const MAX: Self = Self {
        year: Self::MAX_YEAR,
        month: 12,
        day: 31,
    };

    /// Creates a date from its components.
    pub fn new(year: i32, month: u8, day: u8) -> DateTimeResult<Self> {
        if !(Self::MIN_YEAR..=Self::MAX_YEAR).contains(&year) {
            return Err(DateTimeError::illegal_argument()
                .with_message(format!("year out of range: {year}")));
        }
        if !(1..=12).contains(&month) {
            return Err(DateTimeError::illegal_argument()
                .with_message(format!("invalid month number: {month}")));
        }
        if day == 0 || day > utils::days_in_month(year, month) {
            return Err(DateTimeError::illegal_argument().with_message(format!(
                "invalid date: {year:04}-{month:02}-{day:02}"
            )));
        }
        Ok(Self { year, month, day })
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> Month {
        Month::from_number(self.month).expect("month validated on construction")
    }

    /// The month number, 1..=12.
    pub fn month_number(&self) -> u8 {
        self.month
    }

    pub fn day_of_month(&self) -> u8 {
        self.day
    }

    pub fn day_of_week(&self) -> DayOfWeek {
        DayOfWeek::from_iso_number(utils::iso_day_of_week(self.to_epoch_day()))
            .expect("weekday equation yields an ISO day number")
    }

    /// The day of the year, 1-based.
    pub fn day_of_year(&self) -> u16 {
        utils::days_until_month(self.month, utils::is_leap_year(self.year)) + u16::from(self.day)
    }

    /// Days since 1970-01-01; negative for earlier dates.
    pub fn to_epoch_day(&self) -> i64 {
        utils::epoch_days_from_ymd(self.year, self.month, self.day)
    }

    /// Builds a date from days since 1970-01-01.
    pub fn from_epoch_day(epoch_day: i64) -> DateTimeResult<Self> {
        let (year, month, day) = utils::ymd_from_epoch_days(epoch_day);
        if !(Self::MIN_YEAR..=Self::MAX_YEAR).contains(&year) {
            return Err(DateTimeError::arithmetic()
                .with_message(format!("epoch day out of range: {epoch_day}")));
        }
        Ok(Self { year, month, day })
    }

    /// Attaches a time of day.
    pub fn at_time(&self, time: LocalTime) -> LocalDateTime {
        LocalDateTime::from_parts(*self, time)
    }

    /// Attaches midnight.
    pub fn at_start_of_day(&self) -> LocalDateTime {
        self.at_time(LocalTime::MIDNIGHT)
    }

    /// Adds `count` days, failing on range overflow.
    pub fn plus_days(&self, count: i64) -> DateTimeResult<Self> {
        let days = self
            .to_epoch_day()
            .checked_add(count)
            .ok_or_else(|| DateTimeError::arithmetic().with_message("day addition overflow"))?;
        Self::from_epoch_day(days)
    }

    /// Adds `count` months, clamping the day to the end of the target
    /// month.
    pub fn plus_months(&self, count: i64) -> DateTimeResult<Self> {
        let total_months = (i64::from(self.year) * 12 + i64::from(self.month - 1))
            .checked_add(count)
            .ok_or_else(|| DateTimeError::arithmetic().with_message("month addition overflow"))?;
        let year = total_months.div_euclid(12);
        let month = (total_months.rem_euclid(12) + 1) as u8;
        if !(i64::from(Self::MIN_YEAR)..=i64::from(Self::MAX_YEAR)).contains(&year) {
            return Err(DateTimeError::arithmetic()
                .with_message(format!("month addition overflows the year range: {count}")));
        }
        let year = year as i32;
        let day = self.day.min(utils::days_in_month(year, month));
        Ok(Self { year, month, day })
    }

    /// Adds `count` of `unit`. Time-based units do not apply to dates.
    pub fn plus(&self, count: i64, unit: DateTimeUnit) -> DateTimeResult<Self> {
        match unit {
            DateTimeUnit::MonthBased { months } => {
                let scaled = count
                    .checked_mul(i64::from(months))
                    .ok_or_else(|| DateTimeError::arithmetic().with_message("month overflow"))?;
                self.plus_months(scaled)
            }
            DateTimeUnit::DayBased { days } => {
                let scaled = count
                    .checked_mul(i64::from(days))
                    .ok_or_else(|| DateTimeError::arithmetic().with_message("day overflow"))?;
                self.plus_days(scaled)
            }
            DateTimeUnit::TimeBased { .. } => Err(DateTimeError::illegal_argument()
                .with_message("time-based units cannot be added to a date")),
        }
    }

    /// Adds a calendar period: months first (with day-of-month clamp),
    /// then days.
    pub fn plus_period(&self, period: &DatePeriod) -> DateTimeResult<Self> {
        let months = i64::from(period.years()) * 12 + i64::from(period.months());
        self.plus_months(months)?.plus_days(i64::from(period.days()))
    }

    /// The number of whole months from `self` to `other`, negative if
    /// `other` is earlier. A month that only completes thanks to
    /// day-of-month clamping does not count.
    pub fn months_until(&self, other: &LocalDate) -> i64 {
        // Packing the day into the low bits makes truncated division
        // apply the day-of-month comparison in one step.
        let packed = |date: &LocalDate| {
            (i64::from(date.year) * 12 + i64::from(date.month - 1)) * 32 + i64::from(date.day)
        };
        (packed(other) - packed(self)) / 32
    }

    /// The number of days from `self` to `other`.
    pub fn days_until(&self, other: &LocalDate) -> i64 {
        other.to_epoch_day() - self.to_epoch_day()
    }

    /// The calendar difference from `self` to `other`, such that
    /// advancing `self` by the result reaches `other`.
    pub fn period_until(&self, other: &LocalDate) -> DateTimeResult<DatePeriod> {
        let months = self.months_until(other);
        let intermediate = self.plus_months(months)?;
        let days = intermediate.days_until(other);
        let overflow = || DateTimeError::arithmetic().with_message("period component overflow");
        DatePeriod::new(
            i32::try_from(months / 12).map_err(|_| overflow())?,
            (months % 12) as i32,
            i32::try_from(days).map_err(|_| overflow())?,
        )
    }

    /// The number of whole `unit`s from `self` to `other`.
    pub fn until(&self, other: &LocalDate, unit: DateTimeUnit) -> DateTimeResult<i64> {
        match unit {
            DateTimeUnit::MonthBased { months } => Ok(self.months_until(other) / i64::from(months)),
            DateTimeUnit::DayBased { days } => Ok(self.days_until(other) / i64::from(days)),
            DateTimeUnit::TimeBased { .. } => Err(DateTimeError::illegal_argument()
                .with_message("time-based units cannot measure date differences")),
        }
    }

    /// Parses a date from its ISO form, `[+|-]YYYY-MM-DD`.
    pub fn parse(source: &str) -> DateTimeResult<Self> {
        iso::iso_date().parse(source)?.to_local_date()
    }

    pub(crate) fn format_into(&self, output: &mut String) {
        if let Ok(formatted) = iso::iso_date().format(&crate::DateTimeComponents::from_date(self)) {
            output.push_str(&formatted);
        }
    }
}

impl core::fmt::Display for LocalDate {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let mut formatted = String::new();
        self.format_into(&mut formatted);
        f.write_str(&formatted)
    }
}

impl core::str::FromStr for LocalDate {
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
    fn construction_validates() {
        assert!(LocalDate::new(2008, 2, 29).is_ok());
        assert!(LocalDate::new(2007, 2, 29).is_err());
        assert!(LocalDate::new(2007, 13, 1).is_err());
        assert!(LocalDate::new(2007, 0, 1).is_err());
        assert!(LocalDate::new(1_000_000_000, 1, 1).is_err());
    }

    #[test]
    fn accessors() {
        let date = LocalDate::new(2019, 10, 27).unwrap();
        assert_eq!(date.month(), Month::October);
        assert_eq!(date.day_of_week(), DayOfWeek::Sunday);
        assert_eq!(date.day_of_year(), 300);
        assert_eq!(LocalDate::new(2020, 12, 31).unwrap().day_of_year(), 366);
    }

    #[test]
    fn year_addition_clamps_leap_day() {
        let leap_day = LocalDate::new(2008, 2, 29).unwrap();
        assert_eq!(
            leap_day.plus(1, DateTimeUnit::YEAR).unwrap(),
            LocalDate::new(2009, 2, 28).unwrap()
        );
        assert_eq!(
            leap_day.plus(4, DateTimeUnit::YEAR).unwrap(),
            LocalDate::new(2012, 2, 29).unwrap()
        );
    }

    #[test]
    fn month_addition_clamps_to_month_end() {
        let end_of_january = LocalDate::new(2016, 1, 31).unwrap();
        assert_eq!(
            end_of_january.plus(1, DateTimeUnit::MONTH).unwrap(),
            LocalDate::new(2016, 2, 29).unwrap()
        );
        assert_eq!(
            end_of_january.plus(-2, DateTimeUnit::MONTH).unwrap(),
            LocalDate::new(2015, 11, 30).unwrap()
        );
    }

    #[test]
    fn day_and_week_addition() {
        let date = LocalDate::new(2019, 12, 30).unwrap();
        assert_eq!(
            date.plus(3, DateTimeUnit::DAY).unwrap(),
            LocalDate::new(2020, 1, 2).unwrap()
        );
        assert_eq!(
            date.plus(1, DateTimeUnit::WEEK).unwrap(),
            LocalDate::new(2020, 1, 6).unwrap()
        );
        assert!(LocalDate::MAX.plus(1, DateTimeUnit::DAY).is_err());
        assert!(LocalDate::MIN.plus(-1, DateTimeUnit::DAY).is_err());
    }

    #[test]
    fn period_until_inverts() {
        let cases = [
            ((2016, 1, 31), (2016, 3, 1)),
            ((2016, 3, 1), (2016, 1, 31)),
            ((2019, 2, 28), (2020, 2, 29)),
            ((2000, 1, 1), (2000, 1, 1)),
            ((1999, 12, 31), (2000, 3, 1)),
        ];
        for ((y1, m1, d1), (y2, m2, d2)) in cases {
            let start = LocalDate::new(y1, m1, d1).unwrap();
            let end = LocalDate::new(y2, m2, d2).unwrap();
            let period = start.period_until(&end).unwrap();
            assert_eq!(
                start.plus_period(&period).unwrap(),
                end,
                "{start} + {period:?} != {end}"
            );
        }
    }

    #[test]
    fn months_until_counts_whole_months() {
        let start = LocalDate::new(2016, 1, 31).unwrap();
        assert_eq!(start.months_until(&LocalDate::new(2016, 2, 29).unwrap()), 0);
        assert_eq!(start.months_until(&LocalDate::new(2016, 3, 1).unwrap()), 1);
        assert_eq!(start.months_until(&LocalDate::new(2015, 12, 31).unwrap()), -1);
        let start = LocalDate::new(2016, 1, 1).unwrap();
        assert_eq!(start.months_until(&LocalDate::new(2017, 1, 1).unwrap()), 12);
    }

    #[test]
    fn iso_strings() {
        assert_eq!(LocalDate::new(2020, 3, 9).unwrap().to_string(), "2020-03-09");
        assert_eq!(LocalDate::new(-44, 3, 15).unwrap().to_string(), "-0044-03-15");
        assert_eq!(
            LocalDate::new(12345, 6, 7).unwrap().to_string(),
            "+12345-06-07"
        );
        assert_eq!(
            LocalDate::parse("2019-10-27").unwrap(),
            LocalDate::new(2019, 10, 27).unwrap()
        );
        assert_eq!(
            LocalDate::parse("+12345-06-07").unwrap(),
            LocalDate::new(12345, 6, 7).unwrap()
        );
        assert_eq!(
            LocalDate::parse("-0044-03-15").unwrap(),
            LocalDate::new(-44, 3, 15).unwrap()
        );
        assert!(LocalDate::parse("2019-2-07").is_err());
        assert!(LocalDate::parse("2019-02-30").is_err());
    }

    #[test]
    fn epoch_day_round_trips() {
        for date in [
            LocalDate::new(1970, 1, 1).unwrap(),
            LocalDate::new(2020, 2, 29).unwrap(),
            LocalDate::new(-1, 12, 31).unwrap(),
            LocalDate::MIN,
            LocalDate::MAX,
        ] {
            assert_eq!(LocalDate::from_epoch_day(date.to_epoch_day()).unwrap(), date);
        }
        assert!(LocalDate::from_epoch_day(LocalDate::MAX.to_epoch_day() + 1).is_err());
    }
}

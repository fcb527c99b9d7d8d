//! Units of calendar and clock time used by the arithmetic operations.

use crate::{DateTimeError, DateTimeResult};

/// A unit of date-time measurement: a fixed span of clock time, a
/// number of calendar days, or a number of calendar months.
///
/// Day- and month-based units have no fixed physical duration; they
/// are applied through a zone's local timeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DateTimeUnit {
    /// A fixed number of nanoseconds.
    TimeBased { nanoseconds: i64 },
    /// A number of calendar days.
    DayBased { days: i32 },
    /// A number of calendar months.
    MonthBased { months: i32 },
}

impl DateTimeUnit {
    pub const NANOSECOND: Self = Self::TimeBased { nanoseconds: 1 };
    pub const MICROSECOND: Self = Self::TimeBased { nanoseconds: 1_000 };
    pub const MILLISECOND: Self = Self::TimeBased {
        nanoseconds: 1_000_000,
    };
    pub const SECOND: Self = Self::TimeBased {
        nanoseconds: 1_000_000_000,
    };
    pub const MINUTE: Self = Self::TimeBased {
        nanoseconds: 60 * 1_000_000_000,
    };
    pub const HOUR: Self = Self::TimeBased {
        nanoseconds: 3600 * 1_000_000_000,
    };
    pub const DAY: Self = Self::DayBased { days: 1 };
    pub const WEEK: Self = Self::DayBased { days: 7 };
    pub const MONTH: Self = Self::MonthBased { months: 1 };
    pub const QUARTER: Self = Self::MonthBased { months: 3 };
    pub const YEAR: Self = Self::MonthBased { months: 12 };
    pub const CENTURY: Self = Self::MonthBased { months: 1200 };

    /// A time-based unit of the given positive length.
    pub fn time_based(nanoseconds: i64) -> DateTimeResult<Self> {
        if nanoseconds <= 0 {
            return Err(DateTimeError::illegal_argument()
                .with_message("unit length must be positive"));
        }
        Ok(Self::TimeBased { nanoseconds })
    }

    /// A day-based unit of the given positive length.
    pub fn day_based(days: i32) -> DateTimeResult<Self> {
        if days <= 0 {
            return Err(DateTimeError::illegal_argument()
                .with_message("unit length must be positive"));
        }
        Ok(Self::DayBased { days })
    }

    /// A month-based unit of the given positive length.
    pub fn month_based(months: i32) -> DateTimeResult<Self> {
        if months <= 0 {
            return Err(DateTimeError::illegal_argument()
                .with_message("unit length must be positive"));
        }
        Ok(Self::MonthBased { months })
    }
}

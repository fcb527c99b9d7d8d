//! Calendar periods: signed deltas expressed in calendar and clock
//! units.

use alloc::format;
use alloc::string::String;

use crate::{DateTimeError, DateTimeResult};

const NANOS_PER_SECOND: i128 = 1_000_000_000;
const NANOS_PER_MINUTE: i128 = 60 * NANOS_PER_SECOND;
const NANOS_PER_HOUR: i128 = 60 * NANOS_PER_MINUTE;

/// A signed calendar delta. Construction normalizes the components:
/// whole dozens of months roll into years, and the sub-day fields are
/// re-carried so that `|nanoseconds| < 1e9`, `|seconds| < 60` and
/// `|minutes| < 60`, preserving the total signed sub-day nanoseconds.
/// Days never interact with the other fields; their length depends on
/// the zone they are applied in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct DateTimePeriod {
    years: i32,
    months: i32,
    days: i32,
    hours: i32,
    minutes: i32,
    seconds: i64,
    nanoseconds: i64,
}

impl DateTimePeriod {
    /// Creates a period from its components, normalizing them.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        years: i32,
        months: i32,
        days: i32,
        hours: i32,
        minutes: i32,
        seconds: i64,
        nanoseconds: i64,
    ) -> DateTimeResult<Self> {
        let total_months = i64::from(years) * 12 + i64::from(months);
        let norm_years = i32::try_from(total_months / 12)
            .map_err(|_| DateTimeError::arithmetic().with_message("period years overflow"))?;
        let norm_months = (total_months % 12) as i32;

        let total_nanos = i128::from(hours) * NANOS_PER_HOUR
            + i128::from(minutes) * NANOS_PER_MINUTE
            + i128::from(seconds) * NANOS_PER_SECOND
            + i128::from(nanoseconds);
        let norm_hours = i32::try_from(total_nanos / NANOS_PER_HOUR)
            .map_err(|_| DateTimeError::arithmetic().with_message("period hours overflow"))?;
        let norm_minutes = (total_nanos / NANOS_PER_MINUTE % 60) as i32;
        let norm_seconds = (total_nanos / NANOS_PER_SECOND % 60) as i64;
        let norm_nanos = (total_nanos % NANOS_PER_SECOND) as i64;

        Ok(Self {
            years: norm_years,
            months: norm_months,
            days,
            hours: norm_hours,
            minutes: norm_minutes,
            seconds: norm_seconds,
            nanoseconds: norm_nanos,
        })
    }

    /// The zero period.
    pub const ZERO: Self = Self {
        years: 0,
        months: 0,
        days: 0,
        hours: 0,
        minutes: 0,
        seconds: 0,
        nanoseconds: 0,
    };

    pub fn years(&self) -> i32 {
        self.years
    }

    pub fn months(&self) -> i32 {
        self.months
    }

    pub fn days(&self) -> i32 {
        self.days
    }

    pub fn hours(&self) -> i32 {
        self.hours
    }

    pub fn minutes(&self) -> i32 {
        self.minutes
    }

    pub fn seconds(&self) -> i64 {
        self.seconds
    }

    pub fn nanoseconds(&self) -> i64 {
        self.nanoseconds
    }

    pub fn is_zero(&self) -> bool {
        *self == Self::ZERO
    }

    /// The total sub-day delta in nanoseconds.
    pub(crate) fn total_time_nanoseconds(&self) -> i128 {
        i128::from(self.hours) * NANOS_PER_HOUR
            + i128::from(self.minutes) * NANOS_PER_MINUTE
            + i128::from(self.seconds) * NANOS_PER_SECOND
            + i128::from(self.nanoseconds)
    }

    /// The total month delta.
    pub(crate) fn total_months(&self) -> i64 {
        i64::from(self.years) * 12 + i64::from(self.months)
    }

    /// The component-wise negation.
    pub fn negated(&self) -> DateTimeResult<Self> {
        let negate = |value: i32| {
            value
                .checked_neg()
                .ok_or_else(|| DateTimeError::arithmetic().with_message("period negation overflow"))
        };
        Ok(Self {
            years: negate(self.years)?,
            months: negate(self.months)?,
            days: negate(self.days)?,
            hours: negate(self.hours)?,
            minutes: negate(self.minutes)?,
            seconds: -self.seconds,
            nanoseconds: -self.nanoseconds,
        })
    }

    /// Parses the ISO-8601-style form emitted by `Display`, e.g.
    /// `P1Y2M3DT4H5M6.000000007S`. Components may carry individual
    /// signs, and a sign before `P` negates the whole period.
    pub fn parse(source: &str) -> DateTimeResult<Self> {
        parse_period(source)
    }
}

impl core::fmt::Display for DateTimePeriod {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        if self.is_zero() {
            return f.write_str("P0D");
        }
        f.write_str("P")?;
        if self.years != 0 {
            write!(f, "{}Y", self.years)?;
        }
        if self.months != 0 {
            write!(f, "{}M", self.months)?;
        }
        if self.days != 0 {
            write!(f, "{}D", self.days)?;
        }
        if self.hours != 0 || self.minutes != 0 || self.seconds != 0 || self.nanoseconds != 0 {
            f.write_str("T")?;
            if self.hours != 0 {
                write!(f, "{}H", self.hours)?;
            }
            if self.minutes != 0 {
                write!(f, "{}M", self.minutes)?;
            }
            if self.seconds != 0 || self.nanoseconds != 0 {
                if self.nanoseconds == 0 {
                    write!(f, "{}S", self.seconds)?;
                } else {
                    let sign = if self.seconds < 0 || self.nanoseconds < 0 {
                        "-"
                    } else {
                        ""
                    };
                    let mut fraction = format!("{:09}", self.nanoseconds.abs());
                    while fraction.ends_with('0') {
                        fraction.pop();
                    }
                    write!(f, "{sign}{}.{fraction}S", self.seconds.abs())?;
                }
            }
        }
        Ok(())
    }
}

impl core::str::FromStr for DateTimePeriod {
    type Err = DateTimeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

fn parse_period(source: &str) -> DateTimeResult<DateTimePeriod> {
    let error = || {
        DateTimeError::invalid_format()
            .with_message(format!("invalid period: '{source}'"))
    };
    let bytes = source.as_bytes();
    let mut pos = 0;
    let overall_sign: i64 = match bytes.first() {
        Some(b'+') => {
            pos += 1;
            1
        }
        Some(b'-') => {
            pos += 1;
            -1
        }
        _ => 1,
    };
    if bytes.get(pos).map(u8::to_ascii_uppercase) != Some(b'P') {
        return Err(error());
    }
    pos += 1;

    let mut years = 0i64;
    let mut months = 0i64;
    let mut days = 0i64;
    let mut hours = 0i64;
    let mut minutes = 0i64;
    let mut seconds = 0i64;
    let mut nanoseconds = 0i64;
    let mut in_time = false;
    let mut seen_any = false;

    while pos < bytes.len() {
        if !in_time && bytes[pos].to_ascii_uppercase() == b'T' {
            in_time = true;
            pos += 1;
            continue;
        }
        let sign: i64 = match bytes[pos] {
            b'+' => {
                pos += 1;
                1
            }
            b'-' => {
                pos += 1;
                -1
            }
            _ => 1,
        };
        let start = pos;
        while pos < bytes.len() && bytes[pos].is_ascii_digit() {
            pos += 1;
        }
        if start == pos || pos - start > 10 {
            return Err(error());
        }
        let mut value = 0i64;
        for byte in &bytes[start..pos] {
            value = value * 10 + i64::from(byte - b'0');
        }
        value *= sign * overall_sign;

        let mut fraction = 0i64;
        let designator = *bytes.get(pos).ok_or_else(error)?;
        if designator == b'.' && in_time {
            pos += 1;
            let fraction_start = pos;
            while pos < bytes.len() && bytes[pos].is_ascii_digit() {
                pos += 1;
            }
            let digits = pos - fraction_start;
            if digits == 0 || digits > 9 {
                return Err(error());
            }
            for byte in &bytes[fraction_start..pos] {
                fraction = fraction * 10 + i64::from(byte - b'0');
            }
            fraction *= 10i64.pow(9 - digits as u32);
            fraction *= sign * overall_sign;
            if *bytes.get(pos).ok_or_else(error)? != b'S' {
                return Err(error());
            }
            pos += 1;
            seconds = value;
            nanoseconds = fraction;
            seen_any = true;
            continue;
        }

        pos += 1;
        match (in_time, designator.to_ascii_uppercase()) {
            (false, b'Y') => years = value,
            (false, b'M') => months = value,
            (false, b'W') => days = value * 7,
            (false, b'D') => days = value,
            (true, b'H') => hours = value,
            (true, b'M') => minutes = value,
            (true, b'S') => seconds = value,
            _ => return Err(error()),
        }
        seen_any = true;
    }

    if !seen_any {
        return Err(error());
    }
    let to_i32 = |value: i64| {
        i32::try_from(value)
            .map_err(|_| DateTimeError::arithmetic().with_message("period component overflow"))
    };
    DateTimePeriod::new(
        to_i32(years)?,
        to_i32(months)?,
        to_i32(days)?,
        to_i32(hours)?,
        to_i32(minutes)?,
        seconds,
        nanoseconds,
    )
}

/// A calendar period whose sub-day fields are all zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct DatePeriod {
    years: i32,
    months: i32,
    days: i32,
}

impl DatePeriod {
    /// Creates a date period, rolling whole dozens of months into
    /// years.
    pub fn new(years: i32, months: i32, days: i32) -> DateTimeResult<Self> {
        let total_months = i64::from(years) * 12 + i64::from(months);
        let years = i32::try_from(total_months / 12)
            .map_err(|_| DateTimeError::arithmetic().with_message("period years overflow"))?;
        Ok(Self {
            years,
            months: (total_months % 12) as i32,
            days,
        })
    }

    pub const ZERO: Self = Self {
        years: 0,
        months: 0,
        days: 0,
    };

    pub fn years(&self) -> i32 {
        self.years
    }

    pub fn months(&self) -> i32 {
        self.months
    }

    pub fn days(&self) -> i32 {
        self.days
    }

    pub fn is_zero(&self) -> bool {
        *self == Self::ZERO
    }
}

impl From<DatePeriod> for DateTimePeriod {
    fn from(period: DatePeriod) -> Self {
        DateTimePeriod {
            years: period.years,
            months: period.months,
            days: period.days,
            ..DateTimePeriod::ZERO
        }
    }
}

impl core::fmt::Display for DatePeriod {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        DateTimePeriod::from(*self).fmt(f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;

    #[test]
    fn months_roll_into_years() {
        let period = DateTimePeriod::new(1, 14, 0, 0, 0, 0, 0).unwrap();
        assert_eq!((period.years(), period.months()), (2, 2));
        let period = DateTimePeriod::new(0, -13, 0, 0, 0, 0, 0).unwrap();
        assert_eq!((period.years(), period.months()), (-1, -1));
        let period = DateTimePeriod::new(1, -1, 0, 0, 0, 0, 0).unwrap();
        assert_eq!((period.years(), period.months()), (0, 11));
    }

    #[test]
    fn sub_day_fields_re_carry() {
        let period = DateTimePeriod::new(0, 0, 0, 0, 0, 0, 1_500_000_000).unwrap();
        assert_eq!((period.seconds(), period.nanoseconds()), (1, 500_000_000));
        let period = DateTimePeriod::new(0, 0, 0, 0, 90, 0, 0).unwrap();
        assert_eq!((period.hours(), period.minutes()), (1, 30));
        let period = DateTimePeriod::new(0, 0, 0, 1, -30, 0, 0).unwrap();
        assert_eq!((period.hours(), period.minutes()), (0, 30));
        let period = DateTimePeriod::new(0, 0, 0, 0, 0, -90, 0).unwrap();
        assert_eq!((period.minutes(), period.seconds()), (-1, -30));
        // Days do not interact with the clock fields.
        let period = DateTimePeriod::new(0, 0, 1, -24, 0, 0, 0).unwrap();
        assert_eq!((period.days(), period.hours()), (1, -24));
    }

    #[test]
    fn display_forms() {
        assert_eq!(DateTimePeriod::ZERO.to_string(), "P0D");
        assert_eq!(
            DateTimePeriod::new(1, 2, 3, 4, 5, 6, 7).unwrap().to_string(),
            "P1Y2M3DT4H5M6.000000007S"
        );
        assert_eq!(
            DateTimePeriod::new(0, -1, 0, 0, 0, 0, 0).unwrap().to_string(),
            "P-1M"
        );
        assert_eq!(
            DateTimePeriod::new(0, 0, 0, 0, 0, 30, 0).unwrap().to_string(),
            "PT30S"
        );
        assert_eq!(
            DateTimePeriod::new(0, 0, 0, 0, 0, 0, -500_000_000)
                .unwrap()
                .to_string(),
            "PT-0.5S"
        );
    }

    #[test]
    fn parse_round_trips() {
        for source in [
            "P0D",
            "P1Y2M3DT4H5M6.000000007S",
            "P-1M",
            "PT30S",
            "PT-0.5S",
            "P10DT-25H",
        ] {
            let period = DateTimePeriod::parse(source).unwrap();
            assert_eq!(
                DateTimePeriod::parse(&period.to_string()).unwrap(),
                period,
                "{source}"
            );
        }
        assert_eq!(
            DateTimePeriod::parse("-P1Y").unwrap(),
            DateTimePeriod::new(-1, 0, 0, 0, 0, 0, 0).unwrap()
        );
        assert_eq!(
            DateTimePeriod::parse("P2W").unwrap(),
            DateTimePeriod::new(0, 0, 14, 0, 0, 0, 0).unwrap()
        );
        for source in ["", "P", "1Y", "P1H", "PT1Y", "P1.5Y", "PT1.5M"] {
            assert!(DateTimePeriod::parse(source).is_err(), "accepted {source:?}");
        }
    }

    #[test]
    fn date_period_is_the_date_only_variant() {
        let period = DatePeriod::new(0, 26, 5).unwrap();
        assert_eq!((period.years(), period.months(), period.days()), (2, 2, 5));
        let full: DateTimePeriod = period.into();
        assert_eq!(full.hours(), 0);
        assert_eq!(full.total_months(), 26);
    }
}

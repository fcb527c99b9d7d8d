//! The `Instant` component: a point on the physical timeline.

use alloc::string::String;

use crate::format::iso;
use crate::format::DateTimeComponents;
use crate::utils;
use crate::{DateTimeError, DateTimeResult};

/// A point on the physical (UTC) timeline with nanosecond resolution.
///
/// The representable range covers roughly the years ±1,000,000,000.
/// Factory functions that take epoch quantities clamp to the boundary
/// instants instead of failing; arithmetic that would leave the range
/// fails with a `DateTimeArithmetic` error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Instant {
    epoch_seconds: i64,
    nanosecond: u32,
}

impl Instant {
    pub(crate) const MIN_SECOND: i64 = -31_557_014_167_219_200;
    pub(crate) const MAX_SECOND: i64 = 31_556_889_864_403_199;

    /// The earliest representable instant.
    pub const MIN: Self = Self {
        epoch_seconds: Self::MIN_SECOND,
        nanosecond: 0,
    };

    /// The latest representable instant.
    pub const MAX: Self = Self {
        epoch_seconds: Self::MAX_SECOND,
        nanosecond: 999_999_999,
    };

    /// The Unix epoch, 1970-01-01T00:00:00Z.
    pub const UNIX_EPOCH: Self = Self {
        epoch_seconds: 0,
        nanosecond: 0,
    };

    /// Creates an instant, failing when the second value is out of
    /// range.
    pub fn new(epoch_seconds: i64, nanosecond: u32) -> DateTimeResult<Self> {
        if !(Self::MIN_SECOND..=Self::MAX_SECOND).contains(&epoch_seconds) {
            return Err(DateTimeError::arithmetic()
                .with_message("instant is outside the representable range"));
        }
        if nanosecond > 999_999_999 {
            return Err(
                DateTimeError::illegal_argument().with_message("nanosecond out of range")
            );
        }
        Ok(Self {
            epoch_seconds,
            nanosecond,
        })
    }

    /// Creates an instant from epoch seconds and an arbitrary
    /// nanosecond adjustment, clamping to the boundary instants when
    /// the result leaves the range.
    pub fn from_epoch_seconds(epoch_seconds: i64, nanosecond_adjustment: i64) -> Self {
        let seconds = epoch_seconds.checked_add(nanosecond_adjustment.div_euclid(1_000_000_000));
        let nanosecond = nanosecond_adjustment.rem_euclid(1_000_000_000) as u32;
        match seconds {
            Some(seconds) if seconds > Self::MAX_SECOND => Self::MAX,
            Some(seconds) if seconds < Self::MIN_SECOND => Self::MIN,
            Some(seconds) => Self {
                epoch_seconds: seconds,
                nanosecond,
            },
            None if nanosecond_adjustment > 0 => Self::MAX,
            None => Self::MIN,
        }
    }

    /// Creates an instant from milliseconds since the epoch, clamping
    /// at the boundaries.
    pub fn from_epoch_milliseconds(epoch_milliseconds: i64) -> Self {
        Self::from_epoch_seconds(
            epoch_milliseconds.div_euclid(1000),
            epoch_milliseconds.rem_euclid(1000) * 1_000_000,
        )
    }

    /// Seconds since the epoch; negative for instants before it.
    pub fn epoch_seconds(&self) -> i64 {
        self.epoch_seconds
    }

    /// The nanosecond within the second, `0..=999_999_999`.
    pub fn nanosecond_of_second(&self) -> u32 {
        self.nanosecond
    }

    /// Milliseconds since the epoch, saturating at the `i64` range and
    /// truncating toward negative infinity.
    pub fn to_epoch_milliseconds(&self) -> i64 {
        self.epoch_seconds
            .checked_mul(1000)
            .and_then(|millis| millis.checked_add(i64::from(self.nanosecond) / 1_000_000))
            .unwrap_or(if self.epoch_seconds < 0 {
                i64::MIN
            } else {
                i64::MAX
            })
    }

    /// Adds a number of seconds, failing on range overflow.
    pub fn plus_seconds(&self, seconds: i64) -> DateTimeResult<Self> {
        let total = self
            .epoch_seconds
            .checked_add(seconds)
            .ok_or_else(|| DateTimeError::arithmetic().with_message("instant overflow"))?;
        Self::new(total, self.nanosecond)
    }

    /// Adds a number of nanoseconds, failing on range overflow.
    pub fn plus_nanoseconds(&self, nanoseconds: i64) -> DateTimeResult<Self> {
        let total = i128::from(self.epoch_seconds) * 1_000_000_000
            + i128::from(self.nanosecond)
            + i128::from(nanoseconds);
        let seconds = i64::try_from(total.div_euclid(1_000_000_000))
            .map_err(|_| DateTimeError::arithmetic().with_message("instant overflow"))?;
        Self::new(seconds, total.rem_euclid(1_000_000_000) as u32)
    }

    pub(crate) fn plus_time_nanoseconds(&self, nanoseconds: i128) -> DateTimeResult<Self> {
        let total = i128::from(self.epoch_seconds) * 1_000_000_000
            + i128::from(self.nanosecond)
            + nanoseconds;
        let seconds = i64::try_from(total.div_euclid(1_000_000_000))
            .map_err(|_| DateTimeError::arithmetic().with_message("instant overflow"))?;
        Self::new(seconds, total.rem_euclid(1_000_000_000) as u32)
    }

    /// Total nanoseconds from `self` to `other`.
    pub(crate) fn nanoseconds_until(&self, other: &Instant) -> i128 {
        (i128::from(other.epoch_seconds) - i128::from(self.epoch_seconds)) * 1_000_000_000
            + i128::from(other.nanosecond)
            - i128::from(self.nanosecond)
    }

    /// Parses an instant from its ISO form, a date-time with a UTC
    /// offset, e.g. `2020-12-09T09:16:56.000124Z`.
    pub fn parse(source: &str) -> DateTimeResult<Self> {
        iso::iso_date_time_offset().parse(source)?.to_instant()
    }

    pub(crate) fn to_components(self) -> DateTimeComponents {
        // Instants reach one year past the `LocalDate` range, so the
        // field bag is populated from the raw equations instead of
        // going through the value types.
        let days = self.epoch_seconds.div_euclid(utils::SECONDS_PER_DAY);
        let (year, month, day) = utils::ymd_from_epoch_days(days);
        let second_of_day = self.epoch_seconds.rem_euclid(utils::SECONDS_PER_DAY);
        let mut components = DateTimeComponents::new();
        components.year = Some(year);
        components.month_number = Some(month);
        components.day_of_month = Some(day);
        components.hour = Some((second_of_day / 3600) as u8);
        components.minute = Some((second_of_day / 60 % 60) as u8);
        components.second = Some((second_of_day % 60) as u8);
        components.nanosecond = Some(self.nanosecond);
        components.offset_seconds = Some(0);
        components
    }
}

impl core::fmt::Display for Instant {
    /// The ISO instant form in UTC, with the fraction grouped into
    /// multiples of three digits.
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let mut formatted = String::new();
        if let Ok(rendered) = iso::iso_instant().format(&self.to_components()) {
            formatted = rendered;
        }
        f.write_str(&formatted)
    }
}

impl core::str::FromStr for Instant {
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
    fn epoch_factories_clamp() {
        let instant = Instant::from_epoch_seconds(0, -1);
        assert_eq!(instant.epoch_seconds(), -1);
        assert_eq!(instant.nanosecond_of_second(), 999_999_999);

        assert_eq!(Instant::from_epoch_seconds(i64::MAX, 0), Instant::MAX);
        assert_eq!(Instant::from_epoch_seconds(i64::MIN, 0), Instant::MIN);
        assert_eq!(
            Instant::from_epoch_seconds(Instant::MAX_SECOND, 1_000_000_000),
            Instant::MAX
        );
    }

    #[test]
    fn millisecond_round_trip() {
        for millis in [0i64, 1, -1, 1_607_505_416_124, -9_999_999_999] {
            assert_eq!(
                Instant::from_epoch_milliseconds(millis).to_epoch_milliseconds(),
                millis
            );
        }
    }

    #[test]
    fn parses_iso_instants() {
        let instant = Instant::parse("2020-12-09T09:16:56.000124Z").unwrap();
        assert_eq!(instant.epoch_seconds(), 1_607_505_416);
        assert_eq!(instant.nanosecond_of_second(), 124_000);

        // An explicit offset shifts the epoch value.
        let with_offset = Instant::parse("2020-12-09T10:16:56.000124+01:00").unwrap();
        assert_eq!(with_offset, instant);

        assert!(Instant::parse("2020-12-09T09:16:56").is_err());
        assert!(Instant::parse("2020-13-09T09:16:56Z").is_err());
    }

    #[test]
    fn display_round_trips() {
        for source in [
            "2020-12-09T09:16:56.000124Z",
            "2020-12-09T09:16:56Z",
            "1970-01-01T00:00:00Z",
            "1969-12-31T23:59:59.999999999Z",
            "2019-10-27T00:59:00Z",
            "-0044-03-15T12:00:00Z",
        ] {
            let instant = Instant::parse(source).unwrap();
            assert_eq!(instant.to_string(), source);
            assert_eq!(Instant::parse(&instant.to_string()).unwrap(), instant);
        }
    }

    #[test]
    fn ordering_follows_the_timeline() {
        let a = Instant::new(10, 999_999_999).unwrap();
        let b = Instant::new(11, 0).unwrap();
        assert!(a < b);
        assert!(Instant::MIN < Instant::UNIX_EPOCH && Instant::UNIX_EPOCH < Instant::MAX);
    }

    #[test]
    fn nanosecond_arithmetic() {
        let instant = Instant::new(0, 500_000_000).unwrap();
        assert_eq!(
            instant.plus_nanoseconds(600_000_000).unwrap(),
            Instant::new(1, 100_000_000).unwrap()
        );
        assert_eq!(
            instant.plus_nanoseconds(-600_000_000).unwrap(),
            Instant::new(-1, 900_000_000).unwrap()
        );
        assert!(Instant::MAX.plus_seconds(1).is_err());
    }
}

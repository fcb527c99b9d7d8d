//! Calendar arithmetic on instants, anchored in a time zone.
//!
//! Calendar units have no fixed physical length, so adding them to an
//! instant goes through the zone's local timeline: months first, then
//! days, each re-resolved through the zone, and finally the clock-time
//! remainder directly on the physical timeline.

use crate::period::DateTimePeriod;
use crate::timezone::LocalTimeResolver;
use crate::unit::DateTimeUnit;
use crate::{DateTimeError, DateTimeResult, Instant, LocalDateTime, TimeZone};

impl Instant {
    /// Adds a calendar period in the given zone: months, then days,
    /// then the sub-day remainder. Gapped intermediate results shift
    /// forward; overlapping ones prefer the offset the walk started
    /// in.
    pub fn plus_period(&self, period: &DateTimePeriod, zone: &TimeZone) -> DateTimeResult<Instant> {
        let mut current = *self;
        let months = period.total_months();
        if months != 0 {
            current = add_months(&current, months, zone)?;
        }
        if period.days() != 0 {
            current = add_days(&current, i64::from(period.days()), zone)?;
        }
        let nanos = period.total_time_nanoseconds();
        if nanos != 0 {
            current = current.plus_time_nanoseconds(nanos)?;
        }
        Ok(current)
    }

    /// Adds `count` of `unit` in the given zone.
    pub fn plus_unit(
        &self,
        count: i64,
        unit: DateTimeUnit,
        zone: &TimeZone,
    ) -> DateTimeResult<Instant> {
        match unit {
            DateTimeUnit::TimeBased { nanoseconds } => {
                self.plus_time_nanoseconds(i128::from(count) * i128::from(nanoseconds))
            }
            DateTimeUnit::DayBased { days } => {
                let scaled = count
                    .checked_mul(i64::from(days))
                    .ok_or_else(|| DateTimeError::arithmetic().with_message("day overflow"))?;
                add_days(self, scaled, zone)
            }
            DateTimeUnit::MonthBased { months } => {
                let scaled = count
                    .checked_mul(i64::from(months))
                    .ok_or_else(|| DateTimeError::arithmetic().with_message("month overflow"))?;
                add_months(self, scaled, zone)
            }
        }
    }

    /// The calendar difference from `self` to `other` in the given
    /// zone: whole months, then whole days, then the nanosecond
    /// remainder (always under a day in magnitude).
    pub fn period_until(
        &self,
        other: &Instant,
        zone: &TimeZone,
    ) -> DateTimeResult<DateTimePeriod> {
        let start = self.to_local_date_time(zone)?;
        let end = other.to_local_date_time(zone)?;

        let months = months_between(&start, &end)?;
        let mid = add_months(self, months, zone)?;

        let mid_local = mid.to_local_date_time(zone)?;
        let days = days_between(&mid_local, &end)?;
        let mid = add_days(&mid, days, zone)?;

        let nanoseconds = mid.nanoseconds_until(other);
        DateTimePeriod::new(
            i32::try_from(months / 12)
                .map_err(|_| DateTimeError::arithmetic().with_message("period years overflow"))?,
            (months % 12) as i32,
            i32::try_from(days)
                .map_err(|_| DateTimeError::arithmetic().with_message("period days overflow"))?,
            0,
            0,
            0,
            nanoseconds as i64,
        )
    }

    /// The number of whole `unit`s from `self` to `other`. Date-based
    /// units measure on the zone's local timeline, time-based units
    /// directly on the physical one.
    pub fn until(
        &self,
        other: &Instant,
        unit: DateTimeUnit,
        zone: &TimeZone,
    ) -> DateTimeResult<i64> {
        match unit {
            DateTimeUnit::TimeBased { nanoseconds } => {
                let total = self.nanoseconds_until(other) / i128::from(nanoseconds);
                Ok(total.clamp(i128::from(i64::MIN), i128::from(i64::MAX)) as i64)
            }
            DateTimeUnit::MonthBased { months } => {
                let start = self.to_local_date_time(zone)?;
                let end = other.to_local_date_time(zone)?;
                Ok(months_between(&start, &end)? / i64::from(months))
            }
            DateTimeUnit::DayBased { days } => {
                let start = self.to_local_date_time(zone)?;
                let end = other.to_local_date_time(zone)?;
                Ok(days_between(&start, &end)? / i64::from(days))
            }
        }
    }
}

fn add_months(instant: &Instant, months: i64, zone: &TimeZone) -> DateTimeResult<Instant> {
    let original_offset = zone.offset_at(*instant);
    let local = instant.to_local_date_time(zone)?;
    let shifted = local.date().plus_months(months)?.at_time(local.time());
    Ok(shifted.to_instant_with_resolver(zone, LocalTimeResolver::PreferOffset(original_offset)))
}

fn add_days(instant: &Instant, days: i64, zone: &TimeZone) -> DateTimeResult<Instant> {
    let original_offset = zone.offset_at(*instant);
    let local = instant.to_local_date_time(zone)?;
    let shifted = local.date().plus_days(days)?.at_time(local.time());
    Ok(shifted.to_instant_with_resolver(zone, LocalTimeResolver::PreferOffset(original_offset)))
}

/// Whole months between two local date-times; a month that only
/// completes up to the time of day does not count.
fn months_between(start: &LocalDateTime, end: &LocalDateTime) -> DateTimeResult<i64> {
    let mut months = start.date().months_until(&end.date());
    let candidate = start.date().plus_months(months)?.at_time(start.time());
    if months > 0 && candidate > *end {
        months -= 1;
    } else if months < 0 && candidate < *end {
        months += 1;
    }
    Ok(months)
}

/// Whole days between two local date-times.
fn days_between(start: &LocalDateTime, end: &LocalDateTime) -> DateTimeResult<i64> {
    let mut days = start.date().days_until(&end.date());
    let candidate = start.date().plus_days(days)?.at_time(start.time());
    if days > 0 && candidate > *end {
        days -= 1;
    } else if days < 0 && candidate < *end {
        days += 1;
    }
    Ok(days)
}

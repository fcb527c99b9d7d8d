//! Utility date equations shared by the codecs and the rules engine.
//!
//! Epoch days are relative to 1970-01-01 and carried as `i64` so that
//! the full proleptic year range survives the math.

pub(crate) const SECONDS_PER_DAY: i64 = 86_400;

/// Returns `true` if the year is a leap year.
pub(crate) fn is_leap_year(year: i32) -> bool {
    year % 4 == 0 && (year % 100 != 0 || year % 400 == 0)
}

/// Returns the number of days the given month has (1-based).
pub(crate) fn days_in_month(year: i32, month: u8) -> u8 {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        2 => 28 + u8::from(is_leap_year(year)),
        _ => 0,
    }
}

/// Days since the epoch of the given gregorian date.
pub(crate) fn epoch_days_from_ymd(year: i32, month: u8, day: u8) -> i64 {
    let y = i64::from(year) - i64::from(month <= 2);
    let era = y.div_euclid(400);
    let year_of_era = y - era * 400;
    let day_of_year = (153 * (i64::from(month) + if month > 2 { -3 } else { 9 }) + 2) / 5
        + i64::from(day)
        - 1;
    let day_of_era = year_of_era * 365 + year_of_era / 4 - year_of_era / 100 + day_of_year;
    era * 146_097 + day_of_era - 719_468
}

/// The gregorian date of the given epoch day.
pub(crate) fn ymd_from_epoch_days(days: i64) -> (i32, u8, u8) {
    let shifted = days + 719_468;
    let era = shifted.div_euclid(146_097);
    let day_of_era = shifted - era * 146_097;
    let year_of_era =
        (day_of_era - day_of_era / 1460 + day_of_era / 36_524 - day_of_era / 146_096) / 365;
    let year = year_of_era + era * 400;
    let day_of_year = day_of_era - (365 * year_of_era + year_of_era / 4 - year_of_era / 100);
    let mp = (5 * day_of_year + 2) / 153;
    let day = (day_of_year - (153 * mp + 2) / 5 + 1) as u8;
    let month = if mp < 10 { mp + 3 } else { mp - 9 } as u8;
    ((year + i64::from(month <= 2)) as i32, month, day)
}

/// Days since the epoch of January 1st of the given year.
pub(crate) fn epoch_days_for_year(year: i32) -> i64 {
    epoch_days_from_ymd(year, 1, 1)
}

/// Day of the week of the given epoch day, 0 = Sunday .. 6 = Saturday.
pub(crate) fn day_of_week(epoch_days: i64) -> u8 {
    (epoch_days + 4).rem_euclid(7) as u8
}

/// The year an epoch-seconds value falls in.
pub(crate) fn year_from_epoch_seconds(seconds: i64) -> i32 {
    ymd_from_epoch_days(seconds.div_euclid(SECONDS_PER_DAY)).0
}

/// Epoch day of the n-th `day_of_week` (0 = Sunday) on or after the first
/// of the month. Spills past the end of the month are pulled back a week.
pub(crate) fn nth_day_of_week_in_month(year: i32, month: u8, week: u8, dow: u8) -> i64 {
    let first = epoch_days_from_ymd(year, month, 1);
    let first_dow = day_of_week(first);
    let mut day0 = i64::from((dow + 7 - first_dow) % 7) + i64::from(week - 1) * 7;
    if day0 >= i64::from(days_in_month(year, month)) {
        day0 -= 7;
    }
    first + day0
}

/// Epoch day of the last `day_of_week` (0 = Sunday) of the month at or
/// before `bound` (defaults to the end of the month).
pub(crate) fn last_day_of_week_in_month(year: i32, month: u8, dow: u8, bound: Option<u8>) -> i64 {
    let start = bound.unwrap_or_else(|| days_in_month(year, month));
    let anchor = epoch_days_from_ymd(year, month, start);
    anchor - i64::from((day_of_week(anchor) + 7 - dow) % 7)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn epoch_day_round_trips() {
        let cases = [
            (1970, 1, 1, 0),
            (1969, 12, 31, -1),
            (2000, 2, 29, 11_016),
            (2020, 12, 9, 18_605),
            (1600, 3, 1, -135_080),
            (-4713, 11, 24, -2_440_588),
        ];
        for (year, month, day, days) in cases {
            assert_eq!(epoch_days_from_ymd(year, month, day), days);
            assert_eq!(ymd_from_epoch_days(days), (year, month, day));
        }
    }

    #[test]
    fn epoch_day_round_trips_far_range() {
        for days in (-400_000_000_000i64..400_000_000_000).step_by(7_777_777_777) {
            let (y, m, d) = ymd_from_epoch_days(days);
            assert_eq!(epoch_days_from_ymd(y, m, d), days);
        }
    }

    #[test]
    fn day_of_week_anchors() {
        // 1970-01-01 was a Thursday.
        assert_eq!(day_of_week(0), 4);
        // 2019-10-27 was a Sunday.
        assert_eq!(day_of_week(epoch_days_from_ymd(2019, 10, 27)), 0);
    }

    #[test]
    fn nth_and_last_weekday() {
        // Second Sunday of March 2017 was the 12th.
        assert_eq!(
            nth_day_of_week_in_month(2017, 3, 2, 0),
            epoch_days_from_ymd(2017, 3, 12)
        );
        // Last Sunday of October 2019 was the 27th.
        assert_eq!(
            last_day_of_week_in_month(2019, 10, 0, None),
            epoch_days_from_ymd(2019, 10, 27)
        );
        // Last Sunday of March 2040 is the 25th.
        assert_eq!(
            last_day_of_week_in_month(2040, 3, 0, None),
            epoch_days_from_ymd(2040, 3, 25)
        );
    }
}

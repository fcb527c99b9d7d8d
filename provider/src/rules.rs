//! The time zone rules engine.
//!
//! A [`TimeZoneRules`] is a compact in-memory representation of a zone:
//! the explicit historical transitions plus an optional pair of
//! recurring yearly rules covering everything after the last explicit
//! transition. The engine answers two questions:
//!
//! - which offset is in effect at a given instant
//!   ([`TimeZoneRules::offset_info_at`]), and
//! - which offsets could a given local wall-clock time correspond to
//!   ([`TimeZoneRules::resolve_local`]), resolving the gaps and
//!   overlaps that DST transitions punch into local time.
//!
//! Local date-times are carried as "local seconds": the seconds value
//! the date-time would have as an epoch timestamp if it were UTC.

use alloc::vec::Vec;

use crate::utils;
use crate::{TzdbError, TzdbResult};

/// Seconds east of UTC. The amount of seconds added to UTC to reach
/// local time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct UtcOffsetSeconds(pub i32);

/// Offsets past 18 hours cannot be represented as a `UtcOffset`.
pub(crate) const MAX_OFFSET_SECONDS: i32 = 18 * 3600;

/// The moment within a year at which a recurring transition fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthDayTime {
    pub date: DateOfYear,
    pub time: TransitionLocalTime,
    pub resolver: TimeOffsetResolver,
}

/// The date half of a [`MonthDayTime`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateOfYear {
    /// Day of the year 1..=365, February 29 never counted.
    JulianDayOfYear(u16),
    /// Zero-based day of the year 0..=365, February 29 counted in leap
    /// years.
    JulianDayOfYear0(u16),
    /// A day within a month.
    MonthDayOfYear { month: u8, day: TransitionDay },
}

/// The day-of-month selector of a [`DateOfYear::MonthDayOfYear`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionDay {
    /// An exact day of the month.
    ExactlyDayOfMonth(u8),
    /// The n-th (1..=4) `day_of_week` (0 = Sunday) on or after the
    /// first of the month.
    Nth { day_of_week: u8, week: u8 },
    /// The last `day_of_week` of the month, optionally walking back
    /// from `bound` instead of the end of the month.
    Last { day_of_week: u8, bound: Option<u8> },
}

/// Wall-clock time of day of a transition. `hour == 24` means midnight
/// of the next day; POSIX TZ extensions allow hours outside 0..=24.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransitionLocalTime {
    pub hour: i32,
    pub minute: u8,
    pub second: u8,
}

impl TransitionLocalTime {
    pub const fn new(hour: i32, minute: u8, second: u8) -> Self {
        Self {
            hour,
            minute,
            second,
        }
    }

    /// Seconds since (or before) local midnight. A negative hour pulls
    /// the minute and second parts along with it.
    pub fn total_seconds(&self) -> i32 {
        let magnitude =
            self.hour.abs() * 3600 + i32::from(self.minute) * 60 + i32::from(self.second);
        if self.hour < 0 {
            -magnitude
        } else {
            magnitude
        }
    }
}

/// How the wall-clock time of a transition is anchored to UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeOffsetResolver {
    /// Relative to the offset in effect just before the transition.
    WallClock,
    /// Relative to the zone's standard offset.
    Standard,
    /// Relative to UTC.
    Utc,
}

impl MonthDayTime {
    /// The epoch day this transition falls on in `year`.
    fn epoch_days_for_year(&self, year: i32) -> i64 {
        match self.date {
            DateOfYear::JulianDayOfYear(day) => {
                // 1 = Jan 1, 60 = Mar 1 regardless of leap years.
                let leap = utils::is_leap_year(year) && day > 59;
                utils::epoch_days_for_year(year) + i64::from(day) - 1 + i64::from(leap)
            }
            DateOfYear::JulianDayOfYear0(day) => utils::epoch_days_for_year(year) + i64::from(day),
            DateOfYear::MonthDayOfYear { month, day } => match day {
                TransitionDay::ExactlyDayOfMonth(d) => utils::epoch_days_from_ymd(year, month, d),
                TransitionDay::Nth { day_of_week, week } => {
                    utils::nth_day_of_week_in_month(year, month, week, day_of_week)
                }
                TransitionDay::Last { day_of_week, bound } => {
                    utils::last_day_of_week_in_month(year, month, day_of_week, bound)
                }
            },
        }
    }

    /// The epoch seconds this transition fires at in `year`, given the
    /// offset in effect just before it and the zone's standard offset.
    pub fn epoch_seconds_for_year(
        &self,
        year: i32,
        offset_before: UtcOffsetSeconds,
        standard: UtcOffsetSeconds,
    ) -> i64 {
        let local = self.epoch_days_for_year(year) * utils::SECONDS_PER_DAY
            + i64::from(self.time.total_seconds());
        let anchor = match self.resolver {
            TimeOffsetResolver::WallClock => offset_before.0,
            TimeOffsetResolver::Standard => standard.0,
            TimeOffsetResolver::Utc => 0,
        };
        local - i64::from(anchor)
    }
}

/// One of the two rules of a [`RecurringZoneRules`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecurringRule {
    pub transition: MonthDayTime,
    pub offset_before: UtcOffsetSeconds,
    pub offset_after: UtcOffsetSeconds,
}

/// The recurring yearly rule pair in effect after the last explicit
/// transition: `rules[0]` enters the alternate (DST) offset, `rules[1]`
/// returns to standard time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecurringZoneRules {
    pub rules: [RecurringRule; 2],
}

impl RecurringZoneRules {
    /// The standard offset, i.e. the offset the rule pair returns to.
    pub fn standard_offset(&self) -> UtcOffsetSeconds {
        self.rules[1].offset_after
    }

    /// Both transitions of `year` with their surrounding offsets,
    /// ordered by epoch seconds. The southern hemisphere places the
    /// return-to-standard transition first.
    pub(crate) fn transitions_for_year(
        &self,
        year: i32,
    ) -> [(i64, UtcOffsetSeconds, UtcOffsetSeconds); 2] {
        let standard = self.standard_offset();
        let mut out = self.rules.map(|rule| {
            (
                rule.transition
                    .epoch_seconds_for_year(year, rule.offset_before, standard),
                rule.offset_before,
                rule.offset_after,
            )
        });
        if out[0].0 > out[1].0 {
            out.swap(0, 1);
        }
        out
    }
}

/// Information about the offset in effect at an instant and the
/// transition that put it into effect (`None` before the first known
/// transition).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeZoneTransitionInfo {
    pub transition_epoch: Option<i64>,
    pub offset: UtcOffsetSeconds,
}

/// A transition as seen from the local timeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocalTransition {
    /// The instant the transition fires at.
    pub transition_epoch: i64,
    pub offset_before: UtcOffsetSeconds,
    pub offset_after: UtcOffsetSeconds,
}

impl LocalTransition {
    /// Seconds of local time the transition removes (positive) or
    /// repeats (negative).
    pub fn transition_duration_seconds(&self) -> i32 {
        self.offset_after.0 - self.offset_before.0
    }
}

/// The outcome of mapping a local date-time onto the physical timeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocalResolution {
    /// A unique offset applies.
    Regular(UtcOffsetSeconds),
    /// The local time does not exist; it was skipped by a forward
    /// transition.
    Gap(LocalTransition),
    /// The local time exists twice; it was repeated by a backward
    /// transition.
    Overlap(LocalTransition),
}

/// Per-zone transition data. Immutable after construction and shared by
/// every zone handle referring to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeZoneRules {
    /// Strictly increasing epoch seconds of the explicit transitions.
    transitions: Vec<i64>,
    /// `offsets[i]` is in effect on `[transitions[i - 1], transitions[i])`,
    /// with implicit infinite endpoints; `len == transitions.len() + 1`.
    offsets: Vec<UtcOffsetSeconds>,
    /// Recurring rules for everything after the last explicit transition.
    recurring: Option<RecurringZoneRules>,
}

impl TimeZoneRules {
    /// Builds a rules table, validating the transition/offset shape.
    pub fn new(
        transitions: Vec<i64>,
        offsets: Vec<UtcOffsetSeconds>,
        recurring: Option<RecurringZoneRules>,
    ) -> TzdbResult<Self> {
        if offsets.len() != transitions.len() + 1 {
            return Err(TzdbError::invalid_format(
                "offset count must exceed transition count by one",
            ));
        }
        if transitions.windows(2).any(|pair| pair[0] >= pair[1]) {
            return Err(TzdbError::invalid_format(
                "transition times must be strictly increasing",
            ));
        }
        if offsets
            .iter()
            .any(|offset| offset.0.abs() > MAX_OFFSET_SECONDS)
        {
            return Err(TzdbError::invalid_format("offset exceeds 18 hours"));
        }
        Ok(Self {
            transitions,
            offsets,
            recurring,
        })
    }

    /// A rules table with a single fixed offset and no transitions.
    pub fn fixed(offset: UtcOffsetSeconds) -> Self {
        Self {
            transitions: Vec::new(),
            offsets: alloc::vec![offset],
            recurring: None,
        }
    }

    pub fn transitions(&self) -> &[i64] {
        &self.transitions
    }

    pub fn offsets(&self) -> &[UtcOffsetSeconds] {
        &self.offsets
    }

    pub fn recurring(&self) -> Option<&RecurringZoneRules> {
        self.recurring.as_ref()
    }

    fn tail_offset(&self) -> UtcOffsetSeconds {
        // The constructor guarantees at least one offset.
        *self.offsets.last().unwrap_or(&UtcOffsetSeconds(0))
    }

    /// The offset in effect at the given instant.
    pub fn offset_at(&self, epoch_seconds: i64) -> UtcOffsetSeconds {
        self.offset_info_at(epoch_seconds).offset
    }

    /// The offset in effect at the given instant along with the
    /// transition that established it.
    pub fn offset_info_at(&self, epoch_seconds: i64) -> TimeZoneTransitionInfo {
        let idx = self.transitions.partition_point(|&t| t <= epoch_seconds);
        if idx == self.transitions.len() {
            if let Some(recurring) = &self.recurring {
                return self.recurring_offset_at(recurring, epoch_seconds);
            }
        }
        TimeZoneTransitionInfo {
            transition_epoch: idx.checked_sub(1).map(|i| self.transitions[i]),
            offset: self.offsets[idx],
        }
    }

    fn recurring_offset_at(
        &self,
        recurring: &RecurringZoneRules,
        epoch_seconds: i64,
    ) -> TimeZoneTransitionInfo {
        let last_explicit = self.transitions.last().copied();
        // Approximate the local year; the year-straddling candidates
        // cover the error of the approximation.
        let year = utils::year_from_epoch_seconds(
            epoch_seconds.saturating_add(i64::from(recurring.standard_offset().0)),
        );
        let mut latest: Option<(i64, UtcOffsetSeconds)> = None;
        for candidate_year in year - 1..=year + 1 {
            for (epoch, _, after) in recurring.transitions_for_year(candidate_year) {
                if last_explicit.is_some_and(|last| epoch <= last) {
                    continue;
                }
                if epoch <= epoch_seconds && latest.is_none_or(|(t, _)| epoch > t) {
                    latest = Some((epoch, after));
                }
            }
        }
        match latest {
            Some((epoch, offset)) => TimeZoneTransitionInfo {
                transition_epoch: Some(epoch),
                offset,
            },
            None => TimeZoneTransitionInfo {
                transition_epoch: last_explicit,
                offset: self.tail_offset(),
            },
        }
    }

    /// The first transition strictly after the given instant, if any.
    pub fn next_transition(&self, epoch_seconds: i64) -> Option<i64> {
        let idx = self.transitions.partition_point(|&t| t <= epoch_seconds);
        if idx < self.transitions.len() {
            return Some(self.transitions[idx]);
        }
        let recurring = self.recurring.as_ref()?;
        let last_explicit = self.transitions.last().copied();
        let year = utils::year_from_epoch_seconds(
            epoch_seconds.saturating_add(i64::from(recurring.standard_offset().0)),
        );
        let mut earliest: Option<i64> = None;
        for candidate_year in year - 1..=year + 1 {
            for (epoch, _, _) in recurring.transitions_for_year(candidate_year) {
                if last_explicit.is_some_and(|last| epoch <= last) {
                    continue;
                }
                if epoch > epoch_seconds && earliest.is_none_or(|t| epoch < t) {
                    earliest = Some(epoch);
                }
            }
        }
        earliest
    }

    /// Maps local wall-clock seconds onto the physical timeline.
    ///
    /// A transition at `t` from `before` to `after` affects the local
    /// window `[t + min(before, after), t + max(before, after))`: a
    /// forward jump leaves a gap there, a backward jump an overlap.
    pub fn resolve_local(&self, local_seconds: i64) -> LocalResolution {
        let n = self.transitions.len();
        // Binary search on the window starts, then examine the
        // candidate and its neighbors.
        let mut lo = 0usize;
        let mut hi = n;
        while lo < hi {
            let mid = (lo + hi) / 2;
            let window_start = self.transitions[mid]
                + i64::from(self.offsets[mid].0.min(self.offsets[mid + 1].0));
            if window_start <= local_seconds {
                lo = mid + 1;
            } else {
                hi = mid;
            }
        }
        for idx in lo.saturating_sub(2)..lo.min(n) {
            let transition = LocalTransition {
                transition_epoch: self.transitions[idx],
                offset_before: self.offsets[idx],
                offset_after: self.offsets[idx + 1],
            };
            if let Some(resolution) = in_transition_window(&transition, local_seconds) {
                return resolution;
            }
        }

        // Not inside any explicit window, so the local time is regular
        // and `offsets[lo]` covers it: every window at or past `lo`
        // starts later, and the one before `lo` ends at or before the
        // local time.
        let covering = lo;
        if covering == n {
            if let Some(recurring) = &self.recurring {
                return self.resolve_local_recurring(recurring, local_seconds);
            }
        }
        LocalResolution::Regular(self.offsets[covering])
    }

    fn resolve_local_recurring(
        &self,
        recurring: &RecurringZoneRules,
        local_seconds: i64,
    ) -> LocalResolution {
        let last_explicit = self.transitions.last().copied();
        // Local seconds are the date-time reinterpreted as UTC, so the
        // year can be read off directly.
        let year = utils::year_from_epoch_seconds(local_seconds);
        let mut latest: Option<(i64, UtcOffsetSeconds)> = None;
        for candidate_year in year - 1..=year + 1 {
            for (epoch, before, after) in recurring.transitions_for_year(candidate_year) {
                if last_explicit.is_some_and(|last| epoch <= last) {
                    continue;
                }
                let transition = LocalTransition {
                    transition_epoch: epoch,
                    offset_before: before,
                    offset_after: after,
                };
                if let Some(resolution) = in_transition_window(&transition, local_seconds) {
                    return resolution;
                }
                if epoch + i64::from(after.0) <= local_seconds
                    && latest.is_none_or(|(t, _)| epoch > t)
                {
                    latest = Some((epoch, after));
                }
            }
        }
        match latest {
            Some((_, offset)) => LocalResolution::Regular(offset),
            None => LocalResolution::Regular(self.tail_offset()),
        }
    }
}

fn in_transition_window(
    transition: &LocalTransition,
    local_seconds: i64,
) -> Option<LocalResolution> {
    let before = i64::from(transition.offset_before.0);
    let after = i64::from(transition.offset_after.0);
    let window = (transition.transition_epoch + before.min(after))
        ..(transition.transition_epoch + before.max(after));
    if !window.contains(&local_seconds) {
        return None;
    }
    if after > before {
        Some(LocalResolution::Gap(*transition))
    } else {
        Some(LocalResolution::Overlap(*transition))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::epoch_days_from_ymd;

    fn local_seconds(year: i32, month: u8, day: u8, hour: i64, minute: i64) -> i64 {
        epoch_days_from_ymd(year, month, day) * 86_400 + hour * 3600 + minute * 60
    }

    /// Central European Time with the EU rule pair, as a recurring-only
    /// table.
    fn cet() -> TimeZoneRules {
        let std = UtcOffsetSeconds(3600);
        let dst = UtcOffsetSeconds(7200);
        let last_sunday = |month| MonthDayTime {
            date: DateOfYear::MonthDayOfYear {
                month,
                day: TransitionDay::Last {
                    day_of_week: 0,
                    bound: None,
                },
            },
            time: TransitionLocalTime::new(if month == 3 { 2 } else { 3 }, 0, 0),
            resolver: TimeOffsetResolver::WallClock,
        };
        let recurring = RecurringZoneRules {
            rules: [
                RecurringRule {
                    transition: last_sunday(3),
                    offset_before: std,
                    offset_after: dst,
                },
                RecurringRule {
                    transition: last_sunday(10),
                    offset_before: dst,
                    offset_after: std,
                },
            ],
        };
        TimeZoneRules::new(Vec::new(), alloc::vec![std], Some(recurring)).unwrap()
    }

    #[test]
    fn fixed_zone_is_always_regular() {
        let rules = TimeZoneRules::fixed(UtcOffsetSeconds(-18_000));
        assert_eq!(rules.offset_at(0), UtcOffsetSeconds(-18_000));
        assert_eq!(
            rules.resolve_local(1_000_000),
            LocalResolution::Regular(UtcOffsetSeconds(-18_000))
        );
    }

    #[test]
    fn spring_forward_gap() {
        let rules = cet();
        // 2040-03-25 02:30 falls into the 02:00 -> 03:00 jump.
        let resolution = rules.resolve_local(local_seconds(2040, 3, 25, 2, 30));
        let LocalResolution::Gap(transition) = resolution else {
            panic!("expected a gap, got {resolution:?}");
        };
        assert_eq!(transition.offset_before, UtcOffsetSeconds(3600));
        assert_eq!(transition.offset_after, UtcOffsetSeconds(7200));
        // The transition fires at 02:00 local, 01:00 UTC.
        assert_eq!(
            transition.transition_epoch,
            local_seconds(2040, 3, 25, 1, 0)
        );
        assert_eq!(transition.transition_duration_seconds(), 3600);
    }

    #[test]
    fn fall_back_overlap() {
        let rules = cet();
        // 2040-10-28 02:30 happens twice.
        let resolution = rules.resolve_local(local_seconds(2040, 10, 28, 2, 30));
        let LocalResolution::Overlap(transition) = resolution else {
            panic!("expected an overlap, got {resolution:?}");
        };
        assert_eq!(transition.offset_before, UtcOffsetSeconds(7200));
        assert_eq!(transition.offset_after, UtcOffsetSeconds(3600));
        assert_eq!(
            transition.transition_epoch,
            local_seconds(2040, 10, 28, 1, 0)
        );
    }

    #[test]
    fn regular_times_around_transitions() {
        let rules = cet();
        assert_eq!(
            rules.resolve_local(local_seconds(2040, 3, 25, 1, 59)),
            LocalResolution::Regular(UtcOffsetSeconds(3600))
        );
        assert_eq!(
            rules.resolve_local(local_seconds(2040, 3, 25, 3, 0)),
            LocalResolution::Regular(UtcOffsetSeconds(7200))
        );
        assert_eq!(
            rules.resolve_local(local_seconds(2040, 7, 1, 12, 0)),
            LocalResolution::Regular(UtcOffsetSeconds(7200))
        );
        assert_eq!(
            rules.resolve_local(local_seconds(2040, 12, 24, 12, 0)),
            LocalResolution::Regular(UtcOffsetSeconds(3600))
        );
    }

    #[test]
    fn instant_queries_follow_recurring_rules() {
        let rules = cet();
        // Noon UTC in July is CEST, in December CET.
        let summer = local_seconds(2040, 7, 1, 12, 0);
        assert_eq!(rules.offset_at(summer), UtcOffsetSeconds(7200));
        let winter = local_seconds(2040, 12, 24, 12, 0);
        assert_eq!(rules.offset_at(winter), UtcOffsetSeconds(3600));
        // Exactly at the spring transition instant the new offset holds.
        let transition = local_seconds(2040, 3, 25, 1, 0);
        assert_eq!(rules.offset_at(transition), UtcOffsetSeconds(7200));
        assert_eq!(rules.offset_at(transition - 1), UtcOffsetSeconds(3600));
    }

    #[test]
    fn explicit_transitions_take_precedence() {
        // One explicit transition from +00:00 to +01:00 at t = 1000.
        let rules = TimeZoneRules::new(
            alloc::vec![1000],
            alloc::vec![UtcOffsetSeconds(0), UtcOffsetSeconds(3600)],
            None,
        )
        .unwrap();
        assert_eq!(rules.offset_at(999), UtcOffsetSeconds(0));
        assert_eq!(rules.offset_at(1000), UtcOffsetSeconds(3600));
        assert_eq!(
            rules.offset_info_at(5000).transition_epoch,
            Some(1000),
        );
        // Local 1000..=1999 was skipped.
        assert!(matches!(
            rules.resolve_local(1500),
            LocalResolution::Gap(_)
        ));
        assert_eq!(
            rules.resolve_local(999),
            LocalResolution::Regular(UtcOffsetSeconds(0))
        );
        assert_eq!(
            rules.resolve_local(5000),
            LocalResolution::Regular(UtcOffsetSeconds(3600))
        );
    }

    #[test]
    fn next_transition_walks_into_recurring_rules() {
        let rules = cet();
        let before_spring = local_seconds(2040, 1, 1, 0, 0);
        assert_eq!(
            rules.next_transition(before_spring),
            Some(local_seconds(2040, 3, 25, 1, 0))
        );
        let after_spring = local_seconds(2040, 4, 1, 0, 0);
        assert_eq!(
            rules.next_transition(after_spring),
            Some(local_seconds(2040, 10, 28, 1, 0))
        );
    }

    #[test]
    fn malformed_tables_are_rejected() {
        assert!(TimeZoneRules::new(alloc::vec![5, 5], alloc::vec![], None).is_err());
        let err = TimeZoneRules::new(
            alloc::vec![5, 5],
            alloc::vec![
                UtcOffsetSeconds(0),
                UtcOffsetSeconds(0),
                UtcOffsetSeconds(0)
            ],
            None,
        )
        .unwrap_err();
        assert_eq!(err.kind(), crate::TzdbErrorKind::InvalidFormat);
    }
}

//! The `TimeZone` facade: mapping between instants and local
//! date-times under a zone's rules.

use alloc::format;
use alloc::string::{String, ToString};
use alloc::sync::Arc;

use tzdb_provider::rules::{LocalResolution, LocalTransition, TimeZoneRules, UtcOffsetSeconds};

use crate::{
    DateTimeError, DateTimeResult, Instant, LocalDate, LocalDateTime, LocalTime, UtcOffset,
};

/// A time zone: either a fixed offset from UTC or a region with a
/// rules table. Two zones are equal iff the variant and payload are
/// equal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TimeZone {
    /// A fixed offset with no transitions.
    Fixed(UtcOffset),
    /// An IANA region backed by shared, immutable rules.
    Region {
        id: String,
        rules: Arc<TimeZoneRules>,
    },
}

/// The outcome of mapping a local date-time under a zone's rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OffsetInfo {
    /// A unique offset applies.
    Regular(UtcOffset),
    /// The local time was skipped by a forward transition.
    Gap {
        start: Instant,
        offset_before: UtcOffset,
        offset_after: UtcOffset,
    },
    /// The local time is repeated by a backward transition.
    Overlap {
        start: Instant,
        offset_before: UtcOffset,
        offset_after: UtcOffset,
    },
}

/// How `LocalDateTime::to_instant` picks among the candidates of an
/// overlap. Gaps always resolve by shifting the local time forward by
/// the transition duration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LocalTimeResolver {
    /// The earlier candidate, i.e. the offset in effect before the
    /// transition.
    #[default]
    Earlier,
    /// The later candidate.
    Later,
    /// A preferred offset; falls back to the earlier candidate when it
    /// matches neither side of the overlap.
    PreferOffset(UtcOffset),
}

/// The raw outcome of resolving a local date-time, for callers that
/// want to observe gaps and overlaps instead of having them resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnambiguousInstant {
    /// Exactly one instant shows this local time.
    Unique(Instant),
    /// No instant shows this local time.
    Impossible,
    /// Two instants show this local time.
    Duplicate(Instant, Instant),
}

impl TimeZone {
    /// The UTC zone.
    pub const UTC: Self = Self::Fixed(UtcOffset::ZERO);

    /// A fixed-offset zone.
    pub fn fixed(offset: UtcOffset) -> Self {
        Self::Fixed(offset)
    }

    /// A region zone from an identifier and a rules table.
    pub fn region(id: impl Into<String>, rules: impl Into<Arc<TimeZoneRules>>) -> Self {
        Self::Region {
            id: id.into(),
            rules: rules.into(),
        }
    }

    /// Resolves a zone identifier: `"Z"`/`"UTC"`, a fixed offset, or a
    /// region known to the tzdb.
    #[cfg(feature = "tzdb")]
    pub fn of(id: &str) -> DateTimeResult<Self> {
        if id == "Z" || id == "UTC" {
            return Ok(Self::UTC);
        }
        if id.starts_with('+') || id.starts_with('-') {
            return Ok(Self::Fixed(UtcOffset::parse_lenient(id)?));
        }
        let rules = crate::tzdb::with_default_db(|db| db.get(id))?;
        Ok(Self::Region {
            id: String::from(id),
            rules,
        })
    }

    /// The zone the host is configured with. Never fails: when the
    /// host cannot name a zone the tzdb knows, the UTC fallback is
    /// returned and the reason logged.
    #[cfg(feature = "sys")]
    pub fn current_system_default() -> Self {
        let host_id = match crate::sys::system_time_zone_id() {
            Ok(id) => id,
            Err(error) => {
                log::warn!("host did not provide a time zone id: {error}");
                String::from("SYSTEM")
            }
        };
        if host_id != "SYSTEM" {
            match Self::of(&host_id) {
                Ok(zone) => return zone,
                Err(error) => {
                    log::warn!("host time zone '{host_id}' did not resolve: {error}");
                }
            }
        }
        if let Some(id) = crate::sys::platform_default_zone_id() {
            match Self::of(&id) {
                Ok(zone) => return zone,
                Err(error) => {
                    log::warn!("platform time zone '{id}' did not resolve: {error}");
                }
            }
        }
        log::warn!("falling back to the UTC time zone");
        Self::UTC
    }

    /// The zone's identifier. A fixed zero offset round-trips as
    /// `"UTC"`.
    pub fn id(&self) -> String {
        match self {
            Self::Fixed(offset) if offset.total_seconds() == 0 => String::from("UTC"),
            Self::Fixed(offset) => offset.to_string(),
            Self::Region { id, .. } => id.clone(),
        }
    }

    /// The offset in effect at the given instant.
    pub fn offset_at(&self, instant: Instant) -> UtcOffset {
        match self {
            Self::Fixed(offset) => *offset,
            Self::Region { rules, .. } => {
                from_offset_seconds(rules.offset_at(instant.epoch_seconds()))
            }
        }
    }

    /// Maps a local date-time onto the zone's timeline, reporting
    /// gaps and overlaps.
    pub fn offset_info(&self, datetime: &LocalDateTime) -> OffsetInfo {
        match self {
            Self::Fixed(offset) => OffsetInfo::Regular(*offset),
            Self::Region { rules, .. } => {
                match rules.resolve_local(datetime.local_seconds()) {
                    LocalResolution::Regular(offset) => {
                        OffsetInfo::Regular(from_offset_seconds(offset))
                    }
                    LocalResolution::Gap(transition) => OffsetInfo::Gap {
                        start: transition_start(&transition),
                        offset_before: from_offset_seconds(transition.offset_before),
                        offset_after: from_offset_seconds(transition.offset_after),
                    },
                    LocalResolution::Overlap(transition) => OffsetInfo::Overlap {
                        start: transition_start(&transition),
                        offset_before: from_offset_seconds(transition.offset_before),
                        offset_after: from_offset_seconds(transition.offset_after),
                    },
                }
            }
        }
    }
}

impl OffsetInfo {
    /// The seconds of local time the transition removes (positive for
    /// a gap) or repeats (negative for an overlap); zero when regular.
    pub fn transition_duration_seconds(&self) -> i32 {
        match self {
            Self::Regular(_) => 0,
            Self::Gap {
                offset_before,
                offset_after,
                ..
            }
            | Self::Overlap {
                offset_before,
                offset_after,
                ..
            } => offset_after.total_seconds() - offset_before.total_seconds(),
        }
    }
}

fn from_offset_seconds(offset: UtcOffsetSeconds) -> UtcOffset {
    // The rules engine enforces the ±18h bound on construction.
    UtcOffset::from_total_seconds(offset.0).unwrap_or(UtcOffset::ZERO)
}

fn transition_start(transition: &LocalTransition) -> Instant {
    Instant::from_epoch_seconds(transition.transition_epoch, 0)
}

impl Instant {
    /// The local date-time this instant shows in the given zone.
    /// Fails only for the margin instants whose local date leaves the
    /// `LocalDate` range.
    pub fn to_local_date_time(&self, zone: &TimeZone) -> DateTimeResult<LocalDateTime> {
        let offset = zone.offset_at(*self);
        let local_seconds = self.epoch_seconds() + i64::from(offset.total_seconds());
        LocalDateTime::from_local_seconds(local_seconds, self.nanosecond_of_second())
            .map_err(|_| {
                DateTimeError::arithmetic().with_message(format!(
                    "instant is outside the local date-time range in zone '{}'",
                    zone.id()
                ))
            })
    }
}

impl LocalDateTime {
    /// The instant this local date-time denotes under the given fixed
    /// offset.
    pub fn to_instant_with_offset(&self, offset: UtcOffset) -> Instant {
        Instant::from_epoch_seconds(
            self.local_seconds() - i64::from(offset.total_seconds()),
            i64::from(self.nanosecond()),
        )
    }

    /// The instant this local date-time denotes in the given zone,
    /// resolving overlaps to the earlier candidate and shifting gapped
    /// times forward by the transition duration.
    pub fn to_instant(&self, zone: &TimeZone) -> Instant {
        self.to_instant_with_resolver(zone, LocalTimeResolver::Earlier)
    }

    /// Like [`LocalDateTime::to_instant`] with an explicit overlap
    /// resolver.
    pub fn to_instant_with_resolver(&self, zone: &TimeZone, resolver: LocalTimeResolver) -> Instant {
        let offset = match zone.offset_info(self) {
            OffsetInfo::Regular(offset) => offset,
            // The skipped time maps to the instant it would have
            // denoted had the transition not happened, which lands
            // just past the transition.
            OffsetInfo::Gap { offset_before, .. } => offset_before,
            OffsetInfo::Overlap {
                offset_before,
                offset_after,
                ..
            } => match resolver {
                LocalTimeResolver::Earlier => offset_before,
                LocalTimeResolver::Later => offset_after,
                LocalTimeResolver::PreferOffset(preferred) => {
                    if preferred == offset_after {
                        offset_after
                    } else {
                        offset_before
                    }
                }
            },
        };
        self.to_instant_with_offset(offset)
    }
}

impl UnambiguousInstant {
    /// Surfaces the raw resolution outcome for a local date-time.
    pub fn of(datetime: &LocalDateTime, zone: &TimeZone) -> Self {
        match zone.offset_info(datetime) {
            OffsetInfo::Regular(offset) => {
                Self::Unique(datetime.to_instant_with_offset(offset))
            }
            OffsetInfo::Gap { .. } => Self::Impossible,
            OffsetInfo::Overlap {
                offset_before,
                offset_after,
                ..
            } => Self::Duplicate(
                datetime.to_instant_with_offset(offset_before),
                datetime.to_instant_with_offset(offset_after),
            ),
        }
    }
}

impl LocalDate {
    /// The first instant of this date in the given zone. When
    /// midnight falls into a gap, the transition instant itself is the
    /// start of the day.
    pub fn at_start_of_day_in(&self, zone: &TimeZone) -> Instant {
        let midnight = self.at_time(LocalTime::MIDNIGHT);
        match zone.offset_info(&midnight) {
            OffsetInfo::Regular(offset) => midnight.to_instant_with_offset(offset),
            OffsetInfo::Gap { start, .. } => start,
            OffsetInfo::Overlap { offset_before, .. } => {
                midnight.to_instant_with_offset(offset_before)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;
    use tzdb_provider::tzif::parse_tzif;

    fn zone(id: &str) -> TimeZone {
        let (_, bytes) = jiff_tzdb::get(id).unwrap();
        TimeZone::region(id, parse_tzif(bytes).unwrap())
    }

    fn ldt(
        year: i32,
        month: u8,
        day: u8,
        hour: u8,
        minute: u8,
    ) -> LocalDateTime {
        LocalDateTime::new(year, month, day, hour, minute, 0, 0).unwrap()
    }

    #[test]
    fn berlin_regular_resolution() {
        let berlin = zone("Europe/Berlin");
        let instant = ldt(2019, 10, 27, 2, 59).to_instant(&berlin);
        // Inside the fall-back overlap the earlier candidate wins.
        assert_eq!(instant.to_string(), "2019-10-27T00:59:00Z");
    }

    #[test]
    fn berlin_gap_shifts_forward() {
        let berlin = zone("Europe/Berlin");
        // 02:30 on the spring-forward day does not exist.
        let gapped = ldt(2020, 3, 29, 2, 30);
        let resolved = gapped.to_instant(&berlin);
        assert_eq!(
            resolved,
            ldt(2020, 3, 29, 3, 30).to_instant(&berlin),
            "gapped times resolve to the shifted wall time"
        );
        // Both sides of the gap are one hour apart on the timeline.
        assert_eq!(
            resolved.to_local_date_time(&berlin).unwrap(),
            ldt(2020, 3, 29, 3, 30)
        );
    }

    #[test]
    fn overlap_candidates_differ_by_the_transition() {
        let berlin = zone("Europe/Berlin");
        let ambiguous = ldt(2019, 10, 27, 2, 30);
        let UnambiguousInstant::Duplicate(first, second) =
            UnambiguousInstant::of(&ambiguous, &berlin)
        else {
            panic!("expected a duplicate");
        };
        assert_eq!(second.epoch_seconds() - first.epoch_seconds(), 3600);
        assert_eq!(
            ambiguous.to_instant_with_resolver(&berlin, LocalTimeResolver::Later),
            second
        );
        assert_eq!(
            ambiguous.to_instant_with_resolver(
                &berlin,
                LocalTimeResolver::PreferOffset(UtcOffset::from_hours(2).unwrap())
            ),
            first
        );
    }

    #[test]
    fn gap_resolution_is_impossible_raw() {
        let berlin = zone("Europe/Berlin");
        assert_eq!(
            UnambiguousInstant::of(&ldt(2020, 3, 29, 2, 30), &berlin),
            UnambiguousInstant::Impossible
        );
        assert!(matches!(
            UnambiguousInstant::of(&ldt(2020, 3, 29, 4, 0), &berlin),
            UnambiguousInstant::Unique(_)
        ));
    }

    #[test]
    fn fixed_offset_matches_region_in_regular_times() {
        let paris = zone("Europe/Paris");
        let datetime = ldt(2007, 10, 28, 2, 30);
        // Paris is at +02:00 before the fall-back transition.
        assert_eq!(
            datetime.to_instant(&paris),
            datetime.to_instant_with_offset(UtcOffset::from_hours(2).unwrap())
        );
    }

    #[test]
    fn round_trips_outside_transitions() {
        let berlin = zone("Europe/Berlin");
        for datetime in [
            ldt(2019, 6, 15, 12, 0),
            ldt(2019, 12, 15, 12, 0),
            ldt(1969, 7, 20, 20, 17),
            ldt(2045, 5, 1, 0, 0),
        ] {
            assert_eq!(
                datetime.to_instant(&berlin).to_local_date_time(&berlin).unwrap(),
                datetime,
                "{datetime}"
            );
        }
    }

    #[test]
    fn utc_round_trip() {
        let datetime = ldt(2020, 12, 9, 9, 16);
        assert_eq!(
            datetime
                .to_instant(&TimeZone::UTC)
                .to_local_date_time(&TimeZone::UTC)
                .unwrap(),
            datetime
        );
    }

    #[test]
    fn start_of_day_on_a_gap_day() {
        // Sao Paulo's 2018 DST start skipped midnight itself.
        let sao_paulo = zone("America/Sao_Paulo");
        let date = LocalDate::new(2018, 11, 4).unwrap();
        let start = date.at_start_of_day_in(&sao_paulo);
        assert_eq!(
            start.to_local_date_time(&sao_paulo).unwrap(),
            ldt(2018, 11, 4, 1, 0)
        );

        // An ordinary day starts at midnight.
        let date = LocalDate::new(2018, 6, 1).unwrap();
        assert_eq!(
            date.at_start_of_day_in(&sao_paulo)
                .to_local_date_time(&sao_paulo)
                .unwrap(),
            date.at_time(LocalTime::MIDNIGHT)
        );
    }

    #[test]
    fn zone_ids_round_trip() {
        assert_eq!(TimeZone::UTC.id(), "UTC");
        assert_eq!(
            TimeZone::fixed(UtcOffset::from_hours(2).unwrap()).id(),
            "+02:00"
        );
        assert_eq!(zone("Europe/Berlin").id(), "Europe/Berlin");
    }

    #[test]
    fn equality_follows_variant_and_payload() {
        assert_eq!(TimeZone::UTC, TimeZone::fixed(UtcOffset::ZERO));
        assert_ne!(
            TimeZone::fixed(UtcOffset::from_hours(1).unwrap()),
            TimeZone::UTC
        );
        assert_eq!(zone("Europe/Berlin"), zone("Europe/Berlin"));
        assert_ne!(zone("Europe/Berlin"), zone("Europe/Paris"));
    }
}

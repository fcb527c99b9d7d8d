//! Windows registry time zone data adapter.
//!
//! Windows keeps per-zone data under
//! `HKLM\SOFTWARE\Microsoft\Windows NT\CurrentVersion\Time Zones`: a
//! 44-byte `TZI` blob per zone plus optional per-year blobs under a
//! `Dynamic DST` subkey. Reading the registry is the host's job; this
//! module decodes the blobs and assembles the same [`TimeZoneRules`]
//! shape the TZif reader produces.
//!
//! `SYSTEMTIME` is interpreted per the Microsoft documentation:
//! `wYear == 0` marks a yearly recurring date where `wDay` selects the
//! n-th occurrence of `wDayOfWeek` in the month (5 = last), while a
//! nonzero `wYear` marks an absolute date.

use alloc::vec::Vec;

use crate::cursor::Cursor;
use crate::rules::{
    DateOfYear, MonthDayTime, RecurringRule, RecurringZoneRules, TimeOffsetResolver, TimeZoneRules,
    TransitionDay, TransitionLocalTime, UtcOffsetSeconds,
};
use crate::utils;
use crate::{TzdbError, TzdbResult};

/// A decoded `SYSTEMTIME` value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SystemTimeRecord {
    pub year: u16,
    pub month: u16,
    pub day_of_week: u16,
    pub day: u16,
    pub hour: u16,
    pub minute: u16,
    pub second: u16,
    pub millisecond: u16,
}

impl SystemTimeRecord {
    fn parse(cursor: &mut Cursor<'_>) -> TzdbResult<Self> {
        Ok(Self {
            year: cursor.read_le_u16()?,
            month: cursor.read_le_u16()?,
            day_of_week: cursor.read_le_u16()?,
            day: cursor.read_le_u16()?,
            hour: cursor.read_le_u16()?,
            minute: cursor.read_le_u16()?,
            second: cursor.read_le_u16()?,
            millisecond: cursor.read_le_u16()?,
        })
    }

    fn transition_time(&self) -> TransitionLocalTime {
        // The last representable wall instant of a day stands for
        // "midnight of the next day".
        if (self.hour, self.minute, self.second, self.millisecond) == (23, 59, 59, 999) {
            return TransitionLocalTime::new(24, 0, 0);
        }
        TransitionLocalTime::new(i32::from(self.hour), self.minute as u8, self.second as u8)
    }

    fn transition_date(&self) -> TzdbResult<DateOfYear> {
        if !(1..=12).contains(&self.month) {
            return Err(TzdbError::invalid_format("SYSTEMTIME month out of range"));
        }
        let day = if self.year == 0 {
            if self.day_of_week > 6 || !(1..=5).contains(&self.day) {
                return Err(TzdbError::invalid_format(
                    "SYSTEMTIME recurring day out of range",
                ));
            }
            if self.day == 5 {
                TransitionDay::Last {
                    day_of_week: self.day_of_week as u8,
                    bound: None,
                }
            } else {
                TransitionDay::Nth {
                    day_of_week: self.day_of_week as u8,
                    week: self.day as u8,
                }
            }
        } else {
            if !(1..=31).contains(&self.day) {
                return Err(TzdbError::invalid_format(
                    "SYSTEMTIME absolute day out of range",
                ));
            }
            TransitionDay::ExactlyDayOfMonth(self.day as u8)
        };
        Ok(DateOfYear::MonthDayOfYear {
            month: self.month as u8,
            day,
        })
    }

    fn month_day_time(&self) -> TzdbResult<MonthDayTime> {
        Ok(MonthDayTime {
            date: self.transition_date()?,
            time: self.transition_time(),
            resolver: TimeOffsetResolver::WallClock,
        })
    }
}

/// A decoded 44-byte `TZI` registry blob. Biases are minutes that must
/// be added to local time to reach UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowsTzi {
    pub bias: i32,
    pub standard_bias: i32,
    pub daylight_bias: i32,
    pub standard_date: SystemTimeRecord,
    pub daylight_date: SystemTimeRecord,
}

/// The behavior a `TZI` record prescribes for one year.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum YearZoneRules {
    /// No transitions; a single standard offset all year.
    Fixed { standard: UtcOffsetSeconds },
    /// Two transitions between standard and daylight time.
    Alternating(RecurringZoneRules),
}

impl WindowsTzi {
    pub fn parse(bytes: &[u8]) -> TzdbResult<Self> {
        if bytes.len() != 44 {
            return Err(TzdbError::invalid_format("TZI value must be 44 bytes"));
        }
        let mut cursor = Cursor::new(bytes);
        Ok(Self {
            bias: cursor.read_le_i32()?,
            standard_bias: cursor.read_le_i32()?,
            daylight_bias: cursor.read_le_i32()?,
            standard_date: SystemTimeRecord::parse(&mut cursor)?,
            daylight_date: SystemTimeRecord::parse(&mut cursor)?,
        })
    }

    /// The standard offset, east-positive.
    pub fn standard_offset(&self) -> UtcOffsetSeconds {
        UtcOffsetSeconds(-(self.bias + self.standard_bias) * 60)
    }

    /// The daylight offset, east-positive.
    pub fn daylight_offset(&self) -> UtcOffsetSeconds {
        UtcOffsetSeconds(-(self.bias + self.daylight_bias) * 60)
    }

    /// The rules this record prescribes for a year it covers. A month
    /// of zero in either date disables transitions.
    pub fn year_rules(&self) -> TzdbResult<YearZoneRules> {
        if self.standard_date.month == 0 || self.daylight_date.month == 0 {
            return Ok(YearZoneRules::Fixed {
                standard: self.standard_offset(),
            });
        }
        let standard = self.standard_offset();
        let daylight = self.daylight_offset();
        Ok(YearZoneRules::Alternating(RecurringZoneRules {
            rules: [
                RecurringRule {
                    transition: self.daylight_date.month_day_time()?,
                    offset_before: standard,
                    offset_after: daylight,
                },
                RecurringRule {
                    transition: self.standard_date.month_day_time()?,
                    offset_before: daylight,
                    offset_after: standard,
                },
            ],
        }))
    }
}

/// Decodes a zone's raw registry blobs into a rules table. A
/// malformed `Dynamic DST` record drops the whole dynamic set and
/// falls back to the static `TZI` record; a malformed static record
/// is an error.
pub fn rules_from_windows_bytes(
    tzi: &[u8],
    dynamic: &[(i32, &[u8])],
) -> TzdbResult<TimeZoneRules> {
    let base = WindowsTzi::parse(tzi)?;
    let mut years = Vec::with_capacity(dynamic.len());
    for (year, bytes) in dynamic {
        match WindowsTzi::parse(bytes).and_then(|tzi| tzi.year_rules().map(|_| tzi)) {
            Ok(tzi) => years.push((*year, tzi)),
            Err(error) => {
                log::debug!("malformed Dynamic DST record for {year}: {error}");
                return rules_from_windows(&base, &[]);
            }
        }
    }
    rules_from_windows(&base, &years)
}

/// Assembles a rules table from a zone's static `TZI` record and its
/// `Dynamic DST` per-year records.
///
/// Years are walked in ascending order; each year contributes its two
/// transitions (skipping degenerate ones that do not change the
/// offset), with synthesized start-of-year transitions whenever a
/// year's starting offset differs from the running tail. The last
/// record keeps ruling the future as the recurring pair.
pub fn rules_from_windows(
    base: &WindowsTzi,
    dynamic: &[(i32, WindowsTzi)],
) -> TzdbResult<TimeZoneRules> {
    if dynamic.is_empty() {
        return match base.year_rules()? {
            YearZoneRules::Fixed { standard } => Ok(TimeZoneRules::fixed(standard)),
            YearZoneRules::Alternating(recurring) => TimeZoneRules::new(
                Vec::new(),
                alloc::vec![recurring.standard_offset()],
                Some(recurring),
            ),
        };
    }

    let mut years: Vec<(i32, WindowsTzi)> = dynamic.to_vec();
    years.sort_by_key(|(year, _)| *year);

    let mut transitions: Vec<i64> = Vec::new();
    let mut offsets: Vec<UtcOffsetSeconds> = Vec::new();

    let first_rules = years[0].1.year_rules()?;
    offsets.push(match &first_rules {
        YearZoneRules::Fixed { standard } => *standard,
        YearZoneRules::Alternating(recurring) => recurring.transitions_for_year(years[0].0)[0].1,
    });

    for (year, tzi) in &years {
        let tail = *offsets.last().unwrap_or(&UtcOffsetSeconds(0));
        let start_of_year =
            utils::epoch_days_for_year(*year) * utils::SECONDS_PER_DAY - i64::from(tail.0);
        match tzi.year_rules()? {
            YearZoneRules::Fixed { standard } => {
                if standard != tail {
                    push_transition(&mut transitions, &mut offsets, start_of_year, standard);
                }
            }
            YearZoneRules::Alternating(recurring) => {
                let pair = recurring.transitions_for_year(*year);
                if pair[0].1 != tail {
                    push_transition(&mut transitions, &mut offsets, start_of_year, pair[0].1);
                }
                for (epoch, _, after) in pair {
                    if after != *offsets.last().unwrap_or(&UtcOffsetSeconds(0)) {
                        push_transition(&mut transitions, &mut offsets, epoch, after);
                    }
                }
            }
        }
    }

    // The final record rules every later year.
    let (last_year, last_tzi) = &years[years.len() - 1];
    let recurring = match last_tzi.year_rules()? {
        YearZoneRules::Fixed { .. } => None,
        YearZoneRules::Alternating(recurring) => Some(recurring),
    };
    let tail = *offsets.last().unwrap_or(&UtcOffsetSeconds(0));
    let next_start = match &recurring {
        Some(recurring) => recurring.transitions_for_year(last_year + 1)[0].1,
        None => last_tzi.standard_offset(),
    };
    if next_start != tail {
        let start_of_year =
            utils::epoch_days_for_year(last_year + 1) * utils::SECONDS_PER_DAY - i64::from(tail.0);
        push_transition(&mut transitions, &mut offsets, start_of_year, next_start);
    }

    TimeZoneRules::new(transitions, offsets, recurring)
}

fn push_transition(
    transitions: &mut Vec<i64>,
    offsets: &mut Vec<UtcOffsetSeconds>,
    epoch: i64,
    offset: UtcOffsetSeconds,
) {
    // Out-of-order data would break the table invariant; drop it.
    if transitions.last().is_some_and(|last| *last >= epoch) {
        log::debug!("dropping out-of-order registry transition at {epoch}");
        return;
    }
    transitions.push(epoch);
    offsets.push(offset);
}

/// Windows zone key to primary IANA identifier, sorted by key.
///
/// `"Coordinated Universal Time"` maps to the `"UTC"` identifier
/// directly; everything else follows the CLDR `windowsZones` primary
/// mapping.
const WINDOWS_ZONE_NAMES: &[(&str, &str)] = &[
    ("AUS Central Standard Time", "Australia/Darwin"),
    ("AUS Eastern Standard Time", "Australia/Sydney"),
    ("Afghanistan Standard Time", "Asia/Kabul"),
    ("Alaskan Standard Time", "America/Anchorage"),
    ("Arab Standard Time", "Asia/Riyadh"),
    ("Arabian Standard Time", "Asia/Dubai"),
    ("Arabic Standard Time", "Asia/Baghdad"),
    ("Argentina Standard Time", "America/Buenos_Aires"),
    ("Atlantic Standard Time", "America/Halifax"),
    ("Azerbaijan Standard Time", "Asia/Baku"),
    ("Azores Standard Time", "Atlantic/Azores"),
    ("Bahia Standard Time", "America/Bahia"),
    ("Bangladesh Standard Time", "Asia/Dhaka"),
    ("Belarus Standard Time", "Europe/Minsk"),
    ("Bougainville Standard Time", "Pacific/Bougainville"),
    ("Canada Central Standard Time", "America/Regina"),
    ("Cape Verde Standard Time", "Atlantic/Cape_Verde"),
    ("Caucasus Standard Time", "Asia/Yerevan"),
    ("Cen. Australia Standard Time", "Australia/Adelaide"),
    ("Central America Standard Time", "America/Guatemala"),
    ("Central Asia Standard Time", "Asia/Almaty"),
    ("Central Brazilian Standard Time", "America/Cuiaba"),
    ("Central Europe Standard Time", "Europe/Budapest"),
    ("Central European Standard Time", "Europe/Warsaw"),
    ("Central Pacific Standard Time", "Pacific/Guadalcanal"),
    ("Central Standard Time", "America/Chicago"),
    ("Central Standard Time (Mexico)", "America/Mexico_City"),
    ("China Standard Time", "Asia/Shanghai"),
    ("Coordinated Universal Time", "UTC"),
    ("Cuba Standard Time", "America/Havana"),
    ("Dateline Standard Time", "Etc/GMT+12"),
    ("E. Africa Standard Time", "Africa/Nairobi"),
    ("E. Australia Standard Time", "Australia/Brisbane"),
    ("E. Europe Standard Time", "Europe/Chisinau"),
    ("E. South America Standard Time", "America/Sao_Paulo"),
    ("Easter Island Standard Time", "Pacific/Easter"),
    ("Eastern Standard Time", "America/New_York"),
    ("Eastern Standard Time (Mexico)", "America/Cancun"),
    ("Egypt Standard Time", "Africa/Cairo"),
    ("Ekaterinburg Standard Time", "Asia/Yekaterinburg"),
    ("FLE Standard Time", "Europe/Kiev"),
    ("Fiji Standard Time", "Pacific/Fiji"),
    ("GMT Standard Time", "Europe/London"),
    ("GTB Standard Time", "Europe/Bucharest"),
    ("Georgian Standard Time", "Asia/Tbilisi"),
    ("Greenland Standard Time", "America/Godthab"),
    ("Greenwich Standard Time", "Atlantic/Reykjavik"),
    ("Haiti Standard Time", "America/Port-au-Prince"),
    ("Hawaiian Standard Time", "Pacific/Honolulu"),
    ("India Standard Time", "Asia/Calcutta"),
    ("Iran Standard Time", "Asia/Tehran"),
    ("Israel Standard Time", "Asia/Jerusalem"),
    ("Jordan Standard Time", "Asia/Amman"),
    ("Kaliningrad Standard Time", "Europe/Kaliningrad"),
    ("Korea Standard Time", "Asia/Seoul"),
    ("Libya Standard Time", "Africa/Tripoli"),
    ("Line Islands Standard Time", "Pacific/Kiritimati"),
    ("Lord Howe Standard Time", "Australia/Lord_Howe"),
    ("Magadan Standard Time", "Asia/Magadan"),
    ("Marquesas Standard Time", "Pacific/Marquesas"),
    ("Mauritius Standard Time", "Indian/Mauritius"),
    ("Middle East Standard Time", "Asia/Beirut"),
    ("Montevideo Standard Time", "America/Montevideo"),
    ("Morocco Standard Time", "Africa/Casablanca"),
    ("Mountain Standard Time", "America/Denver"),
    ("Mountain Standard Time (Mexico)", "America/Chihuahua"),
    ("Myanmar Standard Time", "Asia/Rangoon"),
    ("N. Central Asia Standard Time", "Asia/Novosibirsk"),
    ("Namibia Standard Time", "Africa/Windhoek"),
    ("Nepal Standard Time", "Asia/Katmandu"),
    ("New Zealand Standard Time", "Pacific/Auckland"),
    ("Newfoundland Standard Time", "America/St_Johns"),
    ("Norfolk Standard Time", "Pacific/Norfolk"),
    ("North Asia East Standard Time", "Asia/Irkutsk"),
    ("North Asia Standard Time", "Asia/Krasnoyarsk"),
    ("North Korea Standard Time", "Asia/Pyongyang"),
    ("Pacific SA Standard Time", "America/Santiago"),
    ("Pacific Standard Time", "America/Los_Angeles"),
    ("Pacific Standard Time (Mexico)", "America/Tijuana"),
    ("Pakistan Standard Time", "Asia/Karachi"),
    ("Paraguay Standard Time", "America/Asuncion"),
    ("Romance Standard Time", "Europe/Paris"),
    ("Russia Time Zone 10", "Asia/Srednekolymsk"),
    ("Russia Time Zone 11", "Asia/Kamchatka"),
    ("Russia Time Zone 3", "Europe/Samara"),
    ("Russian Standard Time", "Europe/Moscow"),
    ("SA Eastern Standard Time", "America/Cayenne"),
    ("SA Pacific Standard Time", "America/Bogota"),
    ("SA Western Standard Time", "America/La_Paz"),
    ("SE Asia Standard Time", "Asia/Bangkok"),
    ("Saint Pierre Standard Time", "America/Miquelon"),
    ("Sakhalin Standard Time", "Asia/Sakhalin"),
    ("Samoa Standard Time", "Pacific/Apia"),
    ("Singapore Standard Time", "Asia/Singapore"),
    ("South Africa Standard Time", "Africa/Johannesburg"),
    ("Sri Lanka Standard Time", "Asia/Colombo"),
    ("Syria Standard Time", "Asia/Damascus"),
    ("Taipei Standard Time", "Asia/Taipei"),
    ("Tasmania Standard Time", "Australia/Hobart"),
    ("Tocantins Standard Time", "America/Araguaina"),
    ("Tokyo Standard Time", "Asia/Tokyo"),
    ("Tomsk Standard Time", "Asia/Tomsk"),
    ("Tonga Standard Time", "Pacific/Tongatapu"),
    ("Transbaikal Standard Time", "Asia/Chita"),
    ("Turkey Standard Time", "Europe/Istanbul"),
    ("Turks And Caicos Standard Time", "America/Grand_Turk"),
    ("US Eastern Standard Time", "America/Indianapolis"),
    ("US Mountain Standard Time", "America/Phoenix"),
    ("UTC", "Etc/UTC"),
    ("UTC+12", "Etc/GMT-12"),
    ("UTC-02", "Etc/GMT+2"),
    ("UTC-11", "Etc/GMT+11"),
    ("Ulaanbaatar Standard Time", "Asia/Ulaanbaatar"),
    ("Venezuela Standard Time", "America/Caracas"),
    ("Vladivostok Standard Time", "Asia/Vladivostok"),
    ("W. Australia Standard Time", "Australia/Perth"),
    ("W. Central Africa Standard Time", "Africa/Lagos"),
    ("W. Europe Standard Time", "Europe/Berlin"),
    ("West Asia Standard Time", "Asia/Tashkent"),
    ("West Pacific Standard Time", "Pacific/Port_Moresby"),
    ("Yakutsk Standard Time", "Asia/Yakutsk"),
];

/// Maps a Windows zone key to its primary IANA identifier.
pub fn windows_to_iana(name: &str) -> Option<&'static str> {
    WINDOWS_ZONE_NAMES
        .binary_search_by(|(key, _)| key.cmp(&name))
        .ok()
        .map(|index| WINDOWS_ZONE_NAMES[index].1)
}

/// Maps an IANA identifier back to its Windows zone key.
pub fn iana_to_windows(identifier: &str) -> Option<&'static str> {
    WINDOWS_ZONE_NAMES
        .iter()
        .find(|(_, iana)| *iana == identifier)
        .map(|(key, _)| *key)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::LocalResolution;
    use crate::utils::epoch_days_from_ymd;

    fn local_seconds(year: i32, month: u8, day: u8, hour: i64, minute: i64) -> i64 {
        epoch_days_from_ymd(year, month, day) * 86_400 + hour * 3600 + minute * 60
    }

    fn system_time(
        year: u16,
        month: u16,
        day_of_week: u16,
        day: u16,
        hour: u16,
    ) -> [u8; 16] {
        let mut bytes = [0u8; 16];
        for (index, value) in [year, month, day_of_week, day, hour, 0, 0, 0]
            .into_iter()
            .enumerate()
        {
            bytes[index * 2..index * 2 + 2].copy_from_slice(&value.to_le_bytes());
        }
        bytes
    }

    fn tzi_bytes(
        bias: i32,
        standard_bias: i32,
        daylight_bias: i32,
        standard_date: [u8; 16],
        daylight_date: [u8; 16],
    ) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(44);
        bytes.extend_from_slice(&bias.to_le_bytes());
        bytes.extend_from_slice(&standard_bias.to_le_bytes());
        bytes.extend_from_slice(&daylight_bias.to_le_bytes());
        bytes.extend_from_slice(&standard_date);
        bytes.extend_from_slice(&daylight_date);
        bytes
    }

    /// W. Europe Standard Time: UTC+1, DST last Sunday of March 02:00
    /// to last Sunday of October 03:00.
    fn west_europe() -> WindowsTzi {
        let bytes = tzi_bytes(
            -60,
            0,
            -60,
            system_time(0, 10, 0, 5, 3),
            system_time(0, 3, 0, 5, 2),
        );
        WindowsTzi::parse(&bytes).unwrap()
    }

    #[test]
    fn parses_tzi_blob() {
        let tzi = west_europe();
        assert_eq!(tzi.standard_offset(), UtcOffsetSeconds(3600));
        assert_eq!(tzi.daylight_offset(), UtcOffsetSeconds(7200));
        assert!(WindowsTzi::parse(&[0u8; 43]).is_err());
    }

    #[test]
    fn static_record_produces_recurring_rules() {
        let rules = rules_from_windows(&west_europe(), &[]).unwrap();
        assert!(rules.transitions().is_empty());
        assert!(rules.recurring().is_some());
        assert!(matches!(
            rules.resolve_local(local_seconds(2040, 3, 25, 2, 30)),
            LocalResolution::Gap(_)
        ));
        assert!(matches!(
            rules.resolve_local(local_seconds(2040, 10, 28, 2, 30)),
            LocalResolution::Overlap(_)
        ));
    }

    #[test]
    fn hour_24_normalization() {
        let record = SystemTimeRecord {
            year: 0,
            month: 11,
            day_of_week: 6,
            day: 1,
            hour: 23,
            minute: 59,
            second: 59,
            millisecond: 999,
        };
        assert_eq!(record.transition_time(), TransitionLocalTime::new(24, 0, 0));
    }

    #[test]
    fn dynamic_years_assemble_explicit_transitions() {
        let tzi = west_europe();
        let rules = rules_from_windows(&tzi, &[(2018, tzi), (2019, tzi)]).unwrap();
        // Two transitions per covered year, nothing synthesized since
        // the offsets line up.
        assert_eq!(rules.transitions().len(), 4);
        assert_eq!(rules.offsets()[0], UtcOffsetSeconds(3600));
        // Summer 2018 sits between the explicit transitions.
        assert_eq!(
            rules.offset_at(local_seconds(2018, 7, 1, 12, 0)),
            UtcOffsetSeconds(7200)
        );
        // 2025 runs on the recurring tail.
        assert_eq!(
            rules.offset_at(local_seconds(2025, 7, 1, 12, 0)),
            UtcOffsetSeconds(7200)
        );
        assert_eq!(
            rules.offset_at(local_seconds(2025, 12, 1, 12, 0)),
            UtcOffsetSeconds(3600)
        );
    }

    #[test]
    fn fixed_year_synthesizes_start_of_year_transition() {
        let alternating = west_europe();
        let fixed = WindowsTzi {
            standard_date: SystemTimeRecord {
                month: 0,
                ..alternating.standard_date
            },
            daylight_date: SystemTimeRecord {
                month: 0,
                ..alternating.daylight_date
            },
            standard_bias: 0,
            daylight_bias: 0,
            bias: -120,
        };
        let rules = rules_from_windows(&alternating, &[(2018, alternating), (2019, fixed)]).unwrap();
        // 2018 contributes two transitions; 2019 opens with a
        // synthesized jump to the new fixed offset.
        assert_eq!(rules.transitions().len(), 3);
        assert_eq!(
            rules.offset_at(local_seconds(2019, 7, 1, 0, 0)),
            UtcOffsetSeconds(7200)
        );
        // No recurring tail after a fixed final year.
        assert!(rules.recurring().is_none());
        assert_eq!(
            rules.offset_at(local_seconds(2030, 1, 1, 0, 0)),
            UtcOffsetSeconds(7200)
        );
    }

    #[test]
    fn malformed_dynamic_records_fall_back_to_the_static_record() {
        let tzi = west_europe();
        let bytes = tzi_bytes(
            -60,
            0,
            -60,
            system_time(0, 10, 0, 5, 3),
            system_time(0, 3, 0, 5, 2),
        );
        let truncated: &[u8] = &[0; 10];
        let rules =
            rules_from_windows_bytes(&bytes, &[(2018, bytes.as_slice()), (2019, truncated)])
                .unwrap();
        // The truncated 2019 record discards the dynamic set entirely.
        assert!(rules.transitions().is_empty());
        let static_only = rules_from_windows(&tzi, &[]).unwrap();
        assert_eq!(rules.recurring(), static_only.recurring());
        assert!(rules_from_windows_bytes(&[0u8; 10], &[]).is_err());
    }

    #[test]
    fn name_table_lookups() {
        assert_eq!(
            windows_to_iana("W. Europe Standard Time"),
            Some("Europe/Berlin")
        );
        assert_eq!(windows_to_iana("Coordinated Universal Time"), Some("UTC"));
        assert_eq!(windows_to_iana("Mars Standard Time"), None);
        assert_eq!(
            iana_to_windows("America/New_York"),
            Some("Eastern Standard Time")
        );
    }

    #[test]
    fn name_table_is_sorted() {
        assert!(WINDOWS_ZONE_NAMES
            .windows(2)
            .all(|pair| pair[0].0 < pair[1].0));
    }
}

//! The composable date-time formatter and parser.
//!
//! A [`DateTimeFormat`] is a flat list of nodes compiled from the
//! builder or from a Unicode pattern; the same node list
//! drives both formatting and parsing. Parsing fills a
//! [`DateTimeComponents`] field bag; resolver functions on the bag
//! materialize the value types, enforcing cross-field consistency.

use alloc::borrow::Cow;
use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;

use crate::utils;
use crate::{
    DateTimeError, DateTimeResult, Instant, LocalDate, LocalDateTime, LocalTime, UtcOffset,
};

pub mod iso;
pub(crate) mod pattern;

/// An AM/PM half-day marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AmPmMarker {
    Am,
    Pm,
}

/// The bag of optional fields a parse produces and a format consumes.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DateTimeComponents {
    pub(crate) year: Option<i32>,
    pub(crate) month_number: Option<u8>,
    pub(crate) day_of_month: Option<u8>,
    pub(crate) day_of_year: Option<u16>,
    pub(crate) day_of_week: Option<u8>,
    pub(crate) hour: Option<u8>,
    pub(crate) hour_of_am_pm: Option<u8>,
    pub(crate) am_pm: Option<AmPmMarker>,
    pub(crate) minute: Option<u8>,
    pub(crate) second: Option<u8>,
    pub(crate) nanosecond: Option<u32>,
    pub(crate) offset_seconds: Option<i32>,
    pub(crate) time_zone_id: Option<String>,
}

impl DateTimeComponents {
    /// An empty bag.
    pub fn new() -> Self {
        Self::default()
    }

    /// A bag carrying the fields of a date.
    pub fn from_date(date: &LocalDate) -> Self {
        let mut components = Self::new();
        components.set_date(date);
        components
    }

    /// A bag carrying the fields of a time.
    pub fn from_time(time: &LocalTime) -> Self {
        let mut components = Self::new();
        components.set_time(time);
        components
    }

    /// A bag carrying the fields of a date-time.
    pub fn from_date_time(datetime: &LocalDateTime) -> Self {
        let mut components = Self::new();
        components.set_date(&datetime.date());
        components.set_time(&datetime.time());
        components
    }

    /// Copies a date's fields into the bag.
    pub fn set_date(&mut self, date: &LocalDate) {
        self.year = Some(date.year());
        self.month_number = Some(date.month_number());
        self.day_of_month = Some(date.day_of_month());
    }

    /// Copies a time's fields into the bag.
    pub fn set_time(&mut self, time: &LocalTime) {
        self.hour = Some(time.hour());
        self.minute = Some(time.minute());
        self.second = Some(time.second());
        self.nanosecond = Some(time.nanosecond());
    }

    /// Stores a UTC offset.
    pub fn set_offset(&mut self, offset: &UtcOffset) {
        self.offset_seconds = Some(offset.total_seconds());
    }

    /// Stores a time zone identifier.
    pub fn set_time_zone_id(&mut self, id: impl Into<String>) {
        self.time_zone_id = Some(id.into());
    }

    pub fn year(&self) -> Option<i32> {
        self.year
    }

    pub fn month_number(&self) -> Option<u8> {
        self.month_number
    }

    pub fn day_of_month(&self) -> Option<u8> {
        self.day_of_month
    }

    pub fn day_of_year(&self) -> Option<u16> {
        self.day_of_year
    }

    /// The ISO day-of-week number, when set.
    pub fn day_of_week(&self) -> Option<u8> {
        self.day_of_week
    }

    /// Stores a day of the year for cross-checking at resolve time.
    pub fn set_day_of_year(&mut self, day_of_year: u16) {
        self.day_of_year = Some(day_of_year);
    }

    /// Stores a day of the week for cross-checking at resolve time.
    pub fn set_day_of_week(&mut self, day_of_week: crate::DayOfWeek) {
        self.day_of_week = Some(day_of_week.iso_number());
    }

    pub fn hour(&self) -> Option<u8> {
        self.hour
    }

    pub fn minute(&self) -> Option<u8> {
        self.minute
    }

    pub fn second(&self) -> Option<u8> {
        self.second
    }

    pub fn nanosecond(&self) -> Option<u32> {
        self.nanosecond
    }

    pub fn offset_seconds(&self) -> Option<i32> {
        self.offset_seconds
    }

    pub fn time_zone_id(&self) -> Option<&str> {
        self.time_zone_id.as_deref()
    }

    /// Materializes a `LocalDate`, checking any redundant fields for
    /// consistency.
    pub fn to_local_date(&self) -> DateTimeResult<LocalDate> {
        let year = self.require(self.year, "year")?;
        let month = self.require(self.month_number, "monthNumber")?;
        let day = self.require(self.day_of_month, "dayOfMonth")?;
        let date = LocalDate::new(year, month, day)?;
        if let Some(day_of_year) = self.day_of_year {
            if date.day_of_year() != day_of_year {
                return Err(DateTimeError::conflict()
                    .with_message("dayOfYear disagrees with the resolved date"));
            }
        }
        if let Some(day_of_week) = self.day_of_week {
            if date.day_of_week().iso_number() != day_of_week {
                return Err(DateTimeError::conflict()
                    .with_message("dayOfWeek disagrees with the resolved date"));
            }
        }
        Ok(date)
    }

    /// Materializes a `LocalTime`. Second and nanosecond default to
    /// zero; an AM/PM pair may stand in for the hour of day.
    pub fn to_local_time(&self) -> DateTimeResult<LocalTime> {
        let hour = match (self.hour, self.hour_of_am_pm, self.am_pm) {
            (Some(hour), Some(half), Some(marker)) => {
                if half_day_hour(half, marker)? != hour {
                    return Err(DateTimeError::conflict()
                        .with_message("hourOfAmPm disagrees with the hour of day"));
                }
                hour
            }
            (Some(hour), _, _) => hour,
            (None, Some(half), Some(marker)) => half_day_hour(half, marker)?,
            _ => return Err(DateTimeError::missing_field().with_message("hour")),
        };
        let minute = self.require(self.minute, "minute")?;
        LocalTime::new(
            hour,
            minute,
            self.second.unwrap_or(0),
            self.nanosecond.unwrap_or(0),
        )
    }

    /// Materializes a `LocalDateTime`.
    pub fn to_local_date_time(&self) -> DateTimeResult<LocalDateTime> {
        Ok(LocalDateTime::from_parts(
            self.to_local_date()?,
            self.to_local_time()?,
        ))
    }

    /// Materializes a `UtcOffset`.
    pub fn to_utc_offset(&self) -> DateTimeResult<UtcOffset> {
        UtcOffset::from_total_seconds(self.require(self.offset_seconds, "offset")?)
    }

    /// Materializes an `Instant` from date, time, and offset fields.
    ///
    /// The date math runs on the raw equations: instants reach one
    /// year past the `LocalDate` range, and those margin dates must
    /// stay parseable.
    pub fn to_instant(&self) -> DateTimeResult<Instant> {
        let year = self.require(self.year, "year")?;
        let month = self.require(self.month_number, "monthNumber")?;
        let day = self.require(self.day_of_month, "dayOfMonth")?;
        let hour = self.require(self.hour, "hour")?;
        let minute = self.require(self.minute, "minute")?;
        let second = self.second.unwrap_or(0);
        let offset = self.require(self.offset_seconds, "offset")?;
        if !(1..=12).contains(&month) || day == 0 || day > utils::days_in_month(year, month) {
            return Err(DateTimeError::invalid_format()
                .with_message(format!("invalid date: {year:04}-{month:02}-{day:02}")));
        }
        if hour > 23 || minute > 59 || second > 59 {
            return Err(DateTimeError::invalid_format()
                .with_message(format!("invalid time: {hour:02}:{minute:02}:{second:02}")));
        }
        let local_seconds = utils::epoch_days_from_ymd(year, month, day) * utils::SECONDS_PER_DAY
            + i64::from(hour) * 3600
            + i64::from(minute) * 60
            + i64::from(second);
        Instant::new(
            local_seconds - i64::from(offset),
            self.nanosecond.unwrap_or(0),
        )
    }

    fn require<T: Copy>(&self, field: Option<T>, name: &'static str) -> DateTimeResult<T> {
        field.ok_or_else(|| DateTimeError::missing_field().with_message(name))
    }

    fn set_numeric(&mut self, field: NumericField, value: i64) -> DateTimeResult<()> {
        fn store<T: Copy + Eq + TryFrom<i64>>(
            slot: &mut Option<T>,
            value: i64,
            name: &'static str,
        ) -> DateTimeResult<()> {
            let value = T::try_from(value).map_err(|_| {
                DateTimeError::invalid_format().with_message(format!("{name} out of range"))
            })?;
            match slot {
                Some(existing) if *existing != value => Err(DateTimeError::conflict()
                    .with_message(format!("{name} was parsed with two different values"))),
                _ => {
                    *slot = Some(value);
                    Ok(())
                }
            }
        }
        match field {
            NumericField::Year => store(&mut self.year, value, "year"),
            NumericField::MonthNumber => store(&mut self.month_number, value, "monthNumber"),
            NumericField::DayOfMonth => store(&mut self.day_of_month, value, "dayOfMonth"),
            NumericField::DayOfYear => store(&mut self.day_of_year, value, "dayOfYear"),
            NumericField::Hour => store(&mut self.hour, value, "hour"),
            NumericField::HourOfAmPm => store(&mut self.hour_of_am_pm, value, "hourOfAmPm"),
            NumericField::Minute => store(&mut self.minute, value, "minute"),
            NumericField::Second => store(&mut self.second, value, "second"),
        }
    }

    fn set_nanosecond(&mut self, value: u32) -> DateTimeResult<()> {
        match self.nanosecond {
            Some(existing) if existing != value => Err(DateTimeError::conflict()
                .with_message("nanosecond was parsed with two different values")),
            _ => {
                self.nanosecond = Some(value);
                Ok(())
            }
        }
    }

    fn set_offset_seconds(&mut self, value: i32) -> DateTimeResult<()> {
        match self.offset_seconds {
            Some(existing) if existing != value => Err(DateTimeError::conflict()
                .with_message("offset was parsed with two different values")),
            _ => {
                self.offset_seconds = Some(value);
                Ok(())
            }
        }
    }

    fn set_am_pm(&mut self, value: AmPmMarker) -> DateTimeResult<()> {
        match self.am_pm {
            Some(existing) if existing != value => Err(DateTimeError::conflict()
                .with_message("the AM/PM marker was parsed with two different values")),
            _ => {
                self.am_pm = Some(value);
                Ok(())
            }
        }
    }

    fn set_zone_id(&mut self, value: &str) -> DateTimeResult<()> {
        match &self.time_zone_id {
            Some(existing) if existing != value => Err(DateTimeError::conflict()
                .with_message("the zone id was parsed with two different values")),
            _ => {
                self.time_zone_id = Some(String::from(value));
                Ok(())
            }
        }
    }

    fn numeric_value(&self, field: NumericField) -> Option<i64> {
        match field {
            NumericField::Year => self.year.map(i64::from),
            NumericField::MonthNumber => self.month_number.map(i64::from),
            NumericField::DayOfMonth => self.day_of_month.map(i64::from),
            NumericField::DayOfYear => self.day_of_year.map(i64::from),
            NumericField::Hour => self.hour.map(i64::from),
            NumericField::HourOfAmPm => self.hour_of_am_pm.map(i64::from),
            NumericField::Minute => self.minute.map(i64::from),
            NumericField::Second => self.second.map(i64::from),
        }
    }
}

fn half_day_hour(half: u8, marker: AmPmMarker) -> DateTimeResult<u8> {
    if half == 0 || half > 12 {
        return Err(DateTimeError::invalid_format().with_message("hourOfAmPm out of range"));
    }
    let base = half % 12;
    Ok(match marker {
        AmPmMarker::Am => base,
        AmPmMarker::Pm => base + 12,
    })
}

/// The numeric fields a [`FormatNode::Numeric`] can address.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum NumericField {
    Year,
    MonthNumber,
    DayOfMonth,
    DayOfYear,
    Hour,
    HourOfAmPm,
    Minute,
    Second,
}

impl NumericField {
    fn name(self) -> &'static str {
        match self {
            Self::Year => "year",
            Self::MonthNumber => "monthNumber",
            Self::DayOfMonth => "dayOfMonth",
            Self::DayOfYear => "dayOfYear",
            Self::Hour => "hour",
            Self::HourOfAmPm => "hourOfAmPm",
            Self::Minute => "minute",
            Self::Second => "second",
        }
    }
}

/// When a numeric node writes a sign.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SignPolicy {
    /// No sign is written or accepted.
    Never,
    /// `-` when negative; `+` when the digit count exceeds
    /// `plus_on_exceed` (the ISO big-year rule; `Some(0)` makes the
    /// sign unconditional).
    NegativeOnly { plus_on_exceed: Option<u8> },
}

/// Whether an offset sub-field appears in the output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldPresence {
    Never,
    IfNonZero,
    Always,
}

/// The shape of an ISO offset node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OffsetStyle {
    /// Emit `Z` when the offset is zero.
    pub z_on_zero: bool,
    /// Separate the fields with `:`.
    pub separator: bool,
    pub minutes: FieldPresence,
    pub seconds: FieldPresence,
}

impl OffsetStyle {
    /// The ISO-8601 extended style: `Z` on zero, otherwise
    /// `±HH:MM[:SS]`.
    pub const ISO: Self = Self {
        z_on_zero: true,
        separator: true,
        minutes: FieldPresence::Always,
        seconds: FieldPresence::IfNonZero,
    };
}

/// One element of a compiled format.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum FormatNode {
    Numeric {
        field: NumericField,
        min_digits: u8,
        max_digits: u8,
        sign: SignPolicy,
    },
    Fraction {
        min_digits: u8,
        max_digits: u8,
        grouped: bool,
    },
    Literal {
        text: Cow<'static, str>,
        ignore_case: bool,
    },
    Optional {
        nodes: Vec<FormatNode>,
    },
    Alternatives {
        format_form: Vec<FormatNode>,
        parse_forms: Vec<Vec<FormatNode>>,
    },
    Offset {
        style: OffsetStyle,
    },
    ZoneId,
    AmPm {
        am: Cow<'static, str>,
        pm: Cow<'static, str>,
    },
}

/// A compiled format: a flat list of nodes executed left to right for
/// both formatting and parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateTimeFormat {
    nodes: Vec<FormatNode>,
}

impl DateTimeFormat {
    /// Compiles a Unicode (LDML-style) pattern.
    pub fn from_pattern(source: &str) -> DateTimeResult<Self> {
        Ok(Self {
            nodes: pattern::compile(source)?,
        })
    }

    /// Starts a builder.
    pub fn builder() -> DateTimeFormatBuilder {
        DateTimeFormatBuilder { nodes: Vec::new() }
    }

    /// Formats a field bag. Fails with `MissingField` when a required
    /// field is absent.
    pub fn format(&self, components: &DateTimeComponents) -> DateTimeResult<String> {
        let mut output = String::new();
        format_nodes(&self.nodes, components, &mut output)?;
        Ok(output)
    }

    /// Parses an input completely, producing the field bag.
    pub fn parse(&self, input: &str) -> DateTimeResult<DateTimeComponents> {
        let mut components = DateTimeComponents::new();
        let mut pos = 0;
        parse_nodes(&self.nodes, input, &mut pos, &mut components)?;
        if pos != input.len() {
            return Err(DateTimeError::invalid_format()
                .with_message(format!("unexpected trailing input at position {pos}")));
        }
        Ok(components)
    }

    pub(crate) fn into_nodes(self) -> Vec<FormatNode> {
        self.nodes
    }
}

/// A composable builder producing a [`DateTimeFormat`].
#[derive(Debug, Default)]
pub struct DateTimeFormatBuilder {
    nodes: Vec<FormatNode>,
}

impl DateTimeFormatBuilder {
    fn push(mut self, node: FormatNode) -> Self {
        self.nodes.push(node);
        self
    }

    /// Appends an already-built node; used to splice presets together.
    pub(crate) fn push_node(self, node: FormatNode) -> Self {
        self.push(node)
    }

    /// The proleptic year, at least `min_digits` wide, `-` when
    /// negative and `+` once the digits outgrow four (the ISO rule).
    pub fn year(self, min_digits: u8) -> Self {
        self.push(FormatNode::Numeric {
            field: NumericField::Year,
            min_digits,
            max_digits: 10,
            sign: SignPolicy::NegativeOnly {
                plus_on_exceed: Some(4),
            },
        })
    }

    pub fn month_number(self, min_digits: u8) -> Self {
        self.push(numeric(NumericField::MonthNumber, min_digits, 2))
    }

    pub fn day_of_month(self, min_digits: u8) -> Self {
        self.push(numeric(NumericField::DayOfMonth, min_digits, 2))
    }

    pub fn day_of_year(self, min_digits: u8) -> Self {
        self.push(numeric(NumericField::DayOfYear, min_digits, 3))
    }

    pub fn hour(self, min_digits: u8) -> Self {
        self.push(numeric(NumericField::Hour, min_digits, 2))
    }

    pub fn hour_of_am_pm(self, min_digits: u8) -> Self {
        self.push(numeric(NumericField::HourOfAmPm, min_digits, 2))
    }

    pub fn minute(self, min_digits: u8) -> Self {
        self.push(numeric(NumericField::Minute, min_digits, 2))
    }

    pub fn second(self, min_digits: u8) -> Self {
        self.push(numeric(NumericField::Second, min_digits, 2))
    }

    /// The fraction of the second: the shortest representation at
    /// least `min_digits` wide that loses no precision, grouped into
    /// threes when `grouped`.
    pub fn fraction_of_second(self, min_digits: u8, max_digits: u8, grouped: bool) -> Self {
        self.push(FormatNode::Fraction {
            min_digits: min_digits.clamp(1, 9),
            max_digits: max_digits.clamp(1, 9),
            grouped,
        })
    }

    pub fn literal(self, text: &'static str) -> Self {
        self.push(FormatNode::Literal {
            text: Cow::Borrowed(text),
            ignore_case: false,
        })
    }

    /// A literal matched case-insensitively on parse.
    pub fn literal_ignoring_case(self, text: &'static str) -> Self {
        self.push(FormatNode::Literal {
            text: Cow::Borrowed(text),
            ignore_case: true,
        })
    }

    pub fn offset(self, style: OffsetStyle) -> Self {
        self.push(FormatNode::Offset { style })
    }

    pub fn zone_id(self) -> Self {
        self.push(FormatNode::ZoneId)
    }

    /// An AM/PM marker with the given strings; matching is
    /// case-insensitive on parse.
    pub fn am_pm_marker(self, am: &'static str, pm: &'static str) -> Self {
        self.push(FormatNode::AmPm {
            am: Cow::Borrowed(am),
            pm: Cow::Borrowed(pm),
        })
    }

    /// A section that formats only when one of its fields differs from
    /// its default, and whose parse failure is not an error.
    pub fn optional(self, section: DateTimeFormat) -> Self {
        self.push(FormatNode::Optional {
            nodes: section.into_nodes(),
        })
    }

    /// A format form plus parse-time alternatives tried in order.
    pub fn alternatives(self, format_form: DateTimeFormat, parse_forms: Vec<DateTimeFormat>) -> Self {
        self.push(FormatNode::Alternatives {
            format_form: format_form.into_nodes(),
            parse_forms: parse_forms
                .into_iter()
                .map(DateTimeFormat::into_nodes)
                .collect(),
        })
    }

    pub fn build(self) -> DateTimeFormat {
        DateTimeFormat { nodes: self.nodes }
    }
}

fn numeric(field: NumericField, min_digits: u8, max_digits: u8) -> FormatNode {
    FormatNode::Numeric {
        field,
        min_digits: min_digits.clamp(1, max_digits),
        max_digits,
        sign: SignPolicy::Never,
    }
}

// ==== Formatting ====

fn format_nodes(
    nodes: &[FormatNode],
    components: &DateTimeComponents,
    output: &mut String,
) -> DateTimeResult<()> {
    for node in nodes {
        match node {
            FormatNode::Numeric {
                field,
                min_digits,
                max_digits,
                sign,
            } => format_numeric(components, *field, *min_digits, *max_digits, *sign, output)?,
            FormatNode::Fraction {
                min_digits,
                max_digits,
                grouped,
            } => {
                let nanos = components.nanosecond.ok_or_else(|| {
                    DateTimeError::missing_field().with_message("nanosecond")
                })?;
                format_fraction(nanos, *min_digits, *max_digits, *grouped, output);
            }
            FormatNode::Literal { text, .. } => output.push_str(text),
            FormatNode::Optional { nodes } => {
                if section_is_relevant(nodes, components) {
                    format_nodes(nodes, components, output)?;
                }
            }
            FormatNode::Alternatives { format_form, .. } => {
                format_nodes(format_form, components, output)?;
            }
            FormatNode::Offset { style } => format_offset(components, *style, output)?,
            FormatNode::ZoneId => {
                let id = components
                    .time_zone_id
                    .as_deref()
                    .ok_or_else(|| DateTimeError::missing_field().with_message("timeZoneId"))?;
                output.push_str(id);
            }
            FormatNode::AmPm { am, pm } => {
                let marker = components
                    .am_pm
                    .ok_or_else(|| DateTimeError::missing_field().with_message("amPm"))?;
                output.push_str(match marker {
                    AmPmMarker::Am => am,
                    AmPmMarker::Pm => pm,
                });
            }
        }
    }
    Ok(())
}

fn format_numeric(
    components: &DateTimeComponents,
    field: NumericField,
    min_digits: u8,
    max_digits: u8,
    sign: SignPolicy,
    output: &mut String,
) -> DateTimeResult<()> {
    let value = components
        .numeric_value(field)
        .ok_or_else(|| DateTimeError::missing_field().with_message(field.name()))?;
    let digits = format!("{}", value.unsigned_abs());
    if digits.len() > usize::from(max_digits) {
        return Err(DateTimeError::illegal_argument().with_message(format!(
            "{} does not fit {max_digits} digits: {value}",
            field.name()
        )));
    }
    match sign {
        SignPolicy::Never => {
            if value < 0 {
                return Err(DateTimeError::illegal_argument()
                    .with_message(format!("{} must not be negative", field.name())));
            }
        }
        SignPolicy::NegativeOnly { plus_on_exceed } => {
            if value < 0 {
                output.push('-');
            } else if plus_on_exceed
                .is_some_and(|width| digits.len().max(usize::from(min_digits)) > usize::from(width))
            {
                output.push('+');
            }
        }
    }
    for _ in digits.len()..usize::from(min_digits) {
        output.push('0');
    }
    output.push_str(&digits);
    Ok(())
}

fn format_fraction(nanos: u32, min_digits: u8, max_digits: u8, grouped: bool, output: &mut String) {
    let digits = format!("{nanos:09}");
    let mut length = 9;
    while length > usize::from(min_digits) && digits.as_bytes()[length - 1] == b'0' {
        length -= 1;
    }
    if grouped {
        length = length.div_ceil(3) * 3;
    }
    // Width-capped nodes truncate the value.
    length = length.min(usize::from(max_digits));
    output.push_str(&digits[..length]);
}

fn format_offset(
    components: &DateTimeComponents,
    style: OffsetStyle,
    output: &mut String,
) -> DateTimeResult<()> {
    let total = components
        .offset_seconds
        .ok_or_else(|| DateTimeError::missing_field().with_message("offset"))?;
    if total == 0 && style.z_on_zero {
        output.push('Z');
        return Ok(());
    }
    output.push(if total < 0 { '-' } else { '+' });
    let magnitude = total.unsigned_abs();
    push_two_digits(magnitude / 3600, output);
    let emit_minutes = match style.minutes {
        FieldPresence::Always => true,
        FieldPresence::IfNonZero => magnitude % 3600 != 0,
        FieldPresence::Never => false,
    };
    if emit_minutes {
        if style.separator {
            output.push(':');
        }
        push_two_digits(magnitude / 60 % 60, output);
        let emit_seconds = match style.seconds {
            FieldPresence::Always => true,
            FieldPresence::IfNonZero => magnitude % 60 != 0,
            FieldPresence::Never => false,
        };
        if emit_seconds {
            if style.separator {
                output.push(':');
            }
            push_two_digits(magnitude % 60, output);
        }
    }
    Ok(())
}

fn push_two_digits(value: u32, output: &mut String) {
    output.push((b'0' + (value / 10 % 10) as u8) as char);
    output.push((b'0' + (value % 10) as u8) as char);
}

/// Whether an optional section should be emitted: true when any field
/// it references differs from that field's default.
fn section_is_relevant(nodes: &[FormatNode], components: &DateTimeComponents) -> bool {
    nodes.iter().any(|node| match node {
        FormatNode::Numeric { field, .. } => match field {
            NumericField::Hour => components.hour.is_some_and(|v| v != 0),
            NumericField::HourOfAmPm => components.hour_of_am_pm.is_some_and(|v| v != 0),
            NumericField::Minute => components.minute.is_some_and(|v| v != 0),
            NumericField::Second => components.second.is_some_and(|v| v != 0),
            NumericField::Year => components.year.is_some(),
            NumericField::MonthNumber => components.month_number.is_some(),
            NumericField::DayOfMonth => components.day_of_month.is_some(),
            NumericField::DayOfYear => components.day_of_year.is_some(),
        },
        FormatNode::Fraction { .. } => components.nanosecond.is_some_and(|v| v != 0),
        FormatNode::Offset { .. } => components.offset_seconds.is_some_and(|v| v != 0),
        FormatNode::ZoneId => components.time_zone_id.is_some(),
        FormatNode::AmPm { .. } => components.am_pm.is_some(),
        FormatNode::Optional { nodes } => section_is_relevant(nodes, components),
        FormatNode::Alternatives { format_form, .. } => {
            section_is_relevant(format_form, components)
        }
        FormatNode::Literal { .. } => false,
    })
}

// ==== Parsing ====

fn parse_nodes(
    nodes: &[FormatNode],
    input: &str,
    pos: &mut usize,
    components: &mut DateTimeComponents,
) -> DateTimeResult<()> {
    for node in nodes {
        parse_node(node, input, pos, components)?;
    }
    Ok(())
}

fn parse_node(
    node: &FormatNode,
    input: &str,
    pos: &mut usize,
    components: &mut DateTimeComponents,
) -> DateTimeResult<()> {
    let bytes = input.as_bytes();
    match node {
        FormatNode::Numeric {
            field,
            min_digits,
            max_digits,
            sign,
        } => {
            let negative = match sign {
                SignPolicy::Never => false,
                SignPolicy::NegativeOnly { .. } => {
                    match bytes.get(*pos) {
                        Some(b'-') => {
                            *pos += 1;
                            true
                        }
                        Some(b'+') => {
                            *pos += 1;
                            false
                        }
                        _ => false,
                    }
                }
            };
            let start = *pos;
            while *pos < bytes.len()
                && bytes[*pos].is_ascii_digit()
                && *pos - start < usize::from(*max_digits)
            {
                *pos += 1;
            }
            if *pos - start < usize::from(*min_digits) {
                return Err(parse_error(field.name(), start));
            }
            let mut value = 0i64;
            for byte in &bytes[start..*pos] {
                value = value * 10 + i64::from(byte - b'0');
            }
            if negative {
                value = -value;
            }
            components.set_numeric(*field, value)?;
        }
        FormatNode::Fraction { .. } => {
            let start = *pos;
            while *pos < bytes.len() && bytes[*pos].is_ascii_digit() && *pos - start < 9 {
                *pos += 1;
            }
            let count = *pos - start;
            if count == 0 {
                return Err(parse_error("fraction", start));
            }
            let mut value = 0u32;
            for byte in &bytes[start..*pos] {
                value = value * 10 + u32::from(byte - b'0');
            }
            value *= 10u32.pow(9 - count as u32);
            components.set_nanosecond(value)?;
        }
        FormatNode::Literal { text, ignore_case } => {
            let end = *pos + text.len();
            let matches = input.get(*pos..end).is_some_and(|slice| {
                if *ignore_case {
                    slice.eq_ignore_ascii_case(text)
                } else {
                    slice == &**text
                }
            });
            if !matches {
                return Err(parse_error("literal", *pos));
            }
            *pos = end;
        }
        FormatNode::Optional { nodes } => {
            let checkpoint_pos = *pos;
            let checkpoint = components.clone();
            if parse_nodes(nodes, input, pos, components).is_err() {
                *pos = checkpoint_pos;
                *components = checkpoint;
            }
        }
        FormatNode::Alternatives { parse_forms, .. } => {
            let checkpoint_pos = *pos;
            let checkpoint = components.clone();
            for form in parse_forms {
                match parse_nodes(form, input, pos, components) {
                    Ok(()) => return Ok(()),
                    Err(_) => {
                        *pos = checkpoint_pos;
                        *components = checkpoint.clone();
                    }
                }
            }
            return Err(parse_error("alternatives", checkpoint_pos));
        }
        FormatNode::Offset { style } => parse_offset_node(*style, input, pos, components)?,
        FormatNode::ZoneId => {
            let start = *pos;
            let first = bytes.get(*pos).copied();
            if !first.is_some_and(|b| b.is_ascii_alphabetic() || b == b'_') {
                return Err(parse_error("timeZoneId", start));
            }
            *pos += 1;
            while bytes.get(*pos).copied().is_some_and(|b| {
                b.is_ascii_alphanumeric() || matches!(b, b'_' | b'+' | b'-' | b'/')
            }) {
                *pos += 1;
            }
            // The range is ASCII, so the slice is valid UTF-8.
            components.set_zone_id(&input[start..*pos])?;
        }
        FormatNode::AmPm { am, pm } => {
            let try_match = |text: &str, pos: &mut usize| {
                let end = *pos + text.len();
                if input
                    .get(*pos..end)
                    .is_some_and(|slice| slice.eq_ignore_ascii_case(text))
                {
                    *pos = end;
                    true
                } else {
                    false
                }
            };
            if try_match(am, pos) {
                components.set_am_pm(AmPmMarker::Am)?;
            } else if try_match(pm, pos) {
                components.set_am_pm(AmPmMarker::Pm)?;
            } else {
                return Err(parse_error("amPm", *pos));
            }
        }
    }
    Ok(())
}

fn parse_offset_node(
    style: OffsetStyle,
    input: &str,
    pos: &mut usize,
    components: &mut DateTimeComponents,
) -> DateTimeResult<()> {
    let bytes = input.as_bytes();
    if style.z_on_zero && matches!(bytes.get(*pos), Some(b'Z' | b'z')) {
        *pos += 1;
        return components.set_offset_seconds(0);
    }
    let sign = match bytes.get(*pos) {
        Some(b'+') => 1,
        Some(b'-') => -1,
        _ => return Err(parse_error("offset", *pos)),
    };
    *pos += 1;

    let two_digits = |pos: &mut usize| -> Option<i32> {
        let pair = bytes.get(*pos..*pos + 2)?;
        if !pair[0].is_ascii_digit() || !pair[1].is_ascii_digit() {
            return None;
        }
        *pos += 2;
        Some(i32::from(pair[0] - b'0') * 10 + i32::from(pair[1] - b'0'))
    };

    let hours = two_digits(pos).ok_or_else(|| parse_error("offset", *pos))?;
    let mut minutes = 0;
    let mut seconds = 0;

    let sub_field = |pos: &mut usize, required: bool| -> DateTimeResult<Option<i32>> {
        let mut probe = *pos;
        if style.separator {
            if bytes.get(probe) == Some(&b':') {
                probe += 1;
            } else if required {
                return Err(parse_error("offset", *pos));
            } else {
                return Ok(None);
            }
        }
        match two_digits(&mut probe) {
            Some(value) => {
                *pos = probe;
                Ok(Some(value))
            }
            None if required => Err(parse_error("offset", *pos)),
            None => Ok(None),
        }
    };

    if style.minutes != FieldPresence::Never {
        if let Some(value) = sub_field(pos, style.minutes == FieldPresence::Always)? {
            minutes = value;
            if style.seconds != FieldPresence::Never {
                if let Some(value) = sub_field(pos, style.seconds == FieldPresence::Always)? {
                    seconds = value;
                }
            }
        }
    }

    if hours > 18 || minutes > 59 || seconds > 59 || (hours == 18 && (minutes != 0 || seconds != 0))
    {
        return Err(DateTimeError::invalid_format().with_message("offset out of range"));
    }
    components.set_offset_seconds(sign * (hours * 3600 + minutes * 60 + seconds))
}

fn parse_error(what: &'static str, pos: usize) -> DateTimeError {
    DateTimeError::invalid_format()
        .with_message(format!("could not parse {what} at position {pos}"))
}

//! Pre-built ISO-8601 formats.

use crate::format::{DateTimeFormat, OffsetStyle};

/// `ISO_DATE`: `[+|-]YYYY-MM-DD`, with a `+` once the year outgrows
/// four digits.
pub fn iso_date() -> DateTimeFormat {
    DateTimeFormat::builder()
        .year(4)
        .literal("-")
        .month_number(2)
        .literal("-")
        .day_of_month(2)
        .build()
}

/// `ISO_TIME`: `HH:MM[:SS[.fraction]]`, second and fraction only when
/// nonzero.
pub fn iso_time() -> DateTimeFormat {
    DateTimeFormat::builder()
        .hour(2)
        .literal(":")
        .minute(2)
        .optional(
            DateTimeFormat::builder()
                .literal(":")
                .second(2)
                .optional(
                    DateTimeFormat::builder()
                        .literal(".")
                        .fraction_of_second(1, 9, true)
                        .build(),
                )
                .build(),
        )
        .build()
}

/// `ISO_DATE_TIME`: the date, a `T` (a lowercase `t` parses too), and
/// the time.
pub fn iso_date_time() -> DateTimeFormat {
    let t = DateTimeFormat::builder().literal("T").build();
    let lower_t = DateTimeFormat::builder().literal("t").build();
    let mut builder = DateTimeFormat::builder();
    for node in iso_date().into_nodes() {
        builder = builder_push(builder, node);
    }
    builder = builder.alternatives(t.clone(), alloc::vec![t, lower_t]);
    for node in iso_time().into_nodes() {
        builder = builder_push(builder, node);
    }
    builder.build()
}

/// `ISO_OFFSET`: `Z` on zero, otherwise `±HH:MM[:SS]`.
pub fn iso_offset() -> DateTimeFormat {
    DateTimeFormat::builder().offset(OffsetStyle::ISO).build()
}

/// `ISO_DATE_TIME_OFFSET`: the date-time followed by the offset.
pub fn iso_date_time_offset() -> DateTimeFormat {
    let mut builder = DateTimeFormat::builder();
    for node in iso_date_time().into_nodes() {
        builder = builder_push(builder, node);
    }
    builder.offset(OffsetStyle::ISO).build()
}

/// `ISO_INSTANT`: like [`iso_date_time_offset`], but the second of
/// minute always prints; backs `Instant`'s canonical string form.
pub fn iso_instant() -> DateTimeFormat {
    let mut builder = DateTimeFormat::builder();
    for node in iso_date().into_nodes() {
        builder = builder_push(builder, node);
    }
    builder
        .literal("T")
        .hour(2)
        .literal(":")
        .minute(2)
        .literal(":")
        .second(2)
        .optional(
            DateTimeFormat::builder()
                .literal(".")
                .fraction_of_second(1, 9, true)
                .build(),
        )
        .offset(OffsetStyle::ISO)
        .build()
}

fn builder_push(
    builder: crate::format::DateTimeFormatBuilder,
    node: crate::format::FormatNode,
) -> crate::format::DateTimeFormatBuilder {
    // A free function keeps the preset bodies readable.
    builder.push_node(node)
}

#[cfg(test)]
mod tests {
    use crate::format::DateTimeComponents;
    use crate::{LocalDate, LocalDateTime, LocalTime, UtcOffset};

    use super::*;

    #[test]
    fn date_round_trip() {
        let date = LocalDate::new(2020, 12, 9).unwrap();
        let formatted = iso_date()
            .format(&DateTimeComponents::from_date(&date))
            .unwrap();
        assert_eq!(formatted, "2020-12-09");
        assert_eq!(iso_date().parse(&formatted).unwrap().to_local_date().unwrap(), date);
    }

    #[test]
    fn date_time_accepts_lowercase_t() {
        let datetime = LocalDateTime::new(2020, 3, 29, 2, 30, 0, 0).unwrap();
        for source in ["2020-03-29T02:30", "2020-03-29t02:30"] {
            assert_eq!(
                iso_date_time()
                    .parse(source)
                    .unwrap()
                    .to_local_date_time()
                    .unwrap(),
                datetime
            );
        }
    }

    #[test]
    fn offset_preset() {
        let mut components = DateTimeComponents::new();
        components.set_offset(&UtcOffset::ZERO);
        assert_eq!(iso_offset().format(&components).unwrap(), "Z");
        components.set_offset(&UtcOffset::from_hours(2).unwrap());
        assert_eq!(iso_offset().format(&components).unwrap(), "+02:00");
    }

    #[test]
    fn instant_preset_keeps_seconds() {
        let datetime = LocalDateTime::new(2019, 10, 27, 0, 59, 0, 0).unwrap();
        let mut components = DateTimeComponents::from_date_time(&datetime);
        components.set_offset(&UtcOffset::ZERO);
        assert_eq!(
            iso_instant().format(&components).unwrap(),
            "2019-10-27T00:59:00Z"
        );
        // The date-time preset drops the zero second instead.
        assert_eq!(
            iso_date_time()
                .format(&DateTimeComponents::from_date_time(&datetime))
                .unwrap(),
            "2019-10-27T00:59"
        );
    }

    #[test]
    fn full_offset_round_trip() {
        let datetime = LocalDateTime::new(2007, 10, 28, 2, 30, 0, 0).unwrap();
        let mut components = DateTimeComponents::from_date_time(&datetime);
        components.set_offset(&UtcOffset::from_hours(2).unwrap());
        let formatted = iso_date_time_offset().format(&components).unwrap();
        assert_eq!(formatted, "2007-10-28T02:30+02:00");
        let parsed = iso_date_time_offset().parse(&formatted).unwrap();
        assert_eq!(parsed.to_local_date_time().unwrap(), datetime);
        assert_eq!(parsed.to_utc_offset().unwrap().total_seconds(), 7200);
    }
}

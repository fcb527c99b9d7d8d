//! The Unicode (LDML-style) pattern compiler.
//!
//! A pattern is compiled into the same node list the builder produces.
//! Only locale-invariant directives are supported; letters whose
//! meaning depends on locale data fail with `LocaleDependentDirective`,
//! everything else unknown with `UnsupportedDirective`.
//!
//! Grammar:
//! - a maximal run of the same letter is a directive;
//! - unquoted non-letters are literal, `'…'` quotes and `''` is a
//!   literal apostrophe;
//! - `[ … ]` nests an optional group;
//! - one or more `p` before a directive zero-pads it to the combined
//!   length of the `p` run and the directive.

use alloc::borrow::Cow;
use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;

use crate::format::{FieldPresence, FormatNode, NumericField, OffsetStyle, SignPolicy};
use crate::{DateTimeError, DateTimeResult};

pub(crate) fn compile(source: &str) -> DateTimeResult<Vec<FormatNode>> {
    let mut chars = source.chars().peekable();
    let nodes = compile_group(&mut chars, false)?;
    if chars.next().is_some() {
        return Err(DateTimeError::invalid_format()
            .with_message("unbalanced ']' in pattern"));
    }
    Ok(nodes)
}

fn compile_group(
    chars: &mut core::iter::Peekable<core::str::Chars<'_>>,
    nested: bool,
) -> DateTimeResult<Vec<FormatNode>> {
    let mut nodes = Vec::new();
    let mut literal = String::new();

    macro_rules! flush_literal {
        () => {
            if !literal.is_empty() {
                nodes.push(FormatNode::Literal {
                    text: Cow::Owned(core::mem::take(&mut literal)),
                    ignore_case: false,
                });
            }
        };
    }

    while let Some(&ch) = chars.peek() {
        match ch {
            ']' => {
                if !nested {
                    break;
                }
                chars.next();
                flush_literal!();
                return Ok(nodes);
            }
            '[' => {
                chars.next();
                flush_literal!();
                let inner = compile_group(chars, true)?;
                nodes.push(FormatNode::Optional { nodes: inner });
            }
            '\'' => {
                chars.next();
                let mut quoted = String::new();
                loop {
                    match chars.next() {
                        Some('\'') => {
                            if chars.peek() == Some(&'\'') {
                                chars.next();
                                quoted.push('\'');
                            } else {
                                break;
                            }
                        }
                        Some(other) => quoted.push(other),
                        None => {
                            return Err(DateTimeError::invalid_format()
                                .with_message("unterminated quote in pattern"))
                        }
                    }
                }
                if quoted.is_empty() {
                    // `''` outside a quoted run is a literal apostrophe.
                    literal.push('\'');
                } else {
                    literal.push_str(&quoted);
                }
            }
            'p' => {
                chars.next();
                let mut padding = 1usize;
                while chars.peek() == Some(&'p') {
                    chars.next();
                    padding += 1;
                }
                let Some(&letter) = chars.peek() else {
                    return Err(DateTimeError::invalid_format()
                        .with_message("padding must be followed by a directive"));
                };
                if !letter.is_ascii_alphabetic() {
                    return Err(DateTimeError::invalid_format()
                        .with_message("padding must be followed by a directive"));
                }
                flush_literal!();
                let (letter, length) = take_letter_run(chars);
                nodes.push(directive(letter, length, padding)?);
            }
            letter if letter.is_ascii_alphabetic() => {
                flush_literal!();
                let (letter, length) = take_letter_run(chars);
                nodes.push(directive(letter, length, 0)?);
            }
            other => {
                chars.next();
                literal.push(other);
            }
        }
    }

    if nested {
        return Err(DateTimeError::invalid_format()
            .with_message("unbalanced '[' in pattern"));
    }
    flush_literal!();
    Ok(nodes)
}

fn take_letter_run(chars: &mut core::iter::Peekable<core::str::Chars<'_>>) -> (char, usize) {
    // The caller peeked an ASCII letter.
    let letter = chars.next().unwrap_or('\0');
    let mut length = 1;
    while chars.peek() == Some(&letter) {
        chars.next();
        length += 1;
    }
    (letter, length)
}

/// Maps a directive letter/length pair (plus an extra zero-padding
/// width) to a node.
fn directive(letter: char, length: usize, padding: usize) -> DateTimeResult<FormatNode> {
    let width = |base: usize| (base + padding).min(10) as u8;
    let numeric = |field: NumericField, max_digits: u8| FormatNode::Numeric {
        field,
        min_digits: width(length).clamp(1, max_digits),
        max_digits,
        sign: SignPolicy::Never,
    };
    match letter {
        'u' => match length {
            2 => Err(unsupported(letter, length)),
            1 | 3.. => Ok(FormatNode::Numeric {
                field: NumericField::Year,
                min_digits: width(length),
                max_digits: 10,
                sign: SignPolicy::NegativeOnly {
                    plus_on_exceed: Some(4),
                },
            }),
            _ => Err(unsupported(letter, length)),
        },
        'M' | 'L' => match length {
            1 | 2 => Ok(numeric(NumericField::MonthNumber, 2)),
            3..=5 => Err(locale_dependent(letter, length)),
            _ => Err(unsupported(letter, length)),
        },
        'd' => match length {
            1 | 2 => Ok(numeric(NumericField::DayOfMonth, 2)),
            _ => Err(unsupported(letter, length)),
        },
        'D' => match length {
            1..=3 => Ok(numeric(NumericField::DayOfYear, 3)),
            _ => Err(unsupported(letter, length)),
        },
        'H' => match length {
            1 | 2 => Ok(numeric(NumericField::Hour, 2)),
            _ => Err(unsupported(letter, length)),
        },
        'm' => match length {
            1 | 2 => Ok(numeric(NumericField::Minute, 2)),
            _ => Err(unsupported(letter, length)),
        },
        's' => match length {
            1 | 2 => Ok(numeric(NumericField::Second, 2)),
            _ => Err(unsupported(letter, length)),
        },
        'S' => {
            if length > 9 {
                return Err(unsupported(letter, length));
            }
            Ok(FormatNode::Fraction {
                min_digits: length as u8,
                max_digits: length as u8,
                grouped: false,
            })
        }
        'V' => match length {
            2 => Ok(FormatNode::ZoneId),
            _ => Err(unsupported(letter, length)),
        },
        'X' | 'x' => {
            let z_on_zero = letter == 'X';
            let style = match length {
                1 => OffsetStyle {
                    z_on_zero,
                    separator: false,
                    minutes: FieldPresence::IfNonZero,
                    seconds: FieldPresence::Never,
                },
                2 => OffsetStyle {
                    z_on_zero,
                    separator: false,
                    minutes: FieldPresence::Always,
                    seconds: FieldPresence::Never,
                },
                3 => OffsetStyle {
                    z_on_zero,
                    separator: true,
                    minutes: FieldPresence::Always,
                    seconds: FieldPresence::Never,
                },
                4 => OffsetStyle {
                    z_on_zero,
                    separator: false,
                    minutes: FieldPresence::Always,
                    seconds: FieldPresence::IfNonZero,
                },
                5 => OffsetStyle {
                    z_on_zero,
                    separator: true,
                    minutes: FieldPresence::Always,
                    seconds: FieldPresence::IfNonZero,
                },
                _ => return Err(unsupported(letter, length)),
            };
            Ok(FormatNode::Offset { style })
        }
        'Z' => match length {
            1..=3 => Ok(FormatNode::Offset {
                style: OffsetStyle {
                    z_on_zero: false,
                    separator: false,
                    minutes: FieldPresence::Always,
                    seconds: FieldPresence::Never,
                },
            }),
            4 => Err(locale_dependent(letter, length)),
            5 => Ok(FormatNode::Offset {
                style: OffsetStyle {
                    z_on_zero: false,
                    separator: true,
                    minutes: FieldPresence::Always,
                    seconds: FieldPresence::IfNonZero,
                },
            }),
            _ => Err(unsupported(letter, length)),
        },
        'y' | 'Y' | 'G' | 'E' | 'e' | 'c' | 'a' | 'z' | 'v' | 'O' | 'Q' | 'q' => {
            Err(locale_dependent(letter, length))
        }
        _ => Err(unsupported(letter, length)),
    }
}

fn unsupported(letter: char, length: usize) -> DateTimeError {
    DateTimeError::unsupported_directive().with_message(format!(
        "unsupported pattern directive: '{}'",
        repeat(letter, length)
    ))
}

fn locale_dependent(letter: char, length: usize) -> DateTimeError {
    DateTimeError::locale_dependent_directive().with_message(format!(
        "directive '{}' requires locale data",
        repeat(letter, length)
    ))
}

fn repeat(letter: char, length: usize) -> String {
    let mut out = String::new();
    for _ in 0..length.min(12) {
        out.push(letter);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::{DateTimeComponents, DateTimeFormat};
    use crate::{ErrorKind, LocalDate, LocalTime, UtcOffset};

    #[test]
    fn compiles_the_iso_like_pattern() {
        let format = DateTimeFormat::from_pattern("uuuu-MM-dd'T'HH:mm:ss[.SSS]X").unwrap();
        let mut components = DateTimeComponents::new();
        components.set_date(&LocalDate::new(2023, 1, 2).unwrap());
        components.set_time(&LocalTime::new(3, 4, 5, 0).unwrap());
        components.set_offset(&UtcOffset::from_hours(0).unwrap());
        assert_eq!(format.format(&components).unwrap(), "2023-01-02T03:04:05Z");

        components.set_time(&LocalTime::new(3, 4, 5, 123_000_000).unwrap());
        components.set_offset(&UtcOffset::from_hours(-7).unwrap());
        assert_eq!(
            format.format(&components).unwrap(),
            "2023-01-02T03:04:05.123-07"
        );

        let parsed = format.parse("2023-01-02T03:04:05.123-07").unwrap();
        assert_eq!(parsed, components);
    }

    #[test]
    fn quoted_literals_and_apostrophes() {
        let format = DateTimeFormat::from_pattern("HH 'o''clock'").unwrap();
        let mut components = DateTimeComponents::new();
        components.hour = Some(9);
        assert_eq!(format.format(&components).unwrap(), "09 o'clock");
        assert_eq!(format.parse("09 o'clock").unwrap().hour(), Some(9));

        let format = DateTimeFormat::from_pattern("HH''mm").unwrap();
        components.minute = Some(30);
        assert_eq!(format.format(&components).unwrap(), "09'30");
    }

    #[test]
    fn padding_extends_the_minimum_width() {
        let format = DateTimeFormat::from_pattern("ppH:mm").unwrap();
        let mut components = DateTimeComponents::new();
        components.hour = Some(7);
        components.minute = Some(5);
        assert_eq!(format.format(&components).unwrap(), "007:05");
        assert!(DateTimeFormat::from_pattern("pp:mm").is_err());
        assert!(DateTimeFormat::from_pattern("Hpp").is_err());
    }

    #[test]
    fn optional_groups_nest() {
        let format = DateTimeFormat::from_pattern("HH:mm[:ss[.SSS]]").unwrap();
        assert_eq!(format.parse("09:05").unwrap().second(), None);
        assert_eq!(format.parse("09:05:07").unwrap().second(), Some(7));
        assert_eq!(
            format.parse("09:05:07.123").unwrap().nanosecond(),
            Some(123_000_000)
        );
        assert!(DateTimeFormat::from_pattern("HH[mm").is_err());
        assert!(DateTimeFormat::from_pattern("HHmm]").is_err());
    }

    #[test]
    fn zone_id_directive() {
        let format = DateTimeFormat::from_pattern("VV").unwrap();
        assert_eq!(
            format.parse("Europe/Berlin").unwrap().time_zone_id(),
            Some("Europe/Berlin")
        );
        assert!(DateTimeFormat::from_pattern("V").is_err());
    }

    #[test]
    fn locale_dependent_directives_fail() {
        for pattern in ["yyyy", "MMM", "EEE", "a", "zzz", "O", "Q"] {
            let error = DateTimeFormat::from_pattern(pattern).unwrap_err();
            assert_eq!(
                error.kind(),
                ErrorKind::LocaleDependentDirective,
                "{pattern}"
            );
        }
    }

    #[test]
    fn unsupported_directives_fail() {
        for pattern in ["uu", "F", "A", "n", "N", "W", "r", "g", "U", "k", "h"] {
            let error = DateTimeFormat::from_pattern(pattern).unwrap_err();
            assert_eq!(error.kind(), ErrorKind::UnsupportedDirective, "{pattern}");
        }
    }

    #[test]
    fn offset_directive_lengths() {
        let mut components = DateTimeComponents::new();
        components.offset_seconds = Some(5 * 3600 + 30 * 60);

        let cases: [(&str, &str); 6] = [
            ("X", "+0530"),
            ("XX", "+0530"),
            ("XXX", "+05:30"),
            ("XXXX", "+0530"),
            ("XXXXX", "+05:30"),
            ("ZZZZZ", "+05:30"),
        ];
        for (pattern, expected) in cases {
            let format = DateTimeFormat::from_pattern(pattern).unwrap();
            assert_eq!(format.format(&components).unwrap(), expected, "{pattern}");
        }

        components.offset_seconds = Some(0);
        assert_eq!(
            DateTimeFormat::from_pattern("X")
                .unwrap()
                .format(&components)
                .unwrap(),
            "Z"
        );
        assert_eq!(
            DateTimeFormat::from_pattern("x")
                .unwrap()
                .format(&components)
                .unwrap(),
            "+00"
        );
        assert_eq!(
            DateTimeFormat::from_pattern("ZZ")
                .unwrap()
                .format(&components)
                .unwrap(),
            "+0000"
        );
        assert_eq!(
            DateTimeFormat::from_pattern("ZZZZ").unwrap_err().kind(),
            ErrorKind::LocaleDependentDirective
        );
    }
}

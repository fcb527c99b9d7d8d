//! TZif (RFC 8536) reader.
//!
//! `TZif` is the compiled time zone information format produced by
//! [`zic`][zic-manual] and laid out by [RFC 8536][rfc8536] and the
//! [tzfile manual][tzif-manual]. The reader takes a contiguous byte
//! buffer and produces a [`TimeZoneRules`] table directly; leap-second
//! records are deliberately discarded (the engine is UTC-SLS-like).
//!
//! Version 2+ files carry two bodies; the 64-bit second body is the
//! only one consulted when present. Version 1 times are 32-bit seconds
//! with no scaling.
//!
//! [rfc8536]: https://datatracker.ietf.org/doc/html/rfc8536
//! [tzif-manual]: https://man7.org/linux/man-pages/man5/tzfile.5.html
//! [zic-manual]: https://man7.org/linux/man-pages/man8/zic.8.html

use alloc::vec::Vec;

use crate::cursor::Cursor;
use crate::posix::PosixTimeZone;
use crate::rules::{TimeZoneRules, UtcOffsetSeconds};
use crate::{TzdbError, TzdbResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Version {
    V1,
    V2,
    V3,
}

/// A TZif header. Both bodies of a v2+ file carry one.
#[derive(Debug, Clone, Copy)]
struct Header {
    version: Version,
    isut_count: usize,
    isstd_count: usize,
    leap_count: usize,
    transition_count: usize,
    type_count: usize,
    char_count: usize,
}

impl Header {
    fn parse(cursor: &mut Cursor<'_>) -> TzdbResult<Self> {
        let magic = cursor.read_exact(4)?;
        if magic != *b"TZif" {
            return Err(TzdbError::invalid_format("TZif magic not found"));
        }

        let version = match cursor.read_u8()? {
            0x00 => Version::V1,
            0x32 => Version::V2,
            0x33 => Version::V3,
            _ => {
                return Err(TzdbError::unsupported_version(
                    "only TZif versions 1, 2 and 3 are supported",
                ))
            }
        };

        // Reserved bytes.
        cursor.read_exact(15)?;

        let isut_count = cursor.read_be_u32()? as usize;
        let isstd_count = cursor.read_be_u32()? as usize;
        let leap_count = cursor.read_be_u32()? as usize;
        let transition_count = cursor.read_be_u32()? as usize;
        let type_count = cursor.read_be_u32()? as usize;
        let char_count = cursor.read_be_u32()? as usize;

        if type_count == 0 || char_count == 0 {
            return Err(TzdbError::invalid_format(
                "TZif header must announce at least one local time type",
            ));
        }

        Ok(Self {
            version,
            isut_count,
            isstd_count,
            leap_count,
            transition_count,
            type_count,
            char_count,
        })
    }
}

/// A local time type record: the offset it stands for and whether it is
/// daylight saving time.
#[derive(Debug, Clone, Copy)]
struct LocalTimeType {
    utoff: i32,
    #[allow(dead_code)]
    is_dst: bool,
}

#[derive(Debug)]
struct DataBlock {
    transition_times: Vec<i64>,
    transition_types: Vec<u8>,
    types: Vec<LocalTimeType>,
}

impl DataBlock {
    fn parse(cursor: &mut Cursor<'_>, header: &Header, wide_times: bool) -> TzdbResult<Self> {
        let mut transition_times = Vec::with_capacity(header.transition_count);
        for _ in 0..header.transition_count {
            let time = if wide_times {
                cursor.read_be_i64()?
            } else {
                i64::from(cursor.read_be_i32()?)
            };
            transition_times.push(time);
        }

        let mut transition_types = Vec::with_capacity(header.transition_count);
        for _ in 0..header.transition_count {
            let index = cursor.read_u8()?;
            if usize::from(index) >= header.type_count {
                return Err(TzdbError::invalid_format(
                    "transition type index out of range",
                ));
            }
            transition_types.push(index);
        }

        let mut types = Vec::with_capacity(header.type_count);
        for _ in 0..header.type_count {
            let utoff = cursor.read_be_i32()?;
            let is_dst = match cursor.read_u8()? {
                0 => false,
                1 => true,
                _ => return Err(TzdbError::invalid_format("invalid is-dst indicator")),
            };
            let abbreviation_index = cursor.read_u8()?;
            if usize::from(abbreviation_index) >= header.char_count {
                return Err(TzdbError::invalid_format(
                    "abbreviation index out of range",
                ));
            }
            types.push(LocalTimeType { utoff, is_dst });
        }

        // Designations, leap second records, and the standard/wall and
        // UT/local indicators are read past and discarded.
        cursor.read_exact(header.char_count)?;
        let leap_record_size = if wide_times { 12 } else { 8 };
        cursor.read_exact(header.leap_count * leap_record_size)?;
        cursor.read_exact(header.isstd_count)?;
        cursor.read_exact(header.isut_count)?;

        Ok(Self {
            transition_times,
            transition_types,
            types,
        })
    }
}

/// Parses a TZif byte stream into a rules table.
pub fn parse_tzif(bytes: &[u8]) -> TzdbResult<TimeZoneRules> {
    let mut cursor = Cursor::new(bytes);

    let header1 = Header::parse(&mut cursor)?;
    let block1 = DataBlock::parse(&mut cursor, &header1, false)?;

    let (block, posix) = if header1.version >= Version::V2 {
        let header2 = Header::parse(&mut cursor)?;
        if header2.version < Version::V2 {
            return Err(TzdbError::invalid_format(
                "second header downgrades the announced version",
            ));
        }
        let block2 = DataBlock::parse(&mut cursor, &header2, true)?;
        let footer = parse_footer(&mut cursor)?;
        (block2, footer)
    } else {
        (block1, None)
    };

    assemble(block, posix)
}

/// Reads the newline-delimited footer. A malformed TZ string degrades
/// to "no recurring rules" rather than failing the whole file.
fn parse_footer(cursor: &mut Cursor<'_>) -> TzdbResult<Option<PosixTimeZone>> {
    cursor.read_tag(b"\n")?;
    let footer = cursor.read_until(b'\n');
    cursor.read_tag(b"\n")?;
    if footer.is_empty() {
        return Ok(None);
    }
    let Ok(footer) = core::str::from_utf8(footer) else {
        return Ok(None);
    };
    Ok(PosixTimeZone::parse(footer).ok())
}

fn assemble(block: DataBlock, posix: Option<PosixTimeZone>) -> TzdbResult<TimeZoneRules> {
    let mut offsets = Vec::with_capacity(block.transition_times.len() + 1);
    offsets.push(UtcOffsetSeconds(block.types[0].utoff));
    for type_index in &block.transition_types {
        offsets.push(UtcOffsetSeconds(
            block.types[usize::from(*type_index)].utoff,
        ));
    }
    let recurring = posix.as_ref().and_then(PosixTimeZone::recurring);
    TimeZoneRules::new(block.transition_times, offsets, recurring)
}

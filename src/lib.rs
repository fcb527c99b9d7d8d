//! `datetime_rs` is a locale-invariant engine for civil and physical
//! time built on the proleptic ISO-8601 calendar.
//!
//! The crate centers on a small set of immutable value types:
//! [`Instant`], [`LocalDate`], [`LocalTime`], [`LocalDateTime`],
//! [`UtcOffset`], and [`DateTimePeriod`]. A [`TimeZone`] facade maps
//! between the physical timeline and local wall-clock time, correctly
//! resolving the gaps and overlaps daylight saving transitions punch
//! into local time.
//!
//! Zone rules come from the companion `tzdb_provider` crate, which
//! reads IANA TZif files (RFC 8536) and Windows registry records into
//! one neutral rules shape. The [`format`] module houses a composable
//! formatter/parser builder, a Unicode-pattern compiler for its
//! locale-invariant subset, and the ISO-8601 presets the value types'
//! `Display`/`parse` implementations use.
//!
//! Everything environmental (the clock, the system zone id, the tzdb
//! bytes) arrives through the narrow capability traits in [`host`].
#![cfg_attr(not(feature = "std"), no_std)]
#![cfg_attr(not(test), forbid(clippy::unwrap_used))]
#![allow(clippy::module_name_repetitions)]

extern crate alloc;

pub mod error;
pub mod format;
pub mod host;

#[cfg(feature = "tzdb")]
pub mod tzdb;

mod arithmetic;
mod date;
mod datetime;
mod instant;
mod offset;
mod period;
#[cfg(feature = "tzdb")]
mod sys;
mod time;
mod timezone;
mod unit;
pub(crate) mod utils;

#[doc(inline)]
pub use error::{DateTimeError, ErrorKind};

/// The `datetime_rs` result type.
pub type DateTimeResult<T> = Result<T, DateTimeError>;

pub use date::{DayOfWeek, LocalDate, Month};
pub use datetime::LocalDateTime;
pub use format::{DateTimeComponents, DateTimeFormat};
pub use instant::Instant;
pub use offset::UtcOffset;
pub use period::{DatePeriod, DateTimePeriod};
pub use time::LocalTime;
pub use timezone::{LocalTimeResolver, OffsetInfo, TimeZone, UnambiguousInstant};
pub use unit::DateTimeUnit;

#[cfg(feature = "tzdb")]
pub use sys::SystemHost;

// The rules layer is part of the public surface: region zones are
// built from these types.
pub use tzdb_provider as provider;
pub use tzdb_provider::rules::TimeZoneRules;

#[cfg(feature = "sys")]
impl Instant {
    /// The current moment from the system clock.
    pub fn now() -> Instant {
        match sys::system_seconds_and_nanos() {
            Ok((seconds, nanos)) => Instant::from_epoch_seconds(seconds, i64::from(nanos)),
            Err(error) => {
                log::warn!("system clock unavailable: {error}");
                Instant::UNIX_EPOCH
            }
        }
    }
}

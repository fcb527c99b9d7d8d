//! Time zone rules and tzdb codecs for `datetime_rs`.
//!
//! This crate owns the data layer of the library: the [TZif][rfc8536]
//! binary reader, the POSIX TZ string parser, the Windows registry
//! `TZI` adapter, and the [`rules::TimeZoneRules`] engine that maps
//! between the physical timeline and local wall-clock time.
//!
//! Everything here works on raw epoch seconds and offset seconds; the
//! `datetime_rs` crate layers its value types on top.
//!
//! [rfc8536]: https://datatracker.ietf.org/doc/html/rfc8536
#![cfg_attr(not(feature = "std"), no_std)]
#![cfg_attr(not(test), forbid(clippy::unwrap_used))]
#![allow(clippy::module_name_repetitions)]

extern crate alloc;

pub mod posix;
pub mod rules;
pub mod tzif;
pub mod windows;

pub(crate) mod cursor;
pub(crate) mod utils;

use alloc::borrow::Cow;

/// The `tzdb_provider` result type.
pub type TzdbResult<T> = Result<T, TzdbError>;

/// The kind of failure encountered while decoding tzdb data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum TzdbErrorKind {
    /// The byte stream or rule string did not match the expected grammar.
    InvalidFormat,
    /// The data announced a version this crate does not read.
    UnsupportedVersion,
}

impl core::fmt::Display for TzdbErrorKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::InvalidFormat => f.write_str("InvalidFormat"),
            Self::UnsupportedVersion => f.write_str("UnsupportedVersion"),
        }
    }
}

/// An error produced while decoding tzdb data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TzdbError {
    kind: TzdbErrorKind,
    message: Cow<'static, str>,
}

impl TzdbError {
    pub(crate) const fn invalid_format(message: &'static str) -> Self {
        Self {
            kind: TzdbErrorKind::InvalidFormat,
            message: Cow::Borrowed(message),
        }
    }

    pub(crate) const fn unsupported_version(message: &'static str) -> Self {
        Self {
            kind: TzdbErrorKind::UnsupportedVersion,
            message: Cow::Borrowed(message),
        }
    }

    /// Returns the kind of this error.
    pub fn kind(&self) -> TzdbErrorKind {
        self.kind
    }

    /// Returns the error message.
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl core::fmt::Display for TzdbError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)
    }
}

impl core::error::Error for TzdbError {}

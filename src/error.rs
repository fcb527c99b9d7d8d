//! The error type for `datetime_rs` operations.

use alloc::borrow::Cow;
use alloc::string::String;

use tzdb_provider::{TzdbError, TzdbErrorKind};

/// The kind of failure a [`DateTimeError`] carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum ErrorKind {
    /// A string could not be parsed against the expected grammar.
    InvalidFormat,
    /// A zone identifier is not known to the tzdb.
    UnknownZone,
    /// A pattern used a directive the library does not implement.
    UnsupportedDirective,
    /// A pattern used a directive that requires locale data.
    LocaleDependentDirective,
    /// Arithmetic overflow or a value left its representable range.
    DateTimeArithmetic,
    /// Parsing assigned contradictory values to the same field.
    Conflict,
    /// Formatting required a field the caller did not supply.
    MissingField,
    /// The host failed to provide tzdb data.
    TimeZoneDbUnavailable,
    /// A constructor invariant was violated.
    IllegalArgument,
}

impl core::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(match self {
            Self::InvalidFormat => "InvalidFormat",
            Self::UnknownZone => "UnknownZone",
            Self::UnsupportedDirective => "UnsupportedDirective",
            Self::LocaleDependentDirective => "LocaleDependentDirective",
            Self::DateTimeArithmetic => "DateTimeArithmetic",
            Self::Conflict => "Conflict",
            Self::MissingField => "MissingField",
            Self::TimeZoneDbUnavailable => "TimeZoneDbUnavailable",
            Self::IllegalArgument => "IllegalArgument",
        })
    }
}

/// The core error type. Carries a kind and a short message identifying
/// the offending input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateTimeError {
    kind: ErrorKind,
    message: Cow<'static, str>,
}

impl DateTimeError {
    #[inline]
    #[must_use]
    pub(crate) const fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            message: Cow::Borrowed(""),
        }
    }

    /// Creates an `InvalidFormat` error.
    #[must_use]
    pub const fn invalid_format() -> Self {
        Self::new(ErrorKind::InvalidFormat)
    }

    /// Creates an `UnknownZone` error.
    #[must_use]
    pub const fn unknown_zone() -> Self {
        Self::new(ErrorKind::UnknownZone)
    }

    /// Creates an `UnsupportedDirective` error.
    #[must_use]
    pub const fn unsupported_directive() -> Self {
        Self::new(ErrorKind::UnsupportedDirective)
    }

    /// Creates a `LocaleDependentDirective` error.
    #[must_use]
    pub const fn locale_dependent_directive() -> Self {
        Self::new(ErrorKind::LocaleDependentDirective)
    }

    /// Creates a `DateTimeArithmetic` error.
    #[must_use]
    pub const fn arithmetic() -> Self {
        Self::new(ErrorKind::DateTimeArithmetic)
    }

    /// Creates a `Conflict` error.
    #[must_use]
    pub const fn conflict() -> Self {
        Self::new(ErrorKind::Conflict)
    }

    /// Creates a `MissingField` error.
    #[must_use]
    pub const fn missing_field() -> Self {
        Self::new(ErrorKind::MissingField)
    }

    /// Creates a `TimeZoneDbUnavailable` error.
    #[must_use]
    pub const fn tzdb_unavailable() -> Self {
        Self::new(ErrorKind::TimeZoneDbUnavailable)
    }

    /// Creates an `IllegalArgument` error.
    #[must_use]
    pub const fn illegal_argument() -> Self {
        Self::new(ErrorKind::IllegalArgument)
    }

    /// Attaches a message to this error.
    #[must_use]
    pub fn with_message(mut self, message: impl Into<Cow<'static, str>>) -> Self {
        self.message = message.into();
        self
    }

    /// Returns this error's kind.
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Returns this error's message.
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl core::fmt::Display for DateTimeError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.kind)?;
        if !self.message.is_empty() {
            write!(f, ": {}", self.message)?;
        }
        Ok(())
    }
}

impl core::error::Error for DateTimeError {}

impl From<TzdbError> for DateTimeError {
    fn from(error: TzdbError) -> Self {
        let kind = match error.kind() {
            TzdbErrorKind::InvalidFormat => ErrorKind::InvalidFormat,
            TzdbErrorKind::UnsupportedVersion => ErrorKind::InvalidFormat,
            _ => ErrorKind::TimeZoneDbUnavailable,
        };
        Self::new(kind).with_message(String::from(error.message()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_kind_and_message() {
        let error = DateTimeError::unknown_zone().with_message("Unknown time zone: 'Mars/Standard'");
        assert_eq!(
            alloc::format!("{error}"),
            "UnknownZone: Unknown time zone: 'Mars/Standard'"
        );
        assert_eq!(error.kind(), ErrorKind::UnknownZone);
    }
}

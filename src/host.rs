//! Trait definitions for accessing values from the host environment.
//!
//! The core never touches the clock, the filesystem, or the registry
//! itself; everything environmental arrives through this narrow
//! surface.

use alloc::collections::BTreeSet;
use alloc::string::String;
use alloc::vec::Vec;

use crate::DateTimeResult;

/// Access to the host's clock.
pub trait HostClock {
    /// The current moment as whole epoch seconds plus the nanosecond
    /// within the second.
    fn now_seconds_and_nanos(&self) -> DateTimeResult<(i64, i32)>;
}

/// Access to the host's configured time zone.
pub trait HostTimeZone {
    /// A zone identifier: `"UTC"`, an IANA id, a fixed offset, or the
    /// `"SYSTEM"` sentinel when the host cannot say.
    fn system_time_zone_id(&self) -> DateTimeResult<String>;
}

/// Access to the host's compiled time zone database.
pub trait HostTzdb {
    /// The raw TZif bytes for an identifier, if the host has them.
    fn tzdb_lookup(&self, id: &str) -> Option<Vec<u8>>;

    /// Every identifier the host can produce bytes for.
    fn tzdb_list(&self) -> BTreeSet<String>;
}

/// A host that provides all three capabilities.
pub trait HostHooks: HostClock + HostTimeZone + HostTzdb {}

// The unit host provides nothing: a fixed clock at the epoch, the UTC
// zone, and an empty database.

impl HostClock for () {
    fn now_seconds_and_nanos(&self) -> DateTimeResult<(i64, i32)> {
        Ok((0, 0))
    }
}

impl HostTimeZone for () {
    fn system_time_zone_id(&self) -> DateTimeResult<String> {
        Ok(String::from("UTC"))
    }
}

impl HostTzdb for () {
    fn tzdb_lookup(&self, _id: &str) -> Option<Vec<u8>> {
        None
    }

    fn tzdb_list(&self) -> BTreeSet<String> {
        BTreeSet::new()
    }
}

impl HostHooks for () {}

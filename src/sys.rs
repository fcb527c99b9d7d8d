//! System implementations of the host capability traits.

use alloc::collections::BTreeSet;
use alloc::string::{String, ToString};
use alloc::vec::Vec;

use crate::host::HostTzdb;
#[cfg(feature = "sys")]
use crate::host::{HostClock, HostHooks, HostTimeZone};
#[cfg(feature = "sys")]
use crate::{DateTimeError, DateTimeResult};

/// The host backed by the operating system: the system clock, the
/// configured zone id, and the zoneinfo database (with bundled data as
/// a fallback).
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemHost;

#[cfg(feature = "sys")]
pub(crate) fn system_time_zone_id() -> DateTimeResult<String> {
    iana_time_zone::get_timezone()
        .map_err(|e| DateTimeError::tzdb_unavailable().with_message(e.to_string()))
}

#[cfg(feature = "sys")]
pub(crate) fn system_seconds_and_nanos() -> DateTimeResult<(i64, i32)> {
    use web_time::{SystemTime, UNIX_EPOCH};
    match SystemTime::now().duration_since(UNIX_EPOCH) {
        Ok(elapsed) => Ok((
            i64::try_from(elapsed.as_secs()).unwrap_or(i64::MAX),
            elapsed.subsec_nanos() as i32,
        )),
        // A clock before the epoch still has a well-defined reading.
        Err(error) => {
            let behind = error.duration();
            let mut seconds = -i64::try_from(behind.as_secs()).unwrap_or(i64::MAX);
            let mut nanos = behind.subsec_nanos() as i32;
            if nanos > 0 {
                seconds -= 1;
                nanos = 1_000_000_000 - nanos;
            }
            Ok((seconds, nanos))
        }
    }
}

/// The id `/etc/localtime` links to, when the platform keeps one.
#[cfg(all(feature = "sys", unix))]
pub(crate) fn platform_default_zone_id() -> Option<String> {
    let target = std::fs::read_link("/etc/localtime").ok()?;
    let target = target.to_str()?;
    let (_, id) = target.split_once("zoneinfo/")?;
    Some(String::from(id))
}

#[cfg(all(feature = "sys", not(unix)))]
pub(crate) fn platform_default_zone_id() -> Option<String> {
    None
}

#[cfg(unix)]
const ZONEINFO_DIR: &str = "/usr/share/zoneinfo";

/// Whether an id is safe to join onto the zoneinfo directory.
fn is_sane_zone_id(id: &str) -> bool {
    !id.is_empty()
        && !id.starts_with('/')
        && !id.split('/').any(|segment| {
            segment.is_empty() || segment == "." || segment == ".."
        })
}

impl HostTzdb for SystemHost {
    fn tzdb_lookup(&self, id: &str) -> Option<Vec<u8>> {
        if !is_sane_zone_id(id) {
            return None;
        }
        #[cfg(unix)]
        {
            let mut path = std::path::PathBuf::from(ZONEINFO_DIR);
            path.push(id);
            if let Ok(bytes) = std::fs::read(&path) {
                return Some(bytes);
            }
        }
        jiff_tzdb::get(id).map(|(_, bytes)| bytes.to_vec())
    }

    fn tzdb_list(&self) -> BTreeSet<String> {
        #[cfg(unix)]
        {
            let root = std::path::Path::new(ZONEINFO_DIR);
            if root.is_dir() {
                let mut ids = BTreeSet::new();
                collect_zone_ids(root, "", &mut ids);
                if !ids.is_empty() {
                    return ids;
                }
            }
        }
        jiff_tzdb::available().into_iter().map(String::from).collect()
    }
}

#[cfg(unix)]
fn collect_zone_ids(dir: &std::path::Path, prefix: &str, ids: &mut BTreeSet<String>) {
    // Sidecar files and the posix/right duplicates are not zone ids.
    const SKIP: &[&str] = &["posix", "right", "posixrules", "leapseconds", "SECURITY"];
    let Ok(entries) = std::fs::read_dir(dir) else {
        return;
    };
    for entry in entries.flatten() {
        let name = entry.file_name();
        let Some(name) = name.to_str() else {
            continue;
        };
        if name.contains('.') || SKIP.contains(&name) {
            continue;
        }
        let id = if prefix.is_empty() {
            name.to_string()
        } else {
            alloc::format!("{prefix}/{name}")
        };
        let path = entry.path();
        if path.is_dir() {
            collect_zone_ids(&path, &id, ids);
        } else {
            ids.insert(id);
        }
    }
}

#[cfg(feature = "sys")]
impl HostClock for SystemHost {
    fn now_seconds_and_nanos(&self) -> DateTimeResult<(i64, i32)> {
        system_seconds_and_nanos()
    }
}

#[cfg(feature = "sys")]
impl HostTimeZone for SystemHost {
    fn system_time_zone_id(&self) -> DateTimeResult<String> {
        system_time_zone_id()
    }
}

#[cfg(feature = "sys")]
impl HostHooks for SystemHost {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_path_traversal_ids() {
        assert!(!is_sane_zone_id("../../etc/passwd"));
        assert!(!is_sane_zone_id("/etc/localtime"));
        assert!(!is_sane_zone_id("Europe//Berlin"));
        assert!(!is_sane_zone_id(""));
        assert!(is_sane_zone_id("Europe/Berlin"));
        assert!(is_sane_zone_id("America/Argentina/Ushuaia"));
    }

    #[test]
    fn bundled_data_backs_lookups() {
        let host = SystemHost;
        assert!(host.tzdb_lookup("Europe/Berlin").is_some());
        assert!(host.tzdb_lookup("Mars/Standard").is_none());
        assert!(host.tzdb_list().contains("Europe/Berlin"));
    }
}

//! The tzdb registry: zone rules by identifier, behind a bounded LRU
//! cache.
//!
//! The cache is thread-confined; every thread that resolves zones owns
//! its own registry (the `sys`-backed default lives in a
//! thread-local). Rules tables themselves are immutable and shared
//! through `Arc` handles.

use alloc::collections::BTreeSet;
use alloc::string::String;
use alloc::sync::Arc;
use core::cell::RefCell;

use rustc_hash::FxHashMap;
use tzdb_provider::rules::TimeZoneRules;
use tzdb_provider::tzif::parse_tzif;

use crate::host::HostTzdb;
use crate::sys::SystemHost;
use crate::{DateTimeError, DateTimeResult};

/// Zones kept per registry before least-recently-used eviction.
pub const DEFAULT_CACHE_CAPACITY: usize = 16;

#[derive(Debug)]
struct CacheEntry {
    rules: Arc<TimeZoneRules>,
    last_used: u64,
}

#[derive(Debug)]
struct ZoneCache {
    capacity: usize,
    stamp: u64,
    entries: FxHashMap<String, CacheEntry>,
}

impl ZoneCache {
    fn touch(&mut self, id: &str) -> Option<Arc<TimeZoneRules>> {
        self.stamp += 1;
        let stamp = self.stamp;
        let entry = self.entries.get_mut(id)?;
        entry.last_used = stamp;
        Some(entry.rules.clone())
    }

    fn insert(&mut self, id: String, rules: Arc<TimeZoneRules>) {
        self.stamp += 1;
        self.entries.insert(
            id,
            CacheEntry {
                rules,
                last_used: self.stamp,
            },
        );
        if self.entries.len() > self.capacity {
            if let Some(evict) = self
                .entries
                .iter()
                .min_by_key(|(_, entry)| entry.last_used)
                .map(|(id, _)| id.clone())
            {
                self.entries.remove(&evict);
            }
        }
    }
}

/// A tzdb registry over a host's raw TZif bytes.
#[derive(Debug)]
pub struct TimeZoneDb<H> {
    host: H,
    cache: RefCell<ZoneCache>,
}

impl<H: HostTzdb> TimeZoneDb<H> {
    /// A registry with the default cache bound.
    pub fn new(host: H) -> Self {
        Self::with_capacity(host, DEFAULT_CACHE_CAPACITY)
    }

    /// A registry with an explicit cache bound.
    pub fn with_capacity(host: H, capacity: usize) -> Self {
        Self {
            host,
            cache: RefCell::new(ZoneCache {
                capacity: capacity.max(1),
                stamp: 0,
                entries: FxHashMap::default(),
            }),
        }
    }

    /// The rules for an identifier, from cache or by invoking the
    /// host's loader once and caching the result.
    pub fn get(&self, id: &str) -> DateTimeResult<Arc<TimeZoneRules>> {
        if let Some(rules) = self.cache.borrow_mut().touch(id) {
            return Ok(rules);
        }
        let bytes = self.host.tzdb_lookup(id).ok_or_else(|| {
            DateTimeError::unknown_zone()
                .with_message(alloc::format!("Unknown time zone: '{id}'"))
        })?;
        let rules = Arc::new(parse_tzif(&bytes).map_err(|error| {
            log::debug!("tzdb data for '{id}' did not parse: {error}");
            DateTimeError::from(error)
        })?);
        self.cache
            .borrow_mut()
            .insert(String::from(id), rules.clone());
        Ok(rules)
    }

    /// Every identifier the host can serve.
    pub fn available_ids(&self) -> BTreeSet<String> {
        self.host.tzdb_list()
    }
}

std::thread_local! {
    static DEFAULT_DB: TimeZoneDb<SystemHost> = TimeZoneDb::new(SystemHost);
}

/// Runs a closure against this thread's default registry.
pub(crate) fn with_default_db<R>(f: impl FnOnce(&TimeZoneDb<SystemHost>) -> R) -> R {
    DEFAULT_DB.with(f)
}

/// The identifiers the default registry can serve.
pub fn available_zone_ids() -> BTreeSet<String> {
    with_default_db(TimeZoneDb::available_ids)
}

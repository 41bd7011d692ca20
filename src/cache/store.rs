//! Cache Store Module
//!
//! Main cache engine: a HashMap guarded by a single reader/writer lock, with
//! TTL expiration enforced by a background reaper.

use std::collections::HashMap;
use std::fmt::{Display, Write as _};
use std::sync::{Arc, Weak};

use parking_lot::RwLock;
use tracing::{debug, info};

use crate::cache::entry::{current_timestamp_ms, deadline_from_ttl};
use crate::cache::stats::StatsRecorder;
use crate::cache::{CacheEntry, CacheStats, Numeric};
use crate::config::Config;
use crate::error::{CacheError, Result};
use crate::tasks::Reaper;

/// State shared between the engine and its reaper task.
#[derive(Debug)]
struct Shared<V> {
    /// Key-value storage
    entries: RwLock<HashMap<String, CacheEntry<V>>>,
    /// Hit, miss and expiration counters
    stats: StatsRecorder,
}

impl<V> Shared<V> {
    // == Purge Expired ==
    /// Removes every entry whose deadline is strictly in the past.
    ///
    /// The expiration check and the removal happen under one write lock, so a
    /// concurrent `set` can never be undone by a stale decision.
    fn purge_expired(&self) -> usize {
        let now = current_timestamp_ms();
        let removed = {
            let mut entries = self.entries.write();
            let before = entries.len();
            entries.retain(|_, entry| !entry.is_expired_at(now));
            before - entries.len()
        };

        self.stats.record_expired(removed);
        removed
    }
}

// == Cache ==
/// Thread-safe key-value cache with optional per-entry TTL.
///
/// Reads (`get`, `ttl`, `dump`) take the lock in shared mode; writes (`set`,
/// `delete`, `increment`, `increment_by`) and reaper sweeps take it
/// exclusively. Values are always returned as clones.
///
/// `get` does not check expiration itself: an entry whose deadline has passed
/// stays readable until the next sweep removes it.
///
/// ```
/// use mini_cache::Cache;
///
/// let cache: Cache<u64> = Cache::new().unwrap();
/// cache.set("visits", 10, None).unwrap();
/// assert_eq!(cache.increment("visits", None).unwrap(), 11);
/// ```
///
/// Increments only exist for numeric value types:
///
/// ```compile_fail
/// use mini_cache::Cache;
///
/// let cache: Cache<String> = Cache::new().unwrap();
/// cache.increment("name", None);
/// ```
#[derive(Debug)]
pub struct Cache<V> {
    shared: Arc<Shared<V>>,
    reaper: Reaper,
}

impl<V> Cache<V>
where
    V: Clone + Send + Sync + 'static,
{
    // == Constructor ==
    /// Creates an empty cache whose reaper sweeps every second.
    pub fn new() -> Result<Self> {
        Self::with_config(&Config::default())
    }

    /// Creates an empty cache using the reaper interval from `config`.
    ///
    /// # Errors
    /// Returns `CacheError::Failure` if the reaper cannot be started.
    pub fn with_config(config: &Config) -> Result<Self> {
        let shared = Arc::new(Shared {
            entries: RwLock::new(HashMap::new()),
            stats: StatsRecorder::default(),
        });

        let mut reaper = Reaper::new();
        reaper.start(config.reaper_interval(), sweep_task(Arc::downgrade(&shared)))?;

        debug!(
            "Cache created with reaper interval of {}ms",
            config.reaper_interval_ms
        );

        Ok(Self { shared, reaper })
    }

    // == Get ==
    /// Returns a copy of the value stored under `key`.
    pub fn get(&self, key: &str) -> Result<V> {
        validate_key(key)?;

        let entries = self.shared.entries.read();
        match entries.get(key) {
            Some(entry) => {
                self.shared.stats.record_hit();
                Ok(entry.value.clone())
            }
            None => {
                self.shared.stats.record_miss();
                Err(CacheError::KeyNotFound(key.to_string()))
            }
        }
    }

    // == Set ==
    /// Stores a value, replacing any existing entry together with its TTL.
    ///
    /// # Arguments
    /// * `key` - The key to store, must not be empty
    /// * `value` - The value to store
    /// * `ttl` - TTL in seconds; `None` or `Some(-1)` never expires, zero or
    ///   negative values are due immediately
    pub fn set(&self, key: &str, value: V, ttl: Option<i64>) -> Result<()> {
        validate_key(key)?;

        let entry = CacheEntry::new(value, ttl);
        self.shared.entries.write().insert(key.to_string(), entry);
        Ok(())
    }

    // == TTL ==
    /// Returns the remaining TTL of `key` in seconds.
    ///
    /// Returns `-1` for entries that never expire. The result may be zero or
    /// negative for entries past their deadline that have not been swept yet.
    pub fn ttl(&self, key: &str) -> Result<i64> {
        validate_key(key)?;

        let entries = self.shared.entries.read();
        entries
            .get(key)
            .map(|entry| entry.ttl_remaining())
            .ok_or_else(|| CacheError::KeyNotFound(key.to_string()))
    }

    // == Delete ==
    /// Removes an entry by key.
    pub fn delete(&self, key: &str) -> Result<()> {
        validate_key(key)?;

        let removed = self.shared.entries.write().remove(key);
        match removed {
            Some(_) => Ok(()),
            None => Err(CacheError::KeyNotFound(key.to_string())),
        }
    }

    // == Length ==
    /// Returns the current number of entries, including expired entries that
    /// have not been swept yet.
    pub fn len(&self) -> usize {
        self.shared.entries.read().len()
    }

    // == Is Empty ==
    /// Returns true if the cache holds no entries.
    pub fn is_empty(&self) -> bool {
        self.shared.entries.read().is_empty()
    }

    // == Stats ==
    /// Returns current cache statistics.
    pub fn stats(&self) -> CacheStats {
        self.shared.stats.snapshot(self.len())
    }

    /// Reports whether the background reaper is alive.
    pub fn reaper_running(&self) -> bool {
        self.reaper.is_running()
    }

    /// Runs one sweep pass immediately and returns the number of removed entries.
    pub(crate) fn purge_expired(&self) -> usize {
        self.shared.purge_expired()
    }
}

impl<V> Cache<V>
where
    V: Numeric,
{
    // == Increment ==
    /// Adds one to the value under `key` and returns the new value.
    ///
    /// An absent key is created with value `1`. The deadline is always
    /// recomputed from `ttl`, so incrementing without a TTL clears any
    /// expiration the entry had before.
    pub fn increment(&self, key: &str, ttl: Option<i64>) -> Result<V> {
        self.add(key, V::ONE, ttl)
    }

    // == Increment By ==
    /// Adds `delta` to the value under `key` and returns the new value.
    ///
    /// An absent key is seeded with `delta`. The deadline is refreshed the same
    /// way as [`Cache::increment`].
    ///
    /// # Errors
    /// - `CacheError::NotNumeric` if `delta` or the sum is NaN
    /// - `CacheError::Overflow` if the sum is out of range for `V`
    pub fn increment_by(&self, key: &str, delta: V, ttl: Option<i64>) -> Result<V> {
        self.add(key, delta, ttl)
    }

    fn add(&self, key: &str, delta: V, ttl: Option<i64>) -> Result<V> {
        validate_key(key)?;
        if !delta.is_number() {
            return Err(CacheError::NotNumeric(key.to_string()));
        }

        let now = current_timestamp_ms();
        let expires_at = deadline_from_ttl(ttl, now);

        // Read, compute and write back under one exclusive lock
        let mut entries = self.shared.entries.write();
        match entries.get_mut(key) {
            Some(entry) => {
                if !entry.value.is_number() {
                    return Err(CacheError::NotNumeric(key.to_string()));
                }
                let value = entry
                    .value
                    .try_add(delta)
                    .ok_or_else(|| CacheError::Overflow(key.to_string()))?;
                entry.value = value;
                entry.created_at = now;
                entry.expires_at = expires_at;
                Ok(value)
            }
            None => {
                entries.insert(
                    key.to_string(),
                    CacheEntry {
                        value: delta,
                        created_at: now,
                        expires_at,
                    },
                );
                Ok(delta)
            }
        }
    }
}

impl<V> Cache<V>
where
    V: Clone + Display + Send + Sync + 'static,
{
    // == Dump ==
    /// Renders a human-readable table of all keys, values and remaining TTLs.
    ///
    /// Keys are listed in sorted order; unexpiring entries show `-1`.
    pub fn dump(&self) -> String {
        let mut out = String::from("\n----------------------------------------\n");
        {
            let entries = self.shared.entries.read();
            let now = current_timestamp_ms();

            let _ = writeln!(out, "[key]\t[value]\t[expire]\t({} keys)", entries.len());

            let mut keys: Vec<&String> = entries.keys().collect();
            keys.sort();
            for key in keys {
                let entry = &entries[key];
                let _ = writeln!(
                    out,
                    "{}\t{}\t{}",
                    key,
                    entry.value,
                    entry.ttl_remaining_at(now)
                );
            }
        }
        out.push_str("----------------------------------------\n");
        out
    }
}

impl<V> Drop for Cache<V> {
    fn drop(&mut self) {
        // The reaper must be quiesced before the table goes away
        self.reaper.stop();
        debug!("Cache dropped");
    }
}

/// Builds the reaper callback. It holds only a weak reference to the table.
fn sweep_task<V>(shared: Weak<Shared<V>>) -> impl FnMut() + Send + 'static
where
    V: Send + Sync + 'static,
{
    move || {
        let Some(shared) = shared.upgrade() else {
            return;
        };

        let removed = shared.purge_expired();
        if removed > 0 {
            info!("TTL sweep: removed {} expired entries", removed);
        } else {
            debug!("TTL sweep: no expired entries found");
        }
    }
}

fn validate_key(key: &str) -> Result<()> {
    if key.is_empty() {
        Err(CacheError::KeyEmpty)
    } else {
        Ok(())
    }
}

//! Cache Entry Module
//!
//! Defines the structure for individual cache entries with TTL support.

use crate::cache::NO_EXPIRY;

// == Cache Entry ==
/// Represents a single cache entry with value and metadata.
#[derive(Debug, Clone)]
pub struct CacheEntry<V> {
    /// The stored value
    pub value: V,
    /// Creation or last refresh timestamp (Unix milliseconds)
    pub created_at: i64,
    /// Expiration timestamp (Unix milliseconds), None = no expiration
    pub expires_at: Option<i64>,
}

impl<V> CacheEntry<V> {
    // == Constructor ==
    /// Creates a new cache entry with an optional TTL in seconds.
    ///
    /// `None` and `Some(NO_EXPIRY)` both mean the entry never expires.
    pub fn new(value: V, ttl_seconds: Option<i64>) -> Self {
        let now = current_timestamp_ms();
        Self {
            value,
            created_at: now,
            expires_at: deadline_from_ttl(ttl_seconds, now),
        }
    }

    // == Is Expired ==
    /// Checks if the entry's deadline lies strictly before `now_ms`.
    ///
    /// Entries without a deadline never expire.
    pub fn is_expired_at(&self, now_ms: i64) -> bool {
        match self.expires_at {
            Some(expires) => expires < now_ms,
            None => false,
        }
    }

    /// Checks expiration against the current clock.
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(current_timestamp_ms())
    }

    // == Time To Live ==
    /// Returns the remaining TTL in seconds relative to `now_ms`.
    ///
    /// # Returns
    /// - `NO_EXPIRY` (-1) if the entry never expires
    /// - the remaining seconds, rounded up, while the deadline is ahead
    /// - zero or a negative number once the deadline has passed but the
    ///   reaper has not swept the entry yet
    pub fn ttl_remaining_at(&self, now_ms: i64) -> i64 {
        match self.expires_at {
            None => NO_EXPIRY,
            Some(expires) => {
                let remaining_ms = expires.saturating_sub(now_ms);
                if remaining_ms > 0 {
                    (remaining_ms + 999) / 1000
                } else {
                    remaining_ms / 1000
                }
            }
        }
    }

    /// Returns remaining TTL in seconds against the current clock.
    pub fn ttl_remaining(&self) -> i64 {
        self.ttl_remaining_at(current_timestamp_ms())
    }
}

// == Utility Functions ==
/// Computes the absolute deadline for a TTL given in seconds.
///
/// Zero and negative TTLs (other than `NO_EXPIRY`) produce a deadline that is
/// already due.
pub fn deadline_from_ttl(ttl_seconds: Option<i64>, now_ms: i64) -> Option<i64> {
    match ttl_seconds {
        None | Some(NO_EXPIRY) => None,
        Some(ttl) => Some(now_ms.saturating_add(ttl.saturating_mul(1000))),
    }
}

/// Returns current Unix timestamp in milliseconds.
pub fn current_timestamp_ms() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

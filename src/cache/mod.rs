//! Cache Module
//!
//! Provides a thread-safe in-memory cache with TTL expiration and numeric
//! increments.

mod entry;
mod numeric;
mod stats;
mod store;


// Re-export public types
pub use entry::CacheEntry;
pub use numeric::Numeric;
pub use stats::CacheStats;
pub use store::Cache;

// == Public Constants ==
/// TTL sentinel meaning "never expires"
pub const NO_EXPIRY: i64 = -1;

/// Default interval between two reaper sweeps, in milliseconds
pub const DEFAULT_REAPER_INTERVAL_MS: u64 = 1000;

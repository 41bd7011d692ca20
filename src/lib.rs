//! Mini Cache - A thread-safe in-process key-value cache
//!
//! Provides Redis-like get/set/ttl/del/incr/incrby operations with per-entry
//! TTL expiration enforced by a background reaper.

pub mod cache;
pub mod config;
pub mod error;
pub mod tasks;

pub use cache::{Cache, CacheStats, Numeric, NO_EXPIRY};
pub use config::Config;
pub use error::{CacheError, Result};

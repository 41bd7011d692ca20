//! Mini Cache - demo driver
//!
//! Exercises the cache engine the way an embedding process would: plain and
//! expiring sets, reads, TTL queries, counters, and the reaper at work.

use std::thread::sleep;
use std::time::Duration;

use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use mini_cache::{Cache, Config};

/// Main entry point for the demo.
///
/// # Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Load configuration from environment variables
/// 3. Fill a cache with unexpiring and short-lived keys
/// 4. Query values, TTLs and counters
/// 5. Wait for the reaper to evict the short-lived keys
fn main() -> anyhow::Result<()> {
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "mini_cache=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env();
    info!(
        "Configuration loaded: reaper_interval={}ms",
        config.reaper_interval_ms
    );

    let cache: Cache<u64> = Cache::with_config(&config)?;

    cache.set("123", 777, None)?;
    cache.set("123", 999, None)?;
    for name in ["alpha", "bravo", "charlie"] {
        cache.set(name, 123, None)?;
    }
    for n in 1..=5u64 {
        cache.set(&n.to_string(), n, Some(3))?;
    }

    info!("get 123 -> {}", cache.get("123")?);
    println!("{}", cache.dump());

    sleep(Duration::from_secs(1));
    info!("ttl 4 -> {}s", cache.ttl("4")?);
    info!("incr 123 -> {}", cache.increment("123", None)?);
    info!("incrby 123 100 -> {}", cache.increment_by("123", 100, None)?);
    info!("incr 3 -> {}", cache.increment("3", Some(10))?);

    // Keys 1, 2, 4 and 5 expire; key 3 was refreshed by its increment
    sleep(Duration::from_millis(3000 + 2 * config.reaper_interval_ms));
    println!("{}", cache.dump());

    let stats = cache.stats();
    println!("{}", serde_json::to_string_pretty(&stats)?);

    info!("Demo complete");
    Ok(())
}

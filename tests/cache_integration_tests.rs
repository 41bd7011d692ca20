//! Integration Tests for the Cache Engine
//!
//! Tests the public API end to end, including the background reaper and
//! concurrent access from many threads.

use std::sync::{Arc, Barrier};
use std::thread::{self, sleep};
use std::time::Duration;

use mini_cache::{Cache, CacheError, Config};

// == Helper Functions ==

fn fast_reaper_cache<V: Clone + Send + Sync + 'static>() -> Cache<V> {
    Cache::with_config(&Config {
        reaper_interval_ms: 100,
    })
    .unwrap()
}

// == Expiration Tests ==

#[test]
fn test_expired_entry_is_reaped() {
    let cache: Cache<i32> = Cache::new().unwrap();

    cache.set("a", 10, Some(1)).unwrap();
    assert_eq!(cache.get("a").unwrap(), 10);

    sleep(Duration::from_secs(2) + Duration::from_millis(500));

    assert_eq!(cache.get("a"), Err(CacheError::KeyNotFound("a".to_string())));
    assert!(cache.stats().expired >= 1);
}

#[test]
fn test_reaper_keeps_live_entries() {
    let cache = fast_reaper_cache();

    cache.set("forever", "x".to_string(), None).unwrap();
    cache.set("later", "y".to_string(), Some(3600)).unwrap();
    cache.set("gone", "z".to_string(), Some(0)).unwrap();

    sleep(Duration::from_millis(500));

    assert_eq!(cache.get("forever").unwrap(), "x");
    assert_eq!(cache.get("later").unwrap(), "y");
    assert!(matches!(cache.get("gone"), Err(CacheError::KeyNotFound(_))));
    assert_eq!(cache.len(), 2);
}

#[test]
fn test_set_after_expiry_is_not_reaped() {
    let cache = fast_reaper_cache();

    cache.set("k", 1u64, Some(-5)).unwrap();
    cache.set("k", 2u64, Some(60)).unwrap();

    sleep(Duration::from_millis(400));

    assert_eq!(cache.get("k").unwrap(), 2);
}

#[test]
fn test_increment_without_ttl_clears_expiration() {
    let cache: Cache<i64> = fast_reaper_cache();

    cache.increment("counter", Some(1)).unwrap();
    cache.increment("counter", None).unwrap();

    sleep(Duration::from_millis(1500));

    assert_eq!(cache.get("counter").unwrap(), 2);
    assert_eq!(cache.ttl("counter").unwrap(), -1);
}

#[test]
fn test_increment_with_ttl_expires() {
    let cache: Cache<u32> = fast_reaper_cache();

    cache.increment_by("visits", 5, Some(1)).unwrap();
    sleep(Duration::from_millis(1500));

    assert!(matches!(cache.get("visits"), Err(CacheError::KeyNotFound(_))));
    // A fresh increment starts over
    assert_eq!(cache.increment("visits", None).unwrap(), 1);
}

// == Concurrency Tests ==

#[test]
fn test_concurrent_increments_lose_no_updates() {
    const THREADS: usize = 32;
    const ROUNDS: usize = 250;

    let cache: Arc<Cache<usize>> = Arc::new(fast_reaper_cache());
    let barrier = Arc::new(Barrier::new(THREADS));

    let handles: Vec<_> = (0..THREADS)
        .map(|_| {
            let cache = cache.clone();
            let barrier = barrier.clone();
            thread::spawn(move || {
                barrier.wait();
                for _ in 0..ROUNDS {
                    cache.increment("shared", None).unwrap();
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(cache.get("shared").unwrap(), THREADS * ROUNDS);
}

#[test]
fn test_concurrent_readers_and_writers() {
    let cache: Arc<Cache<String>> = Arc::new(fast_reaper_cache());
    let mut handles = Vec::new();

    for writer in 0..4 {
        let cache = cache.clone();
        handles.push(thread::spawn(move || {
            for i in 0..200 {
                let key = format!("w{}_{}", writer, i % 10);
                cache.set(&key, format!("v{}", i), Some(i % 3 - 1)).unwrap();
                if i % 7 == 0 {
                    let _ = cache.delete(&key);
                }
            }
        }));
    }

    for reader in 0..4 {
        let cache = cache.clone();
        handles.push(thread::spawn(move || {
            for i in 0..200 {
                let key = format!("w{}_{}", reader, i % 10);
                match cache.get(&key) {
                    Ok(value) => assert!(value.starts_with('v')),
                    Err(err) => assert!(matches!(err, CacheError::KeyNotFound(_))),
                }
                let _ = cache.dump();
            }
        }));
    }

    for handle in handles {
        handle.join().unwrap();
    }

    let stats = cache.stats();
    assert_eq!(stats.hits + stats.misses, 800);
}

// == Lifecycle Tests ==

#[test]
fn test_drop_with_running_reaper() {
    let cache: Cache<i32> = fast_reaper_cache();
    cache.set("a", 1, Some(1)).unwrap();
    assert!(cache.reaper_running());

    // Dropping must join the reaper without hanging
    drop(cache);
}

#[test]
fn test_dump_lists_every_key() {
    let cache: Cache<i32> = Cache::new().unwrap();

    cache.set("zuo", 222, None).unwrap();
    cache.set("chen", 233, Some(5)).unwrap();

    let dump = cache.dump();
    assert!(dump.contains("(2 keys)"));
    assert!(dump.contains("zuo\t222\t-1"));
    assert!(dump.contains("chen\t233\t5") || dump.contains("chen\t233\t4"));
}

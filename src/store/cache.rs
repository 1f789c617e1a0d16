//! Expiring counter cache.
//!
//! The rate limiter needs exactly one primitive: an atomic increment that
//! creates the counter with a TTL when absent and returns the post-increment
//! count. Splitting that into a get and a set would undercount under
//! concurrent requests for the same key, so the trait exposes only the
//! combined operation.

use parking_lot::Mutex;
use std::collections::HashMap;
use std::time::{Duration, Instant};

pub trait CounterCache: Send + Sync {
    /// Atomically increment `key`, creating it with `ttl` when absent or
    /// expired. Returns the post-increment count. Counters for a single key
    /// are linearizable.
    fn incr(&self, key: &str, ttl: Duration) -> u64;

    /// Reachability probe for the health endpoint.
    fn ping(&self) -> bool;
}

/// In-process implementation. One lock covers the whole increment-and-check,
/// which is what makes the counter linearizable per key. Expired entries are
/// lazily replaced on the next increment and swept by [`MemoryCache::cleanup`].
#[derive(Default)]
pub struct MemoryCache {
    state: Mutex<HashMap<String, Entry>>,
}

struct Entry {
    count: u64,
    expires_at: Instant,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop expired entries (call from a background task).
    pub fn cleanup(&self) {
        let mut state = self.state.lock();
        let now = Instant::now();
        state.retain(|_, entry| entry.expires_at > now);
    }
}

impl CounterCache for MemoryCache {
    fn incr(&self, key: &str, ttl: Duration) -> u64 {
        let mut state = self.state.lock();
        let now = Instant::now();

        let entry = state.entry(key.to_string()).or_insert(Entry {
            count: 0,
            expires_at: now + ttl,
        });

        if entry.expires_at <= now {
            entry.count = 0;
            entry.expires_at = now + ttl;
        }

        entry.count += 1;
        entry.count
    }

    fn ping(&self) -> bool {
        true
    }
}

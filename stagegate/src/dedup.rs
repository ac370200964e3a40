//! Caller-owned deduplication of repeat notifications.
//!
//! A [`NotificationCache`] remembers notification keys for a bounded time and
//! a bounded count. It is an ordinary value: whoever needs deduplication
//! owns one, and dropping it forgets everything.

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use sha2::{Digest, Sha256};
use std::time::{Duration, Instant};

/// TTL- and capacity-bounded set of recently seen notification keys.
#[derive(Debug)]
pub struct NotificationCache {
    entries: DashMap<String, Instant>,
    ttl: Duration,
    capacity: usize,
}

impl NotificationCache {
    /// Creates a cache. A zero capacity is raised to one.
    #[must_use]
    pub fn new(ttl: Duration, capacity: usize) -> Self {
        Self {
            entries: DashMap::new(),
            ttl,
            capacity: capacity.max(1),
        }
    }

    /// Builds a stable key from the parts identifying a notification.
    #[must_use]
    pub fn key<S: AsRef<str>>(parts: &[S]) -> String {
        let mut hasher = Sha256::new();
        for part in parts {
            hasher.update(part.as_ref().as_bytes());
            hasher.update([0u8]);
        }
        hex::encode(hasher.finalize())
    }

    /// Records `key` and returns true if it was not seen within the TTL.
    ///
    /// The TTL check and the insert happen under one shard lock, so of two
    /// concurrent callers with the same key exactly one sees it first.
    pub fn first_seen(&self, key: &str) -> bool {
        let now = Instant::now();
        if !self.entries.contains_key(key) && self.entries.len() >= self.capacity {
            self.evict(now);
        }

        match self.entries.entry(key.to_string()) {
            Entry::Occupied(mut seen) => {
                if now.saturating_duration_since(*seen.get()) < self.ttl {
                    false
                } else {
                    seen.insert(now);
                    true
                }
            }
            Entry::Vacant(slot) => {
                slot.insert(now);
                true
            }
        }
    }

    /// Returns the number of remembered keys, expired ones included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if nothing is remembered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Forgets everything.
    pub fn clear(&self) {
        self.entries.clear();
    }

    // Drops expired keys; if still full, drops the oldest one.
    fn evict(&self, now: Instant) {
        self.entries
            .retain(|_, seen| now.saturating_duration_since(*seen) < self.ttl);
        if self.entries.len() < self.capacity {
            return;
        }
        let oldest = self
            .entries
            .iter()
            .min_by_key(|entry| *entry.value())
            .map(|entry| entry.key().clone());
        if let Some(key) = oldest {
            self.entries.remove(&key);
        }
    }
}

impl Default for NotificationCache {
    fn default() -> Self {
        Self::new(Duration::from_secs(3600), 1024)
    }
}

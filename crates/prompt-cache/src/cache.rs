use crate::config::CacheConfig;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use promptline_protocol::unix_ms_now;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

/// Stored prompt and the answer delivered for it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheEntry {
    pub key: String,
    pub system_prompt: String,
    pub user_prompt: String,
    pub final_prompt: String,
    /// Lookups plus stores; never decreases while the entry lives
    pub frequency: u64,
    pub first_seen_ms: u64,
    pub last_seen_ms: u64,
}

/// Counters since creation (or the last `clear`)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheStats {
    pub entries: usize,
    pub hits: u64,
    pub misses: u64,
    pub stores: u64,
    pub evictions: u64,
}

#[derive(Debug, Default)]
struct Counters {
    hits: AtomicU64,
    misses: AtomicU64,
    stores: AtomicU64,
    evictions: AtomicU64,
}

/// Process-wide prompt cache.
///
/// Every read-modify-write goes through a single `DashMap` shard lock for
/// its key, so concurrent lookups and stores on one key never lose an
/// increment and unrelated keys do not contend.
///
/// Capacity eviction scans every entry for the least recently seen one,
/// so a bounded store costs O(n) once the cache is full. Evictions are
/// serialized; concurrent stores never shrink the cache below
/// `max_entries`.
#[derive(Debug, Default)]
pub struct PromptCache {
    entries: DashMap<String, CacheEntry>,
    config: CacheConfig,
    counters: Counters,
    eviction: Mutex<()>,
}

impl PromptCache {
    #[must_use]
    pub fn new(config: CacheConfig) -> Self {
        Self {
            entries: DashMap::new(),
            config,
            counters: Counters::default(),
            eviction: Mutex::new(()),
        }
    }

    #[must_use]
    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    /// Count a hit on `key` and return a snapshot. Blank keys never hit.
    pub fn lookup(&self, key: &str) -> Option<CacheEntry> {
        self.lookup_at(key, unix_ms_now())
    }

    pub(crate) fn lookup_at(&self, key: &str, now_ms: u64) -> Option<CacheEntry> {
        if key.trim().is_empty() {
            return None;
        }

        let mut expired = false;
        let snapshot = match self.entries.get_mut(key) {
            Some(mut entry) if !self.is_expired(&entry, now_ms) => {
                entry.frequency += 1;
                entry.last_seen_ms = entry.last_seen_ms.max(now_ms);
                Some(entry.clone())
            }
            Some(_) => {
                expired = true;
                None
            }
            None => None,
        };

        if expired {
            // The shard guard above is released; re-check under the remove lock.
            if self
                .entries
                .remove_if(key, |_, entry| self.is_expired(entry, now_ms))
                .is_some()
            {
                self.counters.evictions.fetch_add(1, Ordering::Relaxed);
                log::debug!("Prompt cache entry expired: {key}");
            }
        }

        match &snapshot {
            Some(_) => self.counters.hits.fetch_add(1, Ordering::Relaxed),
            None => self.counters.misses.fetch_add(1, Ordering::Relaxed),
        };
        snapshot
    }

    /// Insert with frequency 1, or overwrite the prompt fields and bump the
    /// frequency. An expired entry is replaced as if it were new.
    /// Concurrent writers race; the last one wins.
    pub fn store(
        &self,
        key: &str,
        system_prompt: &str,
        user_prompt: &str,
        final_prompt: &str,
    ) -> Option<CacheEntry> {
        self.store_at(key, system_prompt, user_prompt, final_prompt, unix_ms_now())
    }

    pub(crate) fn store_at(
        &self,
        key: &str,
        system_prompt: &str,
        user_prompt: &str,
        final_prompt: &str,
        now_ms: u64,
    ) -> Option<CacheEntry> {
        if key.trim().is_empty() {
            return None;
        }

        let fresh = || CacheEntry {
            key: key.to_string(),
            system_prompt: system_prompt.to_string(),
            user_prompt: user_prompt.to_string(),
            final_prompt: final_prompt.to_string(),
            frequency: 1,
            first_seen_ms: now_ms,
            last_seen_ms: now_ms,
        };

        let snapshot = match self.entries.entry(key.to_string()) {
            Entry::Occupied(mut occupied) if self.is_expired(occupied.get(), now_ms) => {
                occupied.insert(fresh());
                self.counters.evictions.fetch_add(1, Ordering::Relaxed);
                log::debug!("Prompt cache entry expired: {key}");
                occupied.get().clone()
            }
            Entry::Occupied(mut occupied) => {
                let entry = occupied.get_mut();
                entry.system_prompt = system_prompt.to_string();
                entry.user_prompt = user_prompt.to_string();
                entry.final_prompt = final_prompt.to_string();
                entry.frequency += 1;
                entry.last_seen_ms = entry.last_seen_ms.max(now_ms);
                entry.clone()
            }
            Entry::Vacant(vacant) => vacant.insert(fresh()).clone(),
        };
        self.counters.stores.fetch_add(1, Ordering::Relaxed);

        self.enforce_capacity(key);
        Some(snapshot)
    }

    /// Read without counting a hit
    #[must_use]
    pub fn peek(&self, key: &str) -> Option<CacheEntry> {
        self.entries.get(key).map(|entry| entry.clone())
    }

    pub fn remove(&self, key: &str) -> Option<CacheEntry> {
        self.entries.remove(key).map(|(_, entry)| entry)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&self) {
        self.entries.clear();
        self.counters.hits.store(0, Ordering::Relaxed);
        self.counters.misses.store(0, Ordering::Relaxed);
        self.counters.stores.store(0, Ordering::Relaxed);
        self.counters.evictions.store(0, Ordering::Relaxed);
    }

    #[must_use]
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            entries: self.entries.len(),
            hits: self.counters.hits.load(Ordering::Relaxed),
            misses: self.counters.misses.load(Ordering::Relaxed),
            stores: self.counters.stores.load(Ordering::Relaxed),
            evictions: self.counters.evictions.load(Ordering::Relaxed),
        }
    }

    fn is_expired(&self, entry: &CacheEntry, now_ms: u64) -> bool {
        self.config.ttl().is_some_and(|ttl| {
            let ttl_ms = u64::try_from(ttl.as_millis()).unwrap_or(u64::MAX);
            now_ms.saturating_sub(entry.last_seen_ms) > ttl_ms
        })
    }

    /// Drop least recently seen entries (never `keep`) beyond `max_entries`.
    fn enforce_capacity(&self, keep: &str) {
        let Some(max) = self.config.max_entries else {
            return;
        };
        if self.entries.len() <= max {
            return;
        }
        let _guard = self
            .eviction
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        while self.entries.len() > max {
            let victim = self
                .entries
                .iter()
                .filter(|entry| entry.key() != keep)
                .min_by_key(|entry| entry.last_seen_ms)
                .map(|entry| entry.key().clone());
            let Some(victim) = victim else {
                break;
            };
            if self.entries.remove(&victim).is_some() {
                self.counters.evictions.fetch_add(1, Ordering::Relaxed);
                log::debug!("Prompt cache evicted {victim}");
            }
        }
    }
}

use crate::shared::clock::Millis;
use std::collections::{HashMap, VecDeque};

/// Cache key for a raw query: trimmed and lower-cased
pub fn normalize_key(raw: &str) -> String {
    raw.trim().to_lowercase()
}

#[derive(Debug, Clone)]
struct CacheEntry<T> {
    options: Vec<T>,
    inserted_at: Millis,
}

/// Bounded TTL cache of autocomplete results.
///
/// Eviction follows insertion order (oldest inserted first), not access
/// order. An expired entry is treated as absent.
#[derive(Debug, Clone)]
pub struct SuggestionCache<T> {
    entries: HashMap<String, CacheEntry<T>>,
    order: VecDeque<String>,
    capacity: usize,
    ttl_ms: Millis,
}

impl<T: Clone> SuggestionCache<T> {
    pub fn new(capacity: usize, ttl_ms: Millis) -> Self {
        Self {
            entries: HashMap::new(),
            order: VecDeque::new(),
            capacity: capacity.max(1),
            ttl_ms,
        }
    }

    /// Cached options for `key`, if present and younger than the TTL
    pub fn lookup(&self, key: &str, now: Millis) -> Option<&[T]> {
        let entry = self.entries.get(&normalize_key(key))?;
        if now.saturating_sub(entry.inserted_at) < self.ttl_ms {
            Some(&entry.options)
        } else {
            None
        }
    }

    /// Insert or overwrite `key`. Returns the evicted key when the insert
    /// pushed the cache over capacity.
    pub fn store(&mut self, key: &str, options: Vec<T>, now: Millis) -> Option<String> {
        let key = normalize_key(key);
        if self.entries.contains_key(&key) {
            self.order.retain(|k| k != &key);
        }
        self.entries.insert(
            key.clone(),
            CacheEntry {
                options,
                inserted_at: now,
            },
        );
        self.order.push_back(key);

        if self.entries.len() > self.capacity {
            let oldest = self.order.pop_front()?;
            self.entries.remove(&oldest);
            return Some(oldest);
        }
        None
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(&normalize_key(key))
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.order.clear();
    }
}

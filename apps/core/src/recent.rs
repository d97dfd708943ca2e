use std::time::{SystemTime, UNIX_EPOCH};

use crate::model::RecentSearch;
use crate::storage::ResilientStore;

pub const DEFAULT_RECENT_LIMIT: usize = 8;
pub const RECENT_SEARCHES_KEY: &str = "calcfind.recent_searches";

/// Bounded, case-insensitively deduplicated query history, most recent first.
pub struct RecentSearchStore {
    store: ResilientStore,
    key: String,
    limit: usize,
}

impl RecentSearchStore {
    pub fn new(store: ResilientStore, limit: usize) -> Self {
        Self::with_key(store, RECENT_SEARCHES_KEY, limit)
    }

    pub fn with_key(store: ResilientStore, key: &str, limit: usize) -> Self {
        Self {
            store,
            key: key.to_string(),
            limit: limit.max(1),
        }
    }

    /// History kept only for the lifetime of the process.
    pub fn in_memory(limit: usize) -> Self {
        Self::new(ResilientStore::memory(), limit)
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    pub fn is_available(&self) -> bool {
        !self.store.is_degraded()
    }

    pub fn get(&self) -> Vec<RecentSearch> {
        let mut entries = self.load();
        entries.truncate(self.limit);
        entries
    }

    pub fn add(&self, query: &str) {
        let query = query.trim();
        if query.is_empty() {
            return;
        }

        let mut entries = self.load();
        let timestamp = next_timestamp(&entries);
        entries.retain(|entry| !same_query(&entry.query, query));
        entries.insert(
            0,
            RecentSearch {
                query: query.to_string(),
                timestamp,
            },
        );
        entries.truncate(self.limit);
        self.save(&entries);
    }

    pub fn remove(&self, query: &str) {
        let query = query.trim();
        let mut entries = self.load();
        let before = entries.len();
        entries.retain(|entry| !same_query(&entry.query, query));
        if entries.len() != before {
            self.save(&entries);
        }
    }

    pub fn clear(&self) {
        self.store.remove(&self.key);
    }

    fn load(&self) -> Vec<RecentSearch> {
        let Some(raw) = self.store.get(&self.key) else {
            return Vec::new();
        };
        match serde_json::from_str::<Vec<RecentSearch>>(&raw) {
            Ok(entries) => entries,
            Err(error) => {
                log::warn!("ignoring unreadable recent searches: {error}");
                Vec::new()
            }
        }
    }

    fn save(&self, entries: &[RecentSearch]) {
        match serde_json::to_string(entries) {
            Ok(encoded) => self.store.set(&self.key, &encoded),
            Err(error) => log::warn!("failed to encode recent searches: {error}"),
        }
    }
}

fn same_query(a: &str, b: &str) -> bool {
    a.trim().to_lowercase() == b.trim().to_lowercase()
}

/// Epoch milliseconds, forced above every stored timestamp so ordering
/// survives a wall clock that steps backwards.
fn next_timestamp(entries: &[RecentSearch]) -> u64 {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0);
    let newest = entries.iter().map(|entry| entry.timestamp).max().unwrap_or(0);
    now.max(newest.saturating_add(1))
}

use crate::ports::outbound::Clock;
use crate::snapshot::domain::{AppSnapshot, EnvironmentName};
use chrono::{DateTime, TimeDelta, Utc};
use dashmap::DashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, OwnedMutexGuard};

#[derive(Debug, Clone, Hash, Eq, PartialEq)]
struct CacheKey {
    app_name: String,
    environment: EnvironmentName,
}

impl CacheKey {
    fn new(app_name: &str, environment: EnvironmentName) -> Self {
        Self {
            app_name: app_name.to_string(),
            environment,
        }
    }
}

struct CacheEntry {
    snapshot: Arc<AppSnapshot>,
    expires_at: DateTime<Utc>,
}

/// In-memory store of the latest snapshot per (application, environment).
///
/// Entries expire a fixed TTL after insertion, independent of the per-section
/// freshness TTL. Snapshots are shared as `Arc`s and replaced wholesale, so a
/// reader never observes a half-updated snapshot. Construct one per process
/// and hand it to every resolver that should share it.
///
/// Refreshes of one key are serialized through [`Self::refresh_guard`];
/// plain reads never wait.
pub struct SnapshotCache {
    entries: DashMap<CacheKey, CacheEntry>,
    refresh_locks: DashMap<CacheKey, Arc<Mutex<()>>>,
    ttl: TimeDelta,
    clock: Arc<dyn Clock>,
}

impl SnapshotCache {
    pub fn new(ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: DashMap::new(),
            refresh_locks: DashMap::new(),
            ttl: TimeDelta::from_std(ttl).unwrap_or(TimeDelta::MAX),
            clock,
        }
    }

    /// Returns the cached snapshot if present and not expired.
    ///
    /// An expired entry is removed as a side effect.
    pub fn get(&self, app_name: &str, environment: EnvironmentName) -> Option<Arc<AppSnapshot>> {
        let key = CacheKey::new(app_name, environment);
        let now = self.clock.now();

        let expired = match self.entries.get(&key) {
            Some(entry) if now < entry.expires_at => return Some(Arc::clone(&entry.snapshot)),
            Some(_) => true,
            None => false,
        };

        if expired {
            self.entries
                .remove_if(&key, |_, entry| now >= entry.expires_at);
            tracing::debug!(app = app_name, env = %environment, "evicted expired snapshot");
        }

        None
    }

    /// Stores `snapshot`, replacing any previous entry for the key.
    pub fn put(&self, app_name: &str, environment: EnvironmentName, snapshot: Arc<AppSnapshot>) {
        let now = self.clock.now();
        let expires_at = now
            .checked_add_signed(self.ttl)
            .unwrap_or(DateTime::<Utc>::MAX_UTC);

        self.entries.insert(
            CacheKey::new(app_name, environment),
            CacheEntry {
                snapshot,
                expires_at,
            },
        );
    }

    /// Waits until no other refresh of this key is in flight.
    ///
    /// Hold the guard from reading the previous snapshot until the refreshed
    /// one is stored.
    pub async fn refresh_guard(
        &self,
        app_name: &str,
        environment: EnvironmentName,
    ) -> OwnedMutexGuard<()> {
        let lock = self
            .refresh_locks
            .entry(CacheKey::new(app_name, environment))
            .or_default()
            .clone();
        lock.lock_owned().await
    }

    /// Drops the entry for one key. Returns whether an entry was present.
    pub fn invalidate(&self, app_name: &str, environment: EnvironmentName) -> bool {
        self.entries
            .remove(&CacheKey::new(app_name, environment))
            .is_some()
    }

    pub fn invalidate_all(&self) {
        self.entries.clear();
    }

    /// Number of stored entries, including expired ones not yet read.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

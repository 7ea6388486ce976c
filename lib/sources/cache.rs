use std::{
    sync::Arc,
    time::{Duration, Instant},
};

use dashmap::DashMap;

use crate::{config::MAX_CACHE_TTL, releases::Release, repo::RepoId};

#[derive(Debug, Clone)]
struct CacheEntry {
    stored_at: Instant,
    releases: Arc<[Release]>,
}

/**
    Time-bounded cache for normalized releases, keyed by repository.

    Caching is purely an optimization - callers must work correctly
    regardless of whether or not a cached result is returned.

    Can be cheaply cloned while still referring to the same underlying data.
*/
#[derive(Debug, Clone)]
pub struct ReleaseCache {
    ttl: Duration,
    entries: Arc<DashMap<RepoId, CacheEntry>>,
}

impl ReleaseCache {
    /**
        Create a new, **empty** `ReleaseCache` with the given time-to-live.
    */
    #[must_use]
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: Arc::new(DashMap::new()),
        }
    }

    #[must_use]
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /**
        Get the cached releases for a repository, if present and not yet expired.

        Expired entries are evicted when encountered.
    */
    #[must_use]
    pub fn get(&self, repo: &RepoId) -> Option<Arc<[Release]>> {
        let fresh = {
            let entry = self.entries.get(repo)?;
            if entry.stored_at.elapsed() < self.ttl {
                Some(Arc::clone(&entry.releases))
            } else {
                None
            }
        };
        if fresh.is_none() {
            self.evict_expired(repo);
        }
        fresh
    }

    // Another clone may have stored a fresh entry since it was found to be expired
    fn evict_expired(&self, repo: &RepoId) -> bool {
        self.entries
            .remove_if(repo, |_, entry| entry.stored_at.elapsed() >= self.ttl)
            .is_some()
    }

    /**
        Store releases for a repository, replacing any previous entry.
    */
    pub fn insert(&self, repo: RepoId, releases: Arc<[Release]>) {
        let entry = CacheEntry {
            stored_at: Instant::now(),
            releases,
        };
        self.entries.insert(repo, entry);
    }

    /**
        Remove the cached releases for a repository.

        Returns `true` if an entry was present and has now been removed.
    */
    pub fn invalidate(&self, repo: &RepoId) -> bool {
        self.entries.remove(repo).is_some()
    }

    /**
        Remove all cached releases.
    */
    pub fn clear(&self) {
        self.entries.clear();
    }
}

impl Default for ReleaseCache {
    fn default() -> Self {
        Self::new(MAX_CACHE_TTL)
    }
}

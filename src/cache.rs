//! Time-bounded cache of public-key listings.

use std::sync::Arc;
use std::time::{Duration, Instant};

use dashmap::DashMap;

use crate::disk::{FileEntry, RemoteSource};
use crate::error::DiskError;

/// Default time-to-live for cached listings.
pub const DEFAULT_TTL: Duration = Duration::from_secs(600);

/// Source of the current time, injectable for deterministic expiry
/// tests.
pub trait Clock: Send + Sync {
    fn now(&self) -> Instant;
}

/// Wall clock used outside of tests.
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

struct CacheEntry {
    entries: Vec<FileEntry>,
    expires_at: Instant,
}

/// Maps a public key to its last retrieved listing.
///
/// Entries expire lazily on the next read; a put unconditionally
/// overwrites whatever was stored for the key, so concurrent misses
/// resolve as last-writer-wins without coordination.
pub struct ListingCache {
    entries: DashMap<String, CacheEntry>,
    ttl: Duration,
    clock: Arc<dyn Clock>,
}

impl ListingCache {
    pub fn new(ttl: Duration) -> Self {
        Self::with_clock(ttl, Arc::new(SystemClock))
    }

    pub fn with_clock(ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: DashMap::new(),
            ttl,
            clock,
        }
    }

    /// Cached listing for the key, if present and not expired.
    pub fn get(&self, public_key: &str) -> Option<Vec<FileEntry>> {
        let now = self.clock.now();
        match self.entries.get(public_key) {
            Some(entry) if entry.expires_at > now => Some(entry.entries.clone()),
            Some(entry) => {
                // Lazy expiry: drop the shard guard before removing.
                drop(entry);
                self.entries.remove(public_key);
                None
            }
            None => None,
        }
    }

    /// Store a listing with a fresh TTL, overwriting any prior entry.
    pub fn put(&self, public_key: &str, entries: Vec<FileEntry>) {
        let expires_at = self.clock.now() + self.ttl;
        self.entries
            .insert(public_key.to_string(), CacheEntry { entries, expires_at });
    }
}

/// Cache-first listing: a hit returns immediately, a miss issues exactly
/// one provider call and writes the successful result back before
/// returning it. Failed provider calls are never cached, so the next
/// request retries immediately.
pub async fn list_cached<R>(
    cache: &ListingCache,
    source: &R,
    public_key: &str,
) -> Result<Vec<FileEntry>, DiskError>
where
    R: RemoteSource + ?Sized,
{
    if let Some(files) = cache.get(public_key) {
        tracing::debug!(public_key, count = files.len(), "listing cache hit");
        return Ok(files);
    }

    tracing::debug!(public_key, "listing cache miss");
    let files = source.list_files(public_key).await?;
    cache.put(public_key, files.clone());
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::disk::FileMetadata;
    use async_trait::async_trait;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Clock that only moves when the test advances it.
    struct MockClock {
        now: Mutex<Instant>,
    }

    impl MockClock {
        fn new() -> Arc<Self> {
            Arc::new(Self {
                now: Mutex::new(Instant::now()),
            })
        }

        fn advance(&self, by: Duration) {
            *self.now.lock().unwrap() += by;
        }
    }

    impl Clock for MockClock {
        fn now(&self) -> Instant {
            *self.now.lock().unwrap()
        }
    }

    fn entry(name: &str) -> FileEntry {
        FileEntry {
            name: name.to_string(),
            path: format!("/{name}"),
            extra: serde_json::Map::new(),
        }
    }

    struct CountingSource {
        listing: Vec<FileEntry>,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl RemoteSource for CountingSource {
        async fn list_files(&self, _public_key: &str) -> Result<Vec<FileEntry>, DiskError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.listing.clone())
        }

        async fn get_metadata(&self, _: &str, path: &str) -> Result<FileMetadata, DiskError> {
            Err(DiskError::NotFound(path.to_string()))
        }

        async fn fetch(&self, _: &str, path: &str) -> Result<Vec<u8>, DiskError> {
            Err(DiskError::DownloadFailed(path.to_string()))
        }
    }

    #[test]
    fn entry_expires_after_ttl() {
        let clock = MockClock::new();
        let cache = ListingCache::with_clock(DEFAULT_TTL, clock.clone());

        cache.put("key", vec![entry("a.txt")]);
        assert!(cache.get("key").is_some());

        clock.advance(DEFAULT_TTL - Duration::from_secs(1));
        assert!(cache.get("key").is_some(), "still fresh just before the TTL");

        clock.advance(Duration::from_secs(2));
        assert!(cache.get("key").is_none(), "stale after the TTL elapsed");
    }

    #[test]
    fn put_overwrites_existing_entry() {
        let clock = MockClock::new();
        let cache = ListingCache::with_clock(DEFAULT_TTL, clock.clone());

        cache.put("key", vec![entry("old.txt")]);
        clock.advance(Duration::from_secs(500));
        cache.put("key", vec![entry("new.txt")]);

        // The rewrite also refreshed the expiry.
        clock.advance(Duration::from_secs(500));
        let files = cache.get("key").expect("entry refreshed by second put");
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].name, "new.txt");
    }

    #[tokio::test]
    async fn second_listing_within_ttl_hits_the_cache() {
        let clock = MockClock::new();
        let cache = ListingCache::with_clock(DEFAULT_TTL, clock.clone());
        let source = CountingSource {
            listing: vec![entry("a.txt"), entry("b.txt")],
            calls: AtomicUsize::new(0),
        };

        let first = list_cached(&cache, &source, "key").await.unwrap();
        let second = list_cached(&cache, &source, "key").await.unwrap();

        assert_eq!(first.len(), 2);
        assert_eq!(second.len(), 2);
        assert_eq!(source.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn expired_listing_is_refetched() {
        let clock = MockClock::new();
        let cache = ListingCache::with_clock(DEFAULT_TTL, clock.clone());
        let source = CountingSource {
            listing: vec![entry("a.txt")],
            calls: AtomicUsize::new(0),
        };

        list_cached(&cache, &source, "key").await.unwrap();
        clock.advance(DEFAULT_TTL + Duration::from_secs(1));
        list_cached(&cache, &source, "key").await.unwrap();

        assert_eq!(source.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn failed_listing_is_not_cached() {
        struct FailingSource {
            calls: AtomicUsize,
        }

        #[async_trait]
        impl RemoteSource for FailingSource {
            async fn list_files(&self, public_key: &str) -> Result<Vec<FileEntry>, DiskError> {
                self.calls.fetch_add(1, Ordering::SeqCst);
                Err(DiskError::NotFound(format!("public key {public_key}")))
            }

            async fn get_metadata(&self, _: &str, path: &str) -> Result<FileMetadata, DiskError> {
                Err(DiskError::NotFound(path.to_string()))
            }

            async fn fetch(&self, _: &str, path: &str) -> Result<Vec<u8>, DiskError> {
                Err(DiskError::DownloadFailed(path.to_string()))
            }
        }

        let cache = ListingCache::new(DEFAULT_TTL);
        let source = FailingSource {
            calls: AtomicUsize::new(0),
        };

        assert!(list_cached(&cache, &source, "key").await.is_err());
        assert!(list_cached(&cache, &source, "key").await.is_err());
        // Both misses reached the provider; the failure was never stored.
        assert_eq!(source.calls.load(Ordering::SeqCst), 2);
    }
}

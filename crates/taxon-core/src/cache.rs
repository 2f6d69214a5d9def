use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use std::time::{Duration, Instant};

/// Default capacity bound.
pub const DEFAULT_CAPACITY: usize = 100;

/// Default entry time-to-live.
pub const DEFAULT_TTL: Duration = Duration::from_secs(600);

struct CacheEntry {
    title: String,
    inserted_at: Instant,
}

struct Inner {
    entries: HashMap<String, CacheEntry>,
    /// Insertion order of the keys currently in `entries`.
    order: VecDeque<String>,
}

/// Bounded, time-expiring URL → title cache.
///
/// Entries expire lazily: an expired entry is dropped when `get` touches it,
/// not by a background sweep. When a `put` of a new key would exceed the
/// capacity, the oldest-inserted entry is evicted first. A hit returns the
/// stored title without refreshing its insertion timestamp.
///
/// The cache is shared across concurrent resolutions behind an `Arc`; every
/// operation takes the single internal mutex, which is enough because each
/// operation is O(capacity) at worst. Construct one per pipeline and inject
/// it; there is no global instance.
pub struct TitleCache {
    inner: Mutex<Inner>,
    capacity: usize,
    ttl: Duration,
}

impl TitleCache {
    pub fn new(capacity: usize, ttl: Duration) -> Self {
        Self {
            inner: Mutex::new(Inner {
                entries: HashMap::new(),
                order: VecDeque::new(),
            }),
            capacity: capacity.max(1),
            ttl,
        }
    }

    /// Return the cached title for `url`, or `None` on miss or expiry.
    pub fn get(&self, url: &str) -> Option<String> {
        let mut inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());

        let expired = match inner.entries.get(url) {
            Some(entry) => entry.inserted_at.elapsed() > self.ttl,
            None => return None,
        };

        if expired {
            inner.entries.remove(url);
            inner.order.retain(|k| k != url);
            return None;
        }

        inner.entries.get(url).map(|entry| entry.title.clone())
    }

    /// Insert or replace the title for `url`, evicting the oldest-inserted
    /// entry if a new key would exceed the capacity.
    pub fn put(&self, url: &str, title: &str) {
        let mut inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());

        if inner.entries.contains_key(url) {
            inner.order.retain(|k| k != url);
        } else if inner.entries.len() >= self.capacity {
            if let Some(oldest) = inner.order.pop_front() {
                inner.entries.remove(&oldest);
            }
        }

        inner.entries.insert(
            url.to_string(),
            CacheEntry {
                title: title.to_string(),
                inserted_at: Instant::now(),
            },
        );
        inner.order.push_back(url.to_string());
    }

    pub fn len(&self) -> usize {
        self.inner
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .entries
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for TitleCache {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY, DEFAULT_TTL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread::sleep;

    #[test]
    fn put_then_get() {
        let cache = TitleCache::default();
        cache.put("https://example.com", "Example Domain");
        assert_eq!(
            cache.get("https://example.com").as_deref(),
            Some("Example Domain")
        );
        assert_eq!(cache.get("https://other.example"), None);
    }

    #[test]
    fn entries_expire_after_ttl() {
        let cache = TitleCache::new(10, Duration::from_millis(5));
        cache.put("https://example.com", "Example Domain");

        sleep(Duration::from_millis(20));

        assert_eq!(cache.get("https://example.com"), None);
        // lazy expiry also removed the entry
        assert!(cache.is_empty());
    }

    #[test]
    fn capacity_evicts_oldest_inserted() {
        let cache = TitleCache::new(2, DEFAULT_TTL);
        cache.put("a", "1");
        cache.put("b", "2");
        cache.put("c", "3");

        assert_eq!(cache.len(), 2);
        assert_eq!(cache.get("a"), None);
        assert_eq!(cache.get("b").as_deref(), Some("2"));
        assert_eq!(cache.get("c").as_deref(), Some("3"));
    }

    #[test]
    fn replacing_a_key_does_not_evict() {
        let cache = TitleCache::new(2, DEFAULT_TTL);
        cache.put("a", "1");
        cache.put("b", "2");
        cache.put("a", "updated");

        assert_eq!(cache.len(), 2);
        assert_eq!(cache.get("a").as_deref(), Some("updated"));
        assert_eq!(cache.get("b").as_deref(), Some("2"));

        // "a" was re-inserted most recently, so "b" is now the oldest
        cache.put("c", "3");
        assert_eq!(cache.get("b"), None);
        assert_eq!(cache.get("a").as_deref(), Some("updated"));
    }

    #[test]
    fn hit_does_not_refresh_age() {
        let cache = TitleCache::new(10, Duration::from_millis(150));
        cache.put("https://example.com", "Example Domain");

        sleep(Duration::from_millis(100));
        assert!(cache.get("https://example.com").is_some());

        // the hit above must not have reset the clock
        sleep(Duration::from_millis(100));
        assert_eq!(cache.get("https://example.com"), None);
    }
}

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::RwLock;

use crate::schema::{RecordSchema, SchemaSource};

const DEFAULT_TTL: Duration = Duration::from_secs(300);
const DEFAULT_MAX_SIZE: usize = 1000;

#[derive(Debug, Clone)]
struct CacheEntry {
    schema: Arc<RecordSchema>,
    timestamp: Instant,
}

/// Subject -> schema cache safe for concurrent use.
///
/// Lookups only take the read lock. Two threads that miss on the same subject
/// may both fetch it; the last insert wins.
pub struct SchemaCache {
    entries: RwLock<HashMap<String, CacheEntry>>,
    ttl: Duration,
    max_size: usize,
}

impl SchemaCache {
    pub fn new() -> Self {
        Self::with_settings(DEFAULT_TTL, DEFAULT_MAX_SIZE)
    }

    pub fn with_settings(ttl: Duration, max_size: usize) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            ttl,
            max_size,
        }
    }

    /// Cached schema for `subject`, if present and not expired.
    pub fn get(&self, subject: &str) -> Option<Arc<RecordSchema>> {
        let entries = self.entries.read();
        let entry = entries.get(subject)?;
        if entry.timestamp.elapsed() < self.ttl {
            Some(entry.schema.clone())
        } else {
            None
        }
    }

    pub fn insert(&self, subject: &str, schema: RecordSchema) -> Arc<RecordSchema> {
        let schema = Arc::new(schema);
        let mut entries = self.entries.write();
        entries.insert(
            subject.to_string(),
            CacheEntry { schema: schema.clone(), timestamp: Instant::now() },
        );
        self.cleanup(&mut entries);
        schema
    }

    /// Cached schema for `subject`, fetching it from `source` on a miss.
    pub fn get_or_fetch(&self, subject: &str, source: &dyn SchemaSource) -> Result<Arc<RecordSchema>, String> {
        if let Some(schema) = self.get(subject) {
            return Ok(schema);
        }

        // no lock held while fetching
        log::trace!("schema cache miss for subject '{}'", subject);
        let schema = source.fetch(subject)?;
        Ok(self.insert(subject, schema))
    }

    /// Drop expired entries, then the oldest ones until `max_size` holds.
    fn cleanup(&self, entries: &mut HashMap<String, CacheEntry>) {
        let now = Instant::now();
        entries.retain(|_, entry| now.duration_since(entry.timestamp) < self.ttl);

        if entries.len() > self.max_size {
            let mut by_age: Vec<_> = entries.iter().map(|(k, v)| (k.clone(), v.timestamp)).collect();
            by_age.sort_by_key(|(_, timestamp)| *timestamp);

            let to_remove = entries.len() - self.max_size;
            for (key, _) in by_age.into_iter().take(to_remove) {
                entries.remove(&key);
            }
            log::debug!("schema cache evicted {} entries", to_remove);
        }
    }

    pub fn clear(&self) {
        self.entries.write().clear();
    }

    /// (current size, max size)
    pub fn stats(&self) -> (usize, usize) {
        (self.entries.read().len(), self.max_size)
    }
}

impl Default for SchemaCache {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{FieldKind, FieldSpec};
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingSource {
        calls: AtomicUsize,
    }

    impl SchemaSource for CountingSource {
        fn fetch(&self, subject: &str) -> Result<RecordSchema, String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if subject.starts_with("missing") {
                return Err(format!("subject '{}' not found", subject));
            }
            Ok(RecordSchema::new(vec![FieldSpec::required(subject, FieldKind::Any)]))
        }
    }

    fn schema(name: &str) -> RecordSchema {
        RecordSchema::new(vec![FieldSpec::required(name, FieldKind::Int)])
    }

    #[test]
    fn test_get_or_fetch_caches() {
        let cache = SchemaCache::new();
        let source = CountingSource { calls: AtomicUsize::new(0) };

        let first = cache.get_or_fetch("a-value", &source).unwrap();
        let second = cache.get_or_fetch("a-value", &source).unwrap();
        assert_eq!(first, second);
        assert_eq!(source.calls.load(Ordering::SeqCst), 1);
        assert_eq!(cache.stats().0, 1);
    }

    #[test]
    fn test_fetch_errors_are_not_cached() {
        let cache = SchemaCache::new();
        let source = CountingSource { calls: AtomicUsize::new(0) };

        assert!(cache.get_or_fetch("missing-value", &source).is_err());
        assert!(cache.get_or_fetch("missing-value", &source).is_err());
        assert_eq!(source.calls.load(Ordering::SeqCst), 2);
        assert_eq!(cache.stats().0, 0);
    }

    #[test]
    fn test_last_writer_wins() {
        let cache = SchemaCache::new();
        cache.insert("s", schema("first"));
        cache.insert("s", schema("second"));
        assert_eq!(*cache.get("s").unwrap(), schema("second"));
    }

    #[test]
    fn test_ttl_expiry() {
        let cache = SchemaCache::with_settings(Duration::from_millis(20), 10);
        cache.insert("s", schema("x"));
        assert!(cache.get("s").is_some());

        std::thread::sleep(Duration::from_millis(40));
        assert!(cache.get("s").is_none());
    }

    #[test]
    fn test_size_limit() {
        let cache = SchemaCache::with_settings(Duration::from_secs(60), 2);
        cache.insert("a", schema("a"));
        std::thread::sleep(Duration::from_millis(2));
        cache.insert("b", schema("b"));
        std::thread::sleep(Duration::from_millis(2));
        cache.insert("c", schema("c"));

        assert_eq!(cache.stats(), (2, 2));
        // oldest entry is evicted first
        assert!(cache.get("a").is_none());
        assert!(cache.get("c").is_some());

        cache.clear();
        assert_eq!(cache.stats(), (0, 2));
    }

    #[test]
    fn test_concurrent_reads() {
        let cache = Arc::new(SchemaCache::new());
        let source = Arc::new(CountingSource { calls: AtomicUsize::new(0) });

        let handles: Vec<_> = (0..8)
            .map(|i| {
                let cache = cache.clone();
                let source = source.clone();
                std::thread::spawn(move || {
                    for _ in 0..100 {
                        let subject = format!("t{}-value", i % 2);
                        let schema = cache.get_or_fetch(&subject, source.as_ref()).unwrap();
                        assert_eq!(schema.fields[0].name, subject);
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(cache.stats().0, 2);
        // races may fetch more than once, but never once per lookup
        assert!(source.calls.load(Ordering::SeqCst) < 800);
    }
}

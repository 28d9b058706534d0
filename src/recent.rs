/// Recently visited domains: a small LRU list backed by the key/value store

use std::collections::HashSet;

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::domain::{canonical_url, is_internal, trackable_domain};
use crate::storage::{KeyValueStore, keys, load_json, save_json};

/// Maximum number of shortcuts kept
pub const CAPACITY: usize = 5;

/// One shortcut: a domain and when it was last touched
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DomainRecord {
    pub domain: String,
    pub url: String,
    /// Milliseconds since the epoch
    pub timestamp: i64,
}

impl DomainRecord {
    pub fn new(domain: &str, timestamp: i64) -> DomainRecord {
        DomainRecord {
            domain: domain.to_string(),
            url: canonical_url(domain),
            timestamp,
        }
    }

    fn is_valid(&self) -> bool {
        !self.domain.is_empty()
            && self.domain == self.domain.to_lowercase()
            && !self.domain.starts_with("www.")
            && !is_internal(&self.domain)
    }
}

/// Ordered most-recently-used first, at most `capacity` records, one per domain
#[derive(Debug, Clone, PartialEq)]
pub struct RecentDomains {
    records: Vec<DomainRecord>,
    capacity: usize,
}

impl RecentDomains {
    pub fn new() -> Self {
        Self::with_capacity(CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        RecentDomains {
            records: Vec::with_capacity(capacity),
            capacity,
        }
    }

    /// Rebuild from persisted records, dropping anything that breaks the
    /// list's invariants (invalid domains, repeats, overflow).
    pub fn from_records(records: Vec<DomainRecord>, capacity: usize) -> Self {
        let mut seen = HashSet::new();
        let records: Vec<DomainRecord> = records
            .into_iter()
            .filter(|record| record.is_valid())
            .filter(|record| seen.insert(record.domain.clone()))
            .map(|record| DomainRecord::new(&record.domain, record.timestamp))
            .take(capacity)
            .collect();

        RecentDomains { records, capacity }
    }

    /// Promote or insert the domain of `url` at the front.
    ///
    /// Returns false (and leaves the list untouched) if the URL has no
    /// recordable domain.
    pub fn upsert(&mut self, url: &str, now: i64) -> bool {
        let Some(domain) = trackable_domain(url) else {
            return false;
        };

        self.records.retain(|record| record.domain != domain);
        self.records.insert(0, DomainRecord::new(&domain, now));
        self.records.truncate(self.capacity);
        true
    }

    /// Append externally sourced candidates below the existing records.
    ///
    /// Existing records are never moved or dropped; candidates whose domain is
    /// already present or not a valid domain are skipped, and appending stops
    /// once the list is full. Returns the number of records appended.
    pub fn merge_external(&mut self, candidates: &[DomainRecord]) -> usize {
        let mut appended = 0;

        for candidate in candidates {
            if self.is_full() {
                break;
            }
            if !candidate.is_valid() || self.contains(&candidate.domain) {
                continue;
            }
            self.records.push(DomainRecord::new(&candidate.domain, candidate.timestamp));
            appended += 1;
        }

        appended
    }

    pub fn snapshot(&self) -> &[DomainRecord] {
        &self.records
    }

    pub fn contains(&self, domain: &str) -> bool {
        self.records.iter().any(|record| record.domain == domain)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.records.len() >= self.capacity
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Default for RecentDomains {
    fn default() -> Self {
        Self::new()
    }
}

/// The recent-domains list together with the store it persists to.
///
/// Each mutation re-reads the persisted list first, so another new tab page
/// writing in between is not overwritten, and writes the result back before
/// returning.
pub struct Tracker<S: KeyValueStore> {
    store: S,
    cache: RecentDomains,
}

impl<S: KeyValueStore> Tracker<S> {
    pub fn load(store: S) -> Self {
        let mut tracker = Tracker {
            store,
            cache: RecentDomains::new(),
        };
        tracker.refresh();
        tracker
    }

    /// Record a visit to `url` at `now`
    pub fn record_visit(&mut self, url: &str, now: i64) -> bool {
        self.refresh();
        if !self.cache.upsert(url, now) {
            debug!("Not recording visit to {}", url);
            return false;
        }
        self.persist();
        true
    }

    pub fn merge_external(&mut self, candidates: &[DomainRecord]) -> usize {
        self.refresh();
        let appended = self.cache.merge_external(candidates);
        self.persist();
        appended
    }

    pub fn snapshot(&self) -> &[DomainRecord] {
        self.cache.snapshot()
    }

    /// Whether the persisted list has no free slot
    pub fn is_full(&mut self) -> bool {
        self.refresh();
        self.cache.is_full()
    }

    /// Forget every recorded domain
    pub fn clear(&mut self) {
        self.cache = RecentDomains::with_capacity(self.cache.capacity());
        self.store.remove(keys::RECENT_DOMAINS);
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Reload from the store. An unreadable store keeps what is in memory; a
    /// missing or corrupt value counts as an empty list.
    fn refresh(&mut self) {
        let raw = match self.store.read(keys::RECENT_DOMAINS) {
            Ok(raw) => raw,
            Err(e) => {
                warn!("{}, keeping recent domains in memory", e);
                return;
            }
        };

        let records = match raw.map(|raw| serde_json::from_str::<Vec<DomainRecord>>(&raw)) {
            None => Vec::new(),
            Some(Ok(records)) => records,
            Some(Err(e)) => {
                warn!("Discarding corrupt recent domains: {}", e);
                Vec::new()
            }
        };
        self.cache = RecentDomains::from_records(records, self.cache.capacity());
    }

    fn persist(&self) {
        save_json(&self.store, keys::RECENT_DOMAINS, &self.cache.snapshot());
    }
}

/// Persisted recent domains without building a tracker
pub fn load_recent(store: &impl KeyValueStore) -> RecentDomains {
    let records: Vec<DomainRecord> = load_json(store, keys::RECENT_DOMAINS).unwrap_or_default();
    RecentDomains::from_records(records, CAPACITY)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    fn domains(cache: &RecentDomains) -> Vec<&str> {
        cache.snapshot().iter().map(|r| r.domain.as_str()).collect()
    }

    fn filled(urls: &[&str]) -> RecentDomains {
        let mut cache = RecentDomains::new();
        for (i, url) in urls.iter().enumerate() {
            cache.upsert(url, 100 + i as i64);
        }
        cache
    }

    #[test]
    fn test_upsert_inserts_canonical_record() {
        let mut cache = RecentDomains::new();

        assert!(cache.upsert("https://www.Example.com/some/deep/path?q=1", 100));

        assert_eq!(cache.snapshot(), &[DomainRecord {
            domain: "example.com".to_string(),
            url: "https://example.com".to_string(),
            timestamp: 100,
        }]);
    }

    #[test]
    fn test_upsert_same_domain_keeps_one_record() {
        let mut cache = filled(&["https://a.com", "https://b.com"]);

        cache.upsert("https://example.com/one", 200);
        cache.upsert("https://www.example.com/two", 300);

        assert_eq!(domains(&cache), vec!["example.com", "b.com", "a.com"]);
        assert_eq!(cache.snapshot()[0].timestamp, 300);
    }

    #[test]
    fn test_upsert_promotes_existing_record() {
        let mut cache = filled(&["https://c.com", "https://example.com", "https://b.com", "https://a.com"]);
        assert_eq!(domains(&cache), vec!["a.com", "b.com", "example.com", "c.com"]);

        cache.upsert("https://example.com", 999);

        assert_eq!(domains(&cache), vec!["example.com", "a.com", "b.com", "c.com"]);
        assert_eq!(cache.snapshot()[0].timestamp, 999);
    }

    #[test]
    fn test_upsert_evicts_least_recent() {
        let cache = filled(&[
            "https://1.com",
            "https://2.com",
            "https://3.com",
            "https://4.com",
            "https://5.com",
            "https://6.com",
        ]);

        assert_eq!(cache.len(), CAPACITY);
        assert_eq!(domains(&cache), vec!["6.com", "5.com", "4.com", "3.com", "2.com"]);
    }

    #[test]
    fn test_upsert_ignores_unrecordable_urls() {
        let mut cache = filled(&["https://a.com"]);

        assert!(!cache.upsert("not a url", 500));
        assert!(!cache.upsert("chrome://newtab", 500));
        assert!(!cache.upsert("http://localhost:8080", 500));

        assert_eq!(domains(&cache), vec!["a.com"]);
    }

    #[test]
    fn test_upsert_never_exceeds_capacity_or_duplicates() {
        let mut cache = RecentDomains::new();
        let urls = [
            "https://a.com", "https://b.com/x", "https://www.a.com", "https://c.com",
            "https://d.com", "https://e.com", "https://b.com", "https://f.com",
            "https://g.com", "https://a.com/y", "https://c.com", "https://h.com",
        ];

        for (i, url) in urls.iter().enumerate() {
            cache.upsert(url, i as i64);
            assert!(cache.len() <= CAPACITY);

            let unique: HashSet<&str> = domains(&cache).into_iter().collect();
            assert_eq!(unique.len(), cache.len());
        }
    }

    #[test]
    fn test_merge_appends_below_live_records() {
        let mut cache = RecentDomains::new();
        cache.upsert("https://a.com", 100);

        let appended = cache.merge_external(&[DomainRecord::new("b.com", 90), DomainRecord::new("c.com", 80)]);

        assert_eq!(appended, 2);
        assert_eq!(cache.snapshot(), &[
            DomainRecord::new("a.com", 100),
            DomainRecord::new("b.com", 90),
            DomainRecord::new("c.com", 80),
        ]);
    }

    #[test]
    fn test_merge_skips_present_domains() {
        let mut cache = filled(&["https://b.com", "https://a.com"]);

        cache.merge_external(&[DomainRecord::new("b.com", 1_000), DomainRecord::new("c.com", 50)]);

        assert_eq!(domains(&cache), vec!["a.com", "b.com", "c.com"]);
        assert_eq!(cache.snapshot()[1].timestamp, 100);
    }

    #[test]
    fn test_merge_stops_at_capacity() {
        let mut cache = filled(&["https://a.com", "https://b.com", "https://c.com"]);
        let candidates: Vec<DomainRecord> = ["d.com", "e.com", "f.com", "g.com"]
            .iter()
            .map(|d| DomainRecord::new(d, 10))
            .collect();

        let appended = cache.merge_external(&candidates);

        assert_eq!(appended, 2);
        assert_eq!(domains(&cache), vec!["c.com", "b.com", "a.com", "d.com", "e.com"]);
    }

    #[test]
    fn test_merge_into_full_cache_is_noop() {
        let mut cache = filled(&["https://1.com", "https://2.com", "https://3.com", "https://4.com", "https://5.com"]);
        let before = cache.clone();

        let appended = cache.merge_external(&[DomainRecord::new("new.com", 1)]);

        assert_eq!(appended, 0);
        assert_eq!(cache, before);
    }

    #[test]
    fn test_merge_is_idempotent() {
        let mut cache = filled(&["https://a.com"]);
        let candidates = vec![DomainRecord::new("b.com", 90), DomainRecord::new("c.com", 80)];

        cache.merge_external(&candidates);
        let after_first = cache.clone();
        let appended = cache.merge_external(&candidates);

        assert_eq!(appended, 0);
        assert_eq!(cache, after_first);
    }

    #[test]
    fn test_merge_skips_invalid_candidates() {
        let mut cache = filled(&["https://a.com"]);
        let candidates = vec![
            DomainRecord::new("WWW.Example.COM", 90),
            DomainRecord::new("www.example.com", 85),
            DomainRecord::new("", 80),
            DomainRecord::new("newtab", 70),
            DomainRecord::new("b.com", 60),
        ];

        let appended = cache.merge_external(&candidates);

        assert_eq!(appended, 1);
        assert_eq!(domains(&cache), vec!["a.com", "b.com"]);

        cache.upsert("https://c.com", 200);
        assert_eq!(domains(&cache), vec!["c.com", "a.com", "b.com"]);
    }

    #[test]
    fn test_from_records_sanitizes() {
        let records = vec![
            DomainRecord::new("a.com", 5),
            DomainRecord::new("a.com", 4),
            DomainRecord { domain: "B.com".to_string(), url: "https://B.com".to_string(), timestamp: 3 },
            DomainRecord { domain: "c.com".to_string(), url: "https://c.com/deep".to_string(), timestamp: 2 },
            DomainRecord::new("", 1),
            DomainRecord::new("newtab", 1),
            DomainRecord::new("d.com", 1),
            DomainRecord::new("e.com", 1),
            DomainRecord::new("f.com", 1),
            DomainRecord::new("g.com", 1),
        ];

        let cache = RecentDomains::from_records(records, CAPACITY);

        assert_eq!(domains(&cache), vec!["a.com", "c.com", "d.com", "e.com", "f.com"]);
        assert_eq!(cache.snapshot()[1].url, "https://c.com");
    }

    #[test]
    fn test_tracker_persists_every_mutation() {
        let mut tracker = Tracker::load(MemoryStore::new());
        tracker.record_visit("https://github.com/rust-lang", 100);
        tracker.merge_external(&[DomainRecord::new("docs.rs", 50)]);

        let reloaded = load_recent(tracker.store());
        assert_eq!(reloaded.snapshot(), tracker.snapshot());
        assert_eq!(reloaded.len(), 2);
    }

    #[test]
    fn test_tracker_ignored_visit_does_not_write() {
        let mut tracker = Tracker::load(MemoryStore::new());

        assert!(!tracker.record_visit("not a url", 100));
        assert!(tracker.store().is_empty());
    }

    #[test]
    fn test_tracker_restores_persisted_state() {
        let store = MemoryStore::new();
        save_json(&store, keys::RECENT_DOMAINS, &vec![DomainRecord::new("a.com", 1), DomainRecord::new("b.com", 2)]);

        let tracker = Tracker::load(store);

        assert_eq!(tracker.snapshot().len(), 2);
        assert_eq!(tracker.snapshot()[0].domain, "a.com");
    }

    #[test]
    fn test_tracker_corrupt_state_loads_empty() {
        let store = MemoryStore::new();
        store.set(keys::RECENT_DOMAINS, "[{\"domain\": 42}");

        let tracker = Tracker::load(store);

        assert!(tracker.snapshot().is_empty());
    }

    #[test]
    fn test_tracker_sees_writes_from_other_pages() {
        let mut tracker = Tracker::load(MemoryStore::new());
        tracker.record_visit("https://a.com", 100);

        let mut other = load_recent(tracker.store());
        other.upsert("https://b.com", 200);
        save_json(tracker.store(), keys::RECENT_DOMAINS, &other.snapshot());

        tracker.record_visit("https://c.com", 300);

        let names: Vec<&str> = tracker.snapshot().iter().map(|r| r.domain.as_str()).collect();
        assert_eq!(names, vec!["c.com", "b.com", "a.com"]);
    }

    #[test]
    fn test_tracker_survives_storage_failure() {
        let mut tracker = Tracker::load(MemoryStore::new());
        tracker.record_visit("https://a.com", 100);
        tracker.store().set_failing(true);

        assert!(tracker.record_visit("https://b.com", 200));
        assert_eq!(tracker.snapshot().len(), 2);

        tracker.store().set_failing(false);
        assert_eq!(load_recent(tracker.store()).len(), 1);
    }

    #[test]
    fn test_tracker_follows_reset_by_other_page() {
        let store = std::rc::Rc::new(MemoryStore::new());
        let mut tracker = Tracker::load(std::rc::Rc::clone(&store));
        tracker.record_visit("https://a.com", 100);

        store.remove(keys::RECENT_DOMAINS);
        tracker.record_visit("https://b.com", 200);

        let names: Vec<&str> = tracker.snapshot().iter().map(|r| r.domain.as_str()).collect();
        assert_eq!(names, vec!["b.com"]);
        assert_eq!(load_recent(&store).len(), 1);
    }

    #[test]
    fn test_tracker_is_full_reads_store() {
        let store = std::rc::Rc::new(MemoryStore::new());
        let mut tracker = Tracker::load(std::rc::Rc::clone(&store));
        assert!(!tracker.is_full());

        let records: Vec<DomainRecord> = ["a.com", "b.com", "c.com", "d.com", "e.com"]
            .iter()
            .map(|d| DomainRecord::new(d, 1))
            .collect();
        save_json(&store, keys::RECENT_DOMAINS, &records);

        assert!(tracker.is_full());
        assert_eq!(tracker.snapshot().len(), CAPACITY);
    }

    #[test]
    fn test_tracker_clear() {
        let mut tracker = Tracker::load(MemoryStore::new());
        tracker.record_visit("https://a.com", 100);

        tracker.clear();

        assert!(tracker.snapshot().is_empty());
        assert!(tracker.store().get_opt(keys::RECENT_DOMAINS).is_none());
    }
}

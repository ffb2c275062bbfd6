use anyhow::{Context, Result};
use sf_api_types::{GeoCacheEntry, GeoLocation};
use sf_form_core::clock::Clock;
use tracing::warn;

pub const DEFAULT_KEY: &str = "geoData";
pub const DEFAULT_TTL_MS: f64 = 3_600_000.0;

/// String key/value persistence (local storage in the browser).
pub trait CacheStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str) -> Result<()>;
}

impl<S: CacheStore + ?Sized> CacheStore for std::rc::Rc<S> {
    fn get(&self, key: &str) -> Option<String> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        (**self).set(key, value)
    }
}

/// Time-limited geo-IP cache. Entries are never revoked, only outlived.
pub struct GeoCache<S, C> {
    store: S,
    clock: C,
    key: String,
    ttl_ms: f64,
}

impl<S: CacheStore, C: Clock> GeoCache<S, C> {
    pub fn new(store: S, clock: C) -> Self {
        Self::with_ttl(store, clock, DEFAULT_KEY, DEFAULT_TTL_MS)
    }

    pub fn with_ttl(store: S, clock: C, key: &str, ttl_ms: f64) -> Self {
        Self {
            store,
            clock,
            key: key.to_owned(),
            ttl_ms,
        }
    }

    /// Raw entry, stale or not. Malformed JSON reads as absent.
    pub fn entry(&self) -> Option<GeoCacheEntry> {
        let raw = self.store.get(&self.key)?;
        match serde_json::from_str(&raw) {
            Ok(entry) => Some(entry),
            Err(err) => {
                warn!(key = %self.key, %err, "ignoring malformed geo cache entry");
                None
            }
        }
    }

    pub fn is_valid(&self, entry: &GeoCacheEntry) -> bool {
        self.clock.now_ms() < entry.expires
    }

    pub fn get(&self) -> Option<GeoLocation> {
        self.entry()
            .filter(|entry| self.is_valid(entry))
            .map(|entry| entry.data)
    }

    pub fn set(&self, data: &GeoLocation) -> Result<()> {
        let entry = GeoCacheEntry {
            data: data.clone(),
            expires: self.clock.now_ms() + self.ttl_ms,
        };
        let raw = serde_json::to_string(&entry).context("geo cache encode")?;
        self.store.set(&self.key, &raw)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::cell::{Cell, RefCell};
    use std::collections::HashMap;
    use std::rc::Rc;

    #[derive(Default)]
    pub(crate) struct MemoryStore(pub RefCell<HashMap<String, String>>);

    impl CacheStore for MemoryStore {
        fn get(&self, key: &str) -> Option<String> {
            self.0.borrow().get(key).cloned()
        }

        fn set(&self, key: &str, value: &str) -> Result<()> {
            self.0.borrow_mut().insert(key.to_owned(), value.to_owned());
            Ok(())
        }
    }

    #[derive(Default)]
    pub(crate) struct TestClock(pub Cell<f64>);

    impl Clock for TestClock {
        fn now_ms(&self) -> f64 {
            self.0.get()
        }
    }

    pub(crate) fn seoul() -> GeoLocation {
        GeoLocation {
            country_code: Some("kr".to_owned()),
            country_name: Some("South Korea".to_owned()),
            city: Some("Seoul".to_owned()),
            region: None,
            postal: None,
        }
    }

    #[test]
    fn entry_is_valid_until_ttl_elapses() -> anyhow::Result<()> {
        let store = Rc::new(MemoryStore::default());
        let clock = Rc::new(TestClock::default());
        let cache = GeoCache::new(store.clone(), clock.clone());

        cache.set(&seoul())?;
        assert_eq!(cache.get(), Some(seoul()));

        clock.0.set(DEFAULT_TTL_MS - 1.0);
        assert!(cache.get().is_some());
        clock.0.set(DEFAULT_TTL_MS);
        assert!(cache.get().is_none());
        assert!(cache.entry().is_some());

        let raw = store.get(DEFAULT_KEY).unwrap_or_default();
        assert!(raw.contains("\"expires\":3600000"));
        Ok(())
    }

    #[test]
    fn malformed_entry_reads_as_absent() -> anyhow::Result<()> {
        let store = MemoryStore::default();
        store.set(DEFAULT_KEY, "{not json")?;
        let cache = GeoCache::new(store, TestClock::default());
        assert!(cache.get().is_none());
        Ok(())
    }
}

//! Geo-IP lookup with a time-limited cache, plus country-list loading.

pub mod cache;
pub mod countries;

use anyhow::{Result, bail};
use async_trait::async_trait;
use sf_api_types::{CountryCode, GeoLocation};
use sf_form_core::clock::Clock;
use std::rc::Rc;
use tracing::{debug, warn};

pub use cache::{CacheStore, GeoCache};
pub use countries::{CountryListSource, CountryListing, fallback_countries, load_countries};

#[async_trait(?Send)]
pub trait GeoProvider {
    fn name(&self) -> &str;
    async fn locate(&self) -> Result<GeoLocation>;
}

/// Cache first, then providers in fallback order.
pub struct GeoService<S, C> {
    cache: GeoCache<S, C>,
    providers: Vec<Rc<dyn GeoProvider>>,
}

impl<S: CacheStore, C: Clock> GeoService<S, C> {
    pub fn new(cache: GeoCache<S, C>) -> Self {
        Self {
            cache,
            providers: Vec::new(),
        }
    }

    pub fn register(&mut self, provider: Rc<dyn GeoProvider>) {
        self.providers.push(provider);
    }

    /// A provider answer only counts when it carries a country code.
    pub async fn locate(&self) -> Result<GeoLocation> {
        if let Some(hit) = self.cache.get() {
            debug!("geo cache hit");
            return Ok(hit);
        }
        for provider in &self.providers {
            match provider.locate().await {
                Ok(location) if location.country().is_some() => {
                    if let Err(err) = self.cache.set(&location) {
                        warn!(error = %format!("{err:#}"), "could not persist geo cache");
                    }
                    debug!(provider = provider.name(), "geo lookup succeeded");
                    return Ok(location);
                }
                Ok(_) => warn!(provider = provider.name(), "geo provider returned no country"),
                Err(err) => {
                    warn!(provider = provider.name(), error = %format!("{err:#}"), "geo provider failed")
                }
            }
        }
        bail!("no geo provider could determine the country")
    }

    /// Up to `attempts` lookups; `None` when all of them fail.
    pub async fn detect_country(&self, attempts: u32) -> Option<CountryCode> {
        for attempt in 1..=attempts {
            match self.locate().await {
                Ok(location) => return location.country(),
                Err(err) => debug!(attempt, error = %err, "country detection attempt failed"),
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::tests::{MemoryStore, TestClock, seoul};
    use crate::cache::DEFAULT_TTL_MS;
    use anyhow::anyhow;
    use std::cell::Cell;

    struct CountingProvider {
        calls: Cell<u32>,
        answer: Option<GeoLocation>,
    }

    impl CountingProvider {
        fn new(answer: Option<GeoLocation>) -> Rc<Self> {
            Rc::new(Self {
                calls: Cell::new(0),
                answer,
            })
        }
    }

    #[async_trait(?Send)]
    impl GeoProvider for CountingProvider {
        fn name(&self) -> &str {
            "counting"
        }

        async fn locate(&self) -> Result<GeoLocation> {
            self.calls.set(self.calls.get() + 1);
            self.answer.clone().ok_or_else(|| anyhow!("offline"))
        }
    }

    fn service(clock: Rc<TestClock>) -> GeoService<MemoryStore, Rc<TestClock>> {
        GeoService::new(GeoCache::new(MemoryStore::default(), clock))
    }

    #[tokio::test]
    async fn cached_lookup_skips_network_until_ttl() -> anyhow::Result<()> {
        let clock = Rc::new(TestClock::default());
        let provider = CountingProvider::new(Some(seoul()));
        let mut geo = service(clock.clone());
        geo.register(provider.clone());

        assert_eq!(geo.locate().await?, seoul());
        clock.0.set(DEFAULT_TTL_MS / 2.0);
        assert_eq!(geo.locate().await?, seoul());
        assert_eq!(provider.calls.get(), 1);

        clock.0.set(DEFAULT_TTL_MS + 1.0);
        geo.locate().await?;
        assert_eq!(provider.calls.get(), 2);
        Ok(())
    }

    #[tokio::test]
    async fn falls_through_providers_in_order() -> anyhow::Result<()> {
        let down = CountingProvider::new(None);
        let blank = CountingProvider::new(Some(GeoLocation::default()));
        let up = CountingProvider::new(Some(seoul()));
        let mut geo = service(Rc::new(TestClock::default()));
        geo.register(down.clone());
        geo.register(blank.clone());
        geo.register(up.clone());

        let found = geo.locate().await?;
        assert_eq!(found.country().map(|c| c.to_string()), Some("KR".to_owned()));
        assert_eq!((down.calls.get(), blank.calls.get(), up.calls.get()), (1, 1, 1));
        Ok(())
    }

    #[tokio::test]
    async fn detection_gives_up_after_attempts() {
        let down = CountingProvider::new(None);
        let mut geo = service(Rc::new(TestClock::default()));
        geo.register(down.clone());

        assert_eq!(geo.detect_country(2).await, None);
        assert_eq!(down.calls.get(), 2);
    }
}

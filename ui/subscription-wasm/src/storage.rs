//! Local-storage backed cache store and the browser clock.

use anyhow::{Result, anyhow};
use gloo_storage::{LocalStorage, Storage};
use sf_form_core::clock::Clock;
use sf_geo_client::CacheStore;

#[derive(Clone, Copy, Default)]
pub struct LocalStore;

impl CacheStore for LocalStore {
    fn get(&self, key: &str) -> Option<String> {
        LocalStorage::raw().get_item(key).ok().flatten()
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        LocalStorage::raw()
            .set_item(key, value)
            .map_err(|err| anyhow!("localStorage.setItem({key}) failed: {err:?}"))
    }
}

/// `Date.now()`.
#[derive(Clone, Copy, Default)]
pub struct JsClock;

impl Clock for JsClock {
    fn now_ms(&self) -> f64 {
        js_sys::Date::now()
    }
}

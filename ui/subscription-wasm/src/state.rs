//! Application context.
//!
//! Everything the handlers share lives in one `AppContext`, built at startup
//! and handed to each component as an `Rc`.

use sf_form_core::rules::RuleTable;
use sf_form_core::submission::SubmissionController;
use sf_form_core::toast::Notifier;
use sf_form_core::validator::Validator;
use sf_form_core::{FormConfig, FormError, FormResult};
use sf_geo_client::{CountryListSource, GeoCache, GeoService};
use std::cell::RefCell;
use std::rc::Rc;

use crate::dom::Elements;
use crate::modal::ModalManager;
use crate::phone::PhoneState;
use crate::storage::{JsClock, LocalStore};
use crate::submit::{DomSubmitUi, DomTransport};
use crate::toast::ToastReporter;

pub type App = Rc<AppContext>;

pub struct AppContext {
    pub els: Elements,
    pub config: FormConfig,
    pub toasts: Rc<ToastReporter>,
    pub modals: ModalManager,
    pub validator: RefCell<Validator>,
    pub geo: GeoService<LocalStore, JsClock>,
    pub country_sources: Vec<Rc<dyn CountryListSource>>,
    pub submission: SubmissionController<DomTransport, DomSubmitUi, JsClock>,
    pub phone: RefCell<PhoneState>,
}

impl AppContext {
    pub fn new(els: Elements, config: FormConfig) -> FormResult<App> {
        let toasts = Rc::new(ToastReporter::new(config.toast_ms));
        let modals = ModalManager::new(
            toasts.clone(),
            config.modal_transition_ms,
            config.spinner_timeout_ms,
        );
        let validator = Validator::new(RuleTable::standard()?);

        let http = reqwest::Client::new();
        let cache = GeoCache::with_ttl(
            LocalStore,
            JsClock,
            &config.geo_cache_key,
            config.geo_cache_ttl_ms as f64,
        );
        let mut geo = GeoService::new(cache);
        for provider in sf_geo_http::default_providers(&http) {
            geo.register(provider);
        }
        let country_sources = sf_geo_http::default_country_sources(&http);

        let submission = SubmissionController::new(
            DomTransport,
            DomSubmitUi::new(&els, toasts.clone()),
            JsClock,
            config.clone(),
        );

        Ok(Rc::new(AppContext {
            els,
            config,
            toasts,
            modals,
            validator: RefCell::new(validator),
            geo,
            country_sources,
            submission,
            phone: RefCell::new(PhoneState::default()),
        }))
    }

    /// Surface a non-fatal failure: log it and toast it.
    pub fn report(&self, err: FormError) {
        tracing::warn!(%err, "reported");
        self.toasts.error(&err.to_string(), None);
    }

    /// Toast a feature-level failure with the underlying cause appended.
    pub fn report_with(&self, message: &str, cause: &anyhow::Error) {
        tracing::warn!(error = %format!("{cause:#}"), "{message}");
        self.toasts.error(message, Some(&cause.to_string()));
    }
}

//! Fan-club subscription form: browser frontend.
//!
//! Compiled to WASM and loaded by the subscription page. All behaviour that
//! does not touch the DOM lives in `sf-form-core` and `sf-geo-client`; the
//! modules here bind it to real elements, timers and Bootstrap widgets.

mod address;
mod catalog;
mod config;
mod dom;
mod events;
mod logging;
mod modal;
mod payment;
mod phone;
mod progress;
mod state;
mod storage;
mod submit;
mod toast;
mod validation;
mod widgets;

use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;

use crate::modal::ShowOptions;
use crate::state::AppContext;

const ONBOARDING_MODAL: &str = "onboardingModal";

/// Entry point called automatically by wasm-bindgen when the module loads.
#[wasm_bindgen(start)]
pub async fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();

    let (config, problem) = config::load();
    logging::init(config.debug);
    if let Some(problem) = problem {
        tracing::warn!(%problem, "ignoring SUBSCRIPTION_FORM_CONFIG");
    }

    init(config).await
}

/// Main initialisation sequence.
async fn init(config: sf_form_core::FormConfig) -> Result<(), JsValue> {
    let els = dom::Elements::bind()?;
    dom::inject_styles()?;

    let app = AppContext::new(els, config).map_err(|err| JsValue::from_str(&err.to_string()))?;

    if !widgets::init_aos() {
        tracing::debug!("AOS not loaded");
    }
    if dom::by_id(ONBOARDING_MODAL).is_some() {
        app.modals.show(ONBOARDING_MODAL, ShowOptions::default());
    }

    catalog::populate_branches(&app)?;
    progress::install_live_region(&app)?;
    validation::enhance_accessibility();
    progress::install_debug_line(&app)?;
    submit::populate_ids(&app.els);
    submit::ensure_retry_modal()?;
    submit::install_modal_hooks(&app);
    let tooltips = widgets::init_tooltips();
    tracing::debug!(tooltips, "tooltips ready");
    payment::update_terms_visibility(&app);

    events::bind_events(&app);
    progress::update(&app);
    progress::update_submit_state(&app);

    spawn_local(phone::init(app.clone()));
    spawn_local(address::populate_country_dropdown(app.clone()));
    spawn_local(address::autofill_from_ip(app.clone()));
    spawn_local(address::dynamic_address_fields(app.clone()));

    tracing::info!("subscription form ready");
    Ok(())
}

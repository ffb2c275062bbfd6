//! Event binding.
//!
//! Wires every listener the form needs. Async handlers are spawned with
//! `wasm_bindgen_futures::spawn_local` and receive their own `App` clone.

use sf_form_core::audit;
use sf_form_core::progress::TRACKED_FIELDS;
use wasm_bindgen::JsValue;
use web_sys::Event;

use crate::address;
use crate::catalog;
use crate::dom::{self, Control};
use crate::payment;
use crate::phone;
use crate::progress;
use crate::state::{App, AppContext};
use crate::submit;
use crate::validation;

/// Helper: attach a sync handler that gets the app context.
macro_rules! on_event {
    ($target:expr, $event:expr, $app:expr, $handler:expr) => {{
        let app = $app.clone();
        dom::listen($target, $event, move |_: Event| $handler(&app));
    }};
}

/// Helper: attach an async handler; each firing spawns a task.
macro_rules! on_event_async {
    ($target:expr, $event:expr, $app:expr, $handler:expr) => {{
        let app = $app.clone();
        dom::listen($target, $event, move |_: Event| {
            wasm_bindgen_futures::spawn_local($handler(app.clone()));
        });
    }};
}

fn log_dom_error(what: &str, result: Result<(), JsValue>) {
    if let Err(err) = result {
        tracing::warn!(?err, "{what} failed");
    }
}

fn refresh(app: &AppContext) {
    progress::update(app);
    progress::update_submit_state(app);
}

/// Bind all listeners. Call once after init.
pub fn bind_events(app: &App) {
    // ── Submit ──
    {
        let app2 = app.clone();
        dom::listen(&app.els.form, "submit", move |event: Event| {
            event.prevent_default();
            wasm_bindgen_futures::spawn_local(submit::on_submit(app2.clone()));
        });
    }

    // ── Inline validation ──
    for control in dom::form_controls(&app.els.form) {
        for name in ["input", "blur"] {
            let app2 = app.clone();
            let target = control.clone();
            dom::listen(control.element(), name, move |_| {
                validation::validate(&app2, &target);
            });
        }
        let target = control.element().clone();
        dom::listen(control.element(), "invalid", move |event: Event| {
            event.prevent_default();
            validation::shake(&target);
        });
    }

    // ── Progress ──
    for id in TRACKED_FIELDS {
        let Some(control) = Control::by_id(id) else {
            continue;
        };
        let app2 = app.clone();
        let target = control.clone();
        dom::listen(control.element(), "input", move |_| {
            progress::update(&app2);
            validation::validate(&app2, &target);
            progress::update_submit_state(&app2);
            audit::field_changed(&target.id(), &target.value());
        });
    }
    for radio in dom::query_all("input[name=\"contact-method\"]") {
        on_event!(&radio, "change", app, refresh);
    }
    for radio in dom::query_all("input[name=\"payment-method\"]") {
        on_event!(&radio, "change", app, progress::update_submit_state);
    }

    // ── Catalog ──
    if let Some(branch) = &app.els.branch {
        on_event!(branch, "change", app, |app: &App| {
            log_dom_error("branch change", catalog::on_branch_change(app));
            progress::update_submit_state(app);
        });
    }
    if let Some(group) = &app.els.group {
        on_event!(group, "change", app, |app: &App| {
            log_dom_error("group change", catalog::on_group_change(app));
            progress::update_submit_state(app);
        });
    }
    if let Some(artist) = &app.els.artist {
        on_event!(artist, "change", app, refresh);
    }

    // ── Payment ──
    if let Some(payment_type) = &app.els.payment_type {
        on_event!(payment_type, "change", app, payment::on_payment_type_change);
    }

    // ── Address and phone ──
    if let Some(select) = &app.els.country_select {
        on_event!(select, "change", app, address::on_country_change);
    }
    if let Some(input) = &app.els.phone {
        on_event!(input, "input", app, phone::on_input);
    }

    // ── Retry decision ──
    if let Some(btn) = dom::by_id("retry-submit-btn") {
        on_event_async!(&btn, "click", app, submit::on_retry);
    }
    if let Some(btn) = dom::by_id("retry-cancel-btn") {
        on_event!(&btn, "click", app, submit::on_decline_retry);
    }
}

//! Country dropdown, geo-IP autofill and the per-country address layout.

use gloo_timers::callback::Timeout;
use sf_form_core::FormError;
use sf_form_core::address::{AddressLayout, StartupLayout, startup_layout};
use sf_form_core::toast::{Notifier, Toast};
use sf_geo_client::load_countries;
use web_sys::Element;

use crate::dom::{self, Control};
use crate::progress;
use crate::state::{App, AppContext};

const MANUAL_COUNTRY_WARNING: &str =
    "Could not auto-detect your country. Please select it manually from the list.";

/// Show, hide, relabel and reorder the address inputs for `country`.
pub fn apply_layout(app: &AppContext, country: Option<&str>) {
    let layout = match AddressLayout::for_country(country) {
        Ok(layout) => layout,
        Err(err) => {
            app.report(err);
            return;
        }
    };

    for spec in &layout.visible {
        let Some(control) = Control::by_id(spec.id) else {
            continue;
        };
        let el: &Element = control.element();
        let _ = el.set_attribute("placeholder", spec.placeholder);
        if let Some(label) = el.previous_element_sibling() {
            label.set_text_content(Some(spec.label));
        }
        dom::set_required(el, spec.required);
        match spec.html_pattern {
            Some(pattern) => {
                let _ = el.set_attribute("pattern", pattern);
            }
            None => {
                let _ = el.remove_attribute("pattern");
            }
        }
        let _ = el.set_attribute("data-error", spec.error.unwrap_or(""));
        if let Some(parent) = el.parent_element() {
            dom::set_display(&parent, "");
        }
    }

    for id in &layout.hidden {
        if let Some(el) = dom::by_id(id) {
            dom::set_required(&el, false);
            if let Some(parent) = el.parent_element() {
                dom::set_display(&parent, "none");
            }
        }
    }

    if let Some(container) = &app.els.address_fields {
        for id in layout.order() {
            let Some(el) = dom::by_id(id) else {
                continue;
            };
            // Move the field's wrapper when it sits directly in the container.
            let node = match el.parent_element() {
                Some(parent) if parent.parent_element().as_ref() == Some(container) => parent,
                _ => el,
            };
            let _ = container.append_child(&node);
        }
    }

    tracing::debug!(country = ?layout.country, "address layout applied");
    app.validator.borrow_mut().set_layout(layout);
    progress::update(app);
    progress::update_submit_state(app);
}

/// Initial layout from geo-IP, unless the select already holds a country.
pub async fn dynamic_address_fields(app: App) {
    let detected = match app.geo.locate().await {
        Ok(location) => location.country().map(|c| c.to_string()),
        Err(err) => {
            app.report_with("Could not detect your country for address fields.", &err);
            None
        }
    };
    let selected = app
        .els
        .country_select
        .as_ref()
        .map(|s| s.value())
        .unwrap_or_default();
    match startup_layout(&selected, detected.as_deref()) {
        StartupLayout::KeepSelection => {
            tracing::debug!(%selected, "country already chosen, keeping its layout");
        }
        StartupLayout::Apply(country) => apply_layout(&app, country.as_deref()),
    }
}

/// User picked a country: that choice drives the layout.
pub fn on_country_change(app: &AppContext) {
    let Some(select) = &app.els.country_select else {
        return;
    };
    let value = select.value();
    if let Some(input) = &app.els.country_input {
        input.set_value(&value);
    }
    apply_layout(app, Some(&value));
}

pub async fn populate_country_dropdown(app: App) {
    let Some(select) = app.els.country_select.clone() else {
        app.report(FormError::missing("Country select"));
        return;
    };
    if let Err(err) = dom::reset_select(&select, "Select Country") {
        tracing::warn!(?err, "could not reset country select");
        return;
    }

    let listing = load_countries(&app.country_sources).await;
    if listing.from_fallback {
        app.toasts.error("Could not load country list.", None);
    }
    if let Err(err) = dom::append_options(
        &select,
        listing.countries.iter().map(|c| (c.code.as_str(), c.name.as_str())),
    ) {
        tracing::warn!(?err, "could not fill country select");
    }
    if let Some(placeholder) = select.query_selector("option[value=\"\"]").ok().flatten() {
        let _ = placeholder.remove_attribute("selected");
    }
    dom::set_display(&select, "");

    if let Some(code) = app.geo.detect_country(app.config.geo_detect_attempts).await {
        if let Some(country) = listing.find(code.as_str()) {
            select.set_value(&country.code);
            if let Some(input) = &app.els.country_input {
                input.set_value(&country.code);
            }
            apply_layout(&app, Some(&country.code));
        }
    }

    let app2 = app.clone();
    Timeout::new(app.config.manual_country_warning_ms, move || {
        let empty = app2
            .els
            .country_select
            .as_ref()
            .is_none_or(|s| s.value().is_empty());
        if empty {
            app2.toasts.notify(Toast::warning(MANUAL_COUNTRY_WARNING));
        }
    })
    .forget();
}

/// Prefill city, region and postal code from geo-IP.
pub async fn autofill_from_ip(app: App) {
    let location = match app.geo.locate().await {
        Ok(location) => location,
        Err(err) => {
            app.report_with("Could not auto-fill your address.", &err);
            return;
        }
    };
    for (id, value) in [
        ("city", &location.city),
        ("state", &location.region),
        ("postal-code", &location.postal),
    ] {
        if let (Some(control), Some(value)) = (Control::by_id(id), value) {
            control.set_value(value);
        }
    }
    progress::update(&app);
}

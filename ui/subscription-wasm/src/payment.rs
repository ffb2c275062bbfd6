//! Payment type switching: installment options and terms.

use sf_form_core::audit;
use sf_form_core::readiness::INSTALLMENT;
use web_sys::Element;

use crate::dom;
use crate::progress;
use crate::state::AppContext;

fn is_installment(app: &AppContext) -> bool {
    app.els
        .payment_type
        .as_ref()
        .is_some_and(|sel| sel.value() == INSTALLMENT)
}

/// Terms checkbox is shown and required only for installment payments.
pub fn update_terms_visibility(app: &AppContext) {
    let Some(terms) = &app.els.installment_terms else {
        return;
    };
    let wrapper: Option<Element> = terms.closest(".form-check").ok().flatten();
    if is_installment(app) {
        if let Some(w) = &wrapper {
            dom::remove_class(w, "d-none");
        }
        terms.set_required(true);
    } else {
        if let Some(w) = &wrapper {
            dom::add_class(w, "d-none");
        }
        terms.set_checked(false);
        terms.set_required(false);
    }
}

pub fn on_payment_type_change(app: &AppContext) {
    update_terms_visibility(app);
    let installment = is_installment(app);

    if let Some(options) = &app.els.installment_options {
        if installment {
            dom::show_element(options);
        } else {
            dom::hide_element(options);
        }
    }
    if let Some(plan) = &app.els.installment_plan {
        dom::set_required(plan, installment);
    }
    for input in dom::query_all("input[name=\"payment-method\"]") {
        dom::set_required(&input, true);
    }

    progress::update(app);
    progress::update_submit_state(app);
    let value = app
        .els
        .payment_type
        .as_ref()
        .map(|sel| sel.value())
        .unwrap_or_default();
    audit::audit("Payment type changed", &audit::sanitize(&value));
    let visible = app
        .els
        .installment_options
        .as_ref()
        .is_some_and(|o| !dom::has_class(o, "d-none"));
    audit::audit("Installment options visible", &visible.to_string());
}
